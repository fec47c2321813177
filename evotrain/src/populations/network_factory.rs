use super::{TrainingError, TrainingOptions};

use evotrain_nn::networks::FeedForwardNetwork;
use rand::Rng;

/// Builds networks shaped by a set of training options,
/// either at random or derived from a parent.
#[derive(Clone, Copy, Debug)]
pub struct NetworkFactory<'a> {
    options: &'a TrainingOptions,
}

impl<'a> NetworkFactory<'a> {
    pub fn new(options: &'a TrainingOptions) -> NetworkFactory<'a> {
        NetworkFactory { options }
    }

    fn empty(&self) -> FeedForwardNetwork {
        FeedForwardNetwork::with_shape(self.options.shape(), self.options.activation())
    }

    /// Returns a network with every weight and bias drawn
    /// from ±`initial_amplitude`.
    ///
    /// # Errors
    /// Propagates initialization errors.
    pub fn create_random<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<FeedForwardNetwork, TrainingError> {
        let mut network = self.empty();
        network.random_initialize(self.options.config().initial_amplitude, rng)?;
        Ok(network)
    }

    /// Returns a mutated copy of `parent`.
    ///
    /// # Errors
    /// Returns an error if `parent` is not initialized or
    /// is not shaped like the configured networks.
    pub fn create_derived<R: Rng + ?Sized>(
        &self,
        parent: &FeedForwardNetwork,
        mutation_chance: f32,
        learning_rate: f32,
        mutate_relative: bool,
        rng: &mut R,
    ) -> Result<FeedForwardNetwork, TrainingError> {
        let mut network = self.empty();
        network.derive_from(parent, mutation_chance, learning_rate, mutate_relative, rng)?;
        Ok(network)
    }

    /// Returns an unmutated copy of `parent`.
    ///
    /// # Errors
    /// As for [`create_derived`](NetworkFactory::create_derived).
    pub fn create_exact_clone(
        &self,
        parent: &FeedForwardNetwork,
    ) -> Result<FeedForwardNetwork, TrainingError> {
        let mut network = self.empty();
        network.clone_from_parent(parent)?;
        Ok(network)
    }

    /// Mutates a slot's network from the survivor pool with the
    /// configured mutation settings.
    pub(super) fn create_configured_derivation<R: Rng + ?Sized>(
        &self,
        parent: &FeedForwardNetwork,
        rng: &mut R,
    ) -> Result<FeedForwardNetwork, TrainingError> {
        let config = self.options.config();
        self.create_derived(
            parent,
            config.mutation_chance,
            config.learning_rate,
            config.mutate_relative,
            rng,
        )
    }

    /// Builds a full, unevaluated generation from `parents`:
    /// the first `parents.len()` slots hold exact clones, and
    /// slot `n` after them a mutation of the parent picked by
    /// [`parent_index`].
    ///
    /// # Errors
    /// Returns an error if `parents` is empty or holds more
    /// networks than the population, or if any parent does
    /// not fit the configured networks.
    ///
    /// # Examples
    /// ```
    /// use evotrain::{NetworkFactory, Termination, TrainingConfig, TrainingOptions};
    ///
    /// let options = TrainingOptions::new(TrainingConfig {
    ///     population_size: 6,
    ///     survivor_count: 2,
    ///     tests_per_network: 10,
    ///     input_count: 1,
    ///     output_count: 1,
    ///     hidden_height: 3,
    ///     hidden_layer_count: 2,
    ///     mutation_chance: 0.5,
    ///     learning_rate: 0.1,
    ///     termination: Termination::Generations(1),
    ///     ..TrainingConfig::default()
    /// })
    /// .unwrap();
    ///
    /// let factory = NetworkFactory::new(&options);
    /// let mut rng = rand::thread_rng();
    /// let parents = vec![
    ///     factory.create_random(&mut rng).unwrap(),
    ///     factory.create_random(&mut rng).unwrap(),
    /// ];
    /// let generation = factory.generate_derived_generation(&parents, &mut rng).unwrap();
    /// assert_eq!(generation.len(), 6);
    /// ```
    pub fn generate_derived_generation<R: Rng + ?Sized>(
        &self,
        parents: &[FeedForwardNetwork],
        rng: &mut R,
    ) -> Result<Vec<FeedForwardNetwork>, TrainingError> {
        let population = self.options.population_size();
        if parents.len() > population {
            return Err(TrainingError::TooManySeeds {
                seeds: parents.len(),
                population,
            });
        }
        check_compatible(parents, self.options)?;
        let survivors = self.options.survivor_count();
        (0..population)
            .map(|n| match parents.get(n) {
                Some(parent) => self.create_exact_clone(parent),
                None => {
                    let parent = &parents[parent_index(n, survivors, parents.len())];
                    self.create_configured_derivation(parent, rng)
                }
            })
            .collect()
    }
}

/// Index into a pool of `pool` parents of the one that slot `n`
/// derives from: `n % survivor_count`, or `n % pool` while the pool
/// holds fewer than `survivor_count` networks (a seeded first
/// generation with few seeds).
pub fn parent_index(n: usize, survivor_count: usize, pool: usize) -> usize {
    n % survivor_count.min(pool)
}

/// Checks that every network in `seeds` is initialized and
/// matches the configured shape and activation.
pub(super) fn check_compatible(
    seeds: &[FeedForwardNetwork],
    options: &TrainingOptions,
) -> Result<(), TrainingError> {
    if seeds.is_empty() {
        return Err(TrainingError::IncompatibleSeed {
            index: 0,
            reason: "no parent networks supplied".to_string(),
        });
    }
    for (index, seed) in seeds.iter().enumerate() {
        let reason = if !seed.is_ready() {
            "network is not initialized".to_string()
        } else if seed.shape() != options.shape() {
            format!("shape {} differs from {}", seed.shape(), options.shape())
        } else if seed.activation() != options.activation() {
            format!(
                "activation {} differs from {}",
                seed.activation(),
                options.activation()
            )
        } else {
            continue;
        };
        return Err(TrainingError::IncompatibleSeed { index, reason });
    }
    Ok(())
}
