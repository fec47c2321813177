//! A Population is a pool of surviving networks,
//! evolved one generation at a time using a target
//! function as the source of selective pressure.
mod config;
mod errors;
mod fitness;
pub mod logging;
mod network_factory;

pub use config::{Termination, TrainingConfig, TrainingOptions};
pub use errors::{ConfigError, TrainingError};
pub use fitness::{evaluate_fitness, probe_target, Candidate};
pub use network_factory::{parent_index, NetworkFactory};

use crate::rng::SeedSequence;
use network_factory::check_compatible;

use evotrain_nn::networks::FeedForwardNetwork;
use rayon::prelude::*;
use tracing::{debug, info};

use std::ops::ControlFlow;

/// A population of networks being trained.
#[derive(Clone, Debug)]
pub struct Population {
    options: TrainingOptions,
    survivors: Vec<FeedForwardNetwork>,
    survivor_scores: Vec<f64>,
    generation_scores: Vec<f64>,
    generation: usize,
    seeds: SeedSequence,
}

impl Population {
    /// Creates an empty population. Its first generation
    /// is generated at random.
    ///
    /// # Examples
    /// ```
    /// use evotrain::{Population, Termination, TrainingConfig, TrainingOptions};
    ///
    /// let options = TrainingOptions::new(TrainingConfig {
    ///     population_size: 20,
    ///     survivor_count: 4,
    ///     tests_per_network: 10,
    ///     input_count: 2,
    ///     output_count: 1,
    ///     hidden_height: 3,
    ///     hidden_layer_count: 2,
    ///     mutation_chance: 0.5,
    ///     learning_rate: 0.5,
    ///     termination: Termination::Generations(10),
    ///     seed: Some(42),
    ///     ..TrainingConfig::default()
    /// })
    /// .unwrap();
    ///
    /// let mut population = Population::new(options);
    /// population.evolve(&|x: &[f32]| vec![x[0] * x[1]]).unwrap();
    ///
    /// assert_eq!(population.generation(), 1);
    /// assert_eq!(population.survivors().len(), 4);
    /// ```
    pub fn new(options: TrainingOptions) -> Population {
        Population {
            seeds: SeedSequence::new(options.config().seed),
            options,
            survivors: vec![],
            survivor_scores: vec![],
            generation_scores: vec![],
            generation: 0,
        }
    }

    /// Creates a population whose first survivor pool is `seeds`,
    /// so that the first generation is derived from them.
    /// Without seeds this is the same as [`Population::new`].
    ///
    /// # Errors
    /// Returns an error if there are more seeds than population
    /// slots, or if any seed is uninitialized or does not match
    /// the configured shape and activation.
    pub fn with_seeds(
        options: TrainingOptions,
        seeds: Vec<FeedForwardNetwork>,
    ) -> Result<Population, TrainingError> {
        let mut population = Population::new(options);
        if seeds.is_empty() {
            return Ok(population);
        }
        if seeds.len() > population.options.population_size() {
            return Err(TrainingError::TooManySeeds {
                seeds: seeds.len(),
                population: population.options.population_size(),
            });
        }
        check_compatible(&seeds, &population.options)?;
        population.survivors = seeds;
        Ok(population)
    }

    /// Builds, scores and selects one generation.
    ///
    /// Slot `n` holds a random network if the survivor pool is
    /// empty, an exact clone of survivor `n` if there is one, and
    /// otherwise a mutation of survivor `n % survivor_count` (see
    /// [`parent_index`]). Slots are
    /// scored in parallel; the best `survivor_count` by ascending
    /// score (ties keep slot order) become the new survivor pool.
    ///
    /// # Errors
    /// Returns an error if `target` returns the wrong number of
    /// values. The survivor pool is left unchanged.
    pub fn evolve<F>(&mut self, target: &F) -> Result<(), TrainingError>
    where
        F: Fn(&[f32]) -> Vec<f32> + Sync + ?Sized,
    {
        let generation_seed = self.seeds.next_generation();
        let options = &self.options;
        let factory = NetworkFactory::new(options);
        let pool = &self.survivors;

        let candidates = (0..options.population_size())
            .into_par_iter()
            .map(|n| {
                let mut rng = generation_seed.slot_rng(n);
                let mut network = if pool.is_empty() {
                    factory.create_random(&mut rng)?
                } else if let Some(survivor) = pool.get(n) {
                    factory.create_exact_clone(survivor)?
                } else {
                    let parent = &pool[parent_index(n, options.survivor_count(), pool.len())];
                    factory.create_configured_derivation(parent, &mut rng)?
                };
                let score = evaluate_fitness(target, &mut network, options, &mut rng)?;
                Ok(Candidate { network, score })
            })
            .collect::<Result<Vec<_>, TrainingError>>()?;

        let (survivors, generation_scores) = select(candidates, options.survivor_count());
        self.survivor_scores = survivors.iter().map(|c| c.score).collect();
        self.survivors = survivors.into_iter().map(|c| c.network).collect();
        self.generation_scores = generation_scores;
        self.generation += 1;

        debug!(
            generation = self.generation,
            best = self.survivor_scores[0],
            mean = logging::mean(&self.generation_scores),
            "generation evaluated"
        );
        Ok(())
    }

    /// Evolves the population until its termination rule or
    /// `observer` stops it, and returns the survivors, best first.
    ///
    /// `observer` sees the population after every generation;
    /// returning [`ControlFlow::Break`] ends the run.
    ///
    /// # Errors
    /// As for [`Population::evolve`].
    pub fn run<F, O>(
        mut self,
        target: &F,
        mut observer: O,
    ) -> Result<Vec<FeedForwardNetwork>, TrainingError>
    where
        F: Fn(&[f32]) -> Vec<f32> + Sync + ?Sized,
        O: FnMut(&Population) -> ControlFlow<()>,
    {
        info!(
            population = self.options.population_size(),
            survivors = self.options.survivor_count(),
            shape = %self.options.shape(),
            activation = %self.options.activation(),
            "starting training"
        );
        let mut streak = 0;
        loop {
            self.evolve(target)?;
            if observer(&self).is_break() {
                info!(generation = self.generation, "training stopped by observer");
                break;
            }
            if self.is_finished(&mut streak) {
                break;
            }
        }
        info!(
            generations = self.generation,
            best = ?self.best_score(),
            "training finished"
        );
        Ok(self.into_survivors())
    }

    fn is_finished(&self, streak: &mut usize) -> bool {
        match self.options.config().termination {
            Termination::Generations(generations) => self.generation >= generations,
            Termination::TargetAccuracy {
                mean_squared_error,
                patience,
                max_generations,
            } => {
                match self.best_mean_squared_error() {
                    Some(error) if error <= mean_squared_error => *streak += 1,
                    _ => *streak = 0,
                }
                *streak >= patience || self.generation >= max_generations
            }
        }
    }

    /// Returns the current generation number, which
    /// is the number of generations evolved so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn options(&self) -> &TrainingOptions {
        &self.options
    }

    /// Returns the survivor pool, best first.
    pub fn survivors(&self) -> &[FeedForwardNetwork] {
        &self.survivors
    }

    /// Returns the scores of the survivors, in the same order.
    /// Empty before the first generation.
    pub fn survivor_scores(&self) -> &[f64] {
        &self.survivor_scores
    }

    /// Returns the scores of every slot of the latest generation,
    /// in ascending order.
    pub fn generation_scores(&self) -> &[f64] {
        &self.generation_scores
    }

    /// Returns the best network of the latest generation.
    pub fn champion(&self) -> Option<&FeedForwardNetwork> {
        self.survivor_scores.first().and(self.survivors.first())
    }

    pub fn best_score(&self) -> Option<f64> {
        self.survivor_scores.first().copied()
    }

    /// Returns the champion's score divided by the number
    /// of sampled outputs it was scored on.
    pub fn best_mean_squared_error(&self) -> Option<f64> {
        let config = self.options.config();
        let samples = (config.tests_per_network * config.output_count) as f64;
        self.best_score().map(|score| score / samples)
    }

    /// Consumes the population, returning its survivors.
    pub fn into_survivors(self) -> Vec<FeedForwardNetwork> {
        self.survivors
    }
}

/// Stable-sorts `candidates` by ascending score, returning the
/// first `survivor_count` along with every score in order.
fn select(mut candidates: Vec<Candidate>, survivor_count: usize) -> (Vec<Candidate>, Vec<f64>) {
    candidates.sort_by(|a, b| a.score.total_cmp(&b.score));
    let scores = candidates.iter().map(|c| c.score).collect();
    candidates.truncate(survivor_count);
    (candidates, scores)
}

/// Trains networks to approximate `target` and returns the
/// final survivors, best first.
///
/// `seeds`, if any, form the initial survivor pool in place
/// of a random first generation.
///
/// # Errors
/// Returns an error before training if `target` panics or returns
/// the wrong number of values on an all-zero input, or if the
/// seeds do not fit `options`.
///
/// # Examples
/// ```
/// use evotrain::{train_on_function, Termination, TrainingConfig, TrainingOptions};
///
/// let options = TrainingOptions::new(TrainingConfig {
///     population_size: 30,
///     survivor_count: 3,
///     tests_per_network: 20,
///     input_count: 1,
///     output_count: 1,
///     hidden_height: 4,
///     hidden_layer_count: 2,
///     mutation_chance: 0.5,
///     learning_rate: 0.5,
///     termination: Termination::Generations(20),
///     ..TrainingConfig::default()
/// })
/// .unwrap();
///
/// let networks = train_on_function(&|x: &[f32]| vec![x[0] * x[0]], &options, vec![]).unwrap();
/// assert_eq!(networks.len(), 3);
/// ```
pub fn train_on_function<F>(
    target: &F,
    options: &TrainingOptions,
    seeds: Vec<FeedForwardNetwork>,
) -> Result<Vec<FeedForwardNetwork>, TrainingError>
where
    F: Fn(&[f32]) -> Vec<f32> + Sync + ?Sized,
{
    train_with_observer(target, options, seeds, |_| ControlFlow::Continue(()))
}

/// As [`train_on_function`], calling `observer` after every
/// generation. Returning [`ControlFlow::Break`] from it stops
/// training early.
///
/// # Errors
/// As for [`train_on_function`].
pub fn train_with_observer<F, O>(
    target: &F,
    options: &TrainingOptions,
    seeds: Vec<FeedForwardNetwork>,
    observer: O,
) -> Result<Vec<FeedForwardNetwork>, TrainingError>
where
    F: Fn(&[f32]) -> Vec<f32> + Sync + ?Sized,
    O: FnMut(&Population) -> ControlFlow<()>,
{
    probe_target(target, options)?;
    Population::with_seeds(options.clone(), seeds)?.run(target, observer)
}
