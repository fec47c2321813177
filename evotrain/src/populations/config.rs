use super::errors::ConfigError;

use evotrain_nn::activations::ActivationType;
use evotrain_nn::networks::Shape;
use serde::{Deserialize, Serialize};

/// When a training run stops.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Termination {
    /// Run exactly this many generations.
    Generations(usize),
    /// Run until the champion's mean squared error per
    /// sample and output stays at or below `mean_squared_error`
    /// for `patience` consecutive generations, or until
    /// `max_generations` generations have run.
    TargetAccuracy {
        mean_squared_error: f64,
        patience: usize,
        max_generations: usize,
    },
}

/// Raw configuration data for a training run.
///
/// Must be validated into [`TrainingOptions`] before use.
///
/// # Note
/// The [`Default`] value only fills in the optional
/// settings (initial amplitude 1, sampling range [0, 1),
/// random sampling); every count is zero and must be set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of networks in each generation.
    pub population_size: usize,
    /// Number of top networks kept from each generation,
    /// cloned and mutated to build the next one. Also the
    /// number of networks a run returns.
    pub survivor_count: usize,
    /// Number of sampled inputs each network is scored on.
    pub tests_per_network: usize,
    /// Number of input nodes.
    pub input_count: usize,
    /// Number of output nodes.
    pub output_count: usize,
    /// Number of nodes per hidden layer.
    pub hidden_height: usize,
    /// Number of hidden layers.
    pub hidden_layer_count: usize,
    /// Chance for each weight and bias to be mutated, in [0, 1].
    pub mutation_chance: f32,
    /// Magnitude of mutations.
    pub learning_rate: f32,
    /// Activation function of every hidden and output node.
    pub activation: ActivationType,
    /// Scale mutations by the mutated parameter's current value.
    pub mutate_relative: bool,
    /// Sample each input uniformly at random instead of
    /// stepping evenly through the range.
    pub random_sampling: bool,
    /// Weights and biases of randomly generated networks
    /// are drawn from ±`initial_amplitude`.
    pub initial_amplitude: f32,
    /// Inclusive lower bound of sampled inputs.
    pub test_range_min: f32,
    /// Exclusive upper bound of sampled inputs.
    pub test_range_max: f32,
    /// Stopping rule.
    pub termination: Termination,
    /// Seed for all randomness in a run. Runs with the
    /// same seed and configuration produce identical results.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> TrainingConfig {
        TrainingConfig {
            population_size: 0,
            survivor_count: 0,
            tests_per_network: 0,
            input_count: 0,
            output_count: 0,
            hidden_height: 0,
            hidden_layer_count: 0,
            mutation_chance: 0.0,
            learning_rate: 0.0,
            activation: ActivationType::ReLU,
            mutate_relative: false,
            random_sampling: true,
            initial_amplitude: 1.0,
            test_range_min: 0.0,
            test_range_max: 1.0,
            termination: Termination::Generations(0),
            seed: None,
        }
    }
}

/// Validated, immutable training configuration.
///
/// # Examples
/// ```
/// use evotrain::{ConfigError, TrainingConfig, TrainingOptions, Termination};
///
/// let config = TrainingConfig {
///     population_size: 100,
///     survivor_count: 5,
///     tests_per_network: 70,
///     input_count: 1,
///     output_count: 1,
///     hidden_height: 5,
///     hidden_layer_count: 4,
///     mutation_chance: 0.6,
///     learning_rate: 1.0,
///     test_range_min: -10.0,
///     test_range_max: 10.0,
///     termination: Termination::Generations(1000),
///     ..TrainingConfig::default()
/// };
/// let options = TrainingOptions::new(config.clone()).unwrap();
/// assert_eq!(options.config().survivor_count, 5);
///
/// let no_survivors = TrainingConfig { survivor_count: 0, ..config };
/// assert_eq!(TrainingOptions::new(no_survivors).unwrap_err(), ConfigError::ZeroSurvivors);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TrainingConfig", into = "TrainingConfig")]
pub struct TrainingOptions {
    config: TrainingConfig,
}

impl TrainingOptions {
    /// Validates `config`.
    ///
    /// # Errors
    /// Returns the first configuration problem found.
    pub fn new(config: TrainingConfig) -> Result<TrainingOptions, ConfigError> {
        if config.population_size == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        if config.survivor_count == 0 {
            return Err(ConfigError::ZeroSurvivors);
        }
        if config.survivor_count > config.population_size {
            return Err(ConfigError::TooManySurvivors {
                survivors: config.survivor_count,
                population: config.population_size,
            });
        }
        if config.tests_per_network == 0 {
            return Err(ConfigError::ZeroTests);
        }
        let shape = shape_of(&config);
        if shape.has_zero_dimension() {
            return Err(ConfigError::ZeroDimension(shape));
        }
        if !(0.0..=1.0).contains(&config.mutation_chance) {
            return Err(ConfigError::InvalidMutationChance(config.mutation_chance));
        }
        if !config.learning_rate.is_finite() {
            return Err(ConfigError::InvalidLearningRate(config.learning_rate));
        }
        if !(config.initial_amplitude > 0.0) || !config.initial_amplitude.is_finite() {
            return Err(ConfigError::InvalidAmplitude(config.initial_amplitude));
        }
        let (min, max) = (config.test_range_min, config.test_range_max);
        if !(min < max) || !min.is_finite() || !max.is_finite() {
            return Err(ConfigError::InvalidRange { min, max });
        }
        match config.termination {
            Termination::Generations(0) => return Err(ConfigError::ZeroGenerations),
            Termination::Generations(_) => {}
            Termination::TargetAccuracy {
                mean_squared_error,
                patience,
                max_generations,
            } => {
                if !(mean_squared_error > 0.0)
                    || !mean_squared_error.is_finite()
                    || patience == 0
                    || max_generations == 0
                {
                    return Err(ConfigError::InvalidAccuracyTarget);
                }
            }
        }
        Ok(TrainingOptions { config })
    }

    /// Returns the validated configuration.
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Returns the shape of every network in the run.
    pub fn shape(&self) -> Shape {
        shape_of(&self.config)
    }

    pub fn population_size(&self) -> usize {
        self.config.population_size
    }

    pub fn survivor_count(&self) -> usize {
        self.config.survivor_count
    }

    pub fn activation(&self) -> ActivationType {
        self.config.activation
    }
}

impl TryFrom<TrainingConfig> for TrainingOptions {
    type Error = ConfigError;

    fn try_from(config: TrainingConfig) -> Result<TrainingOptions, ConfigError> {
        TrainingOptions::new(config)
    }
}

impl From<TrainingOptions> for TrainingConfig {
    fn from(options: TrainingOptions) -> TrainingConfig {
        options.config
    }
}

fn shape_of(config: &TrainingConfig) -> Shape {
    Shape {
        inputs: config.input_count,
        hidden_height: config.hidden_height,
        hidden_layers: config.hidden_layer_count,
        outputs: config.output_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> TrainingConfig {
        TrainingConfig {
            population_size: 4,
            survivor_count: 2,
            tests_per_network: 10,
            input_count: 1,
            output_count: 1,
            hidden_height: 3,
            hidden_layer_count: 2,
            mutation_chance: 0.5,
            learning_rate: 1.0,
            termination: Termination::Generations(3),
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn accepts_valid_config() {
        let options = TrainingOptions::new(valid()).unwrap();
        assert_eq!(options.shape().to_string(), "1-[2x3]-1");
        assert_eq!(options.population_size(), 4);
    }

    #[test]
    fn survivor_bounds() {
        assert_eq!(
            TrainingOptions::new(TrainingConfig {
                survivor_count: 0,
                ..valid()
            }),
            Err(ConfigError::ZeroSurvivors)
        );
        assert_eq!(
            TrainingOptions::new(TrainingConfig {
                survivor_count: 5,
                ..valid()
            }),
            Err(ConfigError::TooManySurvivors {
                survivors: 5,
                population: 4
            })
        );
        assert!(TrainingOptions::new(TrainingConfig {
            survivor_count: 4,
            ..valid()
        })
        .is_ok());
    }

    #[test]
    fn rejects_degenerate_values() {
        let cases: [fn(&mut TrainingConfig); 13] = [
            |c| c.population_size = 0,
            |c| c.tests_per_network = 0,
            |c| c.hidden_layer_count = 0,
            |c| c.output_count = 0,
            |c| c.mutation_chance = 1.5,
            |c| c.mutation_chance = f32::NAN,
            |c| c.learning_rate = f32::INFINITY,
            |c| c.initial_amplitude = 0.0,
            |c| c.test_range_max = c.test_range_min,
            |c| (c.test_range_min, c.test_range_max) = (2.0, -2.0),
            |c| c.termination = Termination::Generations(0),
            |c| {
                c.termination = Termination::TargetAccuracy {
                    mean_squared_error: f64::INFINITY,
                    patience: 1,
                    max_generations: 10,
                }
            },
            |c| {
                c.termination = Termination::TargetAccuracy {
                    mean_squared_error: 0.1,
                    patience: 0,
                    max_generations: 10,
                }
            },
        ];
        for degrade in cases {
            let mut config = valid();
            degrade(&mut config);
            assert!(TrainingOptions::new(config.clone()).is_err(), "{:?}", config);
        }
    }

    #[test]
    fn deserialization_validates() {
        let json = serde_json::to_string(&valid()).unwrap();
        let options: TrainingOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(options.config(), &valid());

        let invalid = serde_json::to_string(&TrainingConfig {
            survivor_count: 0,
            ..valid()
        })
        .unwrap();
        assert!(serde_json::from_str::<TrainingOptions>(&invalid).is_err());
    }
}
