use evotrain_nn::networks::{NetworkError, Shape};

use thiserror::Error;

/// An invalid [`TrainingConfig`] value.
///
/// [`TrainingConfig`]: crate::TrainingConfig
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("population size must be at least 1")]
    ZeroPopulation,
    #[error("survivor count must be at least 1")]
    ZeroSurvivors,
    #[error("survivor count {survivors} exceeds population size {population}")]
    TooManySurvivors { survivors: usize, population: usize },
    #[error("tests per network must be at least 1")]
    ZeroTests,
    #[error("network dimensions must be non-zero, got {0}")]
    ZeroDimension(Shape),
    #[error("mutation chance must lie in [0, 1], got {0}")]
    InvalidMutationChance(f32),
    #[error("learning rate must be finite, got {0}")]
    InvalidLearningRate(f32),
    #[error("initial weight amplitude must be positive and finite, got {0}")]
    InvalidAmplitude(f32),
    #[error("test range [{min}, {max}) is empty or unbounded")]
    InvalidRange { min: f32, max: f32 },
    #[error("generation count must be at least 1")]
    ZeroGenerations,
    #[error("accuracy target needs a positive finite error, patience and generation limit")]
    InvalidAccuracyTarget,
}

/// An error raised while setting up or running training.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainingError {
    /// A seed network's shape or activation differs from the configured one.
    #[error("seed network {index} does not fit the configured network: {reason}")]
    IncompatibleSeed { index: usize, reason: String },
    /// More seed networks than population slots.
    #[error("{seeds} seed networks exceed population size {population}")]
    TooManySeeds { seeds: usize, population: usize },
    /// The target function returned the wrong number of values.
    #[error("target function returned {found} values, expected {expected}")]
    TargetOutputLength { expected: usize, found: usize },
    /// The target function panicked when probed.
    #[error("target function panicked when probed")]
    TargetPanicked,
    #[error(transparent)]
    Network(#[from] NetworkError),
}
