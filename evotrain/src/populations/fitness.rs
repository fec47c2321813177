use super::{TrainingError, TrainingOptions};

use evotrain_nn::networks::FeedForwardNetwork;
use rand::Rng;
use tracing::{trace, warn};

use std::panic::{self, AssertUnwindSafe};

/// A network paired with its fitness score.
///
/// Lower scores are better.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub network: FeedForwardNetwork,
    pub score: f64,
}

/// Scores `network` against `target` on the configured number of
/// sampled inputs, as the sum of squared errors over every sample
/// and output.
///
/// Inputs are either stepped evenly through the test range (every
/// component of sample `t` equal to `(max - min) / tests * t + min`)
/// or drawn uniformly from it per component, depending on the
/// `random_sampling` setting. A non-finite score is clamped to
/// `f64::MAX`, so degenerate networks sort last.
///
/// # Errors
/// Returns an error if `target` returns the wrong number of values,
/// or if the network cannot be evaluated.
pub fn evaluate_fitness<F, R>(
    target: &F,
    network: &mut FeedForwardNetwork,
    options: &TrainingOptions,
    rng: &mut R,
) -> Result<f64, TrainingError>
where
    F: Fn(&[f32]) -> Vec<f32> + ?Sized,
    R: Rng + ?Sized,
{
    let config = options.config();
    let (min, max) = (config.test_range_min, config.test_range_max);
    let tests = config.tests_per_network;
    let mut inputs = vec![0.0; config.input_count];
    let mut score = 0.0f64;

    for t in 0..tests {
        if config.random_sampling {
            inputs.iter_mut().for_each(|x| *x = rng.gen_range(min..max));
        } else {
            let x = (max - min) / tests as f32 * t as f32 + min;
            inputs.iter_mut().for_each(|v| *v = x);
        }
        let expected = target(&inputs);
        if expected.len() != config.output_count {
            return Err(TrainingError::TargetOutputLength {
                expected: config.output_count,
                found: expected.len(),
            });
        }
        let actual = network.evaluate(&inputs)?;
        score += actual
            .iter()
            .zip(&expected)
            .map(|(&a, &e)| (f64::from(a) - f64::from(e)).powi(2))
            .sum::<f64>();
    }

    if score.is_finite() {
        Ok(score)
    } else {
        warn!(score, "clamping non-finite fitness score");
        Ok(f64::MAX)
    }
}

/// Calls `target` once on an all-zero input and checks the
/// length of its answer.
///
/// # Errors
/// Returns an error if `target` panics or returns the
/// wrong number of values.
pub fn probe_target<F>(target: &F, options: &TrainingOptions) -> Result<(), TrainingError>
where
    F: Fn(&[f32]) -> Vec<f32> + ?Sized,
{
    let config = options.config();
    let zeros = vec![0.0; config.input_count];
    let found = panic::catch_unwind(AssertUnwindSafe(|| target(&zeros)))
        .map_err(|_| TrainingError::TargetPanicked)?
        .len();
    trace!(
        found,
        expected = config.output_count,
        "probed target function"
    );
    if found == config.output_count {
        Ok(())
    } else {
        Err(TrainingError::TargetOutputLength {
            expected: config.output_count,
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Termination, TrainingConfig};

    use evotrain_nn::activations::ActivationType;
    use evotrain_nn::networks::NetworkError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn options(random_sampling: bool) -> TrainingOptions {
        TrainingOptions::new(TrainingConfig {
            population_size: 4,
            survivor_count: 1,
            tests_per_network: 8,
            input_count: 2,
            output_count: 1,
            hidden_height: 3,
            hidden_layer_count: 2,
            mutation_chance: 0.5,
            learning_rate: 1.0,
            random_sampling,
            test_range_min: -2.0,
            test_range_max: 2.0,
            termination: Termination::Generations(1),
            ..TrainingConfig::default()
        })
        .unwrap()
    }

    fn network(seed: u64) -> FeedForwardNetwork {
        let mut network = FeedForwardNetwork::new(2, 1, 3, 2, ActivationType::Tanh);
        network
            .random_initialize(1.0, &mut ChaCha8Rng::seed_from_u64(seed))
            .unwrap();
        network
    }

    #[test]
    fn even_sampling_matches_manual_sum() {
        let options = options(false);
        let target = |x: &[f32]| vec![x[0] * x[1]];
        let mut net = network(1);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let score = evaluate_fitness(&target, &mut net, &options, &mut rng).unwrap();

        let mut expected = 0.0;
        for t in 0..8 {
            let x = 4.0 / 8.0 * t as f32 - 2.0;
            let out = net.evaluate(&[x, x]).unwrap()[0];
            expected += (f64::from(out) - f64::from(x * x)).powi(2);
        }
        assert_eq!(score, expected);
    }

    #[test]
    fn sampled_inputs_stay_in_range() {
        let options = options(true);
        let target = |x: &[f32]| {
            assert!(x.iter().all(|v| (-2.0..2.0).contains(v)));
            vec![0.0]
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let score = evaluate_fitness(&target, &mut network(2), &options, &mut rng).unwrap();
        assert!(score >= 0.0);
    }

    #[test]
    fn perfect_fit_scores_zero() {
        let options = options(false);
        let mut net = network(3);
        let reference = net.clone();
        let target = move |x: &[f32]| reference.clone().evaluate(x).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let score = evaluate_fitness(&target, &mut net, &options, &mut rng);
        assert_eq!(score, Ok(0.0));
    }

    #[test]
    fn non_finite_scores_are_clamped() {
        let options = options(false);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let infinite = |_: &[f32]| vec![f32::INFINITY];
        let nan = |_: &[f32]| vec![f32::NAN];
        assert_eq!(
            evaluate_fitness(&infinite, &mut network(4), &options, &mut rng),
            Ok(f64::MAX)
        );
        assert_eq!(
            evaluate_fitness(&nan, &mut network(4), &options, &mut rng),
            Ok(f64::MAX)
        );
    }

    #[test]
    fn wrong_target_length_is_an_error() {
        let options = options(false);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let target = |_: &[f32]| vec![0.0, 1.0];
        assert_eq!(
            evaluate_fitness(&target, &mut network(5), &options, &mut rng),
            Err(TrainingError::TargetOutputLength {
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn unready_network_is_an_error() {
        let options = options(false);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut net = FeedForwardNetwork::new(2, 1, 3, 2, ActivationType::Tanh);
        assert_eq!(
            evaluate_fitness(&|_: &[f32]| vec![0.0], &mut net, &options, &mut rng),
            Err(TrainingError::Network(NetworkError::Uninitialized))
        );
    }

    #[test]
    fn probe() {
        let options = options(false);
        assert_eq!(probe_target(&|_: &[f32]| vec![1.0], &options), Ok(()));
        assert_eq!(
            probe_target(&|_: &[f32]| Vec::new(), &options),
            Err(TrainingError::TargetOutputLength {
                expected: 1,
                found: 0
            })
        );
        let panicking = |x: &[f32]| vec![1.0 / x[7]];
        assert_eq!(
            probe_target(&panicking, &options),
            Err(TrainingError::TargetPanicked)
        );
    }
}
