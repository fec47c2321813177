use evotrain::logging::{EvolutionLogger, ReportingLevel};
use evotrain::{train_with_observer, Termination, TrainingConfig, TrainingOptions};
use evotrain_nn::activations::ActivationType;
use evotrain_nn::networks::{FeedForwardNetwork, PackagedNetwork};

use std::error::Error;
use std::ops::ControlFlow;
use std::time::Instant;

use tracing::{info, Level};

/// f(x) = 0.002x⁴ - 0.2x² + 0.4x + 3
fn mystery_function(inputs: &[f32]) -> Vec<f32> {
    let x = inputs[0];
    vec![0.002 * x.powi(4) - 0.2 * x.powi(2) + 0.4 * x + 3.0]
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = TrainingConfig {
        population_size: 100,
        survivor_count: 5,
        tests_per_network: 70,
        input_count: 1,
        output_count: 1,
        hidden_height: 5,
        hidden_layer_count: 4,
        mutation_chance: 0.6,
        learning_rate: 1.0,
        activation: ActivationType::ReLU,
        mutate_relative: false,
        random_sampling: true,
        initial_amplitude: 2.5,
        test_range_min: -10.0,
        test_range_max: 10.0,
        termination: Termination::Generations(1000),
        seed: None,
    };
    info!("{}", ron::ser::to_string_pretty(&config, Default::default())?);

    let options = TrainingOptions::new(config)?;
    let mut top_networks = train_test(&options)?;
    report(&mut top_networks)?;
    serde_test(&top_networks[0])?;
    Ok(())
}

fn train_test(options: &TrainingOptions) -> Result<Vec<FeedForwardNetwork>, Box<dyn Error>> {
    let mut logger = EvolutionLogger::new(ReportingLevel::NoNetworks);
    let start = Instant::now();
    let networks = train_with_observer(&mystery_function, options, vec![], |population| {
        logger.log(population);
        ControlFlow::Continue(())
    })?;
    println!("Time for operation: {:.3} seconds", start.elapsed().as_secs_f64());

    for log in logger.iter().filter(|log| log.generation_number % 100 == 0) {
        println!("{}", log);
    }
    Ok(networks)
}

/// Prints the mean, highest and lowest absolute error of each
/// network over 100 evenly spaced points of the training range.
fn report(networks: &mut [FeedForwardNetwork]) -> Result<(), Box<dyn Error>> {
    for (n, network) in networks.iter_mut().enumerate() {
        let (mut total, mut highest, mut lowest) = (0.0, f32::NEG_INFINITY, f32::INFINITY);
        for i in 0..100 {
            let x = 20.0 / 100.0 * i as f32 - 10.0;
            let d = (network.evaluate(&[x])?[0] - mystery_function(&[x])[0]).abs();
            total += d;
            highest = d.max(highest);
            lowest = d.min(lowest);
        }
        println!(
            "TopNet#{}:\tAvgDiff: {:.4}\t\tHighestDiff: {:.4}\tLowestDiff: {:.4}",
            n,
            total / 100.0,
            highest,
            lowest
        );
    }
    Ok(())
}

fn serde_test(champion: &FeedForwardNetwork) -> Result<(), Box<dyn Error>> {
    let package = ron::ser::to_string_pretty(&champion.package()?, Default::default())?;
    println!("{}", package);

    let package: PackagedNetwork = ron::from_str(&package)?;
    let mut restored = FeedForwardNetwork::try_from(package)?;
    let mut champion = champion.clone();
    for x in [-7.5, 0.0, 7.5] {
        assert_eq!(restored.evaluate(&[x])?, champion.evaluate(&[x])?);
    }
    Ok(())
}
