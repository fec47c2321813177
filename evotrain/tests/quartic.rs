use evotrain::{
    evaluate_fitness, train_on_function, Population, Termination, TrainingConfig, TrainingOptions,
};
use evotrain_nn::activations::ActivationType;
use evotrain_nn::networks::{FeedForwardNetwork, PackagedNetwork};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// f(x) = 0.002x⁴ - 0.2x² + 0.4x + 3
fn quartic(inputs: &[f32]) -> Vec<f32> {
    let x = inputs[0];
    vec![0.002 * x.powi(4) - 0.2 * x.powi(2) + 0.4 * x + 3.0]
}

fn config(generations: usize) -> TrainingConfig {
    TrainingConfig {
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
        termination: Termination::Generations(generations),
        seed: Some(0x5EED),
    }
}

/// Mean absolute error over 100 evenly spaced points in [-10, 10).
fn mean_absolute_error(network: &mut FeedForwardNetwork) -> f32 {
    let total: f32 = (0..100)
        .map(|i| {
            let x = 20.0 / 100.0 * i as f32 - 10.0;
            (network.evaluate(&[x]).unwrap()[0] - quartic(&[x])[0]).abs()
        })
        .sum();
    total / 100.0
}

#[test]
fn champion_improves_over_a_thousand_generations() {
    let mut population = Population::new(TrainingOptions::new(config(1000)).unwrap());

    population.evolve(&quartic).unwrap();
    let mut first = population.champion().unwrap().clone();

    while population.generation() < 1000 {
        population.evolve(&quartic).unwrap();
    }
    let mut last = population.champion().unwrap().clone();

    let (before, after) = (
        mean_absolute_error(&mut first),
        mean_absolute_error(&mut last),
    );
    assert!(after < before, "error went from {} to {}", before, after);
}

#[test]
fn survivor_count_of_zero_is_rejected() {
    let config = TrainingConfig {
        population_size: 4,
        survivor_count: 0,
        ..config(10)
    };
    assert!(TrainingOptions::new(config).is_err());
}

#[test]
fn training_resumes_from_packaged_networks() {
    let options = TrainingOptions::new(TrainingConfig {
        random_sampling: false,
        ..config(30)
    })
    .unwrap();
    let survivors = train_on_function(&quartic, &options, vec![]).unwrap();
    assert_eq!(survivors.len(), 5);

    let json = serde_json::to_string(&survivors[0].package().unwrap()).unwrap();
    let package: PackagedNetwork = serde_json::from_str(&json).unwrap();
    let mut restored = FeedForwardNetwork::try_from(package).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let restored_score = evaluate_fitness(&quartic, &mut restored, &options, &mut rng).unwrap();

    let mut resumed = train_on_function(&quartic, &options, vec![restored]).unwrap();
    let resumed_score = evaluate_fitness(&quartic, &mut resumed[0], &options, &mut rng).unwrap();
    assert!(resumed_score <= restored_score);
}
