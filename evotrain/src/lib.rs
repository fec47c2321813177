//! A generational evolutionary trainer for the small feed-forward
//! neural networks of the `evotrain-nn` crate.
//!
//! Given a target function and a network shape, each generation
//! is built from the survivors of the last: the survivors are
//! carried over unchanged, and the remaining slots are filled with
//! mutated copies of them. Every network is scored by its sum of
//! squared errors against the target on sampled inputs, in
//! parallel, and the lowest scores survive.
//!
//! Generations can be stepped one at a time through a
//! [`Population`], or run to completion with [`train_on_function`].
//!
//! # Example usage: approximating a quadratic
//! ```
//! use evotrain::{train_on_function, Termination, TrainingConfig, TrainingOptions};
//! use evotrain_nn::activations::ActivationType;
//!
//! fn parabola(x: &[f32]) -> Vec<f32> {
//!     vec![x[0] * x[0] - 1.0]
//! }
//!
//! fn main() {
//!     let options = TrainingOptions::new(TrainingConfig {
//!         population_size: 50,
//!         survivor_count: 5,
//!         tests_per_network: 30,
//!         input_count: 1,
//!         output_count: 1,
//!         hidden_height: 4,
//!         hidden_layer_count: 2,
//!         mutation_chance: 0.6,
//!         learning_rate: 0.5,
//!         activation: ActivationType::LeakyReLU,
//!         random_sampling: false,
//!         test_range_min: -2.0,
//!         test_range_max: 2.0,
//!         termination: Termination::Generations(50),
//!         seed: Some(1),
//!         ..TrainingConfig::default()
//!     })
//!     .unwrap();
//!
//!     let mut networks = train_on_function(&parabola, &options, vec![]).unwrap();
//!     let champion = &mut networks[0];
//!     println!("f(1.5) ≈ {:?}", champion.evaluate(&[1.5]).unwrap());
//! }
//! ```

mod populations;
mod rng;

pub use populations::*;
