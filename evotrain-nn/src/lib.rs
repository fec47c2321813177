//! # evotrain-nn
//! Strictly layered feed-forward neural networks whose parameters
//! are searched for by mutation rather than by gradient descent,
//! as used by the `evotrain` trainer crate.
//!
//! Provides:
//! - [`ActivationType`]: the activation functions a network may use.
//! - [`FeedForwardNetwork`]: a network built either from random
//!   parameters or by cloning and mutating a parent network.
//! - [`PackagedNetwork`]: a serializable copy of a network's parameters.
//!
//! [`ActivationType`]: crate::activations::ActivationType
//! [`FeedForwardNetwork`]: crate::networks::FeedForwardNetwork
//! [`PackagedNetwork`]: crate::networks::PackagedNetwork
//!
//! # Example usage: mutating a random network
//! ```
//! use evotrain_nn::activations::ActivationType;
//! use evotrain_nn::networks::FeedForwardNetwork;
//!
//! let mut rng = rand::thread_rng();
//!
//! // One input, one output, four hidden layers of five nodes.
//! let mut parent = FeedForwardNetwork::new(1, 1, 5, 4, ActivationType::ReLU);
//! parent.random_initialize(2.5, &mut rng).unwrap();
//!
//! // Each weight and bias has a 60% chance of being nudged.
//! let mut child = FeedForwardNetwork::new(1, 1, 5, 4, ActivationType::ReLU);
//! child.derive_from(&parent, 0.6, 1.0, false, &mut rng).unwrap();
//!
//! for x in [-10.0, 0.0, 10.0] {
//!     let (before, after) = (parent.evaluate(&[x]).unwrap(), child.evaluate(&[x]).unwrap());
//!     println!("{} -> {:?} / {:?}", x, before, after);
//! }
//! ```

pub mod activations;
pub mod networks;
