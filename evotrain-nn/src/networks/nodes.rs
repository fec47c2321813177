use super::errors::NetworkError;
use super::link::Link;
use super::mutation::Mutation;
use crate::activations::ActivationType;

use rand::Rng;

use std::fmt;

/// Position of a node layer within a network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// Externally assigned values.
    Input,
    /// Hidden layer by index, counting from the input side.
    Hidden(usize),
    /// Network results.
    Output,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Input => write!(f, "input"),
            Layer::Hidden(c) => write!(f, "hidden[{}]", c),
            Layer::Output => write!(f, "output"),
        }
    }
}

/// A leaf node holding an externally supplied value.
#[derive(Clone, Debug, Default, PartialEq)]
pub(super) struct InputNode {
    value: Option<f32>,
}

impl InputNode {
    pub(super) fn set(&mut self, value: f32) {
        self.value = Some(value);
    }

    pub(super) fn value(&self, index: usize) -> Result<f32, NetworkError> {
        self.value.ok_or(NetworkError::MissingInputValue(index))
    }
}

/// A hidden or output node: weighted links into
/// the previous layer, a bias, and the value
/// memoized during the current evaluation.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct Neuron {
    links: Box<[Link]>,
    bias: f32,
    cached: Option<f32>,
}

impl Neuron {
    pub(super) fn new(links: Box<[Link]>, bias: f32) -> Neuron {
        Neuron {
            links,
            bias,
            cached: None,
        }
    }

    /// A neuron linked to every node of a `width`-wide
    /// layer, with weights and bias uniform in ±`amplitude`.
    pub(super) fn random<R: Rng + ?Sized>(width: usize, amplitude: f32, rng: &mut R) -> Neuron {
        let links = (0..width)
            .map(|source| Link::new(source, rng.gen_range(-amplitude..amplitude)))
            .collect();
        Neuron::new(links, rng.gen_range(-amplitude..amplitude))
    }

    /// A copy of this neuron's parameters with nothing memoized.
    pub(super) fn copy(&self) -> Neuron {
        Neuron::new(self.links.clone(), self.bias)
    }

    /// A copy of this neuron's parameters, each rolled
    /// for mutation (links in order, then the bias).
    pub(super) fn derive<R: Rng + ?Sized>(&self, mutation: &Mutation, rng: &mut R) -> Neuron {
        let links = self
            .links
            .iter()
            .map(|link| {
                let mut weight = link.weight;
                mutation.apply(&mut weight, rng);
                Link::new(link.source, weight)
            })
            .collect();
        let mut bias = self.bias;
        mutation.apply(&mut bias, rng);
        Neuron::new(links, bias)
    }

    pub(super) fn links(&self) -> &[Link] {
        &self.links
    }

    pub(super) fn bias(&self) -> f32 {
        self.bias
    }

    pub(super) fn clear(&mut self) {
        self.cached = None;
    }

    /// Returns the cached value, or computes and caches
    /// `activation(Σ weight·source + bias)`, fetching each
    /// source through `source_value`.
    pub(super) fn value<F>(
        &mut self,
        activation: ActivationType,
        mut source_value: F,
    ) -> Result<f32, NetworkError>
    where
        F: FnMut(usize) -> Result<f32, NetworkError>,
    {
        if let Some(value) = self.cached {
            return Ok(value);
        }
        let mut sum = 0.0;
        for link in self.links.iter() {
            sum += link.weight * source_value(link.source)?;
        }
        let value = activation.apply(sum + self.bias);
        self.cached = Some(value);
        Ok(value)
    }
}

impl fmt::Display for Neuron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Neuron[B: {}, LC: {}]", self.bias, self.links.len())
    }
}
