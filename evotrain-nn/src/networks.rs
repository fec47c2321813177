//! A [`FeedForwardNetwork`] is a strictly layered, fully
//! connected neural network: an input layer, a rectangular
//! block of hidden layers, and an output layer, with every
//! hidden and output node sharing one activation function.
//!
//! Networks are built empty and then populated exactly once,
//! either with random parameters or by deriving (cloning and
//! mutating) a parent network of the same shape. Links refer to
//! nodes of the previous layer by position, so a network never
//! holds references into another network.
mod errors;
mod link;
mod mutation;
mod nodes;
mod packaging;

pub use errors::NetworkError;
pub use link::Link;
pub use nodes::Layer;
pub use packaging::PackagedNetwork;

use crate::activations::ActivationType;
use mutation::Mutation;
use nodes::{InputNode, Neuron};

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

/// Name reported for inputs and outputs that were never named.
pub const UNNAMED: &str = "UNNAMED";

/// Layer dimensions of a network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    /// Number of input nodes.
    pub inputs: usize,
    /// Number of nodes in each hidden layer.
    pub hidden_height: usize,
    /// Number of hidden layers.
    pub hidden_layers: usize,
    /// Number of output nodes.
    pub outputs: usize,
}

impl Shape {
    /// Returns `true` if any of the dimensions is zero.
    pub fn has_zero_dimension(&self) -> bool {
        self.inputs == 0 || self.hidden_height == 0 || self.hidden_layers == 0 || self.outputs == 0
    }

    /// Number of links feeding each node of `layer`.
    fn width_below(&self, layer: Layer) -> usize {
        match layer {
            Layer::Input => 0,
            Layer::Hidden(0) => self.inputs,
            Layer::Hidden(_) | Layer::Output => self.hidden_height,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-[{}x{}]-{}",
            self.inputs, self.hidden_layers, self.hidden_height, self.outputs
        )
    }
}

/// A layered feed-forward neural network.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedForwardNetwork {
    shape: Shape,
    activation: ActivationType,
    input_layer: Box<[InputNode]>,
    hidden_layers: Box<[Box<[Neuron]>]>,
    output_layer: Box<[Neuron]>,
    input_names: Option<Box<[String]>>,
    output_names: Option<Box<[String]>>,
    ready: bool,
}

impl FeedForwardNetwork {
    /// Creates an empty, uninitialized network of the given shape.
    /// It must be populated with [`random_initialize`] or
    /// [`derive_from`] before it can be evaluated.
    ///
    /// [`random_initialize`]: FeedForwardNetwork::random_initialize
    /// [`derive_from`]: FeedForwardNetwork::derive_from
    ///
    /// # Examples
    /// ```
    /// use evotrain_nn::activations::ActivationType;
    /// use evotrain_nn::networks::FeedForwardNetwork;
    ///
    /// let network = FeedForwardNetwork::new(3, 2, 5, 4, ActivationType::ReLU);
    /// assert!(!network.is_ready());
    /// assert_eq!(network.shape().hidden_layers, 4);
    /// ```
    pub fn new(
        inputs: usize,
        outputs: usize,
        hidden_height: usize,
        hidden_layers: usize,
        activation: ActivationType,
    ) -> FeedForwardNetwork {
        FeedForwardNetwork::with_shape(
            Shape {
                inputs,
                hidden_height,
                hidden_layers,
                outputs,
            },
            activation,
        )
    }

    /// Creates an empty, uninitialized network of the given shape.
    pub fn with_shape(shape: Shape, activation: ActivationType) -> FeedForwardNetwork {
        FeedForwardNetwork {
            shape,
            activation,
            input_layer: Box::default(),
            hidden_layers: Box::default(),
            output_layer: Box::default(),
            input_names: None,
            output_names: None,
            ready: false,
        }
    }

    /// Populates the network with random parameters.
    /// Every weight and bias is drawn uniformly from
    /// `[-amplitude, amplitude)`.
    ///
    /// # Errors
    /// Returns an error if the network is already initialized,
    /// any of its dimensions is zero, or `amplitude` is not
    /// strictly positive.
    ///
    /// # Examples
    /// ```
    /// use evotrain_nn::activations::ActivationType;
    /// use evotrain_nn::networks::FeedForwardNetwork;
    ///
    /// let mut network = FeedForwardNetwork::new(2, 1, 3, 2, ActivationType::Tanh);
    /// network.random_initialize(1.0, &mut rand::thread_rng()).unwrap();
    ///
    /// assert!(network.is_ready());
    /// assert!(network.random_initialize(1.0, &mut rand::thread_rng()).is_err());
    /// ```
    pub fn random_initialize<R: Rng + ?Sized>(
        &mut self,
        amplitude: f32,
        rng: &mut R,
    ) -> Result<(), NetworkError> {
        self.check_buildable()?;
        // Also rejects NaN.
        if !(amplitude > 0.0) || amplitude.is_infinite() {
            return Err(NetworkError::InvalidAmplitude(amplitude));
        }

        let shape = self.shape;
        self.input_layer = vec![InputNode::default(); shape.inputs].into();
        self.hidden_layers = (0..shape.hidden_layers)
            .map(|c| {
                let width = shape.width_below(Layer::Hidden(c));
                (0..shape.hidden_height)
                    .map(|_| Neuron::random(width, amplitude, rng))
                    .collect()
            })
            .collect();
        self.output_layer = (0..shape.outputs)
            .map(|_| Neuron::random(shape.width_below(Layer::Output), amplitude, rng))
            .collect();
        self.ready = true;
        Ok(())
    }

    /// Populates the network with a copy of `parent`'s parameters,
    /// where each weight and bias independently has a
    /// `mutation_chance` probability of being perturbed by a
    /// bell-shaped random amount bounded by `2·|magnitude|`.
    /// If `relative` is set, the perturbation is scaled by the
    /// parameter's current value.
    ///
    /// A `mutation_chance` of 0 produces an exact clone. Input
    /// and output names are carried over; input values are not.
    ///
    /// # Errors
    /// Returns an error if this network is already initialized,
    /// the parent is not, or the two differ in shape.
    ///
    /// # Examples
    /// ```
    /// use evotrain_nn::activations::ActivationType;
    /// use evotrain_nn::networks::FeedForwardNetwork;
    ///
    /// let mut rng = rand::thread_rng();
    /// let mut parent = FeedForwardNetwork::new(1, 1, 4, 2, ActivationType::ReLU);
    /// parent.random_initialize(1.0, &mut rng).unwrap();
    ///
    /// let mut clone = FeedForwardNetwork::new(1, 1, 4, 2, ActivationType::ReLU);
    /// clone.derive_from(&parent, 0.0, 1.0, false, &mut rng).unwrap();
    /// assert_eq!(clone.evaluate(&[0.3]).unwrap(), parent.evaluate(&[0.3]).unwrap());
    ///
    /// let mut wrong_shape = FeedForwardNetwork::new(2, 1, 4, 2, ActivationType::ReLU);
    /// assert!(wrong_shape.derive_from(&parent, 0.5, 1.0, false, &mut rng).is_err());
    /// ```
    pub fn derive_from<R: Rng + ?Sized>(
        &mut self,
        parent: &FeedForwardNetwork,
        mutation_chance: f32,
        magnitude: f32,
        relative: bool,
        rng: &mut R,
    ) -> Result<(), NetworkError> {
        let mutation = Mutation::new(mutation_chance, magnitude, relative);
        self.copy_from(parent, |neuron| neuron.derive(&mutation, rng))
    }

    /// Populates the network with an unmutated copy of `parent`.
    ///
    /// # Errors
    /// As for [`derive_from`](FeedForwardNetwork::derive_from).
    pub fn clone_from_parent(&mut self, parent: &FeedForwardNetwork) -> Result<(), NetworkError> {
        self.copy_from(parent, Neuron::copy)
    }

    /// Rebuilds every layer from `parent`, passing each of its
    /// neurons through `rebuild` in layer order.
    fn copy_from<F>(
        &mut self,
        parent: &FeedForwardNetwork,
        mut rebuild: F,
    ) -> Result<(), NetworkError>
    where
        F: FnMut(&Neuron) -> Neuron,
    {
        if self.ready {
            return Err(NetworkError::AlreadyInitialized);
        }
        if !parent.ready {
            return Err(NetworkError::Uninitialized);
        }
        if parent.shape != self.shape {
            return Err(NetworkError::DimensionMismatch {
                expected: self.shape,
                found: parent.shape,
            });
        }

        // Each layer is rebuilt in full before the next one,
        // with links keeping their positions in the layer below.
        self.input_layer = vec![InputNode::default(); self.shape.inputs].into();
        self.hidden_layers = parent
            .hidden_layers
            .iter()
            .map(|layer| layer.iter().map(&mut rebuild).collect())
            .collect();
        self.output_layer = parent.output_layer.iter().map(&mut rebuild).collect();
        self.input_names = parent.input_names.clone();
        self.output_names = parent.output_names.clone();
        self.ready = true;
        Ok(())
    }

    /// Evaluates the network at the point given by `inputs`,
    /// returning one value per output node in declaration order.
    ///
    /// Every hidden and output node is computed at most once per
    /// call; the memoized values are discarded at the start of
    /// the next call.
    ///
    /// # Errors
    /// Returns an error if the network is uninitialized or
    /// `inputs` has the wrong length.
    ///
    /// # Examples
    /// ```
    /// use evotrain_nn::activations::ActivationType;
    /// use evotrain_nn::networks::FeedForwardNetwork;
    ///
    /// let mut network = FeedForwardNetwork::new(3, 2, 4, 3, ActivationType::Sigmoid);
    /// assert!(network.evaluate(&[0.0, 0.0, 0.0]).is_err());
    ///
    /// network.random_initialize(2.0, &mut rand::thread_rng()).unwrap();
    /// let outputs = network.evaluate(&[0.1, -0.4, 2.0]).unwrap();
    /// assert_eq!(outputs.len(), 2);
    /// assert!(network.evaluate(&[0.1]).is_err());
    /// ```
    pub fn evaluate(&mut self, inputs: &[f32]) -> Result<Vec<f32>, NetworkError> {
        if !self.ready {
            return Err(NetworkError::Uninitialized);
        }
        if inputs.len() != self.input_layer.len() {
            return Err(NetworkError::InputLengthMismatch {
                expected: self.input_layer.len(),
                found: inputs.len(),
            });
        }

        for (node, value) in self.input_layer.iter_mut().zip(inputs) {
            node.set(*value);
        }
        for neuron in self
            .hidden_layers
            .iter_mut()
            .flat_map(|layer| layer.iter_mut())
            .chain(self.output_layer.iter_mut())
        {
            neuron.clear();
        }

        let activation = self.activation;
        let input_layer = &self.input_layer;
        let hidden_layers: &mut [Box<[Neuron]>] = &mut self.hidden_layers;
        self.output_layer
            .iter_mut()
            .map(|output| {
                output.value(activation, |source| {
                    hidden_value(input_layer, hidden_layers, source, activation)
                })
            })
            .collect()
    }

    /// Evaluates the network with inputs addressed by name,
    /// in any order. Every input must be named exactly once.
    ///
    /// # Errors
    /// Returns an error if the network is uninitialized, its
    /// inputs were never named, or a name is unknown, repeated
    /// or missing.
    ///
    /// # Examples
    /// ```
    /// use evotrain_nn::activations::ActivationType;
    /// use evotrain_nn::networks::FeedForwardNetwork;
    ///
    /// let mut network = FeedForwardNetwork::new(2, 1, 3, 1, ActivationType::Tanh);
    /// network.random_initialize(1.0, &mut rand::thread_rng()).unwrap();
    /// network.set_input_names(["x", "y"]).unwrap();
    ///
    /// let by_name = network.evaluate_by_name(&[("y", 0.25), ("x", -1.0)]).unwrap();
    /// assert_eq!(by_name, network.evaluate(&[-1.0, 0.25]).unwrap());
    /// assert!(network.evaluate_by_name(&[("x", 1.0), ("z", 0.0)]).is_err());
    /// ```
    pub fn evaluate_by_name(&mut self, inputs: &[(&str, f32)]) -> Result<Vec<f32>, NetworkError> {
        if !self.ready {
            return Err(NetworkError::Uninitialized);
        }
        let Some(names) = &self.input_names else {
            return Err(NetworkError::UnnamedInputs);
        };
        let mut values = vec![None; names.len()];
        for &(name, value) in inputs {
            let index = names
                .iter()
                .position(|n| n == name)
                .ok_or_else(|| NetworkError::UnknownInput(name.to_string()))?;
            if values[index].replace(value).is_some() {
                return Err(NetworkError::DuplicateInput(name.to_string()));
            }
        }
        let values = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| v.ok_or(NetworkError::MissingInputValue(i)))
            .collect::<Result<Vec<_>, _>>()?;
        self.evaluate(&values)
    }

    /// Assigns names to the input nodes, in order. Names must be
    /// distinct and have no effect on computation.
    ///
    /// # Errors
    /// Returns an error if the network is uninitialized, the
    /// number of names differs from the input count, or a name
    /// is repeated.
    pub fn set_input_names<I, S>(&mut self, names: I) -> Result<(), NetworkError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !self.ready {
            return Err(NetworkError::Uninitialized);
        }
        let names: Box<[String]> = names.into_iter().map(Into::into).collect();
        check_input_names(&names, self.shape.inputs)?;
        self.input_names = Some(names);
        Ok(())
    }

    /// Returns the name of input `index`, if one was set.
    pub fn input_name(&self, index: usize) -> Option<&str> {
        self.input_names
            .as_ref()
            .and_then(|names| names.get(index))
            .map(String::as_str)
    }

    /// Assigns display names to the output nodes, in order.
    /// Names have no effect on computation.
    ///
    /// # Errors
    /// Returns an error if the network is uninitialized or
    /// the number of names differs from the output count.
    ///
    /// # Examples
    /// ```
    /// use evotrain_nn::activations::ActivationType;
    /// use evotrain_nn::networks::FeedForwardNetwork;
    ///
    /// let mut network = FeedForwardNetwork::new(1, 2, 2, 1, ActivationType::ReLU);
    /// network.random_initialize(1.0, &mut rand::thread_rng()).unwrap();
    /// network.set_output_names(["alpha", "beta"]).unwrap();
    ///
    /// let named = network.evaluate_named(&[0.5]).unwrap();
    /// assert_eq!(named[1].0, "beta");
    /// ```
    pub fn set_output_names<I, S>(&mut self, names: I) -> Result<(), NetworkError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !self.ready {
            return Err(NetworkError::Uninitialized);
        }
        let names: Box<[String]> = names.into_iter().map(Into::into).collect();
        if names.len() != self.shape.outputs {
            return Err(NetworkError::OutputNameCount {
                expected: self.shape.outputs,
                found: names.len(),
            });
        }
        self.output_names = Some(names);
        Ok(())
    }

    /// Like [`evaluate`](FeedForwardNetwork::evaluate), pairing each
    /// output value with its display name.
    pub fn evaluate_named(&mut self, inputs: &[f32]) -> Result<Vec<(&str, f32)>, NetworkError> {
        let values = self.evaluate(inputs)?;
        Ok(values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (self.output_name(i).unwrap_or(UNNAMED), v))
            .collect())
    }

    /// Returns the display name of output `index`, if one was set.
    pub fn output_name(&self, index: usize) -> Option<&str> {
        self.output_names
            .as_ref()
            .and_then(|names| names.get(index))
            .map(String::as_str)
    }

    /// Returns the weights of the links feeding node `index`
    /// of `layer`, in source order. `None` for input nodes,
    /// out-of-range positions and uninitialized networks.
    pub fn weights(&self, layer: Layer, index: usize) -> Option<impl Iterator<Item = f32> + '_> {
        self.neuron(layer, index)
            .map(|n| n.links().iter().map(|link| link.weight))
    }

    /// Returns the bias of node `index` of `layer`, if it has one.
    pub fn bias(&self, layer: Layer, index: usize) -> Option<f32> {
        self.neuron(layer, index).map(|n| n.bias())
    }

    fn neuron(&self, layer: Layer, index: usize) -> Option<&Neuron> {
        match layer {
            Layer::Input => None,
            Layer::Hidden(c) => self.hidden_layers.get(c)?.get(index),
            Layer::Output => self.output_layer.get(index),
        }
    }

    /// Returns the network's layer dimensions.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Returns the activation function used by hidden
    /// and output nodes.
    pub fn activation(&self) -> ActivationType {
        self.activation
    }

    /// Returns whether the network has been populated.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn input_count(&self) -> usize {
        self.shape.inputs
    }

    pub fn output_count(&self) -> usize {
        self.shape.outputs
    }

    pub fn hidden_height(&self) -> usize {
        self.shape.hidden_height
    }

    pub fn hidden_layer_count(&self) -> usize {
        self.shape.hidden_layers
    }

    /// Packages the network's parameters for persistence.
    ///
    /// # Errors
    /// Returns an error if the network is uninitialized.
    pub fn package(&self) -> Result<PackagedNetwork, NetworkError> {
        PackagedNetwork::try_from(self)
    }

    fn check_buildable(&self) -> Result<(), NetworkError> {
        if self.ready {
            Err(NetworkError::AlreadyInitialized)
        } else if self.shape.has_zero_dimension() {
            Err(NetworkError::ZeroDimension(self.shape))
        } else {
            Ok(())
        }
    }
}

/// Checks that `names` holds `inputs` distinct names.
fn check_input_names(names: &[String], inputs: usize) -> Result<(), NetworkError> {
    if names.len() != inputs {
        return Err(NetworkError::InputNameCount {
            expected: inputs,
            found: names.len(),
        });
    }
    match names
        .iter()
        .enumerate()
        .find(|(i, name)| names[..*i].contains(*name))
    {
        Some((_, name)) => Err(NetworkError::DuplicateInput(name.clone())),
        None => Ok(()),
    }
}

/// Value of node `index` in the topmost layer of `hidden`,
/// or of input `index` once no hidden layers remain. Each
/// recursion step descends one layer, so a node's sources
/// are always in the slice below it.
fn hidden_value(
    inputs: &[InputNode],
    hidden: &mut [Box<[Neuron]>],
    index: usize,
    activation: ActivationType,
) -> Result<f32, NetworkError> {
    match hidden.split_last_mut() {
        None => inputs
            .get(index)
            .ok_or(NetworkError::MissingInputValue(index))?
            .value(index),
        Some((top, below)) => top[index].value(activation, |source| {
            hidden_value(inputs, below, source, activation)
        }),
    }
}

impl fmt::Display for FeedForwardNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FeedForwardNetwork[{}, {}]", self.shape, self.activation)?;
        for (c, layer) in self.hidden_layers.iter().enumerate() {
            write!(f, "\t{}:", Layer::Hidden(c))?;
            for neuron in layer.iter() {
                write!(f, " {}", neuron)?;
            }
            writeln!(f)?;
        }
        write!(f, "\t{}:", Layer::Output)?;
        for (i, neuron) in self.output_layer.iter().enumerate() {
            write!(f, " {}={}", self.output_name(i).unwrap_or(UNNAMED), neuron)?;
        }
        Ok(())
    }
}
