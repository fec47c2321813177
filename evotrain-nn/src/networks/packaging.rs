use super::nodes::{InputNode, Neuron};
use super::{check_input_names, FeedForwardNetwork, Layer, Link, NetworkError, Shape};
use crate::activations::ActivationType;

use serde::{Deserialize, Serialize};

/// A plain, serializable copy of a network's parameters.
///
/// Weights are stored per node in link order:
/// `hidden_weights[layer][node][link]` and
/// `output_weights[output][link]`.
///
/// # Examples
/// ```
/// use evotrain_nn::activations::ActivationType;
/// use evotrain_nn::networks::{FeedForwardNetwork, PackagedNetwork};
///
/// let mut network = FeedForwardNetwork::new(2, 1, 3, 2, ActivationType::Sigmoid);
/// network.random_initialize(1.0, &mut rand::thread_rng()).unwrap();
///
/// let package = network.package().unwrap();
/// let mut restored = FeedForwardNetwork::try_from(package).unwrap();
///
/// assert_eq!(restored.evaluate(&[0.2, 0.7]), network.evaluate(&[0.2, 0.7]));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackagedNetwork {
    pub activation: ActivationType,
    pub shape: Shape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_names: Option<Vec<String>>,
    pub hidden_weights: Vec<Vec<Vec<f32>>>,
    pub hidden_biases: Vec<Vec<f32>>,
    pub output_weights: Vec<Vec<f32>>,
    pub output_biases: Vec<f32>,
}

impl TryFrom<&FeedForwardNetwork> for PackagedNetwork {
    type Error = NetworkError;

    fn try_from(network: &FeedForwardNetwork) -> Result<PackagedNetwork, NetworkError> {
        if !network.is_ready() {
            return Err(NetworkError::Uninitialized);
        }
        let weights = |n: &Neuron| n.links().iter().map(|l| l.weight).collect::<Vec<_>>();

        Ok(PackagedNetwork {
            activation: network.activation,
            shape: network.shape,
            input_names: network.input_names.clone().map(Into::into),
            output_names: network.output_names.clone().map(Into::into),
            hidden_weights: network
                .hidden_layers
                .iter()
                .map(|layer| layer.iter().map(weights).collect())
                .collect(),
            hidden_biases: network
                .hidden_layers
                .iter()
                .map(|layer| layer.iter().map(Neuron::bias).collect())
                .collect(),
            output_weights: network.output_layer.iter().map(weights).collect(),
            output_biases: network.output_layer.iter().map(Neuron::bias).collect(),
        })
    }
}

impl TryFrom<PackagedNetwork> for FeedForwardNetwork {
    type Error = NetworkError;

    /// Rebuilds a network from a package, checking that
    /// every array agrees with the declared shape.
    fn try_from(package: PackagedNetwork) -> Result<FeedForwardNetwork, NetworkError> {
        let shape = package.shape;
        if shape.has_zero_dimension() {
            return Err(NetworkError::ZeroDimension(shape));
        }
        check_len("hidden weight layers", package.hidden_weights.len(), shape.hidden_layers)?;
        check_len("hidden bias layers", package.hidden_biases.len(), shape.hidden_layers)?;
        check_len("output weight rows", package.output_weights.len(), shape.outputs)?;
        check_len("output biases", package.output_biases.len(), shape.outputs)?;

        let mut network = FeedForwardNetwork::with_shape(shape, package.activation);
        network.input_layer = vec![InputNode::default(); shape.inputs].into();
        network.hidden_layers = package
            .hidden_weights
            .into_iter()
            .zip(package.hidden_biases)
            .enumerate()
            .map(|(c, (weights, biases))| -> Result<Box<[Neuron]>, NetworkError> {
                let layer = Layer::Hidden(c);
                check_len("hidden layer height", weights.len(), shape.hidden_height)?;
                check_len("hidden layer biases", biases.len(), shape.hidden_height)?;
                weights
                    .into_iter()
                    .zip(biases)
                    .map(|(w, b)| rebuild_neuron(w, b, shape.width_below(layer)))
                    .collect()
            })
            .collect::<Result<_, _>>()?;
        network.output_layer = package
            .output_weights
            .into_iter()
            .zip(package.output_biases)
            .map(|(w, b)| rebuild_neuron(w, b, shape.width_below(Layer::Output)))
            .collect::<Result<_, _>>()?;
        if let Some(names) = package.input_names {
            check_input_names(&names, shape.inputs)
                .map_err(|e| NetworkError::MalformedPackage(e.to_string()))?;
            network.input_names = Some(names.into());
        }
        if let Some(names) = package.output_names {
            check_len("output names", names.len(), shape.outputs)?;
            network.output_names = Some(names.into());
        }
        network.ready = true;
        Ok(network)
    }
}

fn rebuild_neuron(weights: Vec<f32>, bias: f32, width: usize) -> Result<Neuron, NetworkError> {
    check_len("link weights", weights.len(), width)?;
    let links = weights
        .into_iter()
        .enumerate()
        .map(|(source, weight)| Link::new(source, weight))
        .collect();
    Ok(Neuron::new(links, bias))
}

fn check_len(what: &str, found: usize, expected: usize) -> Result<(), NetworkError> {
    if found == expected {
        Ok(())
    } else {
        Err(NetworkError::MalformedPackage(format!(
            "expected {} {}, found {}",
            expected, what, found
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn network() -> FeedForwardNetwork {
        let mut network = FeedForwardNetwork::new(2, 2, 3, 3, ActivationType::LeakyReLU);
        network
            .random_initialize(2.0, &mut ChaCha8Rng::seed_from_u64(10))
            .unwrap();
        network
    }

    #[test]
    fn package_layout() {
        let package = network().package().unwrap();
        assert_eq!(package.hidden_weights.len(), 3);
        assert_eq!(package.hidden_weights[0].len(), 3);
        assert_eq!(package.hidden_weights[0][0].len(), 2);
        assert_eq!(package.hidden_weights[2][1].len(), 3);
        assert_eq!(package.output_weights.len(), 2);
        assert_eq!(package.output_weights[1].len(), 3);
        assert_eq!(package.output_biases.len(), 2);
        assert_eq!(package.input_names, None);
        assert_eq!(package.output_names, None);
    }

    #[test]
    fn unready_network_cannot_be_packaged() {
        let network = FeedForwardNetwork::new(1, 1, 1, 1, ActivationType::ReLU);
        assert_eq!(network.package(), Err(NetworkError::Uninitialized));
    }

    #[test]
    fn restored_network_behaves_identically() {
        let mut original = network();
        original.set_input_names(["a", "b"]).unwrap();
        original.set_output_names(["left", "right"]).unwrap();
        let json = serde_json::to_string(&original.package().unwrap()).unwrap();
        let package: PackagedNetwork = serde_json::from_str(&json).unwrap();
        let mut restored = FeedForwardNetwork::try_from(package).unwrap();

        assert_eq!(restored.input_name(0), Some("a"));
        assert_eq!(restored.output_name(1), Some("right"));
        assert_eq!(
            restored.evaluate_by_name(&[("b", 0.5), ("a", 1.5)]),
            original.evaluate(&[1.5, 0.5])
        );
        for x in -10..10 {
            let inputs = [x as f32 * 0.3, 1.0 - x as f32 * 0.1];
            assert_eq!(restored.evaluate(&inputs), original.evaluate(&inputs));
        }
    }

    #[test]
    fn malformed_packages_are_rejected() {
        let package = network().package().unwrap();

        let mut short_link_row = package.clone();
        short_link_row.hidden_weights[1][0].pop();
        assert!(matches!(
            FeedForwardNetwork::try_from(short_link_row),
            Err(NetworkError::MalformedPackage(_))
        ));

        let mut missing_output = package.clone();
        missing_output.output_biases.pop();
        assert!(matches!(
            FeedForwardNetwork::try_from(missing_output),
            Err(NetworkError::MalformedPackage(_))
        ));

        let mut repeated_names = package.clone();
        repeated_names.input_names = Some(vec!["x".to_string(), "x".to_string()]);
        assert!(matches!(
            FeedForwardNetwork::try_from(repeated_names),
            Err(NetworkError::MalformedPackage(_))
        ));

        let mut too_few_names = package.clone();
        too_few_names.input_names = Some(vec!["x".to_string()]);
        assert!(matches!(
            FeedForwardNetwork::try_from(too_few_names),
            Err(NetworkError::MalformedPackage(_))
        ));

        let mut zero_inputs = package;
        zero_inputs.shape.inputs = 0;
        assert!(matches!(
            FeedForwardNetwork::try_from(zero_inputs),
            Err(NetworkError::ZeroDimension(_))
        ));
    }
}
