use super::Shape;

use thiserror::Error;

/// An error type indicating misuse of a
/// [`FeedForwardNetwork`], or a parent/package
/// that does not fit it.
///
/// [`FeedForwardNetwork`]: crate::networks::FeedForwardNetwork
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    /// The network was already randomly initialized or derived.
    #[error("network is already initialized")]
    AlreadyInitialized,
    /// The network (or a parent network) has not been initialized.
    #[error("network has not been initialized")]
    Uninitialized,
    /// One of the network's layer dimensions is zero.
    #[error("network dimensions must be non-zero, got {0}")]
    ZeroDimension(Shape),
    /// The random weight amplitude is not strictly positive.
    #[error("initial weight amplitude must be positive, got {0}")]
    InvalidAmplitude(f32),
    /// The parent network's shape differs from this network's.
    #[error("network shape {found} does not match expected shape {expected}")]
    DimensionMismatch { expected: Shape, found: Shape },
    /// The number of supplied input values differs from the input count.
    #[error("expected {expected} input values, got {found}")]
    InputLengthMismatch { expected: usize, found: usize },
    /// An input node was read before a value was assigned to it.
    #[error("input node {0} has no value")]
    MissingInputValue(usize),
    /// The number of output names differs from the output count.
    #[error("expected {expected} output names, got {found}")]
    OutputNameCount { expected: usize, found: usize },
    /// The number of input names differs from the input count.
    #[error("expected {expected} input names, got {found}")]
    InputNameCount { expected: usize, found: usize },
    /// Inputs were addressed by name on a network without input names.
    #[error("network inputs have no names")]
    UnnamedInputs,
    /// A named input does not exist in the network.
    #[error("no input named {0:?}")]
    UnknownInput(String),
    /// An input name was given more than once.
    #[error("input {0:?} is named more than once")]
    DuplicateInput(String),
    /// A packaged network's arrays do not agree with its declared shape.
    #[error("malformed network package: {0}")]
    MalformedPackage(String),
}
