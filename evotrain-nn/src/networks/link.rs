use std::fmt;

/// A weighted connection from a node in the
/// previous layer, identified by its position
/// in that layer.
#[derive(Clone, Copy, PartialEq)]
pub struct Link {
    pub source: usize,
    pub weight: f32,
}

impl Link {
    /// Creates a new Link from the specified
    /// source node with the given weight.
    pub fn new(source: usize, weight: f32) -> Link {
        Link { source, weight }
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.9}", self.source, self.weight)
    }
}
