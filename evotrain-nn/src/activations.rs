use serde::{Deserialize, Serialize};

use std::fmt;

/// An ActivationType represents the activation
/// function shared by every hidden and output
/// node of a network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivationType {
    // max(0, x)
    ReLU,
    // max(0.1x, x)
    LeakyReLU,
    // 1 / (1 + exp(-x))
    Sigmoid,
    // ln(1 + exp(x)), saturating at ±f32::MAX
    SoftPlus,
    // tanh(x)
    Tanh,
    // x        if x ≥ 0
    // exp(x)-1 if x < 0
    ELU,
    // x / (1 + exp(-x))
    Swish,
    // 0.5x(1 + tanh(√(2/π)(x + 0.044715x³)))
    GELU,
}

impl ActivationType {
    /// Every available activation type, in declaration order.
    pub const ALL: [ActivationType; 8] = [
        ActivationType::ReLU,
        ActivationType::LeakyReLU,
        ActivationType::Sigmoid,
        ActivationType::SoftPlus,
        ActivationType::Tanh,
        ActivationType::ELU,
        ActivationType::Swish,
        ActivationType::GELU,
    ];

    /// Applies the activation function to `x`.
    ///
    /// # Examples
    /// ```
    /// use evotrain_nn::activations::ActivationType;
    ///
    /// assert_eq!(ActivationType::ReLU.apply(-3.0), 0.0);
    /// assert!((ActivationType::LeakyReLU.apply(-3.0) + 0.3).abs() < 1e-6);
    /// assert_eq!(ActivationType::Sigmoid.apply(0.0), 0.5);
    /// ```
    pub fn apply(self, x: f32) -> f32 {
        match self {
            ActivationType::ReLU => x.max(0.0),
            ActivationType::LeakyReLU => (0.1 * x).max(x),
            ActivationType::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationType::SoftPlus => {
                let y = (1.0 + x.exp()).ln();
                if y == f32::INFINITY {
                    f32::MAX
                } else if y == f32::NEG_INFINITY {
                    f32::MIN
                } else {
                    y
                }
            }
            ActivationType::Tanh => x.tanh(),
            ActivationType::ELU => {
                if x >= 0.0 {
                    x
                } else {
                    x.exp() - 1.0
                }
            }
            ActivationType::Swish => x / (1.0 + (-x).exp()),
            ActivationType::GELU => {
                let inner = (2.0 / std::f32::consts::PI).sqrt() * (x + 0.044715 * x.powi(3));
                0.5 * x * (1.0 + inner.tanh())
            }
        }
    }
}

impl fmt::Display for ActivationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relu_family() {
        for x in -20..=20 {
            let x = x as f32 / 4.0;
            let (relu, leaky) = if x > 0.0 { (x, x) } else { (0.0, 0.1 * x) };
            assert_eq!(ActivationType::ReLU.apply(x), relu);
            assert_eq!(ActivationType::LeakyReLU.apply(x), leaky);
            assert_eq!(ActivationType::ELU.apply(x.abs()), x.abs());
        }
        assert!((ActivationType::ELU.apply(-1.0) - ((-1.0f32).exp() - 1.0)).abs() < 1e-7);
    }

    #[test]
    fn sigmoid_and_tanh_are_bounded() {
        for x in [-1e6, -50.0, -1.0, 0.0, 1.0, 50.0, 1e6] {
            let s = ActivationType::Sigmoid.apply(x);
            let t = ActivationType::Tanh.apply(x);
            assert!((0.0..=1.0).contains(&s), "sigmoid({}) = {}", x, s);
            assert!((-1.0..=1.0).contains(&t), "tanh({}) = {}", x, t);
        }
    }

    #[test]
    fn softplus_saturates_instead_of_overflowing() {
        assert_eq!(ActivationType::SoftPlus.apply(1000.0), f32::MAX);
        assert!((ActivationType::SoftPlus.apply(0.0) - 2.0f32.ln()).abs() < 1e-7);
        assert!(ActivationType::SoftPlus.apply(-1000.0) >= 0.0);
    }

    #[test]
    fn smooth_relu_approximations() {
        assert_eq!(ActivationType::Swish.apply(0.0), 0.0);
        assert_eq!(ActivationType::GELU.apply(0.0), 0.0);
        assert!((ActivationType::Swish.apply(10.0) - 10.0).abs() < 1e-3);
        assert!((ActivationType::GELU.apply(10.0) - 10.0).abs() < 1e-3);
        assert!(ActivationType::GELU.apply(-10.0).abs() < 1e-3);
    }

    #[test]
    fn all_finite_on_finite_inputs() {
        for activation in ActivationType::ALL {
            for x in -100..=100 {
                let y = activation.apply(x as f32);
                assert!(y.is_finite(), "{}({}) = {}", activation, x, y);
            }
        }
    }
}
