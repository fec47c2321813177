use rand::Rng;

/// Parameters of the perturbation applied to each
/// weight and bias of a derived network.
#[derive(Clone, Copy, Debug)]
pub(super) struct Mutation {
    chance: f32,
    magnitude: f32,
    relative: bool,
}

impl Mutation {
    /// `chance` is folded into [0, 1] and `magnitude`
    /// is used by absolute value.
    pub(super) fn new(chance: f32, magnitude: f32, relative: bool) -> Mutation {
        Mutation {
            chance: chance.abs().min(1.0),
            magnitude: magnitude.abs(),
            relative,
        }
    }

    /// Rolls for mutation and, on success, nudges
    /// `value` by a perturbation.
    pub(super) fn apply<R: Rng + ?Sized>(&self, value: &mut f32, rng: &mut R) {
        if self.chance > 0.0 && rng.gen::<f32>() < self.chance {
            let scale = if self.relative { *value } else { 1.0 };
            *value += perturbation(self.magnitude, scale, rng);
        }
    }
}

/// Bell-shaped perturbation bounded by ±2α:
/// `sign(U - 0.5) · (2α·exp(-2χ²) - α) · scale`,
/// with `χ` uniform in [-1, 1) and `U` uniform in [0, 1).
///
/// Not a true normal distribution; the magnitude
/// lies in [α(2e⁻² - 1), α] before scaling.
pub(super) fn perturbation<R: Rng + ?Sized>(magnitude: f32, scale: f32, rng: &mut R) -> f32 {
    let alpha = magnitude.abs();
    let chi = 2.0 * rng.gen::<f32>() - 1.0;
    let u: f64 = rng.gen();
    let sign = if u > 0.5 {
        1.0
    } else if u < 0.5 {
        -1.0
    } else {
        0.0
    };
    sign * (2.0 * alpha * (-2.0 * chi * chi).exp() - alpha) * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn perturbation_is_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..10_000 {
            let delta = perturbation(1.5, 1.0, &mut rng);
            assert!(delta.abs() <= 2.0 * 1.5, "{}", delta);
        }
    }

    #[test]
    fn perturbation_is_symmetric() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let samples: Vec<f32> = (0..20_000)
            .map(|_| perturbation(1.0, 1.0, &mut rng))
            .collect();
        let positive = samples.iter().filter(|d| **d > 0.0).count() as f32;
        let negative = samples.iter().filter(|d| **d < 0.0).count() as f32;
        assert!((positive / negative - 1.0).abs() < 0.1);
        let mean = samples.iter().sum::<f32>() / samples.len() as f32;
        assert!(mean.abs() < 0.05, "{}", mean);
    }

    #[test]
    fn relative_scaling() {
        let mut a = ChaCha8Rng::seed_from_u64(3);
        let mut b = ChaCha8Rng::seed_from_u64(3);
        let absolute = perturbation(0.5, 1.0, &mut a);
        let relative = perturbation(0.5, 4.0, &mut b);
        assert!((relative - 4.0 * absolute).abs() < 1e-6);
    }

    #[test]
    fn zero_chance_never_mutates() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mutation = Mutation::new(0.0, 10.0, false);
        let mut value = 1.25;
        for _ in 0..1000 {
            mutation.apply(&mut value, &mut rng);
        }
        assert_eq!(value, 1.25);
    }

    #[test]
    fn full_chance_always_rolls() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mutation = Mutation::new(-3.0, 1.0, false);
        let mut changed = 0;
        for _ in 0..1000 {
            let mut value = 0.0;
            mutation.apply(&mut value, &mut rng);
            if value != 0.0 {
                changed += 1;
            }
        }
        assert!(changed > 990);
    }
}
