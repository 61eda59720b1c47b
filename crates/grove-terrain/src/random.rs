//! Random sources and the statistical primitives used by scene population.
//!
//! Nothing in this crate touches a global RNG. Every random decision is drawn
//! from a generator passed in by the caller, normally the [`ChaCha8Rng`]
//! returned by [`scene_rng`], so a seed fully determines a generated scene.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Above this mean, `e^-lambda` is too small for Knuth's product method and
/// [`poisson`] switches to a normal approximation.
const KNUTH_LAMBDA_LIMIT: f64 = 500.0;

/// Deterministic RNG for one generation pass.
pub fn scene_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Approximate normal deviate with the given mean and standard deviation.
///
/// Sums twelve `U[0, 1)` samples and subtracts 6 (Irwin–Hall), which has unit
/// variance. The result is approximate and bounded to `mean ± 6·std`.
/// A zero `std` returns `mean` without consuming randomness.
pub fn normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std: f64) -> f64 {
    if std == 0.0 {
        return mean;
    }
    let sum: f64 = (0..12).map(|_| rng.random::<f64>()).sum();
    std * (sum - 6.0) + mean
}

/// Poisson-distributed count with mean `lambda`.
///
/// Uses Knuth's multiplication method: multiply uniforms into a running
/// product until it drops to `e^-lambda` or below; the number of draws minus
/// one is the count. `lambda <= 0` (or NaN) returns 0. Very large means fall
/// back to a rounded normal approximation clamped at 0.
pub fn poisson<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> u32 {
    if lambda.is_nan() || lambda <= 0.0 {
        return 0;
    }
    if lambda > KNUTH_LAMBDA_LIMIT {
        let approx = normal(rng, lambda, lambda.sqrt()).round().max(0.0);
        return approx.min(u32::MAX as f64) as u32;
    }

    let limit = (-lambda).exp();
    let mut count: u32 = 0;
    let mut product = 1.0;
    loop {
        count += 1;
        product *= rng.random::<f64>();
        if product <= limit {
            break;
        }
    }
    count - 1
}

/// Uniform angle in `[0, 2π)`.
pub fn angle<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random_range(0.0..std::f64::consts::TAU)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mean_and_std(samples: &[f64]) -> (f64, f64) {
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1.0);
        (mean, var.sqrt())
    }

    #[test]
    fn test_poisson_zero_lambda_is_zero() {
        let mut rng = scene_rng(1);
        for _ in 0..1000 {
            assert_eq!(poisson(&mut rng, 0.0), 0);
        }
    }

    #[test]
    fn test_poisson_degenerate_lambda_is_zero() {
        let mut rng = scene_rng(2);
        assert_eq!(poisson(&mut rng, -3.0), 0);
        assert_eq!(poisson(&mut rng, f64::NAN), 0);
    }

    #[test]
    fn test_poisson_mean_converges() {
        let mut rng = scene_rng(42);
        let n = 100_000;
        let total: u64 = (0..n).map(|_| poisson(&mut rng, 10.0) as u64).sum();
        let mean = total as f64 / n as f64;
        assert!(
            (9.8..=10.2).contains(&mean),
            "Poisson(10) sample mean {mean} outside [9.8, 10.2]"
        );
    }

    #[test]
    fn test_poisson_variance_matches_mean() {
        let mut rng = scene_rng(7);
        let samples: Vec<f64> = (0..50_000).map(|_| poisson(&mut rng, 4.0) as f64).collect();
        let (mean, std) = mean_and_std(&samples);
        assert!((mean - 4.0).abs() < 0.1, "mean {mean}");
        assert!((std * std - 4.0).abs() < 0.25, "variance {}", std * std);
    }

    #[test]
    fn test_poisson_large_lambda_uses_approximation() {
        let mut rng = scene_rng(9);
        let samples: Vec<f64> = (0..2_000).map(|_| poisson(&mut rng, 10_000.0) as f64).collect();
        let (mean, _) = mean_and_std(&samples);
        assert!((mean - 10_000.0).abs() < 15.0, "mean {mean}");
    }

    #[test]
    fn test_normal_moments() {
        let mut rng = scene_rng(3);
        let samples: Vec<f64> = (0..100_000).map(|_| normal(&mut rng, 4.0, 1.5)).collect();
        let (mean, std) = mean_and_std(&samples);
        assert!((mean - 4.0).abs() < 0.03, "sample mean {mean} too far from 4.0");
        assert!((std - 1.5).abs() < 0.03, "sample std {std} too far from 1.5");
    }

    #[test]
    fn test_normal_is_bounded() {
        let mut rng = scene_rng(4);
        for _ in 0..10_000 {
            let x = normal(&mut rng, 110.0, 10.0);
            assert!((50.0..=170.0).contains(&x), "{x} outside mean ± 6·std");
        }
    }

    #[test]
    fn test_normal_zero_std_returns_mean() {
        let mut rng = scene_rng(5);
        assert_eq!(normal(&mut rng, 1.25, 0.0), 1.25);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = scene_rng(99);
        let mut b = scene_rng(99);
        for _ in 0..100 {
            assert_eq!(poisson(&mut a, 3.0), poisson(&mut b, 3.0));
            assert_eq!(angle(&mut a), angle(&mut b));
        }
    }
}
