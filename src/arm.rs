//! Distribution-backed arms.
//!
//! Each arm owns its true parameter(s) and the append-only list of rewards it has
//! produced. Estimates are maximum-likelihood estimates recomputed from that list:
//! - location: sample mean;
//! - scale: population standard deviation (divisor `n`).
//!
//! An arm with no observations reports an estimate of `+inf`. Under max-seeking
//! comparison this makes an unexplored arm look best, so it is pulled before any
//! arm with a finite estimate is trusted as optimal.
//!
//! Two-parameter families expose their extra estimate through the
//! [`TwoParameterArm`] capability rather than a shared field.

use std::cmp::Ordering;
use std::fmt;

use rand::RngCore;
use rand_distr::{Bernoulli, Distribution, Normal, Poisson};

use crate::error::{BanditError, Result};
use crate::registry::{Arity, DistributionKind};

/// One bandit lever.
pub trait Arm: fmt::Debug + Send {
    /// Distribution family of this arm.
    fn distribution(&self) -> DistributionKind;

    /// True primary parameter (probability, rate, or mean).
    fn parameter(&self) -> f64;

    /// Every reward drawn so far, in pull order.
    fn observed(&self) -> &[f64];

    /// Draw one reward from the true distribution, record it, and return it.
    fn pull(&mut self, rng: &mut dyn RngCore) -> f64;

    /// Secondary-parameter capability, if the family has one.
    fn as_two_parameter(&self) -> Option<&dyn TwoParameterArm> {
        None
    }

    fn arity(&self) -> Arity {
        self.distribution().arity()
    }

    fn pulls(&self) -> usize {
        self.observed().len()
    }

    /// MLE of the primary parameter; `+inf` before the first pull.
    fn parameter_estimate(&self) -> f64 {
        sample_mean(self.observed())
    }

    /// `parameter - parameter_estimate`.
    fn residual(&self) -> f64 {
        self.parameter() - self.parameter_estimate()
    }

    /// Sum of observed rewards.
    fn reward(&self) -> f64 {
        self.observed().iter().sum()
    }
}

/// Arms from a location + scale family.
pub trait TwoParameterArm: Arm {
    /// True scale parameter.
    fn secondary_parameter(&self) -> f64;

    /// MLE of the scale parameter; `+inf` before the first pull.
    fn secondary_parameter_estimate(&self) -> f64 {
        population_std(self.observed())
    }

    fn secondary_residual(&self) -> f64 {
        self.secondary_parameter() - self.secondary_parameter_estimate()
    }
}

/// Sort key used wherever "optimal" is decided.
pub fn estimate_of(arm: &dyn Arm) -> f64 {
    arm.parameter_estimate()
}

/// Total order over arms by estimate (`+inf` sorts above every finite value).
pub fn compare_estimates(a: &dyn Arm, b: &dyn Arm) -> Ordering {
    estimate_of(a).total_cmp(&estimate_of(b))
}

/// Arithmetic mean, `+inf` for an empty slice.
pub fn sample_mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::INFINITY;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Population standard deviation, `+inf` for an empty slice.
pub fn population_std(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::INFINITY;
    }
    let mean = sample_mean(xs);
    let ss: f64 = xs.iter().map(|x| (x - mean) * (x - mean)).sum();
    (ss / xs.len() as f64).sqrt()
}

fn invalid(distribution: DistributionKind, name: &'static str, expected: &'static str, value: f64) -> BanditError {
    BanditError::InvalidParameter {
        distribution,
        name,
        expected,
        value,
    }
}

/// `{0, 1}` rewards with success probability `p`.
#[derive(Debug, Clone)]
pub struct BernoulliArm {
    p: f64,
    dist: Bernoulli,
    results: Vec<f64>,
}

impl BernoulliArm {
    /// Fails unless `p` is in `[0, 1]`.
    pub fn new(p: f64) -> Result<Self> {
        let err = || invalid(DistributionKind::Bernoulli, "p", "in [0, 1]", p);
        if !(0.0..=1.0).contains(&p) {
            return Err(err());
        }
        let dist = Bernoulli::new(p).map_err(|_| err())?;
        Ok(Self {
            p,
            dist,
            results: Vec::new(),
        })
    }
}

impl Arm for BernoulliArm {
    fn distribution(&self) -> DistributionKind {
        DistributionKind::Bernoulli
    }

    fn parameter(&self) -> f64 {
        self.p
    }

    fn observed(&self) -> &[f64] {
        &self.results
    }

    fn pull(&mut self, rng: &mut dyn RngCore) -> f64 {
        let x = if self.dist.sample(rng) { 1.0 } else { 0.0 };
        self.results.push(x);
        x
    }
}

/// Count rewards with rate `lambda`.
#[derive(Debug, Clone)]
pub struct PoissonArm {
    lambda: f64,
    // `None` for lambda == 0: every draw is 0.
    dist: Option<Poisson<f64>>,
    results: Vec<f64>,
}

impl PoissonArm {
    /// Largest accepted rate.
    pub const MAX_LAMBDA: f64 = Poisson::<f64>::MAX_LAMBDA;

    /// Fails unless `lambda` is finite, `>= 0`, and at most [`Self::MAX_LAMBDA`].
    pub fn new(lambda: f64) -> Result<Self> {
        if !lambda.is_finite() || lambda < 0.0 {
            return Err(invalid(DistributionKind::Poisson, "lambda", "finite and >= 0", lambda));
        }
        let too_large = || invalid(DistributionKind::Poisson, "lambda", "at most 1.844e19", lambda);
        if lambda > Self::MAX_LAMBDA {
            return Err(too_large());
        }
        let dist = if lambda == 0.0 {
            None
        } else {
            Some(Poisson::new(lambda).map_err(|_| too_large())?)
        };
        Ok(Self {
            lambda,
            dist,
            results: Vec::new(),
        })
    }
}

impl Arm for PoissonArm {
    fn distribution(&self) -> DistributionKind {
        DistributionKind::Poisson
    }

    fn parameter(&self) -> f64 {
        self.lambda
    }

    fn observed(&self) -> &[f64] {
        &self.results
    }

    fn pull(&mut self, rng: &mut dyn RngCore) -> f64 {
        let x = match &self.dist {
            Some(d) => d.sample(rng),
            None => 0.0,
        };
        self.results.push(x);
        x
    }
}

/// Real rewards from `Normal(mean, std)`.
#[derive(Debug, Clone)]
pub struct GaussianArm {
    mean: f64,
    std: f64,
    dist: Normal<f64>,
    results: Vec<f64>,
}

impl GaussianArm {
    /// Fails unless `mean` is finite and `std` is finite and `>= 0`.
    pub fn new(mean: f64, std: f64) -> Result<Self> {
        if !mean.is_finite() {
            return Err(invalid(DistributionKind::Gaussian, "mean", "finite", mean));
        }
        let std_err = || invalid(DistributionKind::Gaussian, "std", "finite and >= 0", std);
        if !std.is_finite() || std < 0.0 {
            return Err(std_err());
        }
        let dist = Normal::new(mean, std).map_err(|_| std_err())?;
        Ok(Self {
            mean,
            std,
            dist,
            results: Vec::new(),
        })
    }
}

impl Arm for GaussianArm {
    fn distribution(&self) -> DistributionKind {
        DistributionKind::Gaussian
    }

    fn parameter(&self) -> f64 {
        self.mean
    }

    fn observed(&self) -> &[f64] {
        &self.results
    }

    fn pull(&mut self, rng: &mut dyn RngCore) -> f64 {
        let x = self.dist.sample(rng);
        self.results.push(x);
        x
    }

    fn as_two_parameter(&self) -> Option<&dyn TwoParameterArm> {
        Some(self)
    }
}

impl TwoParameterArm for GaussianArm {
    fn secondary_parameter(&self) -> f64 {
        self.std
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{any, prop_assert_eq, proptest};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn unpulled_arm_estimates_infinity() {
        let a = BernoulliArm::new(0.3).unwrap();
        assert_eq!(a.parameter_estimate(), f64::INFINITY);
        assert_eq!(a.residual(), f64::NEG_INFINITY);
        assert_eq!(a.reward(), 0.0);

        let g = GaussianArm::new(1.0, 2.0).unwrap();
        assert_eq!(g.parameter_estimate(), f64::INFINITY);
        assert_eq!(g.secondary_parameter_estimate(), f64::INFINITY);
    }

    #[test]
    fn bernoulli_bounds_are_inclusive() {
        assert!(BernoulliArm::new(0.0).is_ok());
        assert!(BernoulliArm::new(1.0).is_ok());
        for bad in [1.5, -0.1, f64::NAN, f64::INFINITY] {
            let e = BernoulliArm::new(bad).unwrap_err();
            assert!(e.is_construction(), "{bad}: {e}");
        }
    }

    #[test]
    fn gaussian_rejects_negative_scale() {
        assert!(GaussianArm::new(0.0, 0.0).is_ok());
        assert!(GaussianArm::new(0.0, -1.0).unwrap_err().is_construction());
        assert!(GaussianArm::new(f64::NAN, 1.0).unwrap_err().is_construction());
    }

    #[test]
    fn poisson_rejects_negative_rate_and_handles_zero() {
        assert!(PoissonArm::new(-1.0).is_err());
        let mut rng = StdRng::seed_from_u64(3);
        let mut z = PoissonArm::new(0.0).unwrap();
        for _ in 0..5 {
            assert_eq!(z.pull(&mut rng), 0.0);
        }
        let mut p = PoissonArm::new(4.0).unwrap();
        let x = p.pull(&mut rng);
        assert!(x >= 0.0 && x.fract() == 0.0, "poisson draw {x}");
    }

    #[test]
    fn poisson_reports_the_upper_rate_bound() {
        assert!(PoissonArm::new(PoissonArm::MAX_LAMBDA).is_ok());
        let e = PoissonArm::new(1e20).unwrap_err();
        assert_eq!(
            e,
            BanditError::InvalidParameter {
                distribution: DistributionKind::Poisson,
                name: "lambda",
                expected: "at most 1.844e19",
                value: 1e20,
            }
        );
        assert!(e.to_string().contains("at most 1.844e19"), "{e}");
        let neg = PoissonArm::new(-1.0).unwrap_err().to_string();
        assert!(neg.contains("finite and >= 0"), "{neg}");
    }

    #[test]
    fn degenerate_bernoulli_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut one = BernoulliArm::new(1.0).unwrap();
        let mut zero = BernoulliArm::new(0.0).unwrap();
        for _ in 0..10 {
            assert_eq!(one.pull(&mut rng), 1.0);
            assert_eq!(zero.pull(&mut rng), 0.0);
        }
        assert_eq!(one.parameter_estimate(), 1.0);
        assert_eq!(zero.parameter_estimate(), 0.0);
        assert_eq!(one.reward(), 10.0);
    }

    #[test]
    fn reward_equals_single_draw_after_one_pull() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut g = GaussianArm::new(100.0, 1.0).unwrap();
        let x = g.pull(&mut rng);
        assert_eq!(g.reward(), x);
        assert_eq!(g.observed(), &[x]);
    }

    #[test]
    fn gaussian_estimates_converge() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut g = GaussianArm::new(5.0, 2.0).unwrap();
        for _ in 0..20_000 {
            g.pull(&mut rng);
        }
        assert!((g.parameter_estimate() - 5.0).abs() < 0.1, "{}", g.parameter_estimate());
        assert!(
            (g.secondary_parameter_estimate() - 2.0).abs() < 0.1,
            "{}",
            g.secondary_parameter_estimate()
        );
    }

    #[test]
    fn zero_scale_gaussian_has_zero_secondary_estimate() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut g = GaussianArm::new(7.0, 0.0).unwrap();
        g.pull(&mut rng);
        g.pull(&mut rng);
        assert_eq!(g.parameter_estimate(), 7.0);
        assert_eq!(g.secondary_parameter_estimate(), 0.0);
        assert_eq!(g.secondary_residual(), 0.0);
    }

    #[test]
    fn only_gaussian_has_secondary_capability() {
        assert!(BernoulliArm::new(0.5).unwrap().as_two_parameter().is_none());
        assert!(PoissonArm::new(1.0).unwrap().as_two_parameter().is_none());
        let g = GaussianArm::new(1.0, 3.0).unwrap();
        assert_eq!(g.as_two_parameter().unwrap().secondary_parameter(), 3.0);
    }

    #[test]
    fn unpulled_arm_compares_above_finite_estimates() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut pulled = BernoulliArm::new(1.0).unwrap();
        pulled.pull(&mut rng);
        let fresh = BernoulliArm::new(0.0).unwrap();
        assert_eq!(compare_estimates(&fresh, &pulled), Ordering::Greater);
    }

    proptest! {
        #[test]
        fn observations_grow_by_exactly_one_per_pull(
            seed in any::<u64>(),
            p in 0.0f64..=1.0,
            k in 0usize..200,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut a = BernoulliArm::new(p).unwrap();
            let before = a.pulls();
            for i in 0..k {
                a.pull(&mut rng);
                prop_assert_eq!(a.pulls(), before + i + 1);
            }
            prop_assert_eq!(a.pulls(), before + k);
        }

        #[test]
        fn estimate_read_is_idempotent(
            seed in any::<u64>(),
            mean in -100.0f64..100.0,
            std in 0.0f64..10.0,
            k in 0usize..50,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut g = GaussianArm::new(mean, std).unwrap();
            for _ in 0..k {
                g.pull(&mut rng);
            }
            prop_assert_eq!(g.parameter_estimate().to_bits(), g.parameter_estimate().to_bits());
            prop_assert_eq!(
                g.secondary_parameter_estimate().to_bits(),
                g.secondary_parameter_estimate().to_bits()
            );
        }
    }
}
