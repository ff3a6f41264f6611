//! Arm collections and the pull history.
//!
//! An [`ArmCollection`] owns an ordered set of arms (index = identity) and the
//! canonical event log of every pull made against it. The only public way to pull
//! is [`ArmCollection::pull`], which draws from the arm and appends to the log in
//! one step, so `sum(arm pulls) == history().len()` always holds.

use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};
use tracing::{debug, warn};

use crate::arm::{compare_estimates, Arm, TwoParameterArm};
use crate::error::{BanditError, Result};
use crate::registry::{Arity, DistributionKind, DistributionRegistry};

/// One entry of the pull history.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pull {
    /// Index of the pulled arm.
    pub arm: usize,
    /// Reward drawn.
    pub value: f64,
}

/// `Normal(mean, std)` generator for arm parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterGenerator {
    pub mean: f64,
    pub std: f64,
}

impl ParameterGenerator {
    pub fn new(mean: f64, std: f64) -> Self {
        Self { mean, std }
    }

    fn normal(self) -> Result<Normal<f64>> {
        let err = BanditError::InvalidGenerator {
            mean: self.mean,
            std: self.std,
        };
        if !self.mean.is_finite() || !self.std.is_finite() || self.std < 0.0 {
            return Err(err);
        }
        Normal::new(self.mean, self.std).map_err(|_| err)
    }
}

/// Ordered arms of one distribution family plus their shared pull history.
#[derive(Debug)]
pub struct ArmCollection {
    distribution: DistributionKind,
    arms: Vec<Box<dyn Arm>>,
    history: Vec<Pull>,
}

impl ArmCollection {
    /// Build from explicit parameter lists.
    ///
    /// Two-parameter kinds need `secondary` with the same length as `primary`;
    /// one-parameter kinds must not be given one. If any arm fails validation the
    /// whole call fails.
    pub fn from_parameters(
        registry: &DistributionRegistry,
        distribution: DistributionKind,
        primary: &[f64],
        secondary: Option<&[f64]>,
    ) -> Result<Self> {
        if primary.is_empty() {
            return Err(BanditError::EmptyCollection);
        }
        match (distribution.arity(), secondary) {
            (Arity::One, Some(_)) => {
                return Err(BanditError::UnexpectedSecondaryParameters(distribution))
            }
            (Arity::Two, None) => return Err(BanditError::MissingSecondaryParameters(distribution)),
            (Arity::Two, Some(s)) if s.len() != primary.len() => {
                return Err(BanditError::LengthMismatch {
                    primary: primary.len(),
                    secondary: s.len(),
                })
            }
            _ => {}
        }

        let arms = primary
            .iter()
            .enumerate()
            .map(|(i, &p)| registry.build(distribution, p, secondary.map(|s| s[i])))
            .collect::<Result<Vec<_>>>()?;

        debug!(%distribution, arms = arms.len(), "built arm collection from parameter lists");
        Ok(Self {
            distribution,
            arms,
            history: Vec::new(),
        })
    }

    /// Build `n` arms whose parameters are drawn from normal generators.
    ///
    /// Drawn values outside the family's domain (e.g. a Bernoulli `p > 1` or a
    /// negative scale) are clamped onto its boundary.
    pub fn from_generator<R: Rng + ?Sized>(
        registry: &DistributionRegistry,
        distribution: DistributionKind,
        n: usize,
        primary: ParameterGenerator,
        secondary: Option<ParameterGenerator>,
        rng: &mut R,
    ) -> Result<Self> {
        if n == 0 {
            return Err(BanditError::EmptyCollection);
        }
        let primary_dist = primary.normal()?;
        let secondary_dist = match (distribution.arity(), secondary) {
            (Arity::One, Some(_)) => {
                return Err(BanditError::UnexpectedSecondaryParameters(distribution))
            }
            (Arity::Two, None) => return Err(BanditError::MissingSecondaryParameters(distribution)),
            (Arity::Two, Some(g)) => Some(g.normal()?),
            (Arity::One, None) => None,
        };

        let mut ps = Vec::with_capacity(n);
        let mut ss = Vec::with_capacity(n);
        let mut clamped_count = 0usize;
        for _ in 0..n {
            let p = primary_dist.sample(rng);
            let s = secondary_dist.as_ref().map(|d| d.sample(rng));
            let (p, s, clamped) = distribution.clamp_to_domain(p, s);
            if clamped {
                clamped_count += 1;
            }
            ps.push(p);
            if let Some(s) = s {
                ss.push(s);
            }
        }
        if clamped_count > 0 {
            warn!(
                %distribution,
                clamped = clamped_count,
                "generated parameters fell outside the distribution's domain and were clamped"
            );
        }

        let secondary = secondary_dist.map(|_| ss.as_slice());
        Self::from_parameters(registry, distribution, &ps, secondary)
    }

    pub fn distribution(&self) -> DistributionKind {
        self.distribution
    }

    pub fn arity(&self) -> Arity {
        self.distribution.arity()
    }

    /// Number of arms.
    pub fn len(&self) -> usize {
        self.arms.len()
    }

    /// Always false: construction rejects empty collections.
    pub fn is_empty(&self) -> bool {
        self.arms.is_empty()
    }

    pub fn arm(&self, index: usize) -> Option<&dyn Arm> {
        self.arms.get(index).map(|a| a.as_ref())
    }

    pub fn arms(&self) -> impl Iterator<Item = &dyn Arm> + '_ {
        self.arms.iter().map(|a| a.as_ref())
    }

    /// Index of the arm with the highest estimate; ties go to the lowest index.
    pub fn optimal_index(&self) -> usize {
        let mut best = 0;
        for i in 1..self.arms.len() {
            if compare_estimates(self.arms[i].as_ref(), self.arms[best].as_ref()).is_gt() {
                best = i;
            }
        }
        best
    }

    pub fn optimal_arm(&self) -> &dyn Arm {
        self.arms[self.optimal_index()].as_ref()
    }

    /// Uniformly random arm index, independent of history.
    pub fn random_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.random_range(0..self.arms.len())
    }

    pub fn random_arm<R: Rng + ?Sized>(&self, rng: &mut R) -> &dyn Arm {
        self.arms[self.random_index(rng)].as_ref()
    }

    /// Pull arm `index` and record the draw in the history.
    pub fn pull(&mut self, index: usize, rng: &mut dyn RngCore) -> Result<f64> {
        let len = self.arms.len();
        let arm = self
            .arms
            .get_mut(index)
            .ok_or(BanditError::ArmIndexOutOfRange { index, len })?;
        let value = arm.pull(rng);
        self.record_pull(index, value);
        Ok(value)
    }

    pub(crate) fn record_pull(&mut self, arm: usize, value: f64) {
        self.history.push(Pull { arm, value });
    }

    /// Every pull in order.
    pub fn history(&self) -> &[Pull] {
        &self.history
    }

    pub fn total_pulls(&self) -> u64 {
        self.history.len() as u64
    }

    pub fn pull_counts(&self) -> Vec<usize> {
        self.arms.iter().map(|a| a.pulls()).collect()
    }

    pub fn total_reward(&self) -> f64 {
        self.arms.iter().map(|a| a.reward()).sum()
    }

    pub fn true_parameters(&self) -> Vec<f64> {
        self.arms.iter().map(|a| a.parameter()).collect()
    }

    pub fn estimated_parameters(&self) -> Vec<f64> {
        self.arms.iter().map(|a| a.parameter_estimate()).collect()
    }

    pub fn residuals(&self) -> Vec<f64> {
        self.arms.iter().map(|a| a.residual()).collect()
    }

    fn secondary_view<F>(&self, f: F) -> Result<Vec<f64>>
    where
        F: Fn(&dyn TwoParameterArm) -> f64,
    {
        self.arms
            .iter()
            .map(|a| {
                a.as_two_parameter()
                    .map(&f)
                    .ok_or(BanditError::SecondaryParametersUnavailable(self.distribution))
            })
            .collect()
    }

    /// Fails with a usage error on one-parameter collections.
    pub fn true_secondary_parameters(&self) -> Result<Vec<f64>> {
        self.secondary_view(|a| a.secondary_parameter())
    }

    /// Fails with a usage error on one-parameter collections.
    pub fn estimated_secondary_parameters(&self) -> Result<Vec<f64>> {
        self.secondary_view(|a| a.secondary_parameter_estimate())
    }

    /// Fails with a usage error on one-parameter collections.
    pub fn secondary_residuals(&self) -> Result<Vec<f64>> {
        self.secondary_view(|a| a.secondary_residual())
    }
}
