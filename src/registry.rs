//! Distribution kinds and the arm factory table.
//!
//! The registry is an explicit value: build it once (usually with
//! [`DistributionRegistry::standard`]) and pass it by reference into collection
//! construction. There is no global table.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::arm::{Arm, BernoulliArm, GaussianArm, PoissonArm};
use crate::error::{BanditError, Result};

/// Number of parameters a distribution family takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Arity {
    /// Single-parameter family (Bernoulli, Poisson).
    One,
    /// Location + scale family (Gaussian).
    Two,
}

impl Arity {
    pub fn count(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => f.write_str("one"),
            Self::Two => f.write_str("two"),
        }
    }
}

/// Reward distribution family of an arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DistributionKind {
    /// `{0, 1}` rewards with success probability `p`.
    Bernoulli,
    /// Count rewards with rate `lambda`.
    Poisson,
    /// Real rewards with mean and standard deviation.
    Gaussian,
}

impl DistributionKind {
    /// Every kind, in declaration order.
    pub const ALL: [DistributionKind; 3] = [Self::Bernoulli, Self::Poisson, Self::Gaussian];

    pub fn arity(self) -> Arity {
        match self {
            Self::Bernoulli | Self::Poisson => Arity::One,
            Self::Gaussian => Arity::Two,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bernoulli => "bernoulli",
            Self::Poisson => "poisson",
            Self::Gaussian => "gaussian",
        }
    }

    /// Clamp generator-drawn parameters into the family's valid domain.
    ///
    /// Returns `(primary, secondary, clamped)`.
    pub fn clamp_to_domain(self, primary: f64, secondary: Option<f64>) -> (f64, Option<f64>, bool) {
        let p = match self {
            Self::Bernoulli => primary.clamp(0.0, 1.0),
            Self::Poisson => primary.max(0.0),
            Self::Gaussian => primary,
        };
        let s = match (self.arity(), secondary) {
            (Arity::Two, Some(s)) => Some(s.max(0.0)),
            _ => secondary,
        };
        let clamped = p != primary || s != secondary;
        (p, s, clamped)
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistributionKind {
    type Err = BanditError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| BanditError::UnknownDistribution(s.to_string()))
    }
}

/// Arm constructor: `(primary, secondary) -> boxed arm`.
pub type ArmFactory = fn(f64, Option<f64>) -> Result<Box<dyn Arm>>;

fn bernoulli_factory(p: f64, _secondary: Option<f64>) -> Result<Box<dyn Arm>> {
    Ok(Box::new(BernoulliArm::new(p)?))
}

fn poisson_factory(lambda: f64, _secondary: Option<f64>) -> Result<Box<dyn Arm>> {
    Ok(Box::new(PoissonArm::new(lambda)?))
}

fn gaussian_factory(mean: f64, std: Option<f64>) -> Result<Box<dyn Arm>> {
    let std = std.ok_or(BanditError::MissingSecondaryParameters(DistributionKind::Gaussian))?;
    Ok(Box::new(GaussianArm::new(mean, std)?))
}

/// Explicit `DistributionKind -> ArmFactory` table.
#[derive(Debug, Clone, Default)]
pub struct DistributionRegistry {
    factories: BTreeMap<DistributionKind, ArmFactory>,
}

impl DistributionRegistry {
    /// An empty registry (nothing can be built until factories are registered).
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in Bernoulli, Poisson and Gaussian arms.
    pub fn standard() -> Self {
        let mut r = Self::new();
        r.register(DistributionKind::Bernoulli, bernoulli_factory);
        r.register(DistributionKind::Poisson, poisson_factory);
        r.register(DistributionKind::Gaussian, gaussian_factory);
        r
    }

    /// Register (or replace) the factory for `kind`. Returns the previous factory.
    pub fn register(&mut self, kind: DistributionKind, factory: ArmFactory) -> Option<ArmFactory> {
        self.factories.insert(kind, factory)
    }

    pub fn contains(&self, kind: DistributionKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Registered kinds of the given arity, in stable order.
    pub fn kinds(&self, arity: Arity) -> Vec<DistributionKind> {
        self.factories
            .keys()
            .copied()
            .filter(|k| k.arity() == arity)
            .collect()
    }

    /// Build one arm.
    ///
    /// One-parameter kinds reject a secondary value; two-parameter kinds require one.
    /// The factory's arm must report `kind` as its distribution.
    pub fn build(
        &self,
        kind: DistributionKind,
        primary: f64,
        secondary: Option<f64>,
    ) -> Result<Box<dyn Arm>> {
        let factory = self
            .factories
            .get(&kind)
            .ok_or(BanditError::UnregisteredDistribution(kind))?;
        match (kind.arity(), secondary) {
            (Arity::One, Some(_)) => return Err(BanditError::UnexpectedSecondaryParameters(kind)),
            (Arity::Two, None) => return Err(BanditError::MissingSecondaryParameters(kind)),
            _ => {}
        }
        let arm = factory(primary, secondary)?;
        let found = arm.distribution();
        if found != kind {
            return Err(BanditError::DistributionMismatch {
                expected: kind,
                found,
            });
        }
        Ok(arm)
    }
}
