//! Selection policies: which arm to pull next.
//!
//! Every policy implements [`SelectionPolicy`], a single `decide` method over the
//! current collection state, so a [`Strategy`][crate::Strategy] can drive any of
//! them without knowing which one it holds.
//!
//! The semi-uniform family shares one rule, "explore with some probability,
//! otherwise exploit", and differs only in how that probability evolves:
//! - [`EpsilonGreedy`]: constant `epsilon`.
//! - [`EpsilonDecreasing`]: `exp(epsilon - decay_rate * pulls)`.
//! - [`EpsilonFirst`]: `1` for the first `round(epsilon * budget)` pulls, `0` after.
//!
//! [`Ucb`] is the confidence-bound alternative: no coin flip, just the arm with
//! the highest `estimate + c * sqrt(ln t / n)`.
//!
//! Exploration picks a uniformly random arm; exploitation picks
//! [`ArmCollection::optimal_index`], which prefers never-pulled arms.

use std::fmt;
use std::str::FromStr;

use rand::{Rng, RngCore};

use crate::collection::ArmCollection;
use crate::decision::Decision;
use crate::error::{BanditError, Result};
use crate::utils::{decayed_explore_probability, ucb};

/// Which selection rule a strategy uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StrategyKind {
    /// Constant explore probability.
    #[default]
    Greedy,
    /// Explore probability decays with each pull.
    Decreasing,
    /// Pure exploration, then pure exploitation.
    First,
    /// Upper confidence bound.
    Ucb,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [Self::Greedy, Self::Decreasing, Self::First, Self::Ucb];

    pub fn name(self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::Decreasing => "decreasing",
            Self::First => "first",
            Self::Ucb => "ucb",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = BanditError;

    /// Accepts `greedy`, `epsilon-greedy`, `epsilon_greedy` and likewise for the others.
    fn from_str(s: &str) -> Result<Self> {
        let norm = s.trim().to_ascii_lowercase().replace('-', "_");
        let bare = norm.strip_prefix("epsilon_").unwrap_or(&norm);
        Self::ALL
            .into_iter()
            .find(|k| k.name() == bare)
            .ok_or_else(|| BanditError::UnknownStrategy(s.to_string()))
    }
}

/// Common interface for arm-selection rules.
pub trait SelectionPolicy: fmt::Debug + Send {
    fn kind(&self) -> StrategyKind;

    /// Choose the next arm.
    ///
    /// `budget` is the strategy's total pull budget; pulls so far are
    /// `collection.total_pulls()`.
    fn decide(&self, collection: &ArmCollection, budget: u64, rng: &mut dyn RngCore) -> Decision;
}

pub(crate) fn validate_epsilon(epsilon: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&epsilon) {
        Ok(epsilon)
    } else {
        Err(BanditError::InvalidEpsilon(epsilon))
    }
}

// Shared by greedy and decreasing: one uniform draw against `p`.
fn coin_flip(collection: &ArmCollection, p: f64, rng: &mut dyn RngCore) -> Decision {
    let u: f64 = rng.random();
    let d = if u <= p {
        Decision::explore(collection.random_index(rng))
    } else {
        Decision::exploit(collection.optimal_index())
    };
    d.with_probability(p)
}

/// Explore with constant probability `epsilon`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonGreedy {
    epsilon: f64,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f64) -> Result<Self> {
        Ok(Self {
            epsilon: validate_epsilon(epsilon)?,
        })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

impl SelectionPolicy for EpsilonGreedy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Greedy
    }

    fn decide(&self, collection: &ArmCollection, _budget: u64, rng: &mut dyn RngCore) -> Decision {
        coin_flip(collection, self.epsilon, rng)
    }
}

/// Explore with probability `exp(epsilon - decay_rate * pulls)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonDecreasing {
    epsilon: f64,
    decay_rate: f64,
}

impl EpsilonDecreasing {
    /// `decay_rate` must lie strictly inside `(0, 1)`.
    pub fn new(epsilon: f64, decay_rate: f64) -> Result<Self> {
        let epsilon = validate_epsilon(epsilon)?;
        if !(decay_rate > 0.0 && decay_rate < 1.0) {
            return Err(BanditError::InvalidDecayRate(decay_rate));
        }
        Ok(Self {
            epsilon,
            decay_rate,
        })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    /// Explore probability after `pulls` pulls.
    pub fn explore_probability(&self, pulls: u64) -> f64 {
        decayed_explore_probability(self.epsilon, self.decay_rate, pulls)
    }
}

impl SelectionPolicy for EpsilonDecreasing {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Decreasing
    }

    fn decide(&self, collection: &ArmCollection, _budget: u64, rng: &mut dyn RngCore) -> Decision {
        let p = self.explore_probability(collection.total_pulls());
        coin_flip(collection, p, rng)
    }
}

/// Explore for the first `round(epsilon * budget)` pulls, exploit afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonFirst {
    epsilon: f64,
}

impl EpsilonFirst {
    pub fn new(epsilon: f64) -> Result<Self> {
        Ok(Self {
            epsilon: validate_epsilon(epsilon)?,
        })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Number of leading exploration pulls for `budget`.
    pub fn exploration_pulls(&self, budget: u64) -> u64 {
        (self.epsilon * budget as f64).round() as u64
    }
}

impl SelectionPolicy for EpsilonFirst {
    fn kind(&self) -> StrategyKind {
        StrategyKind::First
    }

    fn decide(&self, collection: &ArmCollection, budget: u64, rng: &mut dyn RngCore) -> Decision {
        let exploring = collection.total_pulls() < self.exploration_pulls(budget);
        let p = if exploring { 1.0 } else { 0.0 };
        let d = if exploring {
            Decision::explore(collection.random_index(rng))
        } else {
            Decision::exploit(collection.optimal_index())
        };
        d.with_probability(p)
    }
}

/// Pick the arm with the highest upper confidence bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ucb {
    exploitation_constant: f64,
}

impl Ucb {
    /// Default exploitation constant.
    pub const DEFAULT_C: f64 = 0.5;

    pub fn new(exploitation_constant: f64) -> Result<Self> {
        if !(exploitation_constant.is_finite() && exploitation_constant >= 0.0) {
            return Err(BanditError::InvalidExploitationConstant(exploitation_constant));
        }
        Ok(Self {
            exploitation_constant,
        })
    }

    pub fn exploitation_constant(&self) -> f64 {
        self.exploitation_constant
    }
}

impl Default for Ucb {
    fn default() -> Self {
        Self {
            exploitation_constant: Self::DEFAULT_C,
        }
    }
}

impl SelectionPolicy for Ucb {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Ucb
    }

    fn decide(&self, collection: &ArmCollection, _budget: u64, _rng: &mut dyn RngCore) -> Decision {
        let t = collection.total_pulls();
        let mut best = 0usize;
        let mut best_score = f64::NEG_INFINITY;
        for (i, arm) in collection.arms().enumerate() {
            let score = ucb(
                arm.parameter_estimate(),
                t,
                self.exploitation_constant,
                arm.pulls() as u64,
            );
            // Strict comparison keeps the first arm on ties.
            if score.total_cmp(&best_score).is_gt() {
                best = i;
                best_score = score;
            }
        }
        let unpulled = collection.arm(best).is_some_and(|a| a.pulls() == 0);
        if unpulled || best != collection.optimal_index() {
            Decision::explore(best)
        } else {
            Decision::exploit(best)
        }
    }
}
