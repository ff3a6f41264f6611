//! Strategies: a selection policy bound to the collection it drives.
//!
//! A [`Strategy`] owns its [`ArmCollection`] by value, a fixed pull budget, the
//! policy, and the random source. Its pull counter *is* the collection's history
//! length, so the two can never disagree.
//!
//! Run semantics:
//! - [`Strategy::run_to_completion`] pulls until the budget is reached and refuses
//!   to run again once it has been reached.
//! - [`Strategy::run_exactly`] is the explicit escape hatch for pulling past the
//!   budget.
//!
//! Like the policies, a strategy is seedable; [`Strategy::new`] uses a fixed seed
//! so default construction is deterministic.

use std::fmt;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, trace};

use crate::collection::ArmCollection;
use crate::decision::{Decision, Phase, Step};
use crate::error::{BanditError, Result};
use crate::policy::{
    validate_epsilon, EpsilonDecreasing, EpsilonFirst, EpsilonGreedy, SelectionPolicy,
    StrategyKind, Ucb,
};

/// Smallest accepted pull budget.
pub const MIN_SIMULATIONS: u64 = 10;

/// Configuration for a [`Strategy`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StrategyConfig {
    pub kind: StrategyKind,
    /// Total pull budget (at least [`MIN_SIMULATIONS`]).
    pub num_simulations: u64,
    /// Explore probability in `[0, 1]`.
    pub epsilon: f64,
    /// Required by [`StrategyKind::Decreasing`], in `(0, 1)`. Ignored otherwise.
    pub decay_rate: Option<f64>,
    /// Used by [`StrategyKind::Ucb`].
    pub exploitation_constant: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            kind: StrategyKind::Greedy,
            num_simulations: 500,
            epsilon: 0.2,
            decay_rate: None,
            exploitation_constant: Ucb::DEFAULT_C,
        }
    }
}

impl StrategyConfig {
    pub fn greedy(num_simulations: u64, epsilon: f64) -> Self {
        Self {
            kind: StrategyKind::Greedy,
            num_simulations,
            epsilon,
            ..Self::default()
        }
    }

    pub fn decreasing(num_simulations: u64, epsilon: f64, decay_rate: Option<f64>) -> Self {
        Self {
            kind: StrategyKind::Decreasing,
            num_simulations,
            epsilon,
            decay_rate,
            ..Self::default()
        }
    }

    pub fn first(num_simulations: u64, epsilon: f64) -> Self {
        Self {
            kind: StrategyKind::First,
            num_simulations,
            epsilon,
            ..Self::default()
        }
    }

    pub fn ucb(num_simulations: u64, exploitation_constant: f64) -> Self {
        Self {
            kind: StrategyKind::Ucb,
            num_simulations,
            exploitation_constant,
            ..Self::default()
        }
    }

    /// Validate and build the policy this config describes.
    pub fn policy(&self) -> Result<Box<dyn SelectionPolicy>> {
        if self.num_simulations < MIN_SIMULATIONS {
            return Err(BanditError::TooFewSimulations {
                got: self.num_simulations,
                min: MIN_SIMULATIONS,
            });
        }
        validate_epsilon(self.epsilon)?;
        Ok(match self.kind {
            StrategyKind::Greedy => Box::new(EpsilonGreedy::new(self.epsilon)?),
            StrategyKind::Decreasing => {
                let decay = self.decay_rate.ok_or(BanditError::MissingDecayRate)?;
                Box::new(EpsilonDecreasing::new(self.epsilon, decay)?)
            }
            StrategyKind::First => Box::new(EpsilonFirst::new(self.epsilon)?),
            StrategyKind::Ucb => Box::new(Ucb::new(self.exploitation_constant)?),
        })
    }
}

/// Aggregate of the steps executed by one run call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunReport {
    pub steps: u64,
    pub explored: u64,
    pub exploited: u64,
    /// Sum of rewards drawn during the run.
    pub reward: f64,
}

impl RunReport {
    fn record(&mut self, step: &Step) {
        self.steps += 1;
        match step.phase() {
            Phase::Explore => self.explored += 1,
            Phase::Exploit => self.exploited += 1,
        }
        self.reward += step.value;
    }
}

/// A selection policy driving one exclusively owned collection.
pub struct Strategy {
    collection: ArmCollection,
    budget: u64,
    policy: Box<dyn SelectionPolicy>,
    rng: Box<dyn RngCore + Send>,
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy")
            .field("policy", &self.policy)
            .field("budget", &self.budget)
            .field("pulls", &self.pulls())
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

impl Strategy {
    /// Build with a deterministic fixed seed (0).
    pub fn new(collection: ArmCollection, cfg: &StrategyConfig) -> Result<Self> {
        Self::with_seed(collection, cfg, 0)
    }

    /// Build with a fixed seed (reproducible).
    pub fn with_seed(collection: ArmCollection, cfg: &StrategyConfig, seed: u64) -> Result<Self> {
        Self::with_rng(collection, cfg, StdRng::seed_from_u64(seed))
    }

    /// Build with an injected random source.
    pub fn with_rng<R>(collection: ArmCollection, cfg: &StrategyConfig, rng: R) -> Result<Self>
    where
        R: RngCore + Send + 'static,
    {
        let policy = cfg.policy()?;
        Self::with_policy(collection, cfg.num_simulations, policy, rng)
    }

    /// Build around a caller-supplied policy.
    pub fn with_policy<R>(
        collection: ArmCollection,
        budget: u64,
        policy: Box<dyn SelectionPolicy>,
        rng: R,
    ) -> Result<Self>
    where
        R: RngCore + Send + 'static,
    {
        if budget < MIN_SIMULATIONS {
            return Err(BanditError::TooFewSimulations {
                got: budget,
                min: MIN_SIMULATIONS,
            });
        }
        debug!(
            policy = %policy.kind(),
            budget,
            arms = collection.len(),
            "strategy constructed"
        );
        Ok(Self {
            collection,
            budget,
            policy,
            rng: Box::new(rng),
        })
    }

    pub fn kind(&self) -> StrategyKind {
        self.policy.kind()
    }

    /// Pulls executed so far (equals the collection's history length).
    pub fn pulls(&self) -> u64 {
        self.collection.total_pulls()
    }

    pub fn budget(&self) -> u64 {
        self.budget
    }

    /// Pulls left before the budget is reached (0 once past it).
    pub fn remaining(&self) -> u64 {
        self.budget.saturating_sub(self.pulls())
    }

    pub fn is_complete(&self) -> bool {
        self.pulls() >= self.budget
    }

    pub fn collection(&self) -> &ArmCollection {
        &self.collection
    }

    pub fn into_collection(self) -> ArmCollection {
        self.collection
    }

    /// What the policy would choose now. Consumes randomness but pulls nothing.
    pub fn decide(&mut self) -> Decision {
        self.policy.decide(&self.collection, self.budget, self.rng.as_mut())
    }

    /// Execute exactly one pull.
    ///
    /// Fails only if a caller-supplied policy picks an arm index outside the
    /// collection.
    pub fn step_once(&mut self) -> Result<Step> {
        let decision = self.decide();
        let value = self.collection.pull(decision.arm, self.rng.as_mut())?;
        let step = Step {
            pull: self.pulls(),
            decision,
            value,
        };
        trace!(
            pull = step.pull,
            arm = step.arm(),
            value,
            phase = ?step.phase(),
            "pull"
        );
        Ok(step)
    }

    /// Pull until the budget is reached.
    ///
    /// Fails with [`BanditError::BudgetExhausted`] if the budget was already
    /// reached when called; nothing is pulled in that case.
    pub fn run_to_completion(&mut self) -> Result<RunReport> {
        if self.is_complete() {
            return Err(BanditError::BudgetExhausted {
                pulls: self.pulls(),
                budget: self.budget,
            });
        }
        let report = self.run_steps(self.remaining())?;
        debug!(
            policy = %self.kind(),
            pulls = self.pulls(),
            explored = report.explored,
            exploited = report.exploited,
            "run complete"
        );
        Ok(report)
    }

    /// Pull exactly `k` more times, ignoring the budget.
    pub fn run_exactly(&mut self, k: u64) -> Result<RunReport> {
        let report = self.run_steps(k)?;
        debug!(policy = %self.kind(), k, pulls = self.pulls(), "continued past budget check");
        Ok(report)
    }

    fn run_steps(&mut self, k: u64) -> Result<RunReport> {
        let mut report = RunReport::default();
        for _ in 0..k {
            let step = self.step_once()?;
            report.record(&step);
        }
        Ok(report)
    }
}
