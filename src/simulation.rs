//! Simulation driver: the front door for a complete run.
//!
//! ```text
//! let mut sim = cfg.build(&registry)?;   // arms + strategy
//! sim.execute()?;                        // pull until the budget
//! println!("{}", sim.metrics()?);        // report
//! ```
//!
//! [`Simulation`] holds no state of its own beyond the [`Strategy`]; `execute` is
//! `run_to_completion`, and `metrics` hands the collection to [`Metrics`].

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::collection::{ArmCollection, ParameterGenerator};
use crate::error::Result;
use crate::metrics::Metrics;
use crate::registry::{Arity, DistributionKind, DistributionRegistry};
use crate::strategy::{RunReport, Strategy, StrategyConfig};

/// How arm parameters are supplied.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "lowercase"))]
pub enum ArmSource {
    /// Explicit per-arm values.
    Fixed {
        primary: Vec<f64>,
        #[cfg_attr(
            feature = "serde",
            serde(default, skip_serializing_if = "Option::is_none")
        )]
        secondary: Option<Vec<f64>>,
    },
    /// `num_arms` parameters drawn from normal generators.
    Generated {
        num_arms: usize,
        primary: ParameterGenerator,
        #[cfg_attr(
            feature = "serde",
            serde(default, skip_serializing_if = "Option::is_none")
        )]
        secondary: Option<ParameterGenerator>,
    },
}

/// Everything needed to build a [`Simulation`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig {
    pub distribution: DistributionKind,
    pub arms: ArmSource,
    #[cfg_attr(feature = "serde", serde(default))]
    pub strategy: StrategyConfig,
    /// Seed for parameter generation and the strategy; `None` draws from OS entropy.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// Build the collection and strategy. Fails on any invalid arm parameter or
    /// strategy tunable; nothing is built in that case.
    pub fn build(&self, registry: &DistributionRegistry) -> Result<Simulation> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        // Validate the strategy before drawing any parameters.
        self.strategy.policy()?;

        let collection = match &self.arms {
            ArmSource::Fixed { primary, secondary } => ArmCollection::from_parameters(
                registry,
                self.distribution,
                primary,
                secondary.as_deref(),
            )?,
            ArmSource::Generated {
                num_arms,
                primary,
                secondary,
            } => ArmCollection::from_generator(
                registry,
                self.distribution,
                *num_arms,
                *primary,
                *secondary,
                &mut rng,
            )?,
        };
        let strategy = Strategy::with_rng(collection, &self.strategy, rng)?;
        Ok(Simulation::new(strategy))
    }
}

/// One strategy bound to its collection.
#[derive(Debug)]
pub struct Simulation {
    strategy: Strategy,
}

impl Simulation {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    /// Run the strategy to its budget.
    ///
    /// Fails with a usage error if the budget was already reached.
    pub fn execute(&mut self) -> Result<RunReport> {
        let report = self.strategy.run_to_completion()?;
        let c = self.strategy.collection();
        info!(
            strategy = %self.strategy.kind(),
            distribution = %c.distribution(),
            arms = c.len(),
            pulls = c.total_pulls(),
            reward = c.total_reward(),
            "simulation finished"
        );
        Ok(report)
    }

    /// Pull `k` more times past the budget.
    pub fn continue_for(&mut self, k: u64) -> Result<RunReport> {
        self.strategy.run_exactly(k)
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn collection(&self) -> &ArmCollection {
        self.strategy.collection()
    }

    /// Metrics at the collection's own arity.
    pub fn metrics(&self) -> Result<Metrics<'_>> {
        let c = self.collection();
        Metrics::new(c, c.arity())
    }

    /// Metrics at a caller-expected arity; fails on mismatch.
    pub fn metrics_for(&self, arity: Arity) -> Result<Metrics<'_>> {
        Metrics::new(self.collection(), arity)
    }

    pub fn into_collection(self) -> ArmCollection {
        self.strategy.into_collection()
    }
}
