//! Read-only metrics over a simulated collection.
//!
//! [`Metrics`] is built for an expected parameter arity and refuses collections of
//! the other arity. Everything it reports is derived from the arms' final state
//! and the collection's pull history, in pull order.
//!
//! Values are unrounded; [`MetricsConfig::precision`] only affects the
//! `Display` table.
//!
//! Non-finite inputs propagate: an unpulled arm has an infinite residual, and a
//! true parameter of zero makes its percentage error infinite (NaN when the
//! residual is also zero).

use std::fmt;

use crate::collection::ArmCollection;
use crate::error::{BanditError, Result};
use crate::registry::Arity;

/// Display settings for [`Metrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsConfig {
    /// Decimal places in the `Display` table.
    pub precision: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { precision: 2 }
    }
}

/// Mean of `|r|`.
pub fn mean_absolute_error(residuals: &[f64]) -> f64 {
    if residuals.is_empty() {
        return 0.0;
    }
    residuals.iter().map(|r| r.abs()).sum::<f64>() / residuals.len() as f64
}

/// Mean of `|r_i| / |p_i|`.
pub fn mean_absolute_percentage_error(residuals: &[f64], parameters: &[f64]) -> f64 {
    if residuals.is_empty() {
        return 0.0;
    }
    residuals
        .iter()
        .zip(parameters)
        .map(|(r, p)| r.abs() / p.abs())
        .sum::<f64>()
        / residuals.len() as f64
}

/// Current optimal arm, true vs estimated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimalArmSummary {
    pub index: usize,
    pub parameter: f64,
    pub estimate: f64,
    pub secondary_parameter: Option<f64>,
    pub secondary_estimate: Option<f64>,
}

/// Reference lines for cumulative reward: `parameter * pull_number`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpectedRewardLines {
    /// Using the best true parameter.
    pub best: Vec<f64>,
    /// Using the mean true parameter.
    pub mean: Vec<f64>,
    /// Using the worst true parameter.
    pub worst: Vec<f64>,
}

/// Metrics view over a collection of known arity.
#[derive(Debug, Clone, Copy)]
pub struct Metrics<'a> {
    collection: &'a ArmCollection,
    arity: Arity,
    cfg: MetricsConfig,
}

impl<'a> Metrics<'a> {
    /// Fails with [`BanditError::ArityMismatch`] unless the collection's arms have
    /// `expected` parameters.
    pub fn new(collection: &'a ArmCollection, expected: Arity) -> Result<Self> {
        let found = collection.arity();
        if found != expected {
            return Err(BanditError::ArityMismatch { expected, found });
        }
        Ok(Self {
            collection,
            arity: expected,
            cfg: MetricsConfig::default(),
        })
    }

    pub fn one_parameter(collection: &'a ArmCollection) -> Result<Self> {
        Self::new(collection, Arity::One)
    }

    pub fn two_parameter(collection: &'a ArmCollection) -> Result<Self> {
        Self::new(collection, Arity::Two)
    }

    pub fn with_config(mut self, cfg: MetricsConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn collection(&self) -> &'a ArmCollection {
        self.collection
    }

    pub fn total_pulls(&self) -> u64 {
        self.collection.total_pulls()
    }

    pub fn total_reward(&self) -> f64 {
        self.collection.total_reward()
    }

    pub fn mae(&self) -> f64 {
        mean_absolute_error(&self.collection.residuals())
    }

    pub fn mape(&self) -> f64 {
        mean_absolute_percentage_error(
            &self.collection.residuals(),
            &self.collection.true_parameters(),
        )
    }

    /// Fails on one-parameter metrics.
    pub fn secondary_mae(&self) -> Result<f64> {
        Ok(mean_absolute_error(&self.collection.secondary_residuals()?))
    }

    /// Fails on one-parameter metrics.
    pub fn secondary_mape(&self) -> Result<f64> {
        Ok(mean_absolute_percentage_error(
            &self.collection.secondary_residuals()?,
            &self.collection.true_secondary_parameters()?,
        ))
    }

    pub fn optimal_arm(&self) -> OptimalArmSummary {
        let index = self.collection.optimal_index();
        let arm = self.collection.optimal_arm();
        let two = arm.as_two_parameter();
        OptimalArmSummary {
            index,
            parameter: arm.parameter(),
            estimate: arm.parameter_estimate(),
            secondary_parameter: two.map(|a| a.secondary_parameter()),
            secondary_estimate: two.map(|a| a.secondary_parameter_estimate()),
        }
    }

    /// Running total of rewards, one entry per pull.
    pub fn cumulative_reward_timeseries(&self) -> Vec<f64> {
        self.collection
            .history()
            .iter()
            .scan(0.0, |acc, p| {
                *acc += p.value;
                Some(*acc)
            })
            .collect()
    }

    /// Average reward after each pull: `cumsum[i] / (i + 1)`.
    pub fn average_reward_timeseries(&self) -> Vec<f64> {
        self.cumulative_reward_timeseries()
            .into_iter()
            .enumerate()
            .map(|(i, c)| c / (i + 1) as f64)
            .collect()
    }

    /// Best/mean/worst true parameter times pull number, aligned with
    /// [`Metrics::cumulative_reward_timeseries`].
    pub fn expected_reward_lines(&self) -> ExpectedRewardLines {
        let params = self.collection.true_parameters();
        let best = params.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let worst = params.iter().copied().fold(f64::INFINITY, f64::min);
        let mean = params.iter().sum::<f64>() / params.len() as f64;
        let n = self.collection.history().len();
        let line = |v: f64| (1..=n).map(|k| v * k as f64).collect::<Vec<_>>();
        ExpectedRewardLines {
            best: line(best),
            mean: line(mean),
            worst: line(worst),
        }
    }

    /// For each pull, every arm's share of the pulls made so far.
    ///
    /// Row `i` sums to 1 and has one entry per arm.
    pub fn selection_share_timeseries(&self) -> Vec<Vec<f64>> {
        let mut counts = vec![0u64; self.collection.len()];
        self.collection
            .history()
            .iter()
            .enumerate()
            .map(|(i, p)| {
                counts[p.arm] += 1;
                let n = (i + 1) as f64;
                counts.iter().map(|&c| c as f64 / n).collect()
            })
            .collect()
    }

    fn rows(&self) -> Vec<(&'static str, f64)> {
        let opt = self.optimal_arm();
        let mut rows = vec![
            ("optimal arm parameter (true)", opt.parameter),
            ("optimal arm parameter (estimate)", opt.estimate),
        ];
        if let (Some(t), Some(e)) = (opt.secondary_parameter, opt.secondary_estimate) {
            rows.push(("optimal arm secondary parameter (true)", t));
            rows.push(("optimal arm secondary parameter (estimate)", e));
        }
        rows.push(("total pulls", self.total_pulls() as f64));
        rows.push(("total reward", self.total_reward()));
        rows.push(("mape", self.mape()));
        rows.push(("mae", self.mae()));
        if let (Ok(mape), Ok(mae)) = (self.secondary_mape(), self.secondary_mae()) {
            rows.push(("secondary mape", mape));
            rows.push(("secondary mae", mae));
        }
        rows
    }
}

impl fmt::Display for Metrics<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();
        let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0).max("metric".len());
        let prec = self.cfg.precision;
        writeln!(f, "{:<width$}  value", "metric")?;
        writeln!(f, "{:-<width$}  {:-<5}", "", "")?;
        for (k, v) in rows {
            writeln!(f, "{k:<width$}  {v:.prec$}")?;
        }
        Ok(())
    }
}
