//! Crate error type.
//!
//! Errors fall into two classes:
//! - **construction**: a distribution parameter or strategy tunable is invalid, so the
//!   value being built never comes into existence;
//! - **usage**: a valid object was asked for something its state or arity cannot
//!   provide (secondary views on a one-parameter collection, re-running an
//!   exhausted budget, metrics of the wrong arity).
//!
//! An arm with zero observations is not an error: its estimate is `+inf`.

use crate::registry::{Arity, DistributionKind};

/// Errors produced by arm, collection, strategy, and metrics construction or use.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BanditError {
    // --- construction ---
    #[error("{distribution}: parameter `{name}` must be {expected}, got {value}")]
    InvalidParameter {
        distribution: DistributionKind,
        name: &'static str,
        expected: &'static str,
        value: f64,
    },

    #[error("{0} arms take two parameters but no secondary values were supplied")]
    MissingSecondaryParameters(DistributionKind),

    #[error("{0} arms take one parameter but secondary values were supplied")]
    UnexpectedSecondaryParameters(DistributionKind),

    #[error("primary and secondary parameter lists differ in length: {primary} vs {secondary}")]
    LengthMismatch { primary: usize, secondary: usize },

    #[error("an arm collection needs at least one arm")]
    EmptyCollection,

    #[error("epsilon must be in [0, 1], got {0}")]
    InvalidEpsilon(f64),

    #[error("the decreasing strategy requires a decay rate")]
    MissingDecayRate,

    #[error("decay rate must be in (0, 1), got {0}")]
    InvalidDecayRate(f64),

    #[error("exploitation constant must be finite and >= 0, got {0}")]
    InvalidExploitationConstant(f64),

    #[error("at least {min} simulations are required, got {got}")]
    TooFewSimulations { got: u64, min: u64 },

    #[error("generator needs a finite mean and a finite std >= 0, got mean={mean} std={std}")]
    InvalidGenerator { mean: f64, std: f64 },

    #[error("unknown distribution `{0}`")]
    UnknownDistribution(String),

    #[error("unknown strategy `{0}`")]
    UnknownStrategy(String),

    #[error("no arm factory registered for {0}")]
    UnregisteredDistribution(DistributionKind),

    #[error("factory registered for {expected} built a {found} arm")]
    DistributionMismatch {
        expected: DistributionKind,
        found: DistributionKind,
    },

    // --- usage ---
    #[error("{0} arms have no secondary parameter")]
    SecondaryParametersUnavailable(DistributionKind),

    #[error("pull budget exhausted ({pulls} of {budget}); use run_exactly to continue")]
    BudgetExhausted { pulls: u64, budget: u64 },

    #[error("metrics expect {expected}-parameter arms, collection holds {found}-parameter arms")]
    ArityMismatch { expected: Arity, found: Arity },

    #[error("arm index {index} out of range for {len} arms")]
    ArmIndexOutOfRange { index: usize, len: usize },
}

impl BanditError {
    /// True for errors raised while building arms, collections, or strategies.
    pub fn is_construction(&self) -> bool {
        !self.is_usage()
    }

    /// True for errors raised by calls a valid object cannot honour.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::SecondaryParametersUnavailable(_)
                | Self::BudgetExhausted { .. }
                | Self::ArityMismatch { .. }
                | Self::ArmIndexOutOfRange { .. }
        )
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, BanditError>;
