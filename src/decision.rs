//! Decision and step records produced by selection policies.
//!
//! A [`Decision`] says which arm a policy wants next and why (exploration or
//! exploitation). A [`Step`] is the executed form: the decision plus the pull
//! number and the reward it produced. Both are small, `Copy`, and log-friendly.

/// Whether a pull gathers information or cashes in on the current best estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Phase {
    /// Arm chosen regardless of current belief.
    Explore,
    /// Arm chosen because it has the best current estimate.
    Exploit,
}

/// A policy's choice for the next pull.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    /// Index of the chosen arm.
    pub arm: usize,
    pub phase: Phase,
    /// Explore probability the policy used, when it draws one.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub explore_probability: Option<f64>,
}

impl Decision {
    pub fn explore(arm: usize) -> Self {
        Self {
            arm,
            phase: Phase::Explore,
            explore_probability: None,
        }
    }

    pub fn exploit(arm: usize) -> Self {
        Self {
            arm,
            phase: Phase::Exploit,
            explore_probability: None,
        }
    }

    pub fn with_probability(mut self, p: f64) -> Self {
        self.explore_probability = Some(p);
        self
    }
}

/// One executed pull.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    /// 1-based pull number within the collection's history.
    pub pull: u64,
    pub decision: Decision,
    /// Reward drawn from the chosen arm.
    pub value: f64,
}

impl Step {
    pub fn arm(&self) -> usize {
        self.decision.arm
    }

    pub fn phase(&self) -> Phase {
        self.decision.phase
    }
}
