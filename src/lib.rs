//! `banditsim`: seedable multi-armed bandit simulations.
//!
//! A simulation is a set of reward-generating arms of one distribution family,
//! a selection strategy that decides which arm to pull at every step, and a pull
//! budget. After the run, [`Metrics`] summarises how well the strategy learned the
//! arms' true parameters and how much reward it collected.
//!
//! **Arms** ([`Arm`]): each arm holds its true parameters and every reward it has
//! produced. The current estimate is the sample mean of those rewards (`+inf`
//! before the first pull, so untried arms look optimal).
//! - [`BernoulliArm`]: `p` in `[0, 1]`, rewards in `{0, 1}`.
//! - [`PoissonArm`]: `lambda >= 0`, integer-valued rewards.
//! - [`GaussianArm`]: `mean`, `std >= 0`; also a [`TwoParameterArm`] whose
//!   secondary estimate is the population standard deviation of its rewards.
//!
//! Families are built through an explicit [`DistributionRegistry`] rather than a
//! global table; [`DistributionRegistry::standard`] knows all three.
//!
//! **Strategies** ([`StrategyKind`]):
//! - `Greedy`: explore with fixed probability `epsilon`, otherwise exploit.
//! - `Decreasing`: explore with probability `exp(epsilon - decay_rate * pulls)`.
//! - `First`: explore for the first `round(epsilon * N)` pulls, then exploit.
//! - `Ucb`: pick the arm with the highest upper confidence bound.
//!
//! "Explore" picks an arm uniformly at random; "exploit" picks the arm with the
//! highest current estimate (lowest index wins ties).
//!
//! **Determinism:** every random draw goes through a caller-seeded RNG. Same seed,
//! same config: same history.
//!
//! ```rust
//! use banditsim::{
//!     ArmCollection, DistributionKind, DistributionRegistry, Metrics, Strategy,
//!     StrategyConfig,
//! };
//!
//! let registry = DistributionRegistry::standard();
//! let mut p = vec![0.1; 9];
//! p.push(0.9);
//! let arms = ArmCollection::from_parameters(&registry, DistributionKind::Bernoulli, &p, None)?;
//!
//! let mut strategy = Strategy::with_seed(arms, &StrategyConfig::greedy(500, 0.2), 7)?;
//! strategy.run_to_completion()?;
//!
//! let metrics = Metrics::one_parameter(strategy.collection())?;
//! assert_eq!(metrics.total_pulls(), 500);
//! println!("{metrics}");
//! # Ok::<(), banditsim::BanditError>(())
//! ```
//!
//! **Non-goals:**
//! - No plotting; metrics expose the series a plot would need.
//! - No contextual or adversarial bandits.

#![forbid(unsafe_code)]

mod error;
pub use error::*;

mod registry;
pub use registry::*;

mod arm;
pub use arm::*;

mod collection;
pub use collection::*;

mod decision;
pub use decision::*;

mod utils;
pub use utils::*;

mod policy;
pub use policy::*;

mod strategy;
pub use strategy::*;

mod simulation;
pub use simulation::*;

mod metrics;
pub use metrics::*;

pub const BANDITSIM_VERSION: &str = env!("CARGO_PKG_VERSION");
