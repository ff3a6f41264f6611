//! Utility helpers: explore schedules and confidence bounds.

/// Explore probability of the decreasing-epsilon schedule after `pulls` pulls.
///
/// `exp(epsilon - decay_rate * pulls)`. The value starts at `exp(epsilon) >= 1`
/// (always explore) and shrinks monotonically; it is not clamped to `[0, 1]`
/// because callers compare a uniform draw against it.
///
/// # Example
///
/// ```rust
/// use banditsim::decayed_explore_probability;
///
/// let early = decayed_explore_probability(0.2, 0.05, 0);
/// let late = decayed_explore_probability(0.2, 0.05, 200);
/// assert!(early >= 1.0);
/// assert!(late < 1e-3);
/// ```
pub fn decayed_explore_probability(epsilon: f64, decay_rate: f64, pulls: u64) -> f64 {
    (epsilon - decay_rate * pulls as f64).exp()
}

/// Upper confidence bound `q + c * sqrt(ln(t) / n)`.
///
/// # Arguments
///
/// - `q`: current estimate for the arm.
/// - `t`: total pulls across all arms.
/// - `c`: exploration constant (larger explores more).
/// - `n`: pulls of this arm.
///
/// # Returns
///
/// `+inf` when `n == 0` (an unpulled arm is always worth a look).
///
/// # Example
///
/// ```rust
/// use banditsim::ucb;
///
/// assert_eq!(ucb(0.5, 10, 1.0, 0), f64::INFINITY);
/// // Fewer pulls of the same estimate -> wider bound.
/// assert!(ucb(0.5, 100, 1.0, 5) > ucb(0.5, 100, 1.0, 50));
/// ```
pub fn ucb(q: f64, t: u64, c: f64, n: u64) -> f64 {
    if n == 0 {
        return f64::INFINITY;
    }
    let t = (t.max(1)) as f64;
    q + c * (t.ln() / n as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decayed_probability_is_monotone() {
        let mut prev = f64::INFINITY;
        for pulls in 0..500 {
            let p = decayed_explore_probability(0.3, 0.05, pulls);
            assert!(p <= prev, "pulls={pulls}: {p} > {prev}");
            prev = p;
        }
    }

    #[test]
    fn decayed_probability_crosses_one_at_epsilon_over_decay() {
        // exp(eps - d*n) < 1 once n > eps / d.
        assert!(decayed_explore_probability(0.5, 0.1, 5) >= 1.0 - 1e-12);
        assert!(decayed_explore_probability(0.5, 0.1, 6) < 1.0);
    }

    #[test]
    fn ucb_collapses_to_estimate_at_first_pull() {
        // ln(1) = 0.
        assert_eq!(ucb(0.7, 1, 2.0, 1), 0.7);
    }

    #[test]
    fn ucb_grows_with_exploration_constant() {
        assert!(ucb(0.5, 100, 2.0, 10) > ucb(0.5, 100, 0.5, 10));
        assert_eq!(ucb(0.5, 100, 0.0, 10), 0.5);
    }
}
