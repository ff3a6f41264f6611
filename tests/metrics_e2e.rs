//! End-to-end checks that metrics agree with the pull history they summarise.

use banditsim::{
    ArmCollection, Arity, DistributionKind, DistributionRegistry, Metrics, MetricsConfig,
    Strategy, StrategyConfig,
};

fn run(kind: DistributionKind, primary: &[f64], secondary: Option<&[f64]>, cfg: StrategyConfig) -> ArmCollection {
    let arms =
        ArmCollection::from_parameters(&DistributionRegistry::standard(), kind, primary, secondary)
            .unwrap();
    let mut s = Strategy::with_seed(arms, &cfg, 1234).unwrap();
    s.run_to_completion().unwrap();
    s.into_collection()
}

#[test]
fn uniform_exploration_recovers_bernoulli_parameters() {
    // epsilon = 1 with the first strategy: every pull is a uniform draw.
    let c = run(
        DistributionKind::Bernoulli,
        &[0.2, 0.7],
        None,
        StrategyConfig::first(4000, 1.0),
    );
    let m = Metrics::one_parameter(&c).unwrap();
    assert!(m.mae() < 0.05, "mae={}", m.mae());
    assert!(m.mape() < 0.25, "mape={}", m.mape());
    assert_eq!(m.optimal_arm().index, 1);
}

#[test]
fn uniform_exploration_recovers_gaussian_scale() {
    let c = run(
        DistributionKind::Gaussian,
        &[0.0, 3.0],
        Some(&[1.0, 2.0]),
        StrategyConfig::first(4000, 1.0),
    );
    let m = Metrics::two_parameter(&c).unwrap();
    assert!(m.mae() < 0.2, "mae={}", m.mae());
    assert!(m.secondary_mae().unwrap() < 0.2);
    let opt = m.optimal_arm();
    assert_eq!(opt.index, 1);
    assert_eq!(opt.secondary_parameter, Some(2.0));
    assert!(opt.secondary_estimate.is_some());
}

#[test]
fn timeseries_are_consistent_with_history() {
    let c = run(
        DistributionKind::Poisson,
        &[1.0, 2.0, 6.0],
        None,
        StrategyConfig::greedy(300, 0.2),
    );
    let m = Metrics::new(&c, Arity::One).unwrap();
    let n = c.history().len();

    let cum = m.cumulative_reward_timeseries();
    assert_eq!(cum.len(), n);
    assert!(cum.windows(2).all(|w| w[1] >= w[0]), "poisson rewards are non-negative");
    assert!((cum[n - 1] - m.total_reward()).abs() < 1e-9);

    let avg = m.average_reward_timeseries();
    assert!((avg[n - 1] * n as f64 - cum[n - 1]).abs() < 1e-9);

    let lines = m.expected_reward_lines();
    assert_eq!(lines.best.len(), n);
    assert!((lines.best[n - 1] - 6.0 * n as f64).abs() < 1e-9);
    assert!((lines.worst[0] - 1.0).abs() < 1e-12);
    assert!((lines.mean[1] - 6.0).abs() < 1e-9);

    let shares = m.selection_share_timeseries();
    assert_eq!(shares.len(), n);
    for row in &shares {
        assert_eq!(row.len(), 3);
        assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }
    let last = &shares[n - 1];
    let counts = c.pull_counts();
    for (share, count) in last.iter().zip(counts) {
        assert!((share - count as f64 / n as f64).abs() < 1e-12);
    }
}

#[test]
fn report_table_lists_secondary_rows_only_for_two_parameter_arms() {
    let g = run(
        DistributionKind::Gaussian,
        &[1.0, 2.0],
        Some(&[0.5, 0.5]),
        StrategyConfig::greedy(50, 0.5),
    );
    let table = Metrics::two_parameter(&g)
        .unwrap()
        .with_config(MetricsConfig { precision: 4 })
        .to_string();
    assert!(table.starts_with("metric"));
    assert!(table.contains("secondary mae"));
    assert!(table.contains("total pulls"));
    assert!(table.contains("50.0000"));

    let b = run(
        DistributionKind::Bernoulli,
        &[0.3, 0.6],
        None,
        StrategyConfig::greedy(50, 0.5),
    );
    let table = Metrics::one_parameter(&b).unwrap().to_string();
    assert!(!table.contains("secondary"));
    assert!(table.contains("50.00"));
}

#[test]
fn metrics_reject_the_wrong_arity() {
    let b = run(
        DistributionKind::Bernoulli,
        &[0.3, 0.6],
        None,
        StrategyConfig::greedy(20, 0.5),
    );
    assert!(Metrics::two_parameter(&b).unwrap_err().is_usage());
}
