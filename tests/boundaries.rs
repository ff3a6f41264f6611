use banditsim::{
    Arm, ArmCollection, BanditError, BernoulliArm, DistributionKind, DistributionRegistry,
    GaussianArm, PoissonArm, Strategy, StrategyConfig, StrategyKind, BANDITSIM_VERSION,
    MIN_SIMULATIONS,
};

#[test]
fn bernoulli_probability_bounds() {
    assert!(BernoulliArm::new(1.5).unwrap_err().is_construction());
    assert!(BernoulliArm::new(-0.1).unwrap_err().is_construction());
    assert!(BernoulliArm::new(f64::NAN).is_err());
    assert!(BernoulliArm::new(0.0).is_ok());
    assert!(BernoulliArm::new(1.0).is_ok());
}

#[test]
fn scale_parameters_reject_negatives() {
    assert!(GaussianArm::new(0.0, -1.0).is_err());
    assert!(GaussianArm::new(0.0, 0.0).is_ok());
    assert!(PoissonArm::new(-0.5).is_err());
    assert!(PoissonArm::new(0.0).is_ok());
}

#[test]
fn one_invalid_arm_fails_the_whole_collection() {
    let err = ArmCollection::from_parameters(
        &DistributionRegistry::standard(),
        DistributionKind::Bernoulli,
        &[0.2, 0.4, 1.2],
        None,
    )
    .unwrap_err();
    assert!(matches!(err, BanditError::InvalidParameter { .. }), "{err}");
}

#[test]
fn secondary_lists_must_match_family_and_length() {
    let r = DistributionRegistry::standard();
    assert_eq!(
        ArmCollection::from_parameters(&r, DistributionKind::Gaussian, &[0.0], None).unwrap_err(),
        BanditError::MissingSecondaryParameters(DistributionKind::Gaussian)
    );
    assert_eq!(
        ArmCollection::from_parameters(&r, DistributionKind::Poisson, &[1.0], Some(&[1.0]))
            .unwrap_err(),
        BanditError::UnexpectedSecondaryParameters(DistributionKind::Poisson)
    );
    assert_eq!(
        ArmCollection::from_parameters(&r, DistributionKind::Gaussian, &[0.0, 1.0], Some(&[1.0]))
            .unwrap_err(),
        BanditError::LengthMismatch {
            primary: 2,
            secondary: 1
        }
    );
    assert_eq!(
        ArmCollection::from_parameters(&r, DistributionKind::Bernoulli, &[], None).unwrap_err(),
        BanditError::EmptyCollection
    );
}

#[test]
fn decreasing_needs_a_decay_rate() {
    let arms = || {
        ArmCollection::from_parameters(
            &DistributionRegistry::standard(),
            DistributionKind::Bernoulli,
            &[0.5, 0.6],
            None,
        )
        .unwrap()
    };
    let err = Strategy::new(arms(), &StrategyConfig::decreasing(100, 0.2, None)).unwrap_err();
    assert_eq!(err, BanditError::MissingDecayRate);
    assert!(err.is_construction());

    assert!(Strategy::new(arms(), &StrategyConfig::decreasing(100, 0.2, Some(0.05))).is_ok());
    assert!(Strategy::new(arms(), &StrategyConfig::decreasing(100, 0.2, Some(1.0))).is_err());
    assert!(Strategy::new(arms(), &StrategyConfig::decreasing(100, 0.2, Some(0.0))).is_err());
}

#[test]
fn strategy_tunables_are_validated() {
    let arms = || {
        ArmCollection::from_parameters(
            &DistributionRegistry::standard(),
            DistributionKind::Bernoulli,
            &[0.5],
            None,
        )
        .unwrap()
    };
    assert_eq!(
        Strategy::new(arms(), &StrategyConfig::greedy(100, 1.5)).unwrap_err(),
        BanditError::InvalidEpsilon(1.5)
    );
    assert!(Strategy::new(arms(), &StrategyConfig::greedy(100, 0.0)).is_ok());
    assert!(Strategy::new(arms(), &StrategyConfig::greedy(100, 1.0)).is_ok());
    assert_eq!(
        Strategy::new(arms(), &StrategyConfig::first(MIN_SIMULATIONS - 1, 0.5)).unwrap_err(),
        BanditError::TooFewSimulations {
            got: MIN_SIMULATIONS - 1,
            min: MIN_SIMULATIONS
        }
    );
    assert!(Strategy::new(arms(), &StrategyConfig::first(MIN_SIMULATIONS, 0.5)).is_ok());
    assert!(Strategy::new(arms(), &StrategyConfig::ucb(100, -1.0)).is_err());
}

#[test]
fn collection_rejects_arms_of_another_family() {
    fn gaussian_under_bernoulli(mean: f64, _: Option<f64>) -> banditsim::Result<Box<dyn Arm>> {
        Ok(Box::new(GaussianArm::new(mean, 1.0)?))
    }
    let mut r = DistributionRegistry::standard();
    r.register(DistributionKind::Bernoulli, gaussian_under_bernoulli);
    let err = ArmCollection::from_parameters(&r, DistributionKind::Bernoulli, &[5.0, 7.0], None)
        .unwrap_err();
    assert_eq!(
        err,
        BanditError::DistributionMismatch {
            expected: DistributionKind::Bernoulli,
            found: DistributionKind::Gaussian
        }
    );
    assert!(err.is_construction());
}

#[test]
fn strategy_names_fail_through_the_crate_error() {
    assert_eq!("epsilon-greedy".parse::<StrategyKind>().unwrap(), StrategyKind::Greedy);
    let err = "softmax".parse::<StrategyKind>().unwrap_err();
    assert_eq!(err, BanditError::UnknownStrategy("softmax".to_string()));
    assert!(err.is_construction());
}

#[test]
fn version_matches_the_package() {
    assert_eq!(BANDITSIM_VERSION, env!("CARGO_PKG_VERSION"));
}

#[test]
fn distribution_names_parse_case_insensitively() {
    assert_eq!("Bernoulli".parse::<DistributionKind>().unwrap(), DistributionKind::Bernoulli);
    assert_eq!(" gaussian ".parse::<DistributionKind>().unwrap(), DistributionKind::Gaussian);
    assert_eq!(
        "cauchy".parse::<DistributionKind>().unwrap_err(),
        BanditError::UnknownDistribution("cauchy".to_string())
    );
}
