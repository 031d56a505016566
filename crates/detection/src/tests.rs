use proptest::prelude::*;

use crate::{
    AttackTrigger, ChangePointDetector, DetectorConfig, DetectorEvent, DetectorState,
    SmoothingKind,
};

fn cusum_only_config() -> DetectorConfig {
    // outlier gate effectively disabled so only the cusum path can fire
    DetectorConfig {
        outlier_threshold: f64::MAX,
        smoothing: SmoothingKind::Single,
        ..DetectorConfig::default()
    }
}

#[test]
fn bootstrap_completes_on_the_window_filling_tick() {
    let mut detector = ChangePointDetector::new(cusum_only_config());
    assert_eq!(detector.state(), DetectorState::Bootstrapping);
    assert!(detector.update(0.1).events.is_empty());
    assert!(detector.update(0.1).events.is_empty());
    let outcome = detector.update(0.1);
    assert_eq!(outcome.events, vec![DetectorEvent::BootstrapComplete]);
    assert_eq!(detector.state(), DetectorState::Normal);
    // the completing tick produces no deviation
    assert_eq!(outcome.statistic, 0.0);
}

#[test]
fn constant_bootstrap_gives_zero_sigma_and_zero_first_deviation() {
    let mut detector = ChangePointDetector::new(cusum_only_config());
    for _ in 0..3 {
        detector.update(0.2);
    }
    detector.update(0.2);
    // the window mean of three 0.2 samples lands one ulp off 0.2
    assert!(detector.sigma().abs() < 1e-12);
    assert!(detector.deviation().abs() < 1e-12);
    assert!(detector.statistic().abs() < 1e-12);
}

#[test]
fn threshold_initializes_to_the_weighted_first_deviation() {
    let mut detector = ChangePointDetector::new(cusum_only_config());
    for _ in 0..3 {
        detector.update(0.1);
    }
    let outcome = detector.update(0.9);
    // window mean (0.1 + 0.1 + 0.9) / 3 against baseline level 0.1, sigma 0
    let deviation = (0.1 + 0.1 + 0.9) / 3.0 - 0.1;
    assert!((outcome.statistic - deviation).abs() < 1e-12);
    assert!((outcome.threshold - deviation * 4.0).abs() < 1e-12);
    assert!(!outcome.under_attack);
}

#[test]
fn an_immediate_violation_fires_with_a_start_delay_of_one() {
    let config = DetectorConfig {
        start_alarm_delay: 1,
        ..cusum_only_config()
    };
    let mut detector = ChangePointDetector::new(config);
    for _ in 0..3 {
        assert!(!detector.update(0.1).under_attack);
    }
    let outcome = detector.update(0.9);
    let deviation = (0.1 + 0.1 + 0.9) / 3.0 - 0.1;
    assert!((outcome.threshold - deviation).abs() < 1e-12);
    assert!(outcome.under_attack);
    assert!(outcome.events.contains(&DetectorEvent::AttackStarted {
        trigger: AttackTrigger::Cusum
    }));
}

#[test]
fn steadily_climbing_traffic_trips_the_cusum_path() {
    let mut detector = ChangePointDetector::new(cusum_only_config());
    for _ in 0..3 {
        detector.update(0.0);
    }
    let mut trigger = None;
    for tick in 1..=12 {
        let outcome = detector.update(tick as f64);
        for event in &outcome.events {
            if let DetectorEvent::AttackStarted { trigger: cause } = event {
                trigger.get_or_insert((tick, *cause));
            }
        }
    }
    let (tick, cause) = trigger.expect("ramp should trip the detector");
    assert_eq!(cause, AttackTrigger::Cusum);
    assert!(tick <= 10, "tripped only at ramp tick {tick}");
}

#[test]
fn outlier_gate_declares_at_the_fourth_sample() {
    let mut detector = ChangePointDetector::new(DetectorConfig::default());
    for _ in 0..3 {
        assert!(!detector.update(0.7).under_attack);
    }
    let outcome = detector.update(0.7);
    assert!(outcome.under_attack);
    assert!(outcome.events.contains(&DetectorEvent::AttackStarted {
        trigger: AttackTrigger::OutlierGate
    }));
    assert_eq!(detector.debug_outlier_count(), 3);
}

#[test]
fn gate_can_fire_before_the_baseline_exists() {
    let config = DetectorConfig {
        window_size: 5,
        start_alarm_delay: 3,
        ..DetectorConfig::default()
    };
    let mut detector = ChangePointDetector::new(config);
    detector.update(0.7);
    detector.update(0.7);
    let outcome = detector.update(0.7);
    assert!(outcome.under_attack);

    let outcome = detector.update(0.7);
    assert!(outcome.events.is_empty());
    let outcome = detector.update(0.7);
    assert_eq!(outcome.events, vec![DetectorEvent::BootstrapComplete]);
    assert_eq!(detector.state(), DetectorState::Attack);
}

#[test]
fn outlier_attack_ends_after_stop_delay_quiet_deviations() {
    let mut detector = ChangePointDetector::new(DetectorConfig::default());
    let mut started_at = None;
    let mut ended_at = None;
    for tick in 1..=11 {
        let outcome = detector.update(0.7);
        for event in &outcome.events {
            match event {
                DetectorEvent::AttackStarted { trigger } => {
                    assert_eq!(*trigger, AttackTrigger::OutlierGate);
                    started_at = Some(tick);
                }
                DetectorEvent::AttackEnded => ended_at = Some(tick),
                _ => {}
            }
        }
    }
    // gate trips at tick 4; the predictor buffers ticks 4..=7, then counts
    // the four zero deviations of ticks 8..=11
    assert_eq!(started_at, Some(4));
    assert_eq!(ended_at, Some(11));
    assert_eq!(detector.state(), DetectorState::Normal);
    assert_eq!(detector.statistic(), 0.0);
    assert_eq!(detector.threshold(), 0.0);
}

#[test]
fn outlier_credit_survives_the_attack_ending() {
    let mut detector = ChangePointDetector::new(DetectorConfig::default());
    for _ in 0..11 {
        detector.update(0.7);
    }
    assert_eq!(detector.state(), DetectorState::Normal);
    // one more outlier tick re-arms the gate straight away
    let outcome = detector.update(0.7);
    assert!(outcome.under_attack);
    assert!(outcome.events.contains(&DetectorEvent::AttackStarted {
        trigger: AttackTrigger::OutlierGate
    }));
}

#[test]
fn ending_predictor_is_collecting_while_the_attack_runs() {
    let mut detector = ChangePointDetector::new(DetectorConfig::default());
    for _ in 0..4 {
        detector.update(0.7);
    }
    assert_eq!(
        detector.debug_ending_phase(),
        Some(crate::EndingPhase::Collecting)
    );
    for _ in 0..4 {
        detector.update(0.7);
    }
    assert_eq!(detector.debug_ending_phase(), Some(crate::EndingPhase::ZSign));
}

proptest! {
    #[test]
    fn statistic_stays_finite_and_non_negative(
        samples in proptest::collection::vec(0.0f64..5.0, 1..60),
    ) {
        let mut detector = ChangePointDetector::new(DetectorConfig::default());
        for sample in samples {
            let outcome = detector.update(sample);
            prop_assert!(outcome.statistic.is_finite());
            prop_assert!(outcome.statistic >= 0.0);
            prop_assert!(outcome.threshold.is_finite());
            prop_assert_eq!(outcome.under_attack, detector.under_attack());
        }
    }

    #[test]
    fn single_smoothing_variant_honors_the_same_invariants(
        samples in proptest::collection::vec(0.0f64..1.0, 1..60),
        seed in any::<u64>(),
    ) {
        let config = DetectorConfig {
            smoothing: SmoothingKind::Single,
            fit_seed: seed,
            ..DetectorConfig::default()
        };
        let mut detector = ChangePointDetector::new(config);
        for sample in samples {
            let outcome = detector.update(sample);
            prop_assert!(outcome.statistic.is_finite());
            prop_assert!(outcome.statistic >= 0.0);
        }
    }
}
