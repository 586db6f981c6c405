//! Automation integration tests
//!
//! Curves played through a manually rendered engine, where every cycle
//! boundary is known, so values can be checked per block.

use crate::helpers::tolerances::*;
use crate::helpers::*;
use approx::assert_relative_eq;
use cadenza::core::Error;
use cadenza::prelude::*;
use cadenza::AutomationError;
use proptest::prelude::*;

#[test]
fn test_jumps_land_in_their_block() {
    let engine = offline_engine(0);
    let mut gain = AutomatedParameter::new(engine.clone(), GAIN);

    gain.automate(
        &[
            AutomationEvent::jump(0.25, 0.0),
            AutomationEvent::jump(0.75, 0.02),
        ],
        TimeAnchor::Unspecified,
    )
    .unwrap();

    // 0.02 s = 960 samples = start of the third block
    let trace = render_trace(&engine, GAIN, 4);
    assert_eq!(trace, vec![0.25, 0.25, 0.75, 0.75]);
}

#[test]
fn test_linear_ramp() {
    let engine = offline_engine(0);
    let mut gain = AutomatedParameter::new(engine.clone(), GAIN);

    gain.ramp(1.0, 0.02, 0.0).unwrap();

    let trace = render_trace(&engine, GAIN, 3);
    assert_relative_eq!(trace[0], 0.5, epsilon = RAMP_EPSILON);
    assert_eq!(trace[1], 1.0);
    assert_eq!(trace[2], 1.0);
}

#[test]
fn test_delayed_ramp_on_scaled_parameter() {
    let engine = offline_engine(0);
    let mut cutoff = AutomatedParameter::new(engine.clone(), CUTOFF);

    // Hold 1000 Hz for one block, then ramp to 2000 Hz over two blocks.
    cutoff.ramp(2000.0, 0.02, 0.01).unwrap();

    let trace = render_trace(&engine, CUTOFF, 4);
    assert_eq!(trace[0], 1000.0);
    assert_relative_eq!(trace[1], 1500.0, max_relative = RAMP_EPSILON);
    assert_eq!(trace[2], 2000.0);
    assert_eq!(trace[3], 2000.0);
}

#[test]
fn test_targets_clamped_to_range() {
    let engine = offline_engine(0);
    let mut gain = AutomatedParameter::new(engine.clone(), GAIN);
    let mut cutoff = AutomatedParameter::new(engine.clone(), CUTOFF);

    gain.automate(&[AutomationEvent::jump(5.0, 0.0)], TimeAnchor::Unspecified)
        .unwrap();
    cutoff
        .automate(&[AutomationEvent::jump(1.0, 0.0)], TimeAnchor::Unspecified)
        .unwrap();

    render_blocks(&engine, 1);
    assert_relative_eq!(value(&engine, GAIN), 1.0, epsilon = FLOAT_EPSILON);
    assert_relative_eq!(value(&engine, CUTOFF), 20.0, epsilon = FLOAT_EPSILON);
}

#[test]
fn test_same_start_time_applies_in_caller_order() {
    let engine = offline_engine(0);
    let mut gain = AutomatedParameter::new(engine.clone(), GAIN);

    gain.automate(
        &[
            AutomationEvent::jump(0.9, 0.005),
            AutomationEvent::jump(0.1, 0.005),
        ],
        TimeAnchor::Unspecified,
    )
    .unwrap();

    render_blocks(&engine, 1);
    assert_eq!(value(&engine, GAIN), 0.1);
}

#[test]
fn test_automate_twice_keeps_one_observer() {
    let engine = offline_engine(0);
    let mut gain = AutomatedParameter::new(engine.clone(), GAIN);

    gain.automate(&[AutomationEvent::jump(0.3, 0.01)], TimeAnchor::Unspecified)
        .unwrap();
    gain.automate(&[AutomationEvent::jump(0.6, 0.01)], TimeAnchor::Unspecified)
        .unwrap();

    assert_eq!(engine.observer_count(), 1);

    // Only the second curve plays.
    let trace = render_trace(&engine, GAIN, 3);
    assert_eq!(trace, vec![0.0, 0.6, 0.6]);
}

#[test]
fn test_replacement_does_not_cancel_running_ramp() {
    let engine = offline_engine(0);
    let mut gain = AutomatedParameter::new(engine.clone(), GAIN);

    gain.ramp(1.0, 0.04, 0.0).unwrap();
    render_blocks(&engine, 2);
    assert_relative_eq!(value(&engine, GAIN), 0.5, epsilon = RAMP_EPSILON);

    // Ramps already handed to the engine run to completion; only events not
    // yet scheduled belong to the replaced session.
    gain.automate(&[AutomationEvent::jump(0.0, 0.5)], TimeAnchor::Unspecified)
        .unwrap();
    let trace = render_trace(&engine, GAIN, 2);
    assert_relative_eq!(trace[0], 0.75, epsilon = RAMP_EPSILON);
    assert_eq!(trace[1], 1.0);
}

#[test]
fn test_stop_prevents_pending_events() {
    let engine = offline_engine(0);
    let mut gain = AutomatedParameter::new(engine.clone(), GAIN);

    gain.automate(&[AutomationEvent::jump(1.0, 0.1)], TimeAnchor::Unspecified)
        .unwrap();
    render_blocks(&engine, 1);

    gain.stop_automation();
    gain.stop_automation();
    assert!(!gain.is_automating());
    assert_eq!(engine.observer_count(), 0);

    render_blocks(&engine, 20);
    assert_eq!(value(&engine, GAIN), 0.0);
}

#[test]
fn test_stop_without_automation() {
    let engine = offline_engine(0);
    let mut gain = AutomatedParameter::new(engine.clone(), GAIN);

    gain.stop_automation();
    gain.stop_automation();

    assert!(!gain.is_automating());
    assert!(gain.session().is_none());
    assert_eq!(engine.observer_count(), 0);

    render_blocks(&engine, 1);
    assert_eq!(value(&engine, GAIN), 0.0);
}

#[test]
fn test_empty_curve_registers_nothing() {
    let engine = offline_engine(0);
    let mut gain = AutomatedParameter::new(engine.clone(), GAIN);

    gain.automate(&[], TimeAnchor::Unspecified).unwrap();

    assert!(!gain.is_automating());
    assert!(gain.session().is_none());
    assert_eq!(engine.observer_count(), 0);
}

#[test]
fn test_finished_curve_stays_registered_until_stopped() {
    let engine = offline_engine(0);
    let mut gain = AutomatedParameter::new(engine.clone(), GAIN);

    gain.automate(&[AutomationEvent::jump(0.4, 0.0)], TimeAnchor::Unspecified)
        .unwrap();
    render_blocks(&engine, 10);

    assert!(gain.is_automating());
    assert_eq!(engine.observer_count(), 1);
    assert_eq!(value(&engine, GAIN), 0.4);

    gain.stop_automation();
    assert_eq!(engine.observer_count(), 0);
}

#[test]
fn test_dropping_parameter_stops_automation() {
    let engine = offline_engine(0);
    {
        let mut gain = AutomatedParameter::new(engine.clone(), GAIN);
        gain.ramp(1.0, 1.0, 0.0).unwrap();
        assert_eq!(engine.observer_count(), 1);
    }
    assert_eq!(engine.observer_count(), 0);
}

#[test]
fn test_parameters_automate_independently() {
    let engine = offline_engine(0);
    let mut gain = AutomatedParameter::new(engine.clone(), GAIN);
    let mut cutoff = AutomatedParameter::new(engine.clone(), CUTOFF);

    gain.automate(&[AutomationEvent::jump(0.8, 0.0)], TimeAnchor::Unspecified)
        .unwrap();
    cutoff
        .automate(&[AutomationEvent::jump(400.0, 0.01)], TimeAnchor::Unspecified)
        .unwrap();
    assert_eq!(engine.observer_count(), 2);

    cutoff.stop_automation();
    render_blocks(&engine, 2);

    assert_eq!(value(&engine, GAIN), 0.8);
    assert_eq!(value(&engine, CUTOFF), 1000.0);
}

#[test]
fn test_registration_failure_after_shutdown() {
    let engine = offline_engine(0);
    let mut gain = AutomatedParameter::new(engine.clone(), GAIN);

    gain.ramp(1.0, 1.0, 0.0).unwrap();
    engine.shutdown();

    let err = gain.ramp(0.0, 1.0, 0.0).unwrap_err();
    assert_eq!(err, AutomationError::RegistrationFailed(Error::EngineShutdown));
    assert!(!gain.is_automating());
    assert!(gain.session().is_none());

    // Converts into the umbrella error.
    let umbrella: cadenza::Error = err.into();
    assert!(matches!(umbrella, cadenza::Error::Automation(_)));
}

#[test]
fn test_capacity_exhaustion() {
    let engine = std::sync::Arc::new(test_builder().observer_capacity(1).build().unwrap());
    let mut gain = AutomatedParameter::new(engine.clone(), GAIN);
    let mut cutoff = AutomatedParameter::new(engine.clone(), CUTOFF);

    gain.ramp(1.0, 1.0, 0.0).unwrap();
    let err = cutoff.ramp(500.0, 1.0, 0.0).unwrap_err();
    assert!(matches!(
        err,
        AutomationError::RegistrationFailed(Error::ObserverCapacity { capacity: 1 })
    ));

    // The slot frees up once the first parameter stops.
    gain.stop_automation();
    cutoff.ramp(500.0, 1.0, 0.0).unwrap();
    assert!(cutoff.is_automating());
}

#[test]
fn test_late_origin_catches_up() {
    let engine = offline_engine(0);
    render_blocks(&engine, 10);

    let mut gain = AutomatedParameter::new(engine.clone(), GAIN);

    // Both events lie before the next cycle at 4800.
    gain.automate(
        &[
            AutomationEvent::jump(0.6, 0.0),
            AutomationEvent::jump(0.8, 0.05),
        ],
        TimeAnchor::SampleTime(0),
    )
    .unwrap();
    assert_eq!(gain.session().map(|s| s.origin()), Some(0));

    render_blocks(&engine, 1);
    assert_eq!(value(&engine, GAIN), 0.8);
}

#[test]
fn test_late_ramp_is_shortened() {
    let engine = offline_engine(0);
    render_blocks(&engine, 10);

    let mut gain = AutomatedParameter::new(engine.clone(), GAIN);

    // 0.2 s ramp from sample 0; half of it has elapsed at sample 4800.
    gain.automate(
        &[AutomationEvent::new(1.0, 0.0, 0.2)],
        TimeAnchor::SampleTime(0),
    )
    .unwrap();

    let trace = render_trace(&engine, GAIN, 10);
    assert_relative_eq!(trace[0], 0.1, epsilon = RAMP_EPSILON);
    assert_relative_eq!(trace[4], 0.5, epsilon = RAMP_EPSILON);
    assert_eq!(trace[9], 1.0);
}

#[test]
fn test_dense_late_curve_fits_small_queue() {
    let engine = std::sync::Arc::new(test_builder().schedule_capacity(4).build().unwrap());
    engine.enable_manual_rendering(0).unwrap();
    render_blocks(&engine, 11);

    // Eleven jumps, all due before the next cycle at 5280.
    let curve: Vec<AutomationEvent> = (0..=10)
        .map(|k| AutomationEvent::jump(k as f32 / 10.0, k as f64 * 0.01))
        .collect();
    let mut gain = AutomatedParameter::new(engine.clone(), GAIN);
    gain.automate(&curve, TimeAnchor::SampleTime(0)).unwrap();

    render_blocks(&engine, 1);
    assert_relative_eq!(value(&engine, GAIN), 1.0, epsilon = FLOAT_EPSILON);
    assert_eq!(engine.dropped_events(), 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The parameter ends on the latest-starting jump; ties go to the one
    /// written last.
    #[test]
    fn latest_jump_wins(
        points in prop::collection::vec((0.0f32..1.0, 0u32..100), 1..16),
    ) {
        let engine = offline_engine(0);
        let mut gain = AutomatedParameter::new(engine.clone(), GAIN);

        let curve: Vec<AutomationEvent> = points
            .iter()
            .map(|&(target, ms)| AutomationEvent::jump(target, ms as f64 * 0.001))
            .collect();
        gain.automate(&curve, TimeAnchor::Unspecified).unwrap();

        // 150 ms, past every start time
        render_blocks(&engine, 15);

        let expected = points
            .iter()
            .enumerate()
            .max_by_key(|&(index, &(_, ms))| (ms, index))
            .map(|(_, &(target, _))| target)
            .unwrap();
        prop_assert_eq!(value(&engine, GAIN), expected);
    }
}
