//! Property tests for the numerical stages

use proptest::prelude::*;

use armrest_core::{
    Channel, ChannelSet, CopEngine, EmaFilter, PlatformConfig, Point, RestBaselines, Session,
    TransferFunction, force_from_voltage,
};

fn voltage() -> impl Strategy<Value = f32> {
    0.0f32..3.3
}

fn forces() -> impl Strategy<Value = ChannelSet<f32>> {
    (0.0f32..200.0, 0.0f32..200.0, 0.0f32..200.0).prop_map(|(l, r, v)| ChannelSet::new(l, r, v))
}

proptest! {
    #[test]
    fn force_is_zero_at_or_below_rest(rest in voltage(), offset in 0.0f32..1.5) {
        let v = (rest - offset).max(0.0);
        prop_assert_eq!(force_from_voltage(v, rest, 1.0, 5.91), 0.0);
    }

    #[test]
    fn force_is_never_negative(v in voltage(), rest in voltage(), rel in 0.1f32..2.0) {
        prop_assert!(force_from_voltage(v, rest, rel, 5.91) >= 0.0);
    }

    #[test]
    fn raw_units_follow_polynomial_above_rest(v in 1.8f32..3.3) {
        let tf = TransferFunction::default();
        prop_assert_eq!(tf.raw_units(v, 1.4), tf.evaluate(v));
    }

    #[test]
    fn constant_input_is_a_fixed_point(x in -5.0f32..5.0, alpha in 0.01f32..0.99) {
        let mut filter = EmaFilter::new(alpha, x);
        for _ in 0..100 {
            prop_assert_eq!(filter.update(x), x);
        }
    }

    #[test]
    fn filter_stays_between_old_value_and_sample(start in -5.0f32..5.0, sample in -5.0f32..5.0) {
        let mut filter = EmaFilter::new(0.15, start);
        let out = filter.update(sample);
        prop_assert!(out >= start.min(sample) && out <= start.max(sample));
    }

    #[test]
    fn cop_defined_only_when_rested(f in forces()) {
        let mut engine = CopEngine::default();
        let state = engine.update(f);
        let (x, y) = state.cop_xy();
        if state.total_force > 3.5 {
            prop_assert!(state.is_rested);
            prop_assert!(x.is_finite() && y.is_finite());
        } else {
            prop_assert!(!state.is_rested && !state.in_dead_zone && !state.state_changed);
            prop_assert!(x.is_nan() && y.is_nan());
        }
    }

    #[test]
    fn cop_stays_inside_sensor_triangle(f in forces()) {
        prop_assume!(f.iter().sum::<f32>() > 3.5);
        let mut engine = CopEngine::default();
        let cop = engine.update(f).cop.unwrap();
        // Triangle L(0,0) R(7,0) V(3.5,22)
        prop_assert!(cop.y >= -1e-3 && cop.y <= 22.0 + 1e-3);
        prop_assert!(cop.x >= -1e-3 && cop.x <= 7.0 + 1e-3);
    }

    #[test]
    fn changed_flag_tracks_membership(seq in prop::collection::vec(forces(), 1..50)) {
        let mut engine = CopEngine::default();
        let mut previous = false;
        for f in seq {
            let state = engine.update(f);
            if state.is_rested {
                prop_assert_eq!(state.state_changed, state.in_dead_zone != previous);
                prop_assert_eq!(
                    state.in_dead_zone,
                    state.cop.unwrap().distance_to(engine.center()) <= 2.0
                );
            } else {
                prop_assert!(!state.state_changed);
            }
            previous = state.in_dead_zone;
        }
    }

    #[test]
    fn session_at_baseline_reports_no_force(
        l in 0.5f32..2.5, r in 0.5f32..2.5, v in 0.5f32..2.5, cycles in 1usize..50,
    ) {
        let rest = ChannelSet::new(l, r, v);
        let mut session = Session::new(&PlatformConfig::default(), RestBaselines::new(rest)).unwrap();
        for _ in 0..cycles {
            let state = session.process(rest);
            prop_assert_eq!(state.total_force, 0.0);
            prop_assert!(state.cop.is_none());
        }
        prop_assert_eq!(session.filtered()[Channel::Left], l);
    }
}

#[test]
fn center_is_centroid_of_default_geometry() {
    let engine = CopEngine::default();
    let center = engine.center();
    assert!(center.distance_to(Point::new(3.5, 22.0 / 3.0)) < 1e-5);
}
