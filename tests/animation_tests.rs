// Host-side tests for the animation driver: frame-rate independent easing,
// boost convergence, projection updates and the zero-speed drift scenario.

mod common;

use common::{approx, mock_host, seeded, Probe};
use hyperspeed_web::frame::ease_toward;

#[test]
fn ease_composes_across_step_sizes() {
    let one = ease_toward(0.0, 1.0, 0.05);
    let mut many = 0.0;
    for _ in 0..5 {
        many = ease_toward(many, 1.0, 0.01);
    }
    assert!(approx(one, many, 1e-5), "one={} many={}", one, many);
}

#[test]
fn ease_converges_ninety_percent_in_a_tenth_of_a_second() {
    let v = ease_toward(0.0, 10.0, 0.1);
    assert!(approx(v, 9.0, 1e-3), "got {}", v);
}

#[test]
fn ease_snaps_when_close() {
    assert_eq!(ease_toward(1.999_999_5, 2.0, 0.001), 2.0);
    assert_eq!(ease_toward(2.0, 2.0, 0.5), 2.0);
    assert_eq!(ease_toward(0.5, 2.0, 0.0), 0.5);
}

#[test]
fn wide_fov_eases_exactly_onto_its_target() {
    let mut fov = 90.0_f32;
    for _ in 0..120 {
        fov = ease_toward(fov, 150.0, 1.0 / 60.0);
    }
    assert_eq!(fov, 150.0);
    // One ulp short of 150 must still land on the target.
    assert_eq!(ease_toward(149.999_98, 150.0, 1.0 / 60.0), 150.0);

    let options = seeded("");
    let probe = Probe::default();
    let mut host = mock_host(&options, &probe);
    host.pointer_down();
    for _ in 0..120 {
        host.step(1.0 / 60.0).expect("step");
    }
    let s = host.animation().expect("live");
    assert_eq!(s.current_fov, options.fov_speed_up);
    assert_eq!(host.camera().expect("live").fov_degrees, options.fov_speed_up);

    host.pointer_up();
    for _ in 0..120 {
        host.step(1.0 / 60.0).expect("step");
    }
    assert_eq!(host.animation().expect("live").current_fov, options.fov);
    assert_eq!(host.camera().expect("live").fov_degrees, options.fov);
}

#[test]
fn speed_easing_is_frame_rate_independent() {
    let options = seeded("");
    let (pa, pb) = (Probe::default(), Probe::default());
    let mut coarse = mock_host(&options, &pa);
    let mut fine = mock_host(&options, &pb);
    coarse.pointer_down();
    fine.pointer_down();

    coarse.step(0.5).expect("step");
    for _ in 0..100 {
        fine.step(0.005).expect("step");
    }
    let a = coarse.animation().expect("live");
    let b = fine.animation().expect("live");
    assert!(approx(a.current_speed, b.current_speed, 1e-4));
    assert!(approx(a.current_fov, b.current_fov, 1e-3));
    assert!(approx(a.clock_elapsed, b.clock_elapsed, 1e-4));
}

#[test]
fn boost_converges_within_five_seconds() {
    let options = seeded("");
    let probe = Probe::default();
    let mut host = mock_host(&options, &probe);
    host.pointer_down();
    for _ in 0..300 {
        host.step(1.0 / 60.0).expect("step");
    }
    let s = host.animation().expect("live");
    assert!((s.current_speed - s.target_speed).abs() <= 0.01 * s.target_speed.abs());
    assert!(approx(s.current_fov, options.fov_speed_up, 0.01 * options.fov_speed_up));
    assert_eq!(probe.renders.get(), 300);
}

#[test]
fn render_time_adds_boost_travel_to_the_clock() {
    let options = seeded("");
    let probe = Probe::default();
    let mut host = mock_host(&options, &probe);
    let report = host.step(1.0).expect("step").expect("live");
    assert!(approx(report.render_time, 1.0, 1e-6));

    host.pointer_down();
    for _ in 0..60 {
        host.step(1.0 / 60.0).expect("step");
    }
    let s = host.animation().expect("live");
    assert!(s.time_offset > 0.0);
    assert!(approx(s.render_time(), s.clock_elapsed + s.time_offset, 1e-6));
    assert!(approx(host.scene().expect("live").road.time(), s.render_time(), 1e-6));
}

#[test]
fn bad_deltas_count_as_zero() {
    let options = seeded("");
    let probe = Probe::default();
    let mut host = mock_host(&options, &probe);
    for dt in [-1.0, f32::NAN, f32::INFINITY] {
        host.step(dt).expect("step");
    }
    assert_eq!(host.animation().expect("live").clock_elapsed, 0.0);
}

#[test]
fn projection_updates_only_while_fov_moves() {
    let options = seeded("");
    let probe = Probe::default();
    let mut host = mock_host(&options, &probe);

    let rest = host.step(1.0 / 60.0).expect("step").expect("live");
    assert!(!rest.projection_updated);

    host.pointer_down();
    let moving = host.step(1.0 / 60.0).expect("step").expect("live");
    assert!(moving.projection_updated);
    assert!(host.camera().expect("live").fov_degrees > options.fov);

    for _ in 0..600 {
        host.step(1.0 / 60.0).expect("step");
    }
    let settled = host.step(1.0 / 60.0).expect("step").expect("live");
    assert!(!settled.projection_updated);
    assert_eq!(host.camera().expect("live").fov_degrees, options.fov_speed_up);
}

#[test]
fn zero_speed_instances_do_not_drift() {
    let options = seeded(
        r#"{
            "lightPairsPerRoadway": 2,
            "totalSideLightSticks": 4,
            "movingAwaySpeed": [0, 0],
            "movingCloserSpeed": [0, 0],
            "sideSticksSpeed": 0
        }"#,
    );
    let probe = Probe::default();
    let mut host = mock_host(&options, &probe);

    let snapshot = |host: &hyperspeed_web::SceneHost<common::MockRenderer>| {
        let scene = host.scene().expect("live");
        let mut out = Vec::new();
        for field in [&scene.away, &scene.closer] {
            for i in 0..field.instance_count() as usize {
                out.push(field.travel(i).expect("instance"));
            }
        }
        for i in 0..scene.sticks.instance_count() as usize {
            out.push(scene.sticks.travel(i).expect("instance"));
        }
        out
    };

    let before = snapshot(&host);
    assert_eq!(before.len(), 2 * 2 + 2 * 2 + 4);
    for _ in 0..60 {
        host.step(1.0 / 60.0).expect("step");
    }
    let after = snapshot(&host);
    assert!(approx(host.animation().expect("live").clock_elapsed, 1.0, 1e-4));
    for (b, a) in before.iter().zip(&after) {
        assert!(approx(*a, *b, 1e-4), "drifted {} -> {}", b, a);
    }
}

#[test]
fn camera_aims_along_the_distortion() {
    let options = seeded(r#"{"distortion": "xyDistortion"}"#);
    let probe = Probe::default();
    let mut host = mock_host(&options, &probe);
    let report = host.step(0.4).expect("step").expect("live");
    let scene = host.scene().expect("live");
    let camera = host.camera().expect("live");
    let expected = camera.eye + scene.distortion.look_at(report.render_time);
    assert!((camera.target - expected).length() < 1e-5);
    assert_eq!(camera.eye.to_array(), [0.0, 8.0, -5.0]);
}
