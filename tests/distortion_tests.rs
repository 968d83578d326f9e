// Host-side tests for the distortion models: CPU evaluation against the
// shader-layout mirror, anchoring, frozen variants and camera aim.

mod common;

use common::approx;
use hyperspeed_web::core::{
    DistortionKind, DistortionModel, DistortionSpec, InlineDistortion, DISTORTION_NAMES,
};

const TIMES: [f32; 5] = [0.0, 0.25, 3.7, 12.5, 97.3];

fn assert_mirror_agrees(model: &DistortionModel) {
    let packed = model.uniforms();
    for step in 0..=40 {
        let p = step as f32 / 40.0;
        for t in TIMES {
            let cpu = model.cpu_evaluate(p, t).to_array();
            let gpu = packed.shader_mirror(p, t);
            for axis in 0..3 {
                let tol = 1e-3 * (1.0 + cpu[axis].abs());
                assert!(
                    approx(cpu[axis], gpu[axis], tol),
                    "{} p={} t={} axis={}: cpu={} mirror={}",
                    model.name,
                    p,
                    t,
                    axis,
                    cpu[axis],
                    gpu[axis]
                );
            }
        }
    }
}

#[test]
fn registry_models_agree_with_shader_mirror() {
    for name in DISTORTION_NAMES {
        let model = DistortionModel::named(name).expect("registered");
        assert_mirror_agrees(&model);
    }
}

#[test]
fn inline_models_agree_with_shader_mirror() {
    let inline = InlineDistortion {
        kind: "deep".into(),
        freq: Some(vec![2.0, 5.0]),
        amp: Some(vec![7.0, 3.0]),
        pow_y: Some([12.0, 1.5]),
        anchor: Some(0.05),
        ..Default::default()
    };
    assert_mirror_agrees(&inline.resolve().expect("valid inline model"));

    let inline = InlineDistortion {
        kind: "turbulent".into(),
        freq: Some(vec![3.0, 6.0, 5.0, 2.0]),
        time_scale: Some(0.5),
        ..Default::default()
    };
    assert_mirror_agrees(&inline.resolve().expect("valid inline model"));
}

#[test]
fn displacement_is_zero_at_anchor() {
    for name in DISTORTION_NAMES {
        let model = DistortionModel::named(name).expect("registered");
        for t in TIMES {
            let d = model.displace(model.anchor, t);
            assert!(d.length() < 1e-4, "{} drifts at anchor: {:?}", name, d);
        }
    }
}

#[test]
fn still_variants_ignore_time() {
    for name in ["turbulentDistortionStill", "deepDistortionStill"] {
        let model = DistortionModel::named(name).expect("registered");
        assert_eq!(model.time_scale, 0.0);
        let a = model.displace(0.6, 0.0);
        let b = model.displace(0.6, 42.0);
        assert!((a - b).length() < 1e-6);
    }
}

#[test]
fn animated_models_change_over_time() {
    let model = DistortionModel::named("mountainDistortion").expect("registered");
    let a = model.displace(0.5, 0.0);
    let b = model.displace(0.5, 1.0);
    assert!((a - b).length() > 1e-3);
}

#[test]
fn unknown_name_is_rejected() {
    let err = DistortionModel::named("spiralDistortion").unwrap_err();
    assert!(err.to_string().contains("spiralDistortion"));
}

#[test]
fn kind_ids_round_trip_through_the_shader_discriminant() {
    for kind in [
        DistortionKind::Mountain,
        DistortionKind::Xy,
        DistortionKind::LongRace,
        DistortionKind::Turbulent,
        DistortionKind::Deep,
    ] {
        assert_eq!(DistortionKind::from_id(kind.id()), Some(kind));
    }
    assert_eq!(DistortionKind::from_id(99), None);
}

#[test]
fn unknown_kind_id_leaves_the_road_flat() {
    let mut packed = DistortionModel::named("mountainDistortion").expect("registry").uniforms();
    packed.kind = 99;
    for t in TIMES {
        assert_eq!(packed.shader_mirror(0.3, t), [0.0; 3]);
    }
}

#[test]
fn default_spec_is_turbulent() {
    let model = DistortionModel::from_spec(&DistortionSpec::default()).expect("default");
    assert_eq!(model.kind, DistortionKind::Turbulent);
    assert_eq!(model.name, "turbulentDistortion");
}

#[test]
fn slope_aim_uses_local_difference() {
    let model = DistortionModel::named("turbulentDistortion").expect("registered");
    let aim = model.camera;
    let h = aim.slope_step.expect("turbulent aims along the slope");
    let t = 2.0;
    let expected = (model.raw(aim.progress, t) - model.raw(aim.progress + h, t)) * aim.amplitude
        + aim.offset;
    assert!((model.look_at(t) - expected).length() < 1e-5);
}

#[test]
fn displacement_aim_without_slope_step() {
    let model = DistortionModel::named("xyDistortion").expect("registered");
    assert!(model.camera.slope_step.is_none());
    let t = 1.5;
    let expected =
        model.displace(model.camera.progress, t) * model.camera.amplitude + model.camera.offset;
    assert!((model.look_at(t) - expected).length() < 1e-5);
}

#[test]
fn inline_overrides_camera_aim() {
    let inline = InlineDistortion {
        kind: "longRace".into(),
        look_at_amp: Some([0.0, 0.0, 0.0]),
        look_at_offset: Some([0.0, 1.0, -4.0]),
        ..Default::default()
    };
    let model = inline.resolve().expect("valid");
    assert_eq!(model.look_at(3.0).to_array(), [0.0, 1.0, -4.0]);
}

#[test]
fn turbulent_rejects_zero_divisor_frequencies() {
    let inline = InlineDistortion {
        kind: "turbulent".into(),
        freq: Some(vec![4.0, 8.0, 8.0, 0.0]),
        ..Default::default()
    };
    assert!(inline.resolve().is_err());
}

#[test]
fn inline_vectors_accept_one_to_four_entries() {
    let too_many = InlineDistortion {
        kind: "xy".into(),
        freq: Some(vec![1.0, 2.0, 3.0, 4.0, 5.0]),
        ..Default::default()
    };
    assert!(too_many.resolve().is_err());

    let short = InlineDistortion {
        kind: "xy".into(),
        amp: Some(vec![9.0]),
        ..Default::default()
    };
    let model = short.resolve().expect("valid");
    assert_eq!(model.amp.to_array(), [9.0, 0.0, 0.0, 0.0]);
}
