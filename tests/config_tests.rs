// Host-side tests for option parsing: merging over defaults, validation
// errors and color/range forms.

use hyperspeed_web::config::{HyperspeedOptions, Rgb, Span};
use hyperspeed_web::core::{DistortionKind, DistortionSpec};
use hyperspeed_web::error::{ConfigError, HyperspeedError};

#[test]
fn empty_input_yields_defaults() {
    for json in ["", "  ", "null", "{}"] {
        let options = HyperspeedOptions::from_json(json).expect("defaults are valid");
        assert_eq!(options, HyperspeedOptions::default());
    }
    let d = HyperspeedOptions::default();
    assert_eq!(d.length, 400.0);
    assert_eq!(d.lanes_per_road, 4);
    assert_eq!(d.fov, 90.0);
    assert_eq!(d.fov_speed_up, 150.0);
    assert_eq!(d.speed_up, 2.0);
    assert_eq!(d.distortion, DistortionSpec::Named("turbulentDistortion".into()));
}

#[test]
fn partial_options_merge_over_defaults() {
    let options = HyperspeedOptions::from_json(
        r##"{
            "length": 800,
            "lanesPerRoad": 3,
            "carLightsRadius": 0.2,
            "movingAwaySpeed": [10, 20],
            "colors": { "background": "#102030", "leftCars": 16711680 }
        }"##,
    )
    .expect("valid");
    assert_eq!(options.length, 800.0);
    assert_eq!(options.lanes_per_road, 3);
    assert_eq!(options.road_width, 10.0);
    assert_eq!(options.car_lights_radius, Span::new(0.2, 0.2));
    assert_eq!(options.moving_away_speed, Span::new(10.0, 20.0));
    assert_eq!(options.colors.background, Rgb::from_hex(0x102030));
    assert_eq!(options.colors.left_cars.0, vec![Rgb::from_hex(0xff0000)]);
    assert_eq!(options.colors.right_cars.0.len(), 3);
    assert_eq!(options.fov, 90.0);
}

#[test]
fn road_way_spelling_variants_are_accepted() {
    let a = HyperspeedOptions::from_json(r#"{"lightPairsPerRoadWay": 5}"#).expect("valid");
    let b = HyperspeedOptions::from_json(r#"{"lightPairsPerRoadway": 5}"#).expect("valid");
    assert_eq!(a.light_pairs_per_road_way, 5);
    assert_eq!(b.light_pairs_per_road_way, 5);
}

#[test]
fn unknown_distortion_name_is_rejected() {
    let err = HyperspeedOptions::from_json(r#"{"distortion": "warpDistortion"}"#).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownDistortion(ref n) if n == "warpDistortion"));
}

#[test]
fn inline_distortion_resolves() {
    let options = HyperspeedOptions::from_json(
        r#"{"distortion": {"kind": "mountain", "amp": [5, 5, 5], "timeScale": 0.5}}"#,
    )
    .expect("valid");
    let model = options.distortion_model().expect("resolves");
    assert_eq!(model.kind, DistortionKind::Mountain);
    assert_eq!(model.amp.to_array(), [5.0, 5.0, 5.0, 0.0]);
    assert_eq!(model.time_scale, 0.5);
    assert_eq!(model.freq.to_array(), [3.0, 6.0, 10.0, 0.0]);

    let err = HyperspeedOptions::from_json(r#"{"distortion": {"kind": "spiral"}}"#).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownKind(_)));
}

#[test]
fn non_positive_sizes_are_rejected() {
    for json in [
        r#"{"length": 0}"#,
        r#"{"length": -5}"#,
        r#"{"roadWidth": 0}"#,
        r#"{"lanesPerRoad": 0}"#,
        r#"{"lightPairsPerRoadWay": 0}"#,
        r#"{"totalSideLightSticks": 0}"#,
        r#"{"fov": 0}"#,
        r#"{"carLightsLength": [0, 10]}"#,
    ] {
        let err = HyperspeedOptions::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { .. }), "{}: {:?}", json, err);
    }
}

#[test]
fn out_of_range_values_are_rejected() {
    for json in [
        r#"{"islandWidth": -1}"#,
        r#"{"fov": 180}"#,
        r#"{"carLightsFade": 1.5}"#,
        r#"{"brokenLinesLengthPercentage": -0.1}"#,
        r#"{"colors": {"sticks": []}}"#,
    ] {
        let err = HyperspeedOptions::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }), "{}: {:?}", json, err);
    }
}

#[test]
fn malformed_json_and_colors_are_rejected() {
    for json in [
        r#"{"length": "#,
        r#"{"length": "long"}"#,
        r##"{"colors": {"background": "#12345"}}"##,
        r##"{"colors": {"background": "#gggggg"}}"##,
        r#"{"colors": {"background": 16777216}}"#,
    ] {
        let err = HyperspeedOptions::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)), "{}: {:?}", json, err);
    }
}

#[test]
fn zero_island_width_is_allowed() {
    let options = HyperspeedOptions::from_json(r#"{"islandWidth": 0}"#).expect("valid");
    assert_eq!(options.island_width, 0.0);
}

#[test]
fn hex_colors_are_linearized() {
    for c in Rgb::from_hex(0xffffff).0 {
        assert!((c - 1.0).abs() < 1e-6);
    }
    assert_eq!(Rgb::from_hex(0x000000).0, [0.0, 0.0, 0.0]);
    let mid = Rgb::from_hex(0x808080).0[0];
    assert!(mid > 0.2 && mid < 0.23, "got {}", mid);
}

#[test]
fn lane_width_divides_the_road() {
    let options = HyperspeedOptions::from_json(r#"{"roadWidth": 12, "lanesPerRoad": 3}"#)
        .expect("valid");
    assert_eq!(options.lane_width(), 4.0);
}

#[test]
fn config_errors_lift_into_the_top_level_error() {
    let err = HyperspeedOptions::from_json(r#"{"distortion": "wobbly"}"#).unwrap_err();
    let top: HyperspeedError = err.into();
    assert!(matches!(top, HyperspeedError::Config(ConfigError::UnknownDistortion(_))));
    assert_eq!(top.to_string(), "unknown distortion model `wobbly`");
    assert_eq!(HyperspeedError::host("no window").to_string(), "host error: no window");
}
