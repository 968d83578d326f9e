// Host-side validation of the bundled WGSL: every scene shader with its
// common prelude and the post shader must parse and validate.

use hyperspeed_web::core::{
    scene_shader_source, COMMON_WGSL, POST_WGSL, ROAD_WGSL, STICKS_WGSL, STREAKS_WGSL,
};

fn validate(label: &str, source: &str) -> naga::Module {
    let module = naga::front::wgsl::parse_str(source)
        .unwrap_or_else(|e| panic!("{} failed to parse:\n{}", label, e.emit_to_string(source)));
    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    )
    .validate(&module)
    .unwrap_or_else(|e| panic!("{} failed validation: {:?}", label, e));
    module
}

fn entry_points(module: &naga::Module) -> Vec<&str> {
    module.entry_points.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn scene_shaders_validate_with_the_common_prelude() {
    for (label, body) in [
        ("road", ROAD_WGSL),
        ("streaks", STREAKS_WGSL),
        ("sticks", STICKS_WGSL),
    ] {
        let module = validate(label, &scene_shader_source(body));
        let names = entry_points(&module);
        assert!(names.contains(&"vs_main"), "{}: {:?}", label, names);
        assert!(names.contains(&"fs_main"), "{}: {:?}", label, names);
    }
}

#[test]
fn post_shader_exposes_every_pass() {
    let module = validate("post", POST_WGSL);
    let names = entry_points(&module);
    for name in ["vs_fullscreen", "fs_bright", "fs_blur", "fs_composite"] {
        assert!(names.contains(&name), "missing {}: {:?}", name, names);
    }
}

fn struct_span(module: &naga::Module, name: &str) -> usize {
    let ty = module
        .types
        .iter()
        .map(|(_, ty)| ty)
        .find(|ty| ty.name.as_deref() == Some(name))
        .unwrap_or_else(|| panic!("no struct {}", name));
    match ty.inner {
        naga::TypeInner::Struct { span, .. } => span as usize,
        ref other => panic!("{} is not a struct: {:?}", name, other),
    }
}

#[test]
fn uniform_blocks_match_their_rust_layouts() {
    use hyperspeed_web::core::{DistortionUniforms, StreakUniforms};
    use std::mem::size_of;

    assert!(COMMON_WGSL.contains("fn get_distortion("));
    let module = validate("streaks", &scene_shader_source(STREAKS_WGSL));
    assert_eq!(struct_span(&module, "Distortion"), size_of::<DistortionUniforms>());
    assert_eq!(struct_span(&module, "Streak"), size_of::<StreakUniforms>());
}
