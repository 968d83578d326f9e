// Host-side tests for the scene lifecycle: pointer boosts, resize handling,
// dispose idempotence and slot replacement.

mod common;

use common::{mock_host, seeded, CountingBinding, Probe};
use hyperspeed_web::host::SceneSlot;
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn pointer_round_trip_restores_rest_targets_exactly() {
    let options = seeded(r#"{"fov": 75, "fovSpeedUp": 140, "speedUp": 3}"#);
    let probe = Probe::default();
    let mut host = mock_host(&options, &probe);

    assert!(host.pointer_down());
    for _ in 0..7 {
        host.step(0.013).expect("step");
    }
    {
        let s = host.animation().expect("live");
        assert_eq!(s.target_speed, 3.0);
        assert_eq!(s.target_fov, 140.0);
    }
    assert!(host.pointer_up());
    let s = host.animation().expect("live");
    assert_eq!(s.target_speed, 0.0);
    assert_eq!(s.target_fov, 75.0);
}

#[test]
fn boost_transitions_fire_once() {
    let options = seeded("");
    let probe = Probe::default();
    let mut host = mock_host(&options, &probe);
    assert!(host.pointer_down());
    assert!(!host.pointer_down());
    assert!(host.pointer_up());
    assert!(!host.pointer_up());
}

#[test]
fn resize_ignores_missing_or_empty_sizes() {
    let options = seeded("");
    let probe = Probe::default();
    let mut host = mock_host(&options, &probe);
    assert_eq!(*probe.resizes.borrow(), vec![(800, 600)]);

    host.resize(None);
    host.resize(Some((0, 300)));
    host.resize(Some((300, 0)));
    assert_eq!(probe.resizes.borrow().len(), 1);

    host.resize(Some((1000, 500)));
    assert_eq!(probe.resizes.borrow().last(), Some(&(1000, 500)));
    assert_eq!(host.camera().expect("live").aspect, 2.0);
}

#[test]
fn dispose_is_idempotent() {
    let options = seeded("");
    let probe = Probe::default();
    let mut host = mock_host(&options, &probe);
    let released = Rc::new(Cell::new(0));
    host.bind(Box::new(CountingBinding(released.clone())));
    host.bind(Box::new(CountingBinding(released.clone())));

    host.dispose();
    host.dispose();
    assert!(!host.is_live());
    assert_eq!(probe.releases.get(), 1);
    assert_eq!(released.get(), 2);
    drop(host);
    assert_eq!(probe.releases.get(), 1);
    assert_eq!(released.get(), 2);
}

#[test]
fn events_after_dispose_are_ignored() {
    let options = seeded("");
    let probe = Probe::default();
    let mut host = mock_host(&options, &probe);
    host.dispose();

    host.resize(Some((640, 480)));
    assert!(!host.pointer_down());
    assert!(!host.pointer_up());
    assert!(host.frame().expect("no error").is_none());
    assert!(host.step(0.016).expect("no error").is_none());
    assert!(host.animation().is_none());
    assert!(host.scene().is_none());
    assert_eq!(probe.resizes.borrow().len(), 1);
    assert_eq!(probe.renders.get(), 0);
}

#[test]
fn late_bindings_are_released_immediately() {
    let options = seeded("");
    let probe = Probe::default();
    let mut host = mock_host(&options, &probe);
    host.dispose();
    let released = Rc::new(Cell::new(0));
    host.bind(Box::new(CountingBinding(released.clone())));
    assert_eq!(released.get(), 1);
}

#[test]
fn dropping_a_live_host_releases_everything() {
    let options = seeded("");
    let probe = Probe::default();
    let released = Rc::new(Cell::new(0));
    {
        let mut host = mock_host(&options, &probe);
        host.bind(Box::new(CountingBinding(released.clone())));
    }
    assert_eq!(probe.releases.get(), 1);
    assert_eq!(released.get(), 1);
}

#[test]
fn clock_driven_frame_renders() {
    let options = seeded("");
    let probe = Probe::default();
    let mut host = mock_host(&options, &probe);
    let report = host.frame().expect("frame").expect("live");
    assert!(report.render_time >= 0.0);
    host.frame().expect("frame");
    assert_eq!(probe.renders.get(), 2);
}

#[test]
fn slot_disposes_the_previous_host_first() {
    let options = seeded("");
    let (first, second) = (Probe::default(), Probe::default());
    let mut slot = SceneSlot::default();
    assert!(!slot.is_live());

    slot.install(mock_host(&options, &first));
    assert!(slot.is_live());
    slot.install(mock_host(&options, &second));
    assert_eq!(first.releases.get(), 1);
    assert_eq!(second.releases.get(), 0);
    assert!(slot.get().is_some_and(|h| h.is_live()));

    slot.dispose();
    slot.dispose();
    assert_eq!(second.releases.get(), 1);
    assert!(!slot.is_live());
    assert!(slot.get_mut().is_none());
}
