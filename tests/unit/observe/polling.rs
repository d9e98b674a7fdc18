use super::*;
use crate::dom::synthetic::{ElementSpec, SyntheticDocument};
use crate::foundation::core::Rect;
use crate::observe::watcher::IntersectionOptions;

fn setup() -> (SyntheticDocument, ElementId, ElementId) {
    let doc = SyntheticDocument::with_body(&[
        ElementSpec::new("p").id("near").span(100.0, 100.0),
        ElementSpec::new("p").id("far").span(2000.0, 100.0),
    ])
    .unwrap();
    let near = doc.element_by_id("near").unwrap();
    let far = doc.element_by_id("far").unwrap();
    (doc, near, far)
}

fn vp(scroll_y: f64) -> Viewport {
    Viewport::new(960.0, 800.0).unwrap().scrolled_to(scroll_y)
}

#[test]
fn first_poll_reports_every_target_then_only_transitions() {
    let (doc, near, far) = setup();
    let mut w = PollingWatcher::new(IntersectionOptions::reveal());
    w.observe(near);
    w.observe(far);
    w.observe(near);
    assert_eq!(w.observed_count(), 2);

    let first = w.poll(&doc, vp(0.0));
    assert_eq!(first.len(), 2);
    assert_eq!((first[0].target, first[0].visible), (near, true));
    assert_eq!((first[1].target, first[1].visible), (far, false));

    assert!(w.poll(&doc, vp(10.0)).is_empty());

    let later = w.poll(&doc, vp(1600.0));
    assert_eq!(later.len(), 2);
    assert!(!later[0].visible);
    assert!(later[1].visible);
}

#[test]
fn unobserved_targets_stop_reporting() {
    let (doc, near, far) = setup();
    let mut w = PollingWatcher::new(IntersectionOptions::reveal());
    w.observe(near);
    w.observe(far);
    assert!(w.unobserve(near));
    assert!(!w.unobserve(near));
    let changes = w.poll(&doc, vp(0.0));
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].target, far);

    w.disconnect();
    assert_eq!(w.observed_count(), 0);
    assert!(w.poll(&doc, vp(1600.0)).is_empty());
}

#[test]
fn detached_or_unlaid_elements_are_not_visible() {
    let (mut doc, near, _) = setup();
    let mut w = PollingWatcher::new(IntersectionOptions::reveal());
    w.observe(near);
    doc.set_layout(near, None).unwrap();
    let changes = w.poll(&doc, vp(0.0));
    assert!(!changes[0].visible);

    doc.set_layout(near, Some(Rect::new(0.0, 100.0, 960.0, 200.0)))
        .unwrap();
    assert!(w.poll(&doc, vp(0.0))[0].visible);

    doc.remove_element(near);
    assert!(!w.poll(&doc, vp(0.0))[0].visible);
}
