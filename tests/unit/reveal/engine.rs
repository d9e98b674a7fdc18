use super::*;
use crate::dom::synthetic::{ElementSpec, SyntheticDocument};
use crate::foundation::core::Viewport;
use crate::host::synthetic::SyntheticWindow;
use crate::observe::watcher::VisibilityChange;

fn page() -> SyntheticDocument {
    SyntheticDocument::with_body(&[
        ElementSpec::new("h1")
            .id("title")
            .class("animate-on-scroll")
            .span(100.0, 100.0),
        ElementSpec::new("div")
            .id("grid")
            .attr("data-reveal-stagger", "")
            .span(1200.0, 300.0),
        ElementSpec::new("p")
            .id("done")
            .class("animate-on-scroll")
            .class("visible")
            .span(2000.0, 100.0),
    ])
    .unwrap()
}

fn window() -> SyntheticWindow {
    SyntheticWindow::new(Viewport::new(960.0, 800.0).unwrap())
}

fn id(doc: &SyntheticDocument, s: &str) -> ElementId {
    doc.element_by_id(s).unwrap()
}

#[test]
fn start_reveals_what_is_already_in_view() {
    let mut doc = page();
    let mut win = window();
    let engine = RevealEngine::start(
        &mut doc,
        &mut win,
        &RevealConfig::default(),
        MotionPreference::Allow,
    )
    .unwrap();

    assert!(doc.has_class(id(&doc, "title"), "visible"));
    assert!(!doc.has_class(id(&doc, "grid"), "revealed"));
    // Already marked: never observed.
    assert_eq!(engine.pending(), 1);
    assert!(engine.handles(EventKind::Scroll));
    assert!(engine.handles(EventKind::Resize));
}

#[test]
fn each_element_is_marked_once_then_listeners_released() {
    let mut doc = page();
    let mut win = window();
    let mut engine = RevealEngine::start(
        &mut doc,
        &mut win,
        &RevealConfig::default(),
        MotionPreference::Allow,
    )
    .unwrap();
    let grid = id(&doc, "grid");

    win.set_scroll_y(700.0);
    assert_eq!(engine.poll(&mut doc, &mut win), 1);
    assert!(doc.has_class(grid, "revealed"));
    assert!(!engine.is_watching());
    assert_eq!(win.listener_count(), 0);

    // Scrolling away and back changes nothing.
    win.set_scroll_y(0.0);
    assert_eq!(engine.poll(&mut doc, &mut win), 0);
    win.set_scroll_y(700.0);
    assert_eq!(engine.poll(&mut doc, &mut win), 0);
    assert_eq!(doc.class_add_calls(grid, "revealed"), 1);
    assert_eq!(doc.class_add_calls(id(&doc, "title"), "visible"), 1);
    assert_eq!(doc.class_add_calls(id(&doc, "done"), "visible"), 0);
}

#[test]
fn reduced_motion_reveals_everything_without_watchers() {
    let mut doc = page();
    let mut win = window();
    let engine = RevealEngine::start(
        &mut doc,
        &mut win,
        &RevealConfig::default(),
        MotionPreference::Reduce,
    )
    .unwrap();
    assert!(doc.has_class(id(&doc, "title"), "visible"));
    assert!(doc.has_class(id(&doc, "grid"), "revealed"));
    assert_eq!(engine.pending(), 0);
    assert_eq!(engine.revealed().len(), 2);
    assert_eq!(win.listener_count(), 0);
}

#[test]
fn empty_page_is_a_no_op() {
    let mut doc = SyntheticDocument::new();
    let mut win = window();
    let engine = RevealEngine::start(
        &mut doc,
        &mut win,
        &RevealConfig::default(),
        MotionPreference::Allow,
    )
    .unwrap();
    assert!(!engine.is_watching());
    assert_eq!(win.listener_count(), 0);
    assert!(doc.journal().is_empty());
}

/// Reports every observed target as visible on each poll, like a buggy native observer.
#[derive(Default)]
struct Eager {
    targets: Vec<ElementId>,
}

impl Watcher for Eager {
    fn observe(&mut self, target: ElementId) {
        self.targets.push(target);
    }

    fn unobserve(&mut self, target: ElementId) -> bool {
        let before = self.targets.len();
        self.targets.retain(|&t| t != target);
        before != self.targets.len()
    }

    fn disconnect(&mut self) {
        self.targets.clear();
    }

    fn observed_count(&self) -> usize {
        self.targets.len()
    }

    fn is_observing(&self, target: ElementId) -> bool {
        self.targets.contains(&target)
    }

    fn poll(&mut self, _doc: &dyn Document, _viewport: Viewport) -> Vec<VisibilityChange> {
        self.targets
            .iter()
            .map(|&target| VisibilityChange {
                target,
                visible: true,
                ratio: 1.0,
            })
            .collect()
    }
}

#[test]
fn custom_watchers_receive_shared_options() {
    let mut doc = page();
    let mut win = window();
    let mut seen = Vec::new();
    let engine = RevealEngine::start_with(
        &mut doc,
        &mut win,
        &RevealConfig::default(),
        MotionPreference::Allow,
        |opts| {
            seen.push(opts);
            Box::new(Eager::default())
        },
    )
    .unwrap();
    assert_eq!(seen, vec![IntersectionOptions::reveal(); 2]);
    assert_eq!(engine.revealed().len(), 2);
    assert!(doc.has_class(id(&doc, "grid"), "revealed"));
    assert_eq!(win.listener_count(), 0);
}

#[test]
fn disconnect_stops_watching() {
    let mut doc = page();
    let mut win = window();
    let mut engine = RevealEngine::start(
        &mut doc,
        &mut win,
        &RevealConfig::default(),
        MotionPreference::Allow,
    )
    .unwrap();
    engine.disconnect(&mut win);
    assert_eq!(win.listener_count(), 0);
    win.set_scroll_y(700.0);
    assert_eq!(engine.poll(&mut doc, &mut win), 0);
    assert!(!doc.has_class(id(&doc, "grid"), "revealed"));
}
