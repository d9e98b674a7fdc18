use super::*;
use crate::dom::synthetic::{ElementSpec, SyntheticDocument};
use crate::foundation::core::Rect;
use crate::host::synthetic::SyntheticWindow;

fn page(spans: &[(&str, f64, f64)]) -> SyntheticDocument {
    let mut links = ElementSpec::new("ul").class("nav-links");
    for (id, _, _) in spans {
        links = links.child(ElementSpec::new("a").attr("href", format!("#{id}")));
    }
    let mut body = vec![ElementSpec::new("nav").class("nav").child(links)];
    for (id, top, h) in spans {
        body.push(ElementSpec::new("section").id(*id).span(*top, *h));
    }
    SyntheticDocument::with_body(&body).unwrap()
}

fn window(scroll_y: f64, height: f64) -> SyntheticWindow {
    let mut w = SyntheticWindow::new(Viewport::new(960.0, height).unwrap());
    w.set_scroll_y(scroll_y);
    w
}

fn active_links(doc: &SyntheticDocument) -> Vec<String> {
    let sel = Selector::parse(".nav-links a").unwrap();
    doc.query_all(&sel)
        .into_iter()
        .filter(|&a| doc.has_class(a, "active"))
        .map(|a| {
            assert_eq!(doc.attribute(a, "aria-current").as_deref(), Some("page"));
            doc.attribute(a, "href").unwrap()
        })
        .collect()
}

fn spans(list: &[(&str, f64, f64)]) -> Vec<SectionSpan> {
    list.iter()
        .map(|(id, top, height)| SectionSpan {
            id: id.to_string(),
            top: *top,
            height: *height,
        })
        .collect()
}

#[test]
fn midpoint_selects_containing_span() {
    let s = spans(&[("hero", 0.0, 100.0), ("about", 100.0, 200.0), ("work", 300.0, 200.0)]);
    assert_eq!(select_active(&s, 250.0), Some("about"));
    // Shared edges resolve to the earlier section.
    assert_eq!(select_active(&s, 100.0), Some("hero"));
    assert_eq!(select_active(&s, 500.0), Some("work"));
    assert_eq!(select_active(&s, 500.5), None);
}

#[test]
fn start_marks_exactly_one_entry() {
    let mut doc = page(&[("hero", 0.0, 100.0), ("about", 100.0, 200.0), ("work", 300.0, 200.0)]);
    let mut win = window(150.0, 200.0);
    let tracker = ActiveSectionTracker::start(&mut doc, &mut win, &NavConfig::default())
        .unwrap()
        .unwrap();
    assert_eq!(tracker.active(), Some("about"));
    assert_eq!(active_links(&doc), vec!["#about".to_string()]);
    assert!(win.has_listener(ListenerTarget::Window, EventKind::Scroll));
    assert!(win.has_listener(ListenerTarget::Window, EventKind::Resize));
}

#[test]
fn scroll_requests_coalesce_into_one_frame() {
    let mut doc = page(&[("hero", 0.0, 1000.0), ("about", 1000.0, 1000.0)]);
    let mut win = window(0.0, 800.0);
    let mut tracker = ActiveSectionTracker::start(&mut doc, &mut win, &NavConfig::default())
        .unwrap()
        .unwrap();

    assert!(tracker.request_update(&mut win));
    for _ in 0..10 {
        assert!(!tracker.request_update(&mut win));
    }
    let frames = win.take_frames();
    assert_eq!(frames.len(), 1);

    win.set_scroll_y(900.0);
    assert!(tracker.on_frame(frames[0], &mut doc, &win));
    assert_eq!(tracker.active(), Some("about"));
    assert!(!tracker.on_frame(frames[0], &mut doc, &win));
    assert!(tracker.request_update(&mut win));
}

#[test]
fn gaps_retain_previous_section_by_default() {
    let mut doc = page(&[("a", 0.0, 400.0), ("b", 400.0, 400.0), ("c", 1200.0, 400.0)]);
    let mut win = window(0.0, 400.0);
    let mut tracker = ActiveSectionTracker::start(&mut doc, &mut win, &NavConfig::default())
        .unwrap()
        .unwrap();
    assert_eq!(tracker.active(), Some("a"));

    // Midpoint 700 sits in "b".
    tracker.update(&mut doc, win.viewport().scrolled_to(500.0));
    assert_eq!(tracker.active(), Some("b"));
    // Midpoint 1000 falls in the gap between "b" and "c".
    tracker.update(&mut doc, win.viewport().scrolled_to(800.0));
    assert_eq!(tracker.active(), Some("b"));
    assert_eq!(active_links(&doc), vec!["#b".to_string()]);
    // Past the last section.
    tracker.update(&mut doc, win.viewport().scrolled_to(5000.0));
    assert_eq!(tracker.active(), Some("b"));
}

#[test]
fn first_section_policy_falls_back_statelessly() {
    let mut doc = page(&[("a", 0.0, 400.0), ("b", 400.0, 400.0), ("c", 1200.0, 400.0)]);
    let mut win = window(0.0, 400.0);
    let cfg = NavConfig {
        gap_policy: GapPolicy::FirstSection,
        ..NavConfig::default()
    };
    let mut tracker = ActiveSectionTracker::start(&mut doc, &mut win, &cfg)
        .unwrap()
        .unwrap();
    tracker.update(&mut doc, win.viewport().scrolled_to(500.0));
    assert_eq!(tracker.active(), Some("b"));
    tracker.update(&mut doc, win.viewport().scrolled_to(800.0));
    assert_eq!(tracker.active(), Some("a"));
    assert_eq!(active_links(&doc), vec!["#a".to_string()]);
}

#[test]
fn geometry_is_read_at_every_recomputation() {
    let mut doc = page(&[("a", 0.0, 400.0), ("b", 400.0, 400.0)]);
    let mut win = window(0.0, 400.0);
    let mut tracker = ActiveSectionTracker::start(&mut doc, &mut win, &NavConfig::default())
        .unwrap()
        .unwrap();
    assert_eq!(tracker.active(), Some("a"));

    let b = doc.element_by_id("b").unwrap();
    doc.set_layout(b, Some(Rect::new(0.0, 100.0, 960.0, 900.0)))
        .unwrap();
    let a = doc.element_by_id("a").unwrap();
    doc.set_layout(a, Some(Rect::new(0.0, 0.0, 960.0, 100.0)))
        .unwrap();
    tracker.update(&mut doc, win.viewport());
    assert_eq!(tracker.active(), Some("b"));
}

#[test]
fn missing_links_or_sections_leave_tracker_inert() {
    let mut doc = SyntheticDocument::with_body(&[ElementSpec::new("section")
        .id("a")
        .span(0.0, 100.0)])
    .unwrap();
    let mut win = window(0.0, 400.0);
    assert!(
        ActiveSectionTracker::start(&mut doc, &mut win, &NavConfig::default())
            .unwrap()
            .is_none()
    );

    let mut doc = page(&[]);
    assert!(
        ActiveSectionTracker::start(&mut doc, &mut win, &NavConfig::default())
            .unwrap()
            .is_none()
    );
    assert_eq!(win.listener_count(), 0);
}

#[test]
fn teardown_detaches_and_cancels_pending_frame() {
    let mut doc = page(&[("a", 0.0, 400.0)]);
    let mut win = window(0.0, 400.0);
    let mut tracker = ActiveSectionTracker::start(&mut doc, &mut win, &NavConfig::default())
        .unwrap()
        .unwrap();
    tracker.request_update(&mut win);
    assert_eq!(win.pending_frames().len(), 1);

    tracker.teardown(&mut win);
    assert_eq!(win.listener_count(), 0);
    assert!(win.pending_frames().is_empty());
    assert!(tracker.pending_frame().is_none());
    assert!(!tracker.request_update(&mut win));
}
