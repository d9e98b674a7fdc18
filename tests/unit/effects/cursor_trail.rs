use super::*;
use crate::dom::synthetic::SyntheticDocument;
use crate::foundation::core::Viewport;
use crate::host::synthetic::SyntheticWindow;

fn setup() -> (SyntheticDocument, SyntheticWindow, CursorTrail) {
    let doc = SyntheticDocument::new();
    let mut win = SyntheticWindow::new(Viewport::new(800.0, 600.0).unwrap());
    let trail = CursorTrail::start(&mut win, &TrailConfig::default(), 7).unwrap();
    (doc, win, trail)
}

#[test]
fn spawns_positioned_node_in_body() {
    let (mut doc, mut win, mut trail) = setup();
    let el = trail
        .on_pointer(&mut doc, &mut win, Point::new(12.0, 34.5))
        .unwrap()
        .unwrap();
    assert!(doc.has_class(el, "cursor-trail"));
    assert_eq!(doc.parent(el), Some(doc.body()));
    assert_eq!(doc.style(el, "left").as_deref(), Some("12px"));
    assert_eq!(doc.style(el, "top").as_deref(), Some("34.5px"));
    let transform = doc.style(el, "transform").unwrap();
    let scale: f64 = transform
        .trim_start_matches("translate(-50%,-50%) scale(")
        .trim_end_matches(')')
        .parse()
        .unwrap();
    assert!((0.7..1.3).contains(&scale), "{scale}");
}

#[test]
fn spawning_is_throttled() {
    let (mut doc, mut win, mut trail) = setup();
    let p = Point::new(1.0, 1.0);
    assert!(trail.on_pointer(&mut doc, &mut win, p).unwrap().is_some());
    win.advance(39.0);
    assert!(trail.on_pointer(&mut doc, &mut win, p).unwrap().is_none());
    assert!(
        trail
            .on_touch(&mut doc, &mut win, Some(p))
            .unwrap()
            .is_none()
    );
    win.advance(1.0);
    assert!(
        trail
            .on_touch(&mut doc, &mut win, Some(p))
            .unwrap()
            .is_some()
    );
    assert_eq!(trail.live_nodes().len(), 2);
}

#[test]
fn touch_without_point_is_ignored() {
    let (mut doc, mut win, mut trail) = setup();
    assert!(trail.on_touch(&mut doc, &mut win, None).unwrap().is_none());
    assert!(trail.live_nodes().is_empty());
}

#[test]
fn next_frame_starts_fade() {
    let (mut doc, mut win, mut trail) = setup();
    let el = trail
        .on_pointer(&mut doc, &mut win, Point::new(0.0, 0.0))
        .unwrap()
        .unwrap();
    let frames = win.take_frames();
    assert_eq!(frames.len(), 1);
    assert!(trail.on_frame(frames[0], &mut doc, win.now_ms()));
    assert_eq!(doc.style(el, "opacity").as_deref(), Some("0"));
    let transform = doc.style(el, "transform").unwrap();
    let scale: f64 = transform
        .trim_start_matches("translate(-50%,-50%) scale(")
        .trim_end_matches(')')
        .parse()
        .unwrap();
    assert!(scale < 1.3 * 0.18 && scale >= 0.7 * 0.18, "{scale}");
}

#[test]
fn nodes_expire_after_their_life() {
    let (mut doc, mut win, mut trail) = setup();
    let first = trail
        .on_pointer(&mut doc, &mut win, Point::new(0.0, 0.0))
        .unwrap()
        .unwrap();
    win.advance(400.0);
    let second = trail
        .on_pointer(&mut doc, &mut win, Point::new(5.0, 5.0))
        .unwrap()
        .unwrap();
    win.advance(300.0);
    assert_eq!(trail.expire(&mut doc, win.now_ms()), 1);
    assert!(!doc.is_connected(first));
    assert!(doc.is_connected(second));
    win.advance(400.0);
    assert_eq!(trail.expire(&mut doc, win.now_ms()), 1);
    assert!(trail.live_nodes().is_empty());
}

#[test]
fn steady_movement_keeps_node_count_bounded_without_timer() {
    let (mut doc, mut win, mut trail) = setup();
    let body = doc.body();
    for i in 0..200 {
        win.advance(50.0);
        let at = Point::new(f64::from(i), 10.0);
        assert!(trail.on_pointer(&mut doc, &mut win, at).unwrap().is_some());
        for token in win.take_frames() {
            trail.on_frame(token, &mut doc, win.now_ms());
        }
        // life 700 ms / 50 ms per spawn
        assert!(trail.live_nodes().len() <= 14, "{}", trail.live_nodes().len());
        assert!(doc.children(body).len() <= 14);
    }
    assert_eq!(doc.children(body).len(), trail.live_nodes().len());
}

#[test]
fn frame_expires_old_nodes() {
    let (mut doc, mut win, mut trail) = setup();
    let el = trail
        .on_pointer(&mut doc, &mut win, Point::new(0.0, 0.0))
        .unwrap()
        .unwrap();
    let frames = win.take_frames();
    win.advance(700.0);
    assert!(trail.on_frame(frames[0], &mut doc, win.now_ms()));
    assert!(!doc.is_connected(el));
    assert!(trail.live_nodes().is_empty());
}

#[test]
fn stop_removes_live_nodes_and_listeners() {
    let (mut doc, mut win, mut trail) = setup();
    let el = trail
        .on_pointer(&mut doc, &mut win, Point::new(0.0, 0.0))
        .unwrap()
        .unwrap();
    assert_eq!(win.listener_count(), 2);
    trail.stop(&mut doc, &mut win);
    assert!(!doc.is_connected(el));
    assert_eq!(win.listener_count(), 0);
    assert!(win.pending_frames().is_empty());
    win.advance(100.0);
    assert!(
        trail
            .on_pointer(&mut doc, &mut win, Point::new(0.0, 0.0))
            .unwrap()
            .is_none()
    );
}

#[test]
fn invalid_config_is_rejected() {
    let mut win = SyntheticWindow::new(Viewport::new(800.0, 600.0).unwrap());
    let cfg = TrailConfig {
        life_ms: 0.0,
        ..TrailConfig::default()
    };
    assert!(CursorTrail::start(&mut win, &cfg, 1).is_err());
    assert_eq!(win.listener_count(), 0);
}
