use super::*;
use crate::host::synthetic::SyntheticWindow;

#[test]
fn listeners_detach_together() {
    let mut win = SyntheticWindow::new(Viewport::new(800.0, 600.0).unwrap());
    let mut held = Listeners::default();
    held.add(&mut win, ListenerTarget::Window, EventKind::Scroll);
    held.add(&mut win, ListenerTarget::Window, EventKind::Resize);
    held.add(
        &mut win,
        ListenerTarget::Element(ElementId(3)),
        EventKind::Click,
    );
    assert_eq!(held.len(), 3);
    assert_eq!(win.listener_count(), 3);
    assert!(held.listens_to(EventKind::Resize));
    assert!(held.listens_on(ListenerTarget::Element(ElementId(3)), EventKind::Click));
    assert!(!held.listens_on(ListenerTarget::Element(ElementId(4)), EventKind::Click));

    held.detach_all(&mut win);
    assert!(held.is_empty());
    assert_eq!(win.listener_count(), 0);
    assert!(!held.listens_to(EventKind::Scroll));
}
