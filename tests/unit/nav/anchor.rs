use super::*;
use crate::dom::synthetic::{ElementSpec, SyntheticDocument};
use crate::foundation::core::Viewport;
use crate::host::synthetic::SyntheticWindow;

fn page(with_header: bool) -> SyntheticDocument {
    let mut body = Vec::new();
    if with_header {
        body.push(
            ElementSpec::new("nav").class("nav").span(0.0, 80.0).child(
                ElementSpec::new("a")
                    .attr("href", "#about")
                    .child(ElementSpec::new("span").id("label")),
            ),
        );
    }
    body.push(ElementSpec::new("a").id("top-link").attr("href", "#"));
    body.push(ElementSpec::new("a").id("dead-link").attr("href", "#missing"));
    body.push(
        ElementSpec::new("div")
            .class("scroll-indicator")
            .child(ElementSpec::new("span").id("arrow")),
    );
    body.push(ElementSpec::new("section").id("about").span(500.0, 400.0));
    SyntheticDocument::with_body(&body).unwrap()
}

fn start(doc: &mut SyntheticDocument, win: &mut SyntheticWindow) -> AnchorNavigator {
    AnchorNavigator::start(doc, win, &AnchorConfig::default()).unwrap()
}

fn window() -> SyntheticWindow {
    SyntheticWindow::new(Viewport::new(960.0, 800.0).unwrap())
}

#[test]
fn anchor_click_scrolls_below_header_and_pushes_fragment() {
    let mut doc = page(true);
    let mut win = window();
    let nav = start(&mut doc, &mut win);
    let label = doc.element_by_id("label").unwrap();

    let out = nav.on_click(&doc, &mut win, label);
    assert_eq!(
        out,
        Activation::Scrolled {
            top: 420.0,
            fragment: Some("#about".to_string())
        }
    );
    assert!(out.prevents_default());
    assert_eq!(win.history(), ["#about".to_string()]);
    assert_eq!(
        win.scroll_requests(),
        [ScrollRequest {
            top: 420.0,
            behavior: ScrollBehavior::Smooth
        }]
    );
}

#[test]
fn missing_header_counts_as_zero_height() {
    let mut doc = page(false);
    let mut win = window();
    let nav = start(&mut doc, &mut win);
    let about = doc.element_by_id("about").unwrap();
    assert_eq!(nav.header_height(&doc), 0.0);
    assert_eq!(nav.scroll_target(&doc, about, 0.0), 500.0);
}

#[test]
fn bare_hash_and_unknown_fragments_pass_through() {
    let mut doc = page(true);
    let mut win = window();
    let nav = start(&mut doc, &mut win);
    for id in ["top-link", "dead-link"] {
        let el = doc.element_by_id(id).unwrap();
        let out = nav.on_click(&doc, &mut win, el);
        assert_eq!(out, Activation::PassThrough);
        assert!(!out.prevents_default());
    }
    assert!(win.history().is_empty());
    assert!(win.scroll_requests().is_empty());

    let about = doc.element_by_id("about").unwrap();
    assert_eq!(nav.on_click(&doc, &mut win, about), Activation::Ignored);
}

#[test]
fn indicator_becomes_keyboard_accessible() {
    let mut doc = page(true);
    let mut win = window();
    let nav = start(&mut doc, &mut win);
    let ind = nav.indicator().unwrap();
    assert_eq!(doc.attribute(ind, "role").as_deref(), Some("button"));
    assert_eq!(doc.attribute(ind, "tabindex").as_deref(), Some("0"));

    let out = nav.on_key(&doc, &mut win, ind, Key::from_dom_key("Enter"));
    assert_eq!(
        out,
        Activation::Scrolled {
            top: 404.0,
            fragment: None
        }
    );
    assert!(nav
        .on_key(&doc, &mut win, ind, Key::from_dom_key(" "))
        .prevents_default());
    assert_eq!(
        nav.on_key(&doc, &mut win, ind, Key::from_dom_key("a")),
        Activation::Ignored
    );

    let arrow = doc.element_by_id("arrow").unwrap();
    assert!(matches!(
        nav.on_click(&doc, &mut win, arrow),
        Activation::Scrolled { fragment: None, .. }
    ));
    assert!(win.history().is_empty());
}

#[test]
fn existing_indicator_attributes_are_kept() {
    let mut doc = SyntheticDocument::with_body(&[ElementSpec::new("div")
        .class("scroll-indicator")
        .attr("role", "link")
        .attr("tabindex", "-1")])
    .unwrap();
    let mut win = window();
    let nav = start(&mut doc, &mut win);
    let ind = nav.indicator().unwrap();
    assert_eq!(doc.attribute(ind, "role").as_deref(), Some("link"));
    assert_eq!(doc.attribute(ind, "tabindex").as_deref(), Some("-1"));

    // No #about on this page: key presses are swallowed, clicks are not.
    let out = nav.on_key(&doc, &mut win, ind, Key::Space);
    assert_eq!(out, Activation::Suppressed);
    assert_eq!(nav.on_click(&doc, &mut win, ind), Activation::PassThrough);
    assert!(win.scroll_requests().is_empty());
}

#[test]
fn detached_navigator_ignores_everything() {
    let mut doc = page(true);
    let mut win = window();
    let mut nav = start(&mut doc, &mut win);
    assert_eq!(win.listener_count(), 5);
    nav.detach(&mut win);
    assert_eq!(win.listener_count(), 0);

    let label = doc.element_by_id("label").unwrap();
    assert_eq!(nav.on_click(&doc, &mut win, label), Activation::Ignored);
    let ind = nav.indicator().unwrap();
    assert_eq!(nav.on_key(&doc, &mut win, ind, Key::Enter), Activation::Ignored);
}

#[test]
fn page_without_anchors_registers_nothing() {
    let mut doc = SyntheticDocument::with_body(&[ElementSpec::new("p")]).unwrap();
    let mut win = window();
    let nav = start(&mut doc, &mut win);
    assert_eq!(nav.anchor_count(), 0);
    assert_eq!(win.listener_count(), 0);
}
