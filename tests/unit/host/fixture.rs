use super::*;
use crate::dom::document::Document;
use crate::host::window::{REDUCED_MOTION_QUERY, Window};

#[test]
fn json_fixture_builds_document_and_window() {
    let json = r##"
{
  "viewport": { "width": 1280, "height": 200, "scroll_y": 150 },
  "elements": [
    { "tag": "section", "id": "hero", "classes": ["section"], "rect": [0, 0, 1280, 100] },
    { "tag": "section", "id": "about", "rect": [0, 100, 1280, 200],
      "children": [ { "tag": "p", "classes": ["animate-on-scroll"] } ] }
  ]
}
"##;
    let fixture = PageFixture::from_json_str(json).unwrap();
    let (doc, win) = fixture.build().unwrap();
    let about = doc.element_by_id("about").unwrap();
    assert_eq!(doc.offset_top(about), 100.0);
    assert_eq!(win.viewport().scroll_y, 150.0);
    assert_eq!(win.media_matches(REDUCED_MOTION_QUERY), Some(false));
}

#[test]
fn explicit_null_reduced_motion_means_unsupported() {
    let json = r#"{ "viewport": { "width": 10, "height": 10 }, "reduced_motion": null }"#;
    let (_, win) = PageFixture::from_json_str(json).unwrap().build().unwrap();
    assert_eq!(win.media_matches(REDUCED_MOTION_QUERY), None);
}

#[test]
fn malformed_fixture_is_a_serde_error() {
    let err = PageFixture::from_json_str("{ \"viewport\": 3 }").unwrap_err();
    assert!(err.to_string().contains("serialization error:"));
}

#[test]
fn negative_viewport_is_rejected_at_build() {
    let fixture = PageFixture::new(
        Viewport {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width: -5.0,
            height: 10.0,
        },
        vec![],
    );
    assert!(fixture.build().is_err());
}

#[test]
fn missing_file_reports_path() {
    let err = PageFixture::from_path("does/not/exist.json").unwrap_err();
    assert!(err.to_string().contains("does/not/exist.json"));
}
