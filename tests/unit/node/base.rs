use serde_json::json;

use super::*;
use crate::config::effective::NullConfig;
use crate::config::resolver::ConfigResolver;

#[test]
fn pre_filter_registration_advances_state_once() {
    let mut base = NodeBase::new("a.webm");
    assert_eq!(base.state(), NodeState::Constructed);

    base.add_pre_filter("format=yuva420p");
    base.add_pre_filter("format=yuva420p");
    assert_eq!(base.state(), NodeState::PreFilterRegistered);
    assert_eq!(base.pre_filters().len(), 1);
    assert_eq!(base.pre_filters()[0].as_str(), "format=yuva420p");

    base.mark_emitted();
    base.add_pre_filter("hflip");
    assert_eq!(base.state(), NodeState::Emitted);
    assert_eq!(base.emit_count(), 1);
}

#[test]
fn size_falls_back_to_job_config_per_axis() {
    let mut conf = ConfigResolver::new()
        .resolve_json(r#"{ "w": 1280, "h": 720, "temp": "/tmp" }"#)
        .unwrap();
    let mut base = NodeBase::new("a.mp4");
    assert_eq!(base.resolve_size(&conf), Some(Size::new(1280.0, 720.0)));

    base.geometry_mut().width = Some(320.0);
    assert_eq!(base.resolve_size(&conf), Some(Size::new(320.0, 720.0)));

    conf.set("height", json!(240)).unwrap();
    assert_eq!(base.resolve_size(&conf), Some(Size::new(320.0, 240.0)));

    conf.set("height", json!(240.5)).unwrap();
    assert_eq!(base.resolve_size(&conf), Some(Size::new(320.0, 240.5)));
}

#[test]
fn size_without_config_needs_both_axes() {
    let mut base = NodeBase::new("a.mp4");
    assert_eq!(base.resolve_size(&NullConfig), None);
    base.geometry_mut().width = Some(100.0);
    assert_eq!(base.resolve_size(&NullConfig), None);
    base.geometry_mut().height = Some(50.0);
    assert_eq!(base.resolve_size(&NullConfig), Some(Size::new(100.0, 50.0)));
}

#[test]
fn description_fields_map_onto_geometry() {
    let base: NodeBase = serde_json::from_value(json!({
        "id": "logo",
        "path": "logo.mov",
        "x": 10,
        "y": 20.5,
        "width": 300,
        "rotate": 45,
        "animations": [{ "type": "fadeIn", "time": 1 }],
    }))
    .unwrap();
    assert_eq!(base.id(), "logo");
    assert_eq!(base.path(), Path::new("logo.mov"));
    assert_eq!(base.geometry().position, Point::new(10.0, 20.5));
    assert_eq!(base.geometry().width, Some(300.0));
    assert_eq!(base.geometry().height, None);
    assert_eq!(base.geometry().rotation_deg, 45.0);
    assert_eq!(base.geometry().scale, 1.0);
    assert_eq!(base.geometry().opacity, 1.0);
    assert_eq!(base.animations().len(), 1);
}

#[test]
fn generated_ids_are_distinct() {
    let a = NodeBase::new("a.mp4");
    let b = NodeBase::new("a.mp4");
    assert_ne!(a.id(), b.id());
    assert_eq!(a.with_id("fixed").id(), "fixed");
}

#[test]
fn animations_append_in_order() {
    let mut base = NodeBase::new("a.mp4");
    base.add_animation(json!({ "type": "fadeIn" }));
    base.add_animation(json!({ "type": "zoomOut" }));
    assert_eq!(base.animations()[1]["type"], "zoomOut");
}
