use serde_json::json;

use super::*;

fn bag(v: Value) -> RawOptions {
    v.as_object().cloned().unwrap()
}

#[test]
fn truthiness_follows_js_rules() {
    for v in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
        assert!(!is_truthy(&v), "{v} should be falsy");
    }
    for v in [json!(true), json!(1), json!(-3), json!("0"), json!([]), json!({})] {
        assert!(is_truthy(&v), "{v} should be truthy");
    }
}

#[test]
fn supplied_keeps_falsy_values() {
    let raw = bag(json!({ "crf": 0, "debug": false, "vb": null }));
    assert_eq!(supplied(&raw, "crf"), Some(&json!(0)));
    assert_eq!(supplied(&raw, "debug"), Some(&json!(false)));
    assert_eq!(supplied(&raw, "vb"), None);
    assert_eq!(supplied(&raw, "missing"), None);
}

#[test]
fn first_truthy_skips_falsy_primary() {
    let raw = bag(json!({ "width": 0, "w": 999 }));
    assert_eq!(first_truthy(&raw, &["width", "w"]), Some(&json!(999)));

    let raw = bag(json!({ "width": 500, "w": 999 }));
    assert_eq!(first_truthy(&raw, &["width", "w"]), Some(&json!(500)));

    let raw = bag(json!({ "width": "" }));
    assert_eq!(first_truthy(&raw, &["width", "w"]), None);
}

#[test]
fn decode_keeps_mismatched_types_verbatim() {
    assert_eq!(decode::<u32>("crf", Some(&json!(18))), Lookup::Typed(18));
    assert_eq!(
        decode::<u32>("crf", Some(&json!("high"))),
        Lookup::Verbatim(json!("high"))
    );
    assert_eq!(
        decode::<serde_json::Number>("width", Some(&json!(-5))),
        Lookup::Typed(serde_json::Number::from(-5))
    );
    assert_eq!(decode::<u32>("crf", None), Lookup::Absent);
}

#[test]
fn derived_key_is_recognized() {
    assert!(is_recognized("detailedCacheDir"));
    assert!(is_recognized("jobId"));
    assert!(!is_recognized("w"));
}
