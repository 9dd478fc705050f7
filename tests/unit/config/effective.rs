use std::path::Path;

use serde_json::json;

use super::*;
use crate::config::options::RECOGNIZED_KEYS;
use crate::config::resolver::{ConfigResolver, TempDirProvider, UidGenerator};

struct FixedDir;

impl TempDirProvider for FixedDir {
    fn allocate(&self) -> PathBuf {
        PathBuf::from("/cache")
    }
}

struct FixedUid;

impl UidGenerator for FixedUid {
    fn next_id(&self) -> String {
        "abc123".to_owned()
    }
}

fn resolved(raw: Value) -> EffectiveConfig {
    ConfigResolver::new()
        .with_temp_dirs(FixedDir)
        .with_uids(FixedUid)
        .resolve(raw.as_object().cloned().unwrap())
}

#[test]
fn every_recognized_key_has_a_value() {
    let c = resolved(json!({}));
    for key in RECOGNIZED_KEYS {
        assert!(c.get(key).is_some(), "missing {key}");
    }
    assert!(c.get(DETAILED_CACHE_DIR).is_some());
    assert_eq!(c.get("vb"), Some(Value::Null));
    assert_eq!(c.get("nope"), None);
}

#[test]
fn detailed_cache_dir_tracks_mutations() {
    let mut c = resolved(json!({}));
    assert_eq!(c.detailed_cache_dir(), Path::new("/cache/abc123"));
    assert_eq!(c.get(DETAILED_CACHE_DIR), Some(json!("/cache/abc123")));

    c.set("cacheDir", json!("/other")).unwrap();
    assert_eq!(c.detailed_cache_dir(), Path::new("/other/abc123"));

    c.set("jobId", json!("zzz")).unwrap();
    assert_eq!(c.get(DETAILED_CACHE_DIR), Some(json!("/other/zzz")));
}

#[test]
fn detailed_cache_dir_is_read_only() {
    let mut c = resolved(json!({}));
    let err = c.set(DETAILED_CACHE_DIR, json!("/x")).unwrap_err();
    assert!(err.to_string().contains("config error:"));
    assert_eq!(c.detailed_cache_dir(), Path::new("/cache/abc123"));
}

#[test]
fn set_updates_typed_fields() {
    let mut c = resolved(json!({}));
    c.set("width", json!(1920)).unwrap();
    c.set("vb", json!("4000k")).unwrap();
    assert_eq!(c.width(), 1920.0);
    assert_eq!(c.vb(), Some("4000k"));

    c.set("vb", Value::Null).unwrap();
    assert_eq!(c.vb(), None);
}

#[test]
fn set_stores_mismatched_values_verbatim() {
    let mut c = resolved(json!({}));
    c.set("width", json!(1920)).unwrap();
    c.set("width", json!("wide")).unwrap();
    assert_eq!(c.get("width"), Some(json!("wide")));
    assert_eq!(c.verbatim().get("width"), Some(&json!("wide")));
    assert_eq!(c.width(), 1920.0);
    assert_eq!(c.get_f64("width"), None);

    // A later value of the field type replaces the verbatim one.
    c.set("width", json!(640.5)).unwrap();
    assert_eq!(c.get("width"), Some(json!(640.5)));
    assert!(c.verbatim().is_empty());
}

#[test]
fn set_stores_ad_hoc_keys() {
    let mut c = resolved(json!({}));
    c.set("scenesCount", json!(3)).unwrap();
    assert_eq!(c.get("scenesCount"), Some(json!(3)));
    assert_eq!(c.get_f64("scenesCount"), Some(3.0));
}

#[test]
fn width_height_formats_with_separator() {
    let c = resolved(json!({ "width": 500, "height": 300 }));
    assert_eq!(c.width_height("x"), "500x300");
    assert_eq!(c.width_height(":"), "500:300");
    assert_eq!(c.size(), Size::new(500.0, 300.0));
}

#[test]
fn width_height_drops_fraction_of_whole_floats() {
    let c = resolved(json!({ "width": 1280.0, "height": 720.5 }));
    assert_eq!(c.width_height("x"), "1280x720.5");
}

#[test]
fn to_value_is_flat_and_camel_cased() {
    let c = resolved(json!({ "title": "demo", "upStreaming": true }));
    let v = c.to_value();
    let obj = v.as_object().unwrap();
    assert_eq!(obj["jobId"], json!("abc123"));
    assert_eq!(obj["upStreaming"], json!(true));
    assert_eq!(obj["cacheFormat"], json!("mp4"));
    assert_eq!(obj["title"], json!("demo"));
    assert_eq!(obj["output"], json!("abc123.mp4"));
    assert_eq!(obj["width"], json!(800));
    assert_eq!(obj["vb"], Value::Null);
    assert!(!obj.contains_key(DETAILED_CACHE_DIR));
}

#[test]
fn null_config_reads_nothing_and_ignores_writes() {
    let mut n = NullConfig;
    assert_eq!(n.get("width"), None);
    assert_eq!(n.get(DETAILED_CACHE_DIR), None);
    n.set("width", json!(100)).unwrap();
    assert_eq!(n.get("width"), None);
    assert_eq!(n.get_f64("width"), None);
}
