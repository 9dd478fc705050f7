use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{Number, Value, json};

use crate::config::options::{self, DETAILED_CACHE_DIR, RECOGNIZED_KEYS, RawOptions, plain_text};
use crate::foundation::core::Size;
use crate::foundation::error::{WavyteError, WavyteResult};

/// Key/value access shared by the effective configuration and its null stand-in.
///
/// `get` returns `None` as the absence marker. Consumers treat it as "option not set", never as
/// an error.
pub trait JobConfig {
    /// Resolved value of `key`, or `None` when nothing is stored under it.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`.
    fn set(&mut self, key: &str, value: Value) -> WavyteResult<()>;

    /// Read `key` as a number. Values of any other JSON type read as `None`.
    fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.as_f64())
    }
}

/// Stand-in configuration for config-less previews and tests.
///
/// Every read is absent and every write is discarded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NullConfig;

impl JobConfig for NullConfig {
    fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    fn set(&mut self, _key: &str, _value: Value) -> WavyteResult<()> {
        Ok(())
    }
}

/// Complete, default-filled settings for one render job.
///
/// Built by [`ConfigResolver`](crate::ConfigResolver). Every canonical key holds a value; options
/// the resolver does not know are kept in a pass-through map.
///
/// A canonical option supplied with another JSON type than its field (`"crf": "best"`) is kept
/// verbatim: [`JobConfig::get`] returns it unchanged, while the typed accessor reports the
/// default.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectiveConfig {
    pub(crate) job_id: String,
    pub(crate) crf: Number,
    pub(crate) vb: Option<String>,
    pub(crate) queue: Number,
    pub(crate) ext: String,
    pub(crate) threads: Number,
    pub(crate) preset: String,
    pub(crate) vprofile: String,
    pub(crate) debug: bool,
    pub(crate) audio_loop: bool,
    pub(crate) up_streaming: bool,
    pub(crate) cache_format: String,
    pub(crate) has_transition: bool,
    pub(crate) default_output_options: bool,
    pub(crate) fps: Number,
    pub(crate) rfps: Number,
    pub(crate) width: Number,
    pub(crate) height: Number,
    pub(crate) output_dir: PathBuf,
    pub(crate) cache_dir: PathBuf,
    pub(crate) output: PathBuf,
    pub(crate) extras: RawOptions,
    pub(crate) verbatim: RawOptions,
}

fn float(n: &Number) -> f64 {
    n.as_f64().unwrap_or_default()
}

impl EffectiveConfig {
    /// Opaque id generated for this job.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Constant rate factor.
    pub fn crf(&self) -> f64 {
        float(&self.crf)
    }

    /// Video bitrate, when one was requested.
    pub fn vb(&self) -> Option<&str> {
        self.vb.as_deref()
    }

    /// Worker queue size.
    pub fn queue(&self) -> f64 {
        float(&self.queue)
    }

    /// Output container extension, without the dot.
    pub fn ext(&self) -> &str {
        &self.ext
    }

    /// Encoder thread count.
    pub fn threads(&self) -> f64 {
        float(&self.threads)
    }

    /// Encoder speed/quality preset.
    pub fn preset(&self) -> &str {
        &self.preset
    }

    /// H.264 profile.
    pub fn vprofile(&self) -> &str {
        &self.vprofile
    }

    /// Debug flag.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Loop background audio over the whole output.
    pub fn audio_loop(&self) -> bool {
        self.audio_loop
    }

    /// Stream output while rendering.
    pub fn up_streaming(&self) -> bool {
        self.up_streaming
    }

    /// Container used for intermediate cache files.
    pub fn cache_format(&self) -> &str {
        &self.cache_format
    }

    /// Whether scenes are joined with transitions.
    pub fn has_transition(&self) -> bool {
        self.has_transition
    }

    /// Apply the default encoder output options.
    pub fn default_output_options(&self) -> bool {
        self.default_output_options
    }

    /// Output frame rate.
    pub fn fps(&self) -> f64 {
        float(&self.fps)
    }

    /// Render frame rate.
    pub fn rfps(&self) -> f64 {
        float(&self.rfps)
    }

    /// Output width in pixels.
    pub fn width(&self) -> f64 {
        float(&self.width)
    }

    /// Output height in pixels.
    pub fn height(&self) -> f64 {
        float(&self.height)
    }

    /// Output size as floating-point geometry.
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Directory output files are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Base cache directory.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Output file path.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Options the resolver does not know, passed through as given.
    pub fn extras(&self) -> &RawOptions {
        &self.extras
    }

    /// Canonical options held as given because they do not fit their field type.
    pub fn verbatim(&self) -> &RawOptions {
        &self.verbatim
    }

    /// Per-job cache directory: `cache_dir` joined with `job_id`.
    ///
    /// Computed on every call so it tracks later changes to either part.
    pub fn detailed_cache_dir(&self) -> PathBuf {
        self.cache_dir.join(&self.job_id)
    }

    /// Format the output size as `{width}{sep}{height}`.
    ///
    /// Both sides read through [`JobConfig::get`], so verbatim values print as supplied and
    /// whole numbers print without a fraction (`800x450`, `1280.5x720`).
    pub fn width_height(&self, sep: &str) -> String {
        let side = |key: &str| self.get(key).map(|v| plain_text(&v)).unwrap_or_default();
        format!("{}{sep}{}", side("width"), side("height"))
    }

    /// Flat JSON object keyed by canonical names, extras included.
    pub fn to_value(&self) -> Value {
        let mut out = RawOptions::new();
        for key in RECOGNIZED_KEYS {
            if let Some(v) = self.get(key) {
                out.insert((*key).to_owned(), v);
            }
        }
        for (k, v) in &self.extras {
            out.insert(k.clone(), v.clone());
        }
        Value::Object(out)
    }
}

fn path_value(p: &Path) -> Value {
    Value::String(p.to_string_lossy().into_owned())
}

/// Write `value` into `slot` when it fits, otherwise keep it verbatim under `key`.
fn assign<T: DeserializeOwned>(
    slot: &mut T,
    verbatim: &mut RawOptions,
    key: &str,
    value: Value,
) {
    match T::deserialize(&value) {
        Ok(v) => {
            *slot = v;
            verbatim.remove(key);
        }
        Err(e) => {
            tracing::debug!(key, %value, error = %e, "storing option verbatim");
            verbatim.insert(key.to_owned(), value);
        }
    }
}

impl JobConfig for EffectiveConfig {
    fn get(&self, key: &str) -> Option<Value> {
        if let Some(v) = self.verbatim.get(key) {
            return Some(v.clone());
        }
        let v = match key {
            options::JOB_ID => json!(self.job_id),
            "crf" => json!(self.crf),
            "vb" => json!(self.vb),
            "queue" => json!(self.queue),
            "ext" => json!(self.ext),
            "threads" => json!(self.threads),
            "preset" => json!(self.preset),
            "vprofile" => json!(self.vprofile),
            "debug" => json!(self.debug),
            "audioLoop" => json!(self.audio_loop),
            "upStreaming" => json!(self.up_streaming),
            "cacheFormat" => json!(self.cache_format),
            "hasTransition" => json!(self.has_transition),
            "defaultOutputOptions" => json!(self.default_output_options),
            "fps" => json!(self.fps),
            "rfps" => json!(self.rfps),
            "width" => json!(self.width),
            "height" => json!(self.height),
            "outputDir" => path_value(&self.output_dir),
            "cacheDir" => path_value(&self.cache_dir),
            "output" => path_value(&self.output),
            DETAILED_CACHE_DIR => path_value(&self.detailed_cache_dir()),
            _ => return self.extras.get(key).cloned(),
        };
        Some(v)
    }

    /// Overwrite `key`.
    ///
    /// Every value is stored. Canonical keys update their typed field when the value fits and are
    /// otherwise kept verbatim; anything else lands in the pass-through map. Only
    /// `detailedCacheDir` is refused, since it is derived.
    fn set(&mut self, key: &str, value: Value) -> WavyteResult<()> {
        match key {
            options::JOB_ID => assign(&mut self.job_id, &mut self.verbatim, key, value),
            "crf" => assign(&mut self.crf, &mut self.verbatim, key, value),
            "vb" => assign(&mut self.vb, &mut self.verbatim, key, value),
            "queue" => assign(&mut self.queue, &mut self.verbatim, key, value),
            "ext" => assign(&mut self.ext, &mut self.verbatim, key, value),
            "threads" => assign(&mut self.threads, &mut self.verbatim, key, value),
            "preset" => assign(&mut self.preset, &mut self.verbatim, key, value),
            "vprofile" => assign(&mut self.vprofile, &mut self.verbatim, key, value),
            "debug" => assign(&mut self.debug, &mut self.verbatim, key, value),
            "audioLoop" => assign(&mut self.audio_loop, &mut self.verbatim, key, value),
            "upStreaming" => assign(&mut self.up_streaming, &mut self.verbatim, key, value),
            "cacheFormat" => assign(&mut self.cache_format, &mut self.verbatim, key, value),
            "hasTransition" => assign(&mut self.has_transition, &mut self.verbatim, key, value),
            "defaultOutputOptions" => assign(&mut self.default_output_options, &mut self.verbatim, key, value),
            "fps" => assign(&mut self.fps, &mut self.verbatim, key, value),
            "rfps" => assign(&mut self.rfps, &mut self.verbatim, key, value),
            "width" => assign(&mut self.width, &mut self.verbatim, key, value),
            "height" => assign(&mut self.height, &mut self.verbatim, key, value),
            "outputDir" => assign(&mut self.output_dir, &mut self.verbatim, key, value),
            "cacheDir" => assign(&mut self.cache_dir, &mut self.verbatim, key, value),
            "output" => assign(&mut self.output, &mut self.verbatim, key, value),
            DETAILED_CACHE_DIR => {
                return Err(WavyteError::config(
                    "'detailedCacheDir' is derived from cacheDir and jobId",
                ));
            }
            _ => {
                self.extras.insert(key.to_owned(), value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/effective.rs"]
mod tests;
