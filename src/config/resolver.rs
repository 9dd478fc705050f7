use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::{Number, Value};

use crate::config::effective::EffectiveConfig;
use crate::config::options::{self, Lookup, RawOptions, decode, first_truthy, supplied};
use crate::foundation::error::{WavyteError, WavyteResult};

/// Source of the per-job cache base directory when the caller supplies none.
pub trait TempDirProvider: Send + Sync {
    /// Allocate a fresh directory and return its path.
    fn allocate(&self) -> PathBuf;
}

/// Source of job ids.
pub trait UidGenerator: Send + Sync {
    /// Return a new opaque id.
    fn next_id(&self) -> String;
}

/// Allocates persistent directories under the system temp dir.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTempDir;

impl TempDirProvider for SystemTempDir {
    fn allocate(&self) -> PathBuf {
        match tempfile::Builder::new().prefix("wavyte-").tempdir() {
            Ok(dir) => dir.keep(),
            Err(e) => {
                let fallback = std::env::temp_dir();
                tracing::warn!(
                    error = %e,
                    fallback = %fallback.display(),
                    "failed to allocate cache directory"
                );
                fallback
            }
        }
    }
}

/// Random v4 UUIDs in simple (hyphen-less) form.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidV4;

impl UidGenerator for UuidV4 {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

/// Turns sparse option bags into [`EffectiveConfig`] values.
///
/// Resolution never fails. Missing options take their default. Values that do not fit a field's
/// type are kept verbatim and returned unchanged by `get`; the typed field keeps its default.
pub struct ConfigResolver {
    temp_dirs: Box<dyn TempDirProvider>,
    uids: Box<dyn UidGenerator>,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigResolver").finish_non_exhaustive()
    }
}

impl ConfigResolver {
    /// Resolver backed by the system temp dir and random UUIDs.
    pub fn new() -> Self {
        Self {
            temp_dirs: Box::new(SystemTempDir),
            uids: Box::new(UuidV4),
        }
    }

    /// Replace the cache directory provider.
    pub fn with_temp_dirs(mut self, provider: impl TempDirProvider + 'static) -> Self {
        self.temp_dirs = Box::new(provider);
        self
    }

    /// Replace the job id generator.
    pub fn with_uids(mut self, generator: impl UidGenerator + 'static) -> Self {
        self.uids = Box::new(generator);
        self
    }

    /// Resolve `raw` into a complete configuration.
    ///
    /// Calls the id generator exactly once, and the temp-dir provider once only when neither
    /// `cacheDir` nor `temp` holds a truthy value.
    #[tracing::instrument(skip(self, raw), fields(keys = raw.len()))]
    pub fn resolve(&self, raw: RawOptions) -> EffectiveConfig {
        let job_id = self.uids.next_id();
        let mut kept = Verbatim::default();

        let ext: String = kept.simple(&raw, "ext").unwrap_or_else(|| "mp4".to_owned());
        let cache_format = kept
            .simple(&raw, "cacheFormat")
            .unwrap_or_else(|| ext.clone());

        let cache_dir = kept.coalesce(&raw, "cacheDir", "temp").unwrap_or_else(|| {
            let dir = self.temp_dirs.allocate();
            tracing::debug!(cache_dir = %dir.display(), "allocated cache directory");
            dir
        });
        let output = kept
            .coalesce(&raw, "output", "out")
            .unwrap_or_else(|| PathBuf::from(format!("{job_id}.{ext}")));

        let extras: RawOptions = raw
            .iter()
            .filter(|(k, _)| !options::is_recognized(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let cfg = EffectiveConfig {
            crf: kept.simple(&raw, "crf").unwrap_or_else(|| Number::from(20)),
            vb: kept.simple(&raw, "vb"),
            queue: kept.simple(&raw, "queue").unwrap_or_else(|| Number::from(2)),
            threads: kept.simple(&raw, "threads").unwrap_or_else(|| Number::from(1)),
            preset: kept
                .simple(&raw, "preset")
                .unwrap_or_else(|| "medium".to_owned()),
            vprofile: kept
                .simple(&raw, "vprofile")
                .unwrap_or_else(|| "main".to_owned()),
            debug: kept.simple(&raw, "debug").unwrap_or(false),
            audio_loop: kept.simple(&raw, "audioLoop").unwrap_or(true),
            up_streaming: kept.simple(&raw, "upStreaming").unwrap_or(false),
            has_transition: kept.simple(&raw, "hasTransition").unwrap_or(false),
            default_output_options: kept.simple(&raw, "defaultOutputOptions").unwrap_or(true),
            fps: kept
                .coalesce(&raw, "fps", "fps")
                .unwrap_or_else(|| frame_rate(24.0)),
            rfps: kept
                .coalesce(&raw, "rfps", "rfps")
                .unwrap_or_else(|| frame_rate(24.0)),
            width: kept
                .coalesce(&raw, "width", "w")
                .unwrap_or_else(|| Number::from(800)),
            height: kept
                .coalesce(&raw, "height", "h")
                .unwrap_or_else(|| Number::from(450)),
            output_dir: kept
                .coalesce(&raw, "outputDir", "dir")
                .unwrap_or_else(|| PathBuf::from("./")),
            job_id,
            ext,
            cache_format,
            cache_dir,
            output,
            extras,
            verbatim: kept.0,
        };
        tracing::debug!(
            job_id = %cfg.job_id,
            output = %cfg.output.display(),
            cache_format = %cfg.cache_format,
            "resolved job configuration"
        );
        cfg
    }

    /// Parse `text` as a JSON object and resolve it.
    pub fn resolve_json(&self, text: &str) -> WavyteResult<EffectiveConfig> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| WavyteError::serde(e.to_string()))?;
        match value {
            Value::Object(raw) => Ok(self.resolve(raw)),
            other => Err(WavyteError::serde(format!(
                "job options must be a JSON object, got {other}"
            ))),
        }
    }
}

impl EffectiveConfig {
    /// Resolve `raw` with the default [`ConfigResolver`].
    pub fn resolve(raw: RawOptions) -> Self {
        ConfigResolver::new().resolve(raw)
    }
}

fn frame_rate(fps: f64) -> Number {
    Number::from_f64(fps).unwrap_or_else(|| Number::from(0))
}

/// Canonical values collected during one resolution that do not fit their field type.
#[derive(Default)]
struct Verbatim(RawOptions);

impl Verbatim {
    fn keep<T>(&mut self, key: &str, found: Lookup<T>) -> Option<T> {
        match found {
            Lookup::Absent => None,
            Lookup::Typed(v) => Some(v),
            Lookup::Verbatim(v) => {
                self.0.insert(key.to_owned(), v);
                None
            }
        }
    }

    fn simple<T: DeserializeOwned>(&mut self, raw: &RawOptions, key: &str) -> Option<T> {
        self.keep(key, decode(key, supplied(raw, key)))
    }

    fn coalesce<T: DeserializeOwned>(
        &mut self,
        raw: &RawOptions,
        key: &str,
        alias: &str,
    ) -> Option<T> {
        self.keep(key, decode(key, first_truthy(raw, &[key, alias])))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/resolver.rs"]
mod tests;
