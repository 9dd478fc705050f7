use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::config::options::{is_truthy, plain_text};
use crate::encode::command::CommandBuilder;
use crate::foundation::error::WavyteResult;
use crate::node::base::{NodeBase, NodeKind, VisualNode};

/// Input option repeating a stream; `-1` loops forever.
pub const STREAM_LOOP: &str = "-stream_loop";
/// Input option shifting the input timeline by a number of seconds.
pub const ITS_OFFSET: &str = "-itsoffset";
/// Decoder that keeps the alpha plane of VP9 sources.
pub const ALPHA_DECODER: &str = "libvpx-vp9";
/// Pre-filter that preserves alpha through the filter graph.
pub const ALPHA_PIXEL_FORMAT: &str = "format=yuva420p";

const ALPHA_EXTENSIONS: &[&str] = &["webm", "mov"];

/// Return `true` when `path` names a container that may carry an alpha channel.
///
/// Only the extension is inspected.
pub fn has_alpha_channel(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| ALPHA_EXTENSIONS.iter().any(|a| e.eq_ignore_ascii_case(a)))
}

/// How often a video input repeats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopSpec {
    /// Play once.
    #[default]
    Disabled,
    /// Repeat forever.
    Infinite,
    /// Repeat `n` extra times. Forwarded to the encoder unchecked.
    ///
    /// `-stream_loop` takes an integer, so fractional counts are truncated toward zero when a
    /// raw value is interpreted (`2.7` repeats twice).
    Count(i64),
}

impl LoopSpec {
    /// Interpret a raw option value.
    ///
    /// Falsy values disable looping, numbers give a repeat count (truncated toward zero), and
    /// any other truthy value loops forever.
    pub fn from_value(value: &Value) -> Self {
        if !is_truthy(value) {
            return Self::Disabled;
        }
        match value.as_i64() {
            Some(n) => Self::from(n),
            None => match value.as_f64() {
                Some(f) => Self::from(f.trunc() as i64),
                None => Self::Infinite,
            },
        }
    }

    /// Value for `-stream_loop`, or `None` when looping is off.
    pub fn repeat_count(self) -> Option<i64> {
        match self {
            Self::Disabled => None,
            Self::Infinite => Some(-1),
            Self::Count(n) => Some(n),
        }
    }
}

impl From<bool> for LoopSpec {
    fn from(on: bool) -> Self {
        if on { Self::Infinite } else { Self::Disabled }
    }
}

/// A count of `0` disables looping; any other count is kept as given.
impl From<i64> for LoopSpec {
    fn from(n: i64) -> Self {
        if n == 0 { Self::Disabled } else { Self::Count(n) }
    }
}

impl From<u32> for LoopSpec {
    fn from(n: u32) -> Self {
        Self::from(i64::from(n))
    }
}

impl<'de> Deserialize<'de> for LoopSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&raw))
    }
}

/// Timeline offset handed to `-itsoffset` as written.
///
/// Seconds (`2.5`) and ffmpeg durations (`"00:00:02.5"`) are both accepted; nothing is
/// validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delay(String);

impl Delay {
    /// Interpret a raw option value. Falsy values (`0`, `""`, `null`, `false`) mean no offset.
    pub fn from_value(value: &Value) -> Option<Self> {
        is_truthy(value).then(|| Self(plain_text(value)))
    }

    /// Offset text as passed to the encoder.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Delay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Video clip node.
#[derive(Clone, Debug, Deserialize)]
#[serde(from = "VideoNodeDef")]
pub struct VideoNode {
    base: NodeBase,
    loop_spec: LoopSpec,
    delay: Option<Delay>,
    has_alpha: bool,
}

#[derive(Deserialize)]
struct VideoNodeDef {
    #[serde(flatten)]
    base: NodeBase,
    #[serde(default, rename = "loop")]
    loop_spec: LoopSpec,
    #[serde(default)]
    delay: Value,
}

impl From<VideoNodeDef> for VideoNode {
    fn from(def: VideoNodeDef) -> Self {
        let mut node = Self::from_base(def.base);
        node.loop_spec = def.loop_spec;
        node.delay = Delay::from_value(&def.delay);
        node
    }
}

impl VideoNode {
    /// Video node reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::from_base(NodeBase::new(path))
    }

    fn from_base(base: NodeBase) -> Self {
        let has_alpha = has_alpha_channel(base.path());
        Self {
            base,
            loop_spec: LoopSpec::Disabled,
            delay: None,
            has_alpha,
        }
    }

    /// Replace the generated id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.base = self.base.with_id(id);
        self
    }

    /// Builder form of [`VideoNode::set_loop`].
    pub fn with_loop(mut self, spec: impl Into<LoopSpec>) -> Self {
        self.set_loop(spec);
        self
    }

    /// Builder form of [`VideoNode::set_delay`].
    pub fn with_delay(mut self, delay: impl Into<Value>) -> Self {
        self.set_delay(delay);
        self
    }

    /// Set the loop behavior.
    pub fn set_loop(&mut self, spec: impl Into<LoopSpec>) {
        self.loop_spec = spec.into();
    }

    /// Set the timeline offset: seconds or an ffmpeg duration string, forwarded unvalidated.
    ///
    /// A falsy value (`0`, `""`) removes the offset.
    pub fn set_delay(&mut self, delay: impl Into<Value>) {
        self.delay = Delay::from_value(&delay.into());
    }

    /// Remove the timeline offset.
    pub fn clear_delay(&mut self) {
        self.delay = None;
    }

    /// Loop behavior.
    pub fn loop_spec(&self) -> LoopSpec {
        self.loop_spec
    }

    /// Timeline offset as it will be emitted.
    pub fn delay(&self) -> Option<&str> {
        self.delay.as_ref().map(Delay::as_str)
    }

    /// Whether the source container may carry alpha.
    pub fn has_alpha_channel(&self) -> bool {
        self.has_alpha
    }

    /// Register the alpha-preserving pixel format when the source has alpha.
    pub fn add_video_pre_filter(&mut self) {
        if self.has_alpha {
            self.base.add_pre_filter(ALPHA_PIXEL_FORMAT);
        }
    }
}

#[async_trait]
impl VisualNode for VideoNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Video
    }

    fn setup(&mut self) {
        self.add_video_pre_filter();
    }

    // Order is fixed: input (+ loop), alpha decoder, then offset.
    #[tracing::instrument(skip(self, cmd), fields(node = %self.base.id()))]
    fn emit_input(&mut self, cmd: &mut dyn CommandBuilder) -> WavyteResult<()> {
        cmd.add_input(self.base.path())?;
        if let Some(n) = self.loop_spec.repeat_count() {
            cmd.input_option(STREAM_LOOP, &n.to_string())?;
        }
        if self.has_alpha {
            cmd.add_input_options(&["-c:v", ALPHA_DECODER])?;
        }
        if let Some(delay) = &self.delay {
            cmd.input_option(ITS_OFFSET, delay.as_str())?;
        }
        self.base.mark_emitted();
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/node/video.rs"]
mod tests;
