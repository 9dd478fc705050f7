use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::config::effective::JobConfig;
use crate::encode::command::CommandBuilder;
use crate::foundation::core::{Geometry, Point, Size};
use crate::foundation::error::WavyteResult;

/// Filter-graph step a node asks to run on its input before compositing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PreFilter(pub String);

impl PreFilter {
    /// Filter expression, e.g. `format=yuva420p`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PreFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Media-bearing node kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Still image.
    Image,
    /// Video clip.
    Video,
}

/// Node lifecycle: `Constructed -> PreFilterRegistered -> Emitted`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeState {
    /// Freshly built.
    #[default]
    Constructed,
    /// At least one pre-filter has been registered.
    PreFilterRegistered,
    /// Input arguments have been emitted.
    Emitted,
}

/// State shared by every media node.
#[derive(Clone, Debug, Deserialize)]
#[serde(from = "NodeBaseDef")]
pub struct NodeBase {
    id: String,
    path: PathBuf,
    geometry: Geometry,
    animations: Vec<Value>,
    pre_filters: Vec<PreFilter>,
    state: NodeState,
    emit_count: u32,
}

#[derive(Deserialize)]
struct NodeBaseDef {
    #[serde(default)]
    id: Option<String>,
    path: PathBuf,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
    #[serde(default)]
    rotate: f64,
    #[serde(default = "one")]
    scale: f64,
    #[serde(default = "one")]
    opacity: f64,
    #[serde(default)]
    animations: Vec<Value>,
}

fn one() -> f64 {
    1.0
}

impl From<NodeBaseDef> for NodeBase {
    fn from(def: NodeBaseDef) -> Self {
        let mut base = NodeBase::new(def.path);
        if let Some(id) = def.id {
            base.id = id;
        }
        base.geometry = Geometry {
            position: Point::new(def.x, def.y),
            width: def.width,
            height: def.height,
            rotation_deg: def.rotate,
            scale: def.scale,
            opacity: def.opacity,
        };
        base.animations = def.animations;
        base
    }
}

impl NodeBase {
    /// Node reading from `path`, placed at the origin with a fresh id.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            path: path.into(),
            geometry: Geometry::default(),
            animations: Vec::new(),
            pre_filters: Vec::new(),
            state: NodeState::Constructed,
            emit_count: 0,
        }
    }

    /// Replace the generated id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Node id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Media source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Placement on the canvas.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Mutable placement on the canvas.
    pub fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }

    /// Animation descriptors, consumed by the animation system.
    pub fn animations(&self) -> &[Value] {
        &self.animations
    }

    /// Append an animation descriptor.
    pub fn add_animation(&mut self, animation: Value) {
        self.animations.push(animation);
    }

    /// Registered pre-filters in registration order.
    pub fn pre_filters(&self) -> &[PreFilter] {
        &self.pre_filters
    }

    /// Register a pre-filter for the filter-graph stage. Duplicates are ignored.
    pub fn add_pre_filter(&mut self, spec: impl Into<String>) {
        let filter = PreFilter(spec.into());
        if self.pre_filters.contains(&filter) {
            return;
        }
        self.pre_filters.push(filter);
        if self.state == NodeState::Constructed {
            self.state = NodeState::PreFilterRegistered;
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// How many times input arguments were emitted.
    pub fn emit_count(&self) -> u32 {
        self.emit_count
    }

    pub(crate) fn mark_emitted(&mut self) {
        if self.emit_count > 0 {
            tracing::warn!(node = %self.id, "input emitted again; the command now holds it twice");
        }
        self.emit_count += 1;
        self.state = NodeState::Emitted;
    }

    /// Node size, with each missing axis taken from the job's `width`/`height`.
    ///
    /// Returns `None` when an axis is set on neither side, e.g. under a
    /// [`NullConfig`](crate::NullConfig).
    pub fn resolve_size(&self, conf: &dyn JobConfig) -> Option<Size> {
        let width = self.geometry.width.or_else(|| conf.get_f64("width"))?;
        let height = self.geometry.height.or_else(|| conf.get_f64("height"))?;
        Some(Size::new(width, height))
    }
}

/// Capabilities every media node exposes to the job pipeline.
#[async_trait]
pub trait VisualNode: Send + Sync {
    /// Shared node state.
    fn base(&self) -> &NodeBase;

    /// Mutable shared node state.
    fn base_mut(&mut self) -> &mut NodeBase;

    /// Node kind.
    fn kind(&self) -> NodeKind;

    /// Node id.
    fn id(&self) -> &str {
        self.base().id()
    }

    /// Media source path.
    fn path(&self) -> &Path {
        self.base().path()
    }

    /// Register the pre-filters this node needs. Called once while the scene is set up.
    fn setup(&mut self) {}

    /// Append this node's input arguments to `cmd`.
    ///
    /// Not idempotent: every call appends a complete input.
    fn emit_input(&mut self, cmd: &mut dyn CommandBuilder) -> WavyteResult<()>;

    /// Wait until the media source can be read.
    ///
    /// Local files are ready immediately. Kinds that fetch or probe their source may reject,
    /// which makes this node unusable but leaves sibling nodes unaffected.
    async fn is_ready(&self) -> WavyteResult<()> {
        Ok(())
    }
}

#[async_trait]
impl<T: VisualNode + ?Sized> VisualNode for Box<T> {
    fn base(&self) -> &NodeBase {
        (**self).base()
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        (**self).base_mut()
    }

    fn kind(&self) -> NodeKind {
        (**self).kind()
    }

    fn setup(&mut self) {
        (**self).setup()
    }

    fn emit_input(&mut self, cmd: &mut dyn CommandBuilder) -> WavyteResult<()> {
        (**self).emit_input(cmd)
    }

    async fn is_ready(&self) -> WavyteResult<()> {
        (**self).is_ready().await
    }
}

#[cfg(test)]
#[path = "../../tests/unit/node/base.rs"]
mod tests;
