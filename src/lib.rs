//! Render-job configuration and encoder input emission for Wavyte scene nodes.
//!
//! Two pieces sit between a declarative scene and the `ffmpeg` invocation:
//!
//! 1. **Resolve**: a sparse option bag (`RawOptions`) becomes a complete [`EffectiveConfig`] via
//!    [`ConfigResolver`]. Every canonical key ends up with a value.
//! 2. **Emit**: each media node ([`Node`]) appends its input arguments to a [`CommandBuilder`],
//!    after its readiness probe has resolved ([`assemble_inputs`]).
//!
//! One resolver output and one node tree belong to exactly one job. The generated job id
//! namespaces the cache directory, so sharing either across jobs makes them collide.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod encode;
mod foundation;
mod node;

pub use config::effective::{EffectiveConfig, JobConfig, NullConfig};
pub use config::options::{
    DETAILED_CACHE_DIR, JOB_ID, RECOGNIZED_KEYS, RawOptions, first_truthy, is_recognized,
    is_truthy, supplied,
};
pub use config::resolver::{ConfigResolver, SystemTempDir, TempDirProvider, UidGenerator, UuidV4};
pub use encode::command::{
    BuilderCall, CommandBuilder, FfmpegInputs, InputSpec, RecordingCommandBuilder,
};
pub use foundation::core::{Geometry, Point, Size, Vec2};
pub use foundation::error::{WavyteError, WavyteResult};
pub use node::assemble::{
    AssemblyReport, ReadinessPolicy, assemble_inputs, assemble_inputs_blocking,
};
pub use node::base::{NodeBase, NodeKind, NodeState, PreFilter, VisualNode};
pub use node::image::ImageNode;
pub use node::kind::Node;
pub use node::video::{
    ALPHA_DECODER, ALPHA_PIXEL_FORMAT, Delay, ITS_OFFSET, LoopSpec, STREAM_LOOP, VideoNode,
    has_alpha_channel,
};
