use async_trait::async_trait;
use serde::Deserialize;

use crate::encode::command::CommandBuilder;
use crate::foundation::error::{WavyteError, WavyteResult};
use crate::node::base::{NodeBase, NodeKind, VisualNode};
use crate::node::image::ImageNode;
use crate::node::video::VideoNode;

/// A media node of any kind, tagged by `"type"` in node descriptions.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Still image.
    Image(ImageNode),
    /// Video clip.
    Video(VideoNode),
}

impl Node {
    /// Parse a node description such as `{"type": "video", "path": "a.webm", "loop": 3}`.
    pub fn from_json(text: &str) -> WavyteResult<Self> {
        serde_json::from_str(text).map_err(|e| WavyteError::serde(e.to_string()))
    }

    /// Borrow the video node, if this is one.
    pub fn as_video(&self) -> Option<&VideoNode> {
        match self {
            Self::Video(v) => Some(v),
            Self::Image(_) => None,
        }
    }

    /// Mutably borrow the video node, if this is one.
    pub fn as_video_mut(&mut self) -> Option<&mut VideoNode> {
        match self {
            Self::Video(v) => Some(v),
            Self::Image(_) => None,
        }
    }
}

impl From<ImageNode> for Node {
    fn from(node: ImageNode) -> Self {
        Self::Image(node)
    }
}

impl From<VideoNode> for Node {
    fn from(node: VideoNode) -> Self {
        Self::Video(node)
    }
}

#[async_trait]
impl VisualNode for Node {
    fn base(&self) -> &NodeBase {
        match self {
            Self::Image(n) => n.base(),
            Self::Video(n) => n.base(),
        }
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        match self {
            Self::Image(n) => n.base_mut(),
            Self::Video(n) => n.base_mut(),
        }
    }

    fn kind(&self) -> NodeKind {
        match self {
            Self::Image(n) => n.kind(),
            Self::Video(n) => n.kind(),
        }
    }

    fn setup(&mut self) {
        match self {
            Self::Image(n) => n.setup(),
            Self::Video(n) => n.setup(),
        }
    }

    fn emit_input(&mut self, cmd: &mut dyn CommandBuilder) -> WavyteResult<()> {
        match self {
            Self::Image(n) => n.emit_input(cmd),
            Self::Video(n) => n.emit_input(cmd),
        }
    }

    async fn is_ready(&self) -> WavyteResult<()> {
        match self {
            Self::Image(n) => n.is_ready().await,
            Self::Video(n) => n.is_ready().await,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/node/kind.rs"]
mod tests;
