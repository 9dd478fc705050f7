use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;

use crate::encode::command::CommandBuilder;
use crate::foundation::error::WavyteResult;
use crate::node::base::{NodeBase, NodeKind, VisualNode};

/// Still-image node. The input is looped so the frame lasts as long as its scene.
#[derive(Clone, Debug, Deserialize)]
pub struct ImageNode {
    #[serde(flatten)]
    base: NodeBase,
}

impl ImageNode {
    /// Image node reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            base: NodeBase::new(path),
        }
    }

    /// Replace the generated id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.base = self.base.with_id(id);
        self
    }
}

#[async_trait]
impl VisualNode for ImageNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Image
    }

    fn emit_input(&mut self, cmd: &mut dyn CommandBuilder) -> WavyteResult<()> {
        cmd.add_input(self.base.path())?;
        cmd.input_option("-loop", "1")?;
        self.base.mark_emitted();
        Ok(())
    }
}
