use std::path::PathBuf;

use async_trait::async_trait;

use super::*;
use crate::encode::command::{BuilderCall, RecordingCommandBuilder};
use crate::node::base::{NodeBase, NodeKind};
use crate::node::kind::Node;
use crate::node::video::VideoNode;

/// Node whose source never becomes available.
struct Unreachable {
    base: NodeBase,
}

impl Unreachable {
    fn new(id: &str) -> Self {
        Self {
            base: NodeBase::new("https://cdn.invalid/clip.mp4").with_id(id),
        }
    }
}

#[async_trait]
impl VisualNode for Unreachable {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Video
    }

    fn emit_input(&mut self, cmd: &mut dyn CommandBuilder) -> WavyteResult<()> {
        cmd.add_input(self.base.path())
    }

    async fn is_ready(&self) -> WavyteResult<()> {
        Err(WavyteError::Other(anyhow::anyhow!("connection refused")))
    }
}

fn mixed() -> Vec<Box<dyn VisualNode>> {
    vec![
        Box::new(Node::from(VideoNode::new("a.mp4").with_id("a"))),
        Box::new(Unreachable::new("remote")),
        Box::new(Node::from(VideoNode::new("b.mp4").with_id("b"))),
    ]
}

#[test]
fn ready_nodes_emit_in_order() {
    let mut nodes = vec![
        Node::from(VideoNode::new("a.mp4").with_id("a")),
        Node::from(VideoNode::new("b.mp4").with_id("b")),
    ];
    let mut rec = RecordingCommandBuilder::new();
    let report = assemble_inputs_blocking(&mut nodes, &mut rec, ReadinessPolicy::FailJob).unwrap();
    assert_eq!(report.emitted, vec!["a", "b"]);
    assert!(report.skipped.is_empty());
    assert_eq!(
        rec.calls(),
        &[
            BuilderCall::AddInput(PathBuf::from("a.mp4")),
            BuilderCall::AddInput(PathBuf::from("b.mp4")),
        ]
    );
}

#[test]
fn fail_job_stops_before_any_emission() {
    let mut nodes = mixed();
    let mut rec = RecordingCommandBuilder::new();
    let err =
        assemble_inputs_blocking(&mut nodes, &mut rec, ReadinessPolicy::FailJob).unwrap_err();
    match err {
        WavyteError::Readiness { node, message } => {
            assert_eq!(node, "remote");
            assert!(message.contains("connection refused"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(rec.calls().is_empty());
    assert_eq!(nodes[0].base().emit_count(), 0);
}

#[test]
fn skip_node_leaves_siblings_intact() {
    let mut nodes = mixed();
    let mut rec = RecordingCommandBuilder::new();
    let report = assemble_inputs_blocking(&mut nodes, &mut rec, ReadinessPolicy::SkipNode).unwrap();
    assert_eq!(report.emitted, vec!["a", "b"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].0, "remote");
    assert_eq!(rec.calls().len(), 2);
}

#[test]
fn default_policy_fails_the_job() {
    assert_eq!(ReadinessPolicy::default(), ReadinessPolicy::FailJob);
}
