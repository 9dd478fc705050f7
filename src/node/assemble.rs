//! Input assembly across sibling nodes.
//!
//! Every node's readiness probe is awaited, in order, before anything is emitted. A node whose
//! probe rejects never reaches the command builder.

use crate::encode::command::CommandBuilder;
use crate::foundation::error::{WavyteError, WavyteResult};
use crate::node::base::VisualNode;

/// What to do when a node's media source cannot be prepared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadinessPolicy {
    /// Abort the whole job on the first failed probe.
    #[default]
    FailJob,
    /// Leave the node out of the command and keep going.
    SkipNode,
}

/// Outcome of [`assemble_inputs`].
#[derive(Debug, Default)]
pub struct AssemblyReport {
    /// Ids of nodes whose inputs were emitted, in emission order.
    pub emitted: Vec<String>,
    /// Nodes left out under [`ReadinessPolicy::SkipNode`], with the probe error.
    pub skipped: Vec<(String, WavyteError)>,
}

/// Probe every node, then emit the inputs of the ready ones into `cmd`.
#[tracing::instrument(skip(nodes, cmd), fields(count = nodes.len()))]
pub async fn assemble_inputs<N: VisualNode>(
    nodes: &mut [N],
    cmd: &mut dyn CommandBuilder,
    policy: ReadinessPolicy,
) -> WavyteResult<AssemblyReport> {
    let mut report = AssemblyReport::default();
    let mut ready = Vec::with_capacity(nodes.len());

    for node in nodes.iter() {
        match node.is_ready().await {
            Ok(()) => ready.push(true),
            Err(e) => {
                let err = match e {
                    WavyteError::Readiness { .. } => e,
                    other => WavyteError::readiness(node.id(), other.to_string()),
                };
                match policy {
                    ReadinessPolicy::FailJob => return Err(err),
                    ReadinessPolicy::SkipNode => {
                        tracing::warn!(node = %node.id(), error = %err, "skipping node");
                        report.skipped.push((node.id().to_owned(), err));
                        ready.push(false);
                    }
                }
            }
        }
    }

    for (node, ok) in nodes.iter_mut().zip(ready) {
        if ok {
            node.emit_input(cmd)?;
            report.emitted.push(node.id().to_owned());
        }
    }
    Ok(report)
}

/// Blocking form of [`assemble_inputs`] for synchronous callers.
pub fn assemble_inputs_blocking<N: VisualNode>(
    nodes: &mut [N],
    cmd: &mut dyn CommandBuilder,
    policy: ReadinessPolicy,
) -> WavyteResult<AssemblyReport> {
    pollster::block_on(assemble_inputs(nodes, cmd, policy))
}

#[cfg(test)]
#[path = "../../tests/unit/node/assemble.rs"]
mod tests;
