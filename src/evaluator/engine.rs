use crate::dialogue::DialogueContext;
use crate::error::ExecResult;
use crate::graph::NodeId;
use tracing::trace;

/// The recursive dataflow engine for one evaluation request.
///
/// A node runs once all of its inputs have run; a node that raised stays
/// unevaluated and runs again the next time it is reached.
pub(super) struct DataflowEngine<'c, 'a> {
    ctx: &'c mut DialogueContext<'a>,
}

impl<'c, 'a> DataflowEngine<'c, 'a> {
    pub(super) fn new(ctx: &'c mut DialogueContext<'a>) -> Self {
        Self { ctx }
    }

    /// Evaluates the subgraph under `root`, then whatever it resolved to.
    pub(super) fn evaluate(&mut self, root: NodeId) -> ExecResult {
        self.evaluate_recursive(root, 0)
    }

    fn evaluate_recursive(&mut self, id: NodeId, depth: usize) -> ExecResult {
        if self.ctx.graph.is_evaluated(id) {
            return Ok(());
        }

        let children: Vec<NodeId> = self.ctx.graph.node(id).inputs().values().copied().collect();
        for child in children {
            self.evaluate_recursive(child, depth + 1)?;
        }

        let kind = self.ctx.graph.kind(id);
        trace!(node = %id, kind = %kind.type_name(), depth, "executing");
        kind.behavior().execute(self.ctx, id)?;
        self.ctx.graph.mark_evaluated(id);

        let result = self.ctx.graph.result(id);
        if result != id {
            self.evaluate_recursive(result, depth + 1)?;
        }
        Ok(())
    }
}
