use super::NodeBehavior;
use crate::dialogue::DialogueContext;
use crate::error::ExecResult;
use crate::expression::{Arg, Expr};
use crate::graph::{Graph, NodeId, NodeKind};
use crate::schema::Domain;
use crate::signal::{Signal, Suggestion};

/// Wraps a name as `LIKE(Name(name))` and returns the wrapper.
pub(crate) fn like_name(graph: &mut Graph, name: NodeId) -> NodeId {
    let name_node = match graph.kind(name) {
        NodeKind::Name => name,
        _ => {
            let wrapper = graph.add(NodeKind::Name);
            graph.connect(wrapper, "pos1", name);
            wrapper
        }
    };
    let like = graph.add(NodeKind::Like);
    graph.connect(like, "pos1", name_node);
    like
}

/// Pins the search to `name` and offers to undo it.
///
/// A copy of `constraint` with its name slot set to a fuzzy match on `name`
/// replaces it as the input of `find`; the original node is left untouched.
/// The suggestion keeps the pin on implicit accept (`no_op()`), and its reject
/// branch revises the constraint to its other slots with the name cleared.
/// Returns the suggestion and the pinned constraint.
pub fn name_rejection_suggestion(
    graph: &mut Graph,
    domain: Domain,
    find: NodeId,
    constraint: NodeId,
    name: &str,
) -> (Suggestion, NodeId) {
    let mut args: Vec<Arg> = graph
        .dats(constraint)
        .into_iter()
        .filter(|(slot, _)| slot != "name")
        .map(|(slot, value)| Arg::named(slot, Expr::literal(value)))
        .collect();
    args.push(Arg::named("name", Expr::call("Clear", Vec::new())));
    let reject = Expr::call(format!("revise_{}", domain), args);

    let literal = graph.add_str(name);
    let like = like_name(graph, literal);
    let pinned = graph.duplicate_node(constraint);
    graph.connect(pinned, "name", like);
    graph.mark_evaluated(pinned);
    graph.connect(find, domain.as_str(), pinned);

    (Suggestion::new(reject.to_string(), "no_op()").implicit(), pinned)
}

/// Agent-side recommendation of a named entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestTask {
    pub domain: Domain,
}

impl NodeBehavior for SuggestTask {
    fn execute(&self, ctx: &mut DialogueContext<'_>, id: NodeId) -> ExecResult {
        let Some(name) = ctx.graph.get_dat(id, "name").map(str::to_string) else {
            return Ok(());
        };
        let accept = Expr::call(
            format!("revise_{}", self.domain),
            vec![Arg::named("name", Expr::literal(name.as_str()))],
        );
        let suggestion = Suggestion::new("no_op()", accept.to_string()).implicit();
        Err(Signal::oracle(id, format!("How about {}?", name))
            .with_suggestion(Some(suggestion))
            .into())
    }
}
