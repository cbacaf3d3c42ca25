use super::describe::compose_search_message;
use super::entity::EntityNode;
use super::suggest::name_rejection_suggestion;
use super::{NodeBehavior, collect_state, describe, query_predicates};
use crate::datastore::{Predicate, Row, collect_values, differing_fields};
use crate::dialogue::{DialogueContext, DialogueState};
use crate::error::ExecResult;
use crate::graph::{Graph, NodeId, NodeKind};
use crate::oracle::SearchActs;
use crate::schema::Domain;
use crate::signal::Signal;
use tracing::debug;

/// Search task: resolves its constraint against the datastore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindTask {
    pub domain: Domain,
}

impl FindTask {
    /// The constraint input, created empty when the expression gave none.
    fn ensure_constraint(&self, graph: &mut Graph, id: NodeId) -> NodeId {
        let slot = self.domain.as_str();
        match graph.input(id, slot) {
            Some(constraint) => constraint,
            None => {
                let constraint = graph.add(NodeKind::Entity(EntityNode::constraint(self.domain)));
                graph.mark_evaluated(constraint);
                graph.connect(id, slot, constraint);
                constraint
            }
        }
    }

    /// Narrows `rows` to those matching `name` (if given); when exactly one row
    /// remains it becomes the result of both the search and its constraint.
    fn filter_and_set_result(
        &self,
        graph: &mut Graph,
        id: NodeId,
        constraint: NodeId,
        rows: &[Row],
        name: Option<&str>,
    ) -> Vec<Row> {
        let rows: Vec<Row> = match name {
            Some(name) => {
                let filter = Predicate::like("name", name, self.domain.name_exclude_words());
                rows.iter().filter(|r| filter.matches(r)).cloned().collect()
            }
            None => rows.to_vec(),
        };
        if let [row] = rows.as_slice() {
            let found = EntityNode::from_row(graph, self.domain, row);
            graph.mark_evaluated(found);
            graph.set_result(constraint, found);
            graph.set_result(id, found);
        }
        rows
    }
}

impl NodeBehavior for FindTask {
    fn execute(&self, ctx: &mut DialogueContext<'_>, id: NodeId) -> ExecResult {
        let domain = self.domain;
        let config = ctx.config();
        let mut constraint = self.ensure_constraint(&mut ctx.graph, id);

        let predicates = query_predicates(&ctx.graph, constraint);
        let results0 = ctx.datastore().find(domain, &predicates)?;
        let nresults0 = results0.len();
        debug!(%domain, node = %id, matches = nresults0, "search executed");

        let mut results =
            self.filter_and_set_result(&mut ctx.graph, id, constraint, &results0, None);

        let mut acts = SearchActs::default();
        let mut rec_field = "rec_name";
        let mut suggestion = None;

        let oracle = ctx
            .agent_turn()
            .filter(|_| config.agent_oracle)
            .map(|turn| (SearchActs::parse(turn, domain), turn.utterance.clone()));
        if let Some((parsed, utterance)) = oracle {
            acts = parsed;
            if acts.inform.contains_key("book_name") {
                rec_field = "book_name";
            }
            if nresults0 > 1 && !acts.inform.contains_key(rec_field) {
                if let Some(names) = acts.inform.get("name").filter(|n| n.len() == 1).cloned() {
                    acts.inform.insert("rec_name".to_string(), names);
                }
            }
            if let Some(names) = acts.inform.get(rec_field).cloned() {
                if let [name] = names.as_slice() {
                    let (rejection, pinned) =
                        name_rejection_suggestion(&mut ctx.graph, domain, id, constraint, name);
                    constraint = pinned;
                    suggestion = Some(rejection);
                    let narrowed = self.filter_and_set_result(
                        &mut ctx.graph,
                        id,
                        constraint,
                        &results,
                        Some(name.as_str()),
                    );
                    if !narrowed.is_empty() {
                        results = narrowed;
                    }
                } else {
                    debug!(%domain, count = names.len(), "ignoring ambiguous recommendation");
                    acts.inform.shift_remove(rec_field);
                }
            }

            if config.is_oracle_only() {
                return Err(Signal::oracle(id, utterance)
                    .with_suggestion(suggestion)
                    .into());
            }
        }

        let recommended = acts.inform.contains_key(rec_field);
        let request: Vec<String> = acts.request.keys().cloned().collect();
        if !acts.inform.is_empty() || !request.is_empty() {
            for field in domain.inform_fields() {
                if acts.inform.contains_key(*field) {
                    acts.inform
                        .insert(field.to_string(), collect_values(&results0, field));
                }
            }
            let message = compose_search_message(domain, nresults0, &acts.inform, &request);
            if results.len() != 1 || recommended {
                return Err(Signal::oracle(id, message)
                    .with_suggestion(suggestion)
                    .into());
            }
            ctx.add_message(id, message);
            return Ok(());
        }

        match results.len() {
            0 => Err(Signal::element_not_found(
                id,
                format!(
                    "I can not find a matching {} in the database. Maybe another area or price range?",
                    domain
                ),
            )
            .with_objects(vec![constraint])
            .into()),
            1 => Ok(()),
            n => {
                let diffs = differing_fields(&results, domain.search_priority());
                let message = if diffs.is_empty() {
                    format!("Multiple ({}) matches found. Can you be more specific?", n)
                } else {
                    let hint: Vec<&str> = diffs.into_iter().take(2).collect();
                    format!(
                        "Multiple ({}) matches found. Maybe select {}?",
                        n,
                        hint.join(" or ")
                    )
                };
                Err(Signal::multiple_entries(id, message)
                    .with_suggestion(suggestion)
                    .with_objects(vec![constraint])
                    .into())
            }
        }
    }

    fn describe(&self, graph: &Graph, id: NodeId) -> String {
        if graph.is_resolved(id) {
            return describe(graph, graph.resolve(id));
        }
        graph
            .input(id, self.domain.as_str())
            .map(|c| describe(graph, c))
            .unwrap_or_else(|| format!("a {}", self.domain))
    }

    fn collect_state(&self, graph: &Graph, id: NodeId, state: &mut DialogueState) {
        if graph.is_resolved(id) {
            collect_state(graph, graph.resolve(id), state);
        } else if let Some(constraint) = graph.input(id, self.domain.as_str()) {
            collect_state(graph, constraint, state);
        }
    }
}
