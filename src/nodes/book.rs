use super::entity::BookInfoNode;
use super::{NodeBehavior, collect_state, describe};
use crate::dialogue::{DialogueContext, DialogueState};
use crate::error::ExecResult;
use crate::graph::{Graph, NodeId, NodeKind};
use crate::oracle::BookingActs;
use crate::schema::Domain;
use crate::signal::Signal;
use ahash::AHashMap;
use tracing::debug;

/// Everything an availability check may look at.
pub struct BookingRequest<'r> {
    pub domain: Domain,
    pub graph: &'r Graph,
    /// The entity being booked (resolved view of the constraint).
    pub target: NodeId,
    pub book_info: NodeId,
    /// Booking acts of the reference agent turn, in oracle mode.
    pub oracle: Option<&'r BookingActs>,
}

/// Outcome of an availability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// Booked; `None` asks the engine to issue its own confirmation code.
    Confirmed(Option<String>),
    Unavailable,
}

/// Decides whether a fully specified booking can be made.
pub trait AvailabilityCheck {
    fn check(&self, request: &BookingRequest<'_>) -> Availability;
}

/// Follows the reference agent: a `ref` confirms with that code, a `NoBook`
/// act refuses, anything else succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleAvailability;

impl AvailabilityCheck for OracleAvailability {
    fn check(&self, request: &BookingRequest<'_>) -> Availability {
        match request.oracle {
            Some(acts) if acts.reference().is_some() => {
                Availability::Confirmed(acts.reference().map(str::to_string))
            }
            Some(acts) if acts.nobook => Availability::Unavailable,
            _ => Availability::Confirmed(None),
        }
    }
}

/// The constraint of the search a booking refers to.
fn booked_constraint(graph: &Graph, book: NodeId, domain: Domain) -> Option<NodeId> {
    let find = graph.input(book, domain.as_str())?;
    match graph.kind(find) {
        NodeKind::Find(_) => graph.input(find, domain.as_str()),
        _ => None,
    }
}

/// Booking task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookTask {
    pub domain: Domain,
}

impl NodeBehavior for BookTask {
    fn init(&self, counters: &mut AHashMap<String, u32>) {
        counters.insert("max_mention_name".to_string(), 1);
    }

    fn execute(&self, ctx: &mut DialogueContext<'_>, id: NodeId) -> ExecResult {
        let domain = self.domain;
        let config = ctx.config();

        let Some(constraint) = booked_constraint(&ctx.graph, id, domain) else {
            return Err(Signal::missing_value(
                id,
                domain.as_str(),
                format!("Please specify what {} you are looking for", domain),
            )
            .into());
        };
        let target = ctx.graph.resolve(constraint);

        let oracle = ctx
            .agent_turn()
            .filter(|_| config.agent_oracle)
            .map(|turn| (BookingActs::parse(turn, domain), turn.utterance.clone()));
        if let Some((_, utterance)) = oracle.as_ref().filter(|_| config.is_oracle_only()) {
            return Err(Signal::oracle(id, utterance.clone()).into());
        }

        let mut prefix = String::new();
        if ctx.graph.count_ok(id, "mention_name") {
            ctx.graph.inc_count(id, "mention_name");
            prefix = format!("OK, {}. ", describe(&ctx.graph, target));
        }

        if ctx.graph.get_dat(target, "takesbookings") == Some("no") {
            return Err(Signal::invalid_input(
                id,
                format!(
                    "{}Unfortunately the {} does not take bookings. Maybe try another {}?",
                    prefix, domain, domain
                ),
            )
            .into());
        }

        let book_info = match ctx.graph.input(id, "book_info") {
            Some(book_info) => book_info,
            None => {
                let book_info = ctx.graph.add(NodeKind::BookInfo(BookInfoNode { domain }));
                ctx.graph.mark_evaluated(book_info);
                ctx.graph.connect(id, "book_info", book_info);
                book_info
            }
        };

        for (slot, prompt) in domain.required_booking_slots() {
            if !ctx.graph.has_input(book_info, slot) {
                return Err(
                    Signal::missing_value(id, slot, format!("{}{}", prefix, prompt)).into(),
                );
            }
        }

        let availability = ctx.availability().check(&BookingRequest {
            domain,
            graph: &ctx.graph,
            target,
            book_info,
            oracle: oracle.as_ref().map(|(acts, _)| acts),
        });
        match availability {
            Availability::Confirmed(code) => {
                let code = code.unwrap_or_else(|| ctx.next_confirmation_code());
                let code_node = ctx.graph.add_str(code.clone());
                let confirmation =
                    ctx.graph.add(NodeKind::Confirmation(ConfirmationNode { domain }));
                ctx.graph.connect(confirmation, domain.as_str(), constraint);
                ctx.graph.connect(confirmation, "book_info", book_info);
                ctx.graph.connect(confirmation, "conf_code", code_node);
                ctx.graph.mark_evaluated(confirmation);
                ctx.graph.set_result(id, confirmation);
                debug!(%domain, node = %id, code = %code, "booking confirmed");
                ctx.add_message(
                    id,
                    format!(
                        "I have made the reservation as requested. Confirmation code is {}",
                        code
                    ),
                );
                Ok(())
            }
            Availability::Unavailable => Err(Signal::invalid_input(
                id,
                format!(
                    "Unfortunately the {} can not confirm this booking. {}",
                    domain,
                    domain.booking_failure_hint()
                ),
            )
            .into()),
        }
    }

    fn describe(&self, graph: &Graph, id: NodeId) -> String {
        if graph.is_resolved(id) {
            return describe(graph, graph.resolve(id));
        }
        let mut text = graph
            .input(id, self.domain.as_str())
            .map(|find| describe(graph, find))
            .unwrap_or_else(|| format!("a {}", self.domain));
        if let Some(book_info) = graph.input(id, "book_info") {
            let details = describe(graph, book_info);
            if !details.is_empty() {
                text = format!("{}, {}", text, details);
            }
        }
        text
    }

    fn collect_state(&self, graph: &Graph, id: NodeId, state: &mut DialogueState) {
        if graph.is_resolved(id) {
            collect_state(graph, graph.resolve(id), state);
            return;
        }
        for slot in [self.domain.as_str(), "book_info"] {
            if let Some(child) = graph.input(id, slot) {
                collect_state(graph, child, state);
            }
        }
    }
}

/// A completed reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationNode {
    pub domain: Domain,
}

impl NodeBehavior for ConfirmationNode {
    fn describe(&self, graph: &Graph, id: NodeId) -> String {
        let target = graph
            .input_view(id, self.domain.as_str())
            .map(|t| describe(graph, t))
            .unwrap_or_default();
        let details = graph
            .input(id, "book_info")
            .map(|b| describe(graph, b))
            .unwrap_or_default();
        format!(
            "{} reservation: {}, {}. Confirmation code: {}",
            self.domain.title(),
            target,
            details,
            graph.get_dat(id, "conf_code").unwrap_or_default()
        )
    }

    fn collect_state(&self, graph: &Graph, id: NodeId, state: &mut DialogueState) {
        if let Some(target) = graph.input_view(id, self.domain.as_str()) {
            collect_state(graph, target, state);
        }
        if let Some(book_info) = graph.input(id, "book_info") {
            collect_state(graph, book_info, state);
        }
    }
}
