//! Common test utilities: a small datastore and dialogue contexts over it.
use turnflow::prelude::*;

#[allow(dead_code)]
static ORACLE: OracleAvailability = OracleAvailability;

/// Hotels and restaurants used across the tests.
///
/// Three cheap hotels in the north differ in `type` and `parking`; a fourth
/// north hotel is moderately priced.
#[allow(dead_code)]
pub fn create_datastore() -> InMemoryDatastore {
    InMemoryDatastore::new()
        .with_row(
            Domain::Hotel,
            &[
                ("name", "acorn guest house"),
                ("area", "north"),
                ("pricerange", "cheap"),
                ("type", "guesthouse"),
                ("parking", "yes"),
                ("internet", "yes"),
                ("stars", "4"),
                ("takesbookings", "yes"),
            ],
        )
        .with_row(
            Domain::Hotel,
            &[
                ("name", "ashley hotel"),
                ("area", "north"),
                ("pricerange", "cheap"),
                ("type", "hotel"),
                ("parking", "no"),
                ("internet", "yes"),
                ("stars", "2"),
                ("takesbookings", "yes"),
            ],
        )
        .with_row(
            Domain::Hotel,
            &[
                ("name", "worth house"),
                ("area", "north"),
                ("pricerange", "cheap"),
                ("type", "guesthouse"),
                ("parking", "yes"),
                ("internet", "yes"),
                ("stars", "4"),
                ("takesbookings", "yes"),
            ],
        )
        .with_row(
            Domain::Hotel,
            &[
                ("name", "limehouse"),
                ("area", "north"),
                ("pricerange", "moderate"),
                ("type", "guesthouse"),
                ("parking", "no"),
                ("internet", "yes"),
                ("stars", "4"),
                ("takesbookings", "yes"),
            ],
        )
        .with_row(
            Domain::Hotel,
            &[
                ("name", "lensfield hotel"),
                ("area", "south"),
                ("pricerange", "expensive"),
                ("type", "hotel"),
                ("parking", "yes"),
                ("internet", "yes"),
                ("stars", "3"),
                ("takesbookings", "yes"),
            ],
        )
        .with_row(
            Domain::Hotel,
            &[
                ("name", "university arms hotel"),
                ("area", "centre"),
                ("pricerange", "expensive"),
                ("type", "hotel"),
                ("parking", "yes"),
                ("stars", "4"),
                ("takesbookings", "no"),
            ],
        )
        .with_row(
            Domain::Restaurant,
            &[
                ("name", "pizza hut city centre"),
                ("area", "centre"),
                ("pricerange", "cheap"),
                ("food", "italian"),
                ("address", "regent street city centre"),
            ],
        )
        .with_row(
            Domain::Restaurant,
            &[
                ("name", "golden wok"),
                ("area", "north"),
                ("pricerange", "moderate"),
                ("food", "chinese"),
                ("address", "191 histon road chesterton"),
            ],
        )
        .with_row(
            Domain::Restaurant,
            &[
                ("name", "the nirala"),
                ("area", "north"),
                ("pricerange", "moderate"),
                ("food", "indian"),
                ("address", "7 milton road chesterton"),
            ],
        )
}

/// Owns everything a [`DialogueContext`] borrows.
#[allow(dead_code)]
pub struct Harness {
    pub registry: NodeRegistry,
    pub datastore: InMemoryDatastore,
    pub config: EngineConfig,
}

#[allow(dead_code)]
impl Harness {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            registry: NodeRegistry::new(),
            datastore: create_datastore(),
            config,
        }
    }

    pub fn context(&self) -> DialogueContext<'_> {
        DialogueContext::new(&self.registry, &self.datastore, &ORACLE, &self.config)
    }
}

/// Parses and evaluates one expression in `ctx`.
#[allow(dead_code)]
pub fn run(ctx: &mut DialogueContext<'_>, source: &str) -> ExecResult<NodeId> {
    let expr = parse_expression(source).expect("test expression parses");
    execute_expression(ctx, &expr)
}

/// The signal raised by `result`; panics on success or on a fault.
#[allow(dead_code)]
pub fn expect_signal<T: std::fmt::Debug>(result: ExecResult<T>) -> Signal {
    match result {
        Err(Interrupt::Signal(signal)) => *signal,
        other => panic!("expected a signal, got {:?}", other),
    }
}

/// Literal slot values of the node `id` resolves to.
#[allow(dead_code)]
pub fn resolved_name(ctx: &DialogueContext<'_>, id: NodeId) -> Option<String> {
    let target = ctx.graph.resolve(id);
    ctx.graph.get_dat(target, "name").map(str::to_string)
}

/// A system turn for oracle tests.
#[allow(dead_code)]
pub fn agent(utterance: &str, acts: &[(&str, &[(&str, &str)])]) -> AgentTurn {
    acts.iter()
        .fold(AgentTurn::new(utterance), |turn, (label, pairs)| {
            turn.with_act(label, pairs)
        })
}
