use std::fmt;
use std::sync::Mutex;

use tracing::debug;

/// How a table was attached to the running join order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStrategy {
    MultiIndex,
    SingleIndex,
    ProductSelect,
}

impl fmt::Display for JoinStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JoinStrategy::MultiIndex => "multi-index",
            JoinStrategy::SingleIndex => "single-index",
            JoinStrategy::ProductSelect => "product-select",
        };
        f.write_str(name)
    }
}

/// One decision made while planning a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanEvent {
    /// A table's access path was chosen, naming the indexed fields that
    /// will drive it (empty means a full table scan).
    SelectPath {
        table: String,
        indexed_fields: Vec<String>,
    },
    /// A table was picked as the left-deep seed.
    SeedChosen { table: String, rdf: u64 },
    /// A table was joined onto the running plan.
    JoinChosen {
        table: String,
        strategy: JoinStrategy,
        blocks: u64,
    },
    /// No join predicate connected the table; a product was taken.
    ProductFallback { table: String, blocks: u64 },
}

/// Receives planning decisions. Injected into the planner so callers
/// choose where decisions go: a log, a recording, or nowhere.
pub trait PlanEventSink: Send + Sync {
    fn plan_event(&self, event: PlanEvent);
}

/// Forwards planning decisions to the `tracing` subscriber.
#[derive(Debug, Default)]
pub struct TracingSink;

impl PlanEventSink for TracingSink {
    fn plan_event(&self, event: PlanEvent) {
        match event {
            PlanEvent::SelectPath {
                table,
                indexed_fields,
            } => debug!(%table, ?indexed_fields, "select path chosen"),
            PlanEvent::SeedChosen { table, rdf } => debug!(%table, rdf, "join order seeded"),
            PlanEvent::JoinChosen {
                table,
                strategy,
                blocks,
            } => debug!(%table, %strategy, blocks, "join chosen"),
            PlanEvent::ProductFallback { table, blocks } => {
                debug!(%table, blocks, "product fallback")
            }
        }
    }
}

/// Collects planning decisions in memory, mostly for tests asserting on
/// what the planner decided.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<PlanEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PlanEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl PlanEventSink for RecordingSink {
    fn plan_event(&self, event: PlanEvent) {
        self.events.lock().unwrap().push(event);
    }
}
