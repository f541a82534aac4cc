pub mod heuristic_query_planner;
pub mod index_join_plan;
pub mod index_select_plan;
pub mod multi_index_join_plan;
pub mod multi_index_select_plan;
pub mod planner;
pub mod product_plan;
pub mod project_plan;
pub mod select_plan;
pub mod table_plan;
pub mod table_planner;
pub mod trace;

pub use heuristic_query_planner::HeuristicQueryPlanner;
pub use index_join_plan::IndexJoinPlan;
pub use index_select_plan::IndexSelectPlan;
pub use multi_index_join_plan::MultiIndexJoinPlan;
pub use multi_index_select_plan::MultiIndexSelectPlan;
pub use planner::Planner;
pub use product_plan::ProductPlan;
pub use project_plan::ProjectPlan;
pub use select_plan::SelectPlan;
pub use table_plan::TablePlan;
pub use table_planner::TablePlanner;
pub use trace::{JoinStrategy, PlanEvent, PlanEventSink, RecordingSink, TracingSink};

use crate::error::DbResult;
use crate::query::Scan;
use crate::record::Schema;
use crate::tx::Transaction;

/// A node in a query plan tree. Plans estimate their cost without touching
/// data; `open` materializes the corresponding scan.
pub trait Plan {
    fn open(&self, tx: &Transaction) -> DbResult<Box<dyn Scan>>;

    /// Estimated block reads to consume the whole scan once.
    fn blocks_accessed(&self) -> u64;

    /// Estimated number of output records.
    fn records_output(&self) -> u64;

    /// Estimated number of distinct values of a field in the output.
    fn distinct_values(&self, field_name: &str) -> u64;

    fn schema(&self) -> &Schema;

    /// Reduction-decision factor: how strongly this plan's predicates cut
    /// down its base table, larger is better. Used to pick the seed of a
    /// left-deep join order.
    fn rdf(&self) -> u64 {
        1
    }

    /// The underlying table plan, when this node reads a single table
    /// directly. Index-based planning needs the table identity.
    fn as_table_plan(&self) -> Option<&TablePlan> {
        None
    }
}
