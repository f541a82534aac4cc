use std::sync::Arc;

use crate::error::DbResult;
use crate::metadata::IndexInfo;
use crate::plan::{Plan, TablePlan};
use crate::query::{Constant, IndexSelectScan, Scan};
use crate::record::Schema;
use crate::tx::Transaction;

/// Selects rows of one table through a single index on an
/// equality-with-constant field.
pub struct IndexSelectPlan {
    table_plan: Arc<TablePlan>,
    index_info: IndexInfo,
    val: Constant,
}

impl IndexSelectPlan {
    pub fn new(table_plan: Arc<TablePlan>, index_info: IndexInfo, val: Constant) -> Self {
        IndexSelectPlan {
            table_plan,
            index_info,
            val,
        }
    }
}

impl Plan for IndexSelectPlan {
    fn open(&self, tx: &Transaction) -> DbResult<Box<dyn Scan>> {
        let table_scan = self.table_plan.open_table_scan(tx)?;
        let index = Box::new(self.index_info.open());
        Ok(Box::new(IndexSelectScan::new(
            table_scan,
            index,
            self.val.clone(),
        )?))
    }

    fn blocks_accessed(&self) -> u64 {
        self.index_info.blocks_accessed() + self.records_output()
    }

    fn records_output(&self) -> u64 {
        self.index_info.records_output()
    }

    fn distinct_values(&self, field_name: &str) -> u64 {
        self.index_info.distinct_values(field_name)
    }

    fn schema(&self) -> &Schema {
        self.table_plan.schema()
    }

    fn rdf(&self) -> u64 {
        self.table_plan
            .distinct_values(self.index_info.field_name())
    }
}
