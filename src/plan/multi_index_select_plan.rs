use std::sync::Arc;

use crate::error::{DbError, DbResult};
use crate::index::Index;
use crate::metadata::IndexInfo;
use crate::plan::{Plan, TablePlan};
use crate::query::{Constant, MultiIndexSelectScan, Scan};
use crate::record::Schema;
use crate::tx::Transaction;

/// Selects rows of one table through several indexes at once: each index
/// is probed with its constant and the RID lists are intersected.
pub struct MultiIndexSelectPlan {
    table_plan: Arc<TablePlan>,
    index_infos: Vec<IndexInfo>,
    vals: Vec<Constant>,
}

impl MultiIndexSelectPlan {
    /// Fails with `PlanContract` when the indexes were not costed against
    /// the same table statistics, which would make the cost estimates of
    /// the participating indexes incomparable.
    pub fn new(
        table_plan: Arc<TablePlan>,
        index_infos: Vec<IndexInfo>,
        vals: Vec<Constant>,
    ) -> DbResult<Self> {
        for pair in index_infos.windows(2) {
            if !Arc::ptr_eq(pair[0].stat_info(), pair[1].stat_info()) {
                return Err(DbError::PlanContract(format!(
                    "indexes {} and {} of table {} do not share statistics",
                    pair[0].index_name(),
                    pair[1].index_name(),
                    table_plan.table_name(),
                )));
            }
        }
        Ok(MultiIndexSelectPlan {
            table_plan,
            index_infos,
            vals,
        })
    }

    fn selectivity(&self) -> u64 {
        self.index_infos
            .iter()
            .map(|ii| self.table_plan.distinct_values(ii.field_name()).max(1))
            .fold(1u64, u64::saturating_mul)
    }
}

impl Plan for MultiIndexSelectPlan {
    fn open(&self, tx: &Transaction) -> DbResult<Box<dyn Scan>> {
        let table_scan = self.table_plan.open_table_scan(tx)?;
        let indexes: Vec<Box<dyn Index>> = self
            .index_infos
            .iter()
            .map(|ii| Box::new(ii.open()) as Box<dyn Index>)
            .collect();
        Ok(Box::new(MultiIndexSelectScan::new(
            table_scan,
            indexes,
            self.vals.clone(),
        )?))
    }

    fn blocks_accessed(&self) -> u64 {
        let probes: u64 = self
            .index_infos
            .iter()
            .map(IndexInfo::blocks_accessed)
            .sum();
        probes + self.records_output()
    }

    fn records_output(&self) -> u64 {
        self.table_plan.records_output() / self.selectivity().max(1)
    }

    fn distinct_values(&self, field_name: &str) -> u64 {
        if self
            .index_infos
            .iter()
            .any(|ii| ii.field_name() == field_name)
        {
            1
        } else {
            self.table_plan
                .distinct_values(field_name)
                .min(self.records_output().max(1))
        }
    }

    fn schema(&self) -> &Schema {
        self.table_plan.schema()
    }

    fn rdf(&self) -> u64 {
        self.selectivity()
    }
}
