use std::sync::Arc;

use crate::error::{DbError, DbResult};
use crate::index::Index;
use crate::metadata::IndexInfo;
use crate::plan::{Plan, TablePlan};
use crate::query::{MultiIndexJoinScan, Scan};
use crate::record::Schema;
use crate::tx::Transaction;

/// Joins the outer plan against a table through several of the table's
/// indexes, intersecting the probed RID lists per outer row.
pub struct MultiIndexJoinPlan {
    outer: Arc<dyn Plan>,
    inner: Arc<TablePlan>,
    index_infos: Vec<IndexInfo>,
    join_fields: Vec<String>,
    schema: Schema,
}

impl MultiIndexJoinPlan {
    /// `join_fields[i]` is the outer-side field probed into
    /// `index_infos[i]`. Fails with `PlanContract` when the index list is
    /// empty or the indexes do not share the inner table's statistics.
    pub fn new(
        outer: Arc<dyn Plan>,
        inner: Arc<TablePlan>,
        index_infos: Vec<IndexInfo>,
        join_fields: Vec<String>,
    ) -> DbResult<Self> {
        if index_infos.is_empty() {
            return Err(DbError::PlanContract(format!(
                "multi-index join against table {} needs at least one index",
                inner.table_name(),
            )));
        }
        for pair in index_infos.windows(2) {
            if !Arc::ptr_eq(pair[0].stat_info(), pair[1].stat_info()) {
                return Err(DbError::PlanContract(format!(
                    "indexes {} and {} of table {} do not share statistics",
                    pair[0].index_name(),
                    pair[1].index_name(),
                    inner.table_name(),
                )));
            }
        }
        let mut schema = Schema::new();
        schema.add_all(outer.schema());
        schema.add_all(inner.schema());
        Ok(MultiIndexJoinPlan {
            outer,
            inner,
            index_infos,
            join_fields,
            schema,
        })
    }

    // The first index stands in for the whole intersection; later indexes
    // only shrink the result, so this overestimates.
    fn first_index(&self) -> &IndexInfo {
        &self.index_infos[0]
    }
}

impl Plan for MultiIndexJoinPlan {
    fn open(&self, tx: &Transaction) -> DbResult<Box<dyn Scan>> {
        let outer = self.outer.open(tx)?;
        let indexes: Vec<Box<dyn Index>> = self
            .index_infos
            .iter()
            .map(|ii| Box::new(ii.open()) as Box<dyn Index>)
            .collect();
        let inner = self.inner.open_table_scan(tx)?;
        Ok(Box::new(MultiIndexJoinScan::new(
            outer,
            indexes,
            self.join_fields.clone(),
            inner,
        )?))
    }

    fn blocks_accessed(&self) -> u64 {
        self.outer.blocks_accessed()
            + self
                .outer
                .records_output()
                .saturating_mul(self.first_index().blocks_accessed())
            + self.records_output()
    }

    fn records_output(&self) -> u64 {
        self.outer
            .records_output()
            .saturating_mul(self.first_index().records_output())
    }

    fn distinct_values(&self, field_name: &str) -> u64 {
        if self.outer.schema().has_field(field_name) {
            self.outer.distinct_values(field_name)
        } else {
            self.inner.distinct_values(field_name)
        }
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn rdf(&self) -> u64 {
        self.outer.rdf()
    }
}
