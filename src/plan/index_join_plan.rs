use std::sync::Arc;

use crate::error::DbResult;
use crate::metadata::IndexInfo;
use crate::plan::{Plan, TablePlan};
use crate::query::{IndexJoinScan, Scan};
use crate::record::Schema;
use crate::tx::Transaction;

/// Index nested-loop join: each outer row probes one index of the inner
/// table with its join value.
pub struct IndexJoinPlan {
    outer: Arc<dyn Plan>,
    inner: Arc<TablePlan>,
    index_info: IndexInfo,
    join_field: String,
    schema: Schema,
}

impl IndexJoinPlan {
    /// `join_field` is the outer-side field equated with the inner
    /// table's indexed field.
    pub fn new(
        outer: Arc<dyn Plan>,
        inner: Arc<TablePlan>,
        index_info: IndexInfo,
        join_field: &str,
    ) -> Self {
        let mut schema = Schema::new();
        schema.add_all(outer.schema());
        schema.add_all(inner.schema());
        IndexJoinPlan {
            outer,
            inner,
            index_info,
            join_field: join_field.to_string(),
            schema,
        }
    }
}

impl Plan for IndexJoinPlan {
    fn open(&self, tx: &Transaction) -> DbResult<Box<dyn Scan>> {
        let outer = self.outer.open(tx)?;
        let index = Box::new(self.index_info.open());
        let inner = self.inner.open_table_scan(tx)?;
        Ok(Box::new(IndexJoinScan::new(
            outer,
            index,
            &self.join_field,
            inner,
        )?))
    }

    fn blocks_accessed(&self) -> u64 {
        self.outer.blocks_accessed()
            + self
                .outer
                .records_output()
                .saturating_mul(self.index_info.blocks_accessed())
            + self.records_output()
    }

    fn records_output(&self) -> u64 {
        self.outer
            .records_output()
            .saturating_mul(self.index_info.records_output())
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
