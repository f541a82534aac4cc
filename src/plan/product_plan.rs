use std::cmp;
use std::sync::Arc;

use crate::error::DbResult;
use crate::plan::Plan;
use crate::query::{ProductScan, Scan};
use crate::record::Schema;
use crate::tx::Transaction;

/// Cartesian product of two child plans, evaluated with the right side
/// replayed once per left row.
pub struct ProductPlan {
    lhs: Arc<dyn Plan>,
    rhs: Arc<dyn Plan>,
    schema: Schema,
}

impl ProductPlan {
    pub fn new(lhs: Arc<dyn Plan>, rhs: Arc<dyn Plan>) -> Self {
        let mut schema = Schema::new();
        schema.add_all(lhs.schema());
        schema.add_all(rhs.schema());
        ProductPlan { lhs, rhs, schema }
    }
}

impl Plan for ProductPlan {
    fn open(&self, tx: &Transaction) -> DbResult<Box<dyn Scan>> {
        let lhs = self.lhs.open(tx)?;
        let rhs = self.rhs.open(tx)?;
        Ok(Box::new(ProductScan::new(lhs, rhs)?))
    }

    fn blocks_accessed(&self) -> u64 {
        self.lhs.blocks_accessed()
            + self
                .lhs
                .records_output()
                .saturating_mul(self.rhs.blocks_accessed())
    }

    fn records_output(&self) -> u64 {
        self.lhs
            .records_output()
            .saturating_mul(self.rhs.records_output())
    }

    fn distinct_values(&self, field_name: &str) -> u64 {
        if self.lhs.schema().has_field(field_name) {
            self.lhs.distinct_values(field_name)
        } else {
            self.rhs.distinct_values(field_name)
        }
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn rdf(&self) -> u64 {
        cmp::max(self.lhs.rdf(), self.rhs.rdf())
    }
}
