use std::cmp;
use std::sync::Arc;

use crate::error::DbResult;
use crate::plan::Plan;
use crate::query::{Predicate, Scan, SelectScan};
use crate::record::Schema;
use crate::tx::Transaction;

/// Filters a child plan by a predicate.
pub struct SelectPlan {
    child: Arc<dyn Plan>,
    pred: Predicate,
}

impl SelectPlan {
    pub fn new(child: Arc<dyn Plan>, pred: Predicate) -> Self {
        SelectPlan { child, pred }
    }
}

impl Plan for SelectPlan {
    fn open(&self, tx: &Transaction) -> DbResult<Box<dyn Scan>> {
        let scan = self.child.open(tx)?;
        Ok(Box::new(SelectScan::new(scan, self.pred.clone())))
    }

    fn blocks_accessed(&self) -> u64 {
        self.child.blocks_accessed()
    }

    fn records_output(&self) -> u64 {
        let factor = self.pred.reduction_factor(self.child.as_ref()).max(1);
        self.child.records_output() / factor
    }

    fn distinct_values(&self, field_name: &str) -> u64 {
        if self.pred.equates_with_constant(field_name).is_some() {
            return 1;
        }
        let dv = self.child.distinct_values(field_name);
        match self.pred.equates_with_field(field_name) {
            Some(other) => cmp::min(dv, self.child.distinct_values(other)),
            None => dv,
        }
    }

    fn schema(&self) -> &Schema {
        self.child.schema()
    }

    fn rdf(&self) -> u64 {
        self.child
            .rdf()
            .saturating_mul(self.pred.reduction_factor(self.child.as_ref()))
    }
}
