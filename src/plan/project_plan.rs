use std::sync::Arc;

use crate::error::DbResult;
use crate::plan::Plan;
use crate::query::{ProjectScan, Scan};
use crate::record::Schema;
use crate::tx::Transaction;

/// Restricts a child plan to a subset of its fields.
pub struct ProjectPlan {
    child: Arc<dyn Plan>,
    schema: Schema,
}

impl ProjectPlan {
    pub fn new(child: Arc<dyn Plan>, fields: Vec<String>) -> Self {
        let mut schema = Schema::new();
        for field in &fields {
            schema.add_from_schema(field, child.schema());
        }
        ProjectPlan { child, schema }
    }
}

impl Plan for ProjectPlan {
    fn open(&self, tx: &Transaction) -> DbResult<Box<dyn Scan>> {
        let scan = self.child.open(tx)?;
        let fields = self.schema.fields().to_vec();
        Ok(Box::new(ProjectScan::new(scan, fields)))
    }

    fn blocks_accessed(&self) -> u64 {
        self.child.blocks_accessed()
    }

    fn records_output(&self) -> u64 {
        self.child.records_output()
    }

    fn distinct_values(&self, field_name: &str) -> u64 {
        self.child.distinct_values(field_name)
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn rdf(&self) -> u64 {
        self.child.rdf()
    }
}
