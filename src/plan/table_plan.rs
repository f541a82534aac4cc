use std::sync::Arc;

use crate::error::DbResult;
use crate::metadata::{MetadataMgr, StatInfo};
use crate::plan::Plan;
use crate::query::Scan;
use crate::record::{Layout, Schema, TableScan};
use crate::tx::Transaction;

/// Leaf plan: a full scan of one stored table.
pub struct TablePlan {
    table_name: String,
    layout: Layout,
    stats: Arc<StatInfo>,
}

impl TablePlan {
    pub fn new(table_name: &str, md: &MetadataMgr, tx: &Transaction) -> DbResult<Self> {
        let layout = md.get_layout(table_name, tx.clone())?;
        let stats = md.get_stat_info(table_name, &layout, tx.clone())?;
        Ok(TablePlan {
            table_name: table_name.to_string(),
            layout,
            stats,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Opens the concrete table scan. Index scans need RID navigation,
    /// which the `Scan` trait object does not expose.
    pub fn open_table_scan(&self, tx: &Transaction) -> DbResult<TableScan> {
        TableScan::new(tx.clone(), &self.table_name, self.layout.clone())
    }
}

impl Plan for TablePlan {
    fn open(&self, tx: &Transaction) -> DbResult<Box<dyn Scan>> {
        Ok(Box::new(self.open_table_scan(tx)?))
    }

    fn blocks_accessed(&self) -> u64 {
        self.stats.blocks_accessed()
    }

    fn records_output(&self) -> u64 {
        self.stats.records_output()
    }

    fn distinct_values(&self, field_name: &str) -> u64 {
        self.stats.distinct_values(field_name)
    }

    fn schema(&self) -> &Schema {
        self.layout.schema()
    }

    fn as_table_plan(&self) -> Option<&TablePlan> {
        Some(self)
    }
}
