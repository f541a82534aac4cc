use std::cmp;
use std::sync::Arc;

use crate::index::HashIndex;
use crate::metadata::StatInfo;
use crate::record::{FieldType, Layout, Schema};
use crate::tx::Transaction;

/// Describes one index over one field of a table, together with the
/// table statistics needed to cost probes against it.
#[derive(Clone)]
pub struct IndexInfo {
    index_name: String,
    field_name: String,
    tx: Transaction,
    index_layout: Layout,
    stats: Arc<StatInfo>,
}

impl IndexInfo {
    pub const BLOCK_NUM_FIELD: &'static str = "block";
    pub const ID_FIELD: &'static str = "id";
    pub const DATA_FIELD: &'static str = "dataval";

    pub fn new(
        index_name: String,
        field_name: String,
        tx: Transaction,
        table_schema: &Schema,
        stats: Arc<StatInfo>,
    ) -> Self {
        let index_layout = IndexInfo::create_idx_layout(&field_name, table_schema);
        IndexInfo {
            index_name,
            field_name,
            tx,
            index_layout,
            stats,
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// The table statistics this index was costed against. Every index of
    /// a table hands out the same allocation.
    pub fn stat_info(&self) -> &Arc<StatInfo> {
        &self.stats
    }

    pub fn open(&self) -> HashIndex {
        HashIndex::new(self.tx.clone(), &self.index_name, self.index_layout.clone())
    }

    /// Estimated block reads for one probe of this index.
    pub fn blocks_accessed(&self) -> u64 {
        let records_per_block =
            (self.tx.block_size() / self.index_layout.slot_size()).max(1) as u64;
        let num_blocks = self.stats.records_output() / records_per_block;
        HashIndex::search_cost(num_blocks, records_per_block)
    }

    /// Estimated matching records for one probe.
    pub fn records_output(&self) -> u64 {
        let distinct = self.stats.distinct_values(&self.field_name).max(1);
        self.stats.records_output() / distinct
    }

    pub fn distinct_values(&self, field_name: &str) -> u64 {
        if field_name == self.field_name {
            1
        } else {
            cmp::min(self.stats.distinct_values(field_name), self.records_output())
        }
    }

    pub fn create_idx_layout(field_name: &str, table_schema: &Schema) -> Layout {
        let mut schema = Schema::new();
        schema.add_int_field(IndexInfo::BLOCK_NUM_FIELD);
        schema.add_int_field(IndexInfo::ID_FIELD);
        match table_schema.field_type(field_name) {
            Some(FieldType::Varchar) => {
                let field_len = table_schema.length(field_name).unwrap_or(0);
                schema.add_string_field(IndexInfo::DATA_FIELD, field_len);
            }
            _ => schema.add_int_field(IndexInfo::DATA_FIELD),
        }
        Layout::new(schema)
    }
}
