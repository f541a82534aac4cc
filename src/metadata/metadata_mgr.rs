use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::DbResult;
use crate::metadata::{IndexInfo, IndexMgr, StatInfo, StatMgr, TableMgr};
use crate::record::{Layout, Schema};
use crate::tx::Transaction;

/// Facade over the table, index and statistics managers.
pub struct MetadataMgr {
    table_mgr: Arc<TableMgr>,
    index_mgr: IndexMgr,
    stat_mgr: Arc<StatMgr>,
}

impl MetadataMgr {
    pub fn new(is_new: bool, tx: Transaction) -> DbResult<Self> {
        let table_mgr = Arc::new(TableMgr::new(is_new, tx.clone())?);
        let stat_mgr = Arc::new(StatMgr::new());
        let index_mgr = IndexMgr::new(
            is_new,
            Arc::clone(&table_mgr),
            Arc::clone(&stat_mgr),
            tx,
        )?;
        Ok(Self {
            table_mgr,
            index_mgr,
            stat_mgr,
        })
    }

    pub fn create_table(&self, table_name: &str, schema: &Schema, tx: Transaction) -> DbResult<()> {
        self.table_mgr.create_table(table_name, schema, tx)
    }

    pub fn get_layout(&self, table_name: &str, tx: Transaction) -> DbResult<Layout> {
        self.table_mgr.get_layout(table_name, tx)
    }

    pub fn create_index(
        &self,
        index_name: &str,
        table_name: &str,
        field_name: &str,
        tx: Transaction,
    ) -> DbResult<()> {
        self.index_mgr.create_index(index_name, table_name, field_name, tx)
    }

    pub fn get_index_info(
        &self,
        table_name: &str,
        tx: Transaction,
    ) -> DbResult<BTreeMap<String, IndexInfo>> {
        self.index_mgr.get_index_info(table_name, tx)
    }

    pub fn get_stat_info(
        &self,
        table_name: &str,
        layout: &Layout,
        tx: Transaction,
    ) -> DbResult<Arc<StatInfo>> {
        self.stat_mgr.get_stat_info(table_name, layout, tx)
    }
}
