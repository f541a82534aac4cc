use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::DbResult;
use crate::metadata::{IndexInfo, StatMgr, TableMgr};
use crate::query::{Scan, UpdateScan};
use crate::record::TableScan;
use crate::tx::Transaction;

/// Maintains the index catalog: one `idxcat` row per index.
pub struct IndexMgr {
    table_mgr: Arc<TableMgr>,
    stat_mgr: Arc<StatMgr>,
}

impl IndexMgr {
    pub const INDEX_TABLE: &'static str = "idxcat";

    pub const INDEX_NAME: &'static str = "indexname";
    pub const TABLE_NAME: &'static str = "tablename";
    pub const FIELD_NAME: &'static str = "fieldname";

    pub fn new(
        is_new_db: bool,
        table_mgr: Arc<TableMgr>,
        stat_mgr: Arc<StatMgr>,
        tx: Transaction,
    ) -> DbResult<IndexMgr> {
        if is_new_db {
            let mut schema = crate::record::Schema::new();
            schema.add_string_field(IndexMgr::INDEX_NAME, TableMgr::MAX_NAME);
            schema.add_string_field(IndexMgr::TABLE_NAME, TableMgr::MAX_NAME);
            schema.add_string_field(IndexMgr::FIELD_NAME, TableMgr::MAX_NAME);
            table_mgr.create_table(IndexMgr::INDEX_TABLE, &schema, tx)?;
        }
        Ok(IndexMgr {
            table_mgr,
            stat_mgr,
        })
    }

    pub fn create_index(
        &self,
        index_name: &str,
        table_name: &str,
        field_name: &str,
        tx: Transaction,
    ) -> DbResult<()> {
        let layout = self.table_mgr.get_layout(IndexMgr::INDEX_TABLE, tx.clone())?;
        let mut scan = TableScan::new(tx, IndexMgr::INDEX_TABLE, layout)?;
        scan.insert()?;
        scan.set_string(IndexMgr::INDEX_NAME, index_name)?;
        scan.set_string(IndexMgr::TABLE_NAME, table_name)?;
        scan.set_string(IndexMgr::FIELD_NAME, field_name)?;
        scan.close();
        Ok(())
    }

    /// All indexes of a table, keyed by indexed field. The map iterates in
    /// field-name order so planning over it is deterministic, and every
    /// `IndexInfo` shares one `Arc<StatInfo>` for the table.
    pub fn get_index_info(
        &self,
        table_name: &str,
        tx: Transaction,
    ) -> DbResult<BTreeMap<String, IndexInfo>> {
        let cat_layout = self.table_mgr.get_layout(IndexMgr::INDEX_TABLE, tx.clone())?;
        let mut scan = TableScan::new(tx.clone(), IndexMgr::INDEX_TABLE, cat_layout)?;
        let mut result = BTreeMap::new();
        let mut table_stats = None;
        while scan.next()? {
            if scan.get_string(IndexMgr::TABLE_NAME)? == table_name {
                let index_name = scan.get_string(IndexMgr::INDEX_NAME)?;
                let field_name = scan.get_string(IndexMgr::FIELD_NAME)?;
                let table_layout = self.table_mgr.get_layout(table_name, tx.clone())?;
                let stats = match &table_stats {
                    Some(stats) => Arc::clone(stats),
                    None => {
                        let stats =
                            self.stat_mgr
                                .get_stat_info(table_name, &table_layout, tx.clone())?;
                        table_stats = Some(Arc::clone(&stats));
                        stats
                    }
                };
                let index_info = IndexInfo::new(
                    index_name,
                    field_name.clone(),
                    tx.clone(),
                    table_layout.schema(),
                    stats,
                );
                result.insert(field_name, index_info);
            }
        }
        scan.close();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbResult;
    use crate::record::Schema;
    use crate::utils::testing_utils::temp_db;

    #[test]
    fn test_zero_indexes() -> DbResult<()> {
        let db = temp_db()?;
        let tx = db.new_tx();

        let mut schema = Schema::new();
        schema.add_int_field("id");
        db.metadata_mgr().create_table("test_table", &schema, tx.clone())?;

        let indexes = db.metadata_mgr().get_index_info("test_table", tx)?;
        assert!(indexes.is_empty());
        Ok(())
    }

    #[test]
    fn test_create_index_and_shared_stats() -> DbResult<()> {
        let db = temp_db()?;
        let tx = db.new_tx();

        let mut schema = Schema::new();
        schema.add_int_field("id");
        schema.add_int_field("age");
        schema.add_string_field("name", 10);

        db.metadata_mgr().create_table("persons", &schema, tx.clone())?;
        db.metadata_mgr()
            .create_index("persons_name", "persons", "name", tx.clone())?;
        db.metadata_mgr()
            .create_index("persons_age", "persons", "age", tx.clone())?;

        let indexes = db.metadata_mgr().get_index_info("persons", tx)?;
        assert_eq!(indexes.len(), 2);

        let name_index = indexes.get("name").expect("name index should exist");
        assert_eq!(name_index.index_name(), "persons_name");
        assert_eq!(name_index.field_name(), "name");

        let age_index = indexes.get("age").expect("age index should exist");
        assert_eq!(age_index.index_name(), "persons_age");

        assert!(Arc::ptr_eq(name_index.stat_info(), age_index.stat_info()));
        Ok(())
    }
}
