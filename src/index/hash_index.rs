use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::error::DbResult;
use crate::metadata::IndexInfo;
use crate::query::{Constant, Scan, UpdateScan};
use crate::record::{Layout, TableScan, RID};
use crate::tx::Transaction;

use super::Index;

/// A static hash index. Index records are spread over `NUM_BUCKETS` bucket
/// tables; a lookup hashes the search key to pick the bucket, then filters
/// the bucket's records on the key.
pub struct HashIndex {
    tx: Transaction,
    index_name: String,
    layout: Layout,
    search_key: Option<Constant>,
    table_scan: Option<TableScan>,
}

pub const NUM_BUCKETS: u64 = 100;

impl HashIndex {
    pub fn new(tx: Transaction, index_name: &str, layout: Layout) -> Self {
        HashIndex {
            tx,
            index_name: index_name.to_string(),
            layout,
            search_key: None,
            table_scan: None,
        }
    }

    /// Cost of a lookup: each bucket holds 1/NUM_BUCKETS of the index blocks,
    /// and a lookup scans one bucket.
    pub fn search_cost(num_blocks: u64, _records_per_block: u64) -> u64 {
        num_blocks / NUM_BUCKETS
    }

    fn bucket_of(key: &Constant) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish() % NUM_BUCKETS
    }
}

impl Index for HashIndex {
    fn before_first(&mut self, search_key: &Constant) -> DbResult<()> {
        self.close();
        let bucket = Self::bucket_of(search_key);
        let table_name = format!("{}{}", self.index_name, bucket);
        self.table_scan = Some(TableScan::new(
            self.tx.clone(),
            &table_name,
            self.layout.clone(),
        )?);
        self.search_key = Some(search_key.clone());
        Ok(())
    }

    fn next(&mut self) -> DbResult<bool> {
        let ts = self.table_scan.as_mut().expect("Index not positioned");
        let key = self.search_key.clone().expect("Index not positioned");
        while ts.next()? {
            if ts.get_val(IndexInfo::DATA_FIELD)? == key {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn get_data_rid(&mut self) -> DbResult<RID> {
        let ts = self.table_scan.as_mut().expect("Index not positioned");
        let block_number = ts.get_int(IndexInfo::BLOCK_NUM_FIELD)?;
        let slot = ts.get_int(IndexInfo::ID_FIELD)?;
        Ok(RID::new(block_number, slot as usize))
    }

    fn insert(&mut self, data_val: &Constant, data_rid: &RID) -> DbResult<()> {
        self.before_first(data_val)?;
        let ts = self.table_scan.as_mut().expect("Index not positioned");
        ts.insert()?;
        ts.set_int(IndexInfo::BLOCK_NUM_FIELD, data_rid.block_number())?;
        ts.set_int(IndexInfo::ID_FIELD, data_rid.slot() as i32)?;
        ts.set_val(IndexInfo::DATA_FIELD, data_val.clone())?;
        Ok(())
    }

    fn delete(&mut self, data_val: &Constant, data_rid: &RID) -> DbResult<()> {
        self.before_first(data_val)?;
        while self.next()? {
            if self.get_data_rid()? == *data_rid {
                let ts = self.table_scan.as_mut().expect("Index not positioned");
                ts.delete()?;
                return Ok(());
            }
        }
        Ok(())
    }

    fn close(&mut self) {
        if let Some(mut ts) = self.table_scan.take() {
            ts.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::metadata::IndexInfo;
    use crate::record::Schema;
    use crate::storage::FileMgr;

    fn index_under_test() -> (TempDir, HashIndex) {
        let temp_dir = TempDir::new().unwrap();
        let file_mgr = Arc::new(FileMgr::new(temp_dir.path(), 400).unwrap());
        let tx = Transaction::new(file_mgr);

        let mut table_schema = Schema::new();
        table_schema.add_int_field("age");
        let layout = IndexInfo::create_idx_layout("age", &table_schema);
        let index = HashIndex::new(tx, "ageidx", layout);
        (temp_dir, index)
    }

    #[test]
    fn test_insert_and_lookup() -> DbResult<()> {
        let (_dir, mut index) = index_under_test();

        let rid1 = RID::new(0, 1);
        let rid2 = RID::new(0, 2);
        let rid3 = RID::new(1, 0);
        index.insert(&Constant::int(25), &rid1)?;
        index.insert(&Constant::int(30), &rid2)?;
        index.insert(&Constant::int(25), &rid3)?;

        index.before_first(&Constant::int(25))?;
        let mut found = Vec::new();
        while index.next()? {
            found.push(index.get_data_rid()?);
        }
        assert_eq!(found.len(), 2);
        assert!(found.contains(&rid1));
        assert!(found.contains(&rid3));

        index.before_first(&Constant::int(99))?;
        assert!(!index.next()?);

        index.close();
        Ok(())
    }

    #[test]
    fn test_delete() -> DbResult<()> {
        let (_dir, mut index) = index_under_test();

        let rid1 = RID::new(0, 1);
        let rid2 = RID::new(0, 2);
        index.insert(&Constant::int(7), &rid1)?;
        index.insert(&Constant::int(7), &rid2)?;

        index.delete(&Constant::int(7), &rid1)?;

        index.before_first(&Constant::int(7))?;
        let mut found = Vec::new();
        while index.next()? {
            found.push(index.get_data_rid()?);
        }
        assert_eq!(found, vec![rid2]);

        index.close();
        Ok(())
    }
}
