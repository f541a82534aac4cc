use crate::error::{DbError, DbResult};
use crate::query::{Constant, Scan, UpdateScan};
use crate::storage::BlockId;
use crate::tx::Transaction;

use super::layout::Layout;
use super::rid::RID;
use super::schema::FieldType;
use super::RecordPage;

/// Sequential cursor over all records of a table file, with random access by
/// RID for index lookups.
pub struct TableScan {
    tx: Transaction,
    layout: Layout,
    record_page: Option<RecordPage>,
    file_name: String,
    current_slot: Option<usize>,
}

impl TableScan {
    pub fn new(tx: Transaction, table_name: &str, layout: Layout) -> DbResult<Self> {
        let file_name = format!("{}.tbl", table_name);
        let mut table_scan = TableScan {
            tx,
            layout,
            record_page: None,
            file_name,
            current_slot: None,
        };

        if table_scan.tx.size(&table_scan.file_name)? == 0 {
            table_scan.move_to_new_block()?;
        } else {
            table_scan.move_to_block(0)?;
        }

        Ok(table_scan)
    }

    /// Block the cursor is currently positioned on.
    pub fn current_block_number(&self) -> i32 {
        let rp = self.record_page.as_ref().expect("Record page not initialized");
        rp.block().number()
    }

    fn at_last_block(&self) -> DbResult<bool> {
        let rp = self.record_page.as_ref().expect("Record page not initialized");
        let size = self.tx.size(&self.file_name)?;
        Ok(rp.block().number() == size - 1)
    }

    fn move_to_block(&mut self, blk_number: i32) -> DbResult<()> {
        self.record_page.take();
        let blk = BlockId::new(self.file_name.clone(), blk_number);
        self.record_page = Some(RecordPage::new(self.tx.clone(), blk, self.layout.clone())?);
        self.current_slot = None;
        Ok(())
    }

    fn move_to_new_block(&mut self) -> DbResult<()> {
        self.record_page.take();
        let blk = self.tx.append(&self.file_name)?;
        let mut record_page = RecordPage::new(self.tx.clone(), blk, self.layout.clone())?;
        record_page.format()?;
        self.record_page = Some(record_page);
        self.current_slot = None;
        Ok(())
    }
}

impl Scan for TableScan {
    fn before_first(&mut self) -> DbResult<()> {
        self.move_to_block(0)
    }

    fn next(&mut self) -> DbResult<bool> {
        loop {
            let rp = self.record_page.as_ref().expect("Record page not initialized");
            if let Some(slot) = rp.next_after(self.current_slot) {
                self.current_slot = Some(slot);
                return Ok(true);
            }
            if self.at_last_block()? {
                return Ok(false);
            }
            let next_block = rp.block().number() + 1;
            self.move_to_block(next_block)?;
        }
    }

    fn get_int(&mut self, field_name: &str) -> DbResult<i32> {
        let slot = self.current_slot.expect("No current record");
        let rp = self.record_page.as_ref().expect("Record page not initialized");
        Ok(rp.get_int(slot, field_name))
    }

    fn get_string(&mut self, field_name: &str) -> DbResult<String> {
        let slot = self.current_slot.expect("No current record");
        let rp = self.record_page.as_ref().expect("Record page not initialized");
        Ok(rp.get_string(slot, field_name))
    }

    fn get_val(&mut self, field_name: &str) -> DbResult<Constant> {
        match self.layout.schema().field_type(field_name) {
            Some(FieldType::Integer) => Ok(Constant::Int(self.get_int(field_name)?)),
            Some(FieldType::Varchar) => Ok(Constant::String(self.get_string(field_name)?)),
            None => Err(DbError::FieldNotFound(field_name.to_string())),
        }
    }

    fn has_field(&self, field_name: &str) -> bool {
        self.layout.schema().has_field(field_name)
    }

    fn close(&mut self) {
        self.record_page.take();
    }
}

impl UpdateScan for TableScan {
    fn set_val(&mut self, field_name: &str, val: Constant) -> DbResult<()> {
        match val {
            Constant::Int(i) => self.set_int(field_name, i),
            Constant::String(s) => self.set_string(field_name, &s),
        }
    }

    fn set_int(&mut self, field_name: &str, val: i32) -> DbResult<()> {
        let slot = self.current_slot.expect("No current record");
        let rp = self.record_page.as_mut().expect("Record page not initialized");
        rp.set_int(slot, field_name, val)
    }

    fn set_string(&mut self, field_name: &str, val: &str) -> DbResult<()> {
        let slot = self.current_slot.expect("No current record");
        let rp = self.record_page.as_mut().expect("Record page not initialized");
        rp.set_string(slot, field_name, val)
    }

    fn insert(&mut self) -> DbResult<()> {
        loop {
            let rp = self.record_page.as_mut().expect("Record page not initialized");
            if let Some(slot) = rp.insert_after(self.current_slot)? {
                self.current_slot = Some(slot);
                return Ok(());
            }
            if self.at_last_block()? {
                self.move_to_new_block()?;
            } else {
                let next_block = self.record_page.as_ref().unwrap().block().number() + 1;
                self.move_to_block(next_block)?;
            }
        }
    }

    fn delete(&mut self) -> DbResult<()> {
        let slot = self.current_slot.expect("No current record");
        let rp = self.record_page.as_mut().expect("Record page not initialized");
        rp.delete(slot)
    }

    fn get_rid(&self) -> DbResult<RID> {
        let slot = self.current_slot.expect("No current record");
        let rp = self.record_page.as_ref().expect("Record page not initialized");
        Ok(RID::new(rp.block().number(), slot))
    }

    fn move_to_rid(&mut self, rid: RID) -> DbResult<()> {
        self.record_page.take();
        let blk = BlockId::new(self.file_name.clone(), rid.block_number());
        self.record_page = Some(RecordPage::new(self.tx.clone(), blk, self.layout.clone())?);
        self.current_slot = Some(rid.slot());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::record::schema::Schema;
    use crate::storage::FileMgr;

    fn test_tx() -> (TempDir, Transaction) {
        let temp_dir = TempDir::new().unwrap();
        let file_mgr = Arc::new(FileMgr::new(temp_dir.path(), 400).unwrap());
        let tx = Transaction::new(file_mgr);
        (temp_dir, tx)
    }

    #[test]
    fn test_insert_scan_delete() -> DbResult<()> {
        let (_dir, tx) = test_tx();

        let mut schema = Schema::new();
        schema.add_int_field("id");
        schema.add_string_field("name", 20);
        let layout = Layout::new(schema);

        let mut scan = TableScan::new(tx.clone(), "test_table", layout)?;

        for (id, name) in [(1, "Alice"), (2, "Bob"), (3, "Charlie")] {
            scan.insert()?;
            scan.set_int("id", id)?;
            scan.set_string("name", name)?;
        }

        scan.before_first()?;
        let mut count = 0;
        while scan.next()? {
            count += 1;
            let id = scan.get_int("id")?;
            let name = scan.get_string("name")?;
            match id {
                1 => assert_eq!(name, "Alice"),
                2 => assert_eq!(name, "Bob"),
                3 => assert_eq!(name, "Charlie"),
                _ => panic!("Unexpected ID: {}", id),
            }
            assert_eq!(scan.get_val("id")?, Constant::Int(id));
        }
        assert_eq!(count, 3, "Should have read 3 records");

        scan.before_first()?;
        scan.next()?;
        scan.delete()?;

        scan.before_first()?;
        count = 0;
        while scan.next()? {
            count += 1;
        }
        assert_eq!(count, 2, "Should have 2 records after deletion");

        scan.close();
        Ok(())
    }

    #[test]
    fn test_rid_navigation() -> DbResult<()> {
        let (_dir, tx) = test_tx();

        let mut schema = Schema::new();
        schema.add_int_field("id");
        let layout = Layout::new(schema);

        let mut scan = TableScan::new(tx.clone(), "rids", layout)?;
        for id in 0..120 {
            scan.insert()?;
            scan.set_int("id", id)?;
        }

        scan.before_first()?;
        scan.next()?;
        scan.next()?;
        let rid = scan.get_rid()?;
        let id_at_rid = scan.get_int("id")?;

        // wander off, then come back by RID
        while scan.next()? {}
        scan.move_to_rid(rid)?;
        assert_eq!(scan.get_int("id")?, id_at_rid);
        assert_eq!(scan.get_rid()?, rid);

        scan.close();
        Ok(())
    }

    #[test]
    fn test_scan_spans_blocks() -> DbResult<()> {
        let (_dir, tx) = test_tx();

        let mut schema = Schema::new();
        schema.add_int_field("id");
        let layout = Layout::new(schema);

        // 8-byte slots, 400-byte blocks: 300 records need several blocks
        let mut scan = TableScan::new(tx.clone(), "big", layout)?;
        for id in 0..300 {
            scan.insert()?;
            scan.set_int("id", id)?;
        }
        assert!(tx.size("big.tbl")? > 1);

        scan.before_first()?;
        let mut seen = Vec::new();
        while scan.next()? {
            seen.push(scan.get_int("id")?);
        }
        assert_eq!(seen, (0..300).collect::<Vec<_>>());
        Ok(())
    }
}
