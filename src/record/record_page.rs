use crate::error::DbResult;
use crate::storage::{BlockId, Page};
use crate::tx::Transaction;

use super::schema::FieldType;
use super::Layout;

const EMPTY: i32 = 0;
const USED: i32 = 1;

/// Slotted access to the records of one block. The page contents are read
/// once at construction; mutations write the whole page back immediately.
pub struct RecordPage {
    tx: Transaction,
    blk: BlockId,
    layout: Layout,
    page: Page,
}

impl RecordPage {
    pub fn new(tx: Transaction, blk: BlockId, layout: Layout) -> DbResult<Self> {
        let page = tx.read_page(&blk)?;
        Ok(RecordPage {
            tx,
            blk,
            layout,
            page,
        })
    }

    pub fn get_int(&self, slot: usize, field_name: &str) -> i32 {
        self.page.get_int(self.field_pos(slot, field_name))
    }

    pub fn get_string(&self, slot: usize, field_name: &str) -> String {
        self.page.get_string(self.field_pos(slot, field_name))
    }

    pub fn set_int(&mut self, slot: usize, field_name: &str, val: i32) -> DbResult<()> {
        let pos = self.field_pos(slot, field_name);
        self.page.set_int(pos, val);
        self.flush()
    }

    pub fn set_string(&mut self, slot: usize, field_name: &str, val: &str) -> DbResult<()> {
        let pos = self.field_pos(slot, field_name);
        self.page.set_string(pos, val);
        self.flush()
    }

    pub fn delete(&mut self, slot: usize) -> DbResult<()> {
        self.set_flag(slot, EMPTY)
    }

    /// Marks every slot empty and zeroes all fields.
    pub fn format(&mut self) -> DbResult<()> {
        let mut slot = 0;
        while self.is_valid_slot(slot) {
            self.page.set_int(self.offset(slot), EMPTY);
            for field_name in self.layout.schema().fields().to_vec() {
                let pos = self.field_pos(slot, &field_name);
                match self
                    .layout
                    .schema()
                    .field_type(&field_name)
                    .expect("Field type not found")
                {
                    FieldType::Integer => self.page.set_int(pos, 0),
                    FieldType::Varchar => self.page.set_string(pos, ""),
                }
            }
            slot += 1;
        }
        self.flush()
    }

    pub fn next_after(&self, slot: Option<usize>) -> Option<usize> {
        self.search_after(slot, USED)
    }

    pub fn insert_after(&mut self, slot: Option<usize>) -> DbResult<Option<usize>> {
        if let Some(new_slot) = self.search_after(slot, EMPTY) {
            self.set_flag(new_slot, USED)?;
            Ok(Some(new_slot))
        } else {
            Ok(None)
        }
    }

    pub fn block(&self) -> &BlockId {
        &self.blk
    }

    fn set_flag(&mut self, slot: usize, flag: i32) -> DbResult<()> {
        let pos = self.offset(slot);
        self.page.set_int(pos, flag);
        self.flush()
    }

    fn search_after(&self, slot: Option<usize>, flag: i32) -> Option<usize> {
        let mut slot = slot.map_or(0, |s| s + 1);
        while self.is_valid_slot(slot) {
            if self.page.get_int(self.offset(slot)) == flag {
                return Some(slot);
            }
            slot += 1;
        }
        None
    }

    fn is_valid_slot(&self, slot: usize) -> bool {
        self.offset(slot + 1) <= self.tx.block_size()
    }

    fn offset(&self, slot: usize) -> usize {
        slot * self.layout.slot_size()
    }

    fn field_pos(&self, slot: usize, field_name: &str) -> usize {
        self.offset(slot) + self.layout.offset(field_name).expect("Field not found")
    }

    fn flush(&self) -> DbResult<()> {
        self.tx.write_page(&self.blk, &self.page)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::record::schema::Schema;
    use crate::storage::FileMgr;

    #[test]
    fn test_record_page_basic() -> DbResult<()> {
        let temp_dir = TempDir::new().unwrap();
        let file_mgr = Arc::new(FileMgr::new(temp_dir.path(), 400)?);
        let tx = Transaction::new(file_mgr);

        let mut schema = Schema::new();
        schema.add_int_field("id");
        schema.add_string_field("name", 20);
        let layout = Layout::new(schema);

        let blk = tx.append("testfile")?;
        let mut record_page = RecordPage::new(tx.clone(), blk.clone(), layout.clone())?;
        record_page.format()?;

        let slot = record_page.insert_after(None)?.expect("Failed to insert");
        record_page.set_int(slot, "id", 123)?;
        record_page.set_string(slot, "name", "test")?;
        assert_eq!(record_page.get_int(slot, "id"), 123);
        assert_eq!(record_page.get_string(slot, "name"), "test");

        // a second page over the same block sees the flushed contents
        let reread = RecordPage::new(tx.clone(), blk, layout)?;
        assert_eq!(reread.get_int(slot, "id"), 123);
        assert_eq!(reread.next_after(None), Some(slot));

        record_page.delete(slot)?;
        assert_eq!(record_page.next_after(None), None);
        Ok(())
    }
}
