use std::sync::Arc;

use crate::error::DbResult;
use crate::storage::{BlockId, FileMgr, Page};

/// A lightweight handle through which all page I/O flows. Scans and indexes
/// clone the handle freely; the underlying file manager is shared.
///
/// Recovery, buffering and locking are the concern of layers outside this
/// crate; writes here go straight through to disk, and `commit` is the seam
/// where a recovery manager would hook in.
#[derive(Clone)]
pub struct Transaction {
    file_mgr: Arc<FileMgr>,
}

impl Transaction {
    pub fn new(file_mgr: Arc<FileMgr>) -> Self {
        Transaction { file_mgr }
    }

    /// Reads the block into a freshly allocated page.
    pub fn read_page(&self, blk: &BlockId) -> DbResult<Page> {
        let mut page = Page::new(self.file_mgr.block_size());
        self.file_mgr.read(blk, &mut page)?;
        Ok(page)
    }

    pub fn write_page(&self, blk: &BlockId, page: &Page) -> DbResult<()> {
        self.file_mgr.write(blk, page)?;
        Ok(())
    }

    pub fn append(&self, filename: &str) -> DbResult<BlockId> {
        Ok(self.file_mgr.append(filename)?)
    }

    /// Number of blocks currently in the file.
    pub fn size(&self, filename: &str) -> DbResult<i32> {
        Ok(self.file_mgr.block_count(filename)?)
    }

    pub fn block_size(&self) -> usize {
        self.file_mgr.block_size()
    }

    pub fn commit(&self) -> DbResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_transaction_page_io() -> DbResult<()> {
        let temp_dir = TempDir::new().unwrap();
        let file_mgr = Arc::new(FileMgr::new(temp_dir.path(), 400)?);
        let tx = Transaction::new(Arc::clone(&file_mgr));

        let blk = tx.append("testfile")?;
        let mut page = tx.read_page(&blk)?;
        page.set_int(0, 123);
        tx.write_page(&blk, &page)?;

        let page2 = tx.read_page(&blk)?;
        assert_eq!(page2.get_int(0), 123);

        assert_eq!(tx.size("testfile")?, 1);
        tx.commit()?;
        Ok(())
    }
}
