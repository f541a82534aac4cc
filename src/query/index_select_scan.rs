use crate::error::DbResult;
use crate::index::Index;
use crate::query::{Constant, Scan, UpdateScan};
use crate::record::TableScan;

/// Selects rows of a table whose indexed field equals a constant, by
/// walking the index and repositioning the table scan at each matching RID.
pub struct IndexSelectScan {
    table_scan: TableScan,
    index: Box<dyn Index>,
    val: Constant,
}

impl IndexSelectScan {
    pub fn new(table_scan: TableScan, index: Box<dyn Index>, val: Constant) -> DbResult<Self> {
        let mut scan = IndexSelectScan {
            table_scan,
            index,
            val,
        };
        scan.before_first()?;
        Ok(scan)
    }
}

impl Scan for IndexSelectScan {
    fn before_first(&mut self) -> DbResult<()> {
        self.index.before_first(&self.val)
    }

    fn next(&mut self) -> DbResult<bool> {
        if self.index.next()? {
            let rid = self.index.get_data_rid()?;
            self.table_scan.move_to_rid(rid)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn get_int(&mut self, field_name: &str) -> DbResult<i32> {
        self.table_scan.get_int(field_name)
    }

    fn get_string(&mut self, field_name: &str) -> DbResult<String> {
        self.table_scan.get_string(field_name)
    }

    fn get_val(&mut self, field_name: &str) -> DbResult<Constant> {
        self.table_scan.get_val(field_name)
    }

    fn has_field(&self, field_name: &str) -> bool {
        self.table_scan.has_field(field_name)
    }

    fn close(&mut self) {
        self.index.close();
        self.table_scan.close();
    }
}
