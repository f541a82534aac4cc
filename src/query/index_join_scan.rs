use crate::error::DbResult;
use crate::index::Index;
use crate::query::{Constant, Scan, UpdateScan};
use crate::record::TableScan;

/// Index nested-loop join: for each row of the outer scan, probes the
/// inner table's index with the outer row's join value.
pub struct IndexJoinScan {
    outer: Box<dyn Scan>,
    index: Box<dyn Index>,
    join_field: String,
    inner: TableScan,
    outer_valid: bool,
}

impl IndexJoinScan {
    pub fn new(
        outer: Box<dyn Scan>,
        index: Box<dyn Index>,
        join_field: &str,
        inner: TableScan,
    ) -> DbResult<Self> {
        let mut scan = IndexJoinScan {
            outer,
            index,
            join_field: join_field.to_string(),
            inner,
            outer_valid: false,
        };
        scan.before_first()?;
        Ok(scan)
    }

    fn reset_index(&mut self) -> DbResult<()> {
        let key = self.outer.get_val(&self.join_field)?;
        self.index.before_first(&key)
    }
}

impl Scan for IndexJoinScan {
    fn before_first(&mut self) -> DbResult<()> {
        self.outer.before_first()?;
        self.outer_valid = self.outer.next()?;
        if self.outer_valid {
            self.reset_index()?;
        }
        Ok(())
    }

    fn next(&mut self) -> DbResult<bool> {
        while self.outer_valid {
            if self.index.next()? {
                let rid = self.index.get_data_rid()?;
                self.inner.move_to_rid(rid)?;
                return Ok(true);
            }
            self.outer_valid = self.outer.next()?;
            if self.outer_valid {
                self.reset_index()?;
            }
        }
        Ok(false)
    }

    fn get_int(&mut self, field_name: &str) -> DbResult<i32> {
        if self.inner.has_field(field_name) {
            self.inner.get_int(field_name)
        } else {
            self.outer.get_int(field_name)
        }
    }

    fn get_string(&mut self, field_name: &str) -> DbResult<String> {
        if self.inner.has_field(field_name) {
            self.inner.get_string(field_name)
        } else {
            self.outer.get_string(field_name)
        }
    }

    fn get_val(&mut self, field_name: &str) -> DbResult<Constant> {
        if self.inner.has_field(field_name) {
            self.inner.get_val(field_name)
        } else {
            self.outer.get_val(field_name)
        }
    }

    fn has_field(&self, field_name: &str) -> bool {
        self.inner.has_field(field_name) || self.outer.has_field(field_name)
    }

    fn close(&mut self) {
        self.outer.close();
        self.index.close();
        self.inner.close();
    }
}
