use crate::error::DbResult;
use crate::index::Index;
use crate::query::rid_set;
use crate::query::{Constant, Scan, UpdateScan};
use crate::record::{TableScan, RID};

/// Joins an outer scan against a table through several of the table's
/// indexes at once. For each outer row the indexes are probed with that
/// row's join values, the RID lists intersected, and the inner table scan
/// visits the survivors before the outer scan advances.
pub struct MultiIndexJoinScan {
    outer: Box<dyn Scan>,
    indexes: Vec<Box<dyn Index>>,
    join_fields: Vec<String>,
    inner: TableScan,
    outer_valid: bool,
    matches: Vec<RID>,
    position: usize,
}

impl MultiIndexJoinScan {
    pub fn new(
        outer: Box<dyn Scan>,
        indexes: Vec<Box<dyn Index>>,
        join_fields: Vec<String>,
        inner: TableScan,
    ) -> DbResult<Self> {
        assert_eq!(
            indexes.len(),
            join_fields.len(),
            "each index needs a matching outer join field"
        );
        let mut scan = MultiIndexJoinScan {
            outer,
            indexes,
            join_fields,
            inner,
            outer_valid: false,
            matches: Vec::new(),
            position: 0,
        };
        scan.before_first()?;
        Ok(scan)
    }

    /// Probes every index with the current outer row's join values and
    /// rebuilds the intersected RID list.
    fn reset_indexes(&mut self) -> DbResult<()> {
        let mut rid_lists = Vec::with_capacity(self.indexes.len());
        for (index, field) in self.indexes.iter_mut().zip(&self.join_fields) {
            let key = self.outer.get_val(field)?;
            index.before_first(&key)?;
            let mut rids = Vec::new();
            while index.next()? {
                rids.push(index.get_data_rid()?);
            }
            rid_lists.push(rids);
        }
        self.matches = rid_set::intersect_all(rid_lists);
        self.position = 0;
        Ok(())
    }
}

impl Scan for MultiIndexJoinScan {
    fn before_first(&mut self) -> DbResult<()> {
        self.outer.before_first()?;
        self.outer_valid = self.outer.next()?;
        if self.outer_valid {
            self.reset_indexes()?;
        } else {
            self.matches.clear();
            self.position = 0;
        }
        Ok(())
    }

    fn next(&mut self) -> DbResult<bool> {
        while self.outer_valid {
            if self.position < self.matches.len() {
                let rid = self.matches[self.position];
                self.position += 1;
                self.inner.move_to_rid(rid)?;
                return Ok(true);
            }
            self.outer_valid = self.outer.next()?;
            if self.outer_valid {
                self.reset_indexes()?;
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
        for index in &mut self.indexes {
            index.close();
        }
        self.inner.close();
    }
}
