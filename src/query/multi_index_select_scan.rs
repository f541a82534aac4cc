use crate::error::DbResult;
use crate::index::Index;
use crate::query::rid_set;
use crate::query::{Constant, Scan, UpdateScan};
use crate::record::{TableScan, RID};

/// Selects table rows matching several indexed equality constraints at once.
///
/// Each index is drained for its search key, the resulting RID lists are
/// intersected, and the table scan visits only the surviving RIDs.
pub struct MultiIndexSelectScan {
    table_scan: TableScan,
    indexes: Vec<Box<dyn Index>>,
    vals: Vec<Constant>,
    matches: Vec<RID>,
    position: usize,
}

impl MultiIndexSelectScan {
    pub fn new(
        table_scan: TableScan,
        indexes: Vec<Box<dyn Index>>,
        vals: Vec<Constant>,
    ) -> DbResult<Self> {
        assert_eq!(
            indexes.len(),
            vals.len(),
            "each index needs a matching search key"
        );
        let mut scan = MultiIndexSelectScan {
            table_scan,
            indexes,
            vals,
            matches: Vec::new(),
            position: 0,
        };
        scan.before_first()?;
        Ok(scan)
    }
}

impl Scan for MultiIndexSelectScan {
    fn before_first(&mut self) -> DbResult<()> {
        let mut rid_lists = Vec::with_capacity(self.indexes.len());
        for (index, val) in self.indexes.iter_mut().zip(&self.vals) {
            index.before_first(val)?;
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

    fn next(&mut self) -> DbResult<bool> {
        if self.position < self.matches.len() {
            let rid = self.matches[self.position];
            self.position += 1;
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
        for index in &mut self.indexes {
            index.close();
        }
        self.table_scan.close();
    }
}
