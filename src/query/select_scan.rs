use crate::error::DbResult;
use crate::query::{Constant, Predicate, Scan};

/// Filters an underlying scan by a predicate.
pub struct SelectScan {
    scan: Box<dyn Scan>,
    pred: Predicate,
}

impl SelectScan {
    pub fn new(scan: Box<dyn Scan>, pred: Predicate) -> Self {
        SelectScan { scan, pred }
    }
}

impl Scan for SelectScan {
    fn before_first(&mut self) -> DbResult<()> {
        self.scan.before_first()
    }

    fn next(&mut self) -> DbResult<bool> {
        while self.scan.next()? {
            if self.pred.is_satisfied(&mut *self.scan)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn get_int(&mut self, field_name: &str) -> DbResult<i32> {
        self.scan.get_int(field_name)
    }

    fn get_string(&mut self, field_name: &str) -> DbResult<String> {
        self.scan.get_string(field_name)
    }

    fn get_val(&mut self, field_name: &str) -> DbResult<Constant> {
        self.scan.get_val(field_name)
    }

    fn has_field(&self, field_name: &str) -> bool {
        self.scan.has_field(field_name)
    }

    fn close(&mut self) {
        self.scan.close();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::query::{Expr, Term, UpdateScan};
    use crate::record::{Layout, Schema, TableScan};
    use crate::storage::FileMgr;
    use crate::tx::Transaction;

    #[test]
    fn test_select_scan_filters() -> DbResult<()> {
        let temp_dir = TempDir::new().unwrap();
        let file_mgr = Arc::new(FileMgr::new(temp_dir.path(), 400)?);
        let tx = Transaction::new(file_mgr);

        let mut schema = Schema::new();
        schema.add_int_field("id");
        schema.add_string_field("name", 20);
        let layout = Layout::new(schema);

        let mut table_scan = TableScan::new(tx.clone(), "test_table", layout)?;
        for (id, name) in [(1, "Alice"), (2, "Bob"), (3, "Charlie")] {
            table_scan.insert()?;
            table_scan.set_int("id", id)?;
            table_scan.set_string("name", name)?;
        }

        let pred = Predicate::new(Term::new(
            Expr::field_name("id"),
            Expr::constant(Constant::int(1)),
        ));
        let mut select_scan = SelectScan::new(Box::new(table_scan), pred);

        select_scan.before_first()?;
        let mut count = 0;
        while select_scan.next()? {
            count += 1;
            assert_eq!(select_scan.get_int("id")?, 1);
            assert_eq!(select_scan.get_string("name")?, "Alice");
        }
        assert_eq!(count, 1, "Should have found one record with id = 1");

        select_scan.close();
        Ok(())
    }
}
