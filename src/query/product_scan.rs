use crate::error::DbResult;
use crate::query::{Constant, Scan};

/// Cartesian product of two scans, iterated block-nested-loop style:
/// for each row of the left scan, the right scan is replayed in full.
pub struct ProductScan {
    lhs: Box<dyn Scan>,
    rhs: Box<dyn Scan>,
    lhs_has_row: bool,
}

impl ProductScan {
    pub fn new(lhs: Box<dyn Scan>, rhs: Box<dyn Scan>) -> DbResult<Self> {
        let mut scan = ProductScan {
            lhs,
            rhs,
            lhs_has_row: false,
        };
        scan.before_first()?;
        Ok(scan)
    }
}

impl Scan for ProductScan {
    fn before_first(&mut self) -> DbResult<()> {
        self.lhs.before_first()?;
        self.lhs_has_row = self.lhs.next()?;
        self.rhs.before_first()
    }

    fn next(&mut self) -> DbResult<bool> {
        if !self.lhs_has_row {
            return Ok(false);
        }
        if self.rhs.next()? {
            return Ok(true);
        }
        while self.lhs.next()? {
            self.rhs.before_first()?;
            if self.rhs.next()? {
                return Ok(true);
            }
        }
        self.lhs_has_row = false;
        Ok(false)
    }

    fn get_int(&mut self, field_name: &str) -> DbResult<i32> {
        if self.lhs.has_field(field_name) {
            self.lhs.get_int(field_name)
        } else {
            self.rhs.get_int(field_name)
        }
    }

    fn get_string(&mut self, field_name: &str) -> DbResult<String> {
        if self.lhs.has_field(field_name) {
            self.lhs.get_string(field_name)
        } else {
            self.rhs.get_string(field_name)
        }
    }

    fn get_val(&mut self, field_name: &str) -> DbResult<Constant> {
        if self.lhs.has_field(field_name) {
            self.lhs.get_val(field_name)
        } else {
            self.rhs.get_val(field_name)
        }
    }

    fn has_field(&self, field_name: &str) -> bool {
        self.lhs.has_field(field_name) || self.rhs.has_field(field_name)
    }

    fn close(&mut self) {
        self.lhs.close();
        self.rhs.close();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::query::UpdateScan;
    use crate::record::{Layout, Schema, TableScan};
    use crate::storage::FileMgr;
    use crate::tx::Transaction;

    fn int_table(tx: &Transaction, name: &str, field: &str, values: &[i32]) -> DbResult<TableScan> {
        let mut schema = Schema::new();
        schema.add_int_field(field);
        let layout = Layout::new(schema);
        let mut scan = TableScan::new(tx.clone(), name, layout)?;
        for &v in values {
            scan.insert()?;
            scan.set_int(field, v)?;
        }
        Ok(scan)
    }

    #[test]
    fn test_product_scan_pairs_all_rows() -> DbResult<()> {
        let temp_dir = TempDir::new().unwrap();
        let file_mgr = Arc::new(FileMgr::new(temp_dir.path(), 400)?);
        let tx = Transaction::new(file_mgr);

        let lhs = int_table(&tx, "t1", "a", &[1, 2])?;
        let rhs = int_table(&tx, "t2", "b", &[10, 20, 30])?;

        let mut product = ProductScan::new(Box::new(lhs), Box::new(rhs))?;
        let mut pairs = Vec::new();
        while product.next()? {
            pairs.push((product.get_int("a")?, product.get_int("b")?));
        }
        assert_eq!(pairs.len(), 6);
        assert!(pairs.contains(&(1, 10)));
        assert!(pairs.contains(&(2, 30)));

        product.close();
        Ok(())
    }

    #[test]
    fn test_product_scan_with_empty_left_side() -> DbResult<()> {
        let temp_dir = TempDir::new().unwrap();
        let file_mgr = Arc::new(FileMgr::new(temp_dir.path(), 400)?);
        let tx = Transaction::new(file_mgr);

        let lhs = int_table(&tx, "t1", "a", &[])?;
        let rhs = int_table(&tx, "t2", "b", &[10, 20])?;

        let mut product = ProductScan::new(Box::new(lhs), Box::new(rhs))?;
        assert!(!product.next()?);

        product.close();
        Ok(())
    }
}
