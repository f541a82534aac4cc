use std::collections::HashMap;

use crate::error::{DbError, DbResult};
use crate::query::{Scan, UpdateScan};
use crate::record::{FieldType, Layout, Schema, TableScan};
use crate::tx::Transaction;

/// Maintains the table catalog: one `tblcat` row per table and one
/// `fldcat` row per field.
pub struct TableMgr {
    tcat_layout: Layout,
    fcat_layout: Layout,
}

impl TableMgr {
    pub const MAX_NAME: usize = 16;

    pub fn new(is_new: bool, tx: Transaction) -> DbResult<Self> {
        let mut tcat_schema = Schema::new();
        tcat_schema.add_string_field("tblname", Self::MAX_NAME);
        tcat_schema.add_int_field("slotsize");
        let tcat_layout = Layout::new(tcat_schema.clone());

        let mut fcat_schema = Schema::new();
        fcat_schema.add_string_field("tblname", Self::MAX_NAME);
        fcat_schema.add_string_field("fldname", Self::MAX_NAME);
        fcat_schema.add_int_field("type");
        fcat_schema.add_int_field("length");
        fcat_schema.add_int_field("offset");
        let fcat_layout = Layout::new(fcat_schema.clone());

        let table_mgr = Self {
            tcat_layout,
            fcat_layout,
        };

        if is_new {
            table_mgr.create_table("tblcat", &tcat_schema, tx.clone())?;
            table_mgr.create_table("fldcat", &fcat_schema, tx)?;
        }

        Ok(table_mgr)
    }

    pub fn create_table(&self, table_name: &str, sch: &Schema, tx: Transaction) -> DbResult<()> {
        let layout = Layout::new(sch.clone());

        let mut tcat = TableScan::new(tx.clone(), "tblcat", self.tcat_layout.clone())?;
        tcat.insert()?;
        tcat.set_string("tblname", table_name)?;
        tcat.set_int("slotsize", layout.slot_size() as i32)?;
        tcat.close();

        let mut fcat = TableScan::new(tx, "fldcat", self.fcat_layout.clone())?;
        for field_name in sch.fields() {
            fcat.insert()?;
            fcat.set_string("tblname", table_name)?;
            fcat.set_string("fldname", field_name)?;
            let type_value = match sch.field_type(field_name) {
                Some(FieldType::Integer) => 0,
                Some(FieldType::Varchar) => 1,
                None => return Err(DbError::FieldNotFound(field_name.clone())),
            };
            fcat.set_int("type", type_value)?;
            fcat.set_int("length", sch.length(field_name).unwrap_or(0) as i32)?;
            fcat.set_int("offset", layout.offset(field_name).unwrap_or(0) as i32)?;
        }
        fcat.close();

        Ok(())
    }

    pub fn get_layout(&self, table_name: &str, tx: Transaction) -> DbResult<Layout> {
        let mut size = None;
        let mut tcat = TableScan::new(tx.clone(), "tblcat", self.tcat_layout.clone())?;
        while tcat.next()? {
            if tcat.get_string("tblname")? == table_name {
                size = Some(tcat.get_int("slotsize")? as usize);
                break;
            }
        }
        tcat.close();
        let size =
            size.ok_or_else(|| DbError::Schema(format!("unknown table {}", table_name)))?;

        let mut sch = Schema::new();
        let mut offsets = HashMap::new();
        let mut fcat = TableScan::new(tx, "fldcat", self.fcat_layout.clone())?;
        while fcat.next()? {
            if fcat.get_string("tblname")? == table_name {
                let field_name = fcat.get_string("fldname")?;
                let field_type = match fcat.get_int("type")? {
                    0 => FieldType::Integer,
                    1 => FieldType::Varchar,
                    other => {
                        return Err(DbError::Schema(format!(
                            "unknown field type code {} for {}",
                            other, field_name
                        )))
                    }
                };
                let field_len = fcat.get_int("length")? as usize;
                let offset = fcat.get_int("offset")? as usize;

                offsets.insert(field_name.clone(), offset);
                sch.add_field(&field_name, field_type, field_len);
            }
        }
        fcat.close();

        Ok(Layout::with_offsets(sch, offsets, size))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::storage::FileMgr;

    #[test]
    fn test_create_and_reread_layout() -> DbResult<()> {
        let temp_dir = TempDir::new().unwrap();
        let file_mgr = Arc::new(FileMgr::new(temp_dir.path(), 400)?);
        let tx = Transaction::new(file_mgr);

        let table_mgr = TableMgr::new(true, tx.clone())?;

        let mut test_schema = Schema::new();
        test_schema.add_int_field("id");
        test_schema.add_string_field("name", 20);
        test_schema.add_int_field("age");

        table_mgr.create_table("test_table", &test_schema, tx.clone())?;

        let layout = table_mgr.get_layout("test_table", tx.clone())?;
        assert!(layout.schema().has_field("id"));
        assert!(layout.schema().has_field("name"));
        assert!(layout.schema().has_field("age"));
        assert!(layout.slot_size() > 0);

        let layout2 = table_mgr.get_layout("test_table", tx)?;
        assert_eq!(layout.slot_size(), layout2.slot_size());
        assert_eq!(layout.schema().fields(), layout2.schema().fields());
        Ok(())
    }

    #[test]
    fn test_unknown_table_is_an_error() -> DbResult<()> {
        let temp_dir = TempDir::new().unwrap();
        let file_mgr = Arc::new(FileMgr::new(temp_dir.path(), 400)?);
        let tx = Transaction::new(file_mgr);

        let table_mgr = TableMgr::new(true, tx.clone())?;
        assert!(matches!(
            table_mgr.get_layout("nope", tx),
            Err(DbError::Schema(_))
        ));
        Ok(())
    }
}
