use std::path::Path;
use std::sync::Arc;

use crate::error::DbResult;
use crate::metadata::MetadataMgr;
use crate::plan::{Planner, PlanEventSink};
use crate::storage::FileMgr;
use crate::tx::Transaction;

use super::Config;

/// An embedded database instance over one directory of table files.
pub struct HeuroDB {
    file_mgr: Arc<FileMgr>,
    metadata_mgr: Arc<MetadataMgr>,
    planner: Planner,
}

impl HeuroDB {
    pub fn with_config(config: Config) -> DbResult<Self> {
        let file_mgr = Arc::new(FileMgr::new(&config.db_directory, config.block_size)?);
        let tx = Transaction::new(Arc::clone(&file_mgr));
        let metadata_mgr = Arc::new(MetadataMgr::new(file_mgr.is_new(), tx.clone())?);
        let planner = Planner::new(Arc::clone(&metadata_mgr));
        tx.commit()?;

        Ok(Self {
            file_mgr,
            metadata_mgr,
            planner,
        })
    }

    pub fn new<P: AsRef<Path>>(db_directory: P) -> DbResult<Self> {
        Self::with_config(Config::new(db_directory))
    }

    /// Routes the planner's decisions to the given sink instead of the
    /// default `tracing` output.
    pub fn with_event_sink(config: Config, sink: Arc<dyn PlanEventSink>) -> DbResult<Self> {
        let mut db = Self::with_config(config)?;
        db.planner = Planner::with_sink(Arc::clone(&db.metadata_mgr), sink);
        Ok(db)
    }

    pub fn new_tx(&self) -> Transaction {
        Transaction::new(Arc::clone(&self.file_mgr))
    }

    pub fn file_mgr(&self) -> Arc<FileMgr> {
        Arc::clone(&self.file_mgr)
    }

    pub fn metadata_mgr(&self) -> Arc<MetadataMgr> {
        Arc::clone(&self.metadata_mgr)
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{DbError, DbResult};
    use crate::query::Scan;
    use crate::utils::testing_utils::temp_db;

    #[test]
    fn test_sql_round_trip() -> DbResult<()> {
        let db = temp_db()?;
        let tx = db.new_tx();
        let planner = db.planner();

        planner.execute_update("CREATE TABLE people (id INT, name VARCHAR(10))", &tx)?;
        planner.execute_update("INSERT INTO people (id, name) VALUES (1, 'Ada')", &tx)?;
        planner.execute_update("INSERT INTO people (id, name) VALUES (2, 'Grace')", &tx)?;

        let plan = planner.create_query_plan("SELECT name FROM people WHERE id = 2", &tx)?;
        let mut scan = plan.open(&tx)?;
        assert!(scan.next()?);
        assert_eq!(scan.get_string("name")?, "Grace");
        assert!(!scan.next()?);
        scan.close();

        tx.commit()?;
        Ok(())
    }

    #[test]
    fn test_update_statement() -> DbResult<()> {
        let db = temp_db()?;
        let tx = db.new_tx();
        let planner = db.planner();

        planner.execute_update("CREATE TABLE people (id INT, name VARCHAR(10))", &tx)?;
        planner.execute_update("INSERT INTO people (id, name) VALUES (1, 'Ada')", &tx)?;
        let affected =
            planner.execute_update("UPDATE people SET name = 'Lin' WHERE id = 1", &tx)?;
        assert_eq!(affected, 1);

        let plan = planner.create_query_plan("SELECT name FROM people WHERE id = 1", &tx)?;
        let mut scan = plan.open(&tx)?;
        assert!(scan.next()?);
        assert_eq!(scan.get_string("name")?, "Lin");
        scan.close();
        Ok(())
    }

    /// A statement naming a column the table does not have must come back
    /// as an error, never take down the caller.
    #[test]
    fn test_unknown_column_is_an_error() -> DbResult<()> {
        let db = temp_db()?;
        let tx = db.new_tx();
        let planner = db.planner();

        planner.execute_update("CREATE TABLE people (id INT, name VARCHAR(10))", &tx)?;
        planner.execute_update("INSERT INTO people (id, name) VALUES (1, 'Ada')", &tx)?;

        assert!(matches!(
            planner.create_query_plan("SELECT nickname FROM people", &tx),
            Err(DbError::FieldNotFound(_))
        ));
        assert!(matches!(
            planner.execute_update("INSERT INTO people (nickname) VALUES (2)", &tx),
            Err(DbError::FieldNotFound(_))
        ));
        assert!(matches!(
            planner.execute_update("UPDATE people SET nickname = 'Lin' WHERE id = 1", &tx),
            Err(DbError::FieldNotFound(_))
        ));
        Ok(())
    }
}
