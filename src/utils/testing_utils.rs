use std::ops::Deref;
use std::sync::Arc;

use tempfile::TempDir;

use crate::error::DbResult;
use crate::plan::PlanEventSink;
use crate::server::{Config, HeuroDB};

const TEST_PAGE_SIZE: usize = 400;

/// A database over a temporary directory. The directory must outlive the
/// database, so both travel together.
pub struct TempHeuroDB {
    db: HeuroDB,
    _dir: TempDir,
}

impl Deref for TempHeuroDB {
    type Target = HeuroDB;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

pub fn temp_db() -> DbResult<TempHeuroDB> {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let cfg = Config::new(temp_dir.path()).block_size(TEST_PAGE_SIZE);
    let db = HeuroDB::with_config(cfg)?;
    Ok(TempHeuroDB {
        db,
        _dir: temp_dir,
    })
}

pub fn temp_db_with_sink(sink: Arc<dyn PlanEventSink>) -> DbResult<TempHeuroDB> {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let cfg = Config::new(temp_dir.path()).block_size(TEST_PAGE_SIZE);
    let db = HeuroDB::with_event_sink(cfg, sink)?;
    Ok(TempHeuroDB {
        db,
        _dir: temp_dir,
    })
}
