use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::DbResult;
use crate::query::Scan;
use crate::record::{Layout, TableScan};
use crate::tx::Transaction;

/// Statistics for one table, shared by every plan and index built over it.
///
/// All `IndexInfo`s of a table must hold the same `Arc<StatInfo>` so their
/// cost estimates agree; `MultiIndexSelectPlan` rejects index sets whose
/// statistics diverge.
#[derive(Debug)]
pub struct StatInfo {
    num_blocks: u64,
    num_recs: u64,
}

impl StatInfo {
    pub fn new(num_blocks: u64, num_recs: u64) -> Self {
        StatInfo {
            num_blocks,
            num_recs,
        }
    }

    pub fn blocks_accessed(&self) -> u64 {
        self.num_blocks
    }

    pub fn records_output(&self) -> u64 {
        self.num_recs
    }

    /// Crude guess, wildly inaccurate for skewed data.
    pub fn distinct_values(&self, _field_name: &str) -> u64 {
        1 + self.num_recs / 3
    }
}

/// Keeps table statistics in memory, recomputing them by scanning the
/// table the first time it is asked about, and refreshing everything
/// after a fixed number of lookups.
pub struct StatMgr {
    inner: Mutex<StatMgrInner>,
}

struct StatMgrInner {
    table_stats: HashMap<String, Arc<StatInfo>>,
    num_calls: usize,
}

impl StatMgr {
    const REFRESH_LIMIT: usize = 100;

    pub fn new() -> Self {
        StatMgr {
            inner: Mutex::new(StatMgrInner {
                table_stats: HashMap::new(),
                num_calls: 0,
            }),
        }
    }

    pub fn get_stat_info(
        &self,
        table_name: &str,
        layout: &Layout,
        tx: Transaction,
    ) -> DbResult<Arc<StatInfo>> {
        let mut inner = self.inner.lock().unwrap();
        inner.num_calls += 1;
        if inner.num_calls > Self::REFRESH_LIMIT {
            inner.table_stats.clear();
            inner.num_calls = 0;
        }
        if let Some(stats) = inner.table_stats.get(table_name) {
            return Ok(Arc::clone(stats));
        }
        let stats = Arc::new(Self::calc_table_stats(table_name, layout, tx)?);
        inner
            .table_stats
            .insert(table_name.to_string(), Arc::clone(&stats));
        Ok(stats)
    }

    fn calc_table_stats(
        table_name: &str,
        layout: &Layout,
        tx: Transaction,
    ) -> DbResult<StatInfo> {
        let mut num_recs = 0;
        let mut num_blocks = 0;
        let mut scan = TableScan::new(tx, table_name, layout.clone())?;
        while scan.next()? {
            num_recs += 1;
            num_blocks = scan.current_block_number() as u64 + 1;
        }
        scan.close();
        Ok(StatInfo::new(num_blocks, num_recs))
    }
}

impl Default for StatMgr {
    fn default() -> Self {
        Self::new()
    }
}
