use serde::{Deserialize, Serialize};

/// Identifies one stored row: the block number within the table file plus the
/// slot within the block. Structural equality; hashable so RID sets from
/// several indexes can be intersected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RID {
    block_number: i32,
    slot: usize,
}

impl RID {
    pub fn new(block_number: i32, slot: usize) -> Self {
        RID { block_number, slot }
    }

    pub fn block_number(&self) -> i32 {
        self.block_number
    }

    pub fn slot(&self) -> usize {
        self.slot
    }
}

impl std::fmt::Display for RID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.block_number, self.slot)
    }
}
