use serde::{Deserialize, Serialize};

/// Identifies a disk block: a file name plus a block number within that file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId {
    file_name: String,
    number: i32,
}

impl BlockId {
    pub fn new(file_name: String, num: i32) -> Self {
        BlockId {
            file_name,
            number: num,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn number(&self) -> i32 {
        self.number
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[file {}, block {}]", self.file_name, self.number)
    }
}
