use std::path::{Path, PathBuf};

pub struct Config {
    pub db_directory: PathBuf,
    pub block_size: usize,
}

impl Config {
    pub fn new<P: AsRef<Path>>(db_directory: P) -> Self {
        Self {
            db_directory: db_directory.as_ref().to_path_buf(),
            block_size: 4096,
        }
    }

    pub fn block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }
}
