pub mod index_info;
pub mod index_mgr;
pub mod metadata_mgr;
pub mod stat_mgr;
pub mod table_mgr;

pub use index_info::IndexInfo;
pub use index_mgr::IndexMgr;
pub use metadata_mgr::MetadataMgr;
pub use stat_mgr::{StatInfo, StatMgr};
pub use table_mgr::TableMgr;
