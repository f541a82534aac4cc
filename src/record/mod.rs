pub mod layout;
pub mod record_page;
pub mod rid;
pub mod schema;
pub mod table_scan;

pub use layout::Layout;
pub use record_page::RecordPage;
pub use rid::RID;
pub use schema::{FieldType, Schema};
pub use table_scan::TableScan;
