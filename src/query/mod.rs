pub mod constant;
pub mod expression;
pub mod index_join_scan;
pub mod index_select_scan;
pub mod multi_index_join_scan;
pub mod multi_index_select_scan;
pub mod predicate;
pub mod product_scan;
pub mod project_scan;
pub mod rid_set;
pub mod scan;
pub mod select_scan;
pub mod term;
pub mod update_scan;

pub use constant::Constant;
pub use expression::Expr;
pub use index_join_scan::IndexJoinScan;
pub use index_select_scan::IndexSelectScan;
pub use multi_index_join_scan::MultiIndexJoinScan;
pub use multi_index_select_scan::MultiIndexSelectScan;
pub use predicate::Predicate;
pub use product_scan::ProductScan;
pub use project_scan::ProjectScan;
pub use scan::Scan;
pub use select_scan::SelectScan;
pub use term::Term;
pub use update_scan::UpdateScan;
