use crate::error::DbResult;
use crate::query::Constant;

/// An open, positionable cursor over the rows a plan produces.
///
/// A scan is positioned "before first" on creation and after `before_first`;
/// the field accessors are defined only while positioned on a valid row.
/// `close` releases all nested resources.
pub trait Scan {
    /// Position the scan before the first record.
    fn before_first(&mut self) -> DbResult<()>;

    /// Advance to the next record; false when exhausted.
    fn next(&mut self) -> DbResult<bool>;

    fn get_int(&mut self, field_name: &str) -> DbResult<i32>;
    fn get_string(&mut self, field_name: &str) -> DbResult<String>;
    fn get_val(&mut self, field_name: &str) -> DbResult<Constant>;
    fn has_field(&self, field_name: &str) -> bool;

    fn close(&mut self);
}
