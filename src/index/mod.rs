pub mod hash_index;

pub use hash_index::HashIndex;

use crate::error::DbResult;
use crate::query::Constant;
use crate::record::RID;

/// A seekable structure mapping the values of one column to the RIDs of the
/// rows holding them.
pub trait Index {
    /// Position the index before the first record having the specified search key.
    fn before_first(&mut self, search_key: &Constant) -> DbResult<()>;

    /// Move to the next record having the search key specified in `before_first`.
    /// Returns false when there are no more index records with that key.
    fn next(&mut self) -> DbResult<bool>;

    /// The RID stored in the current index record.
    fn get_data_rid(&mut self) -> DbResult<RID>;

    /// Insert an index record for the specified value and RID.
    fn insert(&mut self, data_val: &Constant, data_rid: &RID) -> DbResult<()>;

    /// Delete the index record for the specified value and RID.
    fn delete(&mut self, data_val: &Constant, data_rid: &RID) -> DbResult<()>;

    fn close(&mut self);
}
