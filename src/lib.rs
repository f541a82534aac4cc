pub mod error;
pub mod index;
pub mod metadata;
pub mod parse;
pub mod plan;
pub mod query;
pub mod record;
pub mod server;
pub mod storage;
pub mod tx;
pub mod utils;

pub use crate::error::{DbError, DbResult};
pub use crate::server::HeuroDB;
