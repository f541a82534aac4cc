use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Schema exception: {0}")]
    Schema(String),

    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("No available slot in record file")]
    NoAvailableSlot,

    #[error("Bad index value: {0}")]
    BadIndex(String),

    #[error("Plan contract violation: {0}")]
    PlanContract(String),
}

pub type DbResult<T> = std::result::Result<T, DbError>;
