use thiserror::Error;

/// MongoDB server code for a unique index violation.
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Outcome of a failed gateway operation.
///
/// Controllers match on the variant; only `Internal` carries store-native
/// text, and that text never leaves the process.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Not found")]
    NotFound,
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
    #[error("Duplicate key")]
    DuplicateKey,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<mongodb::error::Error> for GatewayError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            GatewayError::DuplicateKey
        } else {
            GatewayError::Internal(err.to_string())
        }
    }
}

/// Duplicate keys surface as write errors from `insert_one` and as command
/// errors from `find_one_and_update`.
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is not valid: {value}")]
    Invalid { name: &'static str, value: String },
}
