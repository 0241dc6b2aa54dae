use thiserror::Error;

/// Failure of a checked reinterpretation of a byte range.
///
/// Returned instead of performing an unchecked cast. Seeing one of these
/// from a collection means the bytes in the store do not match the type the
/// caller asked for (a schema mismatch), so callers normally treat it as a bug.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewError {
    #[error("address {addr:#x} is not aligned to {align} bytes")]
    Misaligned { addr: usize, align: usize },

    #[error("byte length {len} does not fit element size {size}")]
    SizeMismatch { len: usize, size: usize },

    #[error("range {offset}..{offset}+{count} out of bounds for view of {len}")]
    OutOfBounds {
        offset: usize,
        count: usize,
        len: usize,
    },
}

#[derive(Error, Debug)]
pub enum ColsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("View integrity violation: {0}")]
    View(#[from] ViewError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl ColsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ColsError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, ColsError>;
