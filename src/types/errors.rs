//! Error types owned by this crate.
//!
//! Filesystem failures are never wrapped: they travel as the original
//! `std::io::Error`. Only text-encoding problems originate here.
use thiserror::Error;

use super::encoding::TextEncoding;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("unknown text encoding: {0}")]
    UnknownEncoding(String),
    #[error("character {ch:?} at byte offset {offset} cannot be encoded as {encoding}")]
    Unrepresentable {
        ch: char,
        offset: usize,
        encoding: TextEncoding,
    },
}

impl From<EncodeError> for std::io::Error {
    fn from(e: EncodeError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, e)
    }
}
