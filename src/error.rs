//! Configuration errors.
//!
//! Everything here is detected before a `MemoryManager` is built. Accesses to
//! unknown segments and segment layouts that overflow memory are not errors;
//! they show up in the simulation results instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid number in {field}: {token:?}")]
    InvalidNumber { field: &'static str, token: String },

    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error("total memory {total_memory} is not a multiple of page size {page_size}")]
    UnevenMemory { page_size: u64, total_memory: u64 },

    #[error("page sequence has {pages} entries but segment ids has {segment_ids}")]
    LengthMismatch { pages: usize, segment_ids: usize },

    #[error("unknown algorithm: {0:?} (expected lru or optimal)")]
    UnknownAlgorithm(String),

    #[error("unknown configuration key {key:?} on line {line}")]
    UnknownKey { key: String, line: usize },

    #[error("line {line} is not a `key = value` pair: {content:?}")]
    MalformedLine { line: usize, content: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
