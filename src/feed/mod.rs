//! Input and renderer feed

pub mod handler;
pub mod protocol;

pub use handler::{parse_line, spawn_reader, write_messages};

/// Feed transport errors
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Feed I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}
