//! Shared helpers: token persistence and timestamp formatting.

pub mod format;
pub mod storage;
