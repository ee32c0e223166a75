//! Async file handle provider.
//!
//! Opening, closing and unlinking files are the only filesystem calls the
//! transfer engines make. They go through [`HandleProvider`] so a transfer
//! can run against the real filesystem ([`TokioFs`]) or against a wrapper
//! that observes or fails those calls.

mod flags;
mod provider;

pub use flags::OpenFlags;
pub use provider::{HandleProvider, TokioFs};

/// Permission bits applied to files created without an explicit mode.
pub const DEFAULT_FILE_MODE: u32 = 0o666;
