//! File upload handling.
//!
//! # Data Flow
//! ```text
//! PUT /name (body)  ─┐
//!                    ├─▶ path.rs (confine name to the served directory)
//! POST multipart ────┘        │
//!                             ▼
//!                    sink.rs (stream to unique temp file, atomic rename)
//! ```
//!
//! # Design Decisions
//! - The temp file lives inside the target directory so the final rename
//!   never crosses a filesystem boundary and stays atomic
//! - Cleanup of the temp file is a drop guard; every failure path removes it
//! - Client-supplied names never escape the served directory

pub mod path;
pub mod sink;

pub use sink::{UploadError, UploadSink};
