//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, catch-all dispatch handler)
//!     → observer queue (snapshot enqueued before anything else)
//!     → delegate (upload sink → ServeDir, bare ServeDir, or none)
//!     → response to client
//! ```

pub mod server;

pub use server::{Delegate, HttpServer};
