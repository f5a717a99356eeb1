//! The request observer subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → record.rs (snapshot method/URI/headers at arrival)
//!     → queue.rs (bounded FIFO, capacity 10, backpressure when full)
//!     → render.rs (single consumer task, colorized summary + header dump)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Producer/consumer over a bounded `tokio::sync::mpsc` channel; no shared
//!   mutable state, no locks
//! - A saturated queue blocks producers rather than dropping records
//! - The renderer owns the output stream exclusively and runs on its own
//!   task, so a failure there can never reach the serving path

pub mod queue;
pub mod record;
pub mod render;

pub use queue::{channel, ObserverHandle, QUEUE_CAPACITY};
pub use record::RequestRecord;
pub use render::{Palette, Renderer};
