//! spyglass: a local HTTP file server that doubles as a request inspector.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌───────────────────────────────────────────────┐
//!                  │                   SPYGLASS                    │
//!                  │                                               │
//!  Client Request  │  ┌──────────┐ enqueue  ┌────────────────────┐ │
//!  ────────────────┼─▶│ dispatch │─────────▶│ observer queue (10)│ │
//!                  │  └────┬─────┘          └─────────┬──────────┘ │
//!                  │       │ forward                  │ drain      │
//!                  │       ▼                          ▼            │
//!                  │  ┌──────────┐            ┌──────────────┐     │
//!  Client Response │  │ delegate │            │   renderer   │     │
//!  ◀───────────────┼──│ uploads/ │            │  (one task)  │────▶│ stdout
//!                  │  │ ServeDir │            └──────────────┘     │
//!                  │  └──────────┘                                 │
//!                  └───────────────────────────────────────────────┘
//! ```
//!
//! Every request is snapshot and enqueued before the delegate sees it; the
//! renderer drains the queue on its own task, so log rendering never sits on
//! the response path. The only coupling is deliberate backpressure when the
//! queue is full.

pub mod config;
pub mod http;
pub mod observer;
pub mod upload;

pub use config::Config;
pub use http::HttpServer;
