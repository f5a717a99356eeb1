//! Bounded observer queue.
//!
//! # Design Decisions
//! - `tokio::sync::mpsc` with a fixed capacity: enqueue order equals dequeue
//!   order, and a saturated queue suspends producers instead of dropping
//!   records
//! - Single consumer; the renderer owns the receiving half

use tokio::sync::mpsc;

use super::record::RequestRecord;

/// Queue depth before enqueue applies backpressure.
pub const QUEUE_CAPACITY: usize = 10;

/// Create the observer queue pair.
///
/// The [`ObserverHandle`] goes to the dispatcher, the receiver to the
/// renderer task.
pub fn channel() -> (ObserverHandle, mpsc::Receiver<RequestRecord>) {
    let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
    (ObserverHandle { tx }, rx)
}

/// Producer handle held by the dispatcher. Cheap to clone.
#[derive(Clone)]
pub struct ObserverHandle {
    tx: mpsc::Sender<RequestRecord>,
}

impl ObserverHandle {
    /// Enqueue a record, waiting for space when the queue is full.
    ///
    /// Waiting here deliberately slows the serving path: observation is
    /// never silently dropped. If the renderer has gone away the record is
    /// discarded and serving continues.
    pub async fn enqueue(&self, record: RequestRecord) {
        if self.tx.send(record).await.is_err() {
            tracing::warn!("observer queue closed, request not logged");
        }
    }
}
