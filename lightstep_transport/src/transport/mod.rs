/**
 * Transport layer — HTTP delivery, the bounded queue, and the worker thread.
 *
 * - `http` — `Deliver` seam and the ureq-based collector client
 * - `queue` — fixed-capacity FIFO between producers and the worker
 * - `worker` — the single background thread draining the queue
 */

pub mod http;
pub mod queue;
pub mod worker;

pub use http::{Deliver, HttpTransport};
pub use queue::JobQueue;
pub use worker::{Worker, WorkerHandle};
