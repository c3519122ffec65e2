/*!
 * LightStep report transport — asynchronous delivery of tracer reports.
 *
 * Application threads hand finished reports to a `Controller`, which
 * queues them on a bounded channel. A single background thread POSTs
 * them to the collector in order. Callers never wait on the network
 * (only on a full queue), and network failures never reach them.
 *
 * # Module structure
 *
 * - `protocol/` — what we send: job types, wire constants
 * - `transport/` — how we deliver: HTTP client, bounded queue, worker thread
 * - `controller` — lifecycle: lazy start, fork detection, shutdown
 * - `identity` — owner identity used for fork detection
 * - `config` — collector options
 * - `error` — delivery errors (never surfaced to callers)
 * - `guard` — RAII close-on-drop
 *
 * # Example
 *
 * ```ignore
 * use lightstep_transport::{Controller, Options};
 *
 * let controller = Controller::new(&Options::default());
 * controller.submit(Some("ACCESS_TOKEN"), Some(&serde_json::json!({"spans": []})));
 * controller.close(false);
 * ```
 */

mod config;
mod controller;
mod error;
mod guard;
mod identity;
mod protocol;
mod transport;

#[cfg(test)]
mod testing;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use config::{Encryption, Options};
pub use controller::Controller;
pub use error::DeliveryError;
pub use guard::Guard;
pub use identity::{OwnerIdentity, ProcessIdentity};
pub use protocol::constants::{ACCESS_TOKEN_HEADER, QUEUE_CAPACITY, REPORTS_PATH};
pub use protocol::types::{Auth, ConnectionConfig, DeliveryJob, WorkerMsg};
pub use transport::{Deliver, HttpTransport};
