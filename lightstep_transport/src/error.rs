/**
 * Errors produced by a single delivery attempt.
 *
 * These never reach callers of the controller: the worker and the final
 * flush in `close()` drop them after logging.
 */
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("collector request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("collector responded with HTTP {status}")]
    Rejected { status: u16 },
}
