/*!
 * HTTP transport for delivering reports to the collector.
 *
 * Uses `ureq`, a blocking HTTP client with no async runtime. The worker
 * is already a dedicated background thread, so blocking I/O is fine there.
 *
 * Each call makes exactly one attempt. Failures come back as a
 * `DeliveryError`. The caller decides what to do with it, and in practice
 * that means dropping it.
 */

use std::time::Duration;

use log::debug;
use ureq::Agent;

use crate::error::DeliveryError;
use crate::protocol::constants::{ACCESS_TOKEN_HEADER, CONTENT_TYPE_JSON, VERBOSITY_DEBUG};
use crate::protocol::types::DeliveryJob;

// ---------------------------------------------------------------------------
// Deliver — the seam between the worker and the network
// ---------------------------------------------------------------------------

/**
 * Performs one network submission for a job.
 *
 * Shared between the controller (for the final flush in `close()`) and
 * whichever worker thread is current, hence `Send + Sync`.
 */
pub trait Deliver: Send + Sync {
    fn deliver(&self, job: &DeliveryJob) -> Result<(), DeliveryError>;
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/**
 * Thin wrapper around `ureq::Agent` that POSTs jobs to the collector.
 *
 * The agent pools connections, so consecutive reports to the same host
 * reuse the keep-alive connection.
 */
pub struct HttpTransport {
    agent: Agent,
}

impl HttpTransport {
    /**
     * Creates a transport with the given connect and whole-request timeouts.
     *
     * HTTP error statuses are returned as responses, not errors, so the
     * body can still be logged before it is turned into `Rejected`.
     */
    pub fn new(connect_timeout: Duration, request_timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_connect(Some(connect_timeout))
            .timeout_global(Some(request_timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self { agent }
    }
}

impl Deliver for HttpTransport {
    fn deliver(&self, job: &DeliveryJob) -> Result<(), DeliveryError> {
        let body = serde_json::to_vec(&job.content)?;
        let endpoint = job.connection.endpoint();

        let response = self
            .agent
            .post(endpoint.as_str())
            .header(ACCESS_TOKEN_HEADER, job.access_token.as_str())
            .header("Content-Type", CONTENT_TYPE_JSON)
            .header("Connection", "keep-alive")
            .send(&body[..])?;

        let status = response.status().as_u16();

        /*
         * Always drain the body so the pooled connection can be reused.
         * Its content only matters for diagnostics.
         */
        let text = response
            .into_body()
            .read_to_string()
            .unwrap_or_else(|_| "<unreadable body>".into());

        if job.connection.verbosity >= VERBOSITY_DEBUG {
            debug!("Collector responded with HTTP {status}: {text}");
        }

        if (200..300).contains(&status) {
            Ok(())
        } else {
            Err(DeliveryError::Rejected { status })
        }
    }
}
