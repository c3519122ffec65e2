/**
 * Core type definitions for report delivery.
 *
 * A `DeliveryJob` is a self-contained snapshot: the connection settings,
 * access token, and report content are all copied in at submit time, so
 * a later `ensure_connection()` never affects jobs already in the queue.
 *
 * Jobs travel to the worker wrapped in a `WorkerMsg`, which also carries
 * the shutdown sentinel.
 */
use serde_json::Value;

use super::constants::REPORTS_PATH;

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/**
 * Credential source for the collector.
 *
 * Implemented by whatever the tracer uses to hold its project token.
 * `String` and `str` implement it directly for convenience.
 */
pub trait Auth {
    /// Access token sent in the `LightStep-Access-Token` header.
    fn access_token(&self) -> &str;
}

impl Auth for str {
    fn access_token(&self) -> &str {
        self
    }
}

impl Auth for String {
    fn access_token(&self) -> &str {
        self.as_str()
    }
}

// ---------------------------------------------------------------------------
// ConnectionConfig
// ---------------------------------------------------------------------------

/**
 * Where and how a single job is delivered.
 *
 * Cloned into every job at submit time.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Collector host name, e.g. `"collector.lightstep.com"`.
    pub host: String,

    /// Collector port.
    pub port: u16,

    /// `true` → HTTPS, `false` → plain HTTP.
    pub secure: bool,

    /// Diagnostic verbosity captured with the job.
    pub verbosity: u8,
}

impl ConnectionConfig {
    /**
     * Full collector URL for this connection, e.g.
     * `https://example.com:443/api/v0/reports`.
     */
    pub fn endpoint(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{scheme}://{}:{}{REPORTS_PATH}", self.host, self.port)
    }
}

// ---------------------------------------------------------------------------
// DeliveryJob
// ---------------------------------------------------------------------------

/**
 * Everything one network submission needs.
 *
 * `content` is already converted to a JSON value; the transport only has
 * to write it out.
 */
#[derive(Debug, Clone)]
pub struct DeliveryJob {
    pub connection: ConnectionConfig,
    pub access_token: String,
    pub content: Value,
}

impl DeliveryJob {
    pub fn new(connection: ConnectionConfig, access_token: &str, content: Value) -> Self {
        Self {
            connection,
            access_token: access_token.to_string(),
            content,
        }
    }
}

// ---------------------------------------------------------------------------
// WorkerMsg
// ---------------------------------------------------------------------------

/**
 * Messages that flow through the bounded queue to the worker.
 */
#[derive(Debug)]
pub enum WorkerMsg {
    /// A report to POST to the collector.
    Job(DeliveryJob),

    /**
     * Stops the worker loop once every message ahead of it has been
     * handled. Never transmitted.
     */
    Shutdown,
}

impl WorkerMsg {
    pub fn is_shutdown_signal(&self) -> bool {
        matches!(self, WorkerMsg::Shutdown)
    }
}
