/**
 * Configuration options for the report transport.
 *
 * The field names follow the tracer's option keys so the struct can be
 * deserialized straight from the tracer's JSON/TOML configuration:
 *
 * ```json
 * {
 *   "verbosity": 1,
 *   "collector_host": "collector.lightstep.com",
 *   "collector_port": 443,
 *   "collector_encryption": "tls"
 * }
 * ```
 *
 * Every field has a default, so partial configs are fine.
 */
use std::time::Duration;

use serde::Deserialize;

use crate::protocol::types::ConnectionConfig;

// ---------------------------------------------------------------------------
// Encryption
// ---------------------------------------------------------------------------

/**
 * Collector encryption setting.
 *
 * Only the literal `"none"` disables TLS. Any other value (`"tls"`, or
 * something the tracer does not know yet) enables it.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Encryption {
    None,
    Tls,
}

impl From<String> for Encryption {
    fn from(value: String) -> Self {
        if value == "none" {
            Encryption::None
        } else {
            Encryption::Tls
        }
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Options {
    /// 0 = silent, 1 = warnings, 3+ = report content and collector responses.
    pub verbosity: u8,

    pub collector_host: String,

    pub collector_port: u16,

    pub collector_encryption: Encryption,

    /// Connect timeout for each request, in milliseconds.
    /// Fixed for the lifetime of a `Controller`.
    pub connect_timeout_ms: u64,

    /// Upper bound on a whole request, in milliseconds. Keeps a stalled
    /// collector from wedging the worker forever.
    /// Fixed for the lifetime of a `Controller`.
    pub request_timeout_ms: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            verbosity: 1,
            collector_host: "collector.lightstep.com".into(),
            collector_port: 443,
            collector_encryption: Encryption::Tls,
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
        }
    }
}

impl Options {
    /// Snapshot of the connection settings, as captured into each job.
    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig {
            host: self.collector_host.clone(),
            port: self.collector_port,
            secure: self.collector_encryption != Encryption::None,
            verbosity: self.verbosity,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
