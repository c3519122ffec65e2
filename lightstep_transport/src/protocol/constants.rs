/**
 * Wire-level constants shared by the transport and the controller.
 */

/// Collector endpoint every report is POSTed to.
pub const REPORTS_PATH: &str = "/api/v0/reports";

/// Header carrying the project access token.
pub const ACCESS_TOKEN_HEADER: &str = "LightStep-Access-Token";

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Capacity of the bounded job queue. A full queue blocks the submitting thread.
pub const QUEUE_CAPACITY: usize = 16;

/// Verbosity at which invalid input and failed deliveries are logged.
pub const VERBOSITY_WARN: u8 = 1;

/// Verbosity at which report content and collector responses are logged.
pub const VERBOSITY_DEBUG: u8 = 3;
