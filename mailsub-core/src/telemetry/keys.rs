/// Span/trace attribute keys for subscriber calls.
/// Keep these stable; changing them is a breaking change for dashboards.
pub const KEY_PROVIDER: &str = "esp.provider";
pub const KEY_LIST_ID: &str = "esp.list_id";
pub const KEY_OUTCOME: &str = "esp.outcome";
pub const KEY_LATENCY_MS: &str = "latency.ms";

/// Error-related (if applicable)
pub const KEY_ERROR_KIND: &str = "error.kind";
pub const KEY_ERROR_MESSAGE: &str = "error.message";

pub const OUTCOME_OK: &str = "ok";
pub const OUTCOME_ERROR: &str = "error";
