use serde::{Deserialize, Serialize};

use super::keys::*;

/// Provider-agnostic record of one `add_subscriber` call.
/// Never carries credentials or the subscriber's email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SubscribeTrace {
    /// Provider identifier, e.g. "mailchimp", "klaviyo".
    pub provider: Option<String>,

    /// Target list on the provider side.
    pub list_id: Option<String>,

    /// Wall time of the transport call.
    pub latency_ms: Option<u128>,

    /// "ok" or "error".
    pub outcome: Option<String>,

    /// Optional error metadata, if applicable.
    pub error_kind: Option<String>,
    pub error_message: Option<String>,
}

impl SubscribeTrace {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn provider(mut self, provider: &str) -> Self {
        self.provider = Some(provider.to_string());
        self
    }
    pub fn list_id(mut self, list_id: &str) -> Self {
        self.list_id = Some(list_id.to_string());
        self
    }
    pub fn latency_ms(mut self, ms: u128) -> Self {
        self.latency_ms = Some(ms);
        self
    }
    pub fn ok(mut self) -> Self {
        self.outcome = Some(OUTCOME_OK.to_string());
        self
    }
    pub fn failed(mut self, kind: &str, message: &str) -> Self {
        self.outcome = Some(OUTCOME_ERROR.to_string());
        self.error_kind = Some(kind.to_string());
        self.error_message = Some(message.to_string());
        self
    }

    /// Flatten into key/value pairs using the stable attribute keys.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(v) = &self.provider {
            out.push((KEY_PROVIDER, v.clone()));
        }
        if let Some(v) = &self.list_id {
            out.push((KEY_LIST_ID, v.clone()));
        }
        if let Some(v) = &self.outcome {
            out.push((KEY_OUTCOME, v.clone()));
        }
        if let Some(v) = self.latency_ms {
            out.push((KEY_LATENCY_MS, v.to_string()));
        }
        if let Some(v) = &self.error_kind {
            out.push((KEY_ERROR_KIND, v.clone()));
        }
        if let Some(v) = &self.error_message {
            out.push((KEY_ERROR_MESSAGE, v.clone()));
        }
        out
    }
}
