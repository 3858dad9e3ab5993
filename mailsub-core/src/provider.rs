use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing_futures::Instrument;

use crate::error::{CoreResult, SubscribeError};
use crate::http_client::Transport;
use crate::record::SubscriberRecord;
use crate::request::{Auth, RequestDescriptor};
use crate::telemetry::{self, SubscribeTrace};

/// Username sent alongside the API key for providers that use HTTP basic auth.
/// The providers ignore it; only the password (the key) matters.
pub const BASIC_AUTH_USER: &str = "anystring";

/// The stored `(username, api key)` basic-auth pair of an adapter.
#[derive(Debug)]
pub struct BasicAuth {
    pub username: &'static str,
    pub api_key: SecretString,
}

impl BasicAuth {
    pub fn new(api_key: &SecretString) -> Self {
        Self {
            username: BASIC_AUTH_USER,
            api_key: SecretString::from(api_key.expose_secret().to_owned()),
        }
    }

    pub(crate) fn to_request_auth(&self) -> Auth {
        Auth::Basic {
            username: self.username.to_string(),
            password: SecretString::from(self.api_key.expose_secret().to_owned()),
        }
    }
}

/// Adds one subscriber to one list on an email-marketing service.
///
/// Every call performs at most one network request and returns the decoded
/// response body unchanged. Records are validated before anything is sent.
#[async_trait]
pub trait SubscriberProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn add_subscriber(&self, record: SubscriberRecord) -> CoreResult<Value>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Mailchimp,
    Klaviyo,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Mailchimp => "mailchimp",
            ProviderKind::Klaviyo => "klaviyo",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = SubscribeError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mailchimp" => Ok(ProviderKind::Mailchimp),
            "klaviyo" => Ok(ProviderKind::Klaviyo),
            other => Err(SubscribeError::Configuration(format!(
                "unknown provider '{other}'"
            ))),
        }
    }
}

/// Hand a finished descriptor to the transport inside an `add_subscriber` span
/// and report the outcome to the telemetry sink. The result is passed through as is.
pub(crate) async fn dispatch(
    transport: &dyn Transport,
    provider: &str,
    list_id: &str,
    req: RequestDescriptor,
) -> CoreResult<Value> {
    let span = tracing::info_span!(
        "add_subscriber",
        esp.provider = provider,
        esp.list_id = list_id,
        esp.outcome = tracing::field::Empty,
    );
    let started = Instant::now();
    let result = transport.execute(req).instrument(span.clone()).await;
    let trace = SubscribeTrace::new()
        .provider(provider)
        .list_id(list_id)
        .latency_ms(started.elapsed().as_millis());

    match &result {
        Ok(_) => {
            span.record("esp.outcome", telemetry::OUTCOME_OK);
            telemetry::emit(trace.ok());
        }
        Err(e) => {
            span.record("esp.outcome", e.kind());
            telemetry::emit(trace.failed(e.kind(), &e.summary()));
        }
    }
    result
}
