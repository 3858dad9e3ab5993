use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use md5::{Digest, Md5};
use secrecy::SecretString;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    error::{CoreResult, SubscribeError},
    http_client::Transport,
    provider::{dispatch, BasicAuth, SubscriberProvider},
    record::SubscriberRecord,
    request::{Body, RequestDescriptor},
};

/// API keys look like `<secret>-<datacenter>`, e.g. `0123abcd-us13`.
const KEY_SEPARATOR: char = '-';

/// Members not yet on the list are created with this status; existing members keep theirs.
pub const STATUS_IF_NEW: &str = "subscribed";

pub struct Mailchimp {
    transport: Arc<dyn Transport>,
    auth: BasicAuth,
    list_id: String,
    base: String,
    name: String,
}

impl fmt::Debug for Mailchimp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailchimp")
            .field("auth", &self.auth)
            .field("list_id", &self.list_id)
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl Mailchimp {
    /// Fails with a configuration error unless the key carries a datacenter suffix.
    pub fn new(
        transport: Arc<dyn Transport>,
        api_key: impl Into<String>,
        list_id: impl Into<String>,
    ) -> CoreResult<Self> {
        let api_key = api_key.into();
        let dc = datacenter(&api_key)?;
        let base = format!("https://{dc}.api.mailchimp.com/3.0");
        Ok(Self {
            transport,
            auth: BasicAuth::new(&SecretString::from(api_key)),
            list_id: list_id.into(),
            base,
            name: "mailchimp".into(),
        })
    }

    /// Point the adapter somewhere other than the datacenter host (proxies, mock servers).
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    pub fn basic_auth(&self) -> &BasicAuth {
        &self.auth
    }

    /// PUT upsert of the member addressed by its email hash, tunnelled through POST.
    pub fn build_request(&self, payload: &MemberPayload) -> CoreResult<RequestDescriptor> {
        let url = format!(
            "{}/lists/{}/members/{}",
            self.base,
            self.list_id,
            subscriber_hash(&payload.email_address)
        );
        let body = serde_json::to_value(payload).map_err(|e| SubscribeError::Other(e.into()))?;
        Ok(RequestDescriptor::post(url)
            .header("x-http-method-override", "PUT")
            .header("content-type", "application/json")
            .auth(self.auth.to_request_auth())
            .body(Body::Json(body)))
    }
}

fn datacenter(api_key: &str) -> CoreResult<&str> {
    match api_key.rsplit_once(KEY_SEPARATOR) {
        Some((_, dc)) if !dc.is_empty() => Ok(dc),
        Some(_) => Err(SubscribeError::Configuration(
            "invalid api key: empty datacenter suffix".into(),
        )),
        None => Err(SubscribeError::Configuration(format!(
            "invalid api key: expected '<key>{KEY_SEPARATOR}<datacenter>'"
        ))),
    }
}

/// Hex MD5 of the lowercased address. Mailchimp addresses list members by it,
/// so the same subscriber always maps to the same member resource.
pub fn subscriber_hash(email: &str) -> String {
    hex::encode(Md5::digest(email.to_lowercase().as_bytes()))
}

// ---- Wire struct ----
#[derive(Debug, Serialize, PartialEq)]
pub struct MemberPayload {
    pub email_address: String,
    pub status_if_new: &'static str,
    pub merge_fields: Map<String, Value>,
}

/// Every field other than `email` becomes a merge field.
pub fn prepare_member(mut record: SubscriberRecord) -> CoreResult<MemberPayload> {
    let email_address = record.take_email()?;
    Ok(MemberPayload {
        email_address,
        status_if_new: STATUS_IF_NEW,
        merge_fields: record.into_fields(),
    })
}

#[async_trait]
impl SubscriberProvider for Mailchimp {
    fn name(&self) -> &str {
        &self.name
    }

    async fn add_subscriber(&self, record: SubscriberRecord) -> CoreResult<Value> {
        let payload = prepare_member(record)?;
        let req = self.build_request(&payload)?;
        dispatch(self.transport.as_ref(), &self.name, &self.list_id, req).await
    }
}
