use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};

use crate::{
    error::CoreResult,
    http_client::Transport,
    provider::{dispatch, BasicAuth, SubscriberProvider},
    record::SubscriberRecord,
    request::{Auth, Body, RequestDescriptor},
};

pub const KLAVIYO_BASE: &str = "https://a.klaviyo.com/api/v1";

/// Lifted to the top level of the form instead of going into `properties`.
pub const CONFIRM_OPTIN_FIELD: &str = "confirm_optin";

const API_KEY_PARAM: &str = "api_key";

pub struct Klaviyo {
    transport: Arc<dyn Transport>,
    api_key: SecretString,
    list_id: String,
    base: String,
    auth: BasicAuth,
    name: String,
}

impl fmt::Debug for Klaviyo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Klaviyo")
            .field("list_id", &self.list_id)
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl Klaviyo {
    pub fn new(
        transport: Arc<dyn Transport>,
        api_key: impl Into<String>,
        list_id: impl Into<String>,
    ) -> Self {
        let api_key = SecretString::from(api_key.into());
        Self {
            transport,
            auth: BasicAuth::new(&api_key),
            api_key,
            list_id: list_id.into(),
            base: KLAVIYO_BASE.to_string(),
            name: "klaviyo".into(),
        }
    }

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

    /// Basic-auth pair kept alongside the key. Requests never send it: this
    /// API authenticates through the `api_key` query parameter instead.
    pub fn basic_auth(&self) -> &BasicAuth {
        &self.auth
    }

    pub fn build_request(&self, form: MemberForm) -> RequestDescriptor {
        let url = format!("{}/list/{}/members", self.base, self.list_id);
        RequestDescriptor::post(url)
            .auth(Auth::Query {
                name: API_KEY_PARAM.to_string(),
                value: SecretString::from(self.api_key.expose_secret().to_owned()),
            })
            .body(Body::Form(form.into_fields()))
    }
}

/// Form fields of a list-members POST.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberForm {
    pub email: String,
    pub confirm_optin: Option<Value>,
    /// Custom fields as a json-encoded string; absent when there are none.
    pub properties: Option<String>,
}

impl MemberForm {
    pub fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("email".into(), Value::String(self.email));
        if let Some(optin) = self.confirm_optin {
            fields.insert(CONFIRM_OPTIN_FIELD.into(), optin);
        }
        if let Some(props) = self.properties {
            fields.insert("properties".into(), Value::String(props));
        }
        fields
    }
}

pub fn prepare_member(mut record: SubscriberRecord) -> CoreResult<MemberForm> {
    let email = record.take_email()?;
    let confirm_optin = record.take(CONFIRM_OPTIN_FIELD);
    let rest = record.into_fields();
    let properties = if rest.is_empty() {
        None
    } else {
        Some(Value::Object(rest).to_string())
    };
    Ok(MemberForm {
        email,
        confirm_optin,
        properties,
    })
}

#[async_trait]
impl SubscriberProvider for Klaviyo {
    fn name(&self) -> &str {
        &self.name
    }

    async fn add_subscriber(&self, record: SubscriberRecord) -> CoreResult<Value> {
        let form = prepare_member(record)?;
        let req = self.build_request(form);
        dispatch(self.transport.as_ref(), &self.name, &self.list_id, req).await
    }
}
