use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreResult, SubscribeError};

/// The one field every subscriber record must carry.
pub const EMAIL_FIELD: &str = "email";

/// Generic subscriber record: `email` plus any number of caller-defined
/// custom fields whose names and values are passed through untouched.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct SubscriberRecord {
    fields: Map<String, Value>,
}

impl SubscriberRecord {
    pub fn new(email: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(EMAIL_FIELD.to_string(), Value::String(email.into()));
        Self { fields }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Remove and return the email address.
    /// Fails when it is missing or not a string.
    pub fn take_email(&mut self) -> CoreResult<String> {
        match self.fields.remove(EMAIL_FIELD) {
            Some(Value::String(email)) => Ok(email),
            Some(_) => Err(SubscribeError::Validation(format!(
                "field '{EMAIL_FIELD}' must be a string"
            ))),
            None => Err(SubscribeError::Validation(format!(
                "missing required field '{EMAIL_FIELD}'"
            ))),
        }
    }

    pub fn take(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    /// Whatever is left after the adapter has lifted out its known keys.
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for SubscriberRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl TryFrom<Value> for SubscriberRecord {
    type Error = SubscribeError;

    fn try_from(value: Value) -> CoreResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(SubscribeError::Validation(format!(
                "subscriber record must be a json object, got {other}"
            ))),
        }
    }
}
