use http::Method;
use secrecy::SecretString;
use serde_json::{Map, Value};

/// How a request authenticates against the provider.
#[derive(Debug)]
pub enum Auth {
    None,
    /// HTTP basic auth.
    Basic {
        username: String,
        password: SecretString,
    },
    /// Credential passed as a URL query parameter.
    Query { name: String, value: SecretString },
}

#[derive(Debug, PartialEq)]
pub enum Body {
    Empty,
    Json(Value),
    /// Form-encoded fields. Strings are sent as-is, everything else as compact json text.
    Form(Map<String, Value>),
}

/// Fully determines one HTTP call. Built by an adapter, consumed once by a transport.
#[derive(Debug)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub auth: Auth,
    pub body: Body,
}

impl RequestDescriptor {
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: Vec::new(),
            auth: Auth::None,
            body: Body::Empty,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Flatten form fields into the string pairs that go on the wire.
pub fn form_pairs(fields: &Map<String, Value>) -> Vec<(String, String)> {
    fields
        .iter()
        .map(|(k, v)| {
            let v = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), v)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serde_json::json;

    #[test]
    fn form_pairs_keep_strings_raw() {
        let fields = json!({
            "email": "a@b.com",
            "confirm_optin": true,
            "properties": "{\"city\":\"NYC\"}"
        });
        let pairs = form_pairs(fields.as_object().unwrap());
        assert!(pairs.contains(&("email".into(), "a@b.com".into())));
        assert!(pairs.contains(&("confirm_optin".into(), "true".into())));
        assert!(pairs.contains(&("properties".into(), r#"{"city":"NYC"}"#.into())));
    }

    #[test]
    fn debug_never_prints_secrets() {
        let req = RequestDescriptor::post("https://example.test").auth(Auth::Basic {
            username: "anystring".into(),
            password: SecretString::from("super-secret-us13".to_string()),
        });
        let dbg = format!("{req:?}");
        assert!(!dbg.contains("super-secret"));
        match &req.auth {
            Auth::Basic { password, .. } => {
                assert_eq!(password.expose_secret(), "super-secret-us13")
            }
            other => panic!("expected Basic, got: {:?}", other),
        }
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = RequestDescriptor::post("u").header("X-HTTP-Method-Override", "PUT");
        assert_eq!(req.header_value("x-http-method-override"), Some("PUT"));
        assert_eq!(req.header_value("content-type"), None);
    }
}
