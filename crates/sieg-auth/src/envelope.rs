//! Provider response envelope
//!
//! Every SIEG OAuth endpoint answers with
//! `{IsSuccess, Data, StatusCode, ErrorMessage}`. Fields are read by
//! truthiness, not strict JSON type: `"0"` is a failed call and `"401"` is a
//! status code.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Decoded JSON object returned by a provider endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiEnvelope {
    fields: Map<String, Value>,
}

impl ApiEnvelope {
    /// Parse a response body. Anything but a JSON object is malformed.
    pub fn parse(url: &str, body: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(fields)) => Ok(Self { fields }),
            Ok(_) => Err(Error::MalformedResponse(format!(
                "response from '{url}' is not a JSON object"
            ))),
            Err(e) => Err(Error::MalformedResponse(format!(
                "could not decode JSON response from '{url}': {e}"
            ))),
        }
    }

    pub fn is_success(&self) -> bool {
        self.fields.get("IsSuccess").is_some_and(is_truthy)
    }

    /// The `Data` member, unless missing or null.
    pub fn data(&self) -> Option<&Value> {
        self.fields.get("Data").filter(|v| !v.is_null())
    }

    /// `Data.AccessToken` when present, a string, and not blank.
    pub fn data_access_token(&self) -> Option<&str> {
        self.data()?
            .get("AccessToken")?
            .as_str()
            .filter(|s| !s.trim().is_empty())
    }

    /// `StatusCode`, 0 when missing or not numeric.
    pub fn status_code(&self) -> i64 {
        match self.fields.get("StatusCode") {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    /// `ErrorMessage`, empty when missing or null.
    pub fn error_message(&self) -> String {
        match self.fields.get("ErrorMessage") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    /// Build the provider error for a failed call.
    pub fn failure(&self, message: impl Into<String>) -> Error {
        Error::Provider {
            message: message.into(),
            status_code: self.status_code(),
            provider_message: self.error_message(),
        }
    }
}

/// Loose truthiness: `false`, `null`, `0`, `""`, `"0"`, `[]` and `{}` are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> ApiEnvelope {
        ApiEnvelope::parse("https://api/x", &value.to_string()).unwrap()
    }

    #[test]
    fn successful_generate_response() {
        let env = envelope(json!({
            "IsSuccess": true,
            "Data": {"AccessToken": "abc", "ExpiresIn": 0},
            "StatusCode": 200,
            "ErrorMessage": null
        }));
        assert!(env.is_success());
        assert_eq!(env.data_access_token(), Some("abc"));
        assert_eq!(env.status_code(), 200);
        assert_eq!(env.error_message(), "");
    }

    #[test]
    fn falsy_success_values() {
        for value in [json!(false), json!(null), json!(0), json!(""), json!("0")] {
            let env = envelope(json!({ "IsSuccess": value }));
            assert!(!env.is_success(), "{value} should be falsy");
        }
        assert!(!envelope(json!({})).is_success());
    }

    #[test]
    fn truthy_success_values() {
        for value in [json!(true), json!(1), json!("true")] {
            let env = envelope(json!({ "IsSuccess": value }));
            assert!(env.is_success(), "{value} should be truthy");
        }
    }

    #[test]
    fn blank_or_missing_access_token_is_absent() {
        assert_eq!(envelope(json!({"Data": null})).data_access_token(), None);
        assert_eq!(envelope(json!({"Data": {}})).data_access_token(), None);
        assert_eq!(
            envelope(json!({"Data": {"AccessToken": "  "}})).data_access_token(),
            None
        );
        assert_eq!(
            envelope(json!({"Data": {"AccessToken": 42}})).data_access_token(),
            None
        );
    }

    #[test]
    fn status_code_accepts_numeric_strings() {
        assert_eq!(envelope(json!({"StatusCode": "401"})).status_code(), 401);
        assert_eq!(envelope(json!({"StatusCode": "oops"})).status_code(), 0);
        assert_eq!(envelope(json!({})).status_code(), 0);
    }

    #[test]
    fn failure_carries_status_and_message() {
        let env = envelope(json!({
            "IsSuccess": false,
            "StatusCode": 400,
            "ErrorMessage": "bad"
        }));
        let err = env.failure("failed to refresh token.");
        assert_eq!(
            err.to_string(),
            "failed to refresh token. StatusCode=400, Error='bad'."
        );
    }

    #[test]
    fn non_object_bodies_are_malformed() {
        for body in ["not json", "[1,2]", "\"str\"", "null", ""] {
            let err = ApiEnvelope::parse("https://api/x", body).unwrap_err();
            assert!(matches!(err, Error::MalformedResponse(_)), "body {body:?}");
        }
    }
}
