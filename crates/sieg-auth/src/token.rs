//! Durable SIEG access token
//!
//! A `Token` is an immutable value: the client never mutates a stored token,
//! it builds a new one (same access token, new expiry) on refresh and hands
//! it to the store. Deserialization goes through the same validation as
//! `Token::new`, so a store backend cannot hand back a blank credential.

use chrono::{DateTime, Duration, Utc};
use common::require_non_blank;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{DEFAULT_EXPIRY_TOLERANCE_SECS, TOKEN_LIFETIME_DAYS};
use crate::error::{Error, Result};

/// Access token obtained from generate-token, used to call SIEG APIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TokenRecord")]
pub struct Token {
    access_token: String,
    expires_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    additional_data: Map<String, Value>,
}

/// Wire shape accepted on deserialization before validation.
#[derive(Deserialize)]
struct TokenRecord {
    access_token: String,
    expires_at: DateTime<Utc>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    additional_data: Map<String, Value>,
}

impl TryFrom<TokenRecord> for Token {
    type Error = Error;

    fn try_from(record: TokenRecord) -> Result<Self> {
        Ok(Token::new(record.access_token, record.expires_at)?
            .with_refresh_token(record.refresh_token)
            .with_additional_data(record.additional_data))
    }
}

impl Token {
    /// Build a token. Fails with `InvalidArgument` if `access_token` is blank.
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Result<Self> {
        let access_token = access_token.into();
        require_non_blank("access_token", &access_token)?;
        Ok(Self {
            access_token,
            expires_at,
            refresh_token: None,
            additional_data: Map::new(),
        })
    }

    /// Build a token valid for the provider's fixed lifetime starting at `now`.
    pub fn issued_at(access_token: impl Into<String>, now: DateTime<Utc>) -> Result<Self> {
        Self::new(access_token, now + Duration::days(TOKEN_LIFETIME_DAYS))
    }

    pub fn with_refresh_token(self, refresh_token: Option<String>) -> Self {
        Self {
            refresh_token,
            ..self
        }
    }

    pub fn with_additional_data(self, additional_data: Map<String, Value>) -> Self {
        Self {
            additional_data,
            ..self
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn additional_data(&self) -> &Map<String, Value> {
        &self.additional_data
    }

    /// Whether the token should be treated as expired.
    ///
    /// Expired once `now >= expires_at - tolerance_secs`. The boundary is
    /// inclusive, so a check at exactly the threshold reports expired.
    /// `now` defaults to the current UTC instant. A threshold outside
    /// chrono's range counts as expired.
    pub fn is_expired(&self, now: Option<DateTime<Utc>>, tolerance_secs: i64) -> bool {
        let now = now.unwrap_or_else(Utc::now);
        let threshold = Duration::try_seconds(tolerance_secs)
            .and_then(|tolerance| self.expires_at.checked_sub_signed(tolerance));
        match threshold {
            Some(threshold) => now >= threshold,
            None => true,
        }
    }

    /// `is_expired` at the current instant with the default 60s skew tolerance.
    pub fn is_expired_default(&self) -> bool {
        self.is_expired(None, DEFAULT_EXPIRY_TOLERANCE_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn blank_access_token_is_rejected() {
        for blank in ["", " ", "\t\n"] {
            let err = Token::new(blank, at(1_700_000_000)).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "got {err:?}");
        }
    }

    #[test]
    fn new_token_has_no_extras() {
        let token = Token::new("at_abc", at(1_700_000_000)).unwrap();
        assert_eq!(token.access_token(), "at_abc");
        assert_eq!(token.expires_at(), at(1_700_000_000));
        assert!(token.refresh_token().is_none());
        assert!(token.additional_data().is_empty());
    }

    #[test]
    fn expiry_threshold_is_inclusive() {
        let token = Token::new("at", at(10_000)).unwrap();
        // threshold = 10_000 - 60 = 9_940
        assert!(!token.is_expired(Some(at(9_939)), 60));
        assert!(token.is_expired(Some(at(9_940)), 60));
        assert!(token.is_expired(Some(at(9_941)), 60));
    }

    #[test]
    fn zero_tolerance_expires_at_exact_instant() {
        let token = Token::new("at", at(10_000)).unwrap();
        assert!(!token.is_expired(Some(at(9_999)), 0));
        assert!(token.is_expired(Some(at(10_000)), 0));
    }

    #[test]
    fn refresh_window_of_five_days() {
        let now = at(1_700_000_000);
        let token = Token::issued_at("at", now).unwrap();
        let five_days = 5 * 24 * 60 * 60;
        assert!(!token.is_expired(Some(now + Duration::days(24)), five_days));
        assert!(token.is_expired(Some(now + Duration::days(25)), five_days));
    }

    #[test]
    fn out_of_range_threshold_counts_as_expired() {
        let earliest = Token::new("at", DateTime::<Utc>::MIN_UTC).unwrap();
        assert!(earliest.is_expired(None, 60));
        assert!(earliest.is_expired_default());

        let fresh = Token::new("at", Utc::now() + Duration::days(30)).unwrap();
        assert!(fresh.is_expired(None, i64::MAX));
        assert!(fresh.is_expired(None, i64::MIN));
    }

    #[test]
    fn issued_at_adds_thirty_days() {
        let now = at(1_700_000_000);
        let token = Token::issued_at("at", now).unwrap();
        assert_eq!(token.expires_at() - now, Duration::days(30));
    }

    #[test]
    fn default_tolerance_uses_current_time() {
        let fresh = Token::new("at", Utc::now() + Duration::hours(1)).unwrap();
        assert!(!fresh.is_expired_default());
        let close = Token::new("at", Utc::now() + Duration::seconds(30)).unwrap();
        assert!(close.is_expired_default());
    }

    #[test]
    fn serializes_and_validates_on_deserialize() {
        let mut extra = Map::new();
        extra.insert("cnpj".into(), Value::from("12345678000199"));
        let token = Token::new("at_abc", at(1_700_000_000))
            .unwrap()
            .with_refresh_token(Some("rt".into()))
            .with_additional_data(extra);

        let json = serde_json::to_string(&token).unwrap();
        let back: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);

        let blank = r#"{"access_token":"  ","expires_at":"2024-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<Token>(blank).is_err());
    }

    #[test]
    fn optional_fields_are_omitted_when_empty() {
        let token = Token::new("at_abc", at(0)).unwrap();
        let json = serde_json::to_string(&token).unwrap();
        assert!(!json.contains("refresh_token"));
        assert!(!json.contains("additional_data"));
    }
}
