//! High-level SIEG OAuth client
//!
//! `IntegrationClient` drives the whole flow for many accounts:
//! authorization URL, callback completion, auto-refresh and revocation.
//! Each public call performs at most one provider round-trip and never
//! retries. A token is written to the store only after the provider
//! confirms success.

use std::sync::Arc;

use chrono::Utc;
use common::require_non_blank;
use serde_json::{Value, json};
use tracing::{debug, info, warn};
use url::form_urlencoded;

use crate::constants::{
    CLIENT_ID_HEADER, FALLBACK_ACCESS_LEVEL, GENERATE_TOKEN_PATH, REFRESH_PATH, REVOKE_PATH,
    SECRET_KEY_HEADER,
};
use crate::envelope::ApiEnvelope;
use crate::error::{Error, Result};
use crate::metrics::{Operation, record_operation};
use crate::options::OAuthOptions;
use crate::store::TokenStore;
use crate::token::Token;
use crate::transport::{HttpTransport, ReqwestTransport};

/// OAuth client for one integrator, shared across accounts.
pub struct IntegrationClient {
    transport: Arc<dyn HttpTransport>,
    options: OAuthOptions,
    store: Arc<dyn TokenStore>,
}

impl IntegrationClient {
    /// Create a client. Fails with `InvalidArgument` if the client id,
    /// secret key or redirect URI is blank.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        options: OAuthOptions,
        store: Arc<dyn TokenStore>,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            transport,
            options,
            store,
        })
    }

    /// Create a client backed by the default `reqwest` transport.
    pub fn with_reqwest(options: OAuthOptions, store: Arc<dyn TokenStore>) -> Result<Self> {
        Self::new(Arc::new(ReqwestTransport::new()?), options, store)
    }

    /// Options the client was built with, after validation.
    pub fn options(&self) -> &OAuthOptions {
        &self.options
    }

    /// URL of the SIEG consent page to redirect the user to.
    ///
    /// `access_level` falls back to the configured default, then to "read".
    pub fn authorization_url(&self, state: &str, access_level: Option<&str>) -> Result<String> {
        require_non_blank("state", state)?;

        let level = access_level
            .or(self.options.default_access_level.as_deref())
            .unwrap_or(FALLBACK_ACCESS_LEVEL);
        let base = self.options.authorize_url();
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("clientId", &self.options.client_id)
            .append_pair("state", state)
            .append_pair("accessLevel", level)
            .finish();
        let separator = if base.contains('?') { '&' } else { '?' };

        Ok(format!("{base}{separator}{query}"))
    }

    /// Exchange the temporary token from the callback for a durable token
    /// and store it under `account_key`, replacing any previous one.
    pub async fn complete_authorization(
        &self,
        account_key: &str,
        temporary_access_token: &str,
        state: &str,
    ) -> Result<()> {
        require_non_blank("account_key", account_key)?;
        require_non_blank("temporary_access_token", temporary_access_token)?;
        require_non_blank("state", state)?;

        let url = self.options.api_url(GENERATE_TOKEN_PATH);
        let payload = json!({
            "AccessToken": temporary_access_token,
            "State": state,
            "RedirectUri": self.options.redirect_uri,
        });
        let response = self.post_json(&url, &payload).await;
        let envelope = record(Operation::Generate, response)?;

        let access_token = match envelope.data_access_token() {
            Some(token) if envelope.is_success() => token,
            _ => {
                record_operation(Operation::Generate, false);
                warn!(
                    account_key,
                    status_code = envelope.status_code(),
                    "generate-token rejected"
                );
                return Err(envelope.failure("failed to generate durable SIEG token."));
            }
        };

        let token = Token::issued_at(access_token, Utc::now())?;
        self.store.save_token(account_key, token).await?;
        record_operation(Operation::Generate, true);
        info!(account_key, "authorization completed, token stored");
        Ok(())
    }

    /// Access token for the account, refreshed first if it is within
    /// `auto_refresh_threshold_secs` of expiry.
    ///
    /// Refresh keeps the same access token string and only extends the
    /// locally tracked expiry; the refresh response is not checked for a
    /// rotated token. If the provider ever starts rotating tokens on
    /// refresh this returns a stale credential.
    pub async fn valid_access_token(&self, account_key: &str) -> Result<String> {
        require_non_blank("account_key", account_key)?;

        let token = self.store.get_token(account_key).await?.ok_or_else(|| {
            Error::NotFound(format!(
                "no SIEG token for account '{account_key}'; complete the authorization flow first"
            ))
        })?;

        if !token.is_expired(None, self.options.auto_refresh_threshold_secs) {
            return Ok(token.access_token().to_owned());
        }

        debug!(account_key, expires_at = %token.expires_at(), "token within refresh threshold");
        self.refresh(token.access_token()).await?;

        let renewed = Token::issued_at(token.access_token(), Utc::now())?;
        self.store.save_token(account_key, renewed).await?;
        info!(account_key, "token refreshed");
        Ok(token.access_token().to_owned())
    }

    /// Revoke the account's token at SIEG and delete it locally.
    ///
    /// Returns `Ok` without calling the provider if nothing is stored.
    pub async fn revoke(&self, account_key: &str) -> Result<()> {
        require_non_blank("account_key", account_key)?;

        let Some(token) = self.store.get_token(account_key).await? else {
            debug!(account_key, "no token stored, nothing to revoke");
            return Ok(());
        };

        let url = self.options.api_url(REVOKE_PATH);
        let payload = json!({ "Token": token.access_token() });
        let response = self.post_json(&url, &payload).await;
        let envelope = record(Operation::Revoke, response)?;

        if !envelope.is_success() {
            record_operation(Operation::Revoke, false);
            warn!(
                account_key,
                status_code = envelope.status_code(),
                "revoke rejected"
            );
            return Err(envelope.failure(format!(
                "failed to revoke SIEG token for account '{account_key}'."
            )));
        }

        self.store.delete_token(account_key).await?;
        record_operation(Operation::Revoke, true);
        info!(account_key, "token revoked");
        Ok(())
    }

    async fn refresh(&self, access_token: &str) -> Result<()> {
        let url = self.options.api_url(REFRESH_PATH);
        let payload = json!({ "Token": access_token });
        let response = self.post_json(&url, &payload).await;
        let envelope = record(Operation::Refresh, response)?;

        let success = envelope.is_success();
        record_operation(Operation::Refresh, success);
        if !success {
            warn!(status_code = envelope.status_code(), "refresh rejected");
            return Err(envelope.failure("failed to refresh SIEG token."));
        }
        Ok(())
    }

    /// POST with the integrator credential headers and decode the envelope.
    async fn post_json(&self, url: &str, payload: &Value) -> Result<ApiEnvelope> {
        let headers = [
            (CLIENT_ID_HEADER, self.options.client_id.clone()),
            (SECRET_KEY_HEADER, self.options.secret_key.expose().clone()),
        ];
        debug!(url, "calling SIEG");

        let response = match self.transport.post_json(url, &headers, payload).await {
            Ok(response) => response,
            Err(e @ Error::Http { .. }) => return Err(e),
            Err(e) => {
                return Err(Error::Http {
                    status: 0,
                    body: None,
                    message: format!("HTTP call to '{url}' failed: {e}"),
                });
            }
        };

        ApiEnvelope::parse(url, &response.body)
    }
}

/// Count a failed round-trip before propagating it.
fn record(operation: Operation, response: Result<ApiEnvelope>) -> Result<ApiEnvelope> {
    if response.is_err() {
        record_operation(operation, false);
    }
    response
}
