//! SIEG OAuth integration library
//!
//! Builds the SIEG authorization URL, exchanges the temporary callback token
//! for a durable access token, refreshes it before expiry and revokes it on
//! demand. Persistence is delegated to a `TokenStore`; HTTP goes through an
//! injected `HttpTransport` (`ReqwestTransport` by default).
//!
//! Flow:
//! 1. Integrator redirects the user to `IntegrationClient::authorization_url()`
//! 2. SIEG calls back with a temporary token and the `state` it was given
//! 3. Callback handler calls `IntegrationClient::complete_authorization()`,
//!    which stores a durable `Token` under the account key
//! 4. API callers use `IntegrationClient::valid_access_token()`, which
//!    refreshes when the token is within the configured threshold of expiry
//! 5. `IntegrationClient::revoke()` invalidates the token at SIEG and
//!    deletes it locally

pub mod client;
pub mod constants;
pub mod envelope;
pub mod error;
pub mod metrics;
pub mod options;
pub mod state;
pub mod store;
pub mod token;
pub mod transport;

pub use client::IntegrationClient;
pub use constants::*;
pub use envelope::ApiEnvelope;
pub use error::{Error, Result};
pub use options::{AccessLevel, OAuthOptions};
pub use state::generate_state;
pub use store::{InMemoryTokenStore, TokenStore};
pub use token::Token;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
