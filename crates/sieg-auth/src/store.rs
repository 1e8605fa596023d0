//! Token storage abstraction
//!
//! `TokenStore` holds at most one `Token` per account key. The client reads,
//! then conditionally writes, with no lock held across the provider call.
//! That race is benign while the provider keeps the access token string
//! stable on refresh. Backends used concurrently against a provider that
//! rotates tokens must serialize per account key themselves (a lock or a
//! conditional update).

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use tokio::sync::Mutex;
use tracing::debug;

use crate::error::Result;
use crate::token::Token;

/// Boxed future returned by `TokenStore` methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Per-account token persistence.
///
/// Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility
/// (`Arc<dyn TokenStore>`). Backend failures are reported as `Error::Store`.
pub trait TokenStore: Send + Sync {
    /// Token for the account, or `None` if nothing is stored.
    fn get_token<'a>(&'a self, account_key: &'a str) -> StoreFuture<'a, Option<Token>>;

    /// Store the token, replacing any previous one for the account.
    fn save_token<'a>(&'a self, account_key: &'a str, token: Token) -> StoreFuture<'a, ()>;

    /// Remove the account's token. No-op if absent.
    fn delete_token<'a>(&'a self, account_key: &'a str) -> StoreFuture<'a, ()>;
}

/// Process-local store for tests and single-process tools.
///
/// Nothing survives a restart. The mutex only makes individual calls safe;
/// it does not serialize a read-refresh-write sequence.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: Mutex<HashMap<String, Token>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tokens.
    pub async fn len(&self) -> usize {
        self.tokens.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// All account keys with a stored token.
    pub async fn account_keys(&self) -> Vec<String> {
        self.tokens.lock().await.keys().cloned().collect()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn get_token<'a>(&'a self, account_key: &'a str) -> StoreFuture<'a, Option<Token>> {
        Box::pin(async move { Ok(self.tokens.lock().await.get(account_key).cloned()) })
    }

    fn save_token<'a>(&'a self, account_key: &'a str, token: Token) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.tokens.lock().await.insert(account_key.to_owned(), token);
            debug!(account_key, "saved token");
            Ok(())
        })
    }

    fn delete_token<'a>(&'a self, account_key: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            if self.tokens.lock().await.remove(account_key).is_some() {
                debug!(account_key, "deleted token");
            }
            Ok(())
        })
    }
}
