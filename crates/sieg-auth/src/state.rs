//! Random `state` values for the authorization redirect
//!
//! The state is round-tripped by the provider and lets the callback handler
//! reject forged requests and find the initiating session. Callers that
//! already have a correlation id can pass that instead.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngExt;

/// Generate a random state value.
///
/// 32 random bytes, URL-safe base64 without padding (43 characters), so it
/// needs no escaping in the authorization URL.
pub fn generate_state() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
