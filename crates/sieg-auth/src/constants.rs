//! SIEG OAuth constants
//!
//! Endpoint defaults and the provider contract values the client relies on.
//! None of these are secrets; the integrator's client id and secret key come
//! from `OAuthOptions`.

/// Authorization page the end user is redirected to.
pub const DEFAULT_AUTHORIZE_URL: &str = "https://app.sieg.com/AuthorizeAccess.aspx";

/// Root of the OAuth API (generate-token, refresh, revoke).
pub const DEFAULT_API_URL: &str = "https://api.sieg.com/api/v1/oauth/";

/// Exchanges the temporary callback token for a durable one.
pub const GENERATE_TOKEN_PATH: &str = "generate-token";

/// Extends the validity of an existing token.
pub const REFRESH_PATH: &str = "refresh";

/// Invalidates a token on the provider side.
pub const REVOKE_PATH: &str = "revoke";

/// Validity window the provider grants on generate and refresh.
///
/// The provider does not return an expiry, so the client assumes this
/// fixed window. Changing it is a change to the provider contract.
pub const TOKEN_LIFETIME_DAYS: i64 = 30;

/// Refresh this long before expiry: 5 days, so refresh lands on day 25.
pub const DEFAULT_AUTO_REFRESH_THRESHOLD_SECS: i64 = 5 * 24 * 60 * 60;

/// Clock-skew tolerance used by `Token::is_expired_default`.
pub const DEFAULT_EXPIRY_TOLERANCE_SECS: i64 = 60;

/// Access level requested when neither the caller nor the options pick one.
pub const FALLBACK_ACCESS_LEVEL: &str = "read";

/// Header carrying the integrator client id.
pub const CLIENT_ID_HEADER: &str = "X-Client-Id";

/// Header carrying the integrator secret key.
pub const SECRET_KEY_HEADER: &str = "X-Secret-Key";

/// Environment variable that overrides the configured secret key.
pub const SECRET_KEY_ENV: &str = "SIEG_SECRET_KEY";
