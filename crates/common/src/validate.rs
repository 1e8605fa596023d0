//! Required-string checks

/// A required value was empty or whitespace-only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0} must not be blank")]
pub struct BlankError(pub String);

/// Return `value` unchanged, or `BlankError` naming `name` if it is blank.
pub fn require_non_blank<'a>(name: &str, value: &'a str) -> Result<&'a str, BlankError> {
    if value.trim().is_empty() {
        return Err(BlankError(name.to_string()));
    }
    Ok(value)
}
