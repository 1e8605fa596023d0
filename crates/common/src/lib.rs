//! Shared types for the SIEG integration workspace

mod error;
mod secret;
mod validate;

pub use error::{Error, Result};
pub use secret::Secret;
pub use validate::{BlankError, require_non_blank};
