//! Session lifecycle: token issuance and the token → agent registry.

mod registry;
mod token;

pub use registry::{RegistryError, SessionRegistry};
pub use token::{SESSION_COOKIE, SESSION_MAX_AGE_SECS, ensure_token};
