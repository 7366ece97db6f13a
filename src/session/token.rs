//! Session token issuance.

use uuid::Uuid;

/// Cookie that carries the session token between requests.
pub const SESSION_COOKIE: &str = "session_id";

/// Cookie lifetime. Expiry is tracked by the client; the server never
/// expires tokens actively.
pub const SESSION_MAX_AGE_SECS: i64 = 3600;

/// Return the presented token, or mint a new one if absent.
///
/// The second element is true when the token was newly minted and must be
/// attached to the outgoing response. UUIDv4 gives 122 bits of CSPRNG
/// entropy, which is what makes the token unguessable.
pub fn ensure_token(existing: Option<&str>) -> (String, bool) {
    match existing {
        Some(token) if !token.is_empty() => (token.to_string(), false),
        _ => (Uuid::new_v4().to_string(), true),
    }
}
