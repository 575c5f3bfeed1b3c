//! # stts-auth
//!
//! Bearer-token handling for STTS.
//!
//! Decodes the token payload, flattens the permission claim, and turns the
//! result into an [`Actor`](stts_core::identity::Actor). Signatures are not
//! checked here, so the actor is only a claim: callers that authorize with it
//! must confirm the subject against stored accounts first
//! (`SttsService::confirm_token_actor`).

pub mod claims;
pub mod error;
pub mod token;

pub use claims::SttsClaims;
pub use error::AuthError;
pub use token::{claims_from_token, decode_expiry, permissions_from_token};

use stts_core::identity::Actor;

/// Resolve a token into the actor it claims, refusing tokens within
/// `buffer_secs` of expiry.
///
/// # Errors
///
/// Returns `AuthError::NotAuthenticated` for an empty token,
/// `AuthError::TokenExpired` for near-expiry tokens, and decoding errors otherwise.
pub fn actor_from_token(token: &str, buffer_secs: i64) -> Result<Actor, AuthError> {
    if token.trim().is_empty() {
        return Err(AuthError::NotAuthenticated);
    }
    let claims = claims_from_token(token)?;
    if claims.is_near_expiry(buffer_secs) {
        tracing::warn!(
            expires_at = %claims.expires_at,
            "auth token expires within {buffer_secs}s, issue a new one",
        );
        return Err(AuthError::TokenExpired(claims.expires_at));
    }
    tracing::debug!(user_id = %claims.user_id, permissions = claims.permissions.len(), "token accepted");
    Ok(claims.to_actor())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    fn make_token(exp: i64) -> String {
        let enc = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        format!(
            "{}.{}.{}",
            enc.encode(r#"{"alg":"HS256"}"#),
            enc.encode(format!(
                r#"{{"sub":"usr-1","exp":{exp},"permissions":[{{"can_inspect":true}}]}}"#
            )),
            enc.encode("sig")
        )
    }

    #[test]
    fn empty_token_is_not_authenticated() {
        assert!(matches!(
            actor_from_token("  ", 60),
            Err(AuthError::NotAuthenticated)
        ));
    }

    #[test]
    fn expired_token_is_refused() {
        let token = make_token(chrono::Utc::now().timestamp() - 10);
        assert!(matches!(
            actor_from_token(&token, 60),
            Err(AuthError::TokenExpired(_))
        ));
    }

    #[test]
    fn live_token_becomes_actor() {
        let token = make_token(chrono::Utc::now().timestamp() + 3600);
        let actor = actor_from_token(&token, 60).expect("live token");
        assert_eq!(actor.user_id, "usr-1");
        assert!(actor.has(stts_core::permissions::Permission::Inspect));
    }
}
