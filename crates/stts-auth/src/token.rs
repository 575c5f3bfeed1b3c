//! Bearer-token payload decoding.
//!
//! Tokens are three dot-separated base64url segments. Only the middle
//! (payload) segment is read.

use std::collections::BTreeMap;

use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::claims::SttsClaims;
use crate::error::AuthError;

/// Decode the JSON payload segment of a token.
///
/// # Errors
///
/// Returns `AuthError::Malformed` if the token does not have three segments or
/// the payload is not base64url-encoded JSON.
pub fn decode_payload(token: &str) -> Result<Value, AuthError> {
    let parts: Vec<&str> = token.trim().split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::Malformed("expected three segments".into()));
    }
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| AuthError::Malformed(format!("base64 decode failed: {e}")))?;
    serde_json::from_slice(&payload)
        .map_err(|e| AuthError::Malformed(format!("JSON parse failed: {e}")))
}

/// Flatten the `permissions` claim into a name -> granted map.
///
/// The claim is a list of single- or multi-key objects
/// (`[{"can_apply": true}, {"can_trade": false}]`). A plain object is accepted
/// too. Falsy entries are dropped. Malformed tokens yield an empty map.
#[must_use]
pub fn permissions_from_token(token: &str) -> BTreeMap<String, bool> {
    match decode_payload(token) {
        Ok(payload) => flatten_permissions(&payload["permissions"]),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring malformed token");
            BTreeMap::new()
        }
    }
}

/// Read `sub`, `exp` and `permissions` from a token.
///
/// # Errors
///
/// Returns `AuthError::Malformed` for undecodable tokens and
/// `AuthError::MissingClaim` when `sub` or `exp` is absent.
pub fn claims_from_token(token: &str) -> Result<SttsClaims, AuthError> {
    let payload = decode_payload(token)?;
    let user_id = payload["sub"]
        .as_str()
        .filter(|s| !s.is_empty())
        .ok_or(AuthError::MissingClaim("sub"))?
        .to_string();
    let expires_at = expiry_from_payload(&payload)?;

    Ok(SttsClaims {
        raw_token: token.trim().to_string(),
        user_id,
        permissions: flatten_permissions(&payload["permissions"]),
        expires_at,
    })
}

/// Decode the `exp` claim without anything else (for quick expiry checks).
///
/// # Errors
///
/// Returns `AuthError` if the token is malformed or `exp` is missing.
pub fn decode_expiry(token: &str) -> Result<DateTime<Utc>, AuthError> {
    expiry_from_payload(&decode_payload(token)?)
}

fn expiry_from_payload(payload: &Value) -> Result<DateTime<Utc>, AuthError> {
    let exp = payload["exp"]
        .as_i64()
        .ok_or(AuthError::MissingClaim("exp"))?;
    DateTime::from_timestamp(exp, 0)
        .ok_or_else(|| AuthError::Malformed(format!("invalid exp timestamp {exp}")))
}

fn flatten_permissions(claim: &Value) -> BTreeMap<String, bool> {
    let objects: Vec<&serde_json::Map<String, Value>> = match claim {
        Value::Array(items) => items.iter().filter_map(Value::as_object).collect(),
        Value::Object(map) => vec![map],
        _ => Vec::new(),
    };

    objects
        .into_iter()
        .flat_map(|map| map.iter())
        .filter(|(_, granted)| is_truthy(granted))
        .map(|(name, _)| (name.clone(), true))
        .collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(_) => true,
        Value::Null => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn make_token(payload: &str) -> String {
        let enc = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        format!(
            "{}.{}.{}",
            enc.encode(r#"{"alg":"HS256"}"#),
            enc.encode(payload),
            enc.encode("fake_sig")
        )
    }

    #[test]
    fn flattens_list_and_drops_falsy() {
        let token = make_token(
            r#"{"sub":"usr-1","exp":4102444800,"permissions":[{"can_apply":true},{"can_approve":false},{"can_trade":1,"can_inspect":0}]}"#,
        );
        let perms = permissions_from_token(&token);
        assert_eq!(
            perms.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["can_apply", "can_trade"]
        );
        assert!(perms.values().all(|v| *v));
    }

    #[test]
    fn accepts_plain_object_claim() {
        let token = make_token(r#"{"permissions":{"can_print_labels":true,"can_trade":null}}"#);
        let perms = permissions_from_token(&token);
        assert_eq!(perms.len(), 1);
        assert!(perms.contains_key("can_print_labels"));
    }

    #[test]
    fn malformed_token_yields_empty_map() {
        assert!(permissions_from_token("not-a-token").is_empty());
        assert!(permissions_from_token("a.!!!.c").is_empty());
        assert!(permissions_from_token("").is_empty());
    }

    #[test]
    fn missing_claim_yields_empty_map() {
        let token = make_token(r#"{"sub":"usr-1"}"#);
        assert!(permissions_from_token(&token).is_empty());
    }

    #[test]
    fn claims_read_sub_and_exp() {
        let token = make_token(
            r#"{"sub":"usr-0000aaaa","exp":4102444800,"permissions":[{"can_apply":true}]}"#,
        );
        let claims = claims_from_token(&token).expect("valid token");
        assert_eq!(claims.user_id, "usr-0000aaaa");
        assert_eq!(claims.expires_at.timestamp(), 4_102_444_800);
        assert_eq!(claims.permissions.len(), 1);
        assert!(!claims.is_near_expiry(60));
    }

    #[test]
    fn claims_require_sub() {
        let token = make_token(r#"{"exp":4102444800}"#);
        let err = claims_from_token(&token).unwrap_err();
        assert!(matches!(err, AuthError::MissingClaim("sub")));
    }

    #[test]
    fn decode_expiry_missing_exp() {
        let token = make_token(r#"{"sub":"usr-1"}"#);
        let err = decode_expiry(&token).unwrap_err();
        assert!(err.to_string().contains("exp"));
    }

    #[test]
    fn decode_payload_rejects_two_segments() {
        let err = decode_payload("a.b").unwrap_err();
        assert!(err.to_string().contains("three segments"));
    }
}
