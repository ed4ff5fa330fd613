use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Claims read from the access token payload. Only `exp` matters client-side.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Claims {
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub perfil: Option<String>,
}

/// Decode the payload (second segment) of a JWT without verifying it
pub fn decode_claims(token: &str) -> Result<Claims, String> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(format!("Token has {} segments, expected 3", parts.len()));
    }

    let payload = parts[1];
    let bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .or_else(|_| general_purpose::STANDARD.decode(payload))
        .map_err(|e| format!("Invalid token payload encoding: {}", e))?;

    serde_json::from_slice(&bytes).map_err(|e| format!("Invalid token payload: {}", e))
}

/// True when the token's `exp` is at or before `now`.
/// A token without `exp` never expires.
pub fn is_expired(claims: &Claims, now: DateTime<Utc>) -> bool {
    match claims.exp {
        Some(exp) => exp <= now.timestamp(),
        None => false,
    }
}

#[cfg(test)]
pub fn make_token(payload: &str) -> String {
    let header = general_purpose::URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let body = general_purpose::URL_SAFE_NO_PAD.encode(payload);
    format!("{}.{}.signature", header, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decode_exp() {
        let token = make_token(r#"{"exp": 1700000000, "perfil": "admin"}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.exp, Some(1_700_000_000));
        assert_eq!(claims.perfil.as_deref(), Some("admin"));
    }

    #[test]
    fn test_expiry_comparison() {
        let claims = Claims { exp: Some(1_700_000_000), perfil: None };
        let before = Utc.timestamp_opt(1_699_999_999, 0).unwrap();
        let after = Utc.timestamp_opt(1_700_000_001, 0).unwrap();
        assert!(!is_expired(&claims, before));
        assert!(is_expired(&claims, after));
    }

    #[test]
    fn test_far_future_expiry_is_valid() {
        let token = make_token(r#"{"exp": 9200000000000000000}"#);
        let claims = decode_claims(&token).unwrap();
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert!(!is_expired(&claims, now));

        let max = Claims { exp: Some(i64::MAX), perfil: None };
        assert!(!is_expired(&max, now));
        let min = Claims { exp: Some(i64::MIN), perfil: None };
        assert!(is_expired(&min, now));
    }

    #[test]
    fn test_malformed_tokens() {
        assert!(decode_claims("not-a-jwt").is_err());
        assert!(decode_claims("a.!!!.c").is_err());
        let not_json = format!("x.{}.y", general_purpose::URL_SAFE_NO_PAD.encode("hello"));
        assert!(decode_claims(&not_json).is_err());
    }

    #[test]
    fn test_padded_payload_is_accepted() {
        let body = general_purpose::STANDARD.encode(r#"{"exp": 5}"#);
        let token = format!("h.{}.s", body);
        assert_eq!(decode_claims(&token).unwrap().exp, Some(5));
    }
}
