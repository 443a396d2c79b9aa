//! Best-effort guess of who is using the page.
//!
//! The session JWT is decoded without verifying its signature. The result
//! only tailors assistant wording and must never gate access.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use termin_types::UserType;

const TOKEN_COOKIE: &str = "access_token_cookie";

#[derive(Deserialize)]
struct Claims {
    sub: Subject,
}

#[derive(Deserialize)]
struct Subject {
    #[serde(rename = "type")]
    kind: String,
}

/// Reads the user type from the `access_token_cookie` in a `Cookie` header.
/// Anything missing or malformed yields [`UserType::Guest`].
pub fn detect_user_type(cookie_header: &str) -> UserType {
    let Some(token) = cookie_header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == TOKEN_COOKIE).then_some(value)
    }) else {
        return UserType::Guest;
    };

    let user_type = decode_claims(token)
        .map(|claims| UserType::from_claim(&claims.sub.kind))
        .unwrap_or_default();
    tracing::debug!(user_type = user_type.label(), "detected user type");
    user_type
}

fn decode_claims(token: &str) -> Option<Claims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(payload: &str) -> String {
        format!(
            "eyJhbGciOiJIUzI1NiJ9.{}.signature",
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn reads_subject_type() {
        let header = format!(
            "theme=dark; access_token_cookie={}; lang=de",
            token(r#"{"sub":{"id":7,"type":"doctor"}}"#)
        );
        assert_eq!(detect_user_type(&header), UserType::Doctor);
    }

    #[test]
    fn guest_when_missing_or_malformed() {
        assert_eq!(detect_user_type(""), UserType::Guest);
        assert_eq!(detect_user_type("theme=dark"), UserType::Guest);
        assert_eq!(detect_user_type("access_token_cookie=garbage"), UserType::Guest);
        assert_eq!(
            detect_user_type(&format!("access_token_cookie={}", token(r#"{"sub":"7"}"#))),
            UserType::Guest
        );
        assert_eq!(
            detect_user_type(&format!(
                "access_token_cookie={}",
                token(r#"{"sub":{"type":"superuser"}}"#)
            )),
            UserType::Guest
        );
    }
}
