//! Learner identity extraction. Account management lives elsewhere; this
//! only answers "which learner is this request for".
//!
//! Tokens arrive as a cookie or bearer header. With `JWT_SECRET` set they
//! are verified HS256 JWTs whose `sub` claim is the learner id; without
//! it the token itself is treated as an opaque learner id, which keeps
//! local development and the test suite free of key material.

use axum::http::{header, HeaderMap};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

const AUTH_COOKIE_NAME: &str = "auth_token";

#[derive(Debug, Clone)]
pub struct Learner {
    pub id: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing authentication token")]
    MissingToken,
    #[error("invalid authentication token")]
    InvalidToken,
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: Option<String>,
    exp: Option<i64>,
}

pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = get_cookie(headers, AUTH_COOKIE_NAME) {
        return Some(token);
    }

    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?;

    auth_header
        .strip_prefix("Bearer ")
        .map(|value| value.to_string())
}

pub fn learner_from_headers(headers: &HeaderMap) -> Result<Learner, AuthError> {
    let token = extract_token(headers).ok_or(AuthError::MissingToken)?;
    if token.trim().is_empty() {
        return Err(AuthError::MissingToken);
    }

    match std::env::var("JWT_SECRET").ok().filter(|s| !s.trim().is_empty()) {
        Some(secret) => {
            let claims = verify_jwt_hs256(&token, &secret)?;
            let sub = claims
                .sub
                .filter(|s| !s.trim().is_empty())
                .ok_or(AuthError::InvalidToken)?;
            Ok(Learner { id: sub })
        }
        None => Ok(Learner { id: token }),
    }
}

fn verify_jwt_hs256(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let mut parts = token.split('.');
    let header = parts.next().ok_or(AuthError::InvalidToken)?;
    let payload = parts.next().ok_or(AuthError::InvalidToken)?;
    let signature = parts.next().ok_or(AuthError::InvalidToken)?;
    if parts.next().is_some() {
        return Err(AuthError::InvalidToken);
    }

    let signature = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| AuthError::InvalidToken)?;

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|_| AuthError::InvalidToken)?;
    mac.update(header.as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| AuthError::InvalidToken)?;

    let payload = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| AuthError::InvalidToken)?;
    let claims: Claims = serde_json::from_slice(&payload).map_err(|_| AuthError::InvalidToken)?;

    if let Some(exp) = claims.exp {
        if exp <= chrono::Utc::now().timestamp() {
            return Err(AuthError::InvalidToken);
        }
    }

    Ok(claims)
}

fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    for pair in raw.split(';') {
        let mut iter = pair.trim().splitn(2, '=');
        if iter.next() == Some(name) {
            return iter.next().map(|value| value.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn sign_jwt(payload: &serde_json::Value, secret: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(body.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        format!("{header}.{body}.{signature}")
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(extract_token(&bearer("abc")).as_deref(), Some("abc"));
    }

    #[test]
    fn cookie_wins_over_header() {
        let mut headers = bearer("from-header");
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; auth_token=from-cookie"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn missing_token_is_rejected() {
        let headers = HeaderMap::new();
        assert!(matches!(
            learner_from_headers(&headers),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn valid_signature_yields_subject() {
        let token = sign_jwt(&serde_json::json!({ "sub": "learner-7" }), "topsecret");
        let claims = verify_jwt_hs256(&token, "topsecret").unwrap();
        assert_eq!(claims.sub.as_deref(), Some("learner-7"));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let token = sign_jwt(&serde_json::json!({ "sub": "learner-7" }), "topsecret");
        assert!(verify_jwt_hs256(&token, "othersecret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = sign_jwt(
            &serde_json::json!({ "sub": "learner-7", "exp": 1 }),
            "topsecret",
        );
        assert!(verify_jwt_hs256(&token, "topsecret").is_err());
    }
}
