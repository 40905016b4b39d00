// Authorization gateway consulted by the HTTP layer before every protected read.
// How sessions are minted is outside this crate; it only checks what arrives.

use axum::http::{HeaderMap, header};
use std::sync::Arc;

/// Cookie carrying the console token.
pub const AUTH_COOKIE: &str = "hoststat_auth";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied,
}

pub trait Authorizer: Send + Sync {
    fn authorize(&self, headers: &HeaderMap) -> Access;
}

/// No token configured.
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn authorize(&self, _headers: &HeaderMap) -> Access {
        Access::Allowed
    }
}

/// Accepts `Authorization: Bearer <token>` or the `hoststat_auth` cookie.
pub struct TokenAuthorizer {
    token: String,
}

impl TokenAuthorizer {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Authorizer for TokenAuthorizer {
    fn authorize(&self, headers: &HeaderMap) -> Access {
        let presented = bearer_token(headers).or_else(|| cookie_token(headers));
        match presented {
            Some(t) if constant_time_eq(t.as_bytes(), self.token.as_bytes()) => Access::Allowed,
            _ => Access::Denied,
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
}

fn cookie_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE)
        .map(|(_, value)| value)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// `TokenAuthorizer` when a token is configured, otherwise `AllowAll`.
pub fn from_token(token: Option<&str>) -> Arc<dyn Authorizer> {
    match token {
        Some(t) => Arc::new(TokenAuthorizer::new(t)),
        None => Arc::new(AllowAll),
    }
}
