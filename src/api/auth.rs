//! Resolución de identidad del llamador.
//!
//! El handler sólo necesita saber *quién* llama; cómo se resuelve queda
//! detrás de `IdentityResolver`. La implementación por defecto compara el
//! SHA-256 de un bearer token contra los digests configurados.
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use sha2::{Digest, Sha256};

use super::state::AppState;
use crate::config::ApiToken;
use crate::errors::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: String,
}

#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, headers: &HeaderMap) -> Option<Caller>;
}

#[derive(Debug, Clone, Default)]
pub struct TokenIdentityResolver {
    tokens: Vec<ApiToken>,
}

impl TokenIdentityResolver {
    pub fn new(tokens: Vec<ApiToken>) -> Self {
        Self { tokens }
    }

    /// Registra un token en claro (tests y desarrollo local).
    pub fn with_plain_token(mut self, caller_id: &str, token: &str) -> Self {
        self.tokens.push(ApiToken { caller_id: caller_id.to_string(),
                                    sha256: Sha256::digest(token.as_bytes()).into() });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[async_trait]
impl IdentityResolver for TokenIdentityResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Option<Caller> {
        let token = bearer_token(headers)?;
        let digest: [u8; 32] = Sha256::digest(token.as_bytes()).into();
        self.tokens
            .iter()
            .find(|t| t.sha256 == digest)
            .map(|t| Caller { id: t.caller_id.clone() })
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        state.identity.resolve(&parts.headers).await.ok_or(ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[tokio::test]
    async fn resolves_known_bearer_tokens_only() {
        let resolver = TokenIdentityResolver::default().with_plain_token("alice", "s3cret");
        assert_eq!(resolver.resolve(&headers("Bearer s3cret")).await,
                   Some(Caller { id: "alice".into() }));
        assert_eq!(resolver.resolve(&headers("bearer s3cret")).await.map(|c| c.id), Some("alice".into()));
        assert_eq!(resolver.resolve(&headers("Bearer wrong")).await, None);
        assert_eq!(resolver.resolve(&headers("Basic s3cret")).await, None);
        assert_eq!(resolver.resolve(&HeaderMap::new()).await, None);
    }
}
