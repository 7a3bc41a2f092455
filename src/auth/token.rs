use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::JwtConfig;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    #[serde(alias = "Access")]
    Access,
    #[serde(alias = "Refresh")]
    Refresh,
}

/// Claims of tokens minted by the identity service. Only the fields this
/// service checks are read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
    pub kind: TokenKind,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid or expired token")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    #[error("access token required")]
    NotAccess,
}

/// Verifies signature, expiry, issuer and audience; returns the user id of
/// an access token.
pub fn verify_access(cfg: &JwtConfig, token: &str) -> Result<Uuid, TokenError> {
    let mut validation = Validation::default();
    validation.set_audience(std::slice::from_ref(&cfg.audience));
    validation.set_issuer(std::slice::from_ref(&cfg.issuer));
    let key = DecodingKey::from_secret(cfg.secret.as_bytes());

    let claims = decode::<Claims>(token, &key, &validation)?.claims;
    if claims.kind != TokenKind::Access {
        return Err(TokenError::NotAccess);
    }
    Ok(claims.sub)
}
