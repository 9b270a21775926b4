use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::JwtConfig, error::ApiError, state::AppState};

/// Token issuance lives in the external identity service; this module
/// only consumes the caller identity carried in the bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    pub iat: usize,
    pub iss: String,
    pub aud: String,
}

pub fn decode_token(cfg: &JwtConfig, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_audience(std::slice::from_ref(&cfg.audience));
    validation.set_issuer(std::slice::from_ref(&cfg.issuer));
    let decoding = DecodingKey::from_secret(cfg.secret.as_bytes());
    let data = decode::<Claims>(token, &decoding, &validation)?;
    Ok(data.claims)
}

/// Extracts and validates the JWT, returning the caller's user id.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::Auth("Missing Authorization header".into()))?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::Auth("Invalid auth scheme".into()))?;

        let claims = decode_token(&state.config.jwt, token).map_err(|_| {
            tracing::warn!("invalid or expired token");
            ApiError::Auth("Invalid or expired token".into())
        })?;

        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::{Duration, OffsetDateTime};

    fn test_config(secret: &str, issuer: &str, audience: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    fn sign(cfg: &JwtConfig, sub: Uuid, ttl: Duration) -> String {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub,
            iat: now.unix_timestamp() as usize,
            exp: (now + ttl).unix_timestamp() as usize,
            iss: cfg.issuer.clone(),
            aud: cfg.audience.clone(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(cfg.secret.as_bytes()),
        )
        .expect("sign token")
    }

    #[test]
    fn decodes_valid_token() {
        let cfg = test_config("dev-secret", "test-issuer", "test-aud");
        let user_id = Uuid::new_v4();
        let token = sign(&cfg, user_id, Duration::minutes(5));
        let claims = decode_token(&cfg, &token).expect("decode token");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
    }

    #[test]
    fn rejects_expired_token() {
        let cfg = test_config("dev-secret", "iss", "aud");
        let token = sign(&cfg, Uuid::new_v4(), Duration::minutes(-10));
        assert!(decode_token(&cfg, &token).is_err());
    }

    #[test]
    fn rejects_wrong_issuer_or_audience() {
        let good = test_config("same-secret", "good-iss", "good-aud");
        let bad = test_config("same-secret", "bad-iss", "bad-aud");
        let token = sign(&good, Uuid::new_v4(), Duration::minutes(5));
        assert!(decode_token(&bad, &token).is_err());
    }

    #[test]
    fn rejects_wrong_secret() {
        let good = test_config("secret-a", "iss", "aud");
        let bad = test_config("secret-b", "iss", "aud");
        let token = sign(&good, Uuid::new_v4(), Duration::minutes(5));
        assert!(decode_token(&bad, &token).is_err());
    }
}
