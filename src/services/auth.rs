use crate::error::ApiError;
use crate::models::{Role, User, UserSummary};
use crate::routes::AppState;
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors from password hashing and token handling
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Invalid access token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Missing access token")]
    MissingToken,

    #[error("Access token belongs to no existing account")]
    UnknownUser,
}

/// Hash a password with Argon2id and a fresh random salt
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Check a password against a stored PHC hash string
///
/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash could not be parsed: {}", e);
            false
        }
    }
}

/// [`hash_password`] on the blocking thread pool
///
/// Keeps Argon2 off the async worker threads.
pub async fn hash_password_off_thread(password: String) -> Result<String, AuthError> {
    web::block(move || hash_password(&password))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
}

/// [`verify_password`] on the blocking thread pool
pub async fn verify_password_off_thread(password: String, stored_hash: String) -> Result<bool, AuthError> {
    web::block(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Access token claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 access tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: chrono::Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: chrono::Duration::hours(ttl_hours),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

/// Pull the token out of an `Authorization` header value
///
/// Accepts both `Bearer <token>` (scheme in any case) and a bare token.
pub fn token_from_header(value: &str) -> Option<&str> {
    let mut parts = value.split_whitespace();
    let first = parts.next()?;

    let token = if first.eq_ignore_ascii_case("bearer") {
        parts.next()?
    } else {
        first
    };

    // "Bearer a b" and "a b" are not tokens
    parts.next().is_none().then_some(token)
}

/// The authenticated caller
///
/// Resolved from the access token and then checked against the live
/// account, so a token whose user was deleted stops working at once.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub preferences: Vec<String>,
}

impl AuthUser {
    /// Reject the request unless the caller is `user_id`
    pub fn ensure_self(&self, user_id: Uuid) -> Result<(), ApiError> {
        if self.id == user_id {
            Ok(())
        } else {
            Err(ApiError::Forbidden("You can only modify your own account".to_string()))
        }
    }

    /// Build the caller from the account the token points at
    pub fn resolve(account: Option<UserSummary>) -> Result<Self, AuthError> {
        let summary = account.ok_or(AuthError::UnknownUser)?;
        Ok(Self {
            id: summary.id,
            username: summary.username,
            role: summary.role,
            preferences: summary.preferences,
        })
    }
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { authenticate(&req).await })
    }
}

async fn authenticate(req: &HttpRequest) -> Result<AuthUser, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| ApiError::Internal("application state not configured".to_string()))?;

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(token_from_header)
        .ok_or(AuthError::MissingToken)?;

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::debug!("Rejected access token on {}: {}", req.path(), e);
        e
    })?;

    let account = state.find_summary(claims.sub).await?;
    AuthUser::resolve(account).map_err(|e| {
        tracing::info!("Access token for removed account {} used on {}", claims.sub, req.path());
        e.into()
    })
}
