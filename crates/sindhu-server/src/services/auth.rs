//! Admin authentication service
//!
//! Passwords are stored as argon2 hashes through the catalog's user store;
//! sessions are stateless HS256 JWTs whose subject is the user id.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sindhu_core::{CatalogError, CatalogStore, NewUser, User};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Access token lifetime
const TOKEN_TTL_HOURS: i64 = 12;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

pub struct AuthService {
    store: Arc<dyn CatalogStore>,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(store: Arc<dyn CatalogStore>, jwt_secret: String) -> Self {
        Self { store, jwt_secret }
    }

    /// Create a user with a freshly hashed password
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let password_hash = hash_password(password)?;
        let user = self
            .store
            .create_user(NewUser {
                username: username.to_string(),
                password: password_hash,
            })
            .await?;
        Ok(user)
    }

    /// Create the configured admin account unless it already exists
    pub async fn ensure_user(&self, username: &str, password: &str) -> Result<User, AuthError> {
        if let Some(user) = self.store.get_user_by_username(username).await? {
            return Ok(user);
        }
        let user = self.register(username, password).await?;
        info!("Created admin account '{}'", username);
        Ok(user)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthTokens, AuthError> {
        let Some(user) = self.store.get_user_by_username(username).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        let parsed_hash =
            PasswordHash::new(&user.password).map_err(|e| AuthError::Hashing(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        self.generate_token(&user)
    }

    /// Resolve a token to the user id it was issued for
    pub fn validate_token(&self, token: &str) -> Result<i64, AuthError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        token_data
            .claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken("subject is not a user id".to_string()))
    }

    /// Look up the user behind a token
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let user_id = self.validate_token(token)?;
        self.store
            .get_user(user_id)
            .await?
            .ok_or_else(|| AuthError::InvalidToken("user no longer exists".to_string()))
    }

    fn generate_token(&self, user: &User) -> Result<AuthTokens, AuthError> {
        let now = Utc::now();
        let expires_in = Duration::hours(TOKEN_TTL_HOURS);
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            exp: (now + expires_in).timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(AuthTokens {
            access_token,
            expires_in: expires_in.num_seconds(),
        })
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user id
    username: String,
    exp: i64,
    iat: i64,
}

#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub access_token: String,
    pub expires_in: i64,
}
