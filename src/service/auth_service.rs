use crate::repo::refresh_tokens_repo::RefreshTokensRepo;
use crate::repo::users_repo::{UserRecord, UsersRepo};
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{Duration, Utc};
use constant_time_eq::constant_time_eq;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("email is already registered")]
    EmailTaken,
    #[error("invalid or expired refresh token")]
    InvalidRefreshToken,
    #[error("invalid token")]
    InvalidToken,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct AuthService {
    pub users_repo: UsersRepo,
    pub refresh_tokens_repo: RefreshTokensRepo,
    pub jwt_secret: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_days: i64,
}

impl AuthService {
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, AuthError> {
        let digest = hash_password(password);
        match self.users_repo.create(name, email, &digest, "customer").await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "user registered");
                Ok(user)
            }
            Err(err) if is_unique_violation(&err) => Err(AuthError::EmailTaken),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(UserRecord, TokenPair), AuthError> {
        let user = self
            .users_repo
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_digest) {
            return Err(AuthError::InvalidCredentials);
        }

        let pair = self.issue_pair(&user).await?;
        Ok((user, pair))
    }

    /// Rotation: the presented token is consumed before validation, so it
    /// can never be used twice even when the rotation itself fails.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let record = self
            .refresh_tokens_repo
            .take(&token_digest(refresh_token))
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        if record.expires_at < Utc::now() {
            return Err(AuthError::InvalidRefreshToken);
        }

        let user = self
            .users_repo
            .fetch(record.user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        self.issue_pair(&user).await
    }

    pub async fn issue_pair(&self, user: &UserRecord) -> Result<TokenPair, AuthError> {
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role.clone(),
            exp: (Utc::now() + Duration::seconds(self.access_token_ttl_secs)).timestamp() as usize,
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(e.into()))?;

        let mut raw = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut raw);
        let refresh_token = URL_SAFE_NO_PAD.encode(raw);

        self.refresh_tokens_repo
            .insert(
                &token_digest(&refresh_token),
                user.id,
                Utc::now() + Duration::days(self.refresh_token_ttl_days),
            )
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    pub fn verify_access(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AuthError::InvalidToken)?;

        Ok(data.claims)
    }
}

/// `base64(salt)$base64(sha256(salt || password))`. The salt is per-user
/// random; comparison is constant-time.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = salted_digest(&salt, password);
    format!("{}${}", STANDARD.encode(salt), STANDARD.encode(digest))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_b64, digest_b64)) = stored.split_once('$') else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (STANDARD.decode(salt_b64), STANDARD.decode(digest_b64)) else {
        return false;
    };
    let actual = salted_digest(&salt, password);
    constant_time_eq(&actual, &expected)
}

fn salted_digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

/// Refresh tokens are stored only as digests; a leaked table does not
/// leak usable tokens.
fn token_digest(token: &str) -> String {
    STANDARD.encode(Sha256::digest(token.as_bytes()))
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23505")
    )
}
