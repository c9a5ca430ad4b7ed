//! Admin identity: login, bearer token verification, refresh and logout.
//!
//! [`StaticIdentity`] keeps accounts and sessions in process memory and
//! stores unsalted SHA-256 password digests. It suits development and
//! single-node deployments; anything larger plugs its own
//! [`IdentityProvider`] into the router state.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// Role required by every admin route.
pub const ADMIN_ROLE: &str = "admin";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    ExpiredToken,

    #[error("admin role required")]
    Forbidden,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// What a verified token says about its bearer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claims {
    pub email: String,
    pub role: String,
    pub user_id: u64,
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and checks bearer tokens.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<(Token, Claims), AuthError>;

    async fn verify(&self, token: &str) -> Result<Claims, AuthError>;

    /// Issues a fresh token for an already verified caller. The presented
    /// token stays valid until it expires or is revoked.
    async fn refresh(&self, claims: &Claims) -> Result<(Token, Claims), AuthError>;

    /// Invalidates `token`. Returns whether it was live.
    async fn revoke(&self, token: &str) -> bool;
}

// == Static Identity ==
#[derive(Debug, Clone)]
struct Account {
    user_id: u64,
    password_digest: String,
    role: String,
}

/// Fixed set of accounts with opaque random tokens held in memory.
#[derive(Debug)]
pub struct StaticIdentity {
    accounts: HashMap<String, Account>,
    sessions: RwLock<HashMap<String, Claims>>,
    token_ttl: Duration,
}

pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

impl Account {
    fn password_matches(&self, password: &str) -> bool {
        let presented = password_digest(password);
        self.password_digest
            .as_bytes()
            .ct_eq(presented.as_bytes())
            .into()
    }
}

impl StaticIdentity {
    pub fn new(token_ttl_hours: i64) -> Self {
        Self {
            accounts: HashMap::new(),
            sessions: RwLock::new(HashMap::new()),
            token_ttl: Duration::hours(token_ttl_hours.clamp(1, 24 * 365)),
        }
    }

    /// Adds an account. Emails are matched case-insensitively.
    pub fn with_account(mut self, email: &str, password: &str, role: &str) -> Self {
        let user_id = self.accounts.len() as u64 + 1;
        self.accounts.insert(
            email.trim().to_lowercase(),
            Account {
                user_id,
                password_digest: password_digest(password),
                role: role.to_string(),
            },
        );
        self
    }

    async fn issue(&self, email: String, account: &Account, now: DateTime<Utc>) -> (Token, Claims) {
        let expires_at = now + self.token_ttl;
        let access_token = Uuid::new_v4().simple().to_string();
        let claims = Claims {
            email,
            role: account.role.clone(),
            user_id: account.user_id,
            expires_at,
        };
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, live| live.expires_at > now);
        sessions.insert(access_token.clone(), claims.clone());
        drop(sessions);
        (
            Token {
                access_token,
                expires_at,
            },
            claims,
        )
    }

    #[cfg(test)]
    async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    #[cfg(test)]
    async fn expire_all(&self) {
        let past = Utc::now() - Duration::seconds(1);
        for claims in self.sessions.write().await.values_mut() {
            claims.expires_at = past;
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn authenticate(&self, credentials: &Credentials) -> Result<(Token, Claims), AuthError> {
        let email = credentials.email.trim().to_lowercase();
        let account = self
            .accounts
            .get(&email)
            .filter(|account| account.password_matches(&credentials.password))
            .ok_or(AuthError::InvalidCredentials)?;

        let issued = self.issue(email, account, Utc::now()).await;
        info!(user_id = account.user_id, "login succeeded");
        Ok(issued)
    }

    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self
            .sessions
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)?;

        if claims.expires_at <= Utc::now() {
            self.sessions.write().await.remove(token);
            debug!(user_id = claims.user_id, "dropped expired token");
            return Err(AuthError::ExpiredToken);
        }
        Ok(claims)
    }

    async fn refresh(&self, claims: &Claims) -> Result<(Token, Claims), AuthError> {
        let account = self
            .accounts
            .get(&claims.email)
            .ok_or(AuthError::InvalidToken)?;

        let issued = self.issue(claims.email.clone(), account, Utc::now()).await;
        debug!(user_id = account.user_id, "token refreshed");
        Ok(issued)
    }

    async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}
