//! Authentication service for sign-up, sign-in and session tracking
//!
//! Access tokens are HS256 JWTs that name a stored session. Signing out
//! revokes the session, so a token stops working before it expires.

use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;
use validator::Validate;

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult, StoreResultExt};
use crate::store::{Session, Store, UserAccount};

/// Session change notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    SignedIn { user_id: Uuid, session_id: Uuid },
    SignedOut { user_id: Uuid, session_id: Uuid },
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    jwt_secret: String,
    access_token_expiry: i64,
    events: broadcast::Sender<SessionEvent>,
}

/// Input for creating an account
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUpInput {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub full_name: Option<String>,
}

/// Input for signing in
#[derive(Debug, Deserialize)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub sid: String, // Session ID
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Signed-in user as returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
}

/// Tokens and user returned after signing in
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
    pub user: UserInfo,
}

/// The authenticated actor behind a request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSession {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn Store>,
        config: &JwtConfig,
        events: broadcast::Sender<SessionEvent>,
    ) -> Self {
        Self {
            store,
            jwt_secret: config.secret.clone(),
            access_token_expiry: config.access_token_expiry,
            events,
        }
    }

    /// Create an account and sign it in
    pub async fn sign_up(&self, input: SignUpInput) -> AppResult<AuthSession> {
        input.validate()?;

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = UserAccount {
            id: Uuid::new_v4(),
            email: input.email.trim().to_string(),
            password_hash,
            full_name: input
                .full_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
            created_at: Utc::now(),
        };
        self.store.insert_user(&user).await.during("insert user")?;

        tracing::info!(user_id = %user.id, "User signed up");
        self.open_session(&user).await
    }

    /// Authenticate with email and password
    pub async fn sign_in(&self, input: SignInInput) -> AppResult<AuthSession> {
        let user = self
            .store
            .find_user_by_email(input.email.trim())
            .await
            .during("find user")?
            .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(&input.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        self.open_session(&user).await
    }

    /// Revoke the session; signing out twice is harmless
    pub async fn sign_out(&self, session: &CurrentSession) -> AppResult<()> {
        let revoked = self
            .store
            .revoke_session(session.session_id, Utc::now())
            .await
            .during("revoke session")?;

        if revoked {
            tracing::info!(user_id = %session.user_id, session_id = %session.session_id, "User signed out");
            self.events
                .send(SessionEvent::SignedOut {
                    user_id: session.user_id,
                    session_id: session.session_id,
                })
                .ok();
        }
        Ok(())
    }

    /// Resolve an access token to its live session
    pub async fn get_session(&self, token: &str) -> AppResult<CurrentSession> {
        let claims = self.validate_token(token)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid user ID in token".to_string()))?;
        let session_id = Uuid::parse_str(&claims.sid)
            .map_err(|_| AppError::Unauthorized("Invalid session ID in token".to_string()))?;

        let session = self
            .store
            .get_session(session_id)
            .await
            .during("get session")?
            .filter(|session| session.user_id == user_id && session.is_live(Utc::now()))
            .ok_or_else(|| AppError::Unauthorized("Session expired or signed out".to_string()))?;

        Ok(CurrentSession {
            user_id,
            session_id,
            email: claims.email,
            expires_at: session.expires_at,
        })
    }

    /// Receive sign-in and sign-out notifications
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Validate access token and return claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
    }

    async fn open_session(&self, user: &UserAccount) -> AppResult<AuthSession> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.access_token_expiry);
        let session = Session {
            id: Uuid::new_v4(),
            user_id: user.id,
            created_at: now,
            expires_at,
            revoked_at: None,
        };

        let claims = Claims {
            sub: user.id.to_string(),
            sid: session.id.to_string(),
            email: user.email.clone(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };
        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        self.store
            .insert_session(&session)
            .await
            .during("insert session")?;

        tracing::info!(user_id = %user.id, session_id = %session.id, "User signed in");
        self.events
            .send(SessionEvent::SignedIn {
                user_id: user.id,
                session_id: session.id,
            })
            .ok();

        Ok(AuthSession {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
            expires_at,
            user: UserInfo {
                id: user.id,
                email: user.email.clone(),
                full_name: user.full_name.clone(),
            },
        })
    }
}
