// src/services/session_service.rs

use std::{collections::HashMap, sync::Arc};

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        permission::{PermissionSet, Subject},
        session::{Claims, SessionContext},
    },
};

/// App-scoped session contexts, keyed by session id.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionContext>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: SessionContext) {
        self.sessions.write().await.insert(session.id, session);
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionContext> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> Option<SessionContext> {
        self.sessions.write().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every session whose token has expired. Returns how many went away.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at > now);
        before - sessions.len()
    }
}

#[derive(Clone)]
pub struct SessionService {
    store: SessionStore,
    jwt_secret: String,
    ttl: Duration,
}

impl SessionService {
    pub fn new(store: SessionStore, jwt_secret: String, ttl: Duration) -> Self {
        Self { store, jwt_secret, ttl }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Login: keeps the subject and its permission snapshot and hands out a token.
    pub async fn open_session(
        &self,
        subject: Subject,
        permissions: PermissionSet,
    ) -> Result<(String, SessionContext), AppError> {
        let now = Utc::now();
        let session = SessionContext {
            id: Uuid::new_v4(),
            subject,
            permissions,
            opened_at: now,
            expires_at: now + self.ttl,
        };

        let token = self.create_token(&session)?;
        tracing::info!(
            "Session opened for '{}' ({} permission records, admin: {})",
            session.subject.username,
            session.permissions.len(),
            session.subject.is_admin()
        );
        self.store.insert(session.clone()).await;

        Ok((token, session))
    }

    /// Resolves a bearer token to its live session. Expired tokens also remove
    /// the session they point to.
    pub async fn resolve(&self, token: &str) -> Result<SessionContext, AppError> {
        let claims = self.decode_claims(token)?;

        if claims.exp <= Utc::now().timestamp() as usize {
            if self.store.remove(claims.sub).await.is_some() {
                tracing::info!("Session {} expired and was cleared", claims.sub);
            }
            return Err(AppError::InvalidToken);
        }

        self.store.get(claims.sub).await.ok_or(AppError::SessionNotFound)
    }

    /// Logout. Closing an unknown or already closed session is not an error.
    pub async fn close(&self, session_id: Uuid) {
        if let Some(session) = self.store.remove(session_id).await {
            tracing::info!("Session closed for '{}'", session.subject.username);
        }
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, AppError> {
        // Expiry is checked by hand so that an expired token can still clear its session
        let mut validation = Validation::default();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
    }

    fn create_token(&self, session: &SessionContext) -> Result<String, AppError> {
        let claims = Claims {
            sub: session.id,
            exp: session.expires_at.timestamp() as usize,
            iat: session.opened_at.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::permission::PermissionRecord;

    fn service(ttl: Duration) -> SessionService {
        SessionService::new(SessionStore::new(), "test-secret".into(), ttl)
    }

    fn subject() -> Subject {
        Subject { username: "fkhan".into(), name: "Fatima Khan".into(), ..Default::default() }
    }

    #[tokio::test]
    async fn open_then_resolve_returns_the_snapshot() {
        let service = service(Duration::hours(1));
        let permissions = PermissionSet::new().with("hrm_employees", PermissionRecord::view_only());
        let (token, opened) = service.open_session(subject(), permissions.clone()).await.unwrap();

        let resolved = service.resolve(&token).await.unwrap();
        assert_eq!(resolved.id, opened.id);
        assert_eq!(resolved.permissions, permissions);
    }

    #[tokio::test]
    async fn close_clears_the_session() {
        let service = service(Duration::hours(1));
        let (token, session) = service.open_session(subject(), PermissionSet::new()).await.unwrap();

        service.close(session.id).await;
        service.close(session.id).await;
        assert!(matches!(service.resolve(&token).await, Err(AppError::SessionNotFound)));
    }

    #[tokio::test]
    async fn expired_token_is_rejected_and_clears_the_session() {
        let service = service(Duration::seconds(-5));
        let (token, _) = service.open_session(subject(), PermissionSet::new()).await.unwrap();
        assert_eq!(service.store().len().await, 1);

        assert!(matches!(service.resolve(&token).await, Err(AppError::InvalidToken)));
        assert_eq!(service.store().len().await, 0);
    }

    #[tokio::test]
    async fn tokens_signed_elsewhere_are_rejected() {
        let ours = service(Duration::hours(1));
        let theirs = SessionService::new(SessionStore::new(), "other-secret".into(), Duration::hours(1));
        let (token, _) = theirs.open_session(subject(), PermissionSet::new()).await.unwrap();

        assert!(matches!(ours.resolve(&token).await, Err(AppError::InvalidToken)));
        assert!(matches!(ours.resolve("garbage").await, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn purge_drops_only_expired_sessions() {
        let store = SessionStore::new();
        let live = SessionService::new(store.clone(), "s".into(), Duration::hours(1));
        let dead = SessionService::new(store.clone(), "s".into(), Duration::seconds(-1));
        live.open_session(subject(), PermissionSet::new()).await.unwrap();
        dead.open_session(subject(), PermissionSet::new()).await.unwrap();

        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.len().await, 1);
    }
}
