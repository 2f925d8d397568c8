//! Accounts managed by a hosted backend-as-a-service.
//!
//! # Responsibility
//! - Delegate sign-up, sign-in, sign-out and token validation to an
//!   [`IdentityBackend`].
//! - Mirror every authenticated user into the backend's user table.
//! - Persist the backend session in the storage area so it survives restarts.
//!
//! # Invariants
//! - Usernames are email addresses.
//! - A user record is inserted only after checking it does not exist.
//! - Logout clears the local session even when the backend call fails.

use crate::auth::{AuthProvider, AuthResult};
use crate::model::account::{Credentials, Session};
use crate::repo::RepoError;
use crate::storage::{KeyValueStore, HOSTED_SESSION_KEY};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// User as known to the hosted auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedUser {
    pub id: String,
    pub email: String,
}

/// Authenticated session issued by the hosted auth service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedSession {
    pub access_token: String,
    pub user: HostedUser,
}

impl std::fmt::Debug for HostedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedSession")
            .field("access_token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

impl HostedSession {
    fn to_session(&self) -> Session {
        Session {
            user_id: self.user.id.clone(),
            username: self.user.email.clone(),
        }
    }
}

/// External authentication service.
pub trait IdentityBackend {
    fn sign_up(&self, email: &str, password: &str) -> AuthResult<HostedSession>;
    fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<HostedSession>;
    fn sign_out(&self, access_token: &str) -> AuthResult<()>;
    /// Resolves a token to its user; `None` when the token is rejected.
    fn get_user(&self, access_token: &str) -> AuthResult<Option<HostedUser>>;
}

/// External table mirroring authenticated users.
pub trait UserDirectory {
    fn user_record_exists(&self, access_token: &str, user_id: &str) -> AuthResult<bool>;
    fn insert_user_record(&self, access_token: &str, user: &HostedUser) -> AuthResult<()>;
}

/// Auth provider delegating to a hosted backend.
pub struct HostedAuthProvider<B, S>
where
    B: IdentityBackend + UserDirectory,
    S: KeyValueStore,
{
    backend: B,
    store: S,
    current: Option<HostedSession>,
    session: Option<Session>,
}

impl<B, S> HostedAuthProvider<B, S>
where
    B: IdentityBackend + UserDirectory,
    S: KeyValueStore,
{
    pub fn new(backend: B, store: S) -> Self {
        Self {
            backend,
            store,
            current: None,
            session: None,
        }
    }

    fn mirror_user(&self, hosted: &HostedSession) -> AuthResult<()> {
        if self
            .backend
            .user_record_exists(&hosted.access_token, &hosted.user.id)?
        {
            return Ok(());
        }
        self.backend
            .insert_user_record(&hosted.access_token, &hosted.user)?;
        info!("event=user_mirror module=auth backend=hosted status=inserted");
        Ok(())
    }

    fn activate(&mut self, hosted: HostedSession) -> AuthResult<Session> {
        self.mirror_user(&hosted)?;
        let encoded = serde_json::to_string(&hosted).map_err(RepoError::from)?;
        self.store.set_item(HOSTED_SESSION_KEY, &encoded)?;
        let session = hosted.to_session();
        self.current = Some(hosted);
        self.session = Some(session.clone());
        Ok(session)
    }

    fn forget(&mut self) -> AuthResult<()> {
        self.store.remove_item(HOSTED_SESSION_KEY)?;
        self.current = None;
        self.session = None;
        Ok(())
    }

    fn stored_session(&self) -> AuthResult<Option<HostedSession>> {
        let Some(raw) = self.store.get_item(HOSTED_SESSION_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(hosted) => Ok(Some(hosted)),
            Err(err) => {
                warn!("event=session_restore module=auth backend=hosted status=corrupt error={err}");
                Ok(None)
            }
        }
    }
}

impl<B, S> AuthProvider for HostedAuthProvider<B, S>
where
    B: IdentityBackend + UserDirectory,
    S: KeyValueStore,
{
    fn restore_session(&mut self) -> AuthResult<Option<Session>> {
        let Some(stored) = self.stored_session()? else {
            self.forget()?;
            return Ok(None);
        };

        match self.backend.get_user(&stored.access_token)? {
            Some(user) => {
                info!("event=session_restore module=auth backend=hosted status=ok");
                let refreshed = HostedSession {
                    access_token: stored.access_token,
                    user,
                };
                let session = refreshed.to_session();
                self.current = Some(refreshed);
                self.session = Some(session.clone());
                Ok(Some(session))
            }
            None => {
                warn!("event=session_restore module=auth backend=hosted status=expired");
                self.forget()?;
                Ok(None)
            }
        }
    }

    fn current_session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn register(&mut self, credentials: &Credentials) -> AuthResult<Session> {
        let email = credentials.require_email()?;
        let hosted = self.backend.sign_up(email, credentials.password())?;
        info!("event=register module=auth backend=hosted status=ok");
        self.activate(hosted)
    }

    fn login(&mut self, credentials: &Credentials) -> AuthResult<Session> {
        let email = credentials.require_email()?;
        let hosted = self
            .backend
            .sign_in_with_password(email, credentials.password())?;
        info!("event=login module=auth backend=hosted status=ok");
        self.activate(hosted)
    }

    fn logout(&mut self) -> AuthResult<()> {
        let token = match self.current.as_ref() {
            Some(hosted) => Some(hosted.access_token.clone()),
            None => self.stored_session()?.map(|hosted| hosted.access_token),
        };
        if let Some(token) = token {
            if let Err(err) = self.backend.sign_out(&token) {
                warn!("event=logout module=auth backend=hosted status=remote_failed error={err}");
            }
        }
        self.forget()?;
        info!("event=logout module=auth backend=hosted status=ok");
        Ok(())
    }
}
