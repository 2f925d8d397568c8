//! Accounts kept entirely in the storage area.
//!
//! # Invariants
//! - Register checks for an existing name before inserting.
//! - Unknown names and wrong passwords are indistinguishable to callers.
//! - The active-user marker always names an existing account.

use crate::auth::encoding::{encode_password, verify_password};
use crate::auth::{AuthError, AuthProvider, AuthResult};
use crate::model::account::{Credentials, Session};
use crate::repo::account_repo::AccountRepository;
use log::{info, warn};

/// Auth provider over a local account repository.
pub struct LocalAuthProvider<R: AccountRepository> {
    repo: R,
    current: Option<Session>,
}

impl<R: AccountRepository> LocalAuthProvider<R> {
    /// Creates a provider with no active session; call
    /// [`AuthProvider::restore_session`] to pick up a previous one.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            current: None,
        }
    }

    fn activate(&mut self, username: &str) -> AuthResult<Session> {
        self.repo.set_current_user(username)?;
        let session = Session::local(username);
        self.current = Some(session.clone());
        Ok(session)
    }
}

impl<R: AccountRepository> AuthProvider for LocalAuthProvider<R> {
    fn restore_session(&mut self) -> AuthResult<Option<Session>> {
        let Some(username) = self.repo.current_user()? else {
            self.current = None;
            return Ok(None);
        };

        if !self.repo.account_exists(&username)? {
            warn!("event=session_restore module=auth backend=local status=stale");
            self.repo.clear_current_user()?;
            self.current = None;
            return Ok(None);
        }

        info!("event=session_restore module=auth backend=local status=ok");
        let session = Session::local(username);
        self.current = Some(session.clone());
        Ok(Some(session))
    }

    fn current_session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    fn register(&mut self, credentials: &Credentials) -> AuthResult<Session> {
        let username = credentials.username();
        if self.repo.account_exists(username)? {
            info!("event=register module=auth backend=local status=rejected reason=exists");
            return Err(AuthError::AccountExists(username.to_string()));
        }

        self.repo
            .insert_account(username, &encode_password(credentials.password()))?;
        info!("event=register module=auth backend=local status=ok");
        self.activate(username)
    }

    fn login(&mut self, credentials: &Credentials) -> AuthResult<Session> {
        let username = credentials.username();
        let Some(stored) = self.repo.encoded_password(username)? else {
            info!("event=login module=auth backend=local status=rejected reason=unknown_user");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(credentials.password(), &stored) {
            info!("event=login module=auth backend=local status=rejected reason=bad_password");
            return Err(AuthError::InvalidCredentials);
        }

        info!("event=login module=auth backend=local status=ok");
        self.activate(username)
    }

    fn logout(&mut self) -> AuthResult<()> {
        self.repo.clear_current_user()?;
        self.current = None;
        info!("event=logout module=auth backend=local status=ok");
        Ok(())
    }
}
