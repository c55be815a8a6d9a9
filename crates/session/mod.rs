//! Signed-in state, held explicitly per user instead of as ambient globals.

pub mod registry;

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::domain::value_objects::enums::user_roles::UserRole;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    SignedOut,
    SignedIn { user: SessionUser },
}

/// One user's session. Work started on the user's behalf hangs off
/// [`SessionContext::active_scope`] and is cancelled when they sign out.
pub struct SessionContext {
    state: watch::Sender<SessionState>,
    scope: Mutex<CancellationToken>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::SignedOut);
        Self {
            state,
            scope: Mutex::new(CancellationToken::new()),
        }
    }

    fn scope_guard(&self) -> MutexGuard<'_, CancellationToken> {
        self.scope.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn sign_in(&self, user: SessionUser) {
        let mut scope = self.scope_guard();
        if scope.is_cancelled() {
            *scope = CancellationToken::new();
        }
        info!(uid = %user.uid, role = %user.role, "session: signed in");
        self.state.send_replace(SessionState::SignedIn { user });
    }

    /// Cancels everything started under the current scope. The scope stays
    /// cancelled until the next sign-in.
    pub fn sign_out(&self) {
        let scope = self.scope_guard();
        scope.cancel();

        if let SessionState::SignedIn { user } = self.state.send_replace(SessionState::SignedOut) {
            info!(uid = %user.uid, "session: signed out");
        }
    }

    pub fn current(&self) -> Option<SessionUser> {
        match &*self.state.borrow() {
            SessionState::SignedIn { user } => Some(user.clone()),
            SessionState::SignedOut => None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// The scope new work should run under, or `None` once signed out.
    /// Checked under the same lock sign-out takes, so work started with the
    /// returned token is always cancelled by a later sign-out.
    pub fn active_scope(&self) -> Option<CancellationToken> {
        let scope = self.scope_guard();
        let signed_in = matches!(*self.state.borrow(), SessionState::SignedIn { .. });
        (signed_in && !scope.is_cancelled()).then(|| scope.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn user() -> SessionUser {
        SessionUser {
            uid: "uid-1".to_string(),
            name: "Otieno".to_string(),
            email: "otieno@luo.example".to_string(),
            role: UserRole::User,
        }
    }

    #[test]
    fn sign_out_cancels_the_scope() {
        let session = SessionContext::new();
        session.sign_in(user());
        let scope = session.active_scope().unwrap();

        session.sign_out();

        assert!(scope.is_cancelled());
        assert_eq!(session.current(), None);
        assert!(session.active_scope().is_none());

        session.sign_in(user());
        assert!(!session.active_scope().unwrap().is_cancelled());
    }

    #[test]
    fn signed_out_session_hands_out_no_scope() {
        let session = Arc::new(SessionContext::new());
        assert!(session.active_scope().is_none());

        session.sign_in(user());
        let racing = {
            let session = Arc::clone(&session);
            std::thread::spawn(move || session.sign_out())
        };
        let scope = session.active_scope();
        racing.join().unwrap();

        // Whichever side won, a scope handed out before sign-out is cancelled now.
        if let Some(scope) = scope {
            assert!(scope.is_cancelled());
        }
        assert!(session.active_scope().is_none());
    }

    #[tokio::test]
    async fn subscribers_see_transitions() {
        let session = SessionContext::new();
        let mut changes = session.subscribe();

        session.sign_in(user());
        changes.changed().await.unwrap();
        assert_eq!(
            *changes.borrow_and_update(),
            SessionState::SignedIn { user: user() }
        );

        session.sign_out();
        changes.changed().await.unwrap();
        assert_eq!(*changes.borrow_and_update(), SessionState::SignedOut);
    }
}
