use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use super::{SessionContext, SessionUser};

/// Live sessions by uid.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<SessionContext>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, uid: &str) -> Option<Arc<SessionContext>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(uid)
            .cloned()
    }

    /// Signs the user in, reusing their session if one is live.
    pub fn sign_in(&self, user: SessionUser) -> Arc<SessionContext> {
        let session = {
            let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(sessions.entry(user.uid.clone()).or_default())
        };
        session.sign_in(user);
        session
    }

    /// Returns whether a session was live.
    pub fn sign_out(&self, uid: &str) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(uid);

        match removed {
            Some(session) => {
                session.sign_out();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::enums::user_roles::UserRole;

    fn user(uid: &str) -> SessionUser {
        SessionUser {
            uid: uid.to_string(),
            name: "Akinyi".to_string(),
            email: format!("{uid}@luo.example"),
            role: UserRole::User,
        }
    }

    #[test]
    fn sign_in_reuses_the_live_session() {
        let registry = SessionRegistry::new();

        let first = registry.sign_in(user("u1"));
        let again = registry.sign_in(user("u1"));

        assert!(Arc::ptr_eq(&first, &again));
        assert!(registry.get("u2").is_none());
    }

    #[test]
    fn sign_out_cancels_work_in_that_session_only() {
        let registry = SessionRegistry::new();
        let u1_scope = registry.sign_in(user("u1")).active_scope().unwrap();
        let u2_scope = registry.sign_in(user("u2")).active_scope().unwrap();

        assert!(registry.sign_out("u1"));
        assert!(!registry.sign_out("u1"));

        assert!(u1_scope.is_cancelled());
        assert!(!u2_scope.is_cancelled());
        assert!(registry.get("u1").is_none());
    }
}
