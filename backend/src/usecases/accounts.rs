use std::sync::Arc;

use storefront_core::{
    domain::{
        entities::users::UserEntity,
        repositories::users::UserRepository,
        value_objects::{
            enums::user_statuses::UserStatus,
            users::{AdminAllowList, CreateProfileModel, EditUserModel},
        },
    },
    payments::attempts::AttemptRegistry,
    session::{SessionState, SessionUser, registry::SessionRegistry},
};
use tracing::{error, info, warn};

use super::{
    access::AccessControl,
    errors::{ContentError, UseCaseResult},
};
use crate::auth::AuthUser;

/// Sign-in, sign-out and user administration.
pub struct AccountsUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    access: AccessControl<U>,
    allow_list: AdminAllowList,
    sessions: Arc<SessionRegistry>,
    attempts: Arc<AttemptRegistry>,
}

impl<U> AccountsUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(
        user_repo: Arc<U>,
        allow_list: AdminAllowList,
        sessions: Arc<SessionRegistry>,
        attempts: Arc<AttemptRegistry>,
    ) -> Self {
        Self {
            access: AccessControl::new(Arc::clone(&user_repo)),
            user_repo,
            allow_list,
            sessions,
            attempts,
        }
    }

    /// Loads the caller's profile, creating it on first sign-in, and opens
    /// their session.
    pub async fn sign_in(&self, identity: &AuthUser) -> UseCaseResult<SessionUser> {
        let profile = match self.user_repo.get_by_id(&identity.uid).await? {
            Some(profile) => {
                if profile.status == UserStatus::Inactive {
                    warn!(uid = %identity.uid, "accounts: inactive user tried to sign in");
                    return Err(ContentError::Forbidden);
                }
                self.user_repo
                    .touch_last_active(&identity.uid)
                    .await
                    .map_err(|err| {
                        error!(db_error = ?err, uid = %identity.uid, "accounts: failed to touch lastActive");
                        ContentError::from(err)
                    })?;
                profile
            }
            None => self.create_profile(identity).await?,
        };

        let user = SessionUser {
            uid: profile.id,
            name: profile.name,
            email: profile.email,
            role: profile.role,
        };
        self.sessions.sign_in(user.clone());

        Ok(user)
    }

    async fn create_profile(&self, identity: &AuthUser) -> UseCaseResult<UserEntity> {
        let email = identity
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .ok_or_else(|| ContentError::Invalid("Identity token carries no email".to_string()))?
            .to_string();

        let name = identity
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

        let role = self.allow_list.role_for(&email);
        let profile = self
            .user_repo
            .create_profile(&identity.uid, CreateProfileModel { name, email }, role)
            .await
            .map_err(|err| {
                error!(db_error = ?err, uid = %identity.uid, "accounts: failed to create profile");
                ContentError::from(err)
            })?;

        info!(uid = %identity.uid, %role, "accounts: profile created");
        Ok(profile)
    }

    /// Closes the session and stops every payment attempt it started.
    pub fn sign_out(&self, uid: &str) -> bool {
        let dropped = self.attempts.remove_owner(uid);
        let was_signed_in = self.sessions.sign_out(uid);
        info!(uid, dropped_attempts = dropped, was_signed_in, "accounts: signed out");
        was_signed_in
    }

    pub fn current(&self, uid: &str) -> SessionState {
        self.sessions
            .get(uid)
            .map(|session| session.state())
            .unwrap_or_default()
    }

    pub async fn list_users(&self, actor_uid: &str) -> UseCaseResult<Vec<UserEntity>> {
        self.access.require_admin(actor_uid).await?;

        self.user_repo.get_all().await.map_err(|err| {
            error!(db_error = ?err, "accounts: failed to list users");
            ContentError::from(err)
        })
    }

    /// Users may read their own profile; admins may read anyone's.
    pub async fn get_user(&self, actor_uid: &str, uid: &str) -> UseCaseResult<UserEntity> {
        if actor_uid != uid {
            self.access.require_admin(actor_uid).await?;
        }

        self.user_repo
            .get_by_id(uid)
            .await?
            .ok_or(ContentError::NotFound("User"))
    }

    pub async fn update_user(
        &self,
        actor_uid: &str,
        uid: &str,
        changes: EditUserModel,
    ) -> UseCaseResult<UserEntity> {
        self.access.require_admin(actor_uid).await?;

        self.get_user(actor_uid, uid).await?;
        self.user_repo.update(uid, changes).await.map_err(|err| {
            error!(db_error = ?err, uid, "accounts: failed to update user");
            ContentError::from(err)
        })?;

        info!(uid, actor_uid, "accounts: user updated");
        self.get_user(actor_uid, uid).await
    }

    pub async fn delete_user(&self, actor_uid: &str, uid: &str) -> UseCaseResult<()> {
        self.access.require_admin(actor_uid).await?;

        self.user_repo.delete(uid).await.map_err(|err| {
            error!(db_error = ?err, uid, "accounts: failed to delete user");
            ContentError::from(err)
        })?;
        self.sign_out(uid);

        info!(uid, actor_uid, "accounts: user deleted");
        Ok(())
    }
}
