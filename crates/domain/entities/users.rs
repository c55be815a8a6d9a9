use serde::{Deserialize, Serialize};

use super::TreeEntity;
use crate::domain::value_objects::{
    enums::{user_roles::UserRole, user_statuses::UserStatus},
    fields::non_blank,
    users::{CreateProfileModel, EditUserModel},
};

pub const USERS_PATH: &str = "users";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserSubscription {
    pub plan: String,
    pub expires_at: i64,
    pub is_active: bool,
}

/// Profile keyed by the identity provider's uid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserEntity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<UserSubscription>,
    pub created_at: i64,
    pub updated_at: i64,
    pub last_active: i64,
    pub status: UserStatus,
}

impl TreeEntity for UserEntity {
    fn assign_id(&mut self, id: String) {
        self.id = id;
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertUserEntity {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: i64,
    pub updated_at: i64,
    pub last_active: i64,
    pub status: UserStatus,
}

impl InsertUserEntity {
    pub fn new(profile: CreateProfileModel, role: UserRole, now: i64) -> Self {
        Self {
            name: profile.name,
            email: profile.email,
            role,
            created_at: now,
            updated_at: now,
            last_active: now,
            status: UserStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditUserEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<UserSubscription>,
    pub updated_at: i64,
}

impl EditUserEntity {
    pub fn new(changes: EditUserModel, now: i64) -> Self {
        Self {
            name: non_blank(changes.name),
            role: changes.role,
            status: changes.status,
            subscription: changes.subscription,
            updated_at: now,
        }
    }
}
