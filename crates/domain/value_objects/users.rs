use std::collections::HashSet;

use serde::Deserialize;

use super::enums::{user_roles::UserRole, user_statuses::UserStatus};
use crate::domain::entities::users::UserSubscription;

/// Email addresses that receive the admin role when their profile is first
/// created. After creation the stored role is authoritative.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList {
    emails: HashSet<String>,
}

impl AdminAllowList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails = emails
            .into_iter()
            .map(|email| email.as_ref().trim().to_ascii_lowercase())
            .filter(|email| !email.is_empty())
            .collect();
        Self { emails }
    }

    pub fn from_csv(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    pub fn role_for(&self, email: &str) -> UserRole {
        if self.emails.contains(&email.trim().to_ascii_lowercase()) {
            UserRole::Admin
        } else {
            UserRole::User
        }
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CreateProfileModel {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EditUserModel {
    pub name: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub subscription: Option<UserSubscription>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_matches_case_insensitively() {
        let allow_list = AdminAllowList::from_csv(" Admin@Luo.example , ,ops@luo.example");
        assert_eq!(allow_list.len(), 2);
        assert_eq!(allow_list.role_for("admin@luo.example"), UserRole::Admin);
        assert_eq!(allow_list.role_for("OPS@LUO.EXAMPLE "), UserRole::Admin);
        assert_eq!(allow_list.role_for("viewer@luo.example"), UserRole::User);
    }

    #[test]
    fn empty_allow_list_grants_nobody_admin() {
        let allow_list = AdminAllowList::from_csv("");
        assert!(allow_list.is_empty());
        assert_eq!(allow_list.role_for(""), UserRole::User);
    }
}
