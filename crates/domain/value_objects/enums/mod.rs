pub mod content_statuses;
pub mod content_types;
pub mod payment_rails;
pub mod payment_statuses;
pub mod user_roles;
pub mod user_statuses;
