pub mod catalog;
pub mod enums;
pub mod fields;
pub mod home_content;
pub mod library;
pub mod payments;
pub mod users;
