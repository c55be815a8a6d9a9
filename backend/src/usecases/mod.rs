pub mod access;
pub mod accounts;
pub mod checkout;
pub mod errors;
pub mod home_content;
pub mod library;
pub mod movies;
pub mod series;
