pub mod library;
pub mod movies;
pub mod payments;
pub mod series;
pub mod session;
pub mod slides;
pub mod updates;
pub mod users;
