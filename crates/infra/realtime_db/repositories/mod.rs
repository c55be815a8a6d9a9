pub mod movies;
pub mod series;
pub mod slides;
pub mod updates;
pub mod users;
