pub mod data_access_error;
pub mod library;
pub mod local_store;
pub mod movies;
pub mod realtime_tree;
pub mod series;
pub mod slides;
pub mod updates;
pub mod users;
