pub mod local_storage;
pub mod realtime_db;
