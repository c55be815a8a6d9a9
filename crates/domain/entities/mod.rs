pub mod library;
pub mod movies;
pub mod orders;
pub mod series;
pub mod slides;
pub mod updates;
pub mod users;

use serde::de::DeserializeOwned;

/// A record stored under a generated or caller-chosen key of the realtime tree.
pub trait TreeEntity: DeserializeOwned + Send + 'static {
    fn assign_id(&mut self, id: String);

    /// Epoch millis. Records that never had one sort as the oldest.
    fn created_at(&self) -> i64;
}
