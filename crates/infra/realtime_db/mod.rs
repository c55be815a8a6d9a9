pub mod client;
pub mod collection;
pub mod memory;
pub mod repositories;
