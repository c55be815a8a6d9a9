pub mod default_routers;
pub mod dependencies;
pub mod error_responses;
pub mod http_serve;
pub mod routers;
