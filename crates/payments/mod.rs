pub mod attempts;
pub mod dispatcher;
pub mod dto;
pub mod errors;
pub mod gateway;
pub mod http_gateway;
pub mod polling;
pub mod rails;
pub mod redirect_return;
pub mod reference;
