pub mod client;
pub mod confidence;
pub mod enhance;
pub mod fallback;
pub mod request;
