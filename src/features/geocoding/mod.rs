pub mod client;
pub mod handlers;
pub mod neighborhoods;
