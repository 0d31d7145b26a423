pub mod auth;
pub mod consultation;
pub mod health;
pub mod session;
pub mod upload;
