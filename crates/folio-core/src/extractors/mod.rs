pub mod auth_admin;
pub mod client_ip;
pub mod json;

pub use auth_admin::AuthAdmin;
pub use client_ip::ClientIp;
pub use json::Json;
