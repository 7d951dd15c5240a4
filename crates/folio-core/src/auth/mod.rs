pub mod admin;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use admin::{ADMIN_ID, ADMIN_NAME, AdminCredentials};
pub use jwt::{Claims, create_token, validate_token};
pub use middleware::admin_required;
pub use password::{hash_password, verify_password};
