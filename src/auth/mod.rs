//! Bearer-token management and password hashing.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password, PasswordError};
pub use token::{AuthError, Claims, IssuedToken, TokenManager};
