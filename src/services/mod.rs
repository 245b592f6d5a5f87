pub mod auth_service;
pub mod tokens;

pub use auth_service::{AuthService, AuthTokens};
pub use tokens::{Claims, TokenIssuer};
