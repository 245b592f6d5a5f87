pub mod auth;
pub mod validate;

pub use auth::{authorize, AuthUser};
pub use validate::ValidatedJson;
