pub mod auth;
pub mod response;

pub use auth::{person_auth_middleware, AuthPerson};
pub use response::{ApiResponse, ApiResult};
