pub mod auth;
pub mod body;
pub mod response;

pub use auth::{identify_user_middleware, AuthUser};
pub use body::RawBody;
pub use response::{ApiResponse, ApiResult};
