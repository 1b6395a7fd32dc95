// Service exports
pub mod auth;
pub mod cache;
pub mod postgres;
pub mod uploads;

pub use auth::{AuthError, AuthUser, Claims, TokenService};
pub use cache::{CacheError, CacheKey, CacheManager};
pub use postgres::{PostgresClient, PostgresError};
pub use uploads::{PictureStore, UploadError};
