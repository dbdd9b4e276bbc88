pub mod handlers;
pub mod models;
pub mod store;

// Re-export commonly used items for convenience
pub use handlers::{create_user, delete_user, get_user, list_users, update_user, ApiError};
pub use models::{ApiResponse, User, UserPayload};
pub use store::{StoreError, UserStore};
