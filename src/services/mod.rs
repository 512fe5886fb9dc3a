pub mod api_client;
pub mod session;

pub use api_client::{ApiClient, ApiError};
pub use session::UserProvider;
