pub mod handlers;
pub mod middleware;

pub use middleware::{require_user_id, CurrentUser, USER_ID_HEADER};
