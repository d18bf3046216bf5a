use crate::error::AppError;
use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

pub const USER_ID_HEADER: &str = "x-user-id";

/// The numeric user id the client claims via `X-User-Id`.
///
/// The value is not verified against any credential: whoever sends the
/// header is treated as that user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub i64);

pub fn user_id_from_headers(headers: &HeaderMap) -> Option<i64> {
    let raw = headers.get(USER_ID_HEADER)?.to_str().ok()?.trim();
    let id: u64 = raw.parse().ok()?;
    i64::try_from(id).ok()
}

pub async fn require_user_id(mut request: Request, next: Next) -> Response {
    match user_id_from_headers(request.headers()) {
        Some(user_id) => {
            request.extensions_mut().insert(CurrentUser(user_id));
            next.run(request).await
        }
        None => AppError::MissingIdentity.into_response(),
    }
}
