use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::auth::cookies::clear_session_cookies;

/// Turns any 401 into a logout: session cookies are expired and the browser
/// is sent to `/login`. Covers both a missing cookie and a token the backend
/// rejected mid-request.
pub async fn redirect_unauthorized(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    if response.status() == StatusCode::UNAUTHORIZED {
        tracing::debug!("Session rejected, redirecting to login");
        (clear_session_cookies(), Redirect::to("/login")).into_response()
    } else {
        response
    }
}
