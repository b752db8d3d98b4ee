use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::api::ApiError;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    BadRequest(String),
    Upstream(String),
    Internal(String),
}

impl AppError {
    /// Rewrites the user-facing message, keeping the variant. 401 is left alone
    /// so the login redirect still fires.
    pub fn with_message(self, message: &str) -> Self {
        match self {
            AppError::Unauthorized(msg) => AppError::Unauthorized(msg),
            AppError::NotFound(_) => AppError::NotFound(message.to_string()),
            AppError::Forbidden(_) => AppError::Forbidden(message.to_string()),
            AppError::BadRequest(_) => AppError::BadRequest(message.to_string()),
            AppError::Upstream(detail) => {
                tracing::warn!("{message}: {detail}");
                AppError::Upstream(message.to_string())
            }
            AppError::Internal(detail) => AppError::Internal(detail),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::Upstream(msg) => write!(f, "Upstream Error: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

#[derive(Template)]
#[template(path = "alert.html")]
struct AlertTemplate {
    title: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Terjadi kesalahan pada server".to_string(),
                )
            }
        };

        let title = match status {
            StatusCode::NOT_FOUND => "Tidak Ditemukan",
            StatusCode::FORBIDDEN => "Akses Ditolak",
            StatusCode::UNAUTHORIZED => "Sesi Berakhir",
            _ => "Gagal",
        };

        let template = AlertTemplate {
            title: title.to_string(),
            message,
        };
        (status, Html(template.render().unwrap_or_default())).into_response()
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => {
                AppError::Unauthorized("Sesi berakhir, silakan login kembali".to_string())
            }
            ApiError::Status { status, message } => match status.as_u16() {
                403 => AppError::Forbidden(message),
                404 => AppError::NotFound(message),
                400..=499 => AppError::BadRequest(message),
                _ => AppError::Upstream(format!("backend returned {status}: {message}")),
            },
            ApiError::Transport(e) => AppError::Upstream(format!("backend unreachable: {e}")),
            ApiError::Decode(msg) => AppError::Upstream(format!("unexpected backend response: {msg}")),
        }
    }
}
