//! Typed client for the Aspirasi backend REST API.

pub mod client;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::models::User;

pub use client::ApiClient;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 401 from the backend: the stored token is no longer valid.
    #[error("unauthorized")]
    Unauthorized,
    #[error("backend returned {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text the backend sent along with a 4xx, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "access_token")]
    pub token: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub wilayah_tugas: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub password_confirmation: String,
    pub provinsi: String,
    pub kabupaten: String,
    pub kecamatan: String,
    pub kelurahan: String,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordRequest<'a> {
    pub email: &'a str,
    pub otp: &'a str,
    pub new_password: &'a str,
    pub confirm_password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdate<'a> {
    pub status: &'a str,
    pub notes: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UserUpdate<'a> {
    pub role: &'a str,
    pub wilayah_tugas: &'a str,
}

/// Citizen submission: `type`, JSON-encoded `form_data` and an optional document.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub kind: String,
    pub form_data: serde_json::Map<String, serde_json::Value>,
    pub document: Option<Upload>,
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: bytes::Bytes,
}

#[derive(Debug, Clone)]
pub struct FileDownload {
    pub content_type: Option<String>,
    pub bytes: bytes::Bytes,
}

/// `{"message": ...}` or `{"error": ...}`; whichever the endpoint felt like.
#[derive(Debug, Default, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl MessageBody {
    pub fn text(self) -> Option<String> {
        self.message.or(self.error).filter(|s| !s.is_empty())
    }
}

/// Lists come back bare or wrapped in `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListBody<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(default = "Vec::new")]
        data: Vec<T>,
    },
}

impl<T> ListBody<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListBody::Bare(items) => items,
            ListBody::Wrapped { data } => data,
        }
    }
}
