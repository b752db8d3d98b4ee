use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::{
    ApiError, FileDownload, ListBody, LoginRequest, LoginResponse, MessageBody, NewSubmission,
    RegisterRequest, ResetPasswordRequest, StatusUpdate, UserUpdate,
};
use crate::models::{DashboardStats, Submission, User, Village};

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build reqwest client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        tracing::debug!(%method, path, "backend request");
        let req = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .header("Accept", "application/json");
        match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Sends and turns every non-2xx into an `ApiError`.
    async fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = req.send().await.map_err(|e| {
            tracing::warn!("Backend request failed: {e}");
            ApiError::Transport(e)
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let url = resp.url().path().to_string();
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<MessageBody>(&body)
            .ok()
            .and_then(MessageBody::text)
            .unwrap_or_else(|| body.chars().take(200).collect());

        tracing::warn!(%status, path = %url, "Backend rejected request: {message}");

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        Err(ApiError::Status { status, message })
    }

    async fn json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let resp = self.send(req).await?;
        let body = resp.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn list<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<Vec<T>, ApiError> {
        let body: Option<ListBody<T>> = self.json(req).await?;
        Ok(body.map(ListBody::into_vec).unwrap_or_default())
    }

    /// Success message of a fire-and-forget call, if the backend sent one.
    async fn message(&self, req: RequestBuilder) -> Result<Option<String>, ApiError> {
        let resp = self.send(req).await?;
        let body = resp.text().await.unwrap_or_default();
        Ok(serde_json::from_str::<MessageBody>(&body)
            .ok()
            .and_then(MessageBody::text))
    }

    // ── Auth ────────────────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let req = self
            .request(Method::POST, "/api/v1/auth/login", None)
            .json(&LoginRequest { email, password });
        self.json(req).await
    }

    pub async fn register(&self, payload: &RegisterRequest) -> Result<Option<String>, ApiError> {
        let req = self
            .request(Method::POST, "/api/v1/auth/register", None)
            .json(payload);
        self.message(req).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<Option<String>, ApiError> {
        let req = self
            .request(Method::POST, "/api/v1/auth/forgot-password", None)
            .json(&serde_json::json!({ "email": email }));
        self.message(req).await
    }

    pub async fn reset_password(
        &self,
        payload: &ResetPasswordRequest<'_>,
    ) -> Result<Option<String>, ApiError> {
        let req = self
            .request(Method::POST, "/api/v1/auth/reset-password", None)
            .json(payload);
        self.message(req).await
    }

    // ── Citizen ─────────────────────────────────────────────────

    pub async fn profile(&self, token: &str) -> Result<User, ApiError> {
        self.json(self.request(Method::GET, "/api/v1/user/profile", Some(token)))
            .await
    }

    pub async fn resend_verification(&self, token: &str) -> Result<Option<String>, ApiError> {
        let req = self.request(Method::POST, "/api/v1/user/resend-verification", Some(token));
        self.message(req).await
    }

    pub async fn my_submissions(&self, token: &str) -> Result<Vec<Submission>, ApiError> {
        self.list(self.request(Method::GET, "/api/v1/submissions", Some(token)))
            .await
    }

    pub async fn submission(&self, token: &str, id: &str) -> Result<Submission, ApiError> {
        let path = format!("/api/v1/submissions/{}", encode_segment(id));
        self.json(self.request(Method::GET, &path, Some(token))).await
    }

    pub async fn create_submission(
        &self,
        token: &str,
        submission: NewSubmission,
    ) -> Result<Option<String>, ApiError> {
        let form_data = serde_json::to_string(&submission.form_data)
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        let mut form = Form::new()
            .text("type", submission.kind)
            .text("form_data", form_data);

        if let Some(doc) = submission.document {
            let mut part = Part::bytes(doc.bytes.to_vec()).file_name(doc.file_name);
            if let Some(ct) = doc.content_type.as_deref() {
                part = part.mime_str(ct)?;
            }
            form = form.part("document", part);
        }

        let req = self
            .request(Method::POST, "/api/v1/submissions/", Some(token))
            .multipart(form);
        self.message(req).await
    }

    // ── Admin ───────────────────────────────────────────────────

    pub async fn dashboard_stats(&self, token: &str) -> Result<DashboardStats, ApiError> {
        self.json(self.request(Method::GET, "/api/v1/admin/dashboard-stats", Some(token)))
            .await
    }

    pub async fn all_submissions(
        &self,
        token: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Submission>, ApiError> {
        let mut req = self.request(Method::GET, "/api/v1/admin/submissions", Some(token));
        if let Some(limit) = limit {
            req = req.query(&[("limit", limit)]);
        }
        self.list(req).await
    }

    pub async fn update_status(
        &self,
        token: &str,
        id: &str,
        update: &StatusUpdate<'_>,
    ) -> Result<Option<String>, ApiError> {
        let path = format!("/api/v1/admin/submissions/{}/status", encode_segment(id));
        let req = self.request(Method::POST, &path, Some(token)).json(update);
        self.message(req).await
    }

    pub async fn users(&self, token: &str) -> Result<Vec<User>, ApiError> {
        self.list(self.request(Method::GET, "/api/v1/admin/users", Some(token)))
            .await
    }

    pub async fn update_user(
        &self,
        token: &str,
        id: &str,
        update: &UserUpdate<'_>,
    ) -> Result<Option<String>, ApiError> {
        let path = format!("/api/v1/admin/users/{}", encode_segment(id));
        let req = self.request(Method::PUT, &path, Some(token)).json(update);
        self.message(req).await
    }

    pub async fn download_file(&self, token: &str, filename: &str) -> Result<FileDownload, ApiError> {
        let path = format!("/api/v1/admin/files/{}", encode_segment(filename));
        let resp = self.send(self.request(Method::GET, &path, Some(token))).await?;
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = resp.bytes().await?;
        Ok(FileDownload { content_type, bytes })
    }

    // ── Region lookup ───────────────────────────────────────────

    pub async fn villages(&self, district: &str) -> Result<Vec<Village>, ApiError> {
        let path = format!("/api/v1/wilayah/villages/{}", encode_segment(district));
        self.list(self.request(Method::GET, &path, None)).await
    }
}

/// Percent-encodes a single path segment.
pub(crate) fn encode_segment(segment: &str) -> String {
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
