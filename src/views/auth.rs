use std::sync::LazyLock;

use askama::Template;
use axum::Form;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use regex::Regex;
use serde::Deserialize;

use crate::api::{ApiError, LoginResponse, RegisterRequest, ResetPasswordRequest};
use crate::auth::cookies::{ROLE_COOKIE, TOKEN_COOKIE, clear_session_cookies, session_cookies};
use crate::error::AppError;
use crate::models::Role;
use crate::state::{AppState, SharedState};
use crate::views::{NoticeQuery, url_with_query};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid email regex"));

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Template)]
#[template(path = "auth/login.html")]
#[allow(dead_code)]
struct LoginTemplate {
    error: Option<String>,
    notice: Option<String>,
    email: String,
}

#[derive(Template)]
#[template(path = "auth/register.html")]
#[allow(dead_code)]
struct RegisterTemplate {
    error: Option<String>,
    form: RegisterForm,
}

#[derive(Template)]
#[template(path = "auth/forgot_password.html")]
#[allow(dead_code)]
struct ForgotPasswordTemplate {
    error: Option<String>,
    email: String,
}

#[derive(Template)]
#[template(path = "auth/reset_password.html")]
#[allow(dead_code)]
struct ResetPasswordTemplate {
    error: Option<String>,
    notice: Option<String>,
    email: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
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

#[derive(Deserialize)]
pub struct ForgotPasswordForm {
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetQuery {
    pub email: Option<String>,
    pub notice: Option<String>,
}

#[derive(Deserialize)]
pub struct ResetPasswordForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

fn render_login(error: Option<&str>, notice: Option<String>, email: &str) -> Response {
    let template = LoginTemplate {
        error: error.map(str::to_string),
        notice,
        email: email.to_string(),
    };
    Html(template.render().unwrap_or_default()).into_response()
}

pub async fn login_page(jar: CookieJar, Query(q): Query<NoticeQuery>) -> Response {
    // Already logged in: straight to the landing page of the cached role
    if jar.get(TOKEN_COOKIE).is_some_and(|c| !c.value().is_empty()) {
        let role = jar
            .get(ROLE_COOKIE)
            .map(|c| Role::parse(c.value()))
            .unwrap_or(Role::User);
        return Redirect::to(home_for(&role)).into_response();
    }

    render_login(None, q.notice, "")
}

pub async fn login(State(state): State<SharedState>, Form(form): Form<LoginForm>) -> Response {
    let email = form.email.trim();
    if email.is_empty() || form.password.is_empty() {
        return render_login(Some("Email dan password wajib diisi"), None, email);
    }

    let resp = match state.api.login(email, &form.password).await {
        Ok(resp) => resp,
        Err(ApiError::Unauthorized) => {
            return render_login(Some("Email atau password salah"), None, email);
        }
        Err(ApiError::Status { status, .. }) if status.is_client_error() => {
            return render_login(Some("Email atau password salah"), None, email);
        }
        Err(e) => {
            tracing::error!("Login request failed: {e}");
            return render_login(
                Some("Tidak dapat terhubung ke server. Coba lagi nanti."),
                None,
                email,
            );
        }
    };

    let (role, region) = resolve_identity(&state, &resp).await;
    tracing::info!(role = role.as_str(), "User logged in");

    let jar = session_cookies(
        &resp.token,
        role.as_str(),
        &region,
        state.config.secure_cookies,
    );
    (jar, Redirect::to(home_for(&role))).into_response()
}

/// Role and assigned region: from the login response when present, otherwise
/// from the profile endpoint. A missing role means a citizen.
async fn resolve_identity(state: &AppState, login: &LoginResponse) -> (Role, String) {
    let user = login.user.as_ref();
    let mut role = login
        .role
        .clone()
        .or_else(|| user.map(|u| u.role.clone()))
        .filter(|r| !r.is_empty());
    let mut region = login
        .wilayah_tugas
        .clone()
        .or_else(|| user.and_then(|u| u.wilayah_tugas.clone()));

    if role.is_none() {
        match state.api.profile(&login.token).await {
            Ok(profile) => {
                role = Some(profile.role);
                region = region.or(profile.wilayah_tugas);
            }
            Err(e) => tracing::warn!("Could not load profile after login: {e}"),
        }
    }

    (
        Role::parse(role.as_deref().unwrap_or_default()),
        region.unwrap_or_default(),
    )
}

fn home_for(role: &Role) -> &'static str {
    if role.is_admin() { "/dashboard" } else { "/beranda" }
}

pub async fn logout() -> impl IntoResponse {
    (clear_session_cookies(), Redirect::to("/login"))
}

// ── Registration ────────────────────────────────────────────────

fn render_register(error: Option<String>, form: RegisterForm) -> Response {
    let template = RegisterTemplate { error, form };
    Html(template.render().unwrap_or_default()).into_response()
}

pub async fn register_page() -> Response {
    render_register(None, RegisterForm::default())
}

/// First problem with the registration form, in the order the fields appear.
pub fn validate_registration(form: &RegisterForm) -> Result<(), &'static str> {
    let identity = [&form.full_name, &form.email, &form.phone, &form.password];
    if identity.iter().any(|v| v.trim().is_empty()) {
        return Err("Semua data wajib diisi.");
    }
    if !EMAIL_RE.is_match(form.email.trim()) {
        return Err("Format email tidak valid.");
    }
    if form.password != form.password_confirmation {
        return Err("Konfirmasi password tidak cocok.");
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password minimal harus 6 karakter.");
    }
    let address = [&form.provinsi, &form.kabupaten, &form.kecamatan, &form.kelurahan];
    if address.iter().any(|v| v.trim().is_empty()) {
        return Err("Alamat harus diisi lengkap.");
    }
    Ok(())
}

pub async fn register(State(state): State<SharedState>, Form(form): Form<RegisterForm>) -> Response {
    if let Err(msg) = validate_registration(&form) {
        return render_register(Some(msg.to_string()), form);
    }

    let payload = RegisterRequest {
        full_name: form.full_name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
        password: form.password.clone(),
        password_confirmation: form.password_confirmation.clone(),
        provinsi: form.provinsi.trim().to_string(),
        kabupaten: form.kabupaten.trim().to_string(),
        kecamatan: form.kecamatan.trim().to_string(),
        kelurahan: form.kelurahan.trim().to_string(),
    };

    match state.api.register(&payload).await {
        Ok(message) => {
            tracing::info!("New citizen registered");
            let notice = message.unwrap_or_else(|| {
                "Registrasi berhasil! Silakan cek email Anda untuk verifikasi.".to_string()
            });
            Redirect::to(&url_with_query("/login", &[("notice", &notice)])).into_response()
        }
        Err(e) => {
            let msg = e
                .backend_message()
                .unwrap_or("Registrasi gagal. Coba lagi.")
                .to_string();
            render_register(Some(msg), form)
        }
    }
}

// ── Password reset ──────────────────────────────────────────────

fn render_forgot(error: Option<&str>, email: &str) -> Response {
    let template = ForgotPasswordTemplate {
        error: error.map(str::to_string),
        email: email.to_string(),
    };
    Html(template.render().unwrap_or_default()).into_response()
}

pub async fn forgot_password_page() -> Response {
    render_forgot(None, "")
}

pub async fn forgot_password(
    State(state): State<SharedState>,
    Form(form): Form<ForgotPasswordForm>,
) -> Response {
    let email = form.email.trim();
    if email.is_empty() {
        return render_forgot(Some("Masukkan email."), email);
    }
    if !EMAIL_RE.is_match(email) {
        return render_forgot(Some("Format email tidak valid."), email);
    }

    match state.api.forgot_password(email).await {
        Ok(message) => {
            let notice =
                message.unwrap_or_else(|| "Permintaan dikirim. Cek email untuk OTP.".to_string());
            Redirect::to(&url_with_query(
                "/reset-password",
                &[("email", email), ("notice", &notice)],
            ))
            .into_response()
        }
        Err(e) => render_forgot(
            Some(
                e.backend_message()
                    .unwrap_or("Gagal mengirim permintaan. Coba lagi."),
            ),
            email,
        ),
    }
}

fn render_reset(error: Option<&str>, notice: Option<String>, email: &str) -> Response {
    let template = ResetPasswordTemplate {
        error: error.map(str::to_string),
        notice,
        email: email.to_string(),
    };
    Html(template.render().unwrap_or_default()).into_response()
}

pub async fn reset_password_page(Query(q): Query<ResetQuery>) -> Response {
    render_reset(None, q.notice, q.email.as_deref().unwrap_or_default())
}

pub async fn reset_password(
    State(state): State<SharedState>,
    Form(form): Form<ResetPasswordForm>,
) -> Response {
    let email = form.email.trim();
    let otp = form.otp.trim();

    let problem = if email.is_empty() {
        Some("Email wajib diisi.")
    } else if otp.is_empty() {
        Some("Masukkan kode OTP.")
    } else if form.new_password.chars().count() < MIN_PASSWORD_LEN {
        Some("Password harus minimal 6 karakter.")
    } else if form.new_password != form.confirm_password {
        Some("Password dan konfirmasi tidak cocok.")
    } else {
        None
    };
    if let Some(msg) = problem {
        return render_reset(Some(msg), None, email);
    }

    let payload = ResetPasswordRequest {
        email,
        otp,
        new_password: &form.new_password,
        confirm_password: &form.confirm_password,
    };

    match state.api.reset_password(&payload).await {
        Ok(message) => {
            let notice =
                message.unwrap_or_else(|| "Password berhasil diubah. Silakan login.".to_string());
            Redirect::to(&url_with_query("/login", &[("notice", &notice)])).into_response()
        }
        Err(e) => render_reset(
            Some(
                e.backend_message()
                    .unwrap_or("Gagal mereset password. Periksa OTP dan coba lagi."),
            ),
            None,
            email,
        ),
    }
}

// ── Region lookup ───────────────────────────────────────────────

/// `360101` becomes `36.01.01`; digits past the sixth are dropped.
pub fn district_code(raw: &str) -> String {
    let raw = raw.trim();
    if raw.len() >= 6 && raw.chars().all(|c| c.is_ascii_digit()) {
        format!("{}.{}.{}", &raw[0..2], &raw[2..4], &raw[4..6])
    } else {
        raw.to_string()
    }
}

pub async fn villages(
    State(state): State<SharedState>,
    Path(district): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let villages = state
        .api
        .villages(&district_code(&district))
        .await
        .map_err(|e| AppError::from(e).with_message("Gagal memuat data kelurahan"))?;
    Ok(Json(villages))
}
