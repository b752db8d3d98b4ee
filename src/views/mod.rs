pub mod auth;
pub mod citizen;
pub mod dashboard;
pub mod files;
pub mod submissions;
pub mod users;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde::Deserialize;

use crate::api::ApiError;
use crate::api::client::encode_segment;
use crate::auth::extractor::Session;
use crate::error::AppError;
use crate::export::{ExportFormat, Table};
use crate::models::SubmissionType;
use crate::state::SharedState;
use crate::workflow::{Page, Status};

/// Largest accepted citizen upload, form fields included.
pub const UPLOAD_LIMIT: usize = 10 * 1024 * 1024;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/", get(auth::login_page))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route(
            "/forgot-password",
            get(auth::forgot_password_page).post(auth::forgot_password),
        )
        .route(
            "/reset-password",
            get(auth::reset_password_page).post(auth::reset_password),
        )
        .route("/logout", post(auth::logout))
        .route("/wilayah/villages/{district}", get(auth::villages))
        // Admin
        .route("/dashboard", get(dashboard::index))
        .route("/users", get(users::users_page))
        .route("/users/export", get(users::export))
        .route("/users/{id}", post(users::update_user))
        .route("/{category}", get(submissions::category_page))
        .route("/{category}/export", get(submissions::export))
        .route("/{category}/{id}/status", post(submissions::update_status))
        // Citizen
        .route("/beranda", get(citizen::home))
        .route(
            "/beranda/resend-verification",
            post(citizen::resend_verification),
        )
        .route(
            "/pengajuan/{category}",
            get(citizen::submission_form)
                .post(citizen::submit)
                .layer(DefaultBodyLimit::max(UPLOAD_LIMIT)),
        )
        .route("/aktivitas", get(citizen::activity))
        .route("/aktivitas/{id}", get(citizen::activity_detail))
        .route("/profil", get(citizen::profile))
        // Files
        .route("/files/{filename}", get(files::download))
}

/// `?notice=` carried by the redirect after a successful mutation.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

#[allow(dead_code)]
pub struct NavLink {
    pub href: String,
    pub label: String,
    pub icon: String,
    pub active: bool,
}

/// Sidebar of the admin pages; `active` is the current path.
pub fn admin_nav(active: &str) -> Vec<NavLink> {
    let mut links = vec![NavLink {
        href: "/dashboard".to_string(),
        label: "Dashboard".to_string(),
        icon: "fa-th-large".to_string(),
        active: active == "/dashboard",
    }];

    links.extend(SubmissionType::ALL.iter().map(|kind| {
        let href = format!("/{}", kind.slug());
        NavLink {
            active: active == href,
            href,
            label: kind.nav_label().to_string(),
            icon: kind.icon().to_string(),
        }
    }));

    links.push(NavLink {
        href: "/users".to_string(),
        label: "Manajemen User".to_string(),
        icon: "fa-users".to_string(),
        active: active == "/users",
    });
    links
}

/// Who is logged in, for the top bar.
#[allow(dead_code)]
pub struct Viewer {
    pub role: String,
    pub region: String,
}

impl From<&Session> for Viewer {
    fn from(session: &Session) -> Self {
        Viewer {
            role: session.role.label().to_string(),
            region: session.region.clone().unwrap_or_default(),
        }
    }
}

/// `path?k=v&...`, skipping empty values.
pub fn url_with_query(path: &str, params: &[(&str, &str)]) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params.iter().filter(|(_, v)| !v.is_empty()) {
        query.append_pair(key, value);
    }
    let query = query.finish();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

#[allow(dead_code)]
pub struct StatCard {
    pub label: String,
    pub value: usize,
    pub icon: &'static str,
    pub color: &'static str,
}

/// Filter button; `active` marks the current selection.
#[allow(dead_code)]
pub struct FilterLink {
    pub label: String,
    pub url: String,
    pub active: bool,
}

#[allow(dead_code)]
pub struct PageLink {
    pub number: usize,
    pub url: String,
    pub active: bool,
}

#[allow(dead_code)]
pub struct Pager {
    pub prev: Option<String>,
    pub next: Option<String>,
    pub pages: Vec<PageLink>,
}

impl Pager {
    /// `None` when everything fits on one page.
    pub fn build<T>(page: &Page<T>, url_for: impl Fn(usize) -> String) -> Option<Self> {
        if !page.show_controls() {
            return None;
        }
        Some(Pager {
            prev: page.has_prev().then(|| url_for(page.page - 1)),
            next: page.has_next().then(|| url_for(page.page + 1)),
            pages: page
                .page_numbers()
                .into_iter()
                .map(|number| PageLink {
                    number,
                    url: url_for(number),
                    active: number == page.page,
                })
                .collect(),
        })
    }
}

/// Link to a stored document through the file proxy.
#[allow(dead_code)]
pub struct DocLink {
    pub name: String,
    pub url: String,
}

impl DocLink {
    pub fn new(name: &str) -> Self {
        DocLink {
            name: name.to_string(),
            url: format!("/files/{}", encode_segment(name)),
        }
    }
}

/// Spreadsheet download of `table` as `{stem}.xlsx` or `{stem}.csv`.
pub fn export_response(
    format: ExportFormat,
    sheet_name: &str,
    file_stem: &str,
    table: &Table,
) -> Result<Response, AppError> {
    let body = match format {
        ExportFormat::Xlsx => crate::export::xlsx(sheet_name, table)
            .map_err(|e| AppError::Internal(format!("xlsx export failed: {e}")))?,
        ExportFormat::Csv => crate::export::csv(table).into_bytes(),
    };
    let filename = format!("{file_stem}.{}", format.extension());
    tracing::info!(rows = table.rows.len(), %filename, "Export generated");

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}

/// Lenient `?page=`: anything unparseable means the first page.
pub fn page_param(raw: Option<&str>) -> usize {
    raw.and_then(|p| p.trim().parse().ok()).unwrap_or(1)
}

/// Secondary data: an unreachable or failing backend shows up as an empty
/// section instead of an error page. A rejected token still logs the user out,
/// and a body that cannot be read is an alert, not an empty list.
pub fn degrade<T: Default>(result: Result<T, ApiError>, what: &str) -> Result<T, AppError> {
    match result {
        Ok(value) => Ok(value),
        Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized.into()),
        Err(e @ ApiError::Decode(_)) => {
            tracing::warn!("Unreadable {what} from backend");
            Err(AppError::from(e).with_message("Data dari server tidak dapat dibaca"))
        }
        Err(e) => {
            tracing::warn!("Failed to load {what}: {e}");
            Ok(T::default())
        }
    }
}

/// Badge of a raw backend status: the text as stored, styled by its
/// normalized form. Missing shows as `-`.
#[allow(dead_code)]
pub struct StatusBadge {
    pub text: String,
    pub class: String,
}

impl StatusBadge {
    pub fn of(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => StatusBadge {
                text: "-".to_string(),
                class: "unknown".to_string(),
            },
            Some(raw) => StatusBadge {
                text: raw.to_string(),
                class: Status::normalize(Some(raw)).badge_class(),
            },
        }
    }
}
