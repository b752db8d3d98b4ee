use std::collections::HashMap;

use askama::Template;
use axum::extract::{Multipart, Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde_json::{Map, Value};

use crate::api::client::encode_segment;
use crate::api::{ApiError, NewSubmission, Upload};
use crate::auth::extractor::Session;
use crate::error::AppError;
use crate::format::{Clock, or_dash};
use crate::models::{InputKind, Submission, SubmissionType};
use crate::state::SharedState;
use crate::views::dashboard::newest_first;
use crate::views::{DocLink, NoticeQuery, StatusBadge, degrade, url_with_query};

/// Multipart part carrying the optional supporting document.
const DOCUMENT_FIELD: &str = "document";

#[allow(dead_code)]
struct ServiceCard {
    url: String,
    label: String,
    icon: &'static str,
}

#[allow(dead_code)]
struct ActivityRow {
    date: String,
    kind: String,
    badge: StatusBadge,
    url: String,
}

#[allow(dead_code)]
struct FormInput {
    name: String,
    label: String,
    html_type: &'static str,
    textarea: bool,
    rows: u8,
    value: String,
}

#[allow(dead_code)]
struct TimelineItem {
    status: String,
    at: String,
    notes: Option<String>,
}

#[derive(Template)]
#[template(path = "citizen/home.html")]
#[allow(dead_code)]
struct HomeTemplate {
    name: String,
    unverified: bool,
    notice: Option<String>,
    services: Vec<ServiceCard>,
    activity: Vec<ActivityRow>,
}

#[derive(Template)]
#[template(path = "citizen/form.html")]
#[allow(dead_code)]
struct SubmissionFormTemplate {
    title: String,
    description: String,
    action_url: String,
    error: Option<String>,
    inputs: Vec<FormInput>,
}

#[derive(Template)]
#[template(path = "citizen/activity.html")]
#[allow(dead_code)]
struct ActivityTemplate {
    notice: Option<String>,
    rows: Vec<ActivityRow>,
}

#[derive(Template)]
#[template(path = "citizen/activity_detail.html")]
#[allow(dead_code)]
struct ActivityDetailTemplate {
    title: String,
    date: String,
    badge: StatusBadge,
    entries: Vec<(String, String)>,
    document: Option<DocLink>,
    timeline: Vec<TimelineItem>,
}

#[derive(Template)]
#[template(path = "citizen/profile.html")]
#[allow(dead_code)]
struct ProfileTemplate {
    personal: Vec<(String, String)>,
    address: Vec<(String, String)>,
    card: Option<String>,
}

fn service_cards() -> Vec<ServiceCard> {
    SubmissionType::ALL
        .iter()
        .map(|kind| ServiceCard {
            url: format!("/pengajuan/{}", kind.slug()),
            label: format!("Bantuan {}", kind.nav_label().trim_start_matches("Bantuan ")),
            icon: kind.icon(),
        })
        .collect()
}

fn activity_rows(items: &[Submission], clock: &Clock) -> Vec<ActivityRow> {
    items
        .iter()
        .map(|s| ActivityRow {
            date: clock.date_time(s.created_at),
            kind: or_dash(Some(&s.kind)),
            badge: StatusBadge::of(s.status.as_deref()),
            url: format!("/aktivitas/{}", encode_segment(&s.id)),
        })
        .collect()
}

pub async fn home(
    session: Session,
    State(state): State<SharedState>,
    Query(q): Query<NoticeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let profile = state
        .api
        .profile(&session.token)
        .await
        .map_err(|e| AppError::from(e).with_message("Gagal memuat data. Silakan login kembali."))?;

    let mut submissions = degrade(state.api.my_submissions(&session.token).await, "own submissions")?;
    newest_first(&mut submissions);

    let template = HomeTemplate {
        name: or_dash(Some(&profile.full_name)),
        unverified: profile.email_verified_at.is_none(),
        notice: q.notice,
        services: service_cards(),
        activity: activity_rows(&submissions, &state.clock),
    };
    Ok(Html(template.render().unwrap_or_default()))
}

pub async fn resend_verification(
    session: Session,
    State(state): State<SharedState>,
) -> Result<Response, AppError> {
    let message = state
        .api
        .resend_verification(&session.token)
        .await
        .map_err(|e| match e {
            ApiError::Status { ref message, .. } if !message.is_empty() => {
                AppError::BadRequest(message.clone())
            }
            other => AppError::from(other).with_message("Gagal mengirim ulang email."),
        })?;

    let notice = message.unwrap_or_else(|| "Email verifikasi terkirim!".to_string());
    Ok(Redirect::to(&url_with_query("/beranda", &[("notice", &notice)])).into_response())
}

fn form_category(slug: &str) -> Result<SubmissionType, AppError> {
    SubmissionType::from_slug(slug).ok_or_else(|| {
        AppError::NotFound("Tipe pengajuan yang Anda minta tidak valid.".to_string())
    })
}

fn render_form(
    kind: SubmissionType,
    values: &HashMap<String, String>,
    error: Option<String>,
) -> Response {
    let inputs = kind
        .form_fields()
        .iter()
        .map(|f| FormInput {
            name: f.name.to_string(),
            label: f.label.to_string(),
            html_type: f.kind.html_type(),
            textarea: f.kind == InputKind::TextArea,
            rows: if f.name.contains("Uraian") { 5 } else { 3 },
            value: values.get(f.name).cloned().unwrap_or_default(),
        })
        .collect();

    let template = SubmissionFormTemplate {
        title: kind.form_title().to_string(),
        description: kind.form_description().to_string(),
        action_url: format!("/pengajuan/{}", kind.slug()),
        error,
        inputs,
    };
    Html(template.render().unwrap_or_default()).into_response()
}

pub async fn submission_form(
    _session: Session,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let kind = form_category(&slug)?;
    Ok(render_form(kind, &HashMap::new(), None))
}

/// The first program field left blank, if any.
pub fn missing_field(kind: SubmissionType, values: &HashMap<String, String>) -> Option<&'static str> {
    kind.form_fields()
        .iter()
        .find(|f| values.get(f.name).is_none_or(|v| v.trim().is_empty()))
        .map(|f| f.label)
}

/// `form_data` object in field order, values trimmed.
pub fn form_data(kind: SubmissionType, values: &HashMap<String, String>) -> Map<String, Value> {
    kind.form_fields()
        .iter()
        .map(|f| {
            let value = values.get(f.name).map(|v| v.trim()).unwrap_or_default();
            (f.name.to_string(), Value::String(value.to_string()))
        })
        .collect()
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    tracing::warn!("Rejected submission upload: {e}");
    AppError::BadRequest(format!("Formulir tidak dapat dibaca: {}", e.body_text()))
}

pub async fn submit(
    session: Session,
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let kind = form_category(&slug)?;

    let mut values = HashMap::new();
    let mut document = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == DOCUMENT_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.map_err(multipart_error)?;
            // An untouched file input still sends an empty part
            if !file_name.is_empty() && !bytes.is_empty() {
                document = Some(Upload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
        } else {
            let text = field.text().await.map_err(multipart_error)?;
            values.insert(name, text);
        }
    }

    if let Some(label) = missing_field(kind, &values) {
        return Ok(render_form(kind, &values, Some(format!("{label} wajib diisi."))));
    }

    let submission = NewSubmission {
        kind: kind.api_name().to_string(),
        form_data: form_data(kind, &values),
        document,
    };

    match state.api.create_submission(&session.token, submission).await {
        Ok(message) => {
            tracing::info!(kind = kind.api_name(), "Submission sent");
            let notice = message.unwrap_or_else(|| "Pengajuan berhasil dikirim!".to_string());
            Ok(Redirect::to(&url_with_query("/aktivitas", &[("notice", &notice)])).into_response())
        }
        Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized.into()),
        Err(e) => {
            let msg = e
                .backend_message()
                .unwrap_or("Gagal mengirim pengajuan. Coba lagi.")
                .to_string();
            Ok(render_form(kind, &values, Some(msg)))
        }
    }
}

pub async fn activity(
    session: Session,
    State(state): State<SharedState>,
    Query(q): Query<NoticeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut submissions = state
        .api
        .my_submissions(&session.token)
        .await
        .map_err(|e| AppError::from(e).with_message("Gagal memuat riwayat pengajuan."))?;
    newest_first(&mut submissions);

    let template = ActivityTemplate {
        notice: q.notice,
        rows: activity_rows(&submissions, &state.clock),
    };
    Ok(Html(template.render().unwrap_or_default()))
}

pub async fn activity_detail(
    session: Session,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let submission = state.api.submission(&session.token, &id).await.map_err(|e| {
        AppError::from(e).with_message("Gagal memuat data atau pengajuan tidak ditemukan.")
    })?;

    let timeline = submission
        .status_histories
        .iter()
        .map(|h| TimelineItem {
            status: or_dash(Some(&h.status)),
            at: state.clock.date_time(h.created_at),
            notes: h.notes.clone().filter(|n| !n.trim().is_empty()),
        })
        .collect();

    let template = ActivityDetailTemplate {
        title: format!("Detail Pengajuan {}", submission.kind),
        date: state.clock.date_time(submission.created_at),
        badge: StatusBadge::of(submission.status.as_deref()),
        entries: submission.form_entries(),
        document: submission.document_name().map(DocLink::new),
        timeline,
    };
    Ok(Html(template.render().unwrap_or_default()))
}

pub async fn profile(
    session: Session,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .api
        .profile(&session.token)
        .await
        .map_err(|e| AppError::from(e).with_message("Gagal memuat profil."))?;

    let pairs = |items: [(&str, Option<&str>); 3]| -> Vec<(String, String)> {
        items
            .into_iter()
            .map(|(label, value)| (label.to_string(), or_dash(value)))
            .collect()
    };

    let personal = pairs([
        ("Nama Lengkap", Some(user.full_name.as_str())),
        ("Email", Some(user.email.as_str())),
        ("Nomor HP", user.phone.as_deref()),
    ]);
    let mut address = pairs([
        ("Provinsi", user.provinsi.as_deref()),
        ("Kabupaten/Kota", user.kabupaten.as_deref()),
        ("Kecamatan", user.kecamatan.as_deref()),
    ]);
    address.push(("Kelurahan/Desa".to_string(), or_dash(user.kelurahan.as_deref())));

    let template = ProfileTemplate {
        personal,
        address,
        card: user.masked_card(),
    };
    Ok(Html(template.render().unwrap_or_default()))
}
