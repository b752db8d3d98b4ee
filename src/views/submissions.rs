use askama::Template;
use axum::Form;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::api::StatusUpdate;
use crate::api::client::encode_segment;
use crate::auth::extractor::Session;
use crate::error::AppError;
use crate::export::{ExportFormat, submissions_table};
use crate::format::or_dash;
use crate::models::{Submission, SubmissionType};
use crate::state::{AppState, SharedState};
use crate::views::{
    DocLink, FilterLink, NavLink, Pager, StatCard, StatusBadge, Viewer, admin_nav, degrade,
    export_response, page_param, url_with_query,
};
use crate::workflow::{
    Paginator, Status, StatusAction, StatusCounts, StatusFilter, available_actions,
    filter_by_status,
};

#[allow(dead_code)]
struct SubmissionRow {
    number: usize,
    date: String,
    applicant: String,
    cells: Vec<String>,
    document: Option<DocLink>,
    badge: StatusBadge,
    detail_url: String,
}

#[allow(dead_code)]
struct DetailField {
    label: String,
    value: String,
}

#[allow(dead_code)]
struct ActionButton {
    key: &'static str,
    label: &'static str,
    class: &'static str,
}

#[allow(dead_code)]
struct DetailView {
    title: String,
    date: String,
    applicant: String,
    email: String,
    fields: Vec<DetailField>,
    status: String,
    document: Option<DocLink>,
    actions: Vec<ActionButton>,
    action_url: String,
    close_url: String,
}

#[derive(Template)]
#[template(path = "submissions/category.html")]
#[allow(dead_code)]
struct CategoryTemplate {
    nav: Vec<NavLink>,
    viewer: Viewer,
    title: String,
    heading: String,
    notice: Option<String>,
    cards: Vec<StatCard>,
    filters: Vec<FilterLink>,
    filter_key: String,
    page: usize,
    headers: Vec<String>,
    rows: Vec<SubmissionRow>,
    pager: Option<Pager>,
    export_xlsx: String,
    export_csv: String,
    detail: Option<DetailView>,
}

#[derive(Deserialize)]
pub struct CategoryParams {
    pub status: Option<String>,
    pub page: Option<String>,
    pub detail: Option<String>,
    pub notice: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusForm {
    pub action: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
}

#[derive(Deserialize)]
pub struct ExportParams {
    pub status: Option<String>,
    pub format: Option<String>,
}

fn category(slug: &str) -> Result<SubmissionType, AppError> {
    SubmissionType::from_slug(slug)
        .ok_or_else(|| AppError::NotFound("Halaman tidak ditemukan".to_string()))
}

/// Every submission of one program, in backend order.
async fn load_category(
    state: &AppState,
    session: &Session,
    kind: SubmissionType,
) -> Result<Vec<Submission>, AppError> {
    let all = degrade(
        state
            .api
            .all_submissions(&session.token, state.config.submission_limit)
            .await,
        "submissions",
    )?;
    Ok(all.into_iter().filter(|s| kind.matches(&s.kind)).collect())
}

fn stat_cards(kind: SubmissionType, counts: &StatusCounts) -> Vec<StatCard> {
    vec![
        StatCard {
            label: format!("Total {}", kind.page_title()),
            value: counts.total,
            icon: kind.icon(),
            color: "blue",
        },
        StatCard {
            label: "Dalam Review".to_string(),
            value: counts.review,
            icon: "fa-clock",
            color: "yellow",
        },
        StatCard {
            label: "Validasi Berkas".to_string(),
            value: counts.validasi_berkas,
            icon: "fa-file-circle-check",
            color: "purple",
        },
        StatCard {
            label: "Disetujui".to_string(),
            value: counts.approved,
            icon: "fa-check-circle",
            color: "green",
        },
        StatCard {
            label: "Ditolak".to_string(),
            value: counts.rejected,
            icon: "fa-times-circle",
            color: "red",
        },
    ]
}

fn list_url(kind: SubmissionType, filter: &StatusFilter, page: usize, extra: &[(&str, &str)]) -> String {
    let page = if page > 1 { page.to_string() } else { String::new() };
    let filter_key = match filter {
        StatusFilter::All => "",
        other => other.key(),
    };
    let mut params = vec![("status", filter_key), ("page", page.as_str())];
    params.extend_from_slice(extra);
    url_with_query(&format!("/{}", kind.slug()), &params)
}

fn detail_view(
    kind: SubmissionType,
    item: &Submission,
    session: &Session,
    state: &AppState,
    close_url: String,
) -> DetailView {
    let mut fields = vec![
        DetailField {
            label: "Tanggal".to_string(),
            value: state.clock.date_time(item.created_at),
        },
    ];
    fields.extend(kind.detail_columns().iter().map(|c| DetailField {
        label: c.label.to_string(),
        value: or_dash(item.field(c.keys).as_deref()),
    }));

    let status = Status::normalize(item.status.as_deref());
    let actions = available_actions(&status, &session.role)
        .into_iter()
        .map(|a| ActionButton {
            key: a.key(),
            label: a.label(),
            class: a.button_class(),
        })
        .collect();

    DetailView {
        title: format!("Detail {}", kind.page_title()),
        date: state.clock.date_time(item.created_at),
        applicant: or_dash(item.applicant_name()),
        email: or_dash(item.applicant_email()),
        fields,
        status: or_dash(item.status.as_deref()),
        document: item.document_name().map(DocLink::new),
        actions,
        action_url: format!("/{}/{}/status", kind.slug(), encode_segment(&item.id)),
        close_url,
    }
}

pub async fn category_page(
    session: Session,
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    Query(params): Query<CategoryParams>,
) -> Result<impl IntoResponse, AppError> {
    session.require_admin()?;
    let kind = category(&slug)?;

    let all = load_category(&state, &session, kind).await?;
    let filter = StatusFilter::parse(params.status.as_deref());
    let filtered = filter_by_status(&all, &filter);
    let page = Paginator::new(state.config.page_size)
        .paginate(&filtered, page_param(params.page.as_deref()));

    let filters = StatusFilter::choices()
        .iter()
        .map(|choice| FilterLink {
            label: choice.label().to_string(),
            url: list_url(kind, choice, 1, &[]),
            active: *choice == filter,
        })
        .collect();

    let mut headers = vec![
        "NO".to_string(),
        "TANGGAL".to_string(),
        "PEMOHON".to_string(),
    ];
    headers.extend(kind.columns().iter().map(|c| c.label.to_uppercase()));
    headers.extend(["DOKUMEN", "STATUS", "AKSI"].map(String::from));

    let current_page = page.page;
    let rows = page
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| SubmissionRow {
            number: page.offset + i + 1,
            date: state.clock.date(item.created_at),
            applicant: or_dash(item.applicant_name()),
            cells: kind
                .columns()
                .iter()
                .map(|c| or_dash(item.field(c.keys).as_deref()))
                .collect(),
            document: item.document_name().map(DocLink::new),
            badge: StatusBadge::of(item.status.as_deref()),
            detail_url: list_url(
                kind,
                &filter,
                current_page,
                &[("detail", item.id.as_str())],
            ),
        })
        .collect();

    let pager = Pager::build(&page, |n| list_url(kind, &filter, n, &[]));

    let detail = params
        .detail
        .as_deref()
        .and_then(|id| all.iter().find(|s| s.id == id))
        .map(|item| {
            let close_url = list_url(kind, &filter, current_page, &[]);
            detail_view(kind, item, &session, &state, close_url)
        });

    let export_base = format!("/{}/export", kind.slug());
    let filter_key = match &filter {
        StatusFilter::All => String::new(),
        other => other.key().to_string(),
    };

    let template = CategoryTemplate {
        nav: admin_nav(&format!("/{}", kind.slug())),
        viewer: Viewer::from(&session),
        title: kind.page_title().to_string(),
        heading: format!("Daftar {}", kind.page_title()),
        notice: params.notice,
        cards: stat_cards(kind, &StatusCounts::tally(all.iter())),
        filters,
        export_xlsx: url_with_query(&export_base, &[("status", &filter_key), ("format", "xlsx")]),
        export_csv: url_with_query(&export_base, &[("status", &filter_key), ("format", "csv")]),
        filter_key,
        page: current_page,
        headers,
        rows,
        pager,
        detail,
    };
    Ok(Html(template.render().unwrap_or_default()))
}

/// Applies one of the modal's transition buttons, then reloads the list.
pub async fn update_status(
    session: Session,
    State(state): State<SharedState>,
    Path((slug, id)): Path<(String, String)>,
    Form(form): Form<StatusForm>,
) -> Result<Response, AppError> {
    session.require_admin()?;
    let kind = category(&slug)?;
    let action = StatusAction::parse(&form.action)
        .ok_or_else(|| AppError::BadRequest("Aksi tidak dikenal".to_string()))?;

    let update = StatusUpdate {
        status: action.status(),
        notes: action.notes(),
    };
    state
        .api
        .update_status(&session.token, &id, &update)
        .await
        .map_err(|e| AppError::from(e).with_message("Gagal mengubah status"))?;

    tracing::info!(submission = %id, status = action.status(), "Submission status updated");

    let notice = format!("Status berhasil diubah menjadi {}", action.status());
    let filter = StatusFilter::parse(form.status.as_deref());
    let page = page_param(form.page.as_deref());
    Ok(Redirect::to(&list_url(kind, &filter, page, &[("notice", &notice)])).into_response())
}

/// Spreadsheet of the currently filtered subset.
pub async fn export(
    session: Session,
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    Query(params): Query<ExportParams>,
) -> Result<Response, AppError> {
    session.require_admin()?;
    let kind = category(&slug)?;

    let all = load_category(&state, &session, kind).await?;
    let filter = StatusFilter::parse(params.status.as_deref());
    let selected = filter_by_status(&all, &filter);
    if selected.is_empty() {
        return Err(AppError::BadRequest("Tidak ada data".to_string()));
    }

    let table = submissions_table(kind, &selected, &state.clock);
    export_response(
        ExportFormat::parse(params.format.as_deref()),
        kind.sheet_name(),
        kind.export_file_stem(),
        &table,
    )
}
