use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::auth::extractor::Session;
use crate::error::AppError;
use crate::format::{Clock, or_dash, rupiah};
use crate::models::Submission;
use crate::state::SharedState;
use crate::views::{NavLink, StatusBadge, Viewer, admin_nav, degrade};

const RECENT_LIMIT: usize = 20;

#[allow(dead_code)]
struct StatCards {
    members: i64,
    umkm: i64,
    pending: i64,
    balance: String,
}

#[allow(dead_code)]
struct ActivityRow {
    at: String,
    applicant: String,
    kind: String,
    badge: StatusBadge,
}

#[allow(dead_code)]
struct TodayRow {
    applicant: String,
    business: String,
    time: String,
    status: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
#[allow(dead_code)]
struct DashboardTemplate {
    nav: Vec<NavLink>,
    viewer: Viewer,
    title: String,
    stats: StatCards,
    recent: Vec<ActivityRow>,
    today: Vec<TodayRow>,
}

/// Newest first; records without a timestamp sink to the bottom.
pub fn newest_first(items: &mut [Submission]) {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Records created on the current local date.
pub fn created_today<'a>(items: &'a [Submission], clock: &Clock) -> Vec<&'a Submission> {
    let today = clock.today();
    items
        .iter()
        .filter(|s| s.created_at.is_some_and(|at| clock.local_date(at) == today))
        .collect()
}

pub async fn index(
    session: Session,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    session.require_admin()?;

    let stats = degrade(
        state.api.dashboard_stats(&session.token).await,
        "dashboard stats",
    )?;
    let mut submissions = degrade(
        state
            .api
            .all_submissions(&session.token, state.config.submission_limit)
            .await,
        "submissions",
    )?;
    newest_first(&mut submissions);

    let clock = &state.clock;
    let recent = submissions
        .iter()
        .take(RECENT_LIMIT)
        .map(|s| ActivityRow {
            at: clock.date_time(s.created_at),
            applicant: s.applicant_name().unwrap_or("Tidak diketahui").to_string(),
            kind: or_dash(Some(&s.kind)),
            badge: StatusBadge::of(s.status.as_deref()),
        })
        .collect();

    let today = created_today(&submissions, clock)
        .into_iter()
        .map(|s| TodayRow {
            applicant: s.applicant_name().unwrap_or("User Tidak Dikenal").to_string(),
            business: s.field(&["Nama Usaha"]).unwrap_or_else(|| "N/A".to_string()),
            time: clock.time(s.created_at),
            status: or_dash(s.status.as_deref()),
        })
        .collect();

    let template = DashboardTemplate {
        nav: admin_nav("/dashboard"),
        viewer: Viewer::from(&session),
        title: "Selamat Datang Admin".to_string(),
        stats: StatCards {
            members: stats.total_anggota_aktif,
            umkm: stats.pelaku_umkm,
            pending: stats.pengajuan_menunggu,
            balance: rupiah(stats.total_saldo_emoney),
        },
        recent,
        today,
    };
    Ok(Html(template.render().unwrap_or_default()))
}
