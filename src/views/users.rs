use askama::Template;
use axum::Form;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::api::UserUpdate;
use crate::api::client::encode_segment;
use crate::auth::extractor::Session;
use crate::error::AppError;
use crate::export::{ExportFormat, users_table};
use crate::format::or_dash;
use crate::models::{ASSIGNABLE_ROLES, Role, User};
use crate::state::{AppState, SharedState};
use crate::views::{
    FilterLink, NavLink, Pager, StatCard, Viewer, admin_nav, degrade, export_response,
    page_param, url_with_query,
};
use crate::workflow::{Paginator, UserFilter};

const ROLE_FILTERS: [(&str, &str); 4] = [
    ("all", "Semua"),
    ("user", "User"),
    ("admin_wilayah", "Admin Wilayah"),
    ("super_admin", "Super Admin"),
];

#[allow(dead_code)]
struct UserRow {
    number: usize,
    card: String,
    name: String,
    email: String,
    phone: String,
    role: String,
    role_class: String,
    region: String,
    provinsi: String,
    kabupaten: String,
    kecamatan: String,
    kelurahan: String,
    detail_url: String,
}

#[allow(dead_code)]
struct RoleOption {
    value: String,
    label: String,
    selected: bool,
}

#[allow(dead_code)]
struct UserDetail {
    fields: Vec<(String, String)>,
    can_edit: bool,
    roles: Vec<RoleOption>,
    region: String,
    action_url: String,
    close_url: String,
}

#[derive(Template)]
#[template(path = "users.html")]
#[allow(dead_code)]
struct UsersTemplate {
    nav: Vec<NavLink>,
    viewer: Viewer,
    title: String,
    notice: Option<String>,
    cards: Vec<StatCard>,
    filters: Vec<FilterLink>,
    role_key: String,
    search: String,
    page: usize,
    rows: Vec<UserRow>,
    pager: Option<Pager>,
    export_xlsx: String,
    export_csv: String,
    detail: Option<UserDetail>,
}

#[derive(Deserialize)]
pub struct UsersParams {
    pub role: Option<String>,
    pub q: Option<String>,
    pub page: Option<String>,
    pub detail: Option<String>,
    pub notice: Option<String>,
}

#[derive(Deserialize)]
pub struct UserEditForm {
    pub role: String,
    #[serde(default)]
    pub wilayah_tugas: String,
    #[serde(default)]
    pub role_filter: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct UsersExportParams {
    pub role: Option<String>,
    pub q: Option<String>,
    pub format: Option<String>,
}

async fn load_users(state: &AppState, session: &Session) -> Result<Vec<User>, AppError> {
    degrade(state.api.users(&session.token).await, "users")
}

fn users_url(role: &str, search: &str, page: usize, extra: &[(&str, &str)]) -> String {
    let page = if page > 1 { page.to_string() } else { String::new() };
    let role = if role == "all" { "" } else { role };
    let mut params = vec![("role", role), ("q", search), ("page", page.as_str())];
    params.extend_from_slice(extra);
    url_with_query("/users", &params)
}

fn user_detail(user: &User, session: &Session, close_url: String) -> UserDetail {
    let fields = [
        ("ID User", Some(user.id.as_str())),
        ("Card ID", user.card_uid.as_deref()),
        ("Nama", Some(user.full_name.as_str())),
        ("Email", Some(user.email.as_str())),
        ("Telepon", user.phone.as_deref()),
        ("Role", Some(user.role.as_str())),
        ("Wilayah Tugas", user.wilayah_tugas.as_deref()),
        ("Provinsi", user.provinsi.as_deref()),
        ("Kabupaten", user.kabupaten.as_deref()),
        ("Kecamatan", user.kecamatan.as_deref()),
        ("Kelurahan", user.kelurahan.as_deref()),
    ]
    .into_iter()
    .map(|(label, value)| (label.to_string(), or_dash(value)))
    .collect();

    let current = user.role();
    let roles = ASSIGNABLE_ROLES
        .iter()
        .map(|role| RoleOption {
            value: role.as_str().to_string(),
            label: role.label().to_string(),
            selected: *role == current,
        })
        .collect();

    UserDetail {
        fields,
        can_edit: session.is_super_admin(),
        roles,
        region: user.wilayah_tugas.clone().unwrap_or_default(),
        action_url: format!("/users/{}", encode_segment(&user.id)),
        close_url,
    }
}

pub async fn users_page(
    session: Session,
    State(state): State<SharedState>,
    Query(params): Query<UsersParams>,
) -> Result<impl IntoResponse, AppError> {
    session.require_admin()?;

    let users = load_users(&state, &session).await?;
    let filter = UserFilter::new(params.role.as_deref(), params.q.as_deref());
    let role_key = filter.role.clone().unwrap_or_else(|| "all".to_string());
    let search = params.q.clone().unwrap_or_default().trim().to_string();

    let matching = filter.apply(&users);
    let page = Paginator::new(state.config.page_size)
        .paginate(&matching, page_param(params.page.as_deref()));
    let current_page = page.page;

    let admins = users.iter().filter(|u| u.role().is_admin()).count();
    let citizens = users.iter().filter(|u| u.role() == Role::User).count();
    let cards = vec![
        StatCard {
            label: "Total User".to_string(),
            value: users.len(),
            icon: "fa-users",
            color: "blue",
        },
        StatCard {
            label: "Admin".to_string(),
            value: admins,
            icon: "fa-user-shield",
            color: "green",
        },
        StatCard {
            label: "Warga".to_string(),
            value: citizens,
            icon: "fa-user",
            color: "yellow",
        },
    ];

    let filters = ROLE_FILTERS
        .iter()
        .map(|(key, label)| FilterLink {
            label: label.to_string(),
            url: users_url(key, &search, 1, &[]),
            active: *key == role_key,
        })
        .collect();

    let rows = page
        .items
        .iter()
        .enumerate()
        .map(|(i, u)| UserRow {
            number: page.offset + i + 1,
            card: or_dash(u.card_uid.as_deref()),
            name: or_dash(Some(&u.full_name)),
            email: or_dash(Some(&u.email)),
            phone: or_dash(u.phone.as_deref()),
            role: or_dash(Some(&u.role)),
            role_class: u.role().as_str().replace('_', "-"),
            region: or_dash(u.wilayah_tugas.as_deref()),
            provinsi: or_dash(u.provinsi.as_deref()),
            kabupaten: or_dash(u.kabupaten.as_deref()),
            kecamatan: or_dash(u.kecamatan.as_deref()),
            kelurahan: or_dash(u.kelurahan.as_deref()),
            detail_url: users_url(&role_key, &search, current_page, &[("detail", u.id.as_str())]),
        })
        .collect();

    let pager = Pager::build(&page, |n| users_url(&role_key, &search, n, &[]));

    let detail = params
        .detail
        .as_deref()
        .and_then(|id| users.iter().find(|u| u.id == id))
        .map(|u| {
            let close_url = users_url(&role_key, &search, current_page, &[]);
            user_detail(u, &session, close_url)
        });

    let export_role = if role_key == "all" { "" } else { role_key.as_str() };
    let template = UsersTemplate {
        nav: admin_nav("/users"),
        viewer: Viewer::from(&session),
        title: "Manajemen User".to_string(),
        notice: params.notice,
        cards,
        filters,
        export_xlsx: url_with_query(
            "/users/export",
            &[("role", export_role), ("q", &search), ("format", "xlsx")],
        ),
        export_csv: url_with_query(
            "/users/export",
            &[("role", export_role), ("q", &search), ("format", "csv")],
        ),
        role_key: role_key.clone(),
        search,
        page: current_page,
        rows,
        pager,
        detail,
    };
    Ok(Html(template.render().unwrap_or_default()))
}

/// Role and assigned-region change from the detail modal.
pub async fn update_user(
    session: Session,
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Form(form): Form<UserEditForm>,
) -> Result<Response, AppError> {
    if !session.is_super_admin() {
        return Err(AppError::Forbidden(
            "Hanya super admin yang dapat mengubah role".to_string(),
        ));
    }

    let role = Role::parse(&form.role);
    if !ASSIGNABLE_ROLES.contains(&role) {
        return Err(AppError::BadRequest("Role tidak dikenal".to_string()));
    }
    let region = form.wilayah_tugas.trim();
    if role == Role::AdminWilayah && region.is_empty() {
        return Err(AppError::BadRequest(
            "Wilayah tugas wajib diisi untuk admin wilayah".to_string(),
        ));
    }

    let update = UserUpdate {
        role: role.as_str(),
        wilayah_tugas: region,
    };
    state
        .api
        .update_user(&session.token, &id, &update)
        .await
        .map_err(|e| AppError::from(e).with_message("Gagal memperbarui user"))?;

    tracing::info!(user = %id, role = role.as_str(), "User role updated");

    let role_filter = form.role_filter.as_deref().unwrap_or("all");
    let search = form.q.as_deref().unwrap_or_default();
    Ok(Redirect::to(&users_url(
        role_filter,
        search,
        1,
        &[("notice", "Data user berhasil diperbarui")],
    ))
    .into_response())
}

pub async fn export(
    session: Session,
    State(state): State<SharedState>,
    Query(params): Query<UsersExportParams>,
) -> Result<Response, AppError> {
    session.require_admin()?;

    let users = load_users(&state, &session).await?;
    let selected = UserFilter::new(params.role.as_deref(), params.q.as_deref()).apply(&users);
    if selected.is_empty() {
        return Err(AppError::BadRequest("Tidak ada data.".to_string()));
    }

    export_response(
        ExportFormat::parse(params.format.as_deref()),
        "Manajemen User",
        "manajemen_user",
        &users_table(&selected),
    )
}
