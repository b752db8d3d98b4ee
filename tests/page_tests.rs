mod common;

use reqwest::StatusCode;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use common::{count, submission, user};

fn location(resp: &reqwest::Response) -> String {
    resp.headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn set_cookies(resp: &reqwest::Response) -> Vec<String> {
    resp.headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

/// 25 UMKM records (10 in review, 5 each in the other states) plus two
/// records of another program that must never show up on the UMKM page.
fn umkm_fixture() -> Vec<Value> {
    let mut items = Vec::new();
    for id in 1..=25u32 {
        let status = match id {
            1..=6 => "review",
            7..=10 => "Pending",
            11..=15 => "validasi berkas",
            16..=18 => "disetujui",
            19..=20 => "approved",
            _ => "ditolak",
        };
        items.push(submission(id, "UMKM", status));
    }
    items.push(submission(90, "Kesehatan", "review"));
    items.push(submission(91, "Kesehatan", "review"));
    items
}

// ── Health & headers ────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
    let app = common::spawn_app().await;

    let resp = app.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let app = common::spawn_app().await;

    let resp = app.get("/login").await;
    assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
    assert_eq!(resp.headers()["x-frame-options"], "DENY");
    assert_eq!(
        resp.headers()["referrer-policy"],
        "strict-origin-when-cross-origin"
    );
}

// ── Login & session ─────────────────────────────────────────────

#[tokio::test]
async fn login_page_renders_form() {
    let app = common::spawn_app().await;

    let resp = app.get("/login").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Membership System"));
    assert!(body.contains(r#"action="/login""#));
}

#[tokio::test]
async fn login_page_sends_logged_in_user_home() {
    let app = common::spawn_app().await;

    let resp = app.get_as("/login", "user").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/beranda");

    let resp = app.get_as("/", "admin_wilayah").await;
    assert_eq!(location(&resp), "/dashboard");
}

#[tokio::test]
async fn login_success_sets_session_cookies() {
    let app = common::spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({ "email": "admin@mail.test", "password": "rahasia" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "abc123",
            "role": "super_admin",
            "wilayah_tugas": "Serang",
        })))
        .expect(1)
        .mount(&app.backend)
        .await;

    let resp = app
        .post_form("/login", &[("email", "admin@mail.test"), ("password", "rahasia")])
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");

    let cookies = set_cookies(&resp);
    assert!(cookies.iter().any(|c| c.starts_with("token=abc123")));
    assert!(cookies.iter().any(|c| c.starts_with("role=super_admin")));
    assert!(cookies.iter().any(|c| c.starts_with("wilayah=Serang")));
    assert!(cookies.iter().all(|c| c.contains("HttpOnly")));
}

#[tokio::test]
async fn login_without_role_falls_back_to_profile() {
    let app = common::spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc123" })))
        .mount(&app.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user/profile"))
        .and(header("Authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user(3, "Siti Warga", "user")))
        .expect(1)
        .mount(&app.backend)
        .await;

    let resp = app
        .post_form("/login", &[("email", "siti@mail.test"), ("password", "rahasia")])
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/beranda");
    assert!(set_cookies(&resp).iter().any(|c| c.starts_with("role=user")));
}

#[tokio::test]
async fn login_invalid_credentials_shows_error() {
    let app = common::spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid" })))
        .mount(&app.backend)
        .await;

    let resp = app
        .post_form("/login", &[("email", "admin@mail.test"), ("password", "salah")])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(set_cookies(&resp).is_empty());
    let body = resp.text().await.unwrap();
    assert!(body.contains("Email atau password salah"));
    assert!(body.contains("admin@mail.test"));
}

#[tokio::test]
async fn missing_session_redirects_to_login() {
    let app = common::spawn_app().await;

    for page in ["/dashboard", "/umkm", "/users", "/beranda", "/aktivitas", "/profil"] {
        let resp = app.get(page).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{page}");
        assert_eq!(location(&resp), "/login", "{page}");
    }
}

#[tokio::test]
async fn backend_401_clears_cookies_and_redirects() {
    let app = common::spawn_app().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/submissions"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&app.backend)
        .await;

    let resp = app.get_as("/umkm", "super_admin").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");

    let cookies = set_cookies(&resp);
    let token = cookies
        .iter()
        .find(|c| c.starts_with("token="))
        .expect("token cookie is expired");
    assert!(token.contains("Max-Age=0"));
    assert!(cookies.iter().any(|c| c.starts_with("role=")));
    assert!(cookies.iter().any(|c| c.starts_with("wilayah=")));
}

#[tokio::test]
async fn logout_expires_cookies() {
    let app = common::spawn_app().await;

    let resp = app.post_form_as("/logout", "user", &[]).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    assert_eq!(
        set_cookies(&resp)
            .iter()
            .filter(|c| c.contains("Max-Age=0"))
            .count(),
        3
    );
}

// ── Registration & password reset ───────────────────────────────

#[tokio::test]
async fn register_validates_inline() {
    let app = common::spawn_app().await;

    let mut form = vec![
        ("full_name", "Siti"),
        ("email", "siti@mail.test"),
        ("phone", "0812"),
        ("password", "rahasia"),
        ("password_confirmation", "rahasib"),
        ("provinsi", "Banten"),
        ("kabupaten", "Serang"),
        ("kecamatan", "Cipocok Jaya"),
        ("kelurahan", "Banjarsari"),
    ];

    let body = app.post_form("/register", &form).await.text().await.unwrap();
    assert!(body.contains("Konfirmasi password tidak cocok."));
    assert!(body.contains(r#"value="Siti""#));

    form[4].1 = "rahasia";
    form[8].1 = "";
    let body = app.post_form("/register", &form).await.text().await.unwrap();
    assert!(body.contains("Alamat harus diisi lengkap."));
}

#[tokio::test]
async fn register_success_redirects_to_login() {
    let app = common::spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "message": "Cek email Anda" })),
        )
        .expect(1)
        .mount(&app.backend)
        .await;

    let resp = app
        .post_form(
            "/register",
            &[
                ("full_name", "Siti"),
                ("email", "siti@mail.test"),
                ("phone", "0812"),
                ("password", "rahasia"),
                ("password_confirmation", "rahasia"),
                ("provinsi", "Banten"),
                ("kabupaten", "Serang"),
                ("kecamatan", "Cipocok Jaya"),
                ("kelurahan", "Banjarsari"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?notice=Cek+email+Anda");
}

#[tokio::test]
async fn register_shows_backend_error() {
    let app = common::spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "error": "Email sudah terdaftar" })),
        )
        .mount(&app.backend)
        .await;

    let resp = app
        .post_form(
            "/register",
            &[
                ("full_name", "Siti"),
                ("email", "siti@mail.test"),
                ("phone", "0812"),
                ("password", "rahasia"),
                ("password_confirmation", "rahasia"),
                ("provinsi", "Banten"),
                ("kabupaten", "Serang"),
                ("kecamatan", "Cipocok Jaya"),
                ("kelurahan", "Banjarsari"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Email sudah terdaftar"));
}

#[tokio::test]
async fn forgot_password_checks_email_format() {
    let app = common::spawn_app().await;

    let body = app
        .post_form("/forgot-password", &[("email", "bukan-email")])
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Format email tidak valid."));

    let body = app
        .post_form("/forgot-password", &[("email", "  ")])
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Masukkan email."));
}

#[tokio::test]
async fn forgot_password_moves_on_to_reset() {
    let app = common::spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/forgot-password"))
        .and(body_json(json!({ "email": "warga@mail.test" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&app.backend)
        .await;

    let resp = app
        .post_form("/forgot-password", &[("email", " warga@mail.test ")])
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(location(&resp).starts_with("/reset-password?email=warga%40mail.test&notice="));
}

#[tokio::test]
async fn reset_password_validates_then_posts() {
    let app = common::spawn_app().await;

    let body = app
        .post_form(
            "/reset-password",
            &[
                ("email", "warga@mail.test"),
                ("otp", "123456"),
                ("new_password", "abc"),
                ("confirm_password", "abc"),
            ],
        )
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Password harus minimal 6 karakter."));

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/reset-password"))
        .and(body_json(json!({
            "email": "warga@mail.test",
            "otp": "123456",
            "new_password": "rahasia",
            "confirm_password": "rahasia",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "OK" })))
        .expect(1)
        .mount(&app.backend)
        .await;

    let resp = app
        .post_form(
            "/reset-password",
            &[
                ("email", "warga@mail.test"),
                ("otp", "123456"),
                ("new_password", "rahasia"),
                ("confirm_password", "rahasia"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?notice=OK");
}

#[tokio::test]
async fn village_lookup_reformats_district_code() {
    let app = common::spawn_app().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/wilayah/villages/36.01.01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "code": "36.01.01.2001", "name": "Banjarsari" }]
        })))
        .expect(1)
        .mount(&app.backend)
        .await;

    let resp = app.get("/wilayah/villages/360101").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body[0]["name"], "Banjarsari");
}

// ── Admin dashboard ─────────────────────────────────────────────

#[tokio::test]
async fn dashboard_shows_stats_and_recent_activity() {
    let app = common::spawn_app().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/dashboard-stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_anggota_aktif": 120,
            "pelaku_umkm": 30,
            "pengajuan_menunggu": 4,
            "total_saldo_emoney": 1234567.4,
        })))
        .mount(&app.backend)
        .await;
    app.mock_admin_submissions(vec![submission(1, "UMKM", "review")])
        .await;

    let resp = app.get_as("/dashboard", "super_admin").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Rp 1.234.567"));
    assert!(body.contains(">120<"));
    assert!(body.contains("Pemohon 1"));
    assert!(body.contains("01/05/2024 10.00"));
}

#[tokio::test]
async fn dashboard_degrades_when_backend_fails() {
    let app = common::spawn_app().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/dashboard-stats"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/submissions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.backend)
        .await;

    let resp = app.get_as("/dashboard", "admin_wilayah").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Rp 0"));
    assert!(body.contains("Belum ada aktivitas"));
    assert!(body.contains("Belum ada transaksi"));
}

#[tokio::test]
async fn citizens_cannot_open_admin_pages() {
    let app = common::spawn_app().await;

    for page in ["/dashboard", "/umkm", "/users", "/umkm/export"] {
        let resp = app.get_as(page, "user").await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{page}");
        assert!(resp.text().await.unwrap().contains("khusus administrator"));
    }
}

// ── Category pages ──────────────────────────────────────────────

#[tokio::test]
async fn unknown_category_is_not_found() {
    let app = common::spawn_app().await;

    let resp = app.get_as("/pertanian", "super_admin").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn category_page_paginates_its_own_program() {
    let app = common::spawn_app().await;
    app.mock_admin_submissions(umkm_fixture()).await;

    let body = app.get_as("/umkm", "super_admin").await.text().await.unwrap();
    assert_eq!(count(&body, r#"class="btn-detail""#), 10);
    assert!(body.contains(r#"class="pagination""#));
    assert!(!body.contains("Pemohon 90"));
    assert!(body.contains("Usaha 1<"));

    let body = app
        .get_as("/umkm?page=3", "super_admin")
        .await
        .text()
        .await
        .unwrap();
    assert_eq!(count(&body, r#"class="btn-detail""#), 5);
    assert!(body.contains("<td>21</td>"));

    // Past the end clamps to the last page
    let body = app
        .get_as("/umkm?page=99", "super_admin")
        .await
        .text()
        .await
        .unwrap();
    assert_eq!(count(&body, r#"class="btn-detail""#), 5);
}

#[tokio::test]
async fn odd_timestamps_keep_the_other_rows() {
    let app = common::spawn_app().await;

    let mut naive = submission(2, "UMKM", "review");
    naive["CreatedAt"] = json!("2024-05-01 10:00:00");
    let mut blank = submission(3, "UMKM", "review");
    blank["CreatedAt"] = json!("");
    app.mock_admin_submissions(vec![submission(1, "UMKM", "review"), naive, blank])
        .await;

    let resp = app.get_as("/umkm", "super_admin").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert_eq!(count(&body, r#"class="btn-detail""#), 3);
    assert!(!body.contains("Tidak ada data"));
}

#[tokio::test]
async fn unreadable_listing_is_an_alert_not_an_empty_table() {
    let app = common::spawn_app().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/submissions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": 5 })))
        .mount(&app.backend)
        .await;

    let resp = app.get_as("/umkm", "super_admin").await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Data dari server tidak dapat dibaca"));
    assert!(!body.contains("Tidak ada data"));
}

#[tokio::test]
async fn failing_listing_still_degrades_to_empty() {
    let app = common::spawn_app().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/submissions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.backend)
        .await;

    let resp = app.get_as("/umkm", "super_admin").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Tidak ada data"));
}

#[tokio::test]
async fn review_filter_shows_exactly_the_review_subset() {
    let app = common::spawn_app().await;
    app.mock_admin_submissions(umkm_fixture()).await;

    let body = app
        .get_as("/umkm?status=review", "super_admin")
        .await
        .text()
        .await
        .unwrap();
    assert_eq!(count(&body, r#"class="btn-detail""#), 10);
    assert!(!body.contains(r#"class="pagination""#));
    assert!(body.contains("Pemohon 7<"));
    assert!(!body.contains("Pemohon 11<"));
}

#[tokio::test]
async fn empty_category_renders_single_no_data_row() {
    let app = common::spawn_app().await;
    app.mock_admin_submissions(vec![submission(1, "UMKM", "review")])
        .await;

    let body = app
        .get_as("/sosial", "super_admin")
        .await
        .text()
        .await
        .unwrap();
    assert_eq!(count(&body, r#"class="no-data""#), 1);
    assert!(body.contains("Tidak ada data"));
    assert!(!body.contains(r#"class="pagination""#));
}

#[tokio::test]
async fn detail_modal_offers_transitions_for_open_records() {
    let app = common::spawn_app().await;
    app.mock_admin_submissions(vec![
        submission(3, "UMKM", "review"),
        submission(4, "UMKM", "disetujui"),
        submission(5, "UMKM", "validasi berkas"),
    ])
    .await;

    let body = app
        .get_as("/umkm?detail=3", "super_admin")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Detail Pengajuan UMKM"));
    assert!(body.contains("Jl. Merdeka"));
    assert!(body.contains(r#"action="/umkm/3/status""#));
    for key in ["validasi", "setujui", "tolak"] {
        assert!(body.contains(&format!(r#"name="action" value="{key}""#)), "{key}");
    }

    let body = app
        .get_as("/umkm?detail=5", "admin_wilayah")
        .await
        .text()
        .await
        .unwrap();
    assert!(!body.contains(r#"value="validasi""#));
    assert!(body.contains(r#"value="setujui""#));

    let body = app
        .get_as("/umkm?detail=4", "super_admin")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Detail Pengajuan UMKM"));
    assert!(!body.contains(r#"name="action""#));
}

#[tokio::test]
async fn validasi_posts_fixed_payload_and_reloads_list() {
    let app = common::spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/admin/submissions/7/status"))
        .and(header("Authorization", "Bearer test-token"))
        .and(body_json(json!({
            "status": "validasi berkas",
            "notes": "Berkas telah divalidasi",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&app.backend)
        .await;

    let resp = app
        .post_form_as(
            "/umkm/7/status",
            "super_admin",
            &[("action", "validasi"), ("status", "review"), ("page", "1")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp),
        "/umkm?status=review&notice=Status+berhasil+diubah+menjadi+validasi+berkas"
    );
}

#[tokio::test]
async fn approve_and_reject_post_indonesian_statuses() {
    let app = common::spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/admin/submissions/8/status"))
        .and(body_json(json!({ "status": "disetujui", "notes": "Pengajuan disetujui" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/admin/submissions/9/status"))
        .and(body_json(json!({ "status": "ditolak", "notes": "Pengajuan ditolak" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.backend)
        .await;

    let resp = app
        .post_form_as("/hukum/8/status", "admin_wilayah", &[("action", "setujui")])
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(location(&resp).starts_with("/hukum?notice="));

    let resp = app
        .post_form_as("/hukum/9/status", "admin_wilayah", &[("action", "tolak")])
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn failed_transition_shows_alert() {
    let app = common::spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/admin/submissions/7/status"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.backend)
        .await;

    let resp = app
        .post_form_as("/umkm/7/status", "super_admin", &[("action", "validasi")])
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert!(resp.text().await.unwrap().contains("Gagal mengubah status"));

    let resp = app
        .post_form_as("/umkm/7/status", "super_admin", &[("action", "hapus")])
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn export_reflects_the_filtered_subset() {
    let app = common::spawn_app().await;
    app.mock_admin_submissions(umkm_fixture()).await;

    let resp = app
        .get_as("/umkm/export?status=approved&format=csv", "super_admin")
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[CONTENT_DISPOSITION],
        r#"attachment; filename="umkm.csv""#
    );
    let body = resp.text().await.unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 1 + 5);
    assert_eq!(
        lines[0],
        "No,Tanggal,Nama,Email,Nama Usaha,Jenis Usaha,Alamat Usaha,Kebutuhan Bantuan,Status"
    );
    assert!(lines[1].starts_with("1,01/05/2024 10.00,Pemohon 16,"));

    let resp = app
        .get_as("/umkm/export?status=review", "super_admin")
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let bytes = resp.bytes().await.unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[tokio::test]
async fn export_of_nothing_is_refused() {
    let app = common::spawn_app().await;
    app.mock_admin_submissions(vec![submission(1, "UMKM", "review")])
        .await;

    let resp = app
        .get_as("/umkm/export?status=rejected", "super_admin")
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(resp.text().await.unwrap().contains("Tidak ada data"));
}

// ── User management ─────────────────────────────────────────────

fn users_fixture() -> Vec<Value> {
    vec![
        user(1, "Budi Admin", "super_admin"),
        user(2, "Rina Wilayah", "admin_wilayah"),
        user(3, "Siti Warga", "user"),
        user(4, "Budi Warga", "user"),
    ]
}

#[tokio::test]
async fn users_page_filters_by_role_and_search() {
    let app = common::spawn_app().await;
    app.mock_users(users_fixture()).await;

    let body = app.get_as("/users", "super_admin").await.text().await.unwrap();
    assert_eq!(count(&body, r#"class="btn-detail""#), 4);

    let body = app
        .get_as("/users?role=admin_wilayah", "super_admin")
        .await
        .text()
        .await
        .unwrap();
    assert_eq!(count(&body, r#"class="btn-detail""#), 1);
    assert!(body.contains("Rina Wilayah"));

    let body = app
        .get_as("/users?q=budi", "admin_wilayah")
        .await
        .text()
        .await
        .unwrap();
    assert_eq!(count(&body, r#"class="btn-detail""#), 2);
}

#[tokio::test]
async fn only_super_admin_gets_the_edit_form() {
    let app = common::spawn_app().await;
    app.mock_users(users_fixture()).await;

    let body = app
        .get_as("/users?detail=3", "super_admin")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Detail User"));
    assert!(body.contains(r#"<select id="role" name="role">"#));

    let body = app
        .get_as("/users?detail=3", "admin_wilayah")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Detail User"));
    assert!(!body.contains("<select"));
}

#[tokio::test]
async fn super_admin_updates_role_and_region() {
    let app = common::spawn_app().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/admin/users/3"))
        .and(body_json(json!({ "role": "admin_wilayah", "wilayah_tugas": "Serang" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&app.backend)
        .await;

    let resp = app
        .post_form_as(
            "/users/3",
            "super_admin",
            &[("role", "admin_wilayah"), ("wilayah_tugas", " Serang ")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/users?notice=Data+user+berhasil+diperbarui");
}

#[tokio::test]
async fn role_update_is_validated_and_restricted() {
    let app = common::spawn_app().await;

    let resp = app
        .post_form_as("/users/3", "admin_wilayah", &[("role", "user")])
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app
        .post_form_as("/users/3", "super_admin", &[("role", "admin_wilayah")])
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(resp.text().await.unwrap().contains("Wilayah tugas wajib diisi"));

    let resp = app
        .post_form_as("/users/3", "super_admin", &[("role", "root")])
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn users_export_uses_filtered_set() {
    let app = common::spawn_app().await;
    app.mock_users(users_fixture()).await;

    let resp = app
        .get_as("/users/export?role=user&format=csv", "super_admin")
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[CONTENT_DISPOSITION],
        r#"attachment; filename="manajemen_user.csv""#
    );
    let body = resp.text().await.unwrap();
    assert_eq!(body.lines().count(), 3);
    assert!(body.contains("Siti Warga"));
    assert!(!body.contains("Rina Wilayah"));
}

// ── Citizen pages ───────────────────────────────────────────────

#[tokio::test]
async fn home_shows_verification_banner_and_services() {
    let app = common::spawn_app().await;

    let mut profile = user(3, "Siti Warga", "user");
    profile["email_verified_at"] = Value::Null;
    app.mock_profile(profile).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/submissions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&app.backend)
        .await;

    let resp = app.get_as("/beranda", "user").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Halo, Siti Warga"));
    assert!(body.contains("belum terverifikasi"));
    for slug in ["umkm", "pendidikan", "kesehatan", "hukum", "sosial"] {
        assert!(body.contains(&format!("/pengajuan/{slug}")), "{slug}");
    }
}

#[tokio::test]
async fn verified_citizen_sees_no_banner() {
    let app = common::spawn_app().await;

    let mut profile = user(3, "Siti Warga", "user");
    profile["email_verified_at"] = json!("2024-01-01T00:00:00Z");
    app.mock_profile(profile).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/submissions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.backend)
        .await;

    let body = app.get_as("/beranda", "user").await.text().await.unwrap();
    assert!(!body.contains("belum terverifikasi"));
    assert!(body.contains("Belum ada pengajuan."));
}

#[tokio::test]
async fn resend_verification_reports_backend_message() {
    let app = common::spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/user/resend-verification"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Email terkirim" })),
        )
        .expect(1)
        .mount(&app.backend)
        .await;

    let resp = app
        .post_form_as("/beranda/resend-verification", "user", &[])
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/beranda?notice=Email+terkirim");
}

#[tokio::test]
async fn submission_form_lists_program_fields() {
    let app = common::spawn_app().await;

    let resp = app.get_as("/pengajuan/hukum", "user").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Formulir Bantuan Hukum"));
    assert!(body.contains(r#"name="Uraian Singkat Masalah""#));
    assert!(body.contains(r#"name="Pihak Terkait""#));
    assert!(body.contains(r#"enctype="multipart/form-data""#));

    let resp = app.get_as("/pengajuan/pertanian", "user").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn incomplete_submission_is_rejected_inline() {
    let app = common::spawn_app().await;

    let form = Form::new()
        .percent_encode_noop()
        .text("Nama Usaha", "Warung Siti")
        .text("Jenis Usaha", "")
        .text("Alamat Usaha", "Jl. Merdeka")
        .text("Uraian Kebutuhan Bantuan", "Modal");

    let resp = app
        .client
        .post(app.url("/pengajuan/umkm"))
        .header(COOKIE, common::session_cookie("user"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Jenis Usaha (Kuliner, Fashion, dll) wajib diisi."));
    assert!(body.contains(r#"value="Warung Siti""#));
    assert!(app.backend.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn complete_submission_is_forwarded_with_document() {
    let app = common::spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/submissions/"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "message": "Pengajuan diterima" })),
        )
        .expect(1)
        .mount(&app.backend)
        .await;

    let document = Part::bytes(b"%PDF-1.4 test".to_vec())
        .file_name("proposal.pdf")
        .mime_str("application/pdf")
        .unwrap();
    let form = Form::new()
        .percent_encode_noop()
        .text("Nama Usaha", "Warung Siti")
        .text("Jenis Usaha", "Kuliner")
        .text("Alamat Usaha", "Jl. Merdeka")
        .text("Uraian Kebutuhan Bantuan", "Modal")
        .part("document", document);

    let resp = app
        .client
        .post(app.url("/pengajuan/umkm"))
        .header(COOKIE, common::session_cookie("user"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/aktivitas?notice=Pengajuan+diterima");

    let requests = app.backend.received_requests().await.unwrap();
    let forwarded = String::from_utf8_lossy(&requests[0].body);
    assert!(forwarded.contains(r#"name="type""#));
    assert!(forwarded.contains("UMKM"));
    assert!(forwarded.contains(r#"name="form_data""#));
    assert!(forwarded.contains(r#""Nama Usaha":"Warung Siti""#));
    assert!(forwarded.contains(r#"filename="proposal.pdf""#));
}

#[tokio::test]
async fn activity_lists_own_submissions_newest_first() {
    let app = common::spawn_app().await;

    let mut older = submission(9, "UMKM", "review");
    older["CreatedAt"] = json!("2024-04-01T03:00:00Z");
    let newer = submission(12, "Kesehatan", "disetujui");
    Mock::given(method("GET"))
        .and(path("/api/v1/submissions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([older, newer])))
        .mount(&app.backend)
        .await;

    let body = app.get_as("/aktivitas", "user").await.text().await.unwrap();
    let newer_at = body.find("/aktivitas/12").expect("newer listed");
    let older_at = body.find("/aktivitas/9").expect("older listed");
    assert!(newer_at < older_at);
}

#[tokio::test]
async fn activity_detail_shows_timeline() {
    let app = common::spawn_app().await;

    let mut record = submission(9, "UMKM", "validasi berkas");
    record["FormData"]["document_path"] = json!("uploads/docs/proposal.pdf");
    record["StatusHistories"] = json!([
        { "ID": 1, "Status": "review", "Notes": "", "CreatedAt": "2024-05-01T03:00:00Z" },
        { "ID": 2, "Status": "validasi berkas", "Notes": "Berkas telah divalidasi", "CreatedAt": "2024-05-02T03:00:00Z" },
    ]);
    Mock::given(method("GET"))
        .and(path("/api/v1/submissions/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record))
        .mount(&app.backend)
        .await;

    let body = app.get_as("/aktivitas/9", "user").await.text().await.unwrap();
    assert!(body.contains("Detail Pengajuan UMKM"));
    assert!(body.contains("Warung") || body.contains("Usaha 9"));
    assert!(body.contains("Berkas telah divalidasi"));
    assert!(body.contains(r#"href="/files/proposal.pdf""#));
    assert!(!body.contains("document_path"));
    assert!(!body.contains("Belum ada riwayat status."));
}

#[tokio::test]
async fn activity_detail_without_history() {
    let app = common::spawn_app().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/submissions/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(submission(9, "Sosial", "review")))
        .mount(&app.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/submissions/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&app.backend)
        .await;

    let body = app.get_as("/aktivitas/9", "user").await.text().await.unwrap();
    assert!(body.contains("Belum ada riwayat status."));

    let resp = app.get_as("/aktivitas/404", "user").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.text().await.unwrap().contains("pengajuan tidak ditemukan"));
}

#[tokio::test]
async fn activity_detail_tolerates_null_history_status() {
    let app = common::spawn_app().await;

    let mut record = submission(9, "UMKM", "review");
    record["StatusHistories"] = json!([
        { "ID": 1, "Status": null, "Notes": "Menunggu verifikasi", "CreatedAt": "2024-05-01 03:00:00" },
    ]);
    Mock::given(method("GET"))
        .and(path("/api/v1/submissions/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record))
        .mount(&app.backend)
        .await;

    let resp = app.get_as("/aktivitas/9", "user").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Menunggu verifikasi"));
    assert!(!body.contains("Belum ada riwayat status."));
}

#[tokio::test]
async fn profile_masks_linked_card() {
    let app = common::spawn_app().await;

    let mut profile = user(3, "Siti Warga", "user");
    profile["card_uid"] = json!("04AB9C1234");
    profile["kelurahan"] = Value::Null;
    app.mock_profile(profile).await;

    let body = app.get_as("/profil", "user").await.text().await.unwrap();
    assert!(body.contains("****1234"));
    assert!(!body.contains("04AB9C1234"));
    assert!(body.contains("Kelurahan/Desa"));
}

#[tokio::test]
async fn profile_without_card() {
    let app = common::spawn_app().await;

    let mut profile = user(3, "Siti Warga", "user");
    profile["card_uid"] = Value::Null;
    app.mock_profile(profile).await;

    let body = app.get_as("/profil", "user").await.text().await.unwrap();
    assert!(body.contains("Belum Terhubung"));
}

// ── Files ───────────────────────────────────────────────────────

#[tokio::test]
async fn pdf_documents_open_inline() {
    let app = common::spawn_app().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/files/laporan.pdf"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"),
        )
        .mount(&app.backend)
        .await;

    let resp = app.get_as("/files/laporan.pdf", "super_admin").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[CONTENT_TYPE], "application/pdf");
    assert_eq!(
        resp.headers()[CONTENT_DISPOSITION],
        r#"inline; filename="laporan.pdf""#
    );
    assert_eq!(resp.bytes().await.unwrap().as_ref(), b"%PDF-1.4");
}

#[tokio::test]
async fn other_documents_download_as_attachment() {
    let app = common::spawn_app().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/files/foto.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0xFF, 0xD8], "image/jpeg"))
        .mount(&app.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/files/hilang.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&app.backend)
        .await;

    let resp = app.get_as("/files/foto.jpg", "super_admin").await;
    assert_eq!(
        resp.headers()[CONTENT_DISPOSITION],
        r#"attachment; filename="foto.jpg""#
    );

    let resp = app.get_as("/files/hilang.pdf", "super_admin").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.text().await.unwrap().contains("Gagal mengunduh file"));
}

#[tokio::test]
async fn pdf_is_typed_as_pdf_whatever_the_backend_says() {
    let app = common::spawn_app().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/files/scan.PDF"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"%PDF-1.4".to_vec(), "application/octet-stream"),
        )
        .mount(&app.backend)
        .await;

    let resp = app.get_as("/files/scan.PDF", "super_admin").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[CONTENT_TYPE], "application/pdf");
    assert_eq!(
        resp.headers()[CONTENT_DISPOSITION],
        r#"inline; filename="scan.PDF""#
    );
}

#[tokio::test]
async fn submission_limit_is_omitted_by_default() {
    // The default test config omits it; the backend must not see a limit.
    let app = common::spawn_app().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/submissions"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&app.backend)
        .await;
    app.mock_admin_submissions(vec![submission(1, "UMKM", "review")])
        .await;

    let resp = app.get_as("/umkm", "super_admin").await;
    assert_eq!(resp.status(), StatusCode::OK);
}
