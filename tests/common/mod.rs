use std::net::SocketAddr;
use std::time::Duration;

use reqwest::header::COOKIE;
use reqwest::{Client, Response};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aspirasi::config::Config;

/// Bearer token every test session carries.
pub const TOKEN: &str = "test-token";

/// A running portal wired to a mock backend.
pub struct TestApp {
    pub addr: SocketAddr,
    pub backend: MockServer,
    pub client: Client,
}

#[allow(dead_code)]
impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// GET without any session cookie.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed")
    }

    /// GET as a logged-in user with the given cached role.
    pub async fn get_as(&self, path: &str, role: &str) -> Response {
        self.client
            .get(self.url(path))
            .header(COOKIE, session_cookie(role))
            .send()
            .await
            .expect("get request failed")
    }

    /// Form POST as a logged-in user.
    pub async fn post_form_as(&self, path: &str, role: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .header(COOKIE, session_cookie(role))
            .form(form)
            .send()
            .await
            .expect("post request failed")
    }

    /// Form POST without a session (auth pages).
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("post request failed")
    }

    /// Backend admin listing returns `items`.
    pub async fn mock_admin_submissions(&self, items: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/api/v1/admin/submissions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(items)))
            .mount(&self.backend)
            .await;
    }

    /// Backend user listing returns `users`.
    pub async fn mock_users(&self, users: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/api/v1/admin/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(users)))
            .mount(&self.backend)
            .await;
    }

    /// Backend profile endpoint returns `profile`.
    pub async fn mock_profile(&self, profile: Value) {
        Mock::given(method("GET"))
            .and(path("/api/v1/user/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile))
            .mount(&self.backend)
            .await;
    }
}

pub fn session_cookie(role: &str) -> String {
    format!("token={TOKEN}; role={role}; wilayah=Serang")
}

/// A backend submission record.
#[allow(dead_code)]
pub fn submission(id: u32, kind: &str, status: &str) -> Value {
    json!({
        "ID": id,
        "Type": kind,
        "Status": status,
        "CreatedAt": "2024-05-01T03:00:00Z",
        "FormData": {
            "Nama Usaha": format!("Usaha {id}"),
            "Jenis Usaha": "Kuliner",
            "Alamat Usaha": "Jl. Merdeka",
            "Uraian Kebutuhan Bantuan": "Modal",
        },
        "User": { "full_name": format!("Pemohon {id}"), "email": format!("p{id}@mail.test") },
        "StatusHistories": [],
    })
}

/// A backend user record.
#[allow(dead_code)]
pub fn user(id: u32, name: &str, role: &str) -> Value {
    json!({
        "ID": id,
        "card_uid": format!("CARD{id:04}"),
        "full_name": name,
        "email": format!("{}@mail.test", name.to_lowercase().replace(' ', ".")),
        "phone": "0812",
        "role": role,
        "provinsi": "Banten",
        "kabupaten": "Serang",
        "kecamatan": "Cipocok Jaya",
        "kelurahan": "Banjarsari",
    })
}

/// Occurrences of `needle` in `haystack`; rows are counted by their Detail link.
#[allow(dead_code)]
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

pub async fn spawn_app() -> TestApp {
    let backend = MockServer::start().await;

    let config = Config {
        api_base_url: backend.uri(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        page_size: 10,
        submission_limit: None,
        api_timeout: Duration::from_secs(5),
        utc_offset_hours: 7,
        secure_cookies: false,
        log_level: "warn".to_string(),
    };

    let app = aspirasi::build_app(config);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        backend,
        client,
    }
}
