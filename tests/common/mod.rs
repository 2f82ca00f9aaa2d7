#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ideadrop::config::{Config, FeishuConfig, Timeouts};
use ideadrop::submission::limits::Limits;

pub const APP_TOKEN: &str = "bascnTestAppToken";
pub const TABLE_ID: &str = "tblTestTable";
pub const ACCESS_TOKEN: &str = "t-test-tenant-token";

pub const TOKEN_PATH: &str = "/auth/v3/tenant_access_token/internal";
pub const UPLOAD_PATH: &str = "/drive/v1/medias/upload_all";

pub fn record_path() -> String {
    format!("/bitable/v1/apps/{APP_TOKEN}/tables/{TABLE_ID}/records")
}

/// A running app instance wired to a mocked Bitable backend.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub backend: MockServer,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Post a multipart submission, return (body, status).
    pub async fn submit(
        &self,
        nickname: &str,
        contact: &str,
        idea: &str,
        files: &[(&str, Vec<u8>)],
    ) -> (Value, StatusCode) {
        let mut form = Form::new()
            .text("nickname", nickname.to_string())
            .text("contact", contact.to_string())
            .text("idea", idea.to_string());
        for (name, bytes) in files {
            form = form.part("files", Part::bytes(bytes.clone()).file_name(name.to_string()));
        }

        let resp = self
            .client
            .post(self.url("/api/submit-idea"))
            .multipart(form)
            .send()
            .await
            .expect("submit request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Token endpoint answers with a valid tenant token.
    pub async fn mock_token_ok(&self) {
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "msg": "ok",
                "tenant_access_token": ACCESS_TOKEN,
                "expire": 7200
            })))
            .expect(1)
            .mount(&self.backend)
            .await;
    }

    /// Upload endpoint hands out `ftok_1`, `ftok_2`, ... in call order.
    pub async fn mock_uploads_ok(&self, expected_calls: u64) {
        let counter = Arc::new(AtomicUsize::new(0));
        Mock::given(method("POST"))
            .and(path(UPLOAD_PATH))
            .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
            .respond_with(move |_req: &wiremock::Request| {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                ResponseTemplate::new(200).set_body_json(json!({
                    "code": 0,
                    "msg": "success",
                    "data": { "file_token": format!("ftok_{n}") }
                }))
            })
            .expect(expected_calls)
            .mount(&self.backend)
            .await;
    }

    /// Record endpoint accepts exactly `expected_calls` creations.
    pub async fn mock_record_ok(&self, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path(record_path()))
            .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "msg": "success",
                "data": { "record": { "record_id": "recTest01", "fields": {} } }
            })))
            .expect(expected_calls)
            .mount(&self.backend)
            .await;
    }

    pub async fn expect_no_uploads(&self) {
        Mock::given(method("POST"))
            .and(path(UPLOAD_PATH))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.backend)
            .await;
    }

    pub async fn expect_no_records(&self) {
        Mock::given(method("POST"))
            .and(path(record_path()))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.backend)
            .await;
    }

    pub async fn expect_no_token(&self) {
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.backend)
            .await;
    }
}

pub fn test_config(backend_url: &str) -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        log_level: "warn".to_string(),
        max_body_size: 16 * 1024 * 1024,
        feishu: FeishuConfig {
            base_url: backend_url.to_string(),
            app_id: "cli_test_app".to_string(),
            app_secret: "test-app-secret".to_string(),
            app_token: APP_TOKEN.to_string(),
            table_id: TABLE_ID.to_string(),
        },
        proxy_url: None,
        timeouts: Timeouts::default(),
        limits: Limits::default(),
        enforce_limits: true,
    }
}

/// Spawn the app with the default test config.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawn the app after letting the caller adjust the config.
pub async fn spawn_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let backend = MockServer::start().await;

    let mut config = test_config(&backend.uri());
    customize(&mut config);

    let app = ideadrop::build_app(config).expect("Failed to build app");

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::builder().no_proxy().build().unwrap(),
        backend,
    }
}
