use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderMap;
use chrono::{TimeZone, Utc};
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;

use crate::clock::ManualClock;
use crate::config::{Config, GuardConfig};
use crate::guard::CaptchaVerifier;

/// Admin login used by [`TestApp`].
pub const TEST_ADMIN_EMAIL: &str = "admin@example.com";
pub const TEST_ADMIN_PASSWORD: &str = "correct-horse-battery";

/// A test application builder for integration testing.
///
/// Spins up a Folio server on a random port with an in-memory SQLite
/// database and a manual clock, so throttling windows can be crossed
/// without sleeping.
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_health() {
///     let app = TestApp::new().await;
///     let res = app.client.get(&app.url("/api/health")).await;
///     assert_eq!(res.status, 200);
/// }
/// ```
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: TestClient,
    pub db: DatabaseConnection,
    pub config: Config,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    /// Create a new test app with the default test config.
    pub async fn new() -> Self {
        Self::with_config(Self::test_config()).await
    }

    /// Config used by [`new`](Self::new): admin credentials set, captcha
    /// off, a private upload dir and the timing check disabled so tests can
    /// post immediately.
    pub fn test_config() -> Config {
        let upload_dir = std::env::temp_dir().join(format!("folio-test-{}", uuid::Uuid::new_v4()));

        Config {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-secret-key-for-testing".to_string(),
            jwt_expiry_minutes: 60,
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            environment: "test".to_string(),
            admin_user: TEST_ADMIN_EMAIL.to_string(),
            admin_password: Some(TEST_ADMIN_PASSWORD.to_string()),
            admin_password_hash: None,
            allowed_origins: vec!["http://localhost:5173".to_string()],
            trust_proxy_headers: true,
            upload_dir: upload_dir.to_string_lossy().into_owned(),
            max_upload_size: 1024 * 1024,
            guard: GuardConfig {
                contact_min_submit_secs: 0,
                ..GuardConfig::default()
            },
        }
    }

    /// Create a new test app with a custom config.
    pub async fn with_config(config: Config) -> Self {
        Self::build(config, None).await
    }

    /// Create a test app whose contact form uses `verifier` for captcha checks.
    pub async fn with_captcha(config: Config, verifier: Arc<dyn CaptchaVerifier>) -> Self {
        Self::build(config, Some(verifier)).await
    }

    async fn build(config: Config, captcha: Option<Arc<dyn CaptchaVerifier>>) -> Self {
        let start = Utc
            .with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
            .single()
            .expect("valid start time");
        let clock = Arc::new(ManualClock::new(start));

        let mut app = crate::App::with_config(config)
            .await
            .expect("Failed to create test app")
            .with_clock(clock.clone());
        if let Some(verifier) = captcha {
            app = app.with_captcha(verifier);
        }

        let router = app.router();
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to get local addr");

        tokio::spawn(async move {
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        TestApp {
            addr,
            client: TestClient::new(addr),
            db: app.db,
            config: app.config,
            clock,
        }
    }

    /// Get the base URL for the test server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Log in with the test admin credentials and return the token.
    pub async fn login_admin(&self) -> String {
        let body = serde_json::json!({
            "email": TEST_ADMIN_EMAIL,
            "password": TEST_ADMIN_PASSWORD,
        });

        let res = self
            .client
            .post(&self.url("/api/admin/login"), &body.to_string())
            .await;

        assert_eq!(res.status, 200, "Login failed: {}", res.body);
        res.data()["token"].as_str().unwrap().to_string()
    }
}

/// A simple HTTP test client with helper methods.
#[derive(Clone)]
pub struct TestClient {
    inner: reqwest::Client,
    base_addr: SocketAddr,
}

impl TestClient {
    /// Create a new test client pointing at the given address.
    pub fn new(addr: SocketAddr) -> Self {
        TestClient {
            inner: reqwest::Client::new(),
            base_addr: addr,
        }
    }

    /// Send a GET request.
    pub async fn get(&self, url: &str) -> TestResponse {
        let res = self
            .inner
            .get(url)
            .send()
            .await
            .expect("GET request failed");
        TestResponse::from_response(res).await
    }

    /// Send a GET request with an auth token.
    pub async fn get_with_auth(&self, url: &str, token: &str) -> TestResponse {
        let res = self
            .inner
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .expect("GET request failed");
        TestResponse::from_response(res).await
    }

    /// Send a POST request with a JSON body.
    pub async fn post(&self, url: &str, body: &str) -> TestResponse {
        self.post_with_headers(url, body, &[]).await
    }

    /// Send a POST request with a JSON body and extra headers.
    pub async fn post_with_headers(
        &self,
        url: &str,
        body: &str,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut req = self
            .inner
            .post(url)
            .header("Content-Type", "application/json")
            .body(body.to_string());
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let res = req.send().await.expect("POST request failed");
        TestResponse::from_response(res).await
    }

    /// Send a POST request with auth token and JSON body.
    pub async fn post_with_auth(&self, url: &str, token: &str, body: &str) -> TestResponse {
        let res = self
            .inner
            .post(url)
            .header("Content-Type", "application/json")
            .bearer_auth(token)
            .body(body.to_string())
            .send()
            .await
            .expect("POST request failed");
        TestResponse::from_response(res).await
    }

    /// Send a PUT request with auth token and JSON body.
    pub async fn put_with_auth(&self, url: &str, token: &str, body: &str) -> TestResponse {
        let res = self
            .inner
            .put(url)
            .header("Content-Type", "application/json")
            .bearer_auth(token)
            .body(body.to_string())
            .send()
            .await
            .expect("PUT request failed");
        TestResponse::from_response(res).await
    }

    /// Send a DELETE request with auth token.
    pub async fn delete_with_auth(&self, url: &str, token: &str) -> TestResponse {
        let res = self
            .inner
            .delete(url)
            .bearer_auth(token)
            .send()
            .await
            .expect("DELETE request failed");
        TestResponse::from_response(res).await
    }

    /// Upload one file as a multipart form.
    pub async fn upload_with_auth(
        &self,
        url: &str,
        token: &str,
        field: &str,
        filename: &str,
        data: Vec<u8>,
    ) -> TestResponse {
        let part = reqwest::multipart::Part::bytes(data).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part(field.to_string(), part);

        let res = self
            .inner
            .post(url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .expect("upload request failed");
        TestResponse::from_response(res).await
    }

    /// Get the base URL.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.base_addr)
    }
}

/// A simplified HTTP response for test assertions.
#[derive(Debug)]
pub struct TestResponse {
    pub status: u16,
    pub body: String,
    pub bytes: Vec<u8>,
    pub headers: HeaderMap,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let headers = res.headers().clone();
        let bytes = res.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        TestResponse {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
            bytes,
            headers,
        }
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("Failed to parse response as JSON")
    }

    /// Check if the response indicates success.
    pub fn is_success(&self) -> bool {
        self.json()["success"].as_bool().unwrap_or(false)
    }

    /// Get the data field from the response.
    pub fn data(&self) -> serde_json::Value {
        self.json()["data"].clone()
    }

    /// Get the error field from the response.
    pub fn error(&self) -> serde_json::Value {
        self.json()["error"].clone()
    }

    /// A response header as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
