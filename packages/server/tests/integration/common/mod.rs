use std::net::SocketAddr;
use std::sync::Arc;

use ::common::DocumentSynthesizer;
use reqwest::Client;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::Value;
use tempfile::TempDir;

use pdf2xml_server::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, LogConfig, ServerConfig, UploadConfig,
};
use pdf2xml_server::entity::user;
use pdf2xml_server::state::AppState;

pub const TEST_JWT_SECRET: &str = "test-secret-for-integration-tests";

pub mod routes {
    pub const REGISTER: &str = "/api/v1/auth/register";
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const ME: &str = "/api/v1/auth/me";
    pub const CONVERSIONS: &str = "/api/v1/conversions";
    pub const OPENAPI: &str = "/api-docs/openapi.json";

    pub fn conversion(id: i32) -> String {
        format!("/api/v1/conversions/{id}")
    }

    pub fn conversion_download(id: i32) -> String {
        format!("/api/v1/conversions/{id}/download")
    }
}

/// A SQLite database in its own temporary directory, schema already synced.
///
/// The directory is removed when this value is dropped.
pub struct TestDb {
    pub db: DatabaseConnection,
    pub url: String,
    _dir: TempDir,
}

pub async fn fresh_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
    let config = DatabaseConfig {
        url: url.clone(),
        max_connections: 5,
        min_connections: 1,
    };
    let db = pdf2xml_server::database::init_db(&config)
        .await
        .expect("Failed to initialize test database");

    TestDb { db, url, _dir: dir }
}

/// Insert a user row directly, bypassing the API. Returns its id.
pub async fn insert_user(db: &DatabaseConnection, username: &str) -> i32 {
    let model = user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        password: Set("not-a-real-hash".to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    model.insert(db).await.expect("Failed to insert user").id
}

fn test_config(db_url: &str, max_file_size: u64) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig {
                allow_origins: vec![],
                max_age: 3600,
            },
        },
        database: DatabaseConfig {
            url: db_url.to_string(),
            max_connections: 5,
            min_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            token_ttl_hours: 1,
        },
        upload: UploadConfig { max_file_size },
        log: LogConfig::default(),
    }
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    _store: TestDb,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
    pub headers: reqwest::header::HeaderMap,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_max_file_size(UploadConfig::default().max_file_size).await
    }

    pub async fn spawn_with_max_file_size(max_file_size: u64) -> Self {
        Self::start(max_file_size, None).await
    }

    /// Spawn with a custom synthesizer in place of the XML template.
    pub async fn spawn_with_synthesizer(synthesizer: Arc<dyn DocumentSynthesizer>) -> Self {
        Self::start(UploadConfig::default().max_file_size, Some(synthesizer)).await
    }

    async fn start(max_file_size: u64, synthesizer: Option<Arc<dyn DocumentSynthesizer>>) -> Self {
        let store = fresh_db().await;
        let db = store.db.clone();
        let config = test_config(&store.url, max_file_size);
        let state = match synthesizer {
            Some(synthesizer) => AppState::with_synthesizer(db.clone(), config, synthesizer),
            None => AppState::new(db.clone(), config),
        };

        let app = pdf2xml_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            _store: store,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// Upload `file_bytes` as the multipart `file` field.
    pub async fn upload_with_token(
        &self,
        file_name: &str,
        file_bytes: Vec<u8>,
        token: &str,
    ) -> TestResponse {
        let part = reqwest::multipart::Part::bytes(file_bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .expect("Failed to set MIME type");
        // Send the filename as-is rather than percent-encoded.
        let form = reqwest::multipart::Form::new()
            .percent_encode_noop()
            .part("file", part);

        self.send_form(form, Some(token)).await
    }

    pub async fn send_form(
        &self,
        form: reqwest::multipart::Form,
        token: Option<&str>,
    ) -> TestResponse {
        let mut req = self.client.post(self.url(routes::CONVERSIONS)).multipart(form);
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        let res = req
            .send()
            .await
            .expect("Failed to send multipart upload request");

        TestResponse::from_response(res).await
    }

    /// Upload a PDF and return the new conversion's `id`.
    pub async fn convert(&self, file_name: &str, file_bytes: Vec<u8>, token: &str) -> i32 {
        let res = self.upload_with_token(file_name, file_bytes, token).await;
        assert_eq!(res.status, 201, "Upload failed: {}", res.text);
        res.id()
    }

    /// Register a user (email `<username>@example.com`) and log in, returning the auth token.
    pub async fn create_authenticated_user(&self, username: &str, password: &str) -> String {
        let email = format!("{username}@example.com");
        let reg = self
            .post_without_token(
                routes::REGISTER,
                &serde_json::json!({
                    "username": username,
                    "email": email,
                    "password": password,
                }),
            )
            .await;
        assert_eq!(reg.status, 201, "Registration failed: {}", reg.text);

        let res = self
            .post_without_token(
                routes::LOGIN,
                &serde_json::json!({"email": email, "password": password}),
            )
            .await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);

        res.body["token"]
            .as_str()
            .expect("Login response should contain a token")
            .to_string()
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let headers = res.headers().clone();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            text,
            body,
            headers,
        }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }

    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}
