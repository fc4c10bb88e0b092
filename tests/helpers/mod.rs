//! Test helpers for building the router against a temporary database
//! and in-memory notifiers.

#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use mailform::{
    AppState, Config,
    config::{AppConfig, ServerConfig},
};
use mailform_contact::{Command, Notify, SqliteStore, Store, Submission};
use mailform_notification::EmailConfig;
use serde_json::Value;
use sqlx::SqlitePool;
use temp_dir::TempDir;
use tower::ServiceExt;

pub const HOST: &str = "localhost";
pub const FRONTEND: &str = "https://frontend.example.com";

/// Production-like configuration used by the HTTP tests
pub fn create_test_config() -> Config {
    Config {
        app: AppConfig {
            name: "Mailform".to_string(),
            debug: false,
            ..Default::default()
        },
        server: ServerConfig {
            allowed_hosts: vec![HOST.to_string()],
            cors_allowed_origins: vec![FRONTEND.to_string()],
            ..Default::default()
        },
        email: EmailConfig {
            smtp_username: "site@example.com".to_string(),
            smtp_password: "app-password".to_string(),
            from_address: "site@example.com".to_string(),
            from_name: "Mailform".to_string(),
            admin_addresses: vec!["admin@example.com".to_string()],
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Create a migrated SQLite database inside `dir`
pub async fn setup_test_pool(dir: &TempDir) -> anyhow::Result<SqlitePool> {
    let path = dir.child("mailform.db");
    let pool = mailform::db::create_pool(&format!("sqlite:{}", path.display())).await?;
    mailform::migrate::run_migrations(&pool).await?;

    Ok(pool)
}

pub enum Persistence {
    Sqlite(SqlitePool),
    Failing,
    Disabled,
}

pub fn create_app(config: Config, persistence: Persistence, notifier: Arc<dyn Notify>) -> Router {
    let (store, pool): (Option<Arc<dyn Store>>, Option<SqlitePool>) = match persistence {
        Persistence::Sqlite(pool) => (Some(Arc::new(SqliteStore(pool.clone()))), Some(pool)),
        Persistence::Failing => (Some(Arc::new(FailingStore)), None),
        Persistence::Disabled => (None, None),
    };

    mailform::router(AppState {
        config,
        contact_command: Command::new(store, notifier),
        pool,
    })
}

pub fn contact_request(body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/contact/")
        .header(header::HOST, HOST)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::HOST, HOST)
        .body(Body::empty())
        .unwrap()
}

pub fn valid_body(name: &str) -> String {
    serde_json::json!({
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "subject": "Question",
        "message": "Hello, I have a question."
    })
    .to_string()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// Send a request and decode the JSON response
pub async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = send(app, request).await;
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Captures notifications instead of sending them.
#[derive(Default)]
pub struct RecordingNotifier {
    pub fail: bool,
    pub sent: Mutex<Vec<Submission>>,
    pub attempts: AtomicUsize,
}

impl RecordingNotifier {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Default::default()
        })
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<Submission> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Notify for RecordingNotifier {
    async fn notify(&self, submission: &Submission) -> anyhow::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            anyhow::bail!("535 5.7.8 Username and Password not accepted");
        }

        self.sent.lock().unwrap().push(submission.clone());

        Ok(())
    }
}

pub struct FailingStore;

#[async_trait::async_trait]
impl Store for FailingStore {
    async fn insert(&self, _submission: &Submission) -> anyhow::Result<i64> {
        anyhow::bail!("database is locked")
    }
}
