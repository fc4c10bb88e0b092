use std::{
    path::PathBuf,
    str::FromStr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use mailform_contact::{Notify, SqliteStore, Store, SubmitFormInput, Submission};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

pub async fn setup_test_store(path: PathBuf) -> anyhow::Result<SqliteStore> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    mailform_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(SqliteStore(pool))
}

#[allow(dead_code)]
pub fn form(name: impl Into<String>) -> SubmitFormInput {
    let name = name.into();

    SubmitFormInput {
        email: Some(format!("{name}@mailform.localhost")),
        name: Some(name),
        subject: Some("Hi".to_owned()),
        message: Some("Hello there".to_owned()),
    }
}

/// Captures notifications instead of sending them.
#[derive(Default)]
pub struct RecordingNotifier {
    pub fail: bool,
    pub sent: Mutex<Vec<Submission>>,
    pub attempts: AtomicUsize,
}

#[allow(dead_code)]
impl RecordingNotifier {
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
            anyhow::bail!("smtp relay unreachable");
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
