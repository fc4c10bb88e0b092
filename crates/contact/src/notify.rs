use async_trait::async_trait;

use crate::Submission;

/// Delivers a notification for an accepted submission.
#[async_trait]
pub trait Notify: Send + Sync {
    async fn notify(&self, submission: &Submission) -> anyhow::Result<()>;
}
