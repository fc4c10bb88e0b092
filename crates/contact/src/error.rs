#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing required fields")]
    MissingFields,

    #[error("{0}")]
    Validate(#[from] validator::ValidationErrors),

    #[error("failed to save submission: {0:#}")]
    Persistence(anyhow::Error),

    #[error("failed to send notification: {0:#}")]
    Dispatch(anyhow::Error),
}

impl Error {
    /// True for rejections caused by the submitted data rather than the server.
    pub fn is_client(&self) -> bool {
        matches!(self, Self::MissingFields | Self::Validate(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
