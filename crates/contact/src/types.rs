/// A contact form entry that passed validation.
///
/// Only [`crate::SubmitFormInput::validate_into`] builds one, so holding a
/// `Submission` means every required field is present and well-formed.
#[derive(Clone, Debug, PartialEq)]
pub struct Submission {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) subject: String,
    pub(crate) message: String,
    pub(crate) submitted_at: i64,
}

impl Submission {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Unix timestamp (seconds) of receipt.
    pub fn submitted_at(&self) -> i64 {
        self.submitted_at
    }
}

/// What happened to an accepted submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Persisted under `id`. `notified` is false when the email failed.
    Stored { id: i64, notified: bool },
    /// Persistence is disabled and the notification went out.
    Sent,
}
