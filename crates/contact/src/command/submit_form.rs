use serde::Deserialize;
use time::OffsetDateTime;
use validator::Validate;

use crate::{Error, Outcome, Result, Submission};

/// Raw contact form payload.
///
/// Every key is optional so that an absent field is reported as
/// [`Error::MissingFields`] rather than as a decoding failure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct SubmitFormInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Validate)]
struct ContactForm {
    #[validate(length(min = 1, max = 150), custom(function = "validate_no_control_chars"))]
    name: String,
    #[validate(email, custom(function = "validate_mailbox_address"))]
    email: String,
    #[validate(length(min = 1, max = 200))]
    subject: String,
    #[validate(length(min = 1))]
    message: String,
}

/// Names end up in mail headers, where control characters are not allowed.
fn validate_no_control_chars(value: &str) -> std::result::Result<(), validator::ValidationError> {
    if value.chars().any(char::is_control) {
        return Err(validator::ValidationError::new("control_characters")
            .with_message("Must not contain control characters".into()));
    }

    Ok(())
}

/// The address must also be deliverable by the SMTP layer.
fn validate_mailbox_address(value: &str) -> std::result::Result<(), validator::ValidationError> {
    if value.parse::<lettre::Address>().is_err() {
        return Err(validator::ValidationError::new("email")
            .with_message("Invalid email address".into()));
    }

    Ok(())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl SubmitFormInput {
    /// Check the payload and build a [`Submission`] stamped with the current time.
    pub fn validate_into(self) -> Result<Submission> {
        let message = self.message.filter(|m| !m.trim().is_empty());

        let (Some(name), Some(email), Some(subject), Some(message)) = (
            trimmed(self.name),
            trimmed(self.email),
            trimmed(self.subject),
            message,
        ) else {
            return Err(Error::MissingFields);
        };

        let form = ContactForm {
            name,
            email,
            subject,
            message,
        };
        form.validate()?;

        Ok(Submission {
            name: form.name,
            email: form.email,
            subject: form.subject,
            message: form.message,
            submitted_at: OffsetDateTime::now_utc().unix_timestamp(),
        })
    }
}

impl super::Command {
    /// Validate, persist when a store is configured, then notify.
    ///
    /// A failed insert aborts before any email is attempted. Once the
    /// submission is stored a failed notification is logged and the call
    /// still succeeds; without a store the notification failure is returned.
    pub async fn submit_form(&self, input: SubmitFormInput) -> Result<Outcome> {
        let submission = input.validate_into()?;

        tracing::info!(
            email = %submission.email,
            subject = %submission.subject,
            "Received contact form submission"
        );

        let Some(store) = &self.store else {
            self.notifier
                .notify(&submission)
                .await
                .map_err(Error::Dispatch)?;

            tracing::info!("Contact notification sent");

            return Ok(Outcome::Sent);
        };

        let id = store
            .insert(&submission)
            .await
            .map_err(Error::Persistence)?;

        tracing::info!(id, "Contact submission saved");

        let notified = match self.notifier.notify(&submission).await {
            Ok(()) => {
                tracing::info!(id, "Contact notification sent");
                true
            }
            Err(err) => {
                let error = format!("{err:#}");
                tracing::error!(
                    id,
                    %error,
                    "Failed to send contact notification, submission was saved"
                );
                false
            }
        };

        Ok(Outcome::Stored { id, notified })
    }
}
