use async_trait::async_trait;
use lettre::{
    Message,
    message::{Mailbox, header::ContentType},
};
use mailform_contact::{Notify, Submission};

use crate::{DispatchError, EmailConfig, EmailService};

/// Emails every administrator when a contact form is submitted.
#[derive(Clone)]
pub struct ContactNotifier {
    service: EmailService,
    admins: Vec<Mailbox>,
    app_name: String,
}

impl ContactNotifier {
    pub fn new(
        service: EmailService,
        config: &EmailConfig,
        app_name: impl Into<String>,
    ) -> Result<Self, DispatchError> {
        Ok(Self {
            service,
            admins: config.admin_mailboxes()?,
            app_name: app_name.into(),
        })
    }

    pub fn compose(&self, submission: &Submission) -> Result<Message, DispatchError> {
        // The sender's name stays in the body only.
        let reply_to = Mailbox::new(None, submission.email().parse()?);

        let mut builder = Message::builder()
            .from(self.service.from().clone())
            .reply_to(reply_to)
            .subject(format!(
                "{} Contact Form: {}",
                self.app_name,
                submission.subject()
            ))
            .header(ContentType::TEXT_PLAIN);

        for admin in &self.admins {
            builder = builder.to(admin.clone());
        }

        let body = format!(
            "You received a new message via the {} contact form:\n\n\
             From: {}\n\
             Reply-To Email: {}\n\n\
             Subject: {}\n\n\
             Message:\n{}",
            self.app_name,
            submission.name(),
            submission.email(),
            submission.subject(),
            submission.message(),
        );

        Ok(builder.body(body)?)
    }
}

#[async_trait]
impl Notify for ContactNotifier {
    async fn notify(&self, submission: &Submission) -> anyhow::Result<()> {
        let message = self.compose(submission)?;

        match self.service.send(message).await {
            Ok(()) => {
                tracing::info!(
                    recipients = self.admins.len(),
                    "Contact email dispatched"
                );

                Ok(())
            }
            Err(err @ DispatchError::Authentication(_)) => {
                tracing::error!(
                    error = %err,
                    "SMTP authentication failed, check the configured username and app password"
                );

                Err(err.into())
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to dispatch contact email");

                Err(err.into())
            }
        }
    }
}
