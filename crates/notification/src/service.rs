//! Email delivery over SMTP using lettre

use std::time::Duration;

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::Mailbox,
    transport::{smtp, smtp::authentication::Credentials, stub::AsyncStubTransport},
};
use serde::Deserialize;
use strum::{Display, EnumString};

/// How the SMTP session is secured.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TlsMode {
    /// Plain connection upgraded with STARTTLS (port 587).
    #[default]
    Starttls,
    /// TLS from the first byte (port 465).
    Tls,
    /// No encryption, for local catchers such as MailDev.
    None,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: String,
    #[serde(default)]
    pub smtp_password: String,
    #[serde(default)]
    pub tls: TlsMode,
    #[serde(default)]
    pub from_address: String,
    #[serde(default)]
    pub from_name: String,
    #[serde(default = "default_admin_addresses")]
    pub admin_addresses: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            tls: TlsMode::default(),
            from_address: String::new(),
            from_name: String::new(),
            admin_addresses: default_admin_addresses(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_admin_addresses() -> Vec<String> {
    vec!["default_admin@example.com".to_string()]
}

fn default_timeout_secs() -> u64 {
    10
}

impl EmailConfig {
    pub fn has_credentials(&self) -> bool {
        !self.smtp_username.is_empty() && !self.smtp_password.is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Sender mailbox, falling back to a local no-reply address.
    pub fn from_mailbox(&self) -> Result<Mailbox, lettre::address::AddressError> {
        let address = if self.from_address.is_empty() {
            "noreply@localhost"
        } else {
            self.from_address.as_str()
        };
        let name = (!self.from_name.is_empty()).then(|| self.from_name.to_owned());

        Ok(Mailbox::new(name, address.parse()?))
    }

    pub fn admin_mailboxes(&self) -> Result<Vec<Mailbox>, lettre::address::AddressError> {
        self.admin_addresses.iter().map(|a| a.parse()).collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP authentication failed: {0}")]
    Authentication(smtp::Error),

    #[error("SMTP transport error: {0}")]
    Transport(smtp::Error),

    #[error("SMTP send timed out after {0:?}")]
    Timeout(Duration),

    #[error("stub transport error: {0}")]
    Stub(#[from] lettre::transport::stub::Error),
}

impl From<smtp::Error> for DispatchError {
    fn from(err: smtp::Error) -> Self {
        if is_authentication_failure(&err) {
            Self::Authentication(err)
        } else {
            Self::Transport(err)
        }
    }
}

fn is_authentication_failure(err: &smtp::Error) -> bool {
    // 530 auth required, 534 mechanism too weak, 535 credentials invalid
    if let Some(code) = err.status() {
        return matches!(code.to_string().as_str(), "530" | "534" | "535");
    }

    err.is_client() && err.to_string().contains("authentication")
}

#[derive(Clone)]
enum Mailer {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    Stub(AsyncStubTransport),
}

/// Email service for sending notifications
#[derive(Clone)]
pub struct EmailService {
    mailer: Mailer,
    from: Mailbox,
    timeout: Duration,
}

impl EmailService {
    /// Create a new email service from configuration
    pub fn new(config: &EmailConfig) -> anyhow::Result<Self> {
        let builder = match config.tls {
            TlsMode::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            }
            TlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?,
            TlsMode::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
            }
        };

        let mut builder = builder
            .port(config.smtp_port)
            .timeout(Some(config.timeout()));

        if config.has_credentials() {
            tracing::info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                tls = %config.tls,
                "Email service initialized with authentication"
            );

            builder = builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        } else {
            tracing::info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                tls = %config.tls,
                "SMTP credentials not configured, using unauthenticated connection (e.g., MailDev)"
            );
        }

        Ok(Self {
            mailer: Mailer::Smtp(builder.build()),
            from: config.from_mailbox()?,
            timeout: config.timeout(),
        })
    }

    /// Create an email service that records messages in `stub` instead of
    /// opening SMTP connections.
    pub fn new_stub(config: &EmailConfig, stub: AsyncStubTransport) -> anyhow::Result<Self> {
        tracing::info!("Stub email service initialized (SMTP calls skipped)");

        Ok(Self {
            mailer: Mailer::Stub(stub),
            from: config.from_mailbox()?,
            timeout: config.timeout(),
        })
    }

    pub fn from(&self) -> &Mailbox {
        &self.from
    }

    pub async fn send(&self, message: Message) -> Result<(), DispatchError> {
        match &self.mailer {
            Mailer::Smtp(transport) => {
                tokio::time::timeout(self.timeout, transport.send(message))
                    .await
                    .map_err(|_| DispatchError::Timeout(self.timeout))??;
            }
            Mailer::Stub(transport) => {
                transport.send(message).await?;
            }
        }

        Ok(())
    }
}
