use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use mailform_notification::{EmailConfig, TlsMode};
use serde::Deserialize;
use std::env;
use strum::Display;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    /// Relaxes production checks and allows the local frontend
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_frontend_port")]
    pub frontend_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            debug: false,
            frontend_port: default_frontend_port(),
        }
    }
}

fn default_app_name() -> String {
    "Mailform".to_string()
}

fn default_frontend_port() -> u16 {
    5173
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub allowed_hosts: Vec<String>,
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_hosts: Vec::new(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    /// When false submissions are only emailed
    #[serde(default = "default_database_enabled")]
    pub enabled: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            enabled: default_database_enabled(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite:mailform.db".to_string()
}

fn default_database_enabled() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("server port must be greater than 0")]
    ZeroPort,

    #[error("at least one admin address is required")]
    NoAdminAddress,

    #[error("invalid {field} address: {address}")]
    InvalidAddress {
        field: &'static str,
        address: String,
    },

    #[error("email timeout must be at least 1 second")]
    ZeroTimeout,

    #[error("{0} must be set when debug is disabled")]
    MissingInProduction(&'static str),
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy environment variables (ADMIN_EMAIL, GMAIL_USER, ...)
    /// 2. Prefixed environment variables (MAILFORM__EMAIL__SMTP_HOST, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("database.url", default_database_url())?
            .set_default("database.enabled", default_database_enabled())?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional, ignored when missing
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("MAILFORM")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.allowed_hosts")
                .with_list_parse_key("server.cors_allowed_origins")
                .with_list_parse_key("email.admin_addresses")
                .try_parsing(true),
        );

        if let Ok(debug) = env::var("DEBUG") {
            builder = builder.set_override("app.debug", parse_flag(&debug))?;
        }
        if let Ok(port) = env::var("FRONTEND_PORT") {
            builder = builder.set_override("app.frontend_port", port)?;
        }
        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }
        if let Ok(admins) = env::var("ADMIN_EMAIL") {
            builder = builder.set_override("email.admin_addresses", split_list(&admins))?;
        }
        if let Ok(user) = env::var("GMAIL_USER") {
            builder = builder.set_override("email.smtp_username", user)?;
        }
        if let Ok(password) = env::var("GMAIL_APP_PASSWORD") {
            builder = builder.set_override("email.smtp_password", password)?;
        }
        if let Ok(host) = env::var("EMAIL_HOST") {
            builder = builder.set_override("email.smtp_host", host)?;
        }
        if let Ok(port) = env::var("EMAIL_PORT") {
            builder = builder.set_override("email.smtp_port", port)?;
        }
        if let Ok(use_tls) = env::var("EMAIL_USE_TLS") {
            let tls = if parse_flag(&use_tls) {
                TlsMode::Starttls
            } else {
                TlsMode::None
            };
            builder = builder.set_override("email.tls", tls.to_string())?;
        }
        if let Ok(from) = env::var("DEFAULT_FROM_EMAIL") {
            builder = builder.set_override("email.from_address", from)?;
        }
        if let Ok(origins) = env::var("CORS_ALLOWED_ORIGINS") {
            builder =
                builder.set_override("server.cors_allowed_origins", split_list(&origins))?;
        }
        if let Ok(hosts) = env::var("ALLOWED_HOSTS") {
            builder = builder.set_override("server.allowed_hosts", split_list(&hosts))?;
        }

        let mut config: Config = builder.build()?.try_deserialize()?;

        if let Ok(hostname) = env::var("RENDER_EXTERNAL_HOSTNAME") {
            config.server.allowed_hosts.extend(split_list(&hostname));
        }

        config.finalize();

        Ok(config)
    }

    /// Fill in values derived from other settings
    pub fn finalize(&mut self) {
        if self.email.from_address.is_empty() && !self.email.smtp_username.is_empty() {
            self.email.from_address = self.email.smtp_username.to_owned();
        }

        if self.app.debug {
            let port = self.app.frontend_port;
            for origin in [
                format!("http://localhost:{port}"),
                format!("http://127.0.0.1:{port}"),
            ] {
                push_unique(&mut self.server.cors_allowed_origins, origin);
            }

            for host in ["localhost", "127.0.0.1"] {
                push_unique(&mut self.server.allowed_hosts, host.to_owned());
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.server.port == 0 {
            return Err(ConfigurationError::ZeroPort);
        }
        if self.email.admin_addresses.is_empty() {
            return Err(ConfigurationError::NoAdminAddress);
        }
        for address in &self.email.admin_addresses {
            if address.parse::<lettre::message::Mailbox>().is_err() {
                return Err(ConfigurationError::InvalidAddress {
                    field: "admin",
                    address: address.to_owned(),
                });
            }
        }
        if self.email.from_mailbox().is_err() {
            return Err(ConfigurationError::InvalidAddress {
                field: "sender",
                address: self.email.from_address.to_owned(),
            });
        }
        if self.email.timeout_secs < 1 {
            return Err(ConfigurationError::ZeroTimeout);
        }

        if self.app.debug {
            return Ok(());
        }

        if self.email.smtp_username.is_empty() {
            return Err(ConfigurationError::MissingInProduction("email.smtp_username"));
        }
        if self.email.smtp_password.is_empty() {
            return Err(ConfigurationError::MissingInProduction("email.smtp_password"));
        }
        if self.server.cors_allowed_origins.is_empty() {
            return Err(ConfigurationError::MissingInProduction(
                "server.cors_allowed_origins",
            ));
        }
        if self.server.allowed_hosts.is_empty() {
            return Err(ConfigurationError::MissingInProduction("server.allowed_hosts"));
        }

        Ok(())
    }
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}
