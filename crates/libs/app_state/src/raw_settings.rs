use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub logging: LoggingSettings,
    pub api: ApiSettings,
    pub smtp: SmtpSettings,
    pub digest: DigestSettings,
    pub secrets: SecretSettings,
    pub constants: RawConstants,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

/// Configuration for the API server.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub port: u32,
    pub public_url: String,
}

/// Outbound SMTP transport configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub from_email: String,
    pub from_name: String,
    pub use_starttls: bool,
    pub timeout_secs: u64,
}

/// Configuration for the daily digest pass and the rendered email.
#[derive(Debug, Deserialize, Clone)]
pub struct DigestSettings {
    /// How far back one pass looks for newly added items, in hours.
    pub window_hours: i64,
    /// Subject line of the digest email.
    pub subject: String,
    /// Absolute URL of the photos page linked from the digest email.
    pub photos_url: String,
    /// Instance name shown in the email footer.
    pub instance_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecretSettings {
    pub database_url: String,
    pub smtp_password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawConstants {
    pub database: DatabaseConstants,
}

/// Database connection and related configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConstants {
    pub max_connections: u32,
    pub min_connection: u32,
    pub max_lifetime: u64,
    pub idle_timeout: u64,
    pub acquire_timeout: u64,
}
