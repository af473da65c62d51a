use crate::{
    ApiSettings, DigestSettings, LoggingSettings, RawSettings, SecretSettings, SmtpSettings,
};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub logging: LoggingSettings,
    pub api: ApiSettings,
    pub smtp: SmtpSettings,
    pub digest: DigestSettings,
    pub secrets: SecretSettings,
}

impl From<RawSettings> for AppSettings {
    fn from(raw: RawSettings) -> Self {
        Self {
            logging: raw.logging,
            api: raw.api,
            smtp: raw.smtp,
            digest: raw.digest,
            secrets: raw.secrets,
        }
    }
}
