use crate::{DatabaseConstants, RawSettings};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConstants {
    pub database: DatabaseConstants,
}

impl From<RawSettings> for AppConstants {
    fn from(raw: RawSettings) -> Self {
        Self {
            database: raw.constants.database,
        }
    }
}
