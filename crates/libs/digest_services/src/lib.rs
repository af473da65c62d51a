#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod album_ref;
pub mod api;
pub mod database;
pub mod digest;
pub mod directory;
pub mod dispatch;
pub mod mailer;
pub mod sources;

#[cfg(test)]
pub(crate) mod test_support;
