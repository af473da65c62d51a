use crate::digest::{Digest, Recipient};
use async_trait::async_trait;
use thiserror::Error;

mod render;
mod smtp;

pub use render::*;
pub use smtp::SmtpMailer;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build email: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email delivery failed: {0}")]
    Delivery(String),
}

/// Outbound mail seam. The production implementation talks SMTP; tests use
/// a recording double.
#[async_trait]
pub trait DigestMailer: Send + Sync {
    async fn send_digest(&self, digest: &Digest) -> Result<(), MailError>;

    /// Sends a short plain confirmation mail so a user can verify their
    /// address from the settings page.
    async fn send_test_email(&self, recipient: &Recipient) -> Result<(), MailError>;
}
