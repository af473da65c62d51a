use crate::digest::{Digest, Recipient};
use crate::mailer::{DigestMailer, MailError, RenderedEmail, render_digest, render_test_email};
use app_state::{AppSettings, DigestSettings, SmtpSettings};
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;
use tracing::debug;

/// Production mailer speaking SMTP through a blocking lettre transport.
/// Sends run on the blocking pool so the dispatch loop stays async.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
    digest_settings: DigestSettings,
}

impl SmtpMailer {
    pub fn from_settings(settings: &AppSettings) -> Result<Self, MailError> {
        let from = Mailbox::new(
            Some(settings.smtp.from_name.clone()),
            settings.smtp.from_email.parse()?,
        );
        Ok(Self {
            transport: build_transport(&settings.smtp, &settings.secrets.smtp_password)?,
            from,
            digest_settings: settings.digest.clone(),
        })
    }

    async fn send(&self, to: &str, rendered: RenderedEmail) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(rendered.subject)
            .multipart(MultiPart::alternative_plain_html(
                rendered.text,
                rendered.html,
            ))?;

        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|err| MailError::Delivery(err.to_string()))??;
        Ok(())
    }
}

fn build_transport(smtp: &SmtpSettings, password: &str) -> Result<SmtpTransport, MailError> {
    let builder = if smtp.use_starttls {
        SmtpTransport::starttls_relay(&smtp.host)?
    } else {
        SmtpTransport::relay(&smtp.host)?
    };
    let mut builder = builder
        .port(smtp.port)
        .timeout(Some(Duration::from_secs(smtp.timeout_secs)));
    if !smtp.username.is_empty() {
        builder = builder.credentials(Credentials::new(
            smtp.username.clone(),
            password.to_string(),
        ));
    }
    Ok(builder.build())
}

#[async_trait]
impl DigestMailer for SmtpMailer {
    async fn send_digest(&self, digest: &Digest) -> Result<(), MailError> {
        let rendered = render_digest(digest, &self.digest_settings);
        debug!(
            user_id = %digest.recipient.user_id,
            albums = digest.updates.len(),
            "Sending digest email"
        );
        self.send(&digest.recipient.email, rendered).await
    }

    async fn send_test_email(&self, recipient: &Recipient) -> Result<(), MailError> {
        let rendered = render_test_email(recipient, &self.digest_settings);
        debug!(user_id = %recipient.user_id, "Sending test email");
        self.send(&recipient.email, rendered).await
    }
}
