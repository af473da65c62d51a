use crate::database::{SubscriptionReader, UserAccount};
use crate::digest::{DigestBuilder, Recipient};
use crate::directory::UserDirectory;
use crate::mailer::DigestMailer;
use chrono::{DateTime, Duration, Utc};
use color_eyre::eyre::eyre;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Outcome counts of one dispatch pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchSummary {
    pub users_processed: u64,
    pub digests_sent: u64,
    pub users_skipped: u64,
    pub users_failed: u64,
}

enum UserOutcome {
    Sent,
    Skipped,
}

/// Runs one full digest pass over all subscribed users.
///
/// The dispatcher does no time-of-day gating of its own: the scheduler that
/// invokes it is expected to fire at most once per window.
pub struct NotificationDispatcher {
    subscriptions: Arc<dyn SubscriptionReader>,
    directory: Arc<dyn UserDirectory>,
    builder: DigestBuilder,
    mailer: Arc<dyn DigestMailer>,
    window: Duration,
}

impl NotificationDispatcher {
    #[must_use]
    pub fn new(
        subscriptions: Arc<dyn SubscriptionReader>,
        directory: Arc<dyn UserDirectory>,
        builder: DigestBuilder,
        mailer: Arc<dyn DigestMailer>,
        window_hours: i64,
    ) -> Self {
        Self {
            subscriptions,
            directory,
            builder,
            mailer,
            window: Duration::hours(window_hours),
        }
    }

    #[must_use]
    pub fn cutoff_before(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
        now - window
    }

    pub async fn run_once(&self) -> color_eyre::Result<DispatchSummary> {
        let cutoff = Self::cutoff_before(Utc::now(), self.window);
        self.run_at(cutoff).await
    }

    /// One pass against a fixed cutoff. A failure for one user is logged and
    /// counted; it never aborts the pass for the others.
    #[instrument(skip(self))]
    pub async fn run_at(&self, cutoff: DateTime<Utc>) -> color_eyre::Result<DispatchSummary> {
        let user_ids = self.subscriptions.list_subscribed_users().await?;
        info!(users = user_ids.len(), "Starting digest pass");

        let mut summary = DispatchSummary::default();
        for user_id in user_ids {
            summary.users_processed += 1;
            match self.process_user(&user_id, cutoff).await {
                Ok(UserOutcome::Sent) => summary.digests_sent += 1,
                Ok(UserOutcome::Skipped) => summary.users_skipped += 1,
                Err(err) => {
                    error!(user_id = %user_id, "Failed to process user: {err}");
                    summary.users_failed += 1;
                }
            }
        }

        info!(
            sent = summary.digests_sent,
            skipped = summary.users_skipped,
            failed = summary.users_failed,
            "Digest pass finished"
        );
        Ok(summary)
    }

    async fn process_user(
        &self,
        user_id: &str,
        cutoff: DateTime<Utc>,
    ) -> color_eyre::Result<UserOutcome> {
        let Some(account) = self.directory.lookup(user_id).await? else {
            debug!(user_id, "Subscribed user no longer exists, skipping");
            return Ok(UserOutcome::Skipped);
        };
        let Some(recipient) = recipient_from(&account) else {
            debug!(user_id, "No email address on file, skipping");
            return Ok(UserOutcome::Skipped);
        };

        let selection = self.subscriptions.selection(user_id).await?;
        if selection.is_empty() {
            debug!(user_id, "Empty selection, skipping");
            return Ok(UserOutcome::Skipped);
        }

        let Some(digest) = self.builder.build(recipient, cutoff, &selection).await else {
            debug!(user_id, "No album updates, skipping");
            return Ok(UserOutcome::Skipped);
        };

        self.mailer
            .send_digest(&digest)
            .await
            .map_err(|err| eyre!("Failed to send digest: {err}"))?;
        Ok(UserOutcome::Sent)
    }
}

fn recipient_from(account: &UserAccount) -> Option<Recipient> {
    let email = account.email.as_deref()?;
    if email.is_empty() {
        return None;
    }
    Some(Recipient {
        user_id: account.user_id.clone(),
        display_name: account.display_name_or_id().to_string(),
        email: email.to_string(),
    })
}
