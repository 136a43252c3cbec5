//! Validated, templated, audited outbound email.

pub mod html;

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use crate::app::ports::{MailerPort, UserDirectoryPort, UserProfile};
use crate::common::constants::{SYSTEM_COMMITTER_ID, SYSTEM_EMAIL_ADDRESS};
use crate::common::error::{PlatformError, Result};
use crate::config::{ConfigProperty, EmailContent, PlatformConfig};
use crate::domain::{EmailIntent, Role, SenderRequirement, SentEmailRecord};
use crate::storage::Storage;

use self::html::{ConservativeSanitizer, HtmlSanitizer};

/// What became of a send request that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    /// The sanitizer would have altered the body, so the send was skipped.
    /// Logged, never raised; no audit record is written.
    SkippedUnsafeBody,
}

/// Coordinates sender validation, templating, sanitization, delivery, and
/// the audit-record write for all user-facing email.
pub struct EmailManager {
    config: Arc<PlatformConfig>,
    storage: Arc<dyn Storage>,
    mailer: Arc<dyn MailerPort>,
    users: Arc<dyn UserDirectoryPort>,
    sanitizer: Box<dyn HtmlSanitizer>,
}

impl EmailManager {
    pub fn new(
        config: Arc<PlatformConfig>,
        storage: Arc<dyn Storage>,
        mailer: Arc<dyn MailerPort>,
        users: Arc<dyn UserDirectoryPort>,
    ) -> Self {
        Self {
            config,
            storage,
            mailer,
            users,
            sanitizer: Box::new(ConservativeSanitizer::new()),
        }
    }

    pub fn with_sanitizer(mut self, sanitizer: Box<dyn HtmlSanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// Sends an email to the given recipient and records it.
    ///
    /// This is the single entry point for all user-facing emails. Fails with
    /// `InvalidSender` when the sender identity does not satisfy the
    /// per-intent predicate; skips (without failing) when the sanitizer
    /// would alter the body.
    pub async fn send_email(
        &self,
        recipient_id: &str,
        sender_id: &str,
        intent: EmailIntent,
        subject: &str,
        html_body: &str,
    ) -> Result<SendOutcome> {
        self.require_sender_is_valid(intent, sender_id).await?;

        let recipient = self.require_user(recipient_id).await?;

        let cleaned_html_body = self.sanitizer.clean(html_body);
        if cleaned_html_body != html_body {
            error!(
                "Email HTML body does not match its cleaned form; skipping send. \
                 Original: {} Cleaned: {}",
                html_body, cleaned_html_body
            );
            crate::observability::metrics::email::skipped_unsafe_body();
            return Ok(SendOutcome::SkippedUnsafeBody);
        }

        let plaintext_body = html::render_plaintext(&cleaned_html_body);
        let sender_email = format!(
            "{} <{}>",
            self.config.sender_name.value(),
            SYSTEM_EMAIL_ADDRESS
        );

        // The delivery call and the audit write form one logical unit; the
        // record write is the transactional boundary. The mail relay is not
        // transactional, so delivery is at-least-once relative to the record.
        self.mailer
            .send_mail(
                &sender_email,
                &recipient.email,
                subject,
                &plaintext_body,
                &cleaned_html_body,
            )
            .await?;
        let record = SentEmailRecord {
            id: Uuid::new_v4(),
            recipient_id: recipient_id.to_string(),
            recipient_email: recipient.email,
            sender_id: sender_id.to_string(),
            sender_email,
            intent,
            subject: subject.to_string(),
            html_body: cleaned_html_body,
            plaintext_body,
            sent_at: Utc::now(),
        };
        self.storage.record_sent_email(&record).await?;

        crate::observability::metrics::email::sent();
        info!(
            "Sent '{}' email to user {} (record {})",
            intent, recipient_id, record.id
        );
        Ok(SendOutcome::Sent)
    }

    /// Sends the post-signup email to the given user.
    ///
    /// Refuses with a configuration error while the signup template still
    /// equals its placeholder default.
    pub async fn send_post_signup_email(&self, user_id: &str) -> Result<SendOutcome> {
        let content = self.require_content_configured(&self.config.signup_email_content)?;
        let user = self.require_user(user_id).await?;

        let body = format!(
            "Hi {},<br><br>{}<br><br>{}",
            user.username,
            content.html_body,
            self.config.email_footer.value()
        );
        self.send_email(
            user_id,
            SYSTEM_COMMITTER_ID,
            EmailIntent::Signup,
            &content.subject,
            &body,
        )
        .await
    }

    /// Sends an email immediately following a moderator action (publicize,
    /// unpublish, delete) to the given user.
    pub async fn send_moderator_action_email(
        &self,
        sender_id: &str,
        recipient_id: &str,
        intent: EmailIntent,
        subject: &str,
        body: &str,
    ) -> Result<SendOutcome> {
        let property = self.config.moderator_action_email_content(intent)?;
        self.require_content_configured(property)?;

        let recipient = self.require_user(recipient_id).await?;
        let sender = self.require_user(sender_id).await?;
        let full_body = format!(
            "Hi {},<br><br>{}<br><br>Thanks,<br>{}<br><br>{}",
            recipient.username,
            body,
            sender.username,
            self.config.email_footer.value()
        );
        self.send_email(recipient_id, sender_id, intent, subject, &full_body)
            .await
    }

    /// The configured draft body for a moderator-action email, for the
    /// moderator page to prefill.
    pub fn draft_moderator_action_email(&self, intent: EmailIntent) -> Result<String> {
        let property = self.config.moderator_action_email_content(intent)?;
        let content = self.require_content_configured(property)?;
        Ok(content.html_body)
    }

    async fn require_sender_is_valid(&self, intent: EmailIntent, sender_id: &str) -> Result<()> {
        let satisfied = match intent.sender_requirement() {
            SenderRequirement::SystemCommitter => sender_id == SYSTEM_COMMITTER_ID,
            SenderRequirement::Admin => {
                let profile = self.users.get_user(sender_id).await?;
                profile.is_some_and(|p| p.has_role(Role::Admin))
            }
            SenderRequirement::Moderator => {
                let profile = self.users.get_user(sender_id).await?;
                profile.is_some_and(|p| p.has_role(Role::Moderator) || p.has_role(Role::Admin))
            }
        };
        if satisfied {
            Ok(())
        } else {
            error!(
                "Invalid sender_id {} for email with intent '{}'",
                sender_id, intent
            );
            crate::observability::metrics::email::blocked_sender();
            Err(PlatformError::InvalidSender {
                intent: intent.to_string(),
            })
        }
    }

    fn require_content_configured(
        &self,
        property: &ConfigProperty<EmailContent>,
    ) -> Result<EmailContent> {
        let content = property.value();
        let unset = content.unset_fields(property.default_value());
        if unset.is_empty() {
            Ok(content)
        } else {
            crate::observability::metrics::email::blocked_placeholder_config();
            Err(PlatformError::Config(format!(
                "Please ensure that the value for the admin config property {} is set \
                 ({} still placeholder) before allowing these emails to be sent.",
                property.name(),
                unset.join(", ")
            )))
        }
    }

    async fn require_user(&self, user_id: &str) -> Result<UserProfile> {
        self.users
            .get_user(user_id)
            .await?
            .ok_or_else(|| PlatformError::UserNotFound(user_id.to_string()))
    }
}
