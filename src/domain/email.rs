use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::error::PlatformError;

/// Platform user roles relevant to email authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Moderator,
}

/// The recognized reasons an email may be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailIntent {
    Signup,
    DailyBatch,
    Marketing,
    PublicizeExploration,
    UnpublishExploration,
    DeleteExploration,
}

/// Who may send mail for a given intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderRequirement {
    /// Only the designated system identity
    SystemCommitter,
    /// A user holding the admin role
    Admin,
    /// A user holding the moderator (or admin) role
    Moderator,
}

impl EmailIntent {
    pub const ALL: [EmailIntent; 6] = [
        EmailIntent::Signup,
        EmailIntent::DailyBatch,
        EmailIntent::Marketing,
        EmailIntent::PublicizeExploration,
        EmailIntent::UnpublishExploration,
        EmailIntent::DeleteExploration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmailIntent::Signup => "signup",
            EmailIntent::DailyBatch => "daily_batch",
            EmailIntent::Marketing => "marketing",
            EmailIntent::PublicizeExploration => "publicize_exploration",
            EmailIntent::UnpublishExploration => "unpublish_exploration",
            EmailIntent::DeleteExploration => "delete_exploration",
        }
    }

    /// The per-intent sender predicate, kept as one closed table.
    pub fn sender_requirement(&self) -> SenderRequirement {
        match self {
            EmailIntent::Signup | EmailIntent::DailyBatch => SenderRequirement::SystemCommitter,
            EmailIntent::Marketing => SenderRequirement::Admin,
            EmailIntent::PublicizeExploration
            | EmailIntent::UnpublishExploration
            | EmailIntent::DeleteExploration => SenderRequirement::Moderator,
        }
    }

    /// Whether this intent corresponds to a templated moderator action.
    pub fn is_moderator_action(&self) -> bool {
        matches!(
            self,
            EmailIntent::PublicizeExploration
                | EmailIntent::UnpublishExploration
                | EmailIntent::DeleteExploration
        )
    }
}

impl fmt::Display for EmailIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EmailIntent {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmailIntent::ALL
            .into_iter()
            .find(|intent| intent.as_str() == s)
            .ok_or_else(|| PlatformError::UnrecognizedIntent(s.to_string()))
    }
}

/// Immutable audit record of one successfully sent email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentEmailRecord {
    pub id: Uuid,
    pub recipient_id: String,
    pub recipient_email: String,
    pub sender_id: String,
    pub sender_email: String,
    pub intent: EmailIntent,
    pub subject: String,
    pub html_body: String,
    pub plaintext_body: String,
    pub sent_at: DateTime<Utc>,
}
