use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::common::error::Result;
use crate::domain::Role;

/// Profile data the backend needs about a platform user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl UserProfile {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Outbound mail delivery. Fire-and-forget beyond error propagation.
#[async_trait]
pub trait MailerPort: Send + Sync {
    async fn send_mail(
        &self,
        sender_address: &str,
        recipient_address: &str,
        subject: &str,
        plaintext_body: &str,
        html_body: &str,
    ) -> Result<()>;
}

/// The content search index.
#[async_trait]
pub trait SearchIndexPort: Send + Sync {
    async fn index_explorations(&self, ids: &[String]) -> Result<()>;
}

/// Lookup of user profiles and roles.
#[async_trait]
pub trait UserDirectoryPort: Send + Sync {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>>;
}
