//! In-process adapters for the outbound ports.
//!
//! These back development runs and tests; production deployments swap in
//! adapters for the real mail relay, search cluster, and user service.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::info;

use crate::app::ports::{MailerPort, SearchIndexPort, UserDirectoryPort, UserProfile};
use crate::common::error::Result;

/// Mailer that logs deliveries and keeps them in memory for inspection.
#[derive(Default)]
pub struct LoggingMailer {
    deliveries: Arc<Mutex<Vec<LoggedDelivery>>>,
}

#[derive(Debug, Clone)]
pub struct LoggedDelivery {
    pub sender_address: String,
    pub recipient_address: String,
    pub subject: String,
    pub plaintext_body: String,
    pub html_body: String,
}

impl LoggingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliveries(&self) -> Vec<LoggedDelivery> {
        self.deliveries.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailerPort for LoggingMailer {
    async fn send_mail(
        &self,
        sender_address: &str,
        recipient_address: &str,
        subject: &str,
        plaintext_body: &str,
        html_body: &str,
    ) -> Result<()> {
        info!(
            "Delivering mail from '{}' to '{}': {}",
            sender_address, recipient_address, subject
        );
        self.deliveries.lock().unwrap().push(LoggedDelivery {
            sender_address: sender_address.to_string(),
            recipient_address: recipient_address.to_string(),
            subject: subject.to_string(),
            plaintext_body: plaintext_body.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(())
    }
}

/// Search index adapter that records submitted ids in memory.
#[derive(Default)]
pub struct InMemorySearchIndex {
    indexed: Arc<Mutex<HashSet<String>>>,
}

impl InMemorySearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indexed_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.indexed.lock().unwrap().iter().cloned().collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl SearchIndexPort for InMemorySearchIndex {
    async fn index_explorations(&self, ids: &[String]) -> Result<()> {
        let mut indexed = self.indexed.lock().unwrap();
        for id in ids {
            indexed.insert(id.clone());
        }
        info!("Indexed {} exploration(s)", ids.len());
        Ok(())
    }
}

/// User directory backed by a fixed map of profiles.
#[derive(Default)]
pub struct StaticUserDirectory {
    users: HashMap<String, UserProfile>,
}

impl StaticUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, profile: UserProfile) -> Self {
        self.users.insert(profile.user_id.clone(), profile);
        self
    }
}

#[async_trait]
impl UserDirectoryPort for StaticUserDirectory {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        Ok(self.users.get(user_id).cloned())
    }
}
