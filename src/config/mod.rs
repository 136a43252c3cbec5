//! Admin-configurable properties.
//!
//! Each property carries a name, a human-readable description (rendered by
//! the admin UI), a default value, and its current value. Email content
//! templates default to placeholder text; template-driven sends are refused
//! while any template field still equals its placeholder.

use std::path::Path;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::common::constants::{
    DEFAULT_EMAIL_FOOTER, DEFAULT_SENDER_NAME, PLACEHOLDER_HTML_BODY, PLACEHOLDER_SUBJECT,
};
use crate::common::error::{PlatformError, Result};
use crate::domain::EmailIntent;

/// A named configuration value with a default.
pub struct ConfigProperty<T: Clone> {
    name: &'static str,
    description: &'static str,
    default: T,
    value: RwLock<T>,
}

impl<T: Clone + PartialEq + Serialize> ConfigProperty<T> {
    pub fn new(name: &'static str, description: &'static str, default: T) -> Self {
        Self {
            name,
            description,
            value: RwLock::new(default.clone()),
            default,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self) -> T {
        self.value.read().expect("config lock poisoned").clone()
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn set(&self, value: T) {
        *self.value.write().expect("config lock poisoned") = value;
    }

    /// Whether the property still holds its default value.
    pub fn is_default(&self) -> bool {
        *self.value.read().expect("config lock poisoned") == self.default
    }

    /// Description record consumed by the admin UI.
    pub fn describe(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "default": self.default,
            "value": self.value(),
        })
    }
}

/// An admin-configured (subject, HTML body) email template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailContent {
    pub subject: String,
    pub html_body: String,
}

impl EmailContent {
    pub fn placeholder() -> Self {
        Self {
            subject: PLACEHOLDER_SUBJECT.to_string(),
            html_body: PLACEHOLDER_HTML_BODY.to_string(),
        }
    }

    /// Names of the fields still equal to the given default's fields.
    pub fn unset_fields(&self, default: &EmailContent) -> Vec<&'static str> {
        let mut unset = Vec::new();
        if self.subject == default.subject {
            unset.push("subject");
        }
        if self.html_body == default.html_body {
            unset.push("html_body");
        }
        unset
    }
}

/// Optional overrides read from a TOML config file.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    sender_name: Option<String>,
    email_footer: Option<String>,
    signup_email: Option<EmailContent>,
    publicize_exploration_email: Option<EmailContent>,
    unpublish_exploration_email: Option<EmailContent>,
    delete_exploration_email: Option<EmailContent>,
}

/// The full set of admin-configured properties.
pub struct PlatformConfig {
    pub sender_name: ConfigProperty<String>,
    pub email_footer: ConfigProperty<String>,
    pub signup_email_content: ConfigProperty<EmailContent>,
    pub publicize_exploration_email_content: ConfigProperty<EmailContent>,
    pub unpublish_exploration_email_content: ConfigProperty<EmailContent>,
    pub delete_exploration_email_content: ConfigProperty<EmailContent>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformConfig {
    pub fn new() -> Self {
        Self {
            sender_name: ConfigProperty::new(
                "email_sender_name",
                "The sender name for outgoing emails.",
                DEFAULT_SENDER_NAME.to_string(),
            ),
            email_footer: ConfigProperty::new(
                "email_footer",
                "The footer to append to all outgoing emails. Written in HTML; \
                 must include an unsubscribe link.",
                DEFAULT_EMAIL_FOOTER.to_string(),
            ),
            signup_email_content: ConfigProperty::new(
                "signup_email_content",
                "Content of the email sent after a new user signs up. The body \
                 is HTML without salutation or footer.",
                EmailContent::placeholder(),
            ),
            publicize_exploration_email_content: ConfigProperty::new(
                "publicize_exploration_email_content",
                "Content of the email sent after an exploration is publicized \
                 by a moderator.",
                EmailContent::placeholder(),
            ),
            unpublish_exploration_email_content: ConfigProperty::new(
                "unpublish_exploration_email_content",
                "Content of the email sent after an exploration is unpublished \
                 by a moderator.",
                EmailContent::placeholder(),
            ),
            delete_exploration_email_content: ConfigProperty::new(
                "delete_exploration_email_content",
                "Content of the email sent after an exploration is deleted by \
                 a moderator.",
                EmailContent::placeholder(),
            ),
        }
    }

    /// The configured template backing a moderator-action intent.
    pub fn moderator_action_email_content(
        &self,
        intent: EmailIntent,
    ) -> Result<&ConfigProperty<EmailContent>> {
        match intent {
            EmailIntent::PublicizeExploration => Ok(&self.publicize_exploration_email_content),
            EmailIntent::UnpublishExploration => Ok(&self.unpublish_exploration_email_content),
            EmailIntent::DeleteExploration => Ok(&self.delete_exploration_email_content),
            other => Err(PlatformError::UnrecognizedIntent(other.to_string())),
        }
    }

    /// Applies overrides from a TOML file on top of the defaults.
    pub fn load_toml(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::new();
        config.apply_toml_str(&contents)?;
        Ok(config)
    }

    pub fn apply_toml_str(&self, contents: &str) -> Result<()> {
        let file: ConfigFile = toml::from_str(contents)?;
        if let Some(sender_name) = file.sender_name {
            self.sender_name.set(sender_name);
        }
        if let Some(footer) = file.email_footer {
            self.email_footer.set(footer);
        }
        if let Some(content) = file.signup_email {
            self.signup_email_content.set(content);
        }
        if let Some(content) = file.publicize_exploration_email {
            self.publicize_exploration_email_content.set(content);
        }
        if let Some(content) = file.unpublish_exploration_email {
            self.unpublish_exploration_email_content.set(content);
        }
        if let Some(content) = file.delete_exploration_email {
            self.delete_exploration_email_content.set(content);
        }
        Ok(())
    }

    /// Property descriptions for admin UI rendering.
    pub fn describe_all(&self) -> Vec<serde_json::Value> {
        vec![
            self.sender_name.describe(),
            self.email_footer.describe(),
            self.signup_email_content.describe(),
            self.publicize_exploration_email_content.describe(),
            self.unpublish_exploration_email_content.describe(),
            self.delete_exploration_email_content.describe(),
        ]
    }
}
