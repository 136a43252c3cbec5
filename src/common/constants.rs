/// Well-known identities and platform-wide limits used across the backend.
// Identity used for system-generated actions (signup emails, daily batches)
pub const SYSTEM_COMMITTER_ID: &str = "admin";
pub const SYSTEM_EMAIL_ADDRESS: &str = "system@trailguide.example.com";

// Identity recorded as the committer for automated schema migrations
pub const MIGRATION_BOT_USERNAME: &str = "migration_bot";

/// The states schema version that freshly created explorations carry and
/// that the migration job upgrades older explorations to.
pub const CURRENT_STATES_SCHEMA_VERSION: u32 = 3;

// Admin-config placeholder text. Template-driven emails are refused while
// any template field still equals these.
pub const PLACEHOLDER_SUBJECT: &str = "THIS IS A PLACEHOLDER.";
pub const PLACEHOLDER_HTML_BODY: &str =
    "THIS IS A <b>PLACEHOLDER</b> AND SHOULD BE REPLACED.";

pub const DEFAULT_SENDER_NAME: &str = "Site Admin";
pub const DEFAULT_EMAIL_FOOTER: &str =
    "You can unsubscribe from these emails from the \
     <a href=\"https://www.trailguide.example.com/preferences\">Preferences</a> page.";

// Truncation limits for the top-N answer calculations
pub const TOP_ANSWER_LIMIT: usize = 5;
pub const TOP_ELEMENT_LIMIT: usize = 10;
