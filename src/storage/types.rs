use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The caller a persistence write is made on behalf of
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Authenticated user identifier
    pub user_id: String,
}

impl RequestContext {
    /// Context for a user
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Fields written by a conversation save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvoUpdate {
    /// Conversation to update
    pub conversation_id: String,
    /// New title
    pub title: String,
}

/// Options attached to a conversation save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOptions {
    /// Provenance label naming the code path that made the write
    pub context: String,
}

impl SaveOptions {
    /// Options with the given provenance label
    pub fn with_context(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
        }
    }
}

/// A stored conversation as listed from the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredConversation {
    /// Conversation identifier
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Current title
    pub title: String,
    /// Provenance label of the last write
    pub context: Option<String>,
    /// When the conversation was first saved
    pub created_at: DateTime<Utc>,
    /// When the conversation was last saved
    pub updated_at: DateTime<Utc>,
}
