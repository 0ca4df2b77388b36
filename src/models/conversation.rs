use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ConversationId, Message, Role};

// ============================================================================
// Chat API Types
// ============================================================================

/// Body of `POST /chat/message`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendMessageRequest {
    pub role: Role,
    pub message: String,
    /// `null` asks the server to start a new conversation
    pub convo_id: Option<ConversationId>,
    pub user_email: String,
}

impl SendMessageRequest {
    /// Builds a user turn for the given conversation (or a new one)
    pub fn user_turn(
        message: impl Into<String>,
        convo_id: Option<ConversationId>,
        user_email: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::User,
            message: message.into(),
            convo_id,
            user_email: user_email.into(),
        }
    }
}

/// Successful reply to `POST /chat/message`
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageResponse {
    pub convo_id: ConversationId,
}

/// Successful reply to `GET /chat/conversation/{convo_id}`
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationResponse {
    pub conversation: ConversationPayload,
}

/// Conversation document as returned by the server; only the transcript is read
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationPayload {
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Successful reply to `GET /chat/conversations`
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationsResponse {
    #[serde(default)]
    pub conversations: Vec<ConversationSummary>,
}

/// Conversation listing entry (messages stripped by the server)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConversationSummary {
    pub convo_id: ConversationId,
    pub user_email: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ConversationSummary {
    /// Best-effort parse of the server's `updated_at` field
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.updated_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .or_else(|_| DateTime::parse_from_rfc2822(raw))
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }
}
