use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt::Display, str::FromStr};

pub mod conversation;
pub mod movie;
pub mod recommendation;

pub use conversation::{
    ConversationPayload, ConversationResponse, ConversationSummary, ConversationsResponse,
    SendMessageRequest, SendMessageResponse,
};
pub use movie::{MovieResponse, MoviesResponse, RatingRequest, WatchStatus, WatchlistMovie};
pub use recommendation::{Recommendation, WatchlistEntry};

/// Identifier of a server-side conversation
///
/// The API documents integer ids, while document stores hand out opaque string
/// ids. Both are accepted and serialized back in the form the server sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConversationId {
    /// Integer id (e.g. `42`)
    Numeric(i64),
    /// Opaque string id (e.g. `"65f1c0ffee..."`)
    Opaque(String),
}

impl Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversationId::Numeric(id) => write!(f, "{}", id),
            ConversationId::Opaque(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for ConversationId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<i64>() {
            Ok(id) => ConversationId::Numeric(id),
            Err(_) => ConversationId::Opaque(s.to_string()),
        })
    }
}

/// Author of a turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// A single turn of a conversation as stored by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default = "Utc::now", deserialize_with = "lenient_timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a message stamped with the current time
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Accepts RFC 3339 and the RFC 2822 form Flask emits ("Tue, 18 Oct 2026 10:00:00 GMT").
/// Anything else, including `null`, falls back to the current time.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let parsed = raw.as_deref().and_then(|value| {
        DateTime::parse_from_rfc3339(value)
            .or_else(|_| DateTime::parse_from_rfc2822(value))
            .ok()
    });

    match parsed {
        Some(timestamp) => Ok(timestamp.with_timezone(&Utc)),
        None => {
            if let Some(value) = raw {
                tracing::debug!(timestamp = %value, "Unrecognized message timestamp");
            }
            Ok(Utc::now())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_conversation_id_accepts_integer_and_string() {
        let numeric: ConversationId = serde_json::from_str("42").unwrap();
        assert_eq!(numeric, ConversationId::Numeric(42));

        let opaque: ConversationId = serde_json::from_str("\"65f1c0ffee\"").unwrap();
        assert_eq!(opaque, ConversationId::Opaque("65f1c0ffee".to_string()));

        assert_eq!(serde_json::to_string(&numeric).unwrap(), "42");
        assert_eq!(serde_json::to_string(&opaque).unwrap(), "\"65f1c0ffee\"");
    }

    #[test]
    fn test_conversation_id_from_str() {
        assert_eq!(
            "42".parse::<ConversationId>().unwrap(),
            ConversationId::Numeric(42)
        );
        assert_eq!(
            " abc ".parse::<ConversationId>().unwrap(),
            ConversationId::Opaque("abc".to_string())
        );
        assert_eq!(ConversationId::Numeric(7).to_string(), "7");
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"model\"");
        assert!(serde_json::from_str::<Role>("\"assistant\"").is_err());
    }

    #[test]
    fn test_message_ignores_extra_fields() {
        let json = r#"{
            "role": "model",
            "content": "Try Heat",
            "source": "mock",
            "timestamp": "2026-10-18T10:00:00Z"
        }"#;

        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.role, Role::Model);
        assert_eq!(message.content, "Try Heat");
        assert_eq!(
            message.timestamp,
            Utc.with_ymd_and_hms(2026, 10, 18, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_message_accepts_http_date_timestamp() {
        let json = r#"{"role": "user", "content": "hi", "timestamp": "Sun, 18 Oct 2026 10:00:00 GMT"}"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(
            message.timestamp,
            Utc.with_ymd_and_hms(2026, 10, 18, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_message_timestamp_defaults_when_missing() {
        let before = Utc::now();
        let message: Message = serde_json::from_str(r#"{"role": "user", "content": "hi"}"#).unwrap();
        assert!(message.timestamp >= before);
    }
}
