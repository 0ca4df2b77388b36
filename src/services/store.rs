use crate::models::{ConversationId, Message};

/// Session state for one chat session
///
/// The user identity is fixed at construction. The conversation id only ever
/// comes from the server, and the transcript is only ever swapped wholesale.
#[derive(Debug, Default)]
pub struct ConversationStore {
    user_identity: Option<String>,
    conversation_id: Option<ConversationId>,
    transcript: Vec<Message>,
    /// Sequence number of the fetch that produced `transcript`
    applied_fetch: u64,
}

impl ConversationStore {
    /// Creates a store for the given identity; blank identities count as missing
    pub fn new(user_identity: Option<String>) -> Self {
        let user_identity = user_identity
            .map(|identity| identity.trim().to_string())
            .filter(|identity| !identity.is_empty());

        Self {
            user_identity,
            ..Self::default()
        }
    }

    pub fn user_identity(&self) -> Option<&str> {
        self.user_identity.as_deref()
    }

    pub fn conversation_id(&self) -> Option<&ConversationId> {
        self.conversation_id.as_ref()
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Adopts a server-issued conversation id
    pub fn set_conversation_id(&mut self, id: ConversationId) {
        match &self.conversation_id {
            Some(current) if *current == id => {}
            Some(current) => {
                tracing::info!(previous = %current, current = %id, "Conversation id replaced by server");
                self.conversation_id = Some(id);
            }
            None => {
                tracing::info!(convo_id = %id, "Conversation started");
                self.conversation_id = Some(id);
            }
        }
    }

    /// Atomically replaces the stored transcript
    pub fn replace_transcript(&mut self, messages: Vec<Message>) {
        self.transcript = messages;
    }

    /// Replaces the transcript only if `fetch` is not older than the last applied fetch
    ///
    /// Returns `false` when the completion is stale and was discarded.
    pub fn replace_transcript_if_newer(&mut self, fetch: u64, messages: Vec<Message>) -> bool {
        if fetch < self.applied_fetch {
            tracing::debug!(
                fetch,
                applied = self.applied_fetch,
                "Discarding stale transcript fetch"
            );
            return false;
        }

        self.applied_fetch = fetch;
        self.replace_transcript(messages);
        true
    }
}
