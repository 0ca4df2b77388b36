/// Chat API abstraction
///
/// The server that stores conversations and generates model turns is an
/// external collaborator. The sync controller only talks to it through this
/// trait, so the HTTP binding can be swapped or mocked.
use crate::{
    error::SyncResult,
    models::{
        ConversationId, ConversationSummary, Message, RatingRequest, SendMessageRequest,
        WatchStatus, WatchlistEntry, WatchlistMovie,
    },
};

pub mod http;

pub use http::HttpChatApi;

/// Trait for chat API backends
///
/// Implementations report every failure as a [`crate::error::SyncError`]:
/// transport problems, unreadable bodies and `success: false` replies alike.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChatApi: Send + Sync {
    /// Submits a user turn and returns the (possibly new) conversation id
    ///
    /// The server generates and stores the model reply before answering.
    async fn send_message(&self, request: &SendMessageRequest) -> SyncResult<ConversationId>;

    /// Fetches the full ordered transcript of a conversation owned by `user_email`
    async fn fetch_conversation(
        &self,
        convo_id: &ConversationId,
        user_email: &str,
    ) -> SyncResult<Vec<Message>>;

    /// Lists the conversations owned by `user_email`, without messages
    async fn list_conversations(&self, user_email: &str) -> SyncResult<Vec<ConversationSummary>>;

    /// Adds an accepted recommendation to the user's watchlist
    async fn add_to_watchlist(&self, entry: &WatchlistEntry) -> SyncResult<()>;

    /// Lists the user's saved movies with the given watch status
    async fn list_movies(
        &self,
        user_email: &str,
        status: WatchStatus,
    ) -> SyncResult<Vec<WatchlistMovie>>;

    /// Fetches one saved movie owned by `user_email`
    async fn fetch_movie(&self, movie_id: &str, user_email: &str) -> SyncResult<WatchlistMovie>;

    /// Rates a saved movie and marks it as watched
    async fn rate_movie(&self, movie_id: &str, request: &RatingRequest) -> SyncResult<()>;

    /// Backend name for logging and debugging
    fn name(&self) -> &'static str;
}
