/// HTTP JSON binding for the chat API
///
/// Endpoints (relative to the configured base URL):
/// 1. Send turn: `POST /chat/message` → `{success, convo_id}`
/// 2. Transcript: `GET /chat/conversation/{convo_id}?user_email=` → `{success, conversation: {messages}}`
/// 3. Listing: `GET /chat/conversations?user_email=` → `{success, conversations}`
/// 4. Watchlist add: `POST /movies/add` → `{success, movie_id}` (201)
/// 5. Watchlist listing: `GET /movies/{not-watched|watched}?user_email=` → `{success, movies}`
/// 6. Movie: `GET /movies/{movie_id}?user_email=` → `{success, movie}`
/// 7. Rating: `PUT /movies/{movie_id}/rate` → `{success, message}`
///
/// Every reply is an envelope carrying `success`; failures may add `message`
/// and `error_code` under any HTTP status.
use crate::{
    error::{SyncError, SyncResult},
    models::{
        ConversationId, ConversationResponse, ConversationSummary, ConversationsResponse, Message,
        MovieResponse, MoviesResponse, RatingRequest, SendMessageRequest, SendMessageResponse,
        WatchStatus, WatchlistEntry, WatchlistMovie,
    },
    services::providers::ChatApi,
};
use reqwest::{Client as HttpClient, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Clone)]
pub struct HttpChatApi {
    http_client: HttpClient,
    api_url: Url,
}

impl HttpChatApi {
    pub fn new(api_url: Url) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
        }
    }

    /// Appends path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Reads the body and decodes the success payload
    async fn read_envelope<T: DeserializeOwned>(response: Response) -> SyncResult<T> {
        let status = response.status();
        let body = response.text().await?;
        decode_envelope(status, &body)
    }
}

/// Interprets a reply envelope
///
/// Order matters: a non-success status or `success != true` is an application
/// error even when the body is otherwise well formed.
fn decode_envelope<T: DeserializeOwned>(status: StatusCode, body: &str) -> SyncResult<T> {
    let envelope: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) if status.is_success() => {
            tracing::error!(status = %status, error = %e, "Chat API returned non-JSON body");
            return Err(SyncError::Protocol {
                status: status.as_u16(),
                detail: e.to_string(),
            });
        }
        Err(_) => {
            return Err(SyncError::Application {
                status: status.as_u16(),
                code: None,
                message: None,
            })
        }
    };

    let success = envelope.get("success").and_then(Value::as_bool) == Some(true);
    if !status.is_success() || !success {
        let field = |name: &str| {
            envelope
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        let (code, message) = (field("error_code"), field("message"));

        tracing::warn!(
            status = %status,
            code = ?code,
            message = ?message,
            "Chat API reported failure"
        );

        return Err(SyncError::Application {
            status: status.as_u16(),
            code,
            message,
        });
    }

    serde_json::from_value(envelope).map_err(|e| {
        tracing::error!(status = %status, error = %e, "Failed to deserialize chat API response");
        SyncError::Protocol {
            status: status.as_u16(),
            detail: e.to_string(),
        }
    })
}

#[async_trait::async_trait]
impl ChatApi for HttpChatApi {
    async fn send_message(&self, request: &SendMessageRequest) -> SyncResult<ConversationId> {
        let url = self.endpoint(&["chat", "message"]);

        let response = self.http_client.post(url).json(request).send().await?;
        let reply: SendMessageResponse = Self::read_envelope(response).await?;

        tracing::info!(
            convo_id = %reply.convo_id,
            new_conversation = request.convo_id.is_none(),
            provider = self.name(),
            "Message sent"
        );

        Ok(reply.convo_id)
    }

    async fn fetch_conversation(
        &self,
        convo_id: &ConversationId,
        user_email: &str,
    ) -> SyncResult<Vec<Message>> {
        let id = convo_id.to_string();
        let url = self.endpoint(&["chat", "conversation", id.as_str()]);

        let response = self
            .http_client
            .get(url)
            .query(&[("user_email", user_email)])
            .send()
            .await?;
        let reply: ConversationResponse = Self::read_envelope(response).await?;

        tracing::info!(
            convo_id = %convo_id,
            messages = reply.conversation.messages.len(),
            provider = self.name(),
            "Transcript fetched"
        );

        Ok(reply.conversation.messages)
    }

    async fn list_conversations(&self, user_email: &str) -> SyncResult<Vec<ConversationSummary>> {
        let url = self.endpoint(&["chat", "conversations"]);

        let response = self
            .http_client
            .get(url)
            .query(&[("user_email", user_email)])
            .send()
            .await?;
        let reply: ConversationsResponse = Self::read_envelope(response).await?;

        tracing::info!(
            conversations = reply.conversations.len(),
            provider = self.name(),
            "Conversations listed"
        );

        Ok(reply.conversations)
    }

    async fn add_to_watchlist(&self, entry: &WatchlistEntry) -> SyncResult<()> {
        let url = self.endpoint(&["movies", "add"]);

        let response = self.http_client.post(url).json(entry).send().await?;
        let _: Value = Self::read_envelope(response).await?;

        tracing::info!(
            movie_name = %entry.movie_name,
            provider = self.name(),
            "Movie added to watchlist"
        );

        Ok(())
    }

    async fn list_movies(
        &self,
        user_email: &str,
        status: WatchStatus,
    ) -> SyncResult<Vec<WatchlistMovie>> {
        let url = self.endpoint(&["movies", status.segment()]);

        let response = self
            .http_client
            .get(url)
            .query(&[("user_email", user_email)])
            .send()
            .await?;
        let reply: MoviesResponse = Self::read_envelope(response).await?;

        tracing::info!(
            status = ?status,
            movies = reply.movies.len(),
            provider = self.name(),
            "Watchlist listed"
        );

        Ok(reply.movies)
    }

    async fn fetch_movie(&self, movie_id: &str, user_email: &str) -> SyncResult<WatchlistMovie> {
        let url = self.endpoint(&["movies", movie_id]);

        let response = self
            .http_client
            .get(url)
            .query(&[("user_email", user_email)])
            .send()
            .await?;
        let reply: MovieResponse = Self::read_envelope(response).await?;

        tracing::debug!(movie_id = %movie_id, provider = self.name(), "Movie fetched");

        Ok(reply.movie)
    }

    async fn rate_movie(&self, movie_id: &str, request: &RatingRequest) -> SyncResult<()> {
        let url = self.endpoint(&["movies", movie_id, "rate"]);

        let response = self.http_client.put(url).json(request).send().await?;
        let _: Value = Self::read_envelope(response).await?;

        tracing::info!(
            movie_id = %movie_id,
            rating = request.rating,
            provider = self.name(),
            "Movie rated"
        );

        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
