use std::sync::{
    atomic::{AtomicU64, AtomicUsize, Ordering},
    Arc,
};

use tokio::sync::{Mutex, RwLock};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    error::{SyncError, SyncResult},
    models::{
        movie::{MAX_RATING, MIN_RATING},
        ConversationId, ConversationSummary, RatingRequest, Recommendation, SendMessageRequest,
        WatchStatus, WatchlistEntry, WatchlistMovie,
    },
    services::{providers::ChatApi, renderer::MessageRenderer, store::ConversationStore},
    view::TranscriptView,
};

/// Lifecycle of one submitted turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Sending,
    AwaitingTranscript,
    Failed,
}

impl SyncState {
    fn can_advance_to(self, next: SyncState) -> bool {
        matches!(
            (self, next),
            (SyncState::Idle, SyncState::Sending)
                | (SyncState::Idle, SyncState::Failed)
                | (SyncState::Sending, SyncState::AwaitingTranscript)
                | (SyncState::Sending, SyncState::Failed)
                | (SyncState::AwaitingTranscript, SyncState::Idle)
                | (SyncState::Failed, SyncState::Idle)
        )
    }
}

/// How a submission ended
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Blank input, nothing happened
    Ignored,
    /// The server transcript was fetched and rendered
    Synced {
        convo_id: ConversationId,
        message_count: usize,
    },
    /// The fetch completed after a newer one and was discarded
    Superseded { convo_id: ConversationId },
    /// A diagnostic message was rendered for this error
    Failed(SyncError),
}

/// Per-submission bookkeeping, tagged for log correlation
struct Submission {
    id: Uuid,
    state: SyncState,
}

impl Submission {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SyncState::Idle,
        }
    }

    fn advance(&mut self, next: SyncState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::debug!(from = ?self.state, to = ?next, "Submission state changed");
        self.state = next;
    }
}

/// Decrements the in-flight counter when a submission ends
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Drives the submit → reply → refresh cycle against the chat API
///
/// Submissions may overlap: each runs its own request chain. The store and
/// view are always locked in that order. Transcript fetches carry a sequence
/// number so a slow, older fetch never overwrites a newer transcript.
pub struct SyncController {
    api: Arc<dyn ChatApi>,
    store: Arc<RwLock<ConversationStore>>,
    view: Arc<Mutex<TranscriptView>>,
    renderer: MessageRenderer,
    fetch_seq: AtomicU64,
    in_flight: AtomicUsize,
}

impl SyncController {
    pub fn new(
        api: Arc<dyn ChatApi>,
        store: ConversationStore,
        view: TranscriptView,
        renderer: MessageRenderer,
    ) -> Self {
        Self {
            api,
            store: Arc::new(RwLock::new(store)),
            view: Arc::new(Mutex::new(view)),
            renderer,
            fetch_seq: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn store(&self) -> Arc<RwLock<ConversationStore>> {
        Arc::clone(&self.store)
    }

    pub fn view(&self) -> Arc<Mutex<TranscriptView>> {
        Arc::clone(&self.view)
    }

    /// True while any submission is still running; UIs may disable input
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Submits one user turn and reconciles the transcript
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let submission = Submission::new();
        let span = tracing::info_span!("submission", id = %submission.id);
        self.run_submission(submission, text).instrument(span).await
    }

    async fn run_submission(&self, mut submission: Submission, text: &str) -> SubmitOutcome {
        let _in_flight = InFlight::enter(&self.in_flight);

        let (user_email, convo_id) = {
            let store = self.store.read().await;
            (
                store.user_identity().map(str::to_string),
                store.conversation_id().cloned(),
            )
        };

        let Some(user_email) = user_email else {
            submission.advance(SyncState::Failed);
            tracing::warn!("Submission rejected: no user identity");
            self.surface(&SyncError::Identity).await;
            submission.advance(SyncState::Idle);
            return SubmitOutcome::Failed(SyncError::Identity);
        };

        {
            let mut view = self.view.lock().await;
            view.append(self.renderer.user_turn(text));
            view.show_typing();
        }
        submission.advance(SyncState::Sending);

        let request = SendMessageRequest::user_turn(text, convo_id, user_email.as_str());
        let convo_id = match self.api.send_message(&request).await {
            Ok(convo_id) => convo_id,
            Err(e) => {
                submission.advance(SyncState::Failed);
                tracing::warn!(error = %e, provider = self.api.name(), "Send failed");
                self.surface(&e).await;
                submission.advance(SyncState::Idle);
                return SubmitOutcome::Failed(e);
            }
        };

        self.store.write().await.set_conversation_id(convo_id.clone());
        submission.advance(SyncState::AwaitingTranscript);

        let outcome = match self.refresh(&convo_id, &user_email).await {
            Ok(Some(message_count)) => SubmitOutcome::Synced {
                convo_id,
                message_count,
            },
            Ok(None) => SubmitOutcome::Superseded { convo_id },
            Err(e) => SubmitOutcome::Failed(e),
        };
        submission.advance(SyncState::Idle);
        outcome
    }

    /// Switches to an existing conversation and loads its transcript
    pub async fn resume_conversation(&self, convo_id: ConversationId) -> SyncResult<usize> {
        let user_email = self.require_identity().await?;

        tracing::info!(convo_id = %convo_id, "Resuming conversation");
        self.store.write().await.set_conversation_id(convo_id.clone());
        self.view.lock().await.show_typing();

        match self.refresh(&convo_id, &user_email).await? {
            Some(message_count) => Ok(message_count),
            None => Ok(self.store.read().await.transcript().len()),
        }
    }

    /// Fetches and renders the transcript
    ///
    /// `Ok(None)` means a newer fetch already landed and this one was dropped
    /// without touching the view, typing placeholder included. On failure the
    /// stored transcript is left untouched.
    async fn refresh(
        &self,
        convo_id: &ConversationId,
        user_email: &str,
    ) -> SyncResult<Option<usize>> {
        let fetch = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let messages = match self.api.fetch_conversation(convo_id, user_email).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    convo_id = %convo_id,
                    provider = self.api.name(),
                    "Transcript fetch failed"
                );
                self.surface(&e).await;
                return Err(e);
            }
        };

        let mut store = self.store.write().await;
        let mut view = self.view.lock().await;

        let units = self.renderer.render_transcript(&messages);
        let message_count = messages.len();
        if !store.replace_transcript_if_newer(fetch, messages) {
            // The newer fetch already rebuilt the view; any placeholder now
            // on screen belongs to a later submission
            return Ok(None);
        }

        view.hide_typing();
        view.clear();
        view.replay(units);

        tracing::info!(
            convo_id = %convo_id,
            messages = message_count,
            fetch,
            "Transcript synced"
        );

        Ok(Some(message_count))
    }

    /// Lists the user's conversations and announces them in the transcript
    pub async fn list_conversations(&self) -> SyncResult<Vec<ConversationSummary>> {
        let user_email = self.require_identity().await?;

        let conversations = match self.api.list_conversations(&user_email).await {
            Ok(conversations) => conversations,
            Err(e) => {
                tracing::warn!(error = %e, "Conversation listing failed");
                self.surface(&e).await;
                return Err(e);
            }
        };

        let text = if conversations.is_empty() {
            "You have no saved conversations yet.".to_string()
        } else {
            bulleted(
                "Your conversations:",
                conversations.iter().map(|summary| match summary.updated_at() {
                    Some(updated) => format!(
                        "{} (updated {})",
                        summary.convo_id,
                        updated.format("%Y-%m-%d %H:%M")
                    ),
                    None => summary.convo_id.to_string(),
                }),
            )
        };
        self.view.lock().await.append(self.renderer.bot_turn(&text));

        Ok(conversations)
    }

    /// Adds a recommendation to the user's watchlist
    pub async fn accept_recommendation(&self, recommendation: &Recommendation) -> SyncResult<()> {
        let user_email = self.require_identity().await?;
        let entry = WatchlistEntry::from_recommendation(recommendation, &user_email);

        if let Err(e) = self.api.add_to_watchlist(&entry).await {
            tracing::warn!(error = %e, movie_name = %recommendation.name, "Watchlist add failed");
            self.surface(&e).await;
            return Err(e);
        }

        let notice = format!("\"{}\" added to your watchlist!", recommendation.name);
        self.view.lock().await.append(self.renderer.bot_turn(&notice));
        Ok(())
    }

    /// Accepts the most recent recommendation card on screen, if any
    pub async fn accept_latest_recommendation(&self) -> SyncResult<Option<Recommendation>> {
        let latest = self.view.lock().await.latest_recommendation().cloned();
        match latest {
            Some(recommendation) => {
                self.accept_recommendation(&recommendation).await?;
                Ok(Some(recommendation))
            }
            None => {
                self.view
                    .lock()
                    .await
                    .append(self.renderer.bot_turn("There is no recommendation to add yet."));
                Ok(None)
            }
        }
    }

    /// Lists saved movies with the given watch status and announces them
    pub async fn list_watchlist(&self, status: WatchStatus) -> SyncResult<Vec<WatchlistMovie>> {
        let user_email = self.require_identity().await?;

        let movies = match self.api.list_movies(&user_email, status).await {
            Ok(movies) => movies,
            Err(e) => {
                tracing::warn!(error = %e, status = ?status, "Watchlist listing failed");
                self.surface(&e).await;
                return Err(e);
            }
        };

        let text = if movies.is_empty() {
            status.empty_text().to_string()
        } else {
            bulleted(status.heading(), movies.iter().map(WatchlistMovie::summary_line))
        };
        self.view.lock().await.append(self.renderer.bot_turn(&text));

        Ok(movies)
    }

    /// Shows one saved movie
    pub async fn movie_details(&self, movie_id: &str) -> SyncResult<WatchlistMovie> {
        let user_email = self.require_identity().await?;

        let movie = match self.api.fetch_movie(movie_id, &user_email).await {
            Ok(movie) => movie,
            Err(e) => {
                tracing::warn!(error = %e, movie_id = %movie_id, "Movie fetch failed");
                self.surface(&e).await;
                return Err(e);
            }
        };

        self.view
            .lock()
            .await
            .append(self.renderer.bot_turn(&movie.detail_text()));
        Ok(movie)
    }

    /// Rates a saved movie on the 0–10 scale and marks it as watched
    pub async fn rate_movie(&self, movie_id: &str, rating: f32) -> SyncResult<()> {
        let user_email = self.require_identity().await?;

        if !RatingRequest::is_valid_rating(rating) {
            let e = SyncError::Validation(format!(
                "Rating must be between {} and {}.",
                MIN_RATING, MAX_RATING
            ));
            self.surface(&e).await;
            return Err(e);
        }

        let request = RatingRequest::watched(user_email, rating);
        if let Err(e) = self.api.rate_movie(movie_id, &request).await {
            tracing::warn!(error = %e, movie_id = %movie_id, "Rating failed");
            self.surface(&e).await;
            return Err(e);
        }

        self.view
            .lock()
            .await
            .append(self.renderer.bot_turn("Movie rated successfully!"));
        Ok(())
    }

    async fn require_identity(&self) -> SyncResult<String> {
        let identity = self.store.read().await.user_identity().map(str::to_string);
        match identity {
            Some(identity) => Ok(identity),
            None => {
                self.surface(&SyncError::Identity).await;
                Err(SyncError::Identity)
            }
        }
    }

    /// Removes the typing placeholder and renders one diagnostic bot message
    async fn surface(&self, error: &SyncError) {
        let mut view = self.view.lock().await;
        view.hide_typing();
        view.append(self.renderer.bot_turn(&error.diagnostic()));
    }
}

/// Heading followed by one `• ` line per item
fn bulleted(heading: &str, items: impl Iterator<Item = String>) -> String {
    let mut text = heading.to_string();
    for item in items {
        text.push_str("\n• ");
        text.push_str(&item);
    }
    text
}
