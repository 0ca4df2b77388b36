use std::sync::Arc;

use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};

use watchlist_chat::{
    logging,
    services::{ChatApi, HttpChatApi},
    view::terminal::{self, Command, HELP},
    Config, ConversationStore, MessageRenderer, SyncController, TranscriptView,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init(&config.log_filter);

    let api: Arc<dyn ChatApi> = Arc::new(HttpChatApi::new(config.api_base()?));
    let renderer = MessageRenderer::new(config.frontend_base()?);

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let printer = terminal::spawn(events_rx);

    let controller = Arc::new(SyncController::new(
        api,
        ConversationStore::new(config.user_email.clone()),
        TranscriptView::with_events(events_tx),
        renderer,
    ));

    tracing::info!(
        api_url = %config.api_url,
        signed_in = config.user_email.is_some(),
        "Watchlist chat started"
    );
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::Say(text) => {
                if controller.is_busy() {
                    tracing::debug!("Submitting while a previous turn is still in flight");
                }
                // Each turn runs as its own request chain
                let controller = Arc::clone(&controller);
                tokio::spawn(async move {
                    controller.submit(&text).await;
                });
            }
            // Errors below are already rendered into the transcript
            Command::ListConversations => {
                let _ = controller.list_conversations().await;
            }
            Command::Resume(convo_id) => {
                let _ = controller.resume_conversation(convo_id).await;
            }
            Command::AcceptLatest => {
                let _ = controller.accept_latest_recommendation().await;
            }
            Command::ListMovies(status) => {
                let _ = controller.list_watchlist(status).await;
            }
            Command::ShowMovie(movie_id) => {
                let _ = controller.movie_details(&movie_id).await;
            }
            Command::Rate { movie_id, rating } => {
                let _ = controller.rate_movie(&movie_id, rating).await;
            }
            Command::Usage(usage) => println!("{}", usage),
        }
    }

    // Closing the view's sender lets the printer drain and exit; turns still
    // in flight are abandoned
    match Arc::try_unwrap(controller) {
        Ok(controller) => {
            drop(controller);
            let _ = printer.await;
        }
        Err(_) => printer.abort(),
    }

    Ok(())
}
