//! Console binding: prints view events and parses input lines

use std::io::Write;

use tokio::{sync::mpsc, task::JoinHandle};

use super::ViewEvent;
use crate::{
    models::{ConversationId, RatingRequest, WatchStatus},
    services::renderer::DisplayUnit,
};

/// A line of user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Plain text to submit as a user turn
    Say(String),
    /// `/conversations`
    ListConversations,
    /// `/resume <id>`
    Resume(ConversationId),
    /// `/add`, accept the latest recommendation card
    AcceptLatest,
    /// `/watchlist` or `/watched`
    ListMovies(WatchStatus),
    /// `/movie <id>`
    ShowMovie(String),
    /// `/rate <id> <0-10>`
    Rate { movie_id: String, rating: f32 },
    /// A command with missing or malformed arguments
    Usage(&'static str),
    /// `/help`
    Help,
    /// `/quit`
    Quit,
    /// Blank line
    Empty,
}

pub const HELP: &str = "Commands: /conversations, /resume <id>, /add, /watchlist, /watched, /movie <id>, /rate <id> <0-10>, /help, /quit. Anything else is sent to the assistant.";

const MOVIE_USAGE: &str = "Usage: /movie <id>";
const RATE_USAGE: &str = "Usage: /rate <id> <rating from 0 to 10>";

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }

        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head {
            "/quit" | "/exit" => Command::Quit,
            "/help" => Command::Help,
            "/conversations" => Command::ListConversations,
            "/add" => Command::AcceptLatest,
            "/watchlist" => Command::ListMovies(WatchStatus::NotWatched),
            "/watched" => Command::ListMovies(WatchStatus::Watched),
            "/movie" => match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
                [movie_id] => Command::ShowMovie(movie_id.to_string()),
                _ => Command::Usage(MOVIE_USAGE),
            },
            "/rate" => parse_rating(rest),
            // Infallible parse
            "/resume" if !rest.is_empty() => match rest.parse() {
                Ok(id) => Command::Resume(id),
                Err(never) => match never {},
            },
            _ => Command::Say(line.to_string()),
        }
    }
}

fn parse_rating(args: &str) -> Command {
    let args: Vec<&str> = args.split_whitespace().collect();
    let [movie_id, rating] = args.as_slice() else {
        return Command::Usage(RATE_USAGE);
    };
    match rating.parse::<f32>() {
        Ok(rating) if RatingRequest::is_valid_rating(rating) => Command::Rate {
            movie_id: movie_id.to_string(),
            rating,
        },
        _ => Command::Usage(RATE_USAGE),
    }
}

/// Console text for one event, `None` for events with no visible effect
pub fn format_event(event: &ViewEvent) -> Option<String> {
    match event {
        ViewEvent::Appended(unit @ DisplayUnit::UserTurn { .. }) => {
            Some(format!("you > {}", unit.to_plain_text()))
        }
        ViewEvent::Appended(unit @ DisplayUnit::BotTurn { .. }) => {
            Some(format!("bot > {}", unit.to_plain_text()))
        }
        ViewEvent::Appended(unit @ DisplayUnit::RecommendationCard { .. }) => Some(format!(
            "bot > Great choice! I'd recommend:\n{}\n      (type /add to save it)",
            indent(&unit.to_plain_text(), "      ")
        )),
        ViewEvent::TypingShown => Some("bot > ...".to_string()),
        ViewEvent::Cleared => Some("──────── transcript ────────".to_string()),
        ViewEvent::TypingHidden | ViewEvent::ScrolledToLatest => None,
    }
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", prefix, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Spawns the printer task; it ends when every sender is dropped
pub fn spawn(mut events: mpsc::UnboundedReceiver<ViewEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let mut stdout = std::io::stdout().lock();
            if let Some(text) = format_event(&event) {
                let _ = writeln!(stdout, "{}", text);
            }
            if event == ViewEvent::ScrolledToLatest {
                let _ = stdout.flush();
            }
        }
        tracing::debug!("Terminal binding stopped");
    })
}
