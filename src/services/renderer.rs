use reqwest::Url;

use crate::{
    models::{Message, Recommendation, Role},
    services::recommendation_parser::{ParseOutcome, RecommendationParser},
};

/// One displayable entry of the transcript
///
/// Text fields hold already-escaped HTML; nothing is ever interpolated raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayUnit {
    /// A user turn, escaped, newlines left as-is
    UserTurn { html: String },
    /// A plain model turn or a diagnostic, escaped with newlines as `<br>`
    BotTurn { html: String },
    /// A model turn that carries a structured recommendation
    RecommendationCard {
        recommendation: Recommendation,
        watchlist_link: Url,
    },
}

impl DisplayUnit {
    /// Markup fragment for web bindings
    pub fn to_html(&self) -> String {
        match self {
            DisplayUnit::UserTurn { html } => format!(
                r#"<div class="message user-message"><div class="message-content"><p>{}</p></div></div>"#,
                html
            ),
            DisplayUnit::BotTurn { html } => format!(
                r#"<div class="message bot-message"><div class="message-content"><p>{}</p></div></div>"#,
                html
            ),
            DisplayUnit::RecommendationCard {
                recommendation,
                watchlist_link,
            } => format!(
                concat!(
                    r#"<div class="message bot-message"><div class="message-content">"#,
                    r#"<div class="recommendation-card">"#,
                    r#"<h4>🎬 {name}</h4>"#,
                    r#"<p class="rec-description">{description}</p>"#,
                    r#"<p class="rec-runtime">⏱️ Runtime: {runtime} minutes</p>"#,
                    r#"<a href="{link}" class="btn btn-primary btn-sm rec-btn">➕ Add to Watchlist</a>"#,
                    r#"</div></div></div>"#
                ),
                name = escape_html(&recommendation.name),
                description = escape_html(&recommendation.description),
                runtime = recommendation.runtime,
                link = escape_html(watchlist_link.as_str()),
            ),
        }
    }

    /// Unescaped text for console bindings
    pub fn to_plain_text(&self) -> String {
        match self {
            DisplayUnit::UserTurn { html } => unescape_html(html),
            DisplayUnit::BotTurn { html } => unescape_html(&html.replace("<br>", "\n")),
            DisplayUnit::RecommendationCard {
                recommendation,
                watchlist_link,
            } => format!(
                "🎬 {}\n{}\n⏱️ Runtime: {} minutes\n➕ Add to Watchlist: {}",
                recommendation.name,
                recommendation.description,
                recommendation.runtime,
                watchlist_link
            ),
        }
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        match self {
            DisplayUnit::RecommendationCard { recommendation, .. } => Some(recommendation),
            _ => None,
        }
    }
}

/// Turns messages into display units
///
/// Pure: no view mutation happens here. Model turns go through the
/// recommendation parser and silently fall back to plain text.
#[derive(Debug, Clone)]
pub struct MessageRenderer {
    parser: RecommendationParser,
    frontend: Url,
}

impl MessageRenderer {
    pub fn new(frontend: Url) -> Self {
        Self {
            parser: RecommendationParser::new(),
            frontend,
        }
    }

    pub fn render(&self, message: &Message) -> DisplayUnit {
        match message.role {
            Role::User => self.user_turn(&message.content),
            Role::Model => match self.parser.parse(&message.content) {
                ParseOutcome::Recommendation(recommendation) => {
                    let watchlist_link = recommendation.watchlist_link(&self.frontend);
                    DisplayUnit::RecommendationCard {
                        recommendation,
                        watchlist_link,
                    }
                }
                ParseOutcome::NoMatch => self.bot_turn(&message.content),
            },
        }
    }

    /// Renders a full transcript, preserving order one unit per message
    pub fn render_transcript(&self, messages: &[Message]) -> Vec<DisplayUnit> {
        messages.iter().map(|message| self.render(message)).collect()
    }

    pub fn user_turn(&self, text: &str) -> DisplayUnit {
        DisplayUnit::UserTurn {
            html: escape_html(text),
        }
    }

    /// Plain bot bubble, also used for diagnostics and notices
    pub fn bot_turn(&self, text: &str) -> DisplayUnit {
        DisplayUnit::BotTurn {
            html: escape_html(text).replace('\n', "<br>"),
        }
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Inverse of [`escape_html`]
pub fn unescape_html(html: &str) -> String {
    html.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
