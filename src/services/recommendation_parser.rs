//! Recommendation text protocol
//!
//! Model turns may embed a structured suggestion as three labelled fields:
//!
//! ```text
//! Movie Name: The Conjuring
//! Runtime: 112 minutes
//! Description: Paranormal investigators work to help a family...
//! ```
//!
//! Labels are case-insensitive, may appear anywhere in the text and in any
//! order. The name runs to the end of its line, the runtime is the leading
//! integer of the number (fractions are truncated) and the description is
//! greedy to the end of the text.
//!
//! The format has no delimiters or escaping. A description that itself
//! mentions "Runtime: 42 minutes" can satisfy detection; callers should treat a
//! match as a rendering hint only.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Recommendation;

// `[^\S\n]` is whitespace minus newline: name and runtime never cross a line
static NAME_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Movie Name:[^\S\n]*(.+)").expect("valid movie name pattern")
});

static RUNTIME_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Runtime:[^\S\n]*(\d+)(?:\.\d+)?[^\S\n]*minutes?")
        .expect("valid runtime pattern")
});

static DESCRIPTION_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)Description:\s*(.*)").expect("valid description pattern"));

/// Result of running the parser over a model turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Recommendation(Recommendation),
    /// The text is plain chat and must be rendered as such
    NoMatch,
}

impl ParseOutcome {
    pub fn into_recommendation(self) -> Option<Recommendation> {
        match self {
            ParseOutcome::Recommendation(recommendation) => Some(recommendation),
            ParseOutcome::NoMatch => None,
        }
    }
}

/// Parser for the three-field recommendation format
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationParser;

impl RecommendationParser {
    pub fn new() -> Self {
        Self
    }

    /// Cheap detection predicate: all three labelled fields are present
    pub fn detect(&self, text: &str) -> bool {
        NAME_FIELD.is_match(text) && RUNTIME_FIELD.is_match(text) && DESCRIPTION_FIELD.is_match(text)
    }

    /// Extracts the recommendation, or `NoMatch` when any field is missing or unusable
    pub fn parse(&self, text: &str) -> ParseOutcome {
        match self.extract(text) {
            Some(recommendation) => ParseOutcome::Recommendation(recommendation),
            None => ParseOutcome::NoMatch,
        }
    }

    fn extract(&self, text: &str) -> Option<Recommendation> {
        let name = capture(&NAME_FIELD, text)?;
        let runtime = capture(&RUNTIME_FIELD, text)?;
        let description = capture(&DESCRIPTION_FIELD, text)?;

        // Digits only, so the only failure mode is overflow
        let runtime = match runtime.parse::<u32>() {
            Ok(minutes) if minutes > 0 => minutes,
            _ => {
                tracing::debug!(runtime = %runtime, "Recommendation runtime out of range");
                return None;
            }
        };

        Some(Recommendation {
            name: name.to_string(),
            runtime,
            description: description.to_string(),
        })
    }
}

/// Trimmed first capture group, `None` if absent or blank
fn capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|value| !value.is_empty())
}
