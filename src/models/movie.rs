use serde::{Deserialize, Serialize};

/// Which half of the watchlist to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchStatus {
    /// Saved but not yet watched (`GET /movies/not-watched`)
    NotWatched,
    /// Watched and usually rated (`GET /movies/watched`)
    Watched,
}

impl WatchStatus {
    /// Path segment of the listing endpoint
    pub fn segment(self) -> &'static str {
        match self {
            WatchStatus::NotWatched => "not-watched",
            WatchStatus::Watched => "watched",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            WatchStatus::NotWatched => "Your watchlist:",
            WatchStatus::Watched => "Movies you've watched:",
        }
    }

    pub fn empty_text(self) -> &'static str {
        match self {
            WatchStatus::NotWatched => "Your watchlist is empty.",
            WatchStatus::Watched => "You haven't watched anything yet.",
        }
    }
}

/// Movie document as stored on the user's watchlist
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WatchlistMovie {
    pub movie_id: String,
    pub movie_name: String,
    #[serde(default)]
    pub movie_description: String,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub has_watched: bool,
    #[serde(default)]
    pub rating: Option<f32>,
}

impl WatchlistMovie {
    /// One listing line, e.g. `The Conjuring (112 min), rated 8/10 [id: m1]`
    pub fn summary_line(&self) -> String {
        let mut line = self.movie_name.clone();
        if let Some(runtime) = self.runtime {
            line.push_str(&format!(" ({} min)", runtime));
        }
        if let Some(rating) = self.rating {
            line.push_str(&format!(", rated {}/10", rating));
        }
        line.push_str(&format!(" [id: {}]", self.movie_id));
        line
    }

    /// Multi-line detail view
    pub fn detail_text(&self) -> String {
        let mut lines = vec![format!("🎬 {}", self.movie_name)];
        if !self.movie_description.trim().is_empty() {
            lines.push(self.movie_description.trim().to_string());
        }
        if let Some(runtime) = self.runtime {
            lines.push(format!("⏱️ Runtime: {} minutes", runtime));
        }
        lines.push(match (self.has_watched, self.rating) {
            (true, Some(rating)) => format!("Watched, rated {}/10", rating),
            (true, None) => "Watched, not rated".to_string(),
            (false, _) => "Not watched yet".to_string(),
        });
        lines.join("\n")
    }
}

/// Successful reply to `GET /movies/not-watched` and `GET /movies/watched`
#[derive(Debug, Clone, Deserialize)]
pub struct MoviesResponse {
    #[serde(default)]
    pub movies: Vec<WatchlistMovie>,
}

/// Successful reply to `GET /movies/{movie_id}`
#[derive(Debug, Clone, Deserialize)]
pub struct MovieResponse {
    pub movie: WatchlistMovie,
}

/// Ratings are on a ten point scale, bounds included
pub const MIN_RATING: f32 = 0.0;
pub const MAX_RATING: f32 = 10.0;

/// Body of `PUT /movies/{movie_id}/rate`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingRequest {
    pub user_email: String,
    pub rating: f32,
    pub has_watched: bool,
}

impl RatingRequest {
    /// Rates the movie and marks it as watched
    pub fn watched(user_email: impl Into<String>, rating: f32) -> Self {
        Self {
            user_email: user_email.into(),
            rating,
            has_watched: true,
        }
    }

    pub fn is_valid_rating(rating: f32) -> bool {
        rating.is_finite() && (MIN_RATING..=MAX_RATING).contains(&rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_server_movie_document() {
        // The server sends both `_id` and `movie_id`
        let movie: WatchlistMovie = serde_json::from_value(json!({
            "_id": "65f1c0ffee",
            "movie_id": "65f1c0ffee",
            "movie_name": "Inception",
            "movie_description": "A thief who steals corporate secrets...",
            "user_email": "john@example.com",
            "has_watched": false,
            "rating": null,
            "runtime": 148,
            "created_at": "Sun, 18 Oct 2026 10:00:00 GMT"
        }))
        .unwrap();

        assert_eq!(movie.movie_id, "65f1c0ffee");
        assert_eq!(movie.runtime, Some(148));
        assert!(!movie.has_watched);
        assert_eq!(movie.rating, None);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let movie: WatchlistMovie = serde_json::from_value(json!({
            "movie_id": "m1",
            "movie_name": "Heat",
            "runtime": null
        }))
        .unwrap();

        assert_eq!(movie.movie_description, "");
        assert_eq!(movie.runtime, None);
        assert!(!movie.has_watched);
    }

    #[test]
    fn test_summary_line() {
        let mut movie = WatchlistMovie {
            movie_id: "m1".to_string(),
            movie_name: "The Conjuring".to_string(),
            movie_description: String::new(),
            runtime: Some(112),
            has_watched: false,
            rating: None,
        };
        assert_eq!(movie.summary_line(), "The Conjuring (112 min) [id: m1]");

        movie.runtime = None;
        movie.rating = Some(8.5);
        assert_eq!(movie.summary_line(), "The Conjuring, rated 8.5/10 [id: m1]");
    }

    #[test]
    fn test_detail_text() {
        let movie = WatchlistMovie {
            movie_id: "m2".to_string(),
            movie_name: "Heat".to_string(),
            movie_description: "A heist thriller.".to_string(),
            runtime: Some(170),
            has_watched: true,
            rating: Some(9.0),
        };
        assert_eq!(
            movie.detail_text(),
            "🎬 Heat\nA heist thriller.\n⏱️ Runtime: 170 minutes\nWatched, rated 9/10"
        );
    }

    #[test]
    fn test_rating_request_marks_watched() {
        let request = RatingRequest::watched("john@example.com", 8.5);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"user_email": "john@example.com", "rating": 8.5, "has_watched": true})
        );
    }

    #[test]
    fn test_rating_bounds() {
        assert!(RatingRequest::is_valid_rating(0.0));
        assert!(RatingRequest::is_valid_rating(10.0));
        assert!(!RatingRequest::is_valid_rating(10.5));
        assert!(!RatingRequest::is_valid_rating(-1.0));
        assert!(!RatingRequest::is_valid_rating(f32::NAN));
    }

    #[test]
    fn test_watch_status_segments() {
        assert_eq!(WatchStatus::NotWatched.segment(), "not-watched");
        assert_eq!(WatchStatus::Watched.segment(), "watched");
    }
}
