use reqwest::Url;
use serde::{Deserialize, Serialize};

/// A movie suggestion extracted from a model turn
///
/// Never persisted by the client; it only lives as long as the rendered card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    /// Runtime in whole minutes, always positive
    pub runtime: u32,
    pub description: String,
}

impl Recommendation {
    /// Watchlist confirmation link for this recommendation
    ///
    /// `{frontend}/confirm?movie_name=..&description=..&runtime=..`
    pub fn watchlist_link(&self, frontend: &Url) -> Url {
        let mut url = frontend.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("confirm");
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("movie_name", &self.name)
            .append_pair("description", &self.description)
            .append_pair("runtime", &self.runtime.to_string());
        url
    }
}

/// Body of `POST /movies/add` when a recommendation is accepted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchlistEntry {
    pub movie_name: String,
    pub movie_description: String,
    pub runtime: u32,
    pub user_email: String,
    pub has_watched: bool,
    pub rating: Option<f32>,
}

impl WatchlistEntry {
    /// New, unwatched and unrated entry for the given user
    pub fn from_recommendation(recommendation: &Recommendation, user_email: &str) -> Self {
        Self {
            movie_name: recommendation.name.clone(),
            movie_description: recommendation.description.clone(),
            runtime: recommendation.runtime,
            user_email: user_email.to_string(),
            has_watched: false,
            rating: None,
        }
    }
}
