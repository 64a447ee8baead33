/// TVMaze metadata provider implementation.
use super::tvmaze_types::{TvMazeEpisode, TvMazeSearchResult, TvMazeShow};
use super::{
    Episode, MetadataProvider, MetadataRetrievalError, ShowSummary, normalize_term,
    validate_show_id,
};
use crate::config::Config;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Metadata provider for the TVMaze API.
///
/// This provider talks to https://api.tvmaze.com (or the configured base URL)
/// using the `/search/shows` and `/shows/{id}/episodes` endpoints. Cloning is
/// cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct TvMazeProvider {
    client: reqwest::Client,
    base_url: String,
    default_image_url: String,
    timeout: Duration,
}

impl TvMazeProvider {
    /// Creates a new TVMaze provider from the given configuration.
    ///
    /// Every request made by the provider is bounded by
    /// `config.request_timeout`.
    pub fn new(config: &Config) -> Result<Self, MetadataRetrievalError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MetadataRetrievalError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            default_image_url: config.default_image_url.clone(),
            timeout: config.request_timeout,
        })
    }

    /// Converts a TVMaze show to the display-ready ShowSummary.
    ///
    /// The medium poster is used when present and non-empty, otherwise the
    /// placeholder image. All other fields are copied verbatim.
    fn convert_show(tvmaze_show: TvMazeShow, default_image_url: &str) -> ShowSummary {
        let image_url = tvmaze_show
            .image
            .and_then(|image| image.medium)
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| default_image_url.to_string());

        ShowSummary {
            id: tvmaze_show.id,
            name: tvmaze_show.name,
            summary: tvmaze_show.summary.unwrap_or_default(),
            image_url,
        }
    }

    /// Converts a TVMaze episode to our Episode structure.
    fn convert_episode(tvmaze_episode: TvMazeEpisode) -> Episode {
        Episode {
            id: tvmaze_episode.id,
            name: tvmaze_episode.name.unwrap_or_default(),
            season: tvmaze_episode.season,
            number: tvmaze_episode.number.unwrap_or_default(),
        }
    }

    /// Maps a transport failure to Timeout or Network.
    fn request_error(&self, error: reqwest::Error) -> MetadataRetrievalError {
        if error.is_timeout() {
            MetadataRetrievalError::Timeout(self.timeout)
        } else {
            MetadataRetrievalError::Network(error.to_string())
        }
    }

    /// Sends a GET request and parses the JSON body into `T`.
    async fn get_json<T>(&self, request: reqwest::RequestBuilder) -> Result<T, MetadataRetrievalError>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(|e| self.request_error(e))?;

        // Ensure request was successful
        let status = response.status();
        if !status.is_success() {
            warn!(url = %response.url(), status = status.as_u16(), "TVMaze request failed");
            return Err(MetadataRetrievalError::Api {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await.map_err(|e| self.request_error(e))?;

        serde_json::from_str(&body).map_err(|e| MetadataRetrievalError::Parse(e.to_string()))
    }
}

impl MetadataProvider for TvMazeProvider {
    async fn search_shows(&self, term: &str) -> Result<Vec<ShowSummary>, MetadataRetrievalError> {
        let term = normalize_term(term)?;
        let url = format!("{}/search/shows", self.base_url);
        debug!(%url, term, "searching shows");

        let results: Vec<TvMazeSearchResult> = self
            .get_json(self.client.get(&url).query(&[("q", term)]))
            .await?;

        let shows: Vec<ShowSummary> = results
            .into_iter()
            .map(|result| {
                debug!(id = result.show.id, score = ?result.score, "search hit");
                Self::convert_show(result.show, &self.default_image_url)
            })
            .collect();

        info!(term, count = shows.len(), "show search finished");
        Ok(shows)
    }

    async fn fetch_episodes(&self, show_id: u64) -> Result<Vec<Episode>, MetadataRetrievalError> {
        let show_id = validate_show_id(show_id)?;
        let url = format!("{}/shows/{}/episodes", self.base_url, show_id);
        debug!(%url, "fetching episodes");

        let raw_episodes: Vec<TvMazeEpisode> = self.get_json(self.client.get(&url)).await?;

        let episodes: Vec<Episode> = raw_episodes
            .into_iter()
            .map(Self::convert_episode)
            .collect();

        info!(show_id, count = episodes.len(), "episode lookup finished");
        Ok(episodes)
    }
}
