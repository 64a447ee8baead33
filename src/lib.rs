//! show_scout - Search TV shows and list their episodes
//!
//! This library queries the TVMaze API for shows matching a search term,
//! maps the results into display-ready summaries, fetches episode lists on
//! demand, and renders both as HTML for the search widget or as plain text.

mod browser;
mod config;
mod metadata_retrieval;
mod request_slot;
mod view;

pub use browser::{BrowserError, EpisodesState, ResultsState, ShowBrowser, ViewState};
pub use config::{Config, DEFAULT_API_BASE_URL, DEFAULT_IMAGE_URL, DEFAULT_REQUEST_TIMEOUT};
pub use metadata_retrieval::{
    Episode, MetadataProvider, MetadataRetrievalError, ShowSummary, TvMazeProvider,
};
pub use request_slot::{Outcome, RequestSlot};
pub use view::{
    EpisodeItemTemplate, PageTemplate, ShowCardTemplate, episode_to_text, render_episode_item,
    render_episode_list, render_page, render_show_card, render_show_list, show_to_text,
};

use thiserror::Error;

/// Top-level error type for show_scout operations
#[derive(Debug, Error)]
pub enum ShowScoutError {
    /// Error during metadata retrieval
    #[error("Metadata retrieval error: {0}")]
    MetadataRetrieval(#[from] MetadataRetrievalError),

    /// Error raised by a browser command handler
    #[error("{0}")]
    Browser(#[from] BrowserError),

    /// Error while rendering an HTML template
    #[error("Rendering failed: {0}")]
    Render(#[from] askama::Error),

    /// Error while writing JSON output
    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Searches TVMaze for shows matching `term`.
///
/// Convenience wrapper that builds a provider from `config` and runs a
/// single search. Results keep the API's order; a show without a poster
/// gets `config.default_image_url`.
///
/// # Examples
///
/// ```no_run
/// use show_scout::{search_shows, Config};
///
/// # async fn run() -> Result<(), show_scout::ShowScoutError> {
/// let shows = search_shows(&Config::default(), "girls").await?;
/// for show in &shows {
///     println!("#{} {}", show.id, show.name);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search_shows(config: &Config, term: &str) -> Result<Vec<ShowSummary>, ShowScoutError> {
    let provider = TvMazeProvider::new(config)?;
    Ok(provider.search_shows(term).await?)
}

/// Fetches the episodes of the show with the given TVMaze id.
///
/// Convenience wrapper that builds a provider from `config` and runs a
/// single lookup. Episodes keep the API's order.
pub async fn fetch_episodes(config: &Config, show_id: u64) -> Result<Vec<Episode>, ShowScoutError> {
    let provider = TvMazeProvider::new(config)?;
    Ok(provider.fetch_episodes(show_id).await?)
}
