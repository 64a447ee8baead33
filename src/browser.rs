//! Show browser component
//!
//! `ShowBrowser` owns the state of the search widget: the list of search
//! results and the episode area. The two command handlers are what a UI
//! binds to the search form and to a show's "Episodes" button. Each handler
//! replaces its part of the state wholesale, and a request replaced by a
//! newer one of the same kind never touches the state.

use crate::metadata_retrieval::{
    Episode, MetadataProvider, MetadataRetrievalError, ShowSummary, normalize_term,
    validate_show_id,
};
use crate::request_slot::{Outcome, RequestSlot};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{info, warn};

/// Errors returned by the browser's command handlers
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Metadata retrieval error: {0}")]
    Retrieval(#[from] MetadataRetrievalError),
}

/// State of the search results area
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultsState {
    /// No search has been run yet
    #[default]
    Idle,
    /// The latest search succeeded; the list may be empty
    Loaded(Vec<ShowSummary>),
    /// The latest search failed
    Failed(String),
}

/// State of the episode area
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EpisodesState {
    /// The episode area is not shown
    #[default]
    Hidden,
    /// Episodes of `show_id`; the list may be empty
    Loaded {
        show_id: u64,
        episodes: Vec<Episode>,
    },
    /// Fetching the episodes of `show_id` failed
    Failed { show_id: u64, message: String },
}

impl EpisodesState {
    pub fn is_visible(&self) -> bool {
        !matches!(self, EpisodesState::Hidden)
    }
}

/// Everything the views need to render the widget
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub results: ResultsState,
    pub episodes: EpisodesState,
}

/// Search widget state plus the handlers that drive it.
///
/// Handlers take `&self` and may run concurrently; a newer search aborts an
/// older one, and likewise for episode requests.
pub struct ShowBrowser<P> {
    provider: P,
    search_slot: RequestSlot,
    episodes_slot: RequestSlot,
    state: Mutex<ViewState>,
}

impl<P> ShowBrowser<P>
where
    P: MetadataProvider + Clone + Send + Sync + 'static,
{
    /// Creates a browser with no results and a hidden episode area.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            search_slot: RequestSlot::new("search"),
            episodes_slot: RequestSlot::new("episodes"),
            state: Mutex::new(ViewState::default()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a snapshot of the current view state.
    pub fn state(&self) -> ViewState {
        self.lock_state().clone()
    }

    /// Handles a search form submission.
    ///
    /// Hides the episode area and replaces the results with the shows found
    /// for `term`. On failure the results area is marked failed (stale
    /// results are not kept) and the error is returned.
    ///
    /// An empty term is rejected without touching the state.
    ///
    /// # Returns
    ///
    /// The number of shows found, or `Outcome::Superseded` when a newer
    /// search replaced this one.
    pub async fn submit_search(&self, term: &str) -> Result<Outcome<usize>, BrowserError> {
        let term = normalize_term(term)?.to_string();

        // Episodes requested for the previous results are no longer wanted
        self.episodes_slot.cancel();

        let provider = self.provider.clone();
        let request_term = term.clone();
        let outcome = self
            .search_slot
            .run(
                async move { provider.search_shows(&request_term).await },
                |result| {
                    let mut state = self.lock_state();
                    state.episodes = EpisodesState::Hidden;
                    match result {
                        Ok(shows) => {
                            let count = shows.len();
                            state.results = ResultsState::Loaded(shows);
                            Ok(count)
                        }
                        Err(e) => {
                            state.results = ResultsState::Failed(e.to_string());
                            Err(e)
                        }
                    }
                },
            )
            .await;

        match &outcome {
            Outcome::Current(Ok(count)) => info!(term = %term, count, "search results displayed"),
            Outcome::Current(Err(e)) => warn!(term = %term, error = %e, "search failed"),
            Outcome::Superseded => info!(term = %term, "search superseded"),
        }

        Ok(outcome.transpose()?)
    }

    /// Handles a click on a show's "Episodes" button.
    ///
    /// Shows the episode area and replaces its list with the episodes of
    /// `show_id`. On failure the area shows the failure instead of an empty
    /// list and the error is returned.
    ///
    /// # Returns
    ///
    /// The number of episodes found, or `Outcome::Superseded` when a newer
    /// episode request or search replaced this one.
    pub async fn request_episodes(&self, show_id: u64) -> Result<Outcome<usize>, BrowserError> {
        let show_id = validate_show_id(show_id)?;

        let provider = self.provider.clone();
        let outcome = self
            .episodes_slot
            .run(
                async move { provider.fetch_episodes(show_id).await },
                |result| {
                    let mut state = self.lock_state();
                    match result {
                        Ok(episodes) => {
                            let count = episodes.len();
                            state.episodes = EpisodesState::Loaded { show_id, episodes };
                            Ok(count)
                        }
                        Err(e) => {
                            state.episodes = EpisodesState::Failed {
                                show_id,
                                message: e.to_string(),
                            };
                            Err(e)
                        }
                    }
                },
            )
            .await;

        match &outcome {
            Outcome::Current(Ok(count)) => info!(show_id, count, "episodes displayed"),
            Outcome::Current(Err(e)) => warn!(show_id, error = %e, "episode lookup failed"),
            Outcome::Superseded => info!(show_id, "episode lookup superseded"),
        }

        Ok(outcome.transpose()?)
    }
}
