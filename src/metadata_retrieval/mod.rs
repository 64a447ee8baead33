/// Data structures and traits for TV show metadata retrieval.
///
/// This module provides the display-ready shapes for shows and episodes,
/// the errors a lookup can fail with, and the trait implemented by
/// metadata providers.
mod tvmaze;
mod tvmaze_types;

pub use tvmaze::TvMazeProvider;

use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during metadata retrieval operations.
#[derive(Debug, Error)]
pub enum MetadataRetrievalError {
    /// The request could not complete (connection refused, DNS failure, reset)
    #[error("Request failed: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The API answered with a non-success status
    #[error("API returned HTTP {status} {reason}")]
    Api { status: u16, reason: String },

    /// Failed to parse the provider's JSON response
    #[error("Failed to parse API response: {0}")]
    Parse(String),

    /// The search term was empty after trimming
    #[error("Search term must not be empty")]
    EmptySearchTerm,

    /// Show identifiers are positive integers
    #[error("Invalid show id: {0}")]
    InvalidShowId(u64),
}

/// A show as displayed in the search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowSummary {
    /// The provider's identifier for this show
    pub id: u64,
    /// The show title
    pub name: String,
    /// Summary as delivered by the provider, may contain HTML markup
    pub summary: String,
    /// Poster image; the configured placeholder when the provider has none
    pub image_url: String,
}

/// A single episode of a show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Episode {
    /// The provider's identifier for this episode
    pub id: u64,
    /// The episode title
    pub name: String,
    /// The season number (0 for specials)
    pub season: u32,
    /// The episode number within the season
    pub number: u32,
}

/// Trait for metadata providers that can search shows and list episodes.
///
/// Both operations preserve the order in which the provider returns its
/// results. A failed request is always reported as an error, never as an
/// empty list.
pub trait MetadataProvider {
    /// Searches for shows matching a free-text term.
    ///
    /// # Arguments
    ///
    /// * `term` - The search term; must not be empty or whitespace only
    ///
    /// # Returns
    ///
    /// The matching shows in provider order, or a MetadataRetrievalError
    fn search_shows(
        &self,
        term: &str,
    ) -> impl Future<Output = Result<Vec<ShowSummary>, MetadataRetrievalError>> + Send;

    /// Fetches the episode list of a show.
    ///
    /// # Arguments
    ///
    /// * `show_id` - The identifier of the show, as found in a `ShowSummary`
    ///
    /// # Returns
    ///
    /// The episodes in provider order, or a MetadataRetrievalError
    fn fetch_episodes(
        &self,
        show_id: u64,
    ) -> impl Future<Output = Result<Vec<Episode>, MetadataRetrievalError>> + Send;
}

/// Validates a search term, returning it trimmed.
pub(crate) fn normalize_term(term: &str) -> Result<&str, MetadataRetrievalError> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        return Err(MetadataRetrievalError::EmptySearchTerm);
    }
    Ok(trimmed)
}

/// Rejects the zero id before any request is made.
pub(crate) fn validate_show_id(show_id: u64) -> Result<u64, MetadataRetrievalError> {
    if show_id == 0 {
        return Err(MetadataRetrievalError::InvalidShowId(show_id));
    }
    Ok(show_id)
}
