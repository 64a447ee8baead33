/// TVMaze API response types for deserialization.
///
/// These structures mirror the JSON response format from the TVMaze API.
/// Only the fields needed for display are declared; the rest are ignored.
use serde::{Deserialize, Deserializer};

/// Reads a field that must be present but may be `null`.
///
/// Plain `Option` fields silently become `None` when the key is missing;
/// fields using this helper reject a missing key instead.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// One entry of the `/search/shows` response array.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeSearchResult {
    /// Search relevance score assigned by TVMaze
    pub score: Option<f64>,
    /// The matched show
    pub show: TvMazeShow,
}

/// A show record as embedded in search results.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeShow {
    pub id: u64,
    pub name: String,
    /// Summary in HTML format (may be null)
    #[serde(deserialize_with = "nullable")]
    pub summary: Option<String>,
    /// Image links (null when the show has no poster)
    #[serde(default)]
    pub image: Option<TvMazeImage>,
}

/// Image links of a show.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeImage {
    pub medium: Option<String>,
}

/// A single episode from the `/shows/{id}/episodes` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeEpisode {
    pub id: u64,
    /// Episode title (may be null for episodes without a title)
    #[serde(deserialize_with = "nullable")]
    pub name: Option<String>,
    /// Season number
    pub season: u32,
    /// Episode number within the season (null for specials)
    #[serde(deserialize_with = "nullable")]
    pub number: Option<u32>,
}
