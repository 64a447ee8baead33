//! View rendering
//!
//! Turns shows, episodes and the browser state into HTML fragments for the
//! search widget, or into plain text for terminal output. The HTML comes
//! from the askama templates under `templates/`.

use askama::Template;

use crate::browser::{EpisodesState, ResultsState, ViewState};
use crate::metadata_retrieval::{Episode, ShowSummary};

/// Card for one search result.
///
/// The summary is provider markup and goes in unescaped; everything else
/// is escaped by the template.
#[derive(Template)]
#[template(path = "show_card.html")]
pub struct ShowCardTemplate<'a> {
    pub show: &'a ShowSummary,
}

/// One entry of the episode list.
#[derive(Template)]
#[template(path = "episode_item.html")]
pub struct EpisodeItemTemplate<'a> {
    pub episode: &'a Episode,
}

/// The whole widget: search form, results and episode area.
#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate<'a> {
    pub term: &'a str,
    pub shows: &'a [ShowSummary],
    pub shows_empty: bool,
    pub shows_error: Option<&'a str>,
    /// `None` keeps the episode area hidden
    pub episodes_show_id: Option<u64>,
    pub episodes: &'a [Episode],
    pub episodes_empty: bool,
    pub episodes_error: Option<&'a str>,
}

impl<'a> PageTemplate<'a> {
    pub fn new(state: &'a ViewState, term: &'a str) -> Self {
        let (shows, shows_error): (&[ShowSummary], _) = match &state.results {
            ResultsState::Idle => (&[], None),
            ResultsState::Loaded(shows) => (shows.as_slice(), None),
            ResultsState::Failed(message) => (&[], Some(message.as_str())),
        };
        let (episodes_show_id, episodes, episodes_error): (_, &[Episode], _) = match &state.episodes
        {
            EpisodesState::Hidden => (None, &[], None),
            EpisodesState::Loaded { show_id, episodes } => {
                (Some(*show_id), episodes.as_slice(), None)
            }
            EpisodesState::Failed { show_id, message } => {
                (Some(*show_id), &[], Some(message.as_str()))
            }
        };

        Self {
            term,
            shows,
            shows_empty: matches!(&state.results, ResultsState::Loaded(shows) if shows.is_empty()),
            shows_error,
            episodes_show_id,
            episodes,
            episodes_empty: matches!(
                &state.episodes,
                EpisodesState::Loaded { episodes, .. } if episodes.is_empty()
            ),
            episodes_error,
        }
    }
}

/// Renders the card for one search result.
pub fn render_show_card(show: &ShowSummary) -> askama::Result<String> {
    ShowCardTemplate { show }.render()
}

/// Renders one episode list item.
pub fn render_episode_item(episode: &Episode) -> askama::Result<String> {
    EpisodeItemTemplate { episode }.render()
}

/// Renders all show cards, in order, one per line.
pub fn render_show_list(shows: &[ShowSummary]) -> askama::Result<String> {
    shows
        .iter()
        .map(|show| render_show_card(show).map(|card| card + "\n"))
        .collect()
}

/// Renders all episode list items, in order, one per line.
pub fn render_episode_list(episodes: &[Episode]) -> askama::Result<String> {
    episodes
        .iter()
        .map(|episode| render_episode_item(episode).map(|item| item + "\n"))
        .collect()
}

/// Renders the whole widget for the given state.
///
/// The episode area carries the `hidden` attribute unless episodes were
/// requested since the last search.
pub fn render_page(state: &ViewState, term: &str) -> askama::Result<String> {
    PageTemplate::new(state, term).render()
}

/// Formats a show for the terminal, with the summary markup stripped.
pub fn show_to_text(show: &ShowSummary) -> String {
    let summary = nanohtml2text::html2text(&show.summary).trim().to_string();
    let mut text = format!("#{} {}\n  Image: {}\n", show.id, show.name, show.image_url);
    if !summary.is_empty() {
        text.push_str(&format!("  {}\n", summary.replace('\n', "\n  ")));
    }
    text
}

/// Formats an episode for the terminal.
pub fn episode_to_text(episode: &Episode) -> String {
    format!(
        "{} (season {}, number {})",
        episode.name, episode.season, episode.number
    )
}
