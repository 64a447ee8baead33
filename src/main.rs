use clap::{Parser, Subcommand};
use show_scout::{
    Config, MetadataProvider, ShowBrowser, ShowScoutError, TvMazeProvider, episode_to_text,
    render_episode_list, render_page, render_show_list, show_to_text,
};
use std::process;
use std::time::Duration;
use tracing::Level;

/// Search TVMaze for shows and list their episodes
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TVMaze API base URL
    #[arg(long, global = true, default_value = show_scout::DEFAULT_API_BASE_URL)]
    base_url: String,

    /// Image URL used for shows without a poster
    #[arg(long, global = true, default_value = show_scout::DEFAULT_IMAGE_URL)]
    default_image: String,

    /// Request timeout in seconds
    #[arg(
        long,
        global = true,
        default_value_t = show_scout::DEFAULT_REQUEST_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search shows by name
    Search {
        /// Free-text search term
        term: String,
        /// Print HTML show cards instead of text
        #[arg(long, conflicts_with = "json")]
        html: bool,
        /// Print the shows as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the episodes of a show
    Episodes {
        /// TVMaze show id, as printed by `search`
        show_id: u64,
        /// Print HTML list items instead of text
        #[arg(long, conflicts_with = "json")]
        html: bool,
        /// Print the episodes as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render the full search widget page for a term
    Browse {
        /// Free-text search term
        term: String,
        /// Also open the episode list of this show
        #[arg(long)]
        show: Option<u64>,
    },
}

impl Cli {
    fn config(&self) -> Config {
        Config::default()
            .with_api_base_url(self.base_url.as_str())
            .with_default_image_url(self.default_image.as_str())
            .with_request_timeout(Duration::from_secs(self.timeout))
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

async fn run(cli: Cli) -> Result<(), ShowScoutError> {
    let config = cli.config();
    let provider = TvMazeProvider::new(&config)?;

    match cli.command {
        Command::Search { term, html, json } => {
            let shows = provider.search_shows(&term).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&shows)?);
            } else if html {
                print!("{}", render_show_list(&shows)?);
            } else if shows.is_empty() {
                println!("No shows found for '{}'.", term.trim());
            } else {
                for show in &shows {
                    println!("{}", show_to_text(show));
                }
            }
        }
        Command::Episodes { show_id, html, json } => {
            let episodes = provider.fetch_episodes(show_id).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&episodes)?);
            } else if html {
                print!("{}", render_episode_list(&episodes)?);
            } else if episodes.is_empty() {
                println!("Show #{} has no episodes.", show_id);
            } else {
                for episode in &episodes {
                    println!("{}", episode_to_text(episode));
                }
            }
        }
        Command::Browse { term, show } => {
            let browser = ShowBrowser::new(provider);

            // Failures are part of the rendered page
            if let Err(e) = browser.submit_search(&term).await {
                eprintln!("Search failed: {}", e);
            }
            if let Some(show_id) = show {
                if let Err(e) = browser.request_episodes(show_id).await {
                    eprintln!("Episode lookup failed: {}", e);
                }
            }

            print!("{}", render_page(&browser.state(), &term)?);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
