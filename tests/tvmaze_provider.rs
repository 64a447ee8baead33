use serde_json::json;
use show_scout::{
    Config, Episode, EpisodesState, MetadataProvider, MetadataRetrievalError, Outcome,
    ResultsState, ShowBrowser, ShowSummary, TvMazeProvider,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Minimal HTTP/1.1 server answering from a handler keyed on the request target.
///
/// A handler returning `None` keeps the connection open without answering.
struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    async fn start<H>(handler: H) -> Self
    where
        H: Fn(&str) -> Option<(u16, String)> + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler = Arc::new(handler);

        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let handler = Arc::clone(&handler);
                let seen = Arc::clone(&seen);
                tokio::spawn(async move { handle_connection(socket, handler, seen).await });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    fn config(&self) -> Config {
        Config::default()
            .with_api_base_url(self.base_url.as_str())
            .with_request_timeout(Duration::from_secs(5))
    }

    fn provider(&self) -> TvMazeProvider {
        TvMazeProvider::new(&self.config()).unwrap()
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn handle_connection<H>(mut socket: TcpStream, handler: Arc<H>, seen: Arc<Mutex<Vec<String>>>)
where
    H: Fn(&str) -> Option<(u16, String)>,
{
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buffer.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buffer.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buffer);
    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default()
        .to_string();
    seen.lock().unwrap().push(target.clone());

    let Some((status, body)) = handler(&target) else {
        std::future::pending::<()>().await;
        return;
    };

    let response = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

fn search_body() -> String {
    json!([
        {
            "score": 0.91,
            "show": {
                "id": 139,
                "name": "Girls",
                "summary": "<p>This Emmy winning series is a comic look at the assorted humiliations and rare triumphs of a group of girls in their 20s.</p>",
                "language": "English",
                "image": {
                    "medium": "https://static.tvmaze.com/uploads/images/medium_portrait/31/78286.jpg",
                    "original": "https://static.tvmaze.com/uploads/images/original_untouched/31/78286.jpg"
                }
            }
        },
        {
            "score": 0.42,
            "show": {
                "id": 1,
                "name": "Girls",
                "summary": "<p>...</p>",
                "image": null
            }
        },
        {
            "score": 0.17,
            "show": {
                "id": 41734,
                "name": "Girls5eva",
                "summary": null,
                "image": null
            }
        }
    ])
    .to_string()
}

fn episodes_body() -> String {
    json!([
        {"id": 10, "name": "Pilot", "season": 1, "number": 1, "airdate": "2012-04-15"},
        {"id": 11, "name": "Vagina Panic", "season": 1, "number": 2},
        {"id": 12, "name": "All Adventurous Women Do", "season": 1, "number": 3},
        {"id": 99, "name": "Behind the Scenes", "season": 0, "number": null}
    ])
    .to_string()
}

fn tvmaze_routes(target: &str) -> Option<(u16, String)> {
    if target.starts_with("/search/shows?") {
        Some((200, search_body()))
    } else if target == "/shows/139/episodes" {
        Some((200, episodes_body()))
    } else if target == "/shows/2/episodes" {
        Some((200, "[]".to_string()))
    } else {
        Some((404, json!({"name": "Not Found", "status": 404}).to_string()))
    }
}

#[tokio::test]
async fn test_search_maps_results_in_api_order() {
    let server = StubServer::start(tvmaze_routes).await;
    let shows = server.provider().search_shows("girls").await.unwrap();

    assert_eq!(
        shows,
        vec![
            ShowSummary {
                id: 139,
                name: "Girls".to_string(),
                summary: "<p>This Emmy winning series is a comic look at the assorted humiliations and rare triumphs of a group of girls in their 20s.</p>".to_string(),
                image_url: "https://static.tvmaze.com/uploads/images/medium_portrait/31/78286.jpg".to_string(),
            },
            ShowSummary {
                id: 1,
                name: "Girls".to_string(),
                summary: "<p>...</p>".to_string(),
                image_url: "https://tinyurl.com/tv-missing".to_string(),
            },
            ShowSummary {
                id: 41734,
                name: "Girls5eva".to_string(),
                summary: String::new(),
                image_url: "https://tinyurl.com/tv-missing".to_string(),
            },
        ]
    );
    assert_eq!(server.requests(), vec!["/search/shows?q=girls".to_string()]);
}

#[tokio::test]
async fn test_search_term_is_trimmed_and_encoded() {
    let server = StubServer::start(tvmaze_routes).await;
    server.provider().search_shows("  the wire & co ").await.unwrap();

    assert_eq!(
        server.requests(),
        vec!["/search/shows?q=the+wire+%26+co".to_string()]
    );
}

#[tokio::test]
async fn test_custom_default_image() {
    let server = StubServer::start(tvmaze_routes).await;
    let config = server
        .config()
        .with_default_image_url("https://example.org/placeholder.png");
    let provider = TvMazeProvider::new(&config).unwrap();

    let shows = provider.search_shows("girls").await.unwrap();
    assert_eq!(shows[1].image_url, "https://example.org/placeholder.png");
    assert!(shows.iter().all(|show| !show.image_url.is_empty()));
}

#[tokio::test]
async fn test_search_is_idempotent() {
    let server = StubServer::start(tvmaze_routes).await;
    let provider = server.provider();

    let first = provider.search_shows("girls").await.unwrap();
    let second = provider.search_shows("girls").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn test_fetch_episodes_in_api_order() {
    let server = StubServer::start(tvmaze_routes).await;
    let episodes = server.provider().fetch_episodes(139).await.unwrap();

    let ids: Vec<u64> = episodes.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![10, 11, 12, 99]);
    assert_eq!(
        episodes[0],
        Episode {
            id: 10,
            name: "Pilot".to_string(),
            season: 1,
            number: 1,
        }
    );
    assert_eq!(episodes[3].season, 0);
    assert_eq!(episodes[3].number, 0);
    assert_eq!(server.requests(), vec!["/shows/139/episodes".to_string()]);
}

#[tokio::test]
async fn test_show_without_episodes_is_empty_not_error() {
    let server = StubServer::start(tvmaze_routes).await;
    let episodes = server.provider().fetch_episodes(2).await.unwrap();
    assert!(episodes.is_empty());
}

#[tokio::test]
async fn test_non_success_status_is_api_error() {
    let server = StubServer::start(tvmaze_routes).await;
    let error = server.provider().fetch_episodes(424242).await.unwrap_err();
    assert!(matches!(
        error,
        MetadataRetrievalError::Api { status: 404, .. }
    ));

    let server = StubServer::start(|_: &str| Some((500, "oops".to_string()))).await;
    let error = server.provider().search_shows("girls").await.unwrap_err();
    match error {
        MetadataRetrievalError::Api { status, reason } => {
            assert_eq!(status, 500);
            assert_eq!(reason, "Internal Server Error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = StubServer::start(|_: &str| Some((200, "<html>not json</html>".to_string()))).await;
    let error = server.provider().search_shows("girls").await.unwrap_err();
    assert!(matches!(error, MetadataRetrievalError::Parse(_)));

    // Missing the show id
    let server = StubServer::start(|_: &str| {
        Some((200, json!([{"score": 1.0, "show": {"name": "Girls", "summary": null}}]).to_string()))
    })
    .await;
    let error = server.provider().search_shows("girls").await.unwrap_err();
    assert!(matches!(error, MetadataRetrievalError::Parse(_)));

    // Episode list that is not an array
    let server = StubServer::start(|_: &str| Some((200, json!({"id": 10}).to_string()))).await;
    let error = server.provider().fetch_episodes(139).await.unwrap_err();
    assert!(matches!(error, MetadataRetrievalError::Parse(_)));
}

#[tokio::test]
async fn test_unreachable_api_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = Config::default().with_api_base_url(format!("http://{}", addr));
    let provider = TvMazeProvider::new(&config).unwrap();

    let error = provider.search_shows("girls").await.unwrap_err();
    assert!(matches!(error, MetadataRetrievalError::Network(_)));
}

#[tokio::test]
async fn test_silent_api_times_out() {
    let server = StubServer::start(|_: &str| None).await;
    let config = server
        .config()
        .with_request_timeout(Duration::from_millis(200));
    let provider = TvMazeProvider::new(&config).unwrap();

    let error = provider.fetch_episodes(139).await.unwrap_err();
    assert!(matches!(
        error,
        MetadataRetrievalError::Timeout(timeout) if timeout == Duration::from_millis(200)
    ));
}

#[tokio::test]
async fn test_browser_against_stub_api() {
    let server = StubServer::start(tvmaze_routes).await;
    let browser = ShowBrowser::new(server.provider());

    assert_eq!(
        browser.submit_search("girls").await.unwrap(),
        Outcome::Current(3)
    );
    assert_eq!(
        browser.request_episodes(139).await.unwrap(),
        Outcome::Current(4)
    );

    let state = browser.state();
    assert!(matches!(state.results, ResultsState::Loaded(ref shows) if shows.len() == 3));
    assert!(matches!(
        state.episodes,
        EpisodesState::Loaded { show_id: 139, ref episodes } if episodes.len() == 4
    ));

    assert!(browser.request_episodes(424242).await.is_err());
    assert!(matches!(
        browser.state().episodes,
        EpisodesState::Failed { show_id: 424242, .. }
    ));
}

#[tokio::test]
async fn test_convenience_functions() {
    let server = StubServer::start(tvmaze_routes).await;
    let config = server.config();

    let shows = show_scout::search_shows(&config, "girls").await.unwrap();
    assert_eq!(shows.len(), 3);

    let episodes = show_scout::fetch_episodes(&config, shows[0].id).await.unwrap();
    assert_eq!(episodes.len(), 4);

    let error = show_scout::search_shows(&config, "").await.unwrap_err();
    assert!(matches!(
        error,
        show_scout::ShowScoutError::MetadataRetrieval(MetadataRetrievalError::EmptySearchTerm)
    ));
}
