//! Web UI and JSON API server.
//!
//! Renders the three-page UI (encyclopedia, Q&A bot, drivers & tracks) and
//! exposes REST endpoints for integration with other systems. Per-session
//! page state lives server-side, keyed by a session cookie.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::index::Match;
use crate::news::NewsClient;
use crate::orchestrator::Orchestrator;
use crate::rag::ANSWER_UNAVAILABLE;
use axum::{
    extract::{Form, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;
use uuid::Uuid;

const SESSION_COOKIE: &str = "sid";

/// The three pages reachable from the sidebar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Page {
    #[default]
    Encyclopedia,
    Bot,
    Library,
}

impl Page {
    fn path(&self) -> &'static str {
        match self {
            Page::Encyclopedia => "/encyclopedia",
            Page::Bot => "/bot",
            Page::Library => "/library",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Page::Encyclopedia => "F1 Encyclopedia",
            Page::Bot => "Paddock Pal Bot",
            Page::Library => "Drivers & Tracks",
        }
    }
}

/// Per-session UI state, reset on server restart.
#[derive(Debug, Clone, Default)]
struct Session {
    current_page: Page,
    last_query: String,
    last_answer: String,
}

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
    news: Option<NewsClient>,
    sessions: RwLock<HashMap<Uuid, Session>>,
}

/// Run the web server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Serve) {
        Output::error(&format!("{}", e));
        Output::info("Run 'paddock doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let news = NewsClient::from_env(settings.news.clone());
    let orchestrator = Orchestrator::new(settings).await?;

    // Create any missing indexes before the first query arrives.
    orchestrator.provision().await?;

    let state = Arc::new(AppState {
        orchestrator,
        news,
        sessions: RwLock::new(HashMap::new()),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(index))
        .route("/encyclopedia", get(encyclopedia))
        .route("/bot", get(bot_page).post(bot_submit))
        .route("/library", get(library_index))
        .route("/library/{section}", get(library_section))
        .route("/library/{section}/{item}", get(library_item))
        .route("/images/history/{index}", get(history_image))
        .route("/images/{section}/{item}", get(section_image))
        .route("/health", get(health))
        .route("/api/ask", post(api_ask))
        .route("/api/search", post(api_search))
        .route("/api/news", get(api_news))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Paddock Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Pages:");
    Output::kv("Encyclopedia", "GET  /encyclopedia");
    Output::kv("Q&A Bot", "GET  /bot");
    Output::kv("Drivers & Tracks", "GET  /library");
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Ask (RAG)", "POST /api/ask");
    Output::kv("Search", "POST /api/search");
    Output::kv("News", "GET  /api/news");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Sessions ===

/// Extract the session id from the Cookie header.
fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|part| {
        let (name, value) = part.trim().split_once('=')?;
        if name == SESSION_COOKIE {
            Uuid::parse_str(value).ok()
        } else {
            None
        }
    })
}

/// Resolve the request's session, creating one for first-time visitors.
fn resolve_session(headers: &HeaderMap) -> (Uuid, bool) {
    match session_id_from_headers(headers) {
        Some(id) => (id, false),
        None => (Uuid::new_v4(), true),
    }
}

/// Record the page a session is on and return a snapshot of its state.
async fn touch_page(state: &AppState, id: Uuid, page: Page) -> Session {
    let mut sessions = state.sessions.write().await;
    let session = sessions.entry(id).or_default();
    session.current_page = page;
    session.clone()
}

/// Attach the session cookie to first-time responses.
fn with_session_cookie(mut response: Response, id: Uuid, fresh: bool) -> Response {
    if fresh {
        let cookie = format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE, id);
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

// === Page handlers ===

async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let (id, fresh) = resolve_session(&headers);
    let page = state
        .sessions
        .read()
        .await
        .get(&id)
        .map(|s| s.current_page)
        .unwrap_or_default();

    with_session_cookie(Redirect::to(page.path()).into_response(), id, fresh)
}

async fn encyclopedia(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let (id, fresh) = resolve_session(&headers);
    touch_page(&state, id, Page::Encyclopedia).await;

    let body = match state.orchestrator.content().history().await {
        Ok(bundle) => {
            let text: String = bundle
                .text
                .split('\n')
                .filter(|line| !line.trim().is_empty())
                .map(|line| format!("<p>{}</p>\n", escape(line)))
                .collect();

            let images: String = (0..bundle.images.len())
                .map(|i| {
                    let caption = escape(bundle.images[i].file_name());
                    format!(
                        "<figure><img src=\"/images/history/{}\" alt=\"{}\"><figcaption>{}</figcaption></figure>\n",
                        i, caption, caption
                    )
                })
                .collect();

            format!("{}\n<div class=\"gallery\">{}</div>", text, images)
        }
        Err(e) => {
            warn!("Encyclopedia content unavailable: {}", e);
            warning_banner(&format!("Could not load content: {}", e))
        }
    };

    with_session_cookie(shell(Page::Encyclopedia, &body).into_response(), id, fresh)
}

#[derive(Deserialize)]
struct BotForm {
    question: String,
}

async fn bot_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let (id, fresh) = resolve_session(&headers);
    let session = touch_page(&state, id, Page::Bot).await;

    let exchange = if session.last_query.is_empty() {
        String::new()
    } else {
        format!(
            "<div class=\"exchange\"><p class=\"question\"><strong>You:</strong> {}</p><p class=\"answer\"><strong>Paddock:</strong> {}</p></div>",
            escape(&session.last_query),
            escape(&session.last_answer)
        )
    };

    let body = format!(
        r#"<p>Ask about the sporting, technical, and financial regulations.</p>
<form method="post" action="/bot">
  <input type="text" name="question" placeholder="What are the minimum weight regulations?" required>
  <button type="submit">Ask</button>
</form>
{}"#,
        exchange
    );

    with_session_cookie(shell(Page::Bot, &body).into_response(), id, fresh)
}

async fn bot_submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<BotForm>,
) -> Response {
    let (id, fresh) = resolve_session(&headers);

    let answer = match state.orchestrator.ask(&form.question).await {
        Ok(outcome) => outcome.answer,
        Err(e) => {
            warn!("Answer generation failed: {}", e);
            ANSWER_UNAVAILABLE.to_string()
        }
    };

    {
        let mut sessions = state.sessions.write().await;
        let session = sessions.entry(id).or_default();
        session.current_page = Page::Bot;
        session.last_query = form.question;
        session.last_answer = answer;
    }

    with_session_cookie(Redirect::to("/bot").into_response(), id, fresh)
}

async fn library_index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let (id, fresh) = resolve_session(&headers);
    touch_page(&state, id, Page::Library).await;

    let sections: String = state
        .orchestrator
        .settings()
        .content
        .sections
        .iter()
        .map(|s| format!("<li><a href=\"/library/{}\">{}</a></li>\n", s, escape(s)))
        .collect();

    let body = format!("<p>Browse the profiles.</p>\n<ul>{}</ul>", sections);
    with_session_cookie(shell(Page::Library, &body).into_response(), id, fresh)
}

async fn library_section(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(section): Path<String>,
) -> Response {
    let (id, fresh) = resolve_session(&headers);
    touch_page(&state, id, Page::Library).await;

    if !known_section(&state, &section) {
        return with_session_cookie(
            shell(Page::Library, &warning_banner("Unknown section.")).into_response(),
            id,
            fresh,
        );
    }

    let body = match state.orchestrator.content().section(&section).await {
        Ok(items) => {
            let listing: String = items
                .iter()
                .map(|item| {
                    format!(
                        "<li><a href=\"/library/{}/{}\">{}</a></li>\n",
                        section,
                        item.name,
                        escape(&item.name.replace('_', " "))
                    )
                })
                .collect();
            format!("<h2>{}</h2>\n<ul>{}</ul>", escape(&section), listing)
        }
        Err(e) => {
            warn!("Section {} unavailable: {}", section, e);
            warning_banner(&format!("Could not load content: {}", e))
        }
    };

    with_session_cookie(shell(Page::Library, &body).into_response(), id, fresh)
}

async fn library_item(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((section, item)): Path<(String, String)>,
) -> Response {
    let (id, fresh) = resolve_session(&headers);
    touch_page(&state, id, Page::Library).await;

    if !known_section(&state, &section) {
        return with_session_cookie(
            shell(Page::Library, &warning_banner("Unknown section.")).into_response(),
            id,
            fresh,
        );
    }

    let body = match state.orchestrator.content().section(&section).await {
        Ok(items) => match items.iter().find(|i| i.name == item) {
            Some(entry) => {
                let image = if entry.image.is_some() {
                    format!(
                        "<img class=\"profile\" src=\"/images/{}/{}\" alt=\"{}\">\n",
                        section,
                        entry.name,
                        escape(&entry.name)
                    )
                } else {
                    String::new()
                };
                let content = entry.content.as_deref().unwrap_or("No content available.");
                format!(
                    "<h2>{}</h2>\n{}<p>{}</p>",
                    escape(&entry.name.replace('_', " ")),
                    image,
                    escape(content)
                )
            }
            None => warning_banner("No such entry."),
        },
        Err(e) => {
            warn!("Section {} unavailable: {}", section, e);
            warning_banner(&format!("Could not load content: {}", e))
        }
    };

    with_session_cookie(shell(Page::Library, &body).into_response(), id, fresh)
}

// === Image handlers ===

async fn history_image(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Response {
    match state.orchestrator.content().history().await {
        Ok(bundle) => match bundle.images.get(index) {
            Some(image) => image_response(&image.key, image.bytes.clone()),
            None => StatusCode::NOT_FOUND.into_response(),
        },
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn section_image(
    State(state): State<Arc<AppState>>,
    Path((section, item)): Path<(String, String)>,
) -> Response {
    if !known_section(&state, &section) {
        return StatusCode::NOT_FOUND.into_response();
    }

    match state.orchestrator.content().section(&section).await {
        Ok(items) => match items.iter().find(|i| i.name == item).and_then(|i| i.image.clone()) {
            Some(bytes) => image_response("profile.jpg", bytes),
            None => StatusCode::NOT_FOUND.into_response(),
        },
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

fn image_response(key: &str, bytes: Vec<u8>) -> Response {
    let content_type = if key.to_lowercase().ends_with(".png") {
        "image/png"
    } else {
        "image/jpeg"
    };
    ([(header::CONTENT_TYPE, content_type)], bytes).into_response()
}

fn known_section(state: &AppState, section: &str) -> bool {
    state
        .orchestrator
        .settings()
        .content
        .sections
        .iter()
        .any(|s| s == section)
}

// === JSON API ===

#[derive(Deserialize)]
struct AskRequest {
    question: String,
    #[serde(default)]
    keywords: Vec<String>,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
    context: String,
    matches: Vec<Match>,
}

#[derive(Deserialize)]
struct SearchRequest {
    query: String,
    #[serde(default)]
    keywords: Vec<String>,
}

#[derive(Serialize)]
struct SearchResponse {
    matches: Vec<Match>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn api_ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> impl IntoResponse {
    let keywords = if req.keywords.is_empty() {
        state.orchestrator.settings().retrieval.keywords.clone()
    } else {
        req.keywords
    };

    match state
        .orchestrator
        .ask_with_keywords(&req.question, &keywords)
        .await
    {
        Ok(outcome) => Json(AskResponse {
            answer: outcome.answer,
            context: outcome.context,
            matches: outcome.matches,
        })
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

async fn api_search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> impl IntoResponse {
    let keywords = if req.keywords.is_empty() {
        state.orchestrator.settings().retrieval.keywords.clone()
    } else {
        req.keywords
    };

    let matches = state.orchestrator.search(&req.query, &keywords).await;
    Json(SearchResponse { matches })
}

async fn api_news(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.news {
        Some(client) => match client.fetch().await {
            Ok(articles) => Json(articles).into_response(),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response(),
        },
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "NEWSAPI_API_KEY is not set".to_string(),
            }),
        )
            .into_response(),
    }
}

// === HTML rendering ===

fn shell(active: Page, body: &str) -> Html<String> {
    let nav: String = [Page::Encyclopedia, Page::Bot, Page::Library]
        .iter()
        .map(|page| {
            let class = if *page == active { " class=\"active\"" } else { "" };
            format!(
                "<a href=\"{}\"{}>{}</a>\n",
                page.path(),
                class,
                page.title()
            )
        })
        .collect();

    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Paddock</title>
<style>
  body {{ font-family: sans-serif; margin: 0; display: flex; }}
  nav {{ width: 220px; min-height: 100vh; background: #15151e; padding: 1.5rem 1rem; }}
  nav h1 {{ color: #e10600; font-size: 1.3rem; }}
  nav a {{ display: block; color: #ddd; text-decoration: none; padding: 0.5rem 0; }}
  nav a.active {{ color: #fff; font-weight: bold; }}
  main {{ flex: 1; padding: 2rem; max-width: 56rem; }}
  .warning {{ background: #fff3cd; border: 1px solid #ffe69c; padding: 0.75rem; }}
  .gallery img, img.profile {{ max-width: 320px; display: block; margin: 0.5rem 0; }}
  .exchange {{ margin-top: 1.5rem; border-top: 1px solid #eee; padding-top: 1rem; }}
  form input[type="text"] {{ width: 70%; padding: 0.5rem; }}
  form button {{ padding: 0.5rem 1rem; }}
</style>
</head>
<body>
<nav>
<h1>Paddock</h1>
{nav}
</nav>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = active.title(),
        nav = nav,
        body = body,
    ))
}

fn warning_banner(message: &str) -> String {
    format!("<div class=\"warning\">{}</div>", escape(message))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentBundle, ContentStore, SectionItem};
    use crate::embedding::Embedder;
    use crate::index::MemoryIndexProvider;
    use async_trait::async_trait;

    struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, _text: &str) -> crate::error::Result<Vec<f32>> {
            Ok(vec![0.0; 3])
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    struct EmptyStore;

    #[async_trait]
    impl ContentStore for EmptyStore {
        async fn load_history(&self) -> crate::error::Result<ContentBundle> {
            Ok(ContentBundle::default())
        }

        async fn load_section(&self, _section: &str) -> crate::error::Result<Vec<SectionItem>> {
            Ok(Vec::new())
        }
    }

    fn state_with_stubs() -> AppState {
        let orchestrator = Orchestrator::with_components(
            Settings::default(),
            Arc::new(StubEmbedder),
            Arc::new(MemoryIndexProvider::new()),
            Arc::new(EmptyStore),
        );
        AppState {
            orchestrator,
            news: None,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    #[tokio::test]
    async fn test_touch_page_tracks_current_page() {
        let state = state_with_stubs();
        let id = Uuid::new_v4();

        let first = touch_page(&state, id, Page::Bot).await;
        assert_eq!(first.current_page, Page::Bot);

        let second = touch_page(&state, id, Page::Library).await;
        assert_eq!(second.current_page, Page::Library);

        // Same cookie, same session entry.
        assert_eq!(state.sessions.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let state = state_with_stubs();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        touch_page(&state, first, Page::Bot).await;
        touch_page(&state, second, Page::Encyclopedia).await;

        let sessions = state.sessions.read().await;
        assert_eq!(sessions.get(&first).unwrap().current_page, Page::Bot);
        assert_eq!(
            sessions.get(&second).unwrap().current_page,
            Page::Encyclopedia
        );
    }

    #[test]
    fn test_session_id_from_cookie_header() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; sid={}", id)).unwrap(),
        );
        assert_eq!(session_id_from_headers(&headers), Some(id));
    }

    #[test]
    fn test_missing_or_invalid_cookie_yields_none() {
        let headers = HeaderMap::new();
        assert_eq!(session_id_from_headers(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("sid=not-a-uuid"));
        assert_eq!(session_id_from_headers(&headers), None);
    }

    #[test]
    fn test_escape_neutralizes_markup() {
        assert_eq!(escape("<b>&\"hi\"</b>"), "&lt;b&gt;&amp;&quot;hi&quot;&lt;/b&gt;");
    }
}
