//! HTTP server rendering pages at request time
//!
//! Every request reads the content directory again, so edits show up on the
//! next reload without regenerating. Loading and rendering are synchronous,
//! so handlers run them on the blocking pool.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::pages::Pages;
use crate::Folio;

/// Server state
struct ServerState {
    pages: Pages,
    content_dir: PathBuf,
}

type SharedState = Arc<ServerState>;

#[derive(Debug, Deserialize)]
struct PostsQuery {
    category: Option<String>,
}

/// Build the router serving `folio`'s content
pub fn router(folio: &Folio) -> Result<Router> {
    let state = Arc::new(ServerState {
        pages: Pages::new(folio)?,
        content_dir: folio.content_dir.clone(),
    });

    Ok(Router::new()
        .route("/", get(home_handler))
        .route("/posts", get(posts_handler))
        .route("/posts/", get(posts_handler))
        .route("/posts/:category", get(category_handler))
        .route("/posts/:category/", get(category_handler))
        .route("/posts/:category/:slug", get(post_handler))
        .route("/posts/:category/:slug/", get(post_handler))
        .route("/posts/:category/:slug/assets/*file", get(asset_handler))
        .route("/projects", get(projects_handler))
        .route("/projects/", get(projects_handler))
        .route("/projects/:slug", get(project_handler))
        .route("/projects/:slug/", get(project_handler))
        .route("/projects/:slug/assets/*file", get(asset_handler))
        .route("/api/posts", get(api_posts_handler))
        .route("/api/projects", get(api_projects_handler))
        .route("/api/categories", get(api_categories_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the server
pub async fn start(folio: &Folio, ip: &str, port: u16, open: bool) -> Result<()> {
    let app = router(folio)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn home_handler(State(state): State<SharedState>) -> Response {
    render_page(state, |pages| pages.home().map(Some)).await
}

async fn posts_handler(
    State(state): State<SharedState>,
    Query(query): Query<PostsQuery>,
) -> Response {
    render_page(state, move |pages| pages.posts(query.category.as_deref())).await
}

async fn category_handler(
    State(state): State<SharedState>,
    Path(category): Path<String>,
) -> Response {
    render_page(state, move |pages| pages.posts(Some(&category))).await
}

async fn post_handler(
    State(state): State<SharedState>,
    Path((category, slug)): Path<(String, String)>,
) -> Response {
    render_page(state, move |pages| pages.post(&category, &slug)).await
}

async fn projects_handler(State(state): State<SharedState>) -> Response {
    render_page(state, |pages| pages.projects().map(Some)).await
}

async fn project_handler(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Response {
    render_page(state, move |pages| pages.project(&slug)).await
}

async fn not_found_handler(State(state): State<SharedState>) -> Response {
    render_page(state, |_| Ok(None)).await
}

/// Serve a file from an item's `assets/` directory
///
/// Asset URLs mirror the content layout, so the request path resolves
/// directly under the content directory.
async fn asset_handler(State(state): State<SharedState>, request: Request<Body>) -> Response {
    let mut service = ServeDir::new(&state.content_dir);
    match service.try_call(request).await {
        Ok(response) if response.status() != StatusCode::NOT_FOUND => response.into_response(),
        Ok(_) => render_page(state, |_| Ok(None)).await,
        Err(e) => {
            tracing::error!("Failed to serve asset: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

async fn api_posts_handler(
    State(state): State<SharedState>,
    Query(query): Query<PostsQuery>,
) -> Response {
    render_json(state, move |pages| pages.post_list(query.category.as_deref())).await
}

async fn api_projects_handler(State(state): State<SharedState>) -> Response {
    render_json(state, |pages| pages.project_list()).await
}

async fn api_categories_handler(State(state): State<SharedState>) -> Response {
    render_json(state, |pages| pages.category_list()).await
}

/// Render a page on the blocking pool; `Ok(None)` becomes the 404 page
async fn render_page<F>(state: SharedState, render: F) -> Response
where
    F: FnOnce(&Pages) -> Result<Option<String>> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || -> Result<(StatusCode, String)> {
        match render(&state.pages)? {
            Some(html) => Ok((StatusCode::OK, html)),
            None => Ok((StatusCode::NOT_FOUND, state.pages.not_found()?)),
        }
    })
    .await;

    match result {
        Ok(Ok((status, html))) => (status, Html(html)).into_response(),
        Ok(Err(e)) => {
            tracing::error!("Failed to render page: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
        Err(e) => {
            tracing::error!("Render task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

/// Build a JSON listing on the blocking pool
async fn render_json<F, T>(state: SharedState, build: F) -> Response
where
    F: FnOnce(&Pages) -> T + Send + 'static,
    T: Serialize + Send + 'static,
{
    match tokio::task::spawn_blocking(move || build(&state.pages)).await {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            tracing::error!("Listing task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn write(root: &std::path::Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Minimal HTTP/1.0 GET against a running server
    async fn get(addr: SocketAddr, path: &str) -> (u16, String) {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {} HTTP/1.0\r\nHost: localhost\r\n\r\n", path);
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        let status = response[9..12].parse().unwrap();
        let body = response
            .split_once("\r\n\r\n")
            .map(|(_, body)| body.to_string())
            .unwrap_or_default();
        (status, body)
    }

    async fn serve(dir: &TempDir) -> SocketAddr {
        let folio = Folio::new(dir.path()).unwrap();
        let app = router(&folio).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn test_routes() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "_content/posts/dev/my-post/index.md",
            "---\ntitle: My Post\ndate: \"2024-01-01\"\n---\n## Section\n",
        );
        write(dir.path(), "_content/posts/dev/my-post/assets/a.txt", "asset body");
        write(
            dir.path(),
            "_content/projects/folio/index.md",
            "---\ntitle: Folio\n---\n",
        );
        let addr = serve(&dir).await;

        let (status, body) = get(addr, "/").await;
        assert_eq!(status, 200);
        assert!(body.contains("My Post"));

        let (status, body) = get(addr, "/posts/dev/my-post/").await;
        assert_eq!(status, 200);
        assert!(body.contains(r#"<h2 id="section">Section</h2>"#));

        let (status, _) = get(addr, "/posts/dev").await;
        assert_eq!(status, 200);

        let (status, body) = get(addr, "/posts/dev/my-post/assets/a.txt").await;
        assert_eq!(status, 200);
        assert_eq!(body, "asset body");

        let (status, _) = get(addr, "/projects/folio").await;
        assert_eq!(status, 200);

        let (status, body) = get(addr, "/api/posts?category=dev").await;
        assert_eq!(status, 200);
        let posts: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(posts[0]["slug"], "my-post");
    }

    #[tokio::test]
    async fn test_not_found() {
        let dir = TempDir::new().unwrap();
        let addr = serve(&dir).await;

        for path in [
            "/posts/dev/missing/",
            "/posts/nope/",
            "/projects/missing",
            "/no/such/page",
            "/posts/dev/x/assets/none.png",
        ] {
            let (status, body) = get(addr, path).await;
            assert_eq!(status, 404, "{}", path);
            assert!(body.contains("404"));
        }

        let (status, body) = get(addr, "/api/categories").await;
        assert_eq!(status, 200);
        assert_eq!(body, "[]");
    }
}
