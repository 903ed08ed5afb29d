//! HTTP server: on-demand sitemap and lazily loaded routes

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::routes::{live_routes, LiveRoutes};
use crate::sitemap::{robots::robots_txt, SitemapAssembler};
use crate::Site;

/// Short public lifetime, longer stale-while-revalidate window
const SITEMAP_CACHE_CONTROL: &str = "public, max-age=3600, stale-while-revalidate=86400";

/// Server state
struct ServerState {
    site: Site,
    routes: &'static LiveRoutes,
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let routes = live_routes(site)?;
    let app = router(site.clone(), routes);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(site: Site, routes: &'static LiveRoutes) -> Router {
    let state = Arc::new(ServerState { site, routes });

    Router::new()
        .route("/sitemap.xml", get(sitemap_handler))
        .route("/robots.txt", get(robots_handler))
        .fallback(page_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Recompute the sitemap for every request
async fn sitemap_handler(State(state): State<Arc<ServerState>>) -> Response {
    match SitemapAssembler::new(&state.site).assemble_configured().await {
        Ok(sitemap) => (
            [
                (header::CONTENT_TYPE, "application/xml; charset=utf-8"),
                (header::CACHE_CONTROL, SITEMAP_CACHE_CONTROL),
            ],
            sitemap.to_xml(),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Sitemap generation failed: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn robots_handler(State(state): State<Arc<ServerState>>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots_txt(&state.site.config),
    )
        .into_response()
}

/// Serve the page module behind a routed slug
async fn page_handler(State(state): State<Arc<ServerState>>, uri: Uri) -> Response {
    let Some(slug) = request_slug(uri.path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match state.routes.load(&slug).await {
        Ok(Some(module)) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            module.source.clone(),
        )
            .into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!("Failed to load {}: {:#}", slug, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Decoded request path as a slug: leading slash, no trailing slash
///
/// Returns `None` when the percent-decoded path is not valid UTF-8.
fn request_slug(path: &str) -> Option<String> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    let trimmed = decoded.trim_end_matches('/');
    let slug = if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    };
    Some(slug)
}
