// Transparent pass-through for everything under /api that is not served
// locally. Bodies stream both directions; nothing is buffered here.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::warn;

use super::AppState;

/// Forwards the request to the backend with method, path, query, headers and
/// body intact. Any upstream failure maps to 502.
pub(super) async fn proxy_handler(State(state): State<AppState>, req: Request) -> Response {
    match forward(&state, req).await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "backend proxy request failed");
            (StatusCode::BAD_GATEWAY, "Bad gateway").into_response()
        }
    }
}

async fn forward(state: &AppState, req: Request) -> anyhow::Result<Response> {
    let (parts, body) = req.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = format!("{}{}", state.backend_url, path_and_query);

    let mut upstream = state
        .proxy_client
        .request(parts.method, &url)
        .body(reqwest::Body::wrap_stream(body.into_data_stream()));
    for (name, value) in &parts.headers {
        if should_proxy_header(name) {
            upstream = upstream.header(name, value);
        }
    }

    let response = upstream.send().await?;

    let mut builder = Response::builder().status(response.status());
    for (name, value) in response.headers() {
        if should_proxy_header(name) {
            builder = builder.header(name, value);
        }
    }
    Ok(builder.body(Body::from_stream(response.bytes_stream()))?)
}

/// Hop-by-hop headers belong to one connection and never cross the proxy.
/// Host is dropped so the client derives the backend's own; content-length is
/// dropped because both legs re-frame their streamed bodies.
fn should_proxy_header(name: &HeaderName) -> bool {
    !matches!(
        name.as_str(),
        "host"
            | "connection"
            | "proxy-connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
            | "content-length"
    )
}
