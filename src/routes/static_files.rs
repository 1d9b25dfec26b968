// Dashboard bundle serving: the exact file when it exists, index.html for
// client-routed paths, 403 for anything trying to climb out of the bundle

use std::path::{Component, Path, PathBuf};

use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};

use super::AppState;

/// Every non-/api path lands here.
pub(super) async fn spa_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let path = match resolve(&state.static_dir, uri.path()) {
        Ok(p) => p,
        Err(status) => return (status, "Forbidden").into_response(),
    };
    if let Some(response) = serve_file(&path).await {
        return response;
    }
    // Client-routed URLs all render the app shell.
    match serve_file(&state.static_dir.join("index.html")).await {
        Some(response) => response,
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// Maps a request path into the bundle directory by walking its components,
/// so the result can never leave `static_dir`. A `..` component is refused
/// outright rather than silently clamped.
fn resolve(static_dir: &Path, uri_path: &str) -> Result<PathBuf, StatusCode> {
    let rel = uri_path.trim_start_matches('/');
    let rel = if rel.is_empty() { "index.html" } else { rel };
    let mut full = static_dir.to_path_buf();
    for component in Path::new(rel).components() {
        match component {
            Component::Normal(part) => full.push(part),
            Component::ParentDir => return Err(StatusCode::FORBIDDEN),
            _ => {}
        }
    }
    Ok(full)
}

/// Reads and types one file; None when it is absent or not a regular file.
async fn serve_file(path: &Path) -> Option<Response> {
    let meta = tokio::fs::metadata(path).await.ok()?;
    if !meta.is_file() {
        return None;
    }
    let contents = tokio::fs::read(path).await.ok()?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Some(([(header::CONTENT_TYPE, mime.to_string())], contents).into_response())
}
