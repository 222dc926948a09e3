use std::path::Path;

use axum::extract::Request;
use axum::http::uri::{PathAndQuery, Uri};
use tower::ServiceBuilder;
use tower::util::MapRequest;
use tower_http::services::ServeDir;
use tracing::trace;

/// Serve `dir`, appending `.{default_extension}` to extensionless paths so
/// module imports like `/aff/index` resolve to `/aff/index.js`.
pub fn static_files(
    dir: &Path,
    default_extension: &str,
) -> MapRequest<ServeDir, impl FnMut(Request) -> Request + Clone + use<>> {
    let extension = default_extension.trim_start_matches('.').to_string();
    ServiceBuilder::new()
        .map_request(move |req: Request| apply_default_extension(req, &extension))
        .service(ServeDir::new(dir))
}

/// Path with the default extension appended, or `None` when it already has
/// one. `/` and directory paths are left alone.
pub fn with_default_extension(path: &str, extension: &str) -> Option<String> {
    if path.ends_with('/') {
        return None;
    }
    let last = path.rsplit('/').next().unwrap_or(path);
    if last.contains('.') {
        return None;
    }
    Some(format!("{path}.{extension}"))
}

fn apply_default_extension(mut req: Request, extension: &str) -> Request {
    let Some(new_path) = with_default_extension(req.uri().path(), extension) else {
        return req;
    };

    let path_and_query = match req.uri().query() {
        Some(query) => format!("{new_path}?{query}"),
        None => new_path,
    };

    let mut parts = req.uri().clone().into_parts();
    match path_and_query.parse::<PathAndQuery>() {
        Ok(pq) => {
            parts.path_and_query = Some(pq);
            if let Ok(uri) = Uri::from_parts(parts) {
                trace!(%uri, "default extension applied");
                *req.uri_mut() = uri;
            }
        }
        Err(err) => trace!(error = %err, "leaving request path untouched"),
    }
    req
}
