use crate::html;
use crate::http::{RequestLine, Response, Target};
use search_core::tokenizer::query_terms;
use search_core::SharedIndex;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Everything a worker needs to answer requests. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub index: SharedIndex,
    pub root: PathBuf,
}

impl AppState {
    pub fn new(index: SharedIndex, root: impl Into<PathBuf>) -> Self {
        Self { index, root: root.into() }
    }
}

/// Answer one framed request header.
///
/// Every failure (bad request line, missing `terms`, absent file) becomes a
/// 404 so the connection can keep serving.
pub fn handle_request(header: &[u8], state: &AppState) -> Response {
    let Some(line) = RequestLine::parse(header) else {
        tracing::debug!("malformed request line");
        return Response::not_found();
    };
    let target = Target::parse(&line.target);
    tracing::debug!(method = %line.method, path = %target.path, "request");

    match target.path.as_str() {
        "" | "/" => Response::html(html::search_page()),
        "/query" => match target.param("terms") {
            Some(query) => search(query, state),
            None => Response::not_found(),
        },
        path => match path.strip_prefix("/static/") {
            Some(relative) => serve_static(relative, state),
            None => Response::not_found(),
        },
    }
}

fn search(query: &str, state: &AppState) -> Response {
    let terms = query_terms(query);
    let results = match terms.as_slice() {
        [] => Vec::new(),
        [term] => state.index.lookup_word(term),
        terms => state.index.lookup_query(terms),
    };
    let shown = query.to_lowercase();
    Response::html(html::results_page(&shown, &results, &state.root))
}

fn serve_static(relative: &str, state: &AppState) -> Response {
    let Some(path) = resolve_static(&state.root, relative) else {
        return Response::not_found();
    };
    match fs::read(&path) {
        Ok(bytes) => Response::plain(bytes),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "static read failed");
            Response::not_found()
        }
    }
}

/// Map a `/static/` suffix to a file under `root`.
///
/// Only plain path segments are accepted; the canonical result must still lie
/// inside the canonical root, so symlinks cannot lead outside it either.
pub fn resolve_static(root: &Path, relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative);
    let mut joined = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => joined.push(segment),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    let canonical_root = root.canonicalize().ok()?;
    let canonical = joined.canonicalize().ok()?;
    if canonical.starts_with(&canonical_root) && canonical.is_file() {
        Some(canonical)
    } else {
        None
    }
}
