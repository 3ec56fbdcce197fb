//! Static file serving module
//!
//! Maps request paths onto files under a root directory and builds the
//! responses: file contents, index files, directory listings, redirects and 404s.

use super::listing;
use super::Handler;
use crate::config::{Config, RoutesConfig};
use crate::http::{self, cache, mime, Body};
use hyper::body::Bytes;
use hyper::header::{HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH};
use hyper::{Method, Request, Response};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Base handler serving files below `root`
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    index_files: Vec<String>,
    directory_listing: bool,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>, routes: &RoutesConfig) -> Self {
        Self {
            root: root.into(),
            index_files: routes.index_files.clone(),
            directory_listing: routes.directory_listing,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.root_dir(), &config.routes)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn serve(&self, req: &Request<()>) -> Response<Body> {
        let path = req.uri().path();
        let target = self.root.join(translate_path(path));

        let Ok(metadata) = fs::metadata(&target).await else {
            // File not found is common (404), no need to log at warning level
            return http::build_404_response();
        };
        if !self.contains(&target).await {
            log::warn!(
                "Path escapes root directory: {path} -> {}",
                target.display()
            );
            return http::build_404_response();
        }

        if metadata.is_dir() {
            if !path.ends_with('/') {
                let location = match req.uri().query() {
                    Some(query) => format!("{path}/?{query}"),
                    None => format!("{path}/"),
                };
                return http::build_redirect_response(&location);
            }
            return self.serve_directory(req, &target).await;
        }

        if path.ends_with('/') {
            return http::build_404_response();
        }
        serve_file(req, &target, &metadata).await
    }

    /// Serve the first index file present, else a listing
    async fn serve_directory(&self, req: &Request<()>, dir: &Path) -> Response<Body> {
        for index_file in &self.index_files {
            let index_path = dir.join(index_file);
            if let Ok(metadata) = fs::metadata(&index_path).await {
                if metadata.is_file() && self.contains(&index_path).await {
                    return serve_file(req, &index_path, &metadata).await;
                }
            }
        }

        if !self.directory_listing {
            return http::build_404_response();
        }

        match listing::read_entries(dir).await {
            Ok(entries) => {
                let display_path = decode_path(req.uri().path());
                http::build_html_response(
                    listing::render(&display_path, &entries),
                    req.method() == Method::HEAD,
                )
            }
            Err(e) => {
                log::warn!("Failed to list directory '{}': {e}", dir.display());
                http::build_404_response()
            }
        }
    }

    /// Security: ensure `target` resolves to a location within the root, symlinks included
    async fn contains(&self, target: &Path) -> bool {
        let root = match fs::canonicalize(&self.root).await {
            Ok(p) => p,
            Err(e) => {
                log::warn!(
                    "Root directory not found or inaccessible '{}': {e}",
                    self.root.display()
                );
                return false;
            }
        };
        fs::canonicalize(target)
            .await
            .is_ok_and(|resolved| resolved.starts_with(&root))
    }
}

impl Handler for StaticFiles {
    async fn handle(&self, req: Request<()>) -> Response<Body> {
        match *req.method() {
            Method::GET | Method::HEAD => self.serve(&req).await,
            ref method => {
                log::debug!("Method not supported by file server: {method}");
                http::build_501_response(method)
            }
        }
    }
}

/// Send a regular file, honouring `If-Modified-Since`
async fn serve_file(req: &Request<()>, path: &Path, metadata: &Metadata) -> Response<Body> {
    let modified = metadata.modified().ok();
    let last_modified = modified.map(cache::format_http_date);

    if let (Some(modified), Some(last_modified)) = (modified, &last_modified) {
        let header = |name: HeaderName| req.headers().get(name).and_then(|v| v.to_str().ok());
        if cache::check_not_modified(header(IF_MODIFIED_SINCE), header(IF_NONE_MATCH), modified) {
            return http::build_304_response(last_modified);
        }
    }

    let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));

    if req.method() == Method::HEAD {
        return http::build_file_response(
            Bytes::new(),
            content_type,
            metadata.len(),
            last_modified.as_deref(),
        );
    }

    let content = match fs::read(path).await {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to read file '{}': {e}", path.display());
            return http::build_404_response();
        }
    };

    let content_length = content.len() as u64;
    http::build_file_response(
        Bytes::from(content),
        content_type,
        content_length,
        last_modified.as_deref(),
    )
}

fn decode_path(path: &str) -> String {
    urlencoding::decode(path).map_or_else(|_| path.to_string(), std::borrow::Cow::into_owned)
}

/// Translate a URL path into a path relative to the root.
///
/// Empty, `.` and `..` segments are dropped, so the result never climbs above the root.
fn translate_path(path: &str) -> PathBuf {
    decode_path(path)
        .split('/')
        .filter(|segment| !matches!(*segment, "" | "." | ".."))
        .collect()
}
