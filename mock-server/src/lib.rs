//! Minimal static HTTP server that answers the index client.
//!
//! Serves files from a document root (`/` maps to the base file), answers
//! `HEAD` and `OPTIONS`, rejects other methods with 501, and stamps every
//! response with a `Server` signature.

use std::{
    fmt,
    future::Future,
    io,
    path::{Path, PathBuf},
    sync::Arc,
    time::SystemTime,
};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use chrono::{DateTime, Utc};
use tokio::net::TcpListener;
use tracing::{debug, warn};

pub const DEFAULT_SIGNATURE: &str = "index-mock/0.1";
pub const DEFAULT_SERVER_ROOT: &str = "www";
pub const DEFAULT_BASE_FILE: &str = "index.html";

/// Methods this server implements, as sent in `Allow`.
pub const ALLOWED_METHODS: &str = "OPTIONS, GET, HEAD";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub signature: String,
    pub server_root: PathBuf,
    /// File served for `/`.
    pub base_file: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            signature: DEFAULT_SIGNATURE.to_string(),
            server_root: PathBuf::from(DEFAULT_SERVER_ROOT),
            base_file: DEFAULT_BASE_FILE.to_string(),
        }
    }
}

impl ServerConfig {
    /// Read `SERVER_SIGNATURE`, `SERVER_ROOT` and `BASE_FILE` from the process
    /// environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from `lookup`; unset keys keep their defaults. The
    /// resulting server root must be an existing directory.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(signature) = lookup("SERVER_SIGNATURE") {
            config.signature = signature;
        }
        if let Some(root) = lookup("SERVER_ROOT") {
            config.server_root = PathBuf::from(root);
        }
        if let Some(base_file) = lookup("BASE_FILE") {
            config.base_file = base_file;
        }

        let metadata = std::fs::metadata(&config.server_root).map_err(|source| {
            ConfigError::ServerRoot {
                path: config.server_root.clone(),
                source,
            }
        })?;
        if !metadata.is_dir() {
            return Err(ConfigError::NotADirectory(config.server_root));
        }
        Ok(config)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    /// The server root cannot be inspected.
    ServerRoot { path: PathBuf, source: io::Error },

    /// The server root exists but is not a directory.
    NotADirectory(PathBuf),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ServerRoot { path, source } => {
                write!(f, "cannot open server root {}: {source}", path.display())
            }
            ConfigError::NotADirectory(path) => {
                write!(f, "server root {} is not a directory", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ServerRoot { source, .. } => Some(source),
            ConfigError::NotADirectory(_) => None,
        }
    }
}

type Shared = Arc<ServerConfig>;

pub fn app(config: ServerConfig) -> Router {
    Router::new().fallback(dispatch).with_state(Arc::new(config))
}

pub async fn run(listener: TcpListener, config: ServerConfig) -> Result<(), io::Error> {
    axum::serve(listener, app(config)).await
}

/// Serve until `shutdown` resolves, then let in-flight requests finish.
pub async fn run_until<F>(listener: TcpListener, config: ServerConfig, shutdown: F) -> Result<(), io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(config))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn dispatch(State(config): State<Shared>, method: Method, uri: Uri) -> Response {
    debug!(%method, %uri, "request");
    match method {
        Method::GET => serve_file(&config, uri.path(), true).await,
        Method::HEAD => serve_file(&config, uri.path(), false).await,
        Method::OPTIONS => {
            let mut headers = base_headers(&config);
            headers.insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
            (StatusCode::NO_CONTENT, headers).into_response()
        }
        _ => {
            let mut headers = base_headers(&config);
            headers.insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
            (StatusCode::NOT_IMPLEMENTED, headers, "not implemented\n").into_response()
        }
    }
}

async fn serve_file(config: &ServerConfig, request_path: &str, with_body: bool) -> Response {
    let Some(path) = resolve(config, request_path) else {
        return not_found(config);
    };
    let metadata = match tokio::fs::metadata(&path).await {
        Ok(metadata) if metadata.is_file() => metadata,
        _ => return not_found(config),
    };

    let mut headers = base_headers(config);
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type(&path)));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(metadata.len()));
    let modified = metadata.modified().unwrap_or_else(|_| SystemTime::now());
    if let Ok(value) = HeaderValue::from_str(&http_date(modified)) {
        headers.insert(header::LAST_MODIFIED, value);
    }

    if !with_body {
        return (StatusCode::OK, headers, Body::empty()).into_response();
    }
    match tokio::fs::read(&path).await {
        Ok(contents) => (StatusCode::OK, headers, Body::from(contents)).into_response(),
        Err(err) => {
            warn!(path = %path.display(), %err, "failed to read file");
            (StatusCode::INTERNAL_SERVER_ERROR, base_headers(config)).into_response()
        }
    }
}

/// Map a request path onto the server root. `None` for paths that try to
/// climb out of it.
fn resolve(config: &ServerConfig, request_path: &str) -> Option<PathBuf> {
    let mut file = config.server_root.clone();
    let mut pushed = false;
    for segment in request_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            segment => {
                file.push(segment);
                pushed = true;
            }
        }
    }
    if !pushed {
        file.push(&config.base_file);
    }
    Some(file)
}

fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "gif" => "image/gif",
        "jpeg" | "jpg" => "image/jpeg",
        "ico" => "image/x-icon",
        "mpeg" | "mpg" => "video/mpeg",
        "docx" | "doc" => "application/msword",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

fn base_headers(config: &ServerConfig) -> HeaderMap {
    let mut headers = HeaderMap::new();
    match HeaderValue::from_str(&config.signature) {
        Ok(value) => {
            headers.insert(header::SERVER, value);
        }
        Err(_) => warn!(signature = %config.signature, "signature is not a valid header value"),
    }
    headers
}

fn not_found(config: &ServerConfig) -> Response {
    (StatusCode::NOT_FOUND, base_headers(config), "not found\n").into_response()
}
