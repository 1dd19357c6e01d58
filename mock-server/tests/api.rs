use std::path::PathBuf;
use std::time::Duration;

use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, run_until, ServerConfig, ALLOWED_METHODS};
use tower::ServiceExt;

const INDEX_HTML: &str = include_str!("../www/index.html");
const NOTES_TXT: &str = include_str!("../www/notes.txt");

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    request("GET", uri)
}

fn config() -> ServerConfig {
    ServerConfig {
        signature: "test-signature".to_string(),
        server_root: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/www")),
        ..ServerConfig::default()
    }
}

// --- GET ---

#[tokio::test]
async fn index_html_is_served_from_root_dir() {
    let resp = app(config()).oneshot(get("/index.html")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/html");
    assert_eq!(resp.headers()[header::SERVER], "test-signature");
    assert_eq!(
        resp.headers()[header::CONTENT_LENGTH],
        INDEX_HTML.len().to_string().as_str()
    );
    let body = body_bytes(resp).await;
    assert_eq!(&body[..], INDEX_HTML.as_bytes());
}

#[tokio::test]
async fn slash_serves_base_file() {
    let resp = app(config()).oneshot(get("/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    assert_eq!(&body[..], INDEX_HTML.as_bytes());
}

#[tokio::test]
async fn custom_base_file_is_used_for_slash() {
    let config = ServerConfig {
        base_file: "notes.txt".to_string(),
        ..config()
    };
    let resp = app(config).oneshot(get("/")).await.unwrap();

    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/plain");
    let body = body_bytes(resp).await;
    assert_eq!(&body[..], NOTES_TXT.as_bytes());
}

#[tokio::test]
async fn content_type_comes_from_extension() {
    let resp = app(config()).oneshot(get("/notes.txt")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/plain");
}

#[tokio::test]
async fn query_string_is_ignored() {
    let resp = app(config()).oneshot(get("/notes.txt?a=1&b=2")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    assert_eq!(&body[..], NOTES_TXT.as_bytes());
}

#[tokio::test]
async fn last_modified_is_an_http_date() {
    let resp = app(config()).oneshot(get("/index.html")).await.unwrap();

    let value = resp.headers()[header::LAST_MODIFIED].to_str().unwrap();
    assert_eq!(value.len(), "Wed, 21 Oct 2015 07:28:00 GMT".len(), "{value}");
    assert!(value.ends_with(" GMT"), "{value}");
    assert_eq!(&value[3..5], ", ", "{value}");
}

// --- HEAD ---

#[tokio::test]
async fn head_sends_headers_without_body() {
    let resp = app(config()).oneshot(request("HEAD", "/index.html")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/html");
    assert_eq!(
        resp.headers()[header::CONTENT_LENGTH],
        INDEX_HTML.len().to_string().as_str()
    );
    assert!(resp.headers().contains_key(header::LAST_MODIFIED));
    let body = body_bytes(resp).await;
    assert!(body.is_empty());
}

#[tokio::test]
async fn head_of_missing_file_is_404() {
    let resp = app(config()).oneshot(request("HEAD", "/nope.html")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- OPTIONS and unsupported methods ---

#[tokio::test]
async fn options_lists_allowed_methods() {
    let resp = app(config()).oneshot(request("OPTIONS", "/index.html")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(resp.headers()[header::ALLOW], "OPTIONS, GET, HEAD");
    assert_eq!(resp.headers()[header::SERVER], "test-signature");
}

#[tokio::test]
async fn post_is_not_implemented() {
    let resp = app(config()).oneshot(request("POST", "/index.html")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
    assert_eq!(resp.headers()[header::ALLOW], ALLOWED_METHODS);
}

// --- not found ---

#[tokio::test]
async fn unknown_path_returns_404_with_signature() {
    let resp = app(config()).oneshot(get("/missing.html")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.headers()[header::SERVER], "test-signature");
    let body = body_bytes(resp).await;
    assert_eq!(&body[..], b"not found\n");
}

#[tokio::test]
async fn parent_directory_escape_is_404() {
    let resp = app(config()).oneshot(get("/../Cargo.toml")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn directory_is_not_served() {
    let config = ServerConfig {
        server_root: PathBuf::from(env!("CARGO_MANIFEST_DIR")),
        ..config()
    };
    let resp = app(config).oneshot(get("/www")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- live socket ---

#[tokio::test]
async fn shutdown_signal_stops_server() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(run_until(listener, config(), async {
        let _ = rx.await;
    }));
    tx.send(()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop");
    assert!(result.unwrap().is_ok());
}

#[test]
fn serves_over_real_socket() {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, config()).await
        })
        .unwrap();
    });

    let mut response = ureq::get(&format!("http://{addr}/index.html")).call().unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers().get("server").unwrap().to_str().unwrap(),
        "test-signature"
    );
    assert_eq!(response.body_mut().read_to_string().unwrap(), INDEX_HTML);
}
