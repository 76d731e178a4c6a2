use std::fs;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use funhttp::config::GithubBaseUrl;
use funhttp::github::GithubClient;
use funhttp::resources::ResourceProvider;
use funhttp::router::Router;
use funhttp::server;

const REPOS_JSON: &str = r#"[{"id": 7, "full_name": "octocat/Hello-World", "owner": {"login": "octocat"}}]"#;
const EVENTS_JSON: &str = r#"[{"type": "WatchEvent", "repo": {"name": "octocat/Spoon-Knife"}, "created_at": "2023-11-05T08:09:10Z"}]"#;

/// canned GitHub: counts hits and answers by path
async fn start_mock_github(hits: Arc<AtomicUsize>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let (mut socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => return,
            };
            let hits = Arc::clone(&hits);

            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut chunk).await.unwrap_or(0);
                    if n == 0 {
                        return;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }
                hits.fetch_add(1, Ordering::SeqCst);

                let request = String::from_utf8_lossy(&buf);
                let first_line = request.lines().next().unwrap_or("");
                let path = first_line.split_whitespace().nth(1).unwrap_or("/");

                let (status, body) = match path {
                    "/users/octocat/repos" => ("200 OK", REPOS_JSON),
                    "/users/octocat/events/public" => ("200 OK", EVENTS_JSON),
                    "/users/empty/repos" => ("200 OK", ""),
                    "/users/object/repos" => ("200 OK", r#"{"message": "hi"}"#),
                    "/bad" => ("400 Bad Request", r#"{"message": "bad"}"#),
                    "/broken" => ("502 Bad Gateway", ""),
                    _ => ("404 Not Found", r#"{"message": "Not Found"}"#),
                };

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
            });
        }
    });

    addr
}

struct TestServer {
    addr: SocketAddr,
    _dir: TempDir,
}

async fn start_server(github: SocketAddr) -> TestServer {
    let dir = TempDir::new().unwrap();
    let www = dir.path().join("www");
    let files = dir.path().join("files");
    fs::create_dir_all(&www).unwrap();
    fs::create_dir_all(&files).unwrap();
    fs::write(www.join("root.html"), "<html>${links}</html>").unwrap();
    fs::write(www.join("index.html"), "<html>random</html>").unwrap();
    fs::write(files.join("hello.txt"), "hello there").unwrap();

    let api = GithubBaseUrl::parse(&format!("http://{}", github)).unwrap();
    let remote = GithubClient::new(api.clone(), Duration::from_secs(5), None);
    let router = Router::new(ResourceProvider::new(www, files, true), Box::new(remote), api);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve(listener, Arc::new(router), Duration::from_secs(5)));

    TestServer { addr, _dir: dir }
}

async fn send(addr: SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    stream.shutdown().await.unwrap();
    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

async fn get(addr: SocketAddr, target: &str) -> String {
    send(addr, &format!("GET /{} HTTP/1.1\r\nHost: localhost\r\n\r\n", target)).await
}

fn split(response: &str) -> (&str, &str) {
    response.split_once("\n\n").unwrap()
}

#[tokio::test]
async fn test_multiply_over_the_wire() {
    let hits = Arc::new(AtomicUsize::new(0));
    let server = start_server(start_mock_github(Arc::clone(&hits)).await).await;

    let response = get(server.addr, "multiply?num1=6&num2=7").await;
    assert_eq!(
        response,
        "HTTP/1.1 200 OK\nContent-Type: text/html; charset=utf-8\n\nResult is: 42"
    );

    let response = get(server.addr, "multiply?num1=6").await;
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\n"));
}

#[tokio::test]
async fn test_no_get_line_is_illegal() {
    let hits = Arc::new(AtomicUsize::new(0));
    let server = start_server(start_mock_github(Arc::clone(&hits)).await).await;

    let response = send(server.addr, "POST /multiply?num1=1&num2=2 HTTP/1.1\r\n\r\n").await;
    assert_eq!(response, "<html>Illegal request: no GET</html>");

    // client closes before sending anything
    let response = send(server.addr, "").await;
    assert_eq!(response, "<html>Illegal request: no GET</html>");
}

#[tokio::test]
async fn test_pages_and_files() {
    let hits = Arc::new(AtomicUsize::new(0));
    let server = start_server(start_mock_github(Arc::clone(&hits)).await).await;

    let response = get(server.addr, "").await;
    let (head, body) = split(&response);
    assert!(head.starts_with("HTTP/1.1 200 OK"));
    assert_eq!(body, "<html><ul>\n<li>index.html</li><li>root.html</li></ul>\n</html>");

    let response = get(server.addr, "random").await;
    assert_eq!(split(&response).1, "<html>random</html>");

    let response = get(server.addr, "file/hello.txt").await;
    assert_eq!(split(&response).1, "hello there");

    let response = get(server.addr, "file/missing.txt").await;
    assert!(response.starts_with("HTTP/1.1 404 Not Found\n"));
    assert!(response.ends_with("File not found: missing.txt"));

    let response = get(server.addr, "file/../www/root.html").await;
    assert!(response.starts_with("HTTP/1.1 404 Not Found\n"));
}

#[tokio::test]
async fn test_json_image() {
    let hits = Arc::new(AtomicUsize::new(0));
    let server = start_server(start_mock_github(Arc::clone(&hits)).await).await;

    let response = get(server.addr, "json").await;
    let (head, body) = split(&response);
    assert!(head.contains("Content-Type: application/json; charset=utf-8"));
    let value: serde_json::Value = serde_json::from_str(body).unwrap();
    assert!(value["header"] == "streets" || value["header"] == "bread");
    assert!(value["image"].as_str().unwrap().starts_with("https://iili.io/"));
}

#[tokio::test]
async fn test_password_over_the_wire() {
    let hits = Arc::new(AtomicUsize::new(0));
    let server = start_server(start_mock_github(Arc::clone(&hits)).await).await;

    let response = get(server.addr, "pass?l=10&OPT=23").await;
    let (head, body) = split(&response);
    assert!(head.contains("Content-Type: text/plain; charset=utf-8"));
    assert_eq!(body.chars().count(), 10);
    assert!(body.chars().all(|c| c.is_ascii_alphabetic()));

    let response = get(server.addr, "pass?l=99").await;
    let body = split(&response).1;
    let (password, warning) = body.split_once('\n').unwrap();
    assert_eq!(password.chars().count(), 6);
    assert!(warning.starts_with("WARNING: Invalid length parameter."));
}

#[tokio::test]
async fn test_github_repositories_proxy() {
    let hits = Arc::new(AtomicUsize::new(0));
    let server = start_server(start_mock_github(Arc::clone(&hits)).await).await;

    let response = get(server.addr, "github?query=users/octocat/repos").await;
    assert_eq!(
        split(&response).1,
        "Full Name: octocat/Hello-World<br>ID: 7<br>Owner Login: octocat<br><hr>"
    );
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let response = get(server.addr, "github?query=users/nobody/repos").await;
    assert!(response.starts_with("HTTP/1.1 404 Not Found\n"));
    assert!(response.contains("The requested user does not exist on GitHub."));

    let response = get(server.addr, "github?query=bad").await;
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\n"));

    let response = get(server.addr, "github?query=broken").await;
    assert!(response.starts_with("HTTP/1.1 503 Service Unavailable\n"));
    assert!(response.contains("Received HTTP error: 502"));

    let response = get(server.addr, "github?query=users/empty/repos").await;
    assert!(response.starts_with("HTTP/1.1 503 Service Unavailable\n"));

    let response = get(server.addr, "github?query=users/object/repos").await;
    assert!(response.starts_with("HTTP/1.1 500 Internal Server Error\n"));

    // blank query never reaches the remote
    let before = hits.load(Ordering::SeqCst);
    let response = get(server.addr, "github?query=").await;
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\n"));
    assert_eq!(hits.load(Ordering::SeqCst), before);
}

#[tokio::test]
async fn test_github_activity_proxy() {
    let hits = Arc::new(AtomicUsize::new(0));
    let server = start_server(start_mock_github(Arc::clone(&hits)).await).await;

    let response = get(server.addr, "githubActivity?user=octocat").await;
    assert_eq!(
        split(&response).1,
        "Type: WatchEvent<br>Repo: octocat/Spoon-Knife<br>Date: 05/11/2023 08:09:10<br><hr>"
    );

    let response = get(server.addr, "githubActivity?user=ghost").await;
    assert!(response.starts_with("HTTP/1.1 404 Not Found\n"));
}

#[tokio::test]
async fn test_connections_are_independent() {
    let hits = Arc::new(AtomicUsize::new(0));
    let server = start_server(start_mock_github(Arc::clone(&hits)).await).await;

    // a silent client must not hold up others
    let _idle = TcpStream::connect(server.addr).await.unwrap();

    let mut tasks = Vec::new();
    for n in 1..=5i64 {
        let addr = server.addr;
        tasks.push(tokio::spawn(async move {
            let response = get(addr, &format!("multiply?num1={}&num2=3", n)).await;
            assert!(response.ends_with(&format!("Result is: {}", n * 3)));
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }
}
