//! the accept loop
//!
//! one request per connection: read the header block, dispatch, write the
//! reply and close. a failing connection is logged and dropped, it never
//! stops the loop.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

use crate::request::read_request;
use crate::router::Router;

/// accept connections forever, each one handled on its own task
pub async fn serve(listener: TcpListener, router: Arc<Router>, client_timeout: Duration) {
    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                log::error!("failed to accept connection: {}", e);
                continue;
            }
        };

        log::debug!("connection from {}", addr);
        let router = Arc::clone(&router);

        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, &router, client_timeout).await {
                log::warn!("connection {} failed: {}", addr, e);
            }
        });
    }
}

/// run one request/response cycle on an accepted socket
pub async fn handle_connection(
    socket: TcpStream,
    router: &Router,
    client_timeout: Duration,
) -> Result<(), String> {
    let peer: Option<SocketAddr> = socket.peer_addr().ok();
    let (read_half, mut write_half) = socket.into_split();
    let mut reader = BufReader::new(read_half);

    let request = match timeout(client_timeout, read_request(&mut reader)).await {
        Ok(Ok(request)) => request,
        Ok(Err(e)) => return Err(format!("failed to read request: {}", e)),
        Err(_) => return Err("timed out waiting for request headers".to_string()),
    };

    log::debug!("finished parsing header from {:?}", peer);

    let response = router.respond(request.as_ref()).await;

    write_half
        .write_all(&response)
        .await
        .map_err(|e| format!("failed to send response: {}", e))?;
    write_half
        .flush()
        .await
        .map_err(|e| format!("failed to flush response: {}", e))?;
    write_half
        .shutdown()
        .await
        .map_err(|e| format!("failed to close connection: {}", e))?;

    Ok(())
}
