//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use token_gateway::config::GatewayConfig;
use token_gateway::{Gateway, HttpServer, Shutdown};

/// Bodies of the requests a mock backend received.
pub type Captured = Arc<Mutex<Vec<String>>>;

/// Start a mock backend answering every request with `status` and `body`,
/// optionally flagging a function error. Returns the captured request bodies.
pub async fn start_mock_backend(
    addr: SocketAddr,
    status: u16,
    body: &'static str,
    function_error: bool,
) -> Captured {
    let listener = TcpListener::bind(addr).await.unwrap();
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let sink = captured.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let sink = sink.clone();
                    tokio::spawn(async move {
                        let (read_half, mut write_half) = socket.into_split();
                        let mut reader = BufReader::new(read_half);

                        let mut content_length = 0usize;
                        loop {
                            let mut line = String::new();
                            if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                                break;
                            }
                            let line = line.trim_end();
                            if line.is_empty() {
                                break;
                            }
                            if let Some((name, value)) = line.split_once(':') {
                                if name.eq_ignore_ascii_case("content-length") {
                                    content_length = value.trim().parse().unwrap_or(0);
                                }
                            }
                        }

                        let mut request_body = vec![0u8; content_length];
                        let _ = reader.read_exact(&mut request_body).await;
                        sink.lock()
                            .unwrap()
                            .push(String::from_utf8_lossy(&request_body).into_owned());

                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let extra = if function_error {
                            "X-Function-Error: Unhandled\r\n"
                        } else {
                            ""
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            extra,
                            body.len(),
                            body
                        );
                        let _ = write_half.write_all(response.as_bytes()).await;
                        let _ = write_half.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    captured
}

/// Start a backend that accepts connections but never answers.
#[allow(dead_code)]
pub async fn start_silent_backend(addr: SocketAddr) {
    let listener = TcpListener::bind(addr).await.unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
}

/// Run a gateway server on `addr` until the returned coordinator fires.
pub async fn start_gateway(addr: SocketAddr, config: GatewayConfig) -> Shutdown {
    let server = HttpServer::new(config).unwrap();
    serve(addr, server).await
}

/// Same as [`start_gateway`] with a prebuilt gateway.
pub async fn start_gateway_with(addr: SocketAddr, config: GatewayConfig, gateway: Gateway) -> Shutdown {
    serve(addr, HttpServer::with_gateway(config, gateway)).await
}

async fn serve(addr: SocketAddr, server: HttpServer) -> Shutdown {
    let shutdown = Shutdown::new();
    let (_, config_updates) = mpsc::unbounded_channel();
    let listener = TcpListener::bind(addr).await.unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown
}
