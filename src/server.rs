//! HTTP server, configuration and graceful shutdown.
//!
//! The server owns the transport concerns the router deliberately leaves out:
//! accepting sockets, header-size caps, read/write timeouts, and draining
//! in-flight connections on SIGTERM / Ctrl-C.
//!
//! When a shutdown signal arrives the server:
//! 1. stops calling `listener.accept()`,
//! 2. lets every in-flight connection task run to completion,
//! 3. returns from [`Server::serve`].

use std::time::Duration;

use http::StatusCode;
use hyper::service::{Service, service_fn};
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::error::Error;
use crate::response::Response;
use crate::router::Router;

/// hyper refuses read buffers smaller than this.
const MIN_HEADER_BUF: usize = 8192;

/// Transport settings for [`Server`].
///
/// The default is the preconfigured descriptor: all interfaces on port 9000,
/// 1 MiB of request head, 10 s to read the head, 10 s to produce a response.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    /// `host:port` to listen on.
    pub addr: String,
    /// Upper bound on the buffered request head (request line + headers).
    pub max_header_bytes: usize,
    /// How long a client may take to send the request head.
    pub read_timeout: Duration,
    /// How long the router may take to produce a response before the server
    /// answers `503 Service Unavailable` instead.
    ///
    /// The connection stays open and the late handler future is dropped.
    /// Servers that treat this as a socket write deadline (Go's
    /// `WriteTimeout`, for one) close the connection without any response.
    pub write_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:9000".to_owned(),
            max_header_bytes: 1 << 20,
            read_timeout: Duration::from_secs(10),
            write_timeout: Duration::from_secs(10),
        }
    }
}

/// The HTTP server.
#[derive(Clone, Debug, Default)]
pub struct Server {
    config: ServerConfig,
}

impl Server {
    /// A server with default settings listening on `addr`.
    ///
    /// ```rust
    /// use ghast::Server;
    /// let server = Server::bind("127.0.0.1:3000");
    /// assert_eq!(server.config().addr, "127.0.0.1:3000");
    /// ```
    pub fn bind(addr: impl Into<String>) -> Self {
        Self::with_config(ServerConfig { addr: addr.into(), ..ServerConfig::default() })
    }

    pub fn with_config(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn max_header_bytes(mut self, bytes: usize) -> Self {
        self.config.max_header_bytes = bytes;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.config.write_timeout = timeout;
        self
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Starts accepting connections and dispatching them through `router`.
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight requests completing).
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        let listener = TcpListener::bind(self.config.addr.as_str()).await?;
        let service = router.into_service();
        let write_timeout = self.config.write_timeout;

        let mut conn = ConnBuilder::new(TokioExecutor::new());
        conn.http1()
            .timer(TokioTimer::new())
            .header_read_timeout(self.config.read_timeout)
            .max_buf_size(self.config.max_header_bytes.max(MIN_HEADER_BUF));

        info!(addr = %self.config.addr, routes = service.router().bindings().len(), "ghast listening");

        let mut tasks = tokio::task::JoinSet::new();

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Check shutdown first so a SIGTERM stops accepting at once,
                // even with connections queued.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let service = service.clone();
                    let conn = conn.clone();
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        let svc = service_fn(move |req: hyper::Request<hyper::body::Incoming>| {
                            let service = service.clone();
                            async move {
                                match tokio::time::timeout(write_timeout, service.call(req)).await {
                                    Ok(response) => response,
                                    Err(_) => {
                                        warn!(peer = %remote_addr, "response not produced within write timeout");
                                        Ok(Response::status(StatusCode::SERVICE_UNAVAILABLE).into_inner())
                                    }
                                }
                            }
                        });

                        if let Err(e) = conn.serve_connection(io, svc).await {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connection tasks so the JoinSet does not grow
                // without bound on long-running servers.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("ghast stopped");
        Ok(())
    }
}

impl Router {
    /// Serve this router with [`ServerConfig::default`].
    pub async fn serve_default(self) -> Result<(), Error> {
        Server::default().serve(self).await
    }
}

/// Resolves on the first shutdown signal the process receives: SIGTERM or
/// SIGINT on Unix, Ctrl-C elsewhere. A signal that cannot be installed is
/// logged and then never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
