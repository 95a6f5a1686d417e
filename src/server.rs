//! HTTP server for the library directory.
//!
//! Serves the library root as static files and rebuilds the index page
//! whenever it is requested, so a book dropped into a category folder shows
//! up on the next reload of `/`.
//!
//! ## Request Handling
//!
//! | Request | Behavior |
//! |---------|----------|
//! | `GET`/`HEAD /` | Scan, rewrite the index and `sw.js`, serve the index |
//! | `GET`/`HEAD /<index file>` | Same |
//! | `GET /sw.js` | The service worker written by the last rebuild |
//! | anything else | Plain static file from the root, 404 if missing |
//!
//! Static serving is `tower_http::services::ServeDir`, which handles MIME
//! types, percent-decoding and rejects paths escaping the root. A failed
//! rebuild is logged and the index already on disk, if any, is served.
//!
//! The rebuild runs inline in the request on a current-thread runtime, so
//! rebuilds never overlap. Files are replaced by rename, so a response that is
//! still streaming the previous index is unaffected.

use crate::config::LibraryConfig;
use crate::generate;
use crate::output;
use axum::Router;
use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::{self, Next};
use axum::response::Response;
use std::future::Future;
use std::io;
use std::net::UdpSocket;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Port {port} is already in use")]
    AddrInUse { port: u16 },
    #[error("Cannot listen on {host}:{port}: {source}")]
    Bind {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },
    #[error("Server error: {0}")]
    Io(#[from] io::Error),
}

/// A library root and the config it is served with.
#[derive(Debug, Clone)]
pub struct Site {
    pub root: PathBuf,
    pub config: LibraryConfig,
}

impl Site {
    pub fn new(root: impl Into<PathBuf>, config: LibraryConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(&self.config.index.file_name)
    }

    /// Whether a request should rebuild the index before being served.
    pub fn is_index_request(&self, method: &Method, path: &str) -> bool {
        if *method != Method::GET && *method != Method::HEAD {
            return false;
        }
        path == "/"
            || path
                .strip_prefix('/')
                .is_some_and(|p| p == self.config.index.file_name)
    }
}

/// Build the router: the index at `/`, everything else from the root.
pub fn router(site: Site) -> Router {
    let index = ServeFile::new(site.index_path());
    let files = ServeDir::new(&site.root);
    Router::new()
        .route_service("/", index)
        .fallback_service(files)
        .layer(middleware::from_fn_with_state(Arc::new(site), refresh_index))
}

async fn refresh_index(State(site): State<Arc<Site>>, request: Request, next: Next) -> Response {
    if site.is_index_request(request.method(), request.uri().path()) {
        tracing::debug!(path = %request.uri().path(), "rebuilding index");
        match generate::update_index(&site.root, &site.config) {
            Ok(update) => output::print_update_output(&update),
            Err(e) => tracing::error!(error = %e, "index rebuild failed, serving previous page"),
        }
    }
    next.run(request).await
}

/// Bind the listener, reporting a busy port separately.
pub async fn bind(host: &str, port: u16) -> Result<TcpListener, ServeError> {
    TcpListener::bind((host, port))
        .await
        .map_err(|source| match source.kind() {
            io::ErrorKind::AddrInUse => ServeError::AddrInUse { port },
            _ => ServeError::Bind {
                host: host.to_string(),
                port,
                source,
            },
        })
}

/// Serve `site` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, site: Site, shutdown: F) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(site))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot listen for SIGTERM");
                ctrl_c.await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await;
    }

    tracing::info!("shutting down");
}

/// The address other devices on the network can reach us at.
///
/// Connecting a UDP socket sends nothing; it only makes the OS pick the
/// outbound interface. Falls back to `localhost` when offline.
pub fn local_ip() -> String {
    UdpSocket::bind("0.0.0.0:0")
        .and_then(|socket| {
            socket.connect("8.8.8.8:80")?;
            socket.local_addr()
        })
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|_| "localhost".to_string())
}
