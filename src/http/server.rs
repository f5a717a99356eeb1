//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Build the axum Router with the catch-all dispatch handler
//! - Snapshot and enqueue every request before the delegate sees it
//! - Forward requests to the configured delegate
//!
//! # Design Decisions
//! - Dispatch holds no mutable state: the observer handle and the delegate
//!   are fixed at startup inside `AppState`
//! - Enqueue happens before forwarding, so render order matches arrival
//!   order at the dispatcher even though responses complete out of order

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::observer::{ObserverHandle, RequestRecord};
use crate::upload::UploadSink;

/// What observed requests are forwarded to.
#[derive(Clone)]
pub enum Delegate {
    /// Serve files from a directory.
    Files(ServeDir),
    /// Accept uploads, fall back to serving files.
    Uploads(UploadSink, ServeDir),
    /// Logging only; every request gets an empty 200.
    None,
}

impl Delegate {
    /// Build the delegate described by `config`.
    pub fn from_config(config: &Config) -> Self {
        if config.no_serve {
            return Delegate::None;
        }
        let files = ServeDir::new(&config.directory);
        if config.enable_upload {
            Delegate::Uploads(UploadSink::new(&config.directory), files)
        } else {
            Delegate::Files(files)
        }
    }

    async fn forward(&self, request: Request<Body>) -> Response {
        match self {
            Delegate::Files(files) => serve_files(files.clone(), request).await,
            Delegate::Uploads(sink, files) => match sink.intercept(request).await {
                Ok(response) => response,
                Err(request) => serve_files(files.clone(), request).await,
            },
            Delegate::None => StatusCode::OK.into_response(),
        }
    }
}

async fn serve_files(files: ServeDir, request: Request<Body>) -> Response {
    match files.oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(infallible) => match infallible {},
    }
}

/// State shared by every dispatch invocation.
#[derive(Clone)]
struct AppState {
    observer: ObserverHandle,
    delegate: Delegate,
}

/// The observing file server.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Wire the dispatcher around an observer handle and a delegate.
    pub fn new(observer: ObserverHandle, delegate: Delegate) -> Self {
        let state = AppState { observer, delegate };
        let router = Router::new()
            .route("/", any(dispatch))
            .route("/{*path}", any(dispatch))
            .with_state(state)
            .layer(TraceLayer::new_for_http());
        Self { router }
    }

    /// Accept connections on `listener` until the process is told to stop.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

/// Catch-all handler: observe first, then forward.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    // A saturated observer queue slows the serving path here instead of
    // dropping log entries.
    state.observer.enqueue(RequestRecord::capture(&request)).await;
    state.delegate.forward(request).await
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to install Ctrl+C handler");
        return std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
