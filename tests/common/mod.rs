//! Shared utilities for integration testing.
#![allow(dead_code)]

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::services::ServeDir;
use uuid::Uuid;

use spyglass::http::{Delegate, HttpServer};
use spyglass::observer::{self, Palette, Renderer, RequestRecord};
use spyglass::upload::UploadSink;

/// A fresh scratch directory under the system temp dir.
pub fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("spyglass-it-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Start a server on an ephemeral port with the given delegate.
///
/// The renderer drains the observer queue into a discarding writer so the
/// serving path behaves exactly as in production, without polluting test
/// output.
pub async fn start_server(delegate: Delegate) -> SocketAddr {
    let (observer, records) = observer::channel();
    tokio::spawn(Renderer::new(records, io::sink(), Palette::plain(), true).run());
    bind_and_spawn(observer, delegate).await
}

/// Start a logging-only server and keep the receiving half of the queue.
///
/// No renderer runs; the caller decides when (and whether) records are
/// drained, which is what backpressure tests need.
pub async fn start_observer_only() -> (SocketAddr, mpsc::Receiver<RequestRecord>) {
    let (observer, records) = observer::channel();
    let addr = bind_and_spawn(observer, Delegate::None).await;
    (addr, records)
}

/// An upload-enabled delegate over `dir`, as `--enable-upload` builds it.
pub fn upload_delegate(dir: &std::path::Path) -> Delegate {
    Delegate::Uploads(UploadSink::new(dir), ServeDir::new(dir))
}

async fn bind_and_spawn(observer: observer::ObserverHandle, delegate: Delegate) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(observer, delegate);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    addr
}

/// A client that talks straight to the local server.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}
