//! Runs the real server on a background thread for integration tests.

#![allow(dead_code)]

use bookshelf::config::LibraryConfig;
use bookshelf::server::{self, Site};
use std::fs;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use tokio::sync::oneshot;

pub struct TestServer {
    port: u16,
    stop: Option<oneshot::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl TestServer {
    /// Serve `root` on `127.0.0.1` with an OS-assigned port.
    pub fn start(root: &Path, config: LibraryConfig) -> Self {
        let site = Site::new(root, config);
        let (port_tx, port_rx) = mpsc::channel();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let handle = thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = server::bind("127.0.0.1", 0).await.unwrap();
                port_tx.send(listener.local_addr().unwrap().port()).unwrap();
                let shutdown = async {
                    let _ = stop_rx.await;
                };
                server::serve(listener, site, shutdown).await.unwrap();
            });
        });

        let port = port_rx.recv().expect("server thread died before binding");
        Self {
            port,
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Write a minimal book page to `root/<category>/<file>`.
pub fn write_book(root: &Path, category: &str, file: &str, title: &str) {
    let dir = root.join(category);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(file),
        format!(
            r#"<!DOCTYPE html>
<html><body>
<div class="book-icon">📘</div>
<h1>{title}</h1>
<p class="author">Test Author</p>
<section class="intro-section">
<p>A paragraph long enough to be picked up as the description of this book.</p>
</section>
</body></html>
"#
        ),
    )
    .unwrap();
}
