//! HTTP listener serving the router on a background task

use std::{net::SocketAddr, sync::OnceLock};

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
    task::JoinHandle,
};

use crate::lifecycle::Component;

struct Running {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

/// Aborts the serve task when dropped, e.g. when a stop hook times out
struct AbortOnDrop(JoinHandle<std::io::Result<()>>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

pub struct HttpServer {
    addr: SocketAddr,
    router: Router,
    local_addr: OnceLock<SocketAddr>,
    running: Mutex<Option<Running>>,
}

impl HttpServer {
    pub fn new(addr: SocketAddr, router: Router) -> Self {
        Self {
            addr,
            router,
            local_addr: OnceLock::new(),
            running: Mutex::new(None),
        }
    }

    /// Address actually bound, once started
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr.get().copied()
    }
}

#[async_trait]
impl Component for HttpServer {
    fn name(&self) -> &'static str {
        "http server"
    }

    /// Bind the listener and return; serving continues in the background
    async fn start(&self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.addr))?;
        let addr = listener.local_addr()?;
        let _ = self.local_addr.set(addr);

        tracing::info!("Server listening on http://{}", addr);

        let (shutdown, signal) = oneshot::channel::<()>();
        let app = self.router.clone();
        let task = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = signal.await;
                })
                .await;
            if let Err(err) = &result {
                tracing::error!("HTTP server error: {}", err);
            }
            result
        });

        *self.running.lock().await = Some(Running { shutdown, task });
        Ok(())
    }

    /// Stop accepting, then wait for in-flight requests to finish.
    ///
    /// If this future is dropped before the drain completes, the serve task
    /// is aborted.
    async fn stop(&self) -> anyhow::Result<()> {
        let Some(Running { shutdown, task }) = self.running.lock().await.take() else {
            return Ok(());
        };

        let mut task = AbortOnDrop(task);
        let _ = shutdown.send(());
        (&mut task.0)
            .await
            .context("HTTP server task panicked")?
            .context("HTTP server failed")?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
