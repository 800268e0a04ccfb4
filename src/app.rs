//! Composition root
//!
//! Builds the singleton graph in dependency order:
//! database -> queries -> routes -> router -> http server.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;

use crate::{
    api,
    components::{Database, HttpServer},
    config::{AppConfig, ServerConfig},
    lifecycle::{Lifecycle, LifecycleState},
    repository::{PgQueries, Queries},
};

pub struct App {
    lifecycle: Lifecycle,
    server: Arc<HttpServer>,
}

impl App {
    /// Build the Postgres-backed application
    pub async fn build(config: &AppConfig) -> anyhow::Result<Self> {
        let mut lifecycle = Lifecycle::new(config.server.shutdown_timeout());

        let database = lifecycle
            .provide("database", Database::connect(&config.database))
            .await?;
        let queries = lifecycle
            .construct("queries", async {
                Ok(Arc::new(PgQueries::new(database.pool().clone())) as Arc<dyn Queries>)
            })
            .await?;

        Self::assemble(lifecycle, queries, &config.server).await
    }

    /// Finish the graph on top of already constructed queries.
    ///
    /// Whatever `lifecycle` already holds is started before the HTTP server
    /// and stopped after it.
    pub async fn assemble(
        mut lifecycle: Lifecycle,
        queries: Arc<dyn Queries>,
        config: &ServerConfig,
    ) -> anyhow::Result<Self> {
        let router = lifecycle
            .construct("router", async { Ok(api::build_router(api::routes(queries))) })
            .await?;
        let addr = lifecycle
            .construct("listen address", async {
                config.socket_addr().context("Invalid host address")
            })
            .await?;
        let server = lifecycle
            .provide("http server", async move { Ok(HttpServer::new(addr, router)) })
            .await?;

        Ok(Self { lifecycle, server })
    }

    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.lifecycle.start().await
    }

    pub async fn stop(&mut self) -> anyhow::Result<()> {
        self.lifecycle.stop().await
    }

    /// Start, serve until `signal` resolves, then shut down
    pub async fn run_until<S>(&mut self, signal: S) -> anyhow::Result<()>
    where
        S: std::future::Future<Output = ()>,
    {
        self.lifecycle.run_until(signal).await
    }

    /// Bound address of the HTTP server, once started
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.local_addr()
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }
}
