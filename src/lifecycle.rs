//! Startup and shutdown of the application's singletons
//!
//! The composition root builds each singleton through a [`Lifecycle`], in
//! dependency order. Singletons that own a resource implement [`Component`];
//! their hooks are registered once construction succeeds. Start hooks run in
//! registration order, stop hooks in reverse.

use std::{future::Future, sync::Arc, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use tokio::time::timeout;

/// A singleton with start and stop hooks
#[async_trait]
pub trait Component: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    /// Runs once the whole graph is built; dependencies are already started
    async fn start(&self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs on shutdown, also when startup was aborted
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Building,
    Started,
    Stopping,
    Stopped,
}

pub struct Lifecycle {
    state: LifecycleState,
    components: Vec<Arc<dyn Component>>,
    shutdown_timeout: Duration,
}

impl Lifecycle {
    /// `shutdown_timeout` bounds each stop hook
    pub fn new(shutdown_timeout: Duration) -> Self {
        Self {
            state: LifecycleState::Building,
            components: Vec::new(),
            shutdown_timeout,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Build a singleton without hooks.
    ///
    /// On failure every already registered component is stopped.
    pub async fn construct<T, F>(&mut self, name: &'static str, build: F) -> anyhow::Result<T>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        self.ensure_building()?;
        match build.await {
            Ok(value) => {
                tracing::debug!(component = name, "Constructed");
                Ok(value)
            }
            Err(err) => {
                tracing::error!(component = name, "Construction failed: {:#}", err);
                self.abort().await;
                Err(err.context(format!("failed to construct {}", name)))
            }
        }
    }

    /// Build a component and register its hooks.
    ///
    /// On failure nothing is registered and every already registered
    /// component is stopped.
    pub async fn provide<T, F>(&mut self, name: &'static str, build: F) -> anyhow::Result<Arc<T>>
    where
        T: Component,
        F: Future<Output = anyhow::Result<T>>,
    {
        let component = Arc::new(self.construct(name, build).await?);
        self.components.push(component.clone());
        Ok(component)
    }

    /// Run start hooks in registration order.
    ///
    /// On failure every registered component is stopped and the error is
    /// returned.
    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.ensure_building()?;
        let components = self.components.clone();
        for component in &components {
            if let Err(err) = component.start().await {
                let name = component.name();
                tracing::error!(component = name, "Start failed: {:#}", err);
                self.abort().await;
                return Err(err.context(format!("failed to start {}", name)));
            }
            tracing::info!(component = component.name(), "Started");
        }
        self.state = LifecycleState::Started;
        Ok(())
    }

    /// Run stop hooks in reverse registration order.
    ///
    /// Every hook gets its own `shutdown_timeout` grace period and is
    /// abandoned once it runs out. Returns the first failure.
    pub async fn stop(&mut self) -> anyhow::Result<()> {
        match self.state {
            LifecycleState::Stopping | LifecycleState::Stopped => return Ok(()),
            LifecycleState::Building | LifecycleState::Started => {}
        }
        self.state = LifecycleState::Stopping;

        let mut first_error = None;

        for component in self.components.iter().rev() {
            let name = component.name();
            let result = match timeout(self.shutdown_timeout, component.stop()).await {
                Ok(result) => result,
                Err(_) => Err(anyhow::anyhow!(
                    "did not stop within {:?}",
                    self.shutdown_timeout
                )),
            };
            match result {
                Ok(()) => tracing::info!(component = name, "Stopped"),
                Err(err) => {
                    tracing::error!(component = name, "Stop failed: {:#}", err);
                    if first_error.is_none() {
                        first_error = Some(err.context(format!("failed to stop {}", name)));
                    }
                }
            }
        }

        self.state = LifecycleState::Stopped;
        first_error.map_or(Ok(()), Err)
    }

    /// Start, wait for `signal`, then stop
    pub async fn run_until<S>(&mut self, signal: S) -> anyhow::Result<()>
    where
        S: Future<Output = ()>,
    {
        self.start().await?;
        signal.await;
        tracing::info!("Shutting down");
        self.stop().await
    }

    async fn abort(&mut self) {
        if let Err(err) = self.stop().await {
            tracing::warn!("Cleanup after aborted startup failed: {:#}", err);
        }
    }

    fn ensure_building(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.state == LifecycleState::Building,
            "lifecycle is {:?}, expected Building",
            self.state
        );
        Ok(())
    }
}

/// Resolve on Ctrl-C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .context("failed to install SIGTERM handler")
        {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("{:#}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
