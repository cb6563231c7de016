//! `FableholdServer` builder and accept loop.
//!
//! Ties the layers together: transport → handler → simulation actor →
//! broadcast bus.

use std::net::SocketAddr;

use fablehold_sim::{SimConfig, SimHandle, spawn_simulation};
use fablehold_transport::{Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::{FableholdError, ServerConfig};

/// Builder for configuring and starting a Fablehold server.
///
/// # Example
///
/// ```rust,no_run
/// use fablehold::prelude::*;
///
/// # async fn start() -> Result<(), FableholdError> {
/// let server = FableholdServer::builder()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct FableholdServerBuilder {
    bind_addr: String,
    sim_config: SimConfig,
}

impl FableholdServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: ServerConfig::default().addr(),
            sim_config: SimConfig::default(),
        }
    }

    /// Sets the address to listen on. Port `0` lets the OS choose.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Takes the listen address from a [`ServerConfig`].
    pub fn config(mut self, config: &ServerConfig) -> Self {
        self.bind_addr = config.addr();
        self
    }

    /// Sets world constants, tick schedules and session limits.
    pub fn sim_config(mut self, config: SimConfig) -> Self {
        self.sim_config = config;
        self
    }

    /// Fixes the simulation's RNG seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.sim_config.seed = Some(seed);
        self
    }

    /// Binds the listener, then starts the simulation actor.
    pub async fn build(self) -> Result<FableholdServer, FableholdError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let sim = spawn_simulation(self.sim_config);
        Ok(FableholdServer { transport, sim })
    }
}

impl Default for FableholdServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Fablehold server with its simulation running.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct FableholdServer {
    transport: WebSocketTransport,
    sim: SimHandle,
}

impl FableholdServer {
    pub fn builder() -> FableholdServerBuilder {
        FableholdServerBuilder::new()
    }

    pub fn local_addr(&self) -> Result<SocketAddr, FableholdError> {
        Ok(self.transport.local_addr()?)
    }

    /// Handle to the simulation, for diagnostics and shutdown.
    pub fn sim(&self) -> &SimHandle {
        &self.sim
    }

    /// Runs the accept loop, spawning one handler task per connection.
    ///
    /// A failed accept is logged and the loop continues. Runs until the
    /// process is terminated.
    pub async fn run(mut self) -> Result<(), FableholdError> {
        tracing::info!(addr = %self.local_addr()?, "Fablehold server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let sim = self.sim.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, sim).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
