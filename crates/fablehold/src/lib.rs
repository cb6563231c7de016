//! # Fablehold
//!
//! An authoritative multiplayer world server. Players connect over
//! WebSocket, exchange `type`-tagged JSON frames, and share one world of
//! monsters, herbs, quests and a shop that a single simulation actor owns.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fablehold::prelude::*;
//!
//! # async fn start() -> Result<(), FableholdError> {
//! let config = ServerConfig::from_env()?;
//! let server = FableholdServer::builder().config(&config).build().await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::ServerConfig;
pub use error::FableholdError;
pub use server::{FableholdServer, FableholdServerBuilder};

/// Everything needed to configure and run a server.
pub mod prelude {
    pub use crate::{FableholdError, FableholdServer, FableholdServerBuilder, ServerConfig};
    pub use fablehold_protocol::{ItemId, MonsterId, PlayerId, Recipient};
    pub use fablehold_session::SessionConfig;
    pub use fablehold_sim::{SimConfig, SimError, SimHandle, SimInfo};
    pub use fablehold_tick::TickConfig;
    pub use fablehold_world::{ClientMessage, ServerMessage, WorldConfig};
}
