//! Player session management for Fablehold.
//!
//! A session is the server's record of one open client connection: which
//! player it belongs to and the channel its outbound frames go through.
//!
//! ```text
//! Simulation (above)  ← produces (Recipient, message) pairs
//!     ↕
//! Session layer (this crate)  ← BroadcastBus encodes and fans out
//!     ↕
//! Connection writers (below)  ← one task per socket drains its channel
//! ```
//!
//! The bus never blocks the simulation: every session channel is
//! unbounded, and a closed channel only marks its session for pruning.

mod bus;
mod error;
mod manager;
mod session;

pub use bus::BroadcastBus;
pub use error::SessionError;
pub use manager::SessionManager;
pub use session::{Frame, Session, SessionConfig, SessionSender, SessionState};
