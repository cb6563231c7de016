//! Wire protocol building blocks for Fablehold.
//!
//! This crate defines the pieces every other layer agrees on:
//!
//! - **Identity types** ([`PlayerId`], [`MonsterId`], [`ItemId`]): the
//!   server-assigned ids that appear in every frame.
//! - **Routing** ([`Recipient`]): who an outbound message is meant for.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how messages become
//!   text frames and back.
//! - **Errors** ([`ProtocolError`]).
//!
//! The concrete message enums live with the simulation (`fablehold-world`),
//! the same way a game defines its own client and server messages on top
//! of a framework. This crate doesn't know what a monster does, only how
//! to name one.
//!
//! ```text
//! Transport (text frames) → Protocol (decode) → Simulation (ClientMessage)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ItemId, MonsterId, PlayerId, Recipient};
