//! Identity and routing types shared by every Fablehold layer.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Server-assigned identifier of a connected player.
///
/// A newtype over `u64` so a `MonsterId` can never be passed where a
/// player is expected. `#[serde(transparent)]` keeps the wire form a plain
/// number: `PlayerId(42)` is `42` in JSON.
///
/// Ids are allocated in increasing order, so comparing two ids also
/// orders players by how long they've been connected. The monster AI
/// relies on that to break targeting ties deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Identifier of a live monster. Never reused within one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonsterId(pub u64);

impl fmt::Display for MonsterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M-{}", self.0)
    }
}

/// Identifier of an item lying in the world (herb or loot drop).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Recipient: who should receive a message?
// ---------------------------------------------------------------------------

/// Specifies who should receive a server message.
///
/// Simulation code never touches sockets. Every operation returns a list
/// of `(Recipient, ServerMessage)` pairs and the broadcast bus delivers
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every open session.
    All,

    /// Only the given player (targeted reply).
    Player(PlayerId),

    /// Every open session except the given player. Used so a sender
    /// doesn't see its own action echoed back.
    AllExcept(PlayerId),
}
