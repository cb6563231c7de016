//! Codec trait and implementations for turning messages into text frames.
//!
//! Every frame on the wire is a single text message. The broadcast bus
//! encodes each outbound event exactly once and hands the same frame to
//! every recipient, so `encode` returns an owned `String` that can be
//! shared cheaply afterwards.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Encodes Rust values to text frames and decodes raw frames back.
///
/// `Send + Sync + 'static` because the codec lives inside the simulation
/// actor and the per-connection handlers for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into a text frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value can't be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes a raw frame into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that speaks JSON via `serde_json`.
///
/// Behind the `json` feature (enabled by default).
///
/// ```rust
/// use fablehold_protocol::{Codec, JsonCodec, PlayerId};
///
/// let codec = JsonCodec;
/// let frame = codec.encode(&PlayerId(7)).unwrap();
/// assert_eq!(frame, "7");
///
/// let back: PlayerId = codec.decode(frame.as_bytes()).unwrap();
/// assert_eq!(back, PlayerId(7));
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
