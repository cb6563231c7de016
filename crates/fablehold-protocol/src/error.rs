//! Error types for the protocol layer.
//!
//! Every Fablehold crate owns its error enum. A `ProtocolError` always
//! means a frame could not be turned into a message (or the reverse),
//! never a networking or simulation problem.

/// Errors that can occur while encoding or decoding frames.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (Rust value → text frame).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (text frame → Rust value).
    ///
    /// Malformed JSON, an unknown `type` tag, or a field with the wrong
    /// shape all land here. The server drops such frames silently.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
