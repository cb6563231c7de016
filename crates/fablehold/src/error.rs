//! Unified error type for the Fablehold server.

use fablehold_protocol::ProtocolError;
use fablehold_session::SessionError;
use fablehold_sim::SimError;
use fablehold_transport::TransportError;

/// Top-level error wrapping every layer's error.
///
/// `#[from]` on each variant lets `?` lift sub-crate errors without
/// explicit mapping.
#[derive(Debug, thiserror::Error)]
pub enum FableholdError {
    /// Binding, accepting, sending or receiving failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The session table refused a player.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The simulation actor is gone or refused a request.
    #[error(transparent)]
    Sim(#[from] SimError),

    /// Bad process configuration, such as a non-numeric `PORT`.
    #[error("invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use fablehold_protocol::{Codec, JsonCodec, PlayerId};
    use fablehold_world::ClientMessage;

    #[test]
    fn test_from_transport_error() {
        let err: FableholdError = TransportError::ConnectionClosed("gone".into()).into();
        assert!(matches!(err, FableholdError::Transport(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let decoded: Result<ClientMessage, _> = JsonCodec.decode(b"not json");
        let err: FableholdError = decoded.unwrap_err().into();
        assert!(matches!(err, FableholdError::Protocol(ProtocolError::Decode(_))));
        assert!(err.to_string().starts_with("decode failed"));
    }

    #[test]
    fn test_from_session_error() {
        let err: FableholdError = SessionError::NotFound(PlayerId(4)).into();
        assert!(matches!(err, FableholdError::Session(_)));
    }

    #[test]
    fn test_from_sim_error() {
        let err: FableholdError = SimError::Unavailable.into();
        assert!(matches!(err, FableholdError::Sim(SimError::Unavailable)));
        assert_eq!(err.to_string(), "simulation is unavailable");
    }

    #[test]
    fn test_config_error_message() {
        let err = FableholdError::Config("PORT must be a number".into());
        assert_eq!(err.to_string(), "invalid configuration: PORT must be a number");
    }
}
