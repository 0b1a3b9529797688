//! Error types for the VMRay client.
//!
//! Every failure the client can surface is folded into a single `VmrayError`
//! enum with conversions from the underlying library errors.

use thiserror::Error;

/// Convenience type alias for Results using VmrayError.
pub type VmrayResult<T> = Result<T, VmrayError>;

/// Unified error type for the VMRay client.
#[derive(Error, Debug)]
pub enum VmrayError {
    // -- Configuration errors --
    /// Failed to load, parse or apply configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The configured URL could not be parsed.
    #[error("Invalid URL [{url}] - {reason}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The configured URL uses a scheme other than http or https.
    #[error("Invalid schema specified [{0}]")]
    InvalidScheme(String),

    /// The root CA certificate could not be parsed.
    #[error("failed to parse root CA cert: {0}")]
    Certificate(String),

    // -- Network errors --
    /// Connection, TLS or body transfer failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// Request timed out.
    #[error("request timeout: {0}")]
    Timeout(String),

    // -- Protocol errors --
    /// The service answered with a status other than 200.
    #[error("Unexpected status code: {status} ({reason})")]
    Client {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status.
        reason: String,
    },

    // -- Decode errors --
    /// Response body was not the expected JSON.
    #[error("decode error: {0}")]
    Decode(String),

    // -- Local errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Streaming the upload body failed.
    #[error("upload error: {0}")]
    Upload(String),
}

impl VmrayError {
    /// Whether this error came from the network rather than the service.
    pub fn is_transport(&self) -> bool {
        matches!(self, VmrayError::Transport(_) | VmrayError::Timeout(_))
    }

    /// HTTP status code for protocol errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            VmrayError::Client { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for VmrayError {
    fn from(e: serde_json::Error) -> Self {
        VmrayError::Decode(e.to_string())
    }
}

impl From<toml::de::Error> for VmrayError {
    fn from(e: toml::de::Error) -> Self {
        VmrayError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_display() {
        let err = VmrayError::Client {
            status: 404,
            reason: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "Unexpected status code: 404 (Not Found)");
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_scheme_error_display() {
        let err = VmrayError::InvalidScheme("ftp://x".into());
        assert_eq!(err.to_string(), "Invalid schema specified [ftp://x]");
    }

    #[test]
    fn test_transport_classification() {
        assert!(VmrayError::Transport("connection refused".into()).is_transport());
        assert!(VmrayError::Timeout("30s".into()).is_transport());
        assert!(!VmrayError::Decode("eof".into()).is_transport());
    }

    #[test]
    fn test_from_serde_json() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let err: VmrayError = parse.unwrap_err().into();
        assert!(matches!(err, VmrayError::Decode(_)));
    }
}
