//! Feed ingestion error types.
//!
//! Ingestion never aborts the game: callers log these and carry on with
//! whatever bodies were populated.

use std::fmt;

/// Failure while fetching or decoding the near-Earth-object feed
#[derive(Debug, Clone, PartialEq)]
pub enum IngestError {
    /// The request could not be sent or the server answered with a failure
    Network {
        /// Human-readable description of what went wrong
        reason: String,
    },

    /// The response body was not a usable feed document
    Parse {
        /// Decoder message
        reason: String,
    },
}

impl IngestError {
    pub fn network(reason: impl Into<String>) -> Self {
        IngestError::Network {
            reason: reason.into(),
        }
    }

    pub fn parse(reason: impl Into<String>) -> Self {
        IngestError::Parse {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Network { reason } => write!(f, "NEO feed network error: {}", reason),
            IngestError::Parse { reason } => write!(f, "NEO feed parse error: {}", reason),
        }
    }
}

impl std::error::Error for IngestError {}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        IngestError::parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            IngestError::network("HTTP 503").to_string(),
            "NEO feed network error: HTTP 503"
        );
        assert_eq!(
            IngestError::parse("eof").to_string(),
            "NEO feed parse error: eof"
        );
    }

    #[test]
    fn test_from_serde_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(IngestError::from(err), IngestError::Parse { .. }));
    }
}
