use std::fmt;

/// Failure reported by a [`crate::UserLookup`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct LookupError {
    pub kind: FailureKind,
    pub message: String,
}

impl LookupError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Whether the response arrived but was not shaped as expected.
    pub fn is_malformed(&self) -> bool {
        self.kind == FailureKind::MalformedResponse
    }

    /// Short text suitable for the error state shown to the user.
    pub fn user_message(&self) -> String {
        let reported = self.message.trim();
        if !reported.is_empty() {
            return format!("Search failed: {reported}");
        }
        match &self.kind {
            FailureKind::HttpStatus(code) => format!("Search failed (status {code})"),
            FailureKind::Timeout => "Search timed out".to_string(),
            FailureKind::MalformedResponse => "Search returned an unexpected response".to_string(),
            _ => "Search failed".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidEndpoint,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
    MalformedResponse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
        }
    }
}
