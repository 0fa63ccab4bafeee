use thiserror::Error;

/// Top-level error type for the `vmrest-api` crate.
///
/// Splits local precondition failures (detected before any network call)
/// from remote failures (the server answered with an error) and transport
/// failures (no server response was obtained at all).
#[derive(Debug, Error)]
pub enum Error {
    // ── Local preconditions ─────────────────────────────────────────
    /// A required local argument was missing or malformed. Raised before
    /// any network traffic.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Lookup by object id found no matching resource.
    #[error("{resource} not found: {key}")]
    NotFound {
        resource: &'static str,
        key: String,
    },

    /// Lookup by alias/display name found zero matches, or more than one.
    #[error("{resource} lookup by '{key}' matched {matches} resources")]
    AmbiguousOrMissing {
        resource: &'static str,
        key: String,
        matches: usize,
    },

    /// `update()` was called on an entity with no staged edits. Deliberate
    /// guard against accidental no-op network calls -- always surfaced.
    #[error("No pending changes to push")]
    NoPendingChanges,

    // ── Remote failures ─────────────────────────────────────────────
    /// The server answered with an HTTP error or an application-level
    /// error envelope. Carries the server's status and text verbatim.
    #[error("Server error (HTTP {status}): {message}")]
    Remote {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// The HTTP transport itself failed (DNS, connection refused,
    /// timeout). Distinct from `Remote`: no server response exists.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Media ───────────────────────────────────────────────────────
    /// Local file I/O failed during a WAV upload or download.
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Returns `true` if this error was raised locally, before any
    /// network call was attempted.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. } | Self::NoPendingChanges | Self::InvalidUrl(_)
        )
    }

    /// Returns `true` if this is a "not found" error, whether raised
    /// locally or derived from an HTTP 404.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Remote { status: 404, .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth retrying at the
    /// call site. The library itself never retries.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Remote { status, .. } => *status == 503,
            _ => false,
        }
    }

    /// Extract the server's application error code, if one was present in
    /// the error envelope.
    pub fn remote_error_code(&self) -> Option<&str> {
        match self {
            Self::Remote { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
