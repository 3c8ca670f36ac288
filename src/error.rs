pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Classification of a transport-level failure, reported by the
/// [`Transport`](crate::transport::Transport) collaborator.
///
/// `Constrained` is the one retryable kind: connectivity is present but
/// degraded (for example a link in a data-saving mode). The provider re-sends
/// the identical request exactly once when it sees it. Every other kind,
/// including ordinary unreachability, surfaces immediately as
/// [`Error::NotConnected`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransportErrorKind {
    Constrained,
    Dns,
    Connect,
    Tls,
    Read,
    Other,
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Constrained => "constrained",
            Self::Dns => "dns",
            Self::Connect => "connect",
            Self::Tls => "tls",
            Self::Read => "read",
            Self::Other => "other",
        };
        formatter.write_str(text)
    }
}

/// Flat error code, usable as a logging or metrics key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorCode {
    MalformedUrl,
    Encode,
    NotConnected,
    InvalidResponse,
    InvalidData,
    InvalidServerResponse,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedUrl => "malformed_url",
            Self::Encode => "encode",
            Self::NotConnected => "not_connected",
            Self::InvalidResponse => "invalid_response",
            Self::InvalidData => "invalid_data",
            Self::InvalidServerResponse => "invalid_server_response",
        }
    }
}

/// The terminal outcome classification of a failed call.
///
/// Every variant is surfaced to the caller as-is; nothing is swallowed or
/// retried past the single constrained re-send described on
/// [`TransportErrorKind`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The target's base url and path cannot compose into a valid url.
    #[error("malformed request url: {url}")]
    MalformedUrl { url: String },
    /// Body construction failed: the parameter map or the encodable payload
    /// could not be serialized.
    #[error("failed to encode request body: {source}")]
    Encode {
        #[source]
        source: BoxError,
    },
    /// The transport failed to produce a response, carrying its
    /// classification and underlying cause.
    #[error("not connected ({kind}): {source}")]
    NotConnected {
        kind: TransportErrorKind,
        #[source]
        source: BoxError,
    },
    /// The server answered with a status outside `[200, 300)`. The body is
    /// carried (truncated) for diagnostics; it was never decoded.
    #[error("invalid response status {status}: {body}")]
    InvalidResponse { status: u16, body: String },
    /// A success status arrived but the body did not decode into the
    /// requested type.
    #[error("failed to decode response body: {source}; body={body}")]
    InvalidData {
        #[source]
        source: BoxError,
        body: String,
    },
    /// The reported status is not a representable HTTP status at all.
    #[error("server response is not http (status {status})")]
    InvalidServerResponse { status: u16 },
}

impl Error {
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedUrl { .. } => ErrorCode::MalformedUrl,
            Self::Encode { .. } => ErrorCode::Encode,
            Self::NotConnected { .. } => ErrorCode::NotConnected,
            Self::InvalidResponse { .. } => ErrorCode::InvalidResponse,
            Self::InvalidData { .. } => ErrorCode::InvalidData,
            Self::InvalidServerResponse { .. } => ErrorCode::InvalidServerResponse,
        }
    }
}
