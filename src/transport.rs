//! The transport collaborator boundary.
//!
//! The pipeline never opens sockets itself: it hands a [`BuiltRequest`] to a
//! [`Transport`] and receives back either a buffered [`RawResponse`] or a
//! classified [`TransportError`]. One `send` is one attempt; retrying is the
//! provider's decision, never the transport's.

use std::future::Future;

use bytes::Bytes;
use http::HeaderMap;

use crate::error::{BoxError, TransportErrorKind};
use crate::request::BuiltRequest;

/// A buffered transport response: raw status, headers, and the full body.
///
/// The status is carried as a plain `u16`: validating that it is a
/// recognizable HTTP status belongs to the response mapper, not to the
/// transport.
#[derive(Clone, Debug)]
pub struct RawResponse {
    status: u16,
    headers: HeaderMap,
    body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

/// A transport-level failure with a queryable classification.
#[derive(Debug, thiserror::Error)]
#[error("transport failure ({kind}): {source}")]
pub struct TransportError {
    kind: TransportErrorKind,
    #[source]
    source: BoxError,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, source: impl Into<BoxError>) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }

    /// The degraded-but-present connectivity classification, the one kind
    /// eligible for the provider's single automatic retry.
    pub fn constrained(source: impl Into<BoxError>) -> Self {
        Self::new(TransportErrorKind::Constrained, source)
    }

    pub const fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    pub const fn is_constrained(&self) -> bool {
        matches!(self.kind, TransportErrorKind::Constrained)
    }

    pub fn into_source(self) -> BoxError {
        self.source
    }
}

/// Executes one request attempt asynchronously.
///
/// Implementations own connection handling, TLS, redirects, pooling, and
/// timeout policy; the pipeline treats all of that as opaque. A cancelled
/// (dropped) `send` future must abandon the attempt.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: &BuiltRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}
