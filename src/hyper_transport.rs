//! Default [`Transport`] adapter over the hyper legacy client with rustls.
//!
//! This adapter never reports [`TransportErrorKind::Constrained`]: the
//! portable stack has no view of link quality, so the constrained
//! classification is left to transports (or tests) that can observe it.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use http::Request;
use http_body_util::{BodyExt, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;

use crate::error::TransportErrorKind;
use crate::request::BuiltRequest;
use crate::transport::{RawResponse, Transport, TransportError};

const DEFAULT_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

type HyperClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Shared hyper-backed transport. Cloning shares the underlying connection
/// pool.
#[derive(Clone)]
pub struct HyperTransport {
    client: HyperClient,
}

impl HyperTransport {
    pub fn new() -> Self {
        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(DEFAULT_POOL_IDLE_TIMEOUT)
            .build(connector);
        Self { client }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("HyperTransport").finish_non_exhaustive()
    }
}

impl Transport for HyperTransport {
    fn send(
        &self,
        request: &BuiltRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send {
        let http_request = to_http_request(request);
        let client = self.client.clone();
        async move {
            let response = client
                .request(http_request?)
                .await
                .map_err(|source| TransportError::new(classify_client_error(&source), source))?;
            let (parts, body) = response.into_parts();
            let collected = body
                .collect()
                .await
                .map_err(|source| TransportError::new(TransportErrorKind::Read, source))?;
            Ok(RawResponse::new(
                parts.status.as_u16(),
                parts.headers,
                collected.to_bytes(),
            ))
        }
    }
}

fn to_http_request(request: &BuiltRequest) -> Result<Request<Full<Bytes>>, TransportError> {
    let body = request.body().cloned().unwrap_or_default();
    let mut http_request = Request::builder()
        .method(request.method().clone())
        .uri(request.url().as_str())
        .body(Full::new(body))
        .map_err(|source| TransportError::new(TransportErrorKind::Other, source))?;
    *http_request.headers_mut() = request.headers().clone();
    Ok(http_request)
}

fn classify_client_error(error: &hyper_util::client::legacy::Error) -> TransportErrorKind {
    let text = error.to_string().to_ascii_lowercase();
    if error.is_connect() {
        if text.contains("dns") || text.contains("failed to lookup address") {
            TransportErrorKind::Dns
        } else if text.contains("tls") || text.contains("certificate") || text.contains("handshake")
        {
            TransportErrorKind::Tls
        } else {
            TransportErrorKind::Connect
        }
    } else if text.contains("read")
        || text.contains("connection reset")
        || text.contains("broken pipe")
        || text.contains("unexpected eof")
    {
        TransportErrorKind::Read
    } else {
        TransportErrorKind::Other
    }
}
