use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::CourierResult;
use crate::codec::{JsonDecoder, ResponseDecoder};
use crate::error::Error;
use crate::request::{BuiltRequest, build_request};
use crate::response::map_response;
use crate::target::Target;
use crate::transport::{RawResponse, Transport, TransportError};

/// Orchestrates the pipeline: build the request, send it through the
/// transport, and map the raw outcome into a typed value or a classified
/// error.
///
/// One call performs at most two transport sends: the original attempt plus a
/// single automatic re-send of the identical built request when the first
/// attempt fails with the constrained classification. A second failure of any
/// kind surfaces as [`Error::NotConnected`].
///
/// The provider holds no per-call state, so one instance may serve any number
/// of concurrent calls. The returned future delivers the outcome on whatever
/// executor polls it; dropping the future cancels the call, and a cancelled
/// call never enters the retry.
#[derive(Clone, Debug)]
pub struct Provider<T, D = JsonDecoder> {
    transport: T,
    decoder: D,
}

impl<T> Provider<T>
where
    T: Transport,
{
    /// A provider over the given transport, decoding responses as JSON.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            decoder: JsonDecoder::new(),
        }
    }
}

impl<T, D> Provider<T, D>
where
    T: Transport,
    D: ResponseDecoder,
{
    /// Replaces the response decoder capability.
    pub fn with_decoder<D2>(self, decoder: D2) -> Provider<T, D2>
    where
        D2: ResponseDecoder,
    {
        Provider {
            transport: self.transport,
            decoder,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Issues the request described by `target` and decodes the response
    /// into `Out`.
    pub async fn request<Out, Tg>(&self, target: &Tg) -> CourierResult<Out>
    where
        Out: DeserializeOwned,
        Tg: Target + ?Sized,
    {
        let request = build_request(target)?;
        let response = self.dispatch(&request).await?;
        debug!(
            method = %request.method(),
            url = %request.url(),
            status = response.status(),
            "mapping response"
        );
        map_response(response, &self.decoder)
    }

    /// Sends the built request, re-sending it exactly once if the first
    /// attempt fails with the constrained classification.
    async fn dispatch(&self, request: &BuiltRequest) -> CourierResult<RawResponse> {
        debug!(method = %request.method(), url = %request.url(), "sending request");
        match self.transport.send(request).await {
            Ok(response) => Ok(response),
            Err(error) if error.is_constrained() => {
                warn!(
                    method = %request.method(),
                    url = %request.url(),
                    error = %error,
                    "retrying request after constrained transport failure"
                );
                self.transport
                    .send(request)
                    .await
                    .map_err(not_connected)
            }
            Err(error) => Err(not_connected(error)),
        }
    }
}

fn not_connected(error: TransportError) -> Error {
    Error::NotConnected {
        kind: error.kind(),
        source: error.into_source(),
    }
}
