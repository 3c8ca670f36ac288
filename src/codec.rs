//! Encoder and decoder capabilities consumed at the request/response
//! boundary. The shipped implementations speak JSON through `serde_json`;
//! callers substitute their own to change the wire format without touching
//! the pipeline.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::BoxError;

/// Serializes an encodable payload into request body bytes.
pub trait BodyEncoder: Send + Sync {
    fn encode<P>(&self, payload: &P) -> Result<Vec<u8>, BoxError>
    where
        P: Serialize + ?Sized;
}

/// JSON body encoder backed by `serde_json`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonEncoder {
    pretty: bool,
}

impl JsonEncoder {
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Pretty-printed rendering, for endpoints that are read by humans.
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl BodyEncoder for JsonEncoder {
    fn encode<P>(&self, payload: &P) -> Result<Vec<u8>, BoxError>
    where
        P: Serialize + ?Sized,
    {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(payload)
        } else {
            serde_json::to_vec(payload)
        };
        encoded.map_err(BoxError::from)
    }
}

/// Deserializes buffered response bytes into the caller-requested type.
pub trait ResponseDecoder: Send + Sync {
    fn decode<T>(&self, body: &[u8]) -> Result<T, BoxError>
    where
        T: DeserializeOwned;
}

/// JSON response decoder backed by `serde_json`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonDecoder;

impl JsonDecoder {
    pub const fn new() -> Self {
        Self
    }
}

impl ResponseDecoder for JsonDecoder {
    fn decode<T>(&self, body: &[u8]) -> Result<T, BoxError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(body).map_err(BoxError::from)
    }
}
