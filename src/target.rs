use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, Method};
use serde::Serialize;
use url::Url;

use crate::codec::{BodyEncoder, JsonEncoder};
use crate::error::BoxError;

/// The contract describing one API operation.
///
/// A target is pure data: base address, relative path, method, the task that
/// determines body and parameters, and optional headers. Targets are built by
/// the caller, consumed once per request build, and never mutated or retained
/// by the pipeline.
pub trait Target {
    /// The absolute base address requests are issued against.
    fn base_url(&self) -> Url;

    /// The path appended to the base address, as path components. An empty
    /// path leaves the base address untouched.
    fn path(&self) -> String;

    /// The HTTP method of the request.
    fn method(&self) -> Method;

    /// What accompanies the request: nothing, raw bytes, a parameter map, or
    /// an encodable payload.
    fn task(&self) -> Task;

    /// Headers set on the built request, exactly as returned. `None` means
    /// no custom headers; nothing is injected either way.
    fn headers(&self) -> Option<HeaderMap> {
        None
    }
}

/// String-keyed parameter mapping. `BTreeMap` keeps request building
/// deterministic across repeated builds of the same target.
pub type Parameters = BTreeMap<String, ParamValue>;

/// A closed scalar union for parameter values.
///
/// Every variant has a defined string rendering (see
/// [`ParamValue::query_value`]), so query construction is total: no value
/// can silently vanish from a query string.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl ParamValue {
    /// Renders the scalar as a URL query value.
    ///
    /// Coercion rule: `String` passes through unchanged, `Integer` and
    /// `Float` use their decimal rendering, `Bool` renders as `true`/`false`,
    /// and `Null` renders as the empty string with the key kept.
    pub fn query_value(&self) -> Cow<'_, str> {
        match self {
            Self::String(value) => Cow::Borrowed(value),
            Self::Integer(value) => Cow::Owned(value.to_string()),
            Self::Float(value) => Cow::Owned(value.to_string()),
            Self::Bool(value) => Cow::Borrowed(if *value { "true" } else { "false" }),
            Self::Null => Cow::Borrowed(""),
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::String(value) => serializer.serialize_str(value),
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Null => serializer.serialize_none(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<V> From<Option<V>> for ParamValue
where
    V: Into<ParamValue>,
{
    fn from(value: Option<V>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// What accompanies a request. Exactly one variant is active and it fully
/// determines body construction; there is no cross-variant merging.
#[derive(Clone, Debug)]
pub enum Task {
    /// No body.
    Plain,
    /// Opaque bytes sent verbatim as the body.
    Data(Bytes),
    /// A parameter map: URL query items for GET, a JSON object body for
    /// every other method.
    Parameters(Parameters),
    /// An encodable payload paired with the encoder that serializes it at
    /// build time.
    Encodable(EncodableBody),
}

impl Task {
    pub fn data(bytes: impl Into<Bytes>) -> Self {
        Self::Data(bytes.into())
    }

    pub fn parameters<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Parameters(
            pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }

    /// An encodable payload serialized with the default [`JsonEncoder`].
    pub fn encodable<P>(payload: P) -> Self
    where
        P: Serialize + Send + Sync + 'static,
    {
        Self::encodable_with(payload, JsonEncoder::new())
    }

    /// An encodable payload serialized with the supplied encoder capability.
    pub fn encodable_with<P, E>(payload: P, encoder: E) -> Self
    where
        P: Serialize + Send + Sync + 'static,
        E: BodyEncoder + 'static,
    {
        Self::Encodable(EncodableBody::new(payload, encoder))
    }
}

/// A payload captured together with its encoder. Encoding is deferred until
/// request build so encoder failures surface as build-time errors.
#[derive(Clone)]
pub struct EncodableBody {
    encode: Arc<dyn Fn() -> Result<Vec<u8>, BoxError> + Send + Sync>,
}

impl EncodableBody {
    fn new<P, E>(payload: P, encoder: E) -> Self
    where
        P: Serialize + Send + Sync + 'static,
        E: BodyEncoder + 'static,
    {
        Self {
            encode: Arc::new(move || encoder.encode(&payload)),
        }
    }

    pub(crate) fn encode(&self) -> Result<Vec<u8>, BoxError> {
        (self.encode)()
    }
}

impl std::fmt::Debug for EncodableBody {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("EncodableBody").finish_non_exhaustive()
    }
}
