//! `courier` is a declarative, target-based HTTP API client layer.
//!
//! Callers describe an API operation as a value implementing [`Target`]
//! (base address, path, method, task, headers). A [`Provider`] turns that
//! description into a transport-ready request, dispatches it through a
//! pluggable [`Transport`], and maps the response into a typed value or one
//! classified [`Error`]. Call sites never touch request/response plumbing.
//!
//! # Quick Start
//!
//! ```no_run
//! use courier::prelude::{HyperTransport, Provider, Target, Task};
//! use http::Method;
//! use serde::Deserialize;
//! use url::Url;
//!
//! enum UsersApi {
//!     Get { id: u32 },
//!     Create { name: String },
//! }
//!
//! impl Target for UsersApi {
//!     fn base_url(&self) -> Url {
//!         Url::parse("https://api.example.com").expect("static base url")
//!     }
//!
//!     fn path(&self) -> String {
//!         "users".to_owned()
//!     }
//!
//!     fn method(&self) -> Method {
//!         match self {
//!             Self::Get { .. } => Method::GET,
//!             Self::Create { .. } => Method::POST,
//!         }
//!     }
//!
//!     fn task(&self) -> Task {
//!         match self {
//!             Self::Get { id } => Task::parameters([("id", *id)]),
//!             Self::Create { name } => Task::parameters([("name", name.as_str())]),
//!         }
//!     }
//! }
//!
//! #[derive(Debug, Deserialize)]
//! struct User {
//!     id: u32,
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Provider::new(HyperTransport::new());
//!     let user: User = provider.request(&UsersApi::Get { id: 7 }).await?;
//!     println!("fetched {} ({})", user.name, user.id);
//!     Ok(())
//! }
//! ```
//!
//! # Failure semantics
//!
//! Every call yields exactly one outcome: the decoded value or one of the
//! classified errors in [`Error`]. The only automatic recovery is a single
//! re-send of the identical built request when the transport reports the
//! [`constrained`](TransportErrorKind::Constrained) classification; at most
//! two transport attempts ever occur per call.

mod codec;
mod error;
mod provider;
mod request;
mod response;
mod target;
mod transport;

#[cfg(feature = "hyper-client")]
mod hyper_transport;

pub use crate::codec::{BodyEncoder, JsonDecoder, JsonEncoder, ResponseDecoder};
pub use crate::error::{BoxError, Error, ErrorCode, TransportErrorKind};
pub use crate::provider::Provider;
pub use crate::request::{BuiltRequest, build_request};
pub use crate::response::map_response;
pub use crate::target::{EncodableBody, ParamValue, Parameters, Target, Task};
pub use crate::transport::{RawResponse, Transport, TransportError};

#[cfg(feature = "hyper-client")]
pub use crate::hyper_transport::HyperTransport;

pub type CourierResult<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::{
        BodyEncoder, BuiltRequest, CourierResult, Error, ErrorCode, JsonDecoder, JsonEncoder,
        ParamValue, Parameters, Provider, RawResponse, ResponseDecoder, Target, Task, Transport,
        TransportError, TransportErrorKind,
    };

    #[cfg(feature = "hyper-client")]
    pub use crate::HyperTransport;
}

#[cfg(test)]
mod tests;
