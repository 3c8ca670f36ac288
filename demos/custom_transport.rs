//! Wires a hand-rolled transport into the provider and shows the single
//! automatic retry on the constrained classification.
//!
//! ```text
//! cargo run --example custom_transport
//! ```

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;

use http::{HeaderMap, Method};
use serde::Deserialize;
use url::Url;

use courier::prelude::{
    BuiltRequest, Provider, RawResponse, Target, Transport, TransportError,
};

struct StatusApi;

impl Target for StatusApi {
    fn base_url(&self) -> Url {
        Url::parse("https://status.example.com").expect("static base url")
    }

    fn path(&self) -> String {
        "health".to_owned()
    }

    fn method(&self) -> Method {
        Method::GET
    }

    fn task(&self) -> courier::Task {
        courier::Task::Plain
    }
}

#[derive(Debug, Deserialize)]
struct Health {
    status: String,
}

/// A transport that fails with the constrained classification once, then
/// answers from its script. Real transports would classify failures from
/// their own connectivity signals.
struct FlakyTransport {
    outcomes: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
}

impl Transport for FlakyTransport {
    fn send(
        &self,
        _request: &BuiltRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send {
        let outcome = self
            .outcomes
            .lock()
            .expect("lock outcomes")
            .pop_front()
            .expect("script exhausted");
        async move { outcome }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("courier=debug")
        .init();

    let transport = FlakyTransport {
        outcomes: Mutex::new(VecDeque::from([
            Err(TransportError::constrained("simulated low-data link")),
            Ok(RawResponse::new(
                200,
                HeaderMap::new(),
                r#"{"status":"ok"}"#,
            )),
        ])),
    };

    let provider = Provider::new(transport);
    let health: Health = provider.request(&StatusApi).await?;
    println!("health after one retry: {}", health.status);
    Ok(())
}
