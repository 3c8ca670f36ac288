//! Fetches a JSON document from a public echo endpoint through the default
//! hyper transport.
//!
//! ```text
//! cargo run --example basic_json
//! ```

use std::collections::BTreeMap;

use http::Method;
use serde::Deserialize;
use url::Url;

use courier::prelude::{HyperTransport, Provider, Target, Task};

enum EchoApi {
    Get { tag: String },
}

impl Target for EchoApi {
    fn base_url(&self) -> Url {
        Url::parse("https://httpbin.org").expect("static base url")
    }

    fn path(&self) -> String {
        "get".to_owned()
    }

    fn method(&self) -> Method {
        Method::GET
    }

    fn task(&self) -> Task {
        match self {
            Self::Get { tag } => Task::parameters([("tag", tag.as_str())]),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Echoed {
    args: BTreeMap<String, String>,
    url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courier=debug".into()),
        )
        .init();

    let provider = Provider::new(HyperTransport::new());
    let echoed: Echoed = provider
        .request(&EchoApi::Get {
            tag: "demo".to_owned(),
        })
        .await?;

    println!("server saw {} with args {:?}", echoed.url, echoed.args);
    Ok(())
}
