use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use http::Method;
use http::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::codec::{BodyEncoder, JsonDecoder, JsonEncoder, ResponseDecoder};
use crate::error::{BoxError, Error, ErrorCode};
use crate::request::build_request;
use crate::response::map_response;
use crate::target::{ParamValue, Target, Task};
use crate::transport::RawResponse;

struct TestTarget {
    base: &'static str,
    path: &'static str,
    method: Method,
    task: Task,
    headers: Option<HeaderMap>,
}

impl TestTarget {
    fn new(method: Method, task: Task) -> Self {
        Self {
            base: "https://api.test",
            path: "users",
            method,
            task,
            headers: None,
        }
    }
}

impl Target for TestTarget {
    fn base_url(&self) -> Url {
        Url::parse(self.base).expect("test base url should parse")
    }

    fn path(&self) -> String {
        self.path.to_owned()
    }

    fn method(&self) -> Method {
        self.method.clone()
    }

    fn task(&self) -> Task {
        self.task.clone()
    }

    fn headers(&self) -> Option<HeaderMap> {
        self.headers.clone()
    }
}

fn query_pairs(url: &Url) -> Vec<(String, String)> {
    url.query_pairs()
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect()
}

#[test]
fn get_parameters_become_query_items_and_no_body() {
    let target = TestTarget::new(Method::GET, Task::parameters([("id", "7")]));
    let request = build_request(&target).expect("build should succeed");

    assert_eq!(request.method(), &Method::GET);
    assert_eq!(request.url().as_str(), "https://api.test/users?id=7");
    assert!(request.body().is_none());
}

#[test]
fn get_query_coerces_every_scalar_variant() {
    let target = TestTarget::new(
        Method::GET,
        Task::parameters([
            ("bool", ParamValue::from(true)),
            ("count", ParamValue::from(42)),
            ("name", ParamValue::from("a b")),
            ("nothing", ParamValue::Null),
            ("ratio", ParamValue::from(2.5)),
        ]),
    );
    let request = build_request(&target).expect("build should succeed");

    let pairs = query_pairs(request.url());
    assert_eq!(
        pairs,
        vec![
            ("bool".to_owned(), "true".to_owned()),
            ("count".to_owned(), "42".to_owned()),
            ("name".to_owned(), "a b".to_owned()),
            ("nothing".to_owned(), String::new()),
            ("ratio".to_owned(), "2.5".to_owned()),
        ]
    );
    assert!(request.body().is_none());
}

#[test]
fn get_with_empty_parameters_has_no_query() {
    let target = TestTarget::new(Method::GET, Task::parameters::<&str, ParamValue, _>([]));
    let request = build_request(&target).expect("build should succeed");

    assert_eq!(request.url().as_str(), "https://api.test/users");
    assert!(request.url().query().is_none());
}

#[test]
fn get_ignores_data_and_encodable_tasks() {
    let data_target = TestTarget::new(Method::GET, Task::data(&b"ignored"[..]));
    let request = build_request(&data_target).expect("build should succeed");
    assert!(request.body().is_none());
    assert!(request.url().query().is_none());

    let encodable_target = TestTarget::new(Method::GET, Task::encodable(vec![1, 2, 3]));
    let request = build_request(&encodable_target).expect("build should succeed");
    assert!(request.body().is_none());
}

#[test]
fn post_parameters_become_json_body_and_no_query() {
    let target = TestTarget::new(Method::POST, Task::parameters([("name", "a")]));
    let request = build_request(&target).expect("build should succeed");

    assert_eq!(request.url().as_str(), "https://api.test/users");
    assert!(request.url().query().is_none());
    let body = request.body().expect("post parameters should produce a body");
    let decoded: Value = serde_json::from_slice(body).expect("body should be json");
    assert_eq!(decoded, serde_json::json!({ "name": "a" }));
}

#[test]
fn post_with_empty_parameters_sends_empty_json_object() {
    let target = TestTarget::new(Method::POST, Task::parameters::<&str, ParamValue, _>([]));
    let request = build_request(&target).expect("build should succeed");

    let body = request.body().expect("empty parameters still produce a body");
    assert_eq!(body.as_ref(), b"{}");
}

#[test]
fn post_raw_data_is_sent_verbatim() {
    let payload = Bytes::from_static(b"\x00\x01raw");
    let target = TestTarget::new(Method::POST, Task::Data(payload.clone()));
    let request = build_request(&target).expect("build should succeed");

    assert_eq!(request.body(), Some(&payload));
}

#[test]
fn post_plain_has_no_body() {
    let target = TestTarget::new(Method::POST, Task::Plain);
    let request = build_request(&target).expect("build should succeed");

    assert!(request.body().is_none());
}

#[derive(Serialize)]
struct CreateUser {
    name: String,
}

#[test]
fn post_encodable_uses_the_json_encoder() {
    let payload = CreateUser {
        name: "a".to_owned(),
    };
    let target = TestTarget::new(Method::POST, Task::encodable(payload));
    let request = build_request(&target).expect("build should succeed");

    let body = request.body().expect("encodable should produce a body");
    let decoded: Value = serde_json::from_slice(body).expect("body should be json");
    assert_eq!(decoded, serde_json::json!({ "name": "a" }));
}

struct FailingEncoder;

impl BodyEncoder for FailingEncoder {
    fn encode<P>(&self, _payload: &P) -> Result<Vec<u8>, BoxError>
    where
        P: Serialize + ?Sized,
    {
        Err("encoder capability refused the payload".into())
    }
}

#[test]
fn encoder_failure_surfaces_as_encode_error_at_build_time() {
    let target = TestTarget::new(Method::POST, Task::encodable_with((), FailingEncoder));
    let error = build_request(&target).expect_err("failing encoder should fail the build");

    match error {
        Error::Encode { .. } => assert_eq!(error.code(), ErrorCode::Encode),
        other => panic!("unexpected error variant: {other}"),
    }
}

#[test]
fn pretty_encoder_still_decodes_to_the_same_value() {
    let payload = CreateUser {
        name: "pretty".to_owned(),
    };
    let target = TestTarget::new(
        Method::POST,
        Task::encodable_with(payload, JsonEncoder::pretty()),
    );
    let request = build_request(&target).expect("build should succeed");

    let body = request.body().expect("encodable should produce a body");
    let decoded: Value = serde_json::from_slice(body).expect("body should be json");
    assert_eq!(decoded, serde_json::json!({ "name": "pretty" }));
}

#[test]
fn headers_are_set_exactly_from_the_target() {
    let mut headers = HeaderMap::new();
    headers.insert("x-api-key", HeaderValue::from_static("secret"));
    let mut target = TestTarget::new(Method::GET, Task::Plain);
    target.headers = Some(headers.clone());

    let request = build_request(&target).expect("build should succeed");
    assert_eq!(request.headers(), &headers);

    let bare = TestTarget::new(Method::POST, Task::parameters([("name", "a")]));
    let request = build_request(&bare).expect("build should succeed");
    assert!(
        request.headers().is_empty(),
        "no headers are injected beyond the target's own"
    );
}

#[test]
fn building_the_same_target_twice_is_idempotent() {
    let target = TestTarget::new(
        Method::POST,
        Task::parameters([("name", "a"), ("role", "admin")]),
    );

    let first = build_request(&target).expect("first build should succeed");
    let second = build_request(&target).expect("second build should succeed");
    assert_eq!(first, second);
}

#[test]
fn path_joining_normalizes_separators() {
    let mut target = TestTarget::new(Method::GET, Task::Plain);
    target.base = "https://api.test/v1/";
    target.path = "/users/7";

    let request = build_request(&target).expect("build should succeed");
    assert_eq!(request.url().as_str(), "https://api.test/v1/users/7");
}

#[test]
fn empty_path_leaves_the_base_url_untouched() {
    let mut target = TestTarget::new(Method::GET, Task::Plain);
    target.base = "https://api.test/v1";
    target.path = "";

    let request = build_request(&target).expect("build should succeed");
    assert_eq!(request.url().as_str(), "https://api.test/v1");
}

#[test]
fn cannot_be_a_base_url_fails_as_malformed() {
    let mut target = TestTarget::new(Method::GET, Task::Plain);
    target.base = "mailto:ops@api.test";
    target.path = "users";

    let error = build_request(&target).expect_err("path append should fail");
    match error {
        Error::MalformedUrl { ref url } => {
            assert_eq!(url, "mailto:ops@api.test");
            assert_eq!(error.code(), ErrorCode::MalformedUrl);
        }
        other => panic!("unexpected error variant: {other}"),
    }
}

struct CountingDecoder {
    calls: AtomicUsize,
}

impl CountingDecoder {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ResponseDecoder for CountingDecoder {
    fn decode<T>(&self, body: &[u8]) -> Result<T, BoxError>
    where
        T: serde::de::DeserializeOwned,
    {
        self.calls.fetch_add(1, Ordering::SeqCst);
        serde_json::from_slice(body).map_err(BoxError::from)
    }
}

fn response(status: u16, body: &str) -> RawResponse {
    RawResponse::new(status, HeaderMap::new(), body.as_bytes().to_vec())
}

#[test]
fn success_status_decodes_the_body() {
    let decoded: Value =
        map_response(response(200, r#"{"id":7}"#), &JsonDecoder::new()).expect("200 should decode");
    assert_eq!(decoded, serde_json::json!({ "id": 7 }));

    let decoded: Value =
        map_response(response(299, "[1]"), &JsonDecoder::new()).expect("299 should decode");
    assert_eq!(decoded, serde_json::json!([1]));
}

#[test]
fn non_success_status_maps_to_invalid_response_without_decoding() {
    let decoder = CountingDecoder::new();

    for status in [199_u16, 300, 404, 500] {
        let error = map_response::<Value, _>(response(status, r#"{"id":7}"#), &decoder)
            .expect_err("non-success status should fail");
        match error {
            Error::InvalidResponse {
                status: reported, ..
            } => assert_eq!(reported, status),
            other => panic!("unexpected error variant: {other}"),
        }
    }
    assert_eq!(decoder.calls(), 0, "decoder must never run on failure statuses");
}

#[test]
fn unrepresentable_status_maps_to_invalid_server_response() {
    let error = map_response::<Value, _>(response(1000, ""), &JsonDecoder::new())
        .expect_err("status 1000 is not http");
    match error {
        Error::InvalidServerResponse { status } => {
            assert_eq!(status, 1000);
            assert_eq!(error.code(), ErrorCode::InvalidServerResponse);
        }
        other => panic!("unexpected error variant: {other}"),
    }
}

#[test]
fn decode_failure_on_success_status_maps_to_invalid_data() {
    let error = map_response::<Value, _>(response(200, "not json"), &JsonDecoder::new())
        .expect_err("garbage body should fail decode");
    match error {
        Error::InvalidData { ref body, .. } => {
            assert_eq!(body, "not json");
            assert_eq!(error.code(), ErrorCode::InvalidData);
        }
        other => panic!("unexpected error variant: {other}"),
    }
}

#[test]
fn diagnostic_bodies_are_truncated() {
    let long_body = "x".repeat(5000);
    let error = map_response::<Value, _>(response(500, &long_body), &JsonDecoder::new())
        .expect_err("500 should fail");
    match error {
        Error::InvalidResponse { body, .. } => {
            assert!(body.ends_with("...(truncated)"));
            assert!(body.len() < long_body.len());
        }
        other => panic!("unexpected error variant: {other}"),
    }
}

#[test]
fn error_codes_render_stable_strings() {
    assert_eq!(ErrorCode::MalformedUrl.as_str(), "malformed_url");
    assert_eq!(ErrorCode::NotConnected.as_str(), "not_connected");
    assert_eq!(ErrorCode::InvalidServerResponse.as_str(), "invalid_server_response");
}
