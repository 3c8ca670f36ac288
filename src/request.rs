use bytes::Bytes;
use http::{HeaderMap, Method};
use url::Url;

use crate::CourierResult;
use crate::error::Error;
use crate::target::{Parameters, Target, Task};

/// A fully resolved, transport-ready request value.
///
/// Built fresh per call and owned by that call's execution; never cached or
/// reused across calls. Two builds of the same target compare equal.
#[derive(Clone, Debug, PartialEq)]
pub struct BuiltRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl BuiltRequest {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }
}

/// Turns a target into a [`BuiltRequest`].
///
/// GET requests never carry a body: a `Parameters` task becomes URL query
/// items (coerced per [`ParamValue::query_value`](crate::ParamValue::query_value))
/// and every other task contributes nothing. For any other method the task
/// determines the body: nothing, the raw bytes verbatim, the parameter map as
/// a JSON object (an empty map yields `{}`), or the encoder capability's
/// output. Headers are set exactly from the target's header map.
pub fn build_request<T>(target: &T) -> CourierResult<BuiltRequest>
where
    T: Target + ?Sized,
{
    let method = target.method();
    let task = target.task();
    let mut url = path_appended_url(&target.base_url(), &target.path())?;

    let body = if method == Method::GET {
        if let Task::Parameters(parameters) = &task {
            append_query_parameters(&mut url, parameters);
        }
        None
    } else {
        match task {
            Task::Plain => None,
            Task::Data(bytes) => Some(bytes),
            Task::Parameters(parameters) => Some(parameters_json_body(&parameters)?),
            Task::Encodable(encodable) => {
                let encoded = encodable
                    .encode()
                    .map_err(|source| Error::Encode { source })?;
                Some(Bytes::from(encoded))
            }
        }
    };

    Ok(BuiltRequest {
        method,
        url,
        headers: target.headers().unwrap_or_default(),
        body,
    })
}

/// Appends `path` to `base` as path components, normalizing separators so
/// neither a trailing slash on the base nor a leading slash on the path
/// doubles up. An empty path is a no-op.
fn path_appended_url(base: &Url, path: &str) -> CourierResult<Url> {
    let mut url = base.clone();
    if path.is_empty() {
        return Ok(url);
    }

    {
        let mut segments = url.path_segments_mut().map_err(|()| Error::MalformedUrl {
            url: base.as_str().to_owned(),
        })?;
        segments.pop_if_empty();
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            segments.push(segment);
        }
    }
    Ok(url)
}

fn append_query_parameters(url: &mut Url, parameters: &Parameters) {
    if parameters.is_empty() {
        return;
    }
    let mut pairs = url.query_pairs_mut();
    for (name, value) in parameters {
        pairs.append_pair(name, &value.query_value());
    }
}

fn parameters_json_body(parameters: &Parameters) -> CourierResult<Bytes> {
    serde_json::to_vec(parameters)
        .map(Bytes::from)
        .map_err(|source| Error::Encode {
            source: source.into(),
        })
}
