use http::StatusCode;

use crate::CourierResult;
use crate::codec::ResponseDecoder;
use crate::error::Error;
use crate::transport::RawResponse;

const MAX_ERROR_BODY_LEN: usize = 2048;

/// Maps a buffered transport response into the caller-requested type or a
/// classified error.
///
/// A status that is not a representable HTTP status maps to
/// [`Error::InvalidServerResponse`]. A representable status outside
/// `[200, 300)` maps to [`Error::InvalidResponse`] without the decoder ever
/// running. On a success status the decoder capability produces the value,
/// and its failure maps to [`Error::InvalidData`].
pub fn map_response<T, D>(response: RawResponse, decoder: &D) -> CourierResult<T>
where
    T: serde::de::DeserializeOwned,
    D: ResponseDecoder + ?Sized,
{
    let Ok(status) = StatusCode::from_u16(response.status()) else {
        return Err(Error::InvalidServerResponse {
            status: response.status(),
        });
    };

    if !status.is_success() {
        return Err(Error::InvalidResponse {
            status: status.as_u16(),
            body: truncate_body(response.body()),
        });
    }

    decoder
        .decode(response.body())
        .map_err(|source| Error::InvalidData {
            source,
            body: truncate_body(response.body()),
        })
}

/// Lossy, bounded rendering of a response body for diagnostics inside error
/// values. Never used for decoding.
pub(crate) fn truncate_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.chars().count() <= MAX_ERROR_BODY_LEN {
        return text.into_owned();
    }

    let truncated: String = text.chars().take(MAX_ERROR_BODY_LEN).collect();
    format!("{truncated}...(truncated)")
}
