use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::prompt::sanitize::clean_code_snippet;

/// Attempts per fetch invocation; each attempt carries its own timeout.
pub const FETCH_ATTEMPTS: u32 = 3;

const QUOTE_TIMEOUT: Duration = Duration::from_millis(1200);
const CODE_TIMEOUT: Duration = Duration::from_millis(1500);
#[cfg(feature = "network")]
const MAX_BODY_BYTES: u64 = 1 << 20;

/// One attempt's failure. None of these reach the user: they are recorded as
/// the invocation's last error and the retry loop keeps going.
#[derive(Clone, Debug, Error)]
pub enum FetchError {
    #[error("endpoint not configured")]
    EndpointUnconfigured,
    #[error("request failed: {0}")]
    Network(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("failed to read response body: {0}")]
    Body(String),
    #[error("invalid payload: {0}")]
    Parse(String),
    #[error("payload had no usable text")]
    EmptyPayload,
    #[cfg(not(feature = "network"))]
    #[error("built without the network feature")]
    NetworkDisabled,
}

/// Why a whole invocation came up empty. Only `Error` trips the backoff
/// gate: a run of successful attempts that all matched `previous` is not a
/// source failure, just bad luck worth a fallback.
#[derive(Debug)]
pub enum FetchFailure {
    Error(FetchError),
    RepeatsOnly,
}

/// Run `attempt` up to `attempts` times, returning the first success whose
/// content differs from `previous`. A success equal to `previous` silently
/// consumes an attempt and the loop keeps seeking a different value.
pub fn fetch_with_retries<F>(
    attempts: u32,
    previous: &str,
    mut attempt: F,
) -> Result<String, FetchFailure>
where
    F: FnMut() -> Result<String, FetchError>,
{
    let mut last_error = None;
    for _ in 0..attempts {
        match attempt() {
            Ok(content) if content != previous => return Ok(content),
            Ok(_) => {}
            Err(err) => last_error = Some(err),
        }
    }
    Err(match last_error {
        Some(err) => FetchFailure::Error(err),
        None => FetchFailure::RepeatsOnly,
    })
}

#[derive(Deserialize)]
struct QuotePayload {
    content: Option<String>,
    quote: Option<String>,
    text: Option<String>,
}

#[derive(Deserialize)]
struct CodePayload {
    content: Option<String>,
    code: Option<String>,
    text: Option<String>,
}

/// HTTP side of the prompt pipeline: endpoints plus per-attempt request
/// logic. Cheap to clone so fetch invocations can move onto a worker thread.
#[derive(Clone, Debug)]
pub struct RemoteSource {
    pub quote_endpoint: String,
    pub code_endpoint: String,
}

impl RemoteSource {
    pub fn new(quote_endpoint: String, code_endpoint: String) -> Self {
        Self {
            quote_endpoint,
            code_endpoint,
        }
    }

    pub fn fetch_quote(&self, previous: &str) -> Result<String, FetchFailure> {
        fetch_with_retries(FETCH_ATTEMPTS, previous, || self.quote_attempt())
    }

    pub fn fetch_code(&self, previous: &str) -> Result<String, FetchFailure> {
        fetch_with_retries(FETCH_ATTEMPTS, previous, || self.code_attempt())
    }

    fn quote_attempt(&self) -> Result<String, FetchError> {
        if self.quote_endpoint.trim().is_empty() {
            return Err(FetchError::EndpointUnconfigured);
        }
        let body = http_get(&self.quote_endpoint, "application/json", QUOTE_TIMEOUT)?;
        let payload: QuotePayload =
            serde_json::from_str(&body).map_err(|err| FetchError::Parse(err.to_string()))?;
        for field in [payload.content, payload.quote, payload.text] {
            if let Some(text) = field {
                let text = text.trim();
                if !text.is_empty() {
                    return Ok(nfc(text));
                }
            }
        }
        Err(FetchError::EmptyPayload)
    }

    fn code_attempt(&self) -> Result<String, FetchError> {
        if self.code_endpoint.trim().is_empty() {
            return Err(FetchError::EndpointUnconfigured);
        }
        let body = http_get(
            &self.code_endpoint,
            "application/json, text/plain;q=0.9",
            CODE_TIMEOUT,
        )?;
        if let Ok(payload) = serde_json::from_str::<CodePayload>(&body) {
            for field in [payload.content, payload.code, payload.text]
                .into_iter()
                .flatten()
            {
                let cleaned = clean_code_snippet(&field);
                if !cleaned.is_empty() {
                    return Ok(nfc(&cleaned));
                }
            }
        }
        // Not JSON, or no usable field: sanitize the raw body as plain text.
        let cleaned = clean_code_snippet(&body);
        if cleaned.is_empty() {
            return Err(FetchError::EmptyPayload);
        }
        Ok(nfc(&cleaned))
    }
}

/// Remote payloads can arrive in decomposed form, which would break
/// char-by-char matching against keyboard input.
fn nfc(text: &str) -> String {
    icu_normalizer::ComposingNormalizer::new_nfc().normalize(text).into_owned()
}

#[cfg(feature = "network")]
fn http_get(url: &str, accept: &str, timeout: Duration) -> Result<String, FetchError> {
    use std::io::Read;

    let client = reqwest::blocking::Client::builder()
        .build()
        .map_err(|err| FetchError::Network(err.to_string()))?;
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, accept)
        .timeout(timeout)
        .send()
        .map_err(|err| FetchError::Network(err.to_string()))?;
    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(FetchError::Status(status.as_u16()));
    }
    let mut body = String::new();
    response
        .take(MAX_BODY_BYTES)
        .read_to_string(&mut body)
        .map_err(|err| FetchError::Body(err.to_string()))?;
    Ok(body)
}

#[cfg(not(feature = "network"))]
fn http_get(_url: &str, _accept: &str, _timeout: Duration) -> Result<String, FetchError> {
    Err(FetchError::NetworkDisabled)
}
