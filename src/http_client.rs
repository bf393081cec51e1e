//! Transport seam.
//!
//! The adapter never talks to the network directly; it posts through
//! [`HttpClient`], so callers can inject their own transport (pooling,
//! proxies, retry policy all live there). [`ReqwestClient`] is the bundled
//! default.

use std::time::Duration;

use async_trait::async_trait;
use error_stack::{report, ResultExt};

use crate::{
    consts,
    errors::{CustomResult, HttpClientError},
};

/// Synchronous-in-effect POST of a form-urlencoded body, returning the raw
/// response body as text. Implementations surface network failures and
/// unexpected statuses as [`HttpClientError`]; they do not interpret the
/// body.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn post_form(&self, url: &str, body: String) -> CustomResult<String, HttpClientError>;
}

/// Default transport backed by a shared [`reqwest::Client`].
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> CustomResult<Self, HttpClientError> {
        Self::with_timeout(Duration::from_secs(consts::REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> CustomResult<Self, HttpClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .change_context(HttpClientError::ClientConstructionFailed)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn post_form(&self, url: &str, body: String) -> CustomResult<String, HttpClientError> {
        let url = url::Url::parse(url).change_context(HttpClientError::UrlParsingFailed)?;

        let response = self
            .client
            .post(url)
            .header(
                reqwest::header::CONTENT_TYPE,
                consts::CONTENT_TYPE_FORM_URLENCODED,
            )
            .body(body)
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    report!(HttpClientError::RequestTimeout)
                } else {
                    report!(HttpClientError::RequestNotSent(error.to_string()))
                }
            })?;

        let status_code = response.status().as_u16();
        if !response.status().is_success() {
            return Err(report!(HttpClientError::UnexpectedStatus { status_code }));
        }

        response
            .text()
            .await
            .change_context(HttpClientError::ResponseDecodingFailed)
    }
}
