//! Error taxonomy for the gateway adapter.
//!
//! Infrastructure failures (configuration, transport, parsing) travel on the
//! `Result` channel; a provider-declared decline is a normal
//! [`GatewayResult`](crate::types::GatewayResult) with `success == false` and
//! must never be conflated with the errors below.

/// Alias for results carrying an [`error_stack::Report`].
pub type CustomResult<T, E> = error_stack::Result<T, E>;

/// Raised at construction time, before any network activity.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("missing required credential: {field_name}")]
    MissingCredential { field_name: &'static str },
}

/// Failures of the transport collaborator during dispatch.
#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    #[error("invalid request url")]
    UrlParsingFailed,
    #[error("failed to construct http client")]
    ClientConstructionFailed,
    #[error("request timed out")]
    RequestTimeout,
    #[error("failed to send request: {0}")]
    RequestNotSent(String),
    #[error("unexpected response status: {status_code}")]
    UnexpectedStatus { status_code: u16 },
    #[error("failed to read response body")]
    ResponseDecodingFailed,
}

/// Top-level adapter failures surfaced to callers.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("failed to encode request body")]
    RequestEncodingFailed,
    #[error("transport failure")]
    Transport,
    #[error("failed to parse provider response")]
    ResponseParsing,
}
