//! Wire and transport constants.

/// Content type for outgoing request bodies.
pub const CONTENT_TYPE_FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Default timeout for the bundled reqwest transport, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Root element of the provider's XML response envelope.
pub const RESPONSE_ROOT_TAG: &str = "Web2PayResult";

/// Separator between transaction id and authorisation code in an encoded
/// authorization token. Fixed wire format, shared across process instances.
pub const AUTHORIZATION_TOKEN_SEPARATOR: char = ';';

/// Currency sent when the caller supplies none.
pub const DEFAULT_CURRENCY: &str = "USD";
