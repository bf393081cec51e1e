//! The Web2Pay gateway adapter.
//!
//! Holds immutable credentials, the configured environment and a transport
//! handle; every operation is an independent request-in/result-out call, so
//! a single adapter may be shared across tasks freely.

use std::sync::Arc;

use error_stack::ResultExt;
use masking::Secret;
use serde::Deserialize;

use crate::{
    errors::{ConfigurationError, CustomResult, GatewayError},
    http_client::HttpClient,
    transformers::{
        Web2PayAuthType, Web2PayCaptureRequest, Web2PayPaymentsRequest, Web2PayResponse,
    },
    types::{CaptureRequest, ChargeRequest, Environment, GatewayResult},
};

/// Construction-time configuration. `login` and `password` are the
/// merchant id and validation code issued by the provider.
#[derive(Clone, Debug, Deserialize)]
pub struct Web2PayConfig {
    pub login: Secret<String>,
    pub password: Secret<String>,
    pub environment: Environment,
}

/// The three provider operations, each with its own endpoint pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
enum Flow {
    Authorize,
    Purchase,
    Capture,
}

/// Fixed provider metadata: (environment, operation) -> URL. Exhaustive by
/// construction; there is no per-call override.
const fn endpoint(environment: Environment, flow: Flow) -> &'static str {
    match (environment, flow) {
        (Environment::Test, Flow::Authorize) => {
            "https://web2payuat.3cint.com/mxg/service/_2011_02_v5_1_0/Authorise.asmx/RequestNoCardRead"
        }
        (Environment::Test, Flow::Purchase) => {
            "https://web2payuat.3cint.com/mxg/service/_2011_02_v5_1_0/Pay.asmx/RequestNoCardRead"
        }
        (Environment::Test, Flow::Capture) => {
            "https://web2payuat.3cint.com/mxg/service/_2011_02_v5_1_0/Capture.asmx/RequestAuthorised"
        }
        (Environment::Live, Flow::Authorize) => {
            "https://web2pay.3cint.com/mxg/service/_2011_02_v5_1_0/Authorise.asmx/RequestNoCardRead"
        }
        (Environment::Live, Flow::Purchase) => {
            "https://web2pay.3cint.com/mxg/service/_2011_02_v5_1_0/Pay.asmx/RequestNoCardRead"
        }
        (Environment::Live, Flow::Capture) => {
            "https://web2pay.3cint.com/mxg/service/_2011_02_v5_1_0/Capture.asmx/RequestAuthorised"
        }
    }
}

/// Gateway adapter for the Web2Pay processing service.
#[derive(Clone)]
pub struct Web2Pay {
    auth: Web2PayAuthType,
    environment: Environment,
    client: Arc<dyn HttpClient>,
}

impl Web2Pay {
    pub const DISPLAY_NAME: &'static str = "Web2Pay";
    pub const HOMEPAGE_URL: &'static str = "https://web2pay.3cint.com/";
    pub const SUPPORTED_COUNTRIES: &'static [&'static str] = &["US"];

    /// Validates credentials before any network activity.
    pub fn new(
        config: &Web2PayConfig,
        client: Arc<dyn HttpClient>,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            auth: Web2PayAuthType::try_from(config)?,
            environment: config.environment,
            client,
        })
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Reserve funds without settling.
    pub async fn authorize(
        &self,
        request: &ChargeRequest,
    ) -> CustomResult<GatewayResult, GatewayError> {
        self.charge(Flow::Authorize, request).await
    }

    /// Authorize and settle in one step.
    pub async fn purchase(
        &self,
        request: &ChargeRequest,
    ) -> CustomResult<GatewayResult, GatewayError> {
        self.charge(Flow::Purchase, request).await
    }

    /// Settle previously authorized funds, referencing the original
    /// authorization token.
    pub async fn capture(
        &self,
        request: &CaptureRequest,
    ) -> CustomResult<GatewayResult, GatewayError> {
        let connector_request = Web2PayCaptureRequest::from((request, &self.auth));
        let body = serde_urlencoded::to_string(&connector_request)
            .change_context(GatewayError::RequestEncodingFailed)?;
        self.commit(Flow::Capture, body).await
    }

    async fn charge(
        &self,
        flow: Flow,
        request: &ChargeRequest,
    ) -> CustomResult<GatewayResult, GatewayError> {
        let connector_request = Web2PayPaymentsRequest::from((request, &self.auth));
        let body = serde_urlencoded::to_string(&connector_request)
            .change_context(GatewayError::RequestEncodingFailed)?;
        self.commit(flow, body).await
    }

    /// Shared dispatch: POST the encoded field set and classify the
    /// response. The body carries credentials and card data and is never
    /// logged.
    async fn commit(&self, flow: Flow, body: String) -> CustomResult<GatewayResult, GatewayError> {
        let url = endpoint(self.environment, flow);
        tracing::debug!(%flow, environment = %self.environment, url, "dispatching request");

        let response_body = self
            .client
            .post_form(url, body)
            .await
            .change_context(GatewayError::Transport)?;

        let response = Web2PayResponse::parse(&response_body)?;
        tracing::debug!(
            %flow,
            return_code = response.return_code.as_deref().unwrap_or(""),
            "provider response classified"
        );

        Ok(GatewayResult::from((response, self.environment)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_differ_per_environment_and_flow() {
        let flows = [Flow::Authorize, Flow::Purchase, Flow::Capture];
        let mut seen = std::collections::HashSet::new();
        for environment in [Environment::Test, Environment::Live] {
            for flow in flows {
                assert!(seen.insert(endpoint(environment, flow)));
            }
        }
        assert_eq!(seen.len(), 6);
        assert!(endpoint(Environment::Test, Flow::Authorize).contains("web2payuat"));
        assert!(!endpoint(Environment::Live, Flow::Authorize).contains("web2payuat"));
        assert!(endpoint(Environment::Live, Flow::Capture).ends_with("RequestAuthorised"));
    }
}
