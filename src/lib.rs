//! Payment gateway connector for the Web2Pay (3C Integra) processing
//! service.
//!
//! Three operations — authorize, purchase, capture — over the provider's
//! form-urlencoded request / XML response protocol. Transport is injected
//! behind [`http_client::HttpClient`]; a reqwest-backed default is bundled.
//!
//! A provider decline is a normal [`types::GatewayResult`] with
//! `success == false`; only infrastructure failures (configuration,
//! transport, response parsing) surface as errors.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use masking::Secret;
//! use web2pay_gateway::{
//!     gateway::{Web2Pay, Web2PayConfig},
//!     http_client::ReqwestClient,
//!     types::{Card, ChargeRequest, Environment, MinorUnit},
//! };
//!
//! # async fn run() {
//! let config = Web2PayConfig {
//!     login: Secret::new("merchant-id".to_string()),
//!     password: Secret::new("validation-code".to_string()),
//!     environment: Environment::Test,
//! };
//! let client = Arc::new(ReqwestClient::new().expect("client construction"));
//! let gateway = Web2Pay::new(&config, client).expect("valid credentials");
//!
//! let request = ChargeRequest {
//!     amount: MinorUnit::new(100),
//!     currency: Some("USD".to_string()),
//!     card: Card {
//!         number: Secret::new("4242424242424242".to_string()),
//!         expiry_month: 3,
//!         expiry_year: 25,
//!         cvv: Secret::new("123".to_string()),
//!         holder_first_name: Secret::new("Jim".to_string()),
//!         holder_last_name: Secret::new("Smith".to_string()),
//!     },
//!     billing_address: None,
//!     order_reference: Some("order-1".to_string()),
//!     return_url: None,
//!     user_data: Default::default(),
//!     card_issue_date: None,
//!     card_issue_number: None,
//!     option_flags: None,
//! };
//!
//! let result = gateway.authorize(&request).await.expect("transport");
//! if result.success {
//!     // keep result.authorization for a later capture
//! }
//! # }
//! ```

pub mod consts;
pub mod errors;
pub mod gateway;
pub mod http_client;
pub mod transformers;
pub mod types;

pub use gateway::{Web2Pay, Web2PayConfig};
pub use http_client::{HttpClient, ReqwestClient};
pub use types::{
    AuthorizationToken, AvsResult, BillingAddress, Card, CaptureRequest, ChargeRequest,
    Environment, GatewayResult, MinorUnit,
};
