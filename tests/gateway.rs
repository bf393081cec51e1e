//! End-to-end adapter tests against a scripted transport.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use error_stack::report;
use masking::Secret;
use web2pay_gateway::{
    errors::{CustomResult, GatewayError, HttpClientError},
    AuthorizationToken, Card, CaptureRequest, ChargeRequest, Environment, HttpClient, MinorUnit,
    Web2Pay, Web2PayConfig,
};

/// Records the dispatched (url, body) pair and replays a canned response.
struct MockClient {
    response: Result<String, HttpClientError>,
    requests: Mutex<Vec<(String, String)>>,
}

impl MockClient {
    fn respond_with(body: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(body.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn fail_with(error: HttpClientError) -> Arc<Self> {
        Arc::new(Self {
            response: Err(error),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn last_request(&self) -> (String, String) {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request dispatched")
    }
}

#[async_trait]
impl HttpClient for MockClient {
    async fn post_form(&self, url: &str, body: String) -> CustomResult<String, HttpClientError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), body));
        match &self.response {
            Ok(body) => Ok(body.clone()),
            Err(HttpClientError::UnexpectedStatus { status_code }) => Err(report!(
                HttpClientError::UnexpectedStatus {
                    status_code: *status_code,
                }
            )),
            Err(HttpClientError::RequestTimeout) => Err(report!(HttpClientError::RequestTimeout)),
            Err(other) => Err(report!(HttpClientError::RequestNotSent(other.to_string()))),
        }
    }
}

fn config(environment: Environment) -> Web2PayConfig {
    Web2PayConfig {
        login: Secret::new("LOGIN".to_string()),
        password: Secret::new("Pass".to_string()),
        environment,
    }
}

fn charge_request() -> ChargeRequest {
    ChargeRequest {
        amount: MinorUnit::new(100),
        currency: Some("USD".to_string()),
        card: Card {
            number: Secret::new("4242424242424242".to_string()),
            expiry_month: 3,
            expiry_year: 25,
            cvv: Secret::new("123".to_string()),
            holder_first_name: Secret::new("Jim".to_string()),
            holder_last_name: Secret::new("Smith".to_string()),
        },
        billing_address: None,
        order_reference: Some("order-1".to_string()),
        return_url: None,
        user_data: Default::default(),
        card_issue_date: None,
        card_issue_number: None,
        option_flags: None,
    }
}

const APPROVED: &str = "<Web2PayResult><ReturnCode>0</ReturnCode><ReturnText>OK</ReturnText>\
                        <TxID>abc</TxID><AuthorisationCode>123</AuthorisationCode></Web2PayResult>";

#[tokio::test]
async fn successful_authorize_round_trip() {
    let client = MockClient::respond_with(APPROVED);
    let gateway = Web2Pay::new(&config(Environment::Test), client.clone()).unwrap();

    let result = gateway.authorize(&charge_request()).await.unwrap();
    assert!(result.success);
    assert_eq!(result.message, "OK");
    assert_eq!(result.authorization, AuthorizationToken::new("abc", "123"));
    assert!(result.is_test());
    assert_eq!(result.fields.get("tx_id").map(String::as_str), Some("abc"));

    let (url, body) = client.last_request();
    assert!(url.contains("web2payuat"));
    assert!(url.contains("Authorise.asmx"));
    assert!(body.starts_with("Amount=1.00&Currency=USD&CardNumber=4242424242424242"));
    assert!(body.ends_with("eMerchantID=LOGIN&ValidationCode=Pass"));
}

#[tokio::test]
async fn purchase_hits_the_pay_endpoint() {
    let client = MockClient::respond_with(APPROVED);
    let gateway = Web2Pay::new(&config(Environment::Live), client.clone()).unwrap();

    let result = gateway.purchase(&charge_request()).await.unwrap();
    assert!(result.success);
    assert!(!result.is_test());

    let (url, _) = client.last_request();
    assert!(url.starts_with("https://web2pay.3cint.com/"));
    assert!(url.contains("Pay.asmx"));
}

#[tokio::test]
async fn decline_is_a_result_not_an_error() {
    let client = MockClient::respond_with(
        "<Web2PayResult><ReturnCode>05</ReturnCode>\
         <ReturnText>Do not honour</ReturnText></Web2PayResult>",
    );
    let gateway = Web2Pay::new(&config(Environment::Test), client).unwrap();

    let result = gateway.authorize(&charge_request()).await.unwrap();
    assert!(!result.success);
    assert_eq!(result.message, "Do not honour");
    assert!(result.authorization.is_empty());
}

#[tokio::test]
async fn capture_sends_the_decoded_token() {
    let client = MockClient::respond_with(APPROVED);
    let gateway = Web2Pay::new(&config(Environment::Test), client.clone()).unwrap();

    let request = CaptureRequest {
        amount: MinorUnit::new(100),
        currency: Some("USD".to_string()),
        authorization: AuthorizationToken::new("abc", "123"),
        option_flags: None,
    };
    let result = gateway.capture(&request).await.unwrap();
    assert!(result.success);

    let (url, body) = client.last_request();
    assert!(url.contains("Capture.asmx"));
    assert!(body.contains("TxID=abc&AuthorisationCode=123"));
    assert!(!body.contains("CardNumber"));
}

#[tokio::test]
async fn capture_with_empty_token_is_passed_through() {
    // The provider, not the adapter, rejects a blank authorization.
    let client = MockClient::respond_with(
        "<Web2PayResult><ReturnCode>2</ReturnCode>\
         <ReturnText>Unknown transaction</ReturnText></Web2PayResult>",
    );
    let gateway = Web2Pay::new(&config(Environment::Test), client.clone()).unwrap();

    let request = CaptureRequest {
        amount: MinorUnit::new(100),
        currency: None,
        authorization: AuthorizationToken::empty(),
        option_flags: None,
    };
    let result = gateway.capture(&request).await.unwrap();
    assert!(!result.success);

    let (_, body) = client.last_request();
    assert!(body.contains("TxID=&AuthorisationCode=&"));
}

#[tokio::test]
async fn transport_failure_surfaces_as_transport_error() {
    let client = MockClient::fail_with(HttpClientError::UnexpectedStatus { status_code: 503 });
    let gateway = Web2Pay::new(&config(Environment::Test), client).unwrap();

    let error = gateway.authorize(&charge_request()).await.unwrap_err();
    assert!(matches!(
        error.current_context(),
        GatewayError::Transport
    ));
}

#[tokio::test]
async fn malformed_response_surfaces_as_parse_error() {
    let client = MockClient::respond_with("<Web2PayResult><ReturnCode>0");
    let gateway = Web2Pay::new(&config(Environment::Test), client).unwrap();

    let error = gateway.authorize(&charge_request()).await.unwrap_err();
    assert!(matches!(
        error.current_context(),
        GatewayError::ResponseParsing
    ));
}

#[tokio::test]
async fn empty_envelope_classifies_as_failure_with_empty_message() {
    let client = MockClient::respond_with("<Unrelated/>");
    let gateway = Web2Pay::new(&config(Environment::Test), client).unwrap();

    let result = gateway.authorize(&charge_request()).await.unwrap();
    assert!(!result.success);
    assert_eq!(result.message, "");
    assert!(result.fields.is_empty());
}

#[test]
fn blank_credentials_fail_at_construction() {
    let client = MockClient::respond_with(APPROVED);
    let mut bad = config(Environment::Test);
    bad.login = Secret::new(String::new());
    assert!(Web2Pay::new(&bad, client).is_err());
}
