//! Domain value objects for the gateway adapter.
//!
//! Everything here is request-scoped: built per call, discarded once the
//! [`GatewayResult`] is returned. Cardholder data is wrapped in
//! [`masking::Secret`] so it cannot leak through `Debug` or logs.

use std::collections::HashMap;
use std::fmt;

use masking::Secret;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::consts;

/// Amount in the minor unit of its currency (e.g. cents).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Hash, Serialize, Deserialize)]
pub struct MinorUnit(i64);

impl MinorUnit {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get_amount_as_i64(&self) -> i64 {
        self.0
    }

    /// Major-unit string with two decimal places, the provider's amount
    /// convention (100 -> "1.00", 712 -> "7.12").
    pub fn to_major_unit_as_string(&self) -> String {
        Decimal::new(self.0, 2).to_string()
    }
}

impl fmt::Display for MinorUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which endpoint set the adapter talks to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    Test,
    Live,
}

impl Environment {
    pub fn is_test(&self) -> bool {
        matches!(self, Self::Test)
    }
}

/// Already-validated card data supplied by the caller.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Card {
    pub number: Secret<String>,
    pub expiry_month: u8,
    pub expiry_year: u16,
    pub cvv: Secret<String>,
    pub holder_first_name: Secret<String>,
    pub holder_last_name: Secret<String>,
}

/// Billing address for AVS checks. Every field is independently optional;
/// absent fields are omitted from the wire entirely.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BillingAddress {
    pub line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

/// Input to [`authorize`](crate::gateway::Web2Pay::authorize) and
/// [`purchase`](crate::gateway::Web2Pay::purchase).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChargeRequest {
    pub amount: MinorUnit,
    /// Explicit currency override; defaults to the provider's default
    /// currency when absent.
    pub currency: Option<String>,
    pub card: Card,
    pub billing_address: Option<BillingAddress>,
    /// Merchant-side order reference.
    pub order_reference: Option<String>,
    /// URL the provider redirects to after a hosted-page payment.
    pub return_url: Option<String>,
    /// Five opaque user-data slots, each independently optional.
    pub user_data: [Option<String>; 5],
    /// Card issue date as YYMM, for cards that carry one.
    pub card_issue_date: Option<String>,
    pub card_issue_number: Option<String>,
    pub option_flags: Option<String>,
}

/// Input to [`capture`](crate::gateway::Web2Pay::capture). No card data;
/// the prior authorization token identifies the transaction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaptureRequest {
    pub amount: MinorUnit,
    pub currency: Option<String>,
    pub authorization: AuthorizationToken,
    pub option_flags: Option<String>,
}

/// Composite of transaction id and authorisation code, encoded as
/// `"{tx_id};{authorisation_code}"`.
///
/// The empty token marks a response that carried no usable authorization;
/// capturing with it is passed through to the provider, which declines.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizationToken(String);

impl AuthorizationToken {
    pub fn new(tx_id: &str, authorisation_code: &str) -> Self {
        Self(format!(
            "{tx_id}{}{authorisation_code}",
            consts::AUTHORIZATION_TOKEN_SEPARATOR
        ))
    }

    pub const fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Split back into `(tx_id, authorisation_code)`.
    ///
    /// A token without the separator decodes to `(whole, "")`, the empty
    /// token to `("", "")`. No validation happens here; malformed tokens
    /// become empty provider fields and a provider-side decline.
    pub fn decode(&self) -> (String, String) {
        match self.0.split_once(consts::AUTHORIZATION_TOKEN_SEPARATOR) {
            Some((tx_id, code)) => (tx_id.to_string(), code.to_string()),
            None => (self.0.clone(), String::new()),
        }
    }
}

impl fmt::Display for AuthorizationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for AuthorizationToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Address Verification Service outcome, passed through verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvsResult {
    pub code: Option<String>,
}

/// Generic outcome of an operation.
///
/// `success` is the business outcome; infrastructure failures never reach
/// this type. `fields` is the raw provider response, pass-through for
/// forward compatibility.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayResult {
    pub success: bool,
    pub message: String,
    pub fields: HashMap<String, String>,
    pub authorization: AuthorizationToken,
    pub cvv_result: Option<String>,
    pub avs_result: AvsResult,
    pub environment: Environment,
}

impl GatewayResult {
    pub fn is_test(&self) -> bool {
        self.environment.is_test()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minor_unit_formats_major_unit_with_two_decimals() {
        assert_eq!(MinorUnit::new(100).to_major_unit_as_string(), "1.00");
        assert_eq!(MinorUnit::new(712).to_major_unit_as_string(), "7.12");
        assert_eq!(MinorUnit::new(5).to_major_unit_as_string(), "0.05");
        assert_eq!(MinorUnit::new(150000).to_major_unit_as_string(), "1500.00");
    }

    #[test]
    fn authorization_token_round_trips() {
        let token = AuthorizationToken::new("abc", "123");
        assert_eq!(token.to_string(), "abc;123");
        assert_eq!(token.decode(), ("abc".to_string(), "123".to_string()));
    }

    #[test]
    fn empty_token_decodes_to_empty_parts() {
        let token = AuthorizationToken::empty();
        assert!(token.is_empty());
        assert_eq!(token.decode(), (String::new(), String::new()));
    }

    #[test]
    fn token_without_separator_keeps_tx_id_only() {
        let token = AuthorizationToken::from("abc".to_string());
        assert_eq!(token.decode(), ("abc".to_string(), String::new()));
    }
}
