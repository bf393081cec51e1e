//! Wire-format mapping for the Web2Pay service.
//!
//! Requests are typed structs with the provider's field names attached via
//! serde renames and are only flattened to `key=value` pairs at
//! serialization time. Responses come back as an XML envelope whose children
//! are scalar fields; known fields project into [`Web2PayResponse`], unknown
//! ones are retained in the pass-through map.

use std::collections::HashMap;

use error_stack::ResultExt;
use masking::{PeekInterface, Secret};
use serde::Serialize;

use crate::{
    consts,
    errors::{ConfigurationError, CustomResult, GatewayError},
    gateway::Web2PayConfig,
    types::{AuthorizationToken, AvsResult, Card, CaptureRequest, ChargeRequest, Environment, GatewayResult},
};

/// Validated merchant credentials attached to every outgoing field set.
#[derive(Clone, Debug)]
pub struct Web2PayAuthType {
    pub(crate) e_merchant_id: Secret<String>,
    pub(crate) validation_code: Secret<String>,
}

impl TryFrom<&Web2PayConfig> for Web2PayAuthType {
    type Error = ConfigurationError;

    fn try_from(config: &Web2PayConfig) -> Result<Self, Self::Error> {
        if config.login.peek().is_empty() {
            return Err(ConfigurationError::MissingCredential {
                field_name: "login",
            });
        }
        if config.password.peek().is_empty() {
            return Err(ConfigurationError::MissingCredential {
                field_name: "password",
            });
        }
        Ok(Self {
            e_merchant_id: config.login.clone(),
            validation_code: config.password.clone(),
        })
    }
}

/// Expiry as two-digit year followed by two-digit month, zero-padded.
fn expiry_yymm(card: &Card) -> Secret<String> {
    Secret::new(format!(
        "{:02}{:02}",
        card.expiry_year % 100,
        card.expiry_month
    ))
}

fn charge_currency(currency: &Option<String>) -> String {
    currency
        .clone()
        .unwrap_or_else(|| consts::DEFAULT_CURRENCY.to_string())
}

/// Authorize/Purchase request body. Field order is declaration order and is
/// part of the adapter's deterministic output; credentials go last.
#[derive(Debug, Serialize)]
pub struct Web2PayPaymentsRequest {
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "CardNumber")]
    card_number: Secret<String>,
    #[serde(rename = "CardExpiryYYMM")]
    card_expiry_yymm: Secret<String>,
    #[serde(rename = "CardCvv2")]
    card_cvv2: Secret<String>,
    #[serde(rename = "CardHolderFirstName")]
    card_holder_first_name: Secret<String>,
    #[serde(rename = "CardHolderLastName")]
    card_holder_last_name: Secret<String>,
    #[serde(rename = "CardHolderAddress1", skip_serializing_if = "Option::is_none")]
    card_holder_address1: Option<String>,
    #[serde(rename = "CardHolderCity", skip_serializing_if = "Option::is_none")]
    card_holder_city: Option<String>,
    #[serde(rename = "CardHolderState", skip_serializing_if = "Option::is_none")]
    card_holder_state: Option<String>,
    #[serde(rename = "CardHolderPostalCode", skip_serializing_if = "Option::is_none")]
    card_holder_postal_code: Option<String>,
    #[serde(rename = "CardIssueYYMM", skip_serializing_if = "Option::is_none")]
    card_issue_yymm: Option<String>,
    #[serde(rename = "CardIssueNo", skip_serializing_if = "Option::is_none")]
    card_issue_no: Option<String>,
    #[serde(rename = "MerchantRef", skip_serializing_if = "Option::is_none")]
    merchant_ref: Option<String>,
    #[serde(rename = "PaymentOkURL", skip_serializing_if = "Option::is_none")]
    payment_ok_url: Option<String>,
    #[serde(rename = "UserData1", skip_serializing_if = "Option::is_none")]
    user_data_1: Option<String>,
    #[serde(rename = "UserData2", skip_serializing_if = "Option::is_none")]
    user_data_2: Option<String>,
    #[serde(rename = "UserData3", skip_serializing_if = "Option::is_none")]
    user_data_3: Option<String>,
    #[serde(rename = "UserData4", skip_serializing_if = "Option::is_none")]
    user_data_4: Option<String>,
    #[serde(rename = "UserData5", skip_serializing_if = "Option::is_none")]
    user_data_5: Option<String>,
    #[serde(rename = "OptionFlags", skip_serializing_if = "Option::is_none")]
    option_flags: Option<String>,
    #[serde(rename = "eMerchantID")]
    e_merchant_id: Secret<String>,
    #[serde(rename = "ValidationCode")]
    validation_code: Secret<String>,
}

impl From<(&ChargeRequest, &Web2PayAuthType)> for Web2PayPaymentsRequest {
    fn from((request, auth): (&ChargeRequest, &Web2PayAuthType)) -> Self {
        let address = request.billing_address.as_ref();
        let [user_data_1, user_data_2, user_data_3, user_data_4, user_data_5] =
            request.user_data.clone();

        Self {
            amount: request.amount.to_major_unit_as_string(),
            currency: charge_currency(&request.currency),
            card_number: request.card.number.clone(),
            card_expiry_yymm: expiry_yymm(&request.card),
            card_cvv2: request.card.cvv.clone(),
            card_holder_first_name: request.card.holder_first_name.clone(),
            card_holder_last_name: request.card.holder_last_name.clone(),
            card_holder_address1: address.and_then(|a| a.line1.clone()),
            card_holder_city: address.and_then(|a| a.city.clone()),
            card_holder_state: address.and_then(|a| a.state.clone()),
            card_holder_postal_code: address.and_then(|a| a.postal_code.clone()),
            card_issue_yymm: request.card_issue_date.clone(),
            card_issue_no: request.card_issue_number.clone(),
            merchant_ref: request.order_reference.clone(),
            payment_ok_url: request.return_url.clone(),
            user_data_1,
            user_data_2,
            user_data_3,
            user_data_4,
            user_data_5,
            option_flags: request.option_flags.clone(),
            e_merchant_id: auth.e_merchant_id.clone(),
            validation_code: auth.validation_code.clone(),
        }
    }
}

/// Capture request body. The token's parts are sent even when empty: a
/// malformed token is the provider's to reject, not the adapter's.
#[derive(Debug, Serialize)]
pub struct Web2PayCaptureRequest {
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "TxID")]
    tx_id: String,
    #[serde(rename = "AuthorisationCode")]
    authorisation_code: String,
    #[serde(rename = "OptionFlags", skip_serializing_if = "Option::is_none")]
    option_flags: Option<String>,
    #[serde(rename = "eMerchantID")]
    e_merchant_id: Secret<String>,
    #[serde(rename = "ValidationCode")]
    validation_code: Secret<String>,
}

impl From<(&CaptureRequest, &Web2PayAuthType)> for Web2PayCaptureRequest {
    fn from((request, auth): (&CaptureRequest, &Web2PayAuthType)) -> Self {
        let (tx_id, authorisation_code) = request.authorization.decode();

        Self {
            amount: request.amount.to_major_unit_as_string(),
            currency: charge_currency(&request.currency),
            tx_id,
            authorisation_code,
            option_flags: request.option_flags.clone(),
            e_merchant_id: auth.e_merchant_id.clone(),
            validation_code: auth.validation_code.clone(),
        }
    }
}

/// PascalCase provider tag to lower_snake_case key ("TxID" -> "tx_id",
/// "Cvv2ResultCode" -> "cvv2_result_code").
fn normalize_tag(tag: &str) -> String {
    let chars: Vec<char> = tag.chars().collect();
    let mut out = String::with_capacity(tag.len() + 4);

    for (index, &ch) in chars.iter().enumerate() {
        if ch.is_ascii_uppercase() && index > 0 {
            let prev = chars[index - 1];
            let next_is_lower = chars
                .get(index + 1)
                .is_some_and(|next| next.is_ascii_lowercase());
            if prev.is_ascii_lowercase() || prev.is_ascii_digit() || (prev.is_ascii_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.push(ch.to_ascii_lowercase());
    }

    out
}

/// Parsed provider response. Known fields are typed; `fields` keeps the
/// complete normalized mapping, unknown entries included.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Web2PayResponse {
    pub return_code: Option<String>,
    pub return_text: Option<String>,
    pub tx_id: Option<String>,
    pub authorisation_code: Option<String>,
    pub cvv2_result_code: Option<String>,
    pub avs_result_code: Option<String>,
    pub fields: HashMap<String, String>,
}

impl Web2PayResponse {
    /// Parse the XML envelope.
    ///
    /// A well-formed body without the expected root yields the empty
    /// response (a provider-level failure once classified); markup that is
    /// not well formed is a parse error.
    pub fn parse(body: &str) -> CustomResult<Self, GatewayError> {
        let document =
            roxmltree::Document::parse(body).change_context(GatewayError::ResponseParsing)?;

        let mut fields = HashMap::new();
        if let Some(root) = document
            .descendants()
            .find(|node| node.has_tag_name(consts::RESPONSE_ROOT_TAG))
        {
            for child in root.children().filter(|node| node.is_element()) {
                fields.insert(
                    normalize_tag(child.tag_name().name()),
                    child.text().unwrap_or("").trim().to_string(),
                );
            }
        }

        Ok(Self {
            return_code: fields.get("return_code").cloned(),
            return_text: fields.get("return_text").cloned(),
            tx_id: fields.get("tx_id").cloned(),
            authorisation_code: fields.get("authorisation_code").cloned(),
            cvv2_result_code: fields.get("cvv2_result_code").cloned(),
            avs_result_code: fields.get("avs_result_code").cloned(),
            fields,
        })
    }

    /// Token for a later capture; empty unless both parts came back
    /// non-empty.
    fn authorization_token(&self) -> AuthorizationToken {
        match (self.tx_id.as_deref(), self.authorisation_code.as_deref()) {
            (Some(tx_id), Some(code)) if !tx_id.is_empty() && !code.is_empty() => {
                AuthorizationToken::new(tx_id, code)
            }
            _ => AuthorizationToken::empty(),
        }
    }
}

impl From<(Web2PayResponse, Environment)> for GatewayResult {
    fn from((response, environment): (Web2PayResponse, Environment)) -> Self {
        Self {
            success: response.return_code.as_deref() == Some("0"),
            message: response.return_text.clone().unwrap_or_default(),
            authorization: response.authorization_token(),
            cvv_result: response.cvv2_result_code.clone(),
            avs_result: AvsResult {
                code: response.avs_result_code.clone(),
            },
            environment,
            fields: response.fields,
        }
    }
}
