use std::{collections::HashMap, sync::Arc};

use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use super::{dto::ProviderStatus, errors::PaymentError, gateway::PaymentGateway};
use crate::domain::value_objects::enums::payment_rails::PaymentRailKind;

/// Query keys PayPal has used for the order id on the return URL, in order of preference.
pub const PAYPAL_RETURN_KEYS: [&str; 3] = ["token", "orderId", "order_id"];
pub const PESAPAL_RETURN_KEY: &str = "OrderMerchantReference";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReturnOutcome {
    Confirmed { identifier: String },
    Declined { identifier: String, message: String },
    /// The provider has not settled yet; the payer can check back later.
    Pending { identifier: String },
}

impl ReturnOutcome {
    pub fn identifier(&self) -> &str {
        match self {
            ReturnOutcome::Confirmed { identifier }
            | ReturnOutcome::Declined { identifier, .. }
            | ReturnOutcome::Pending { identifier } => identifier,
        }
    }
}

fn first_present<'a>(query: &'a HashMap<String, String>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| query.get(*key))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
}

/// PayPal order id carried by a return URL's query.
pub fn paypal_return_order_id(query: &HashMap<String, String>) -> Option<&str> {
    first_present(query, &PAYPAL_RETURN_KEYS)
}

/// Attempt reference carried by a PesaPal return URL's query.
pub fn pesapal_return_reference(query: &HashMap<String, String>) -> Option<&str> {
    first_present(query, &[PESAPAL_RETURN_KEY])
}

/// The order id PayPal put on the approval link; the payer returns with the
/// same id, which ties the return to the attempt that created the order.
pub fn paypal_order_id_from_approval_url(approval_url: &str) -> Option<String> {
    let url = Url::parse(approval_url).ok()?;
    let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
    paypal_return_order_id(&query).map(str::to_string)
}

/// Confirms redirect payments once the payer lands back on the site. Each
/// verification makes at most one call.
pub struct RedirectReturnVerifier {
    gateway: Arc<dyn PaymentGateway>,
}

impl RedirectReturnVerifier {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { gateway }
    }

    pub async fn verify(
        &self,
        rail: PaymentRailKind,
        query: &HashMap<String, String>,
    ) -> Result<ReturnOutcome, PaymentError> {
        match rail {
            PaymentRailKind::PayPal => self.verify_paypal(query).await,
            PaymentRailKind::PesaPal => self.verify_pesapal(query).await,
            PaymentRailKind::MobilePush => Err(PaymentError::MissingReturnToken),
        }
    }

    pub async fn verify_paypal(
        &self,
        query: &HashMap<String, String>,
    ) -> Result<ReturnOutcome, PaymentError> {
        let order_id = paypal_return_order_id(query)
            .ok_or(PaymentError::MissingReturnToken)?
            .to_string();

        let verification = self
            .gateway
            .verify_paypal_order(&order_id)
            .await
            .map_err(PaymentError::Transport)?;

        if verification.success {
            info!(%order_id, "payments: paypal order verified");
            Ok(ReturnOutcome::Confirmed {
                identifier: order_id,
            })
        } else {
            let message = PaymentError::rejected(verification.message).to_string();
            warn!(%order_id, %message, "payments: paypal order verification failed");
            Ok(ReturnOutcome::Declined {
                identifier: order_id,
                message,
            })
        }
    }

    pub async fn verify_pesapal(
        &self,
        query: &HashMap<String, String>,
    ) -> Result<ReturnOutcome, PaymentError> {
        let reference = pesapal_return_reference(query)
            .ok_or(PaymentError::MissingReturnToken)?
            .to_string();

        let response = self
            .gateway
            .payment_status(&reference, PaymentRailKind::PesaPal)
            .await
            .map_err(PaymentError::Transport)?;

        Ok(match response.provider_status() {
            ProviderStatus::Completed => {
                info!(%reference, "payments: pesapal payment verified");
                ReturnOutcome::Confirmed {
                    identifier: reference,
                }
            }
            ProviderStatus::Failed => ReturnOutcome::Declined {
                identifier: reference,
                message: PaymentError::rejected(response.message).to_string(),
            },
            _ => ReturnOutcome::Pending {
                identifier: reference,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::payments::{
        dto::{PayPalVerification, StatusResponse},
        gateway::MockPaymentGateway,
    };

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn paypal_token_is_verified_exactly_once() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_verify_paypal_order()
            .withf(|order_id| order_id == "EC-7RX")
            .times(1)
            .returning(|_| {
                Ok(PayPalVerification {
                    success: true,
                    ..Default::default()
                })
            });
        let verifier = RedirectReturnVerifier::new(Arc::new(gateway));

        let outcome = verifier
            .verify_paypal(&query(&[("token", "EC-7RX"), ("orderId", "other")]))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ReturnOutcome::Confirmed {
                identifier: "EC-7RX".to_string()
            }
        );
    }

    #[tokio::test]
    async fn paypal_falls_back_to_order_id_keys() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_verify_paypal_order()
            .withf(|order_id| order_id == "O-55")
            .times(1)
            .returning(|_| {
                Ok(PayPalVerification {
                    success: false,
                    message: Some("Order already captured".to_string()),
                    data: None,
                })
            });
        let verifier = RedirectReturnVerifier::new(Arc::new(gateway));

        let outcome = verifier
            .verify_paypal(&query(&[("token", " "), ("order_id", "O-55")]))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ReturnOutcome::Declined {
                identifier: "O-55".to_string(),
                message: "Order already captured".to_string()
            }
        );
    }

    #[tokio::test]
    async fn missing_identifier_makes_no_call() {
        let verifier = RedirectReturnVerifier::new(Arc::new(MockPaymentGateway::new()));

        let paypal = verifier.verify_paypal(&query(&[("PayerID", "X")])).await;
        let pesapal = verifier.verify_pesapal(&query(&[])).await;

        assert!(matches!(paypal, Err(PaymentError::MissingReturnToken)));
        assert!(matches!(pesapal, Err(PaymentError::MissingReturnToken)));
    }

    #[tokio::test]
    async fn pesapal_return_checks_status_once() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_payment_status()
            .withf(|reference, rail| {
                reference == "PESAPAL_1_abc" && *rail == PaymentRailKind::PesaPal
            })
            .times(1)
            .returning(|_, _| {
                Ok(serde_json::from_value::<StatusResponse>(
                    json!({ "success": true, "data": { "status": "pending" } }),
                )
                .unwrap())
            });
        let verifier = RedirectReturnVerifier::new(Arc::new(gateway));

        let outcome = verifier
            .verify(
                PaymentRailKind::PesaPal,
                &query(&[
                    ("OrderTrackingId", "b945e4af"),
                    ("OrderMerchantReference", "PESAPAL_1_abc"),
                ]),
            )
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ReturnOutcome::Pending {
                identifier: "PESAPAL_1_abc".to_string()
            }
        );
    }

    #[test]
    fn approval_link_names_the_paypal_order() {
        assert_eq!(
            paypal_order_id_from_approval_url(
                "https://www.sandbox.paypal.com/checkoutnow?token=5O190127TN364715T"
            )
            .as_deref(),
            Some("5O190127TN364715T")
        );
        assert_eq!(
            paypal_order_id_from_approval_url("https://www.paypal.com/checkoutnow"),
            None
        );
        assert_eq!(paypal_order_id_from_approval_url("not a url"), None);
    }
}
