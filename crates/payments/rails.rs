use async_trait::async_trait;
use tracing::{info, warn};

use super::{
    dto::{MobilePushRequest, PESAPAL_REDIRECT_KEYS, RedirectPaymentRequest},
    errors::PaymentError,
    gateway::PaymentGateway,
    reference::PaymentReference,
};
use crate::domain::value_objects::{
    enums::payment_rails::PaymentRailKind,
    payments::{Msisdn, PaymentIntent, PaymentValidationError},
};

/// Where an accepted submission leaves the attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The payer is being prompted on their phone; poll for the result.
    AwaitingConfirmation,
    /// Send the browser to the provider's checkout page.
    Redirect { url: String },
}

#[async_trait]
pub trait SubmitPayment {
    async fn submit(
        &self,
        gateway: &dyn PaymentGateway,
        intent: &PaymentIntent,
        reference: &PaymentReference,
    ) -> Result<SubmitOutcome, PaymentError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MobilePushRail {
    pub msisdn: Msisdn,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayPalRail;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PesaPalRail {
    pub callback_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rail {
    MobilePush(MobilePushRail),
    PayPalRedirect(PayPalRail),
    PesaPalRedirect(PesaPalRail),
}

impl Rail {
    /// Builds the rail the payer picked. Only the push rail needs a phone
    /// number, and it is validated here, before anything is sent.
    pub fn select(
        kind: PaymentRailKind,
        phone_number: Option<&str>,
        callback_url: Option<String>,
    ) -> Result<Self, PaymentValidationError> {
        Ok(match kind {
            PaymentRailKind::MobilePush => Rail::MobilePush(MobilePushRail {
                msisdn: Msisdn::parse(phone_number)?,
            }),
            PaymentRailKind::PayPal => Rail::PayPalRedirect(PayPalRail),
            PaymentRailKind::PesaPal => Rail::PesaPalRedirect(PesaPalRail { callback_url }),
        })
    }

    pub fn kind(&self) -> PaymentRailKind {
        match self {
            Rail::MobilePush(_) => PaymentRailKind::MobilePush,
            Rail::PayPalRedirect(_) => PaymentRailKind::PayPal,
            Rail::PesaPalRedirect(_) => PaymentRailKind::PesaPal,
        }
    }

    pub async fn submit(
        &self,
        gateway: &dyn PaymentGateway,
        intent: &PaymentIntent,
        reference: &PaymentReference,
    ) -> Result<SubmitOutcome, PaymentError> {
        match self {
            Rail::MobilePush(rail) => rail.submit(gateway, intent, reference).await,
            Rail::PayPalRedirect(rail) => rail.submit(gateway, intent, reference).await,
            Rail::PesaPalRedirect(rail) => rail.submit(gateway, intent, reference).await,
        }
    }
}

fn redirect_request(
    intent: &PaymentIntent,
    reference: &PaymentReference,
    callback_url: Option<String>,
) -> RedirectPaymentRequest {
    RedirectPaymentRequest {
        amount: intent.amount,
        currency: intent.currency.clone(),
        description: intent.description.clone(),
        reference: reference.to_string(),
        callback_url,
    }
}

#[async_trait]
impl SubmitPayment for MobilePushRail {
    async fn submit(
        &self,
        gateway: &dyn PaymentGateway,
        intent: &PaymentIntent,
        reference: &PaymentReference,
    ) -> Result<SubmitOutcome, PaymentError> {
        let request = MobilePushRequest {
            msisdn: self.msisdn.as_str().to_string(),
            amount: intent.amount,
            currency: intent.currency.clone(),
            description: intent.description.clone(),
            reference: reference.to_string(),
        };

        let response = gateway
            .create_mobile_push(request)
            .await
            .map_err(PaymentError::Transport)?;

        if !response.success {
            return Err(PaymentError::rejected(response.message));
        }

        info!(%reference, "payments: mobile money prompt sent");
        Ok(SubmitOutcome::AwaitingConfirmation)
    }
}

#[async_trait]
impl SubmitPayment for PayPalRail {
    async fn submit(
        &self,
        gateway: &dyn PaymentGateway,
        intent: &PaymentIntent,
        reference: &PaymentReference,
    ) -> Result<SubmitOutcome, PaymentError> {
        let response = gateway
            .create_paypal_order(redirect_request(intent, reference, None))
            .await
            .map_err(PaymentError::Transport)?;

        if !response.success {
            return Err(PaymentError::rejected(response.message));
        }

        match response.approval_url() {
            Some(url) => Ok(SubmitOutcome::Redirect {
                url: url.to_string(),
            }),
            None => {
                warn!(
                    %reference,
                    data_keys = ?response.data_keys(),
                    "payments: paypal accepted the order without an approval_url"
                );
                Err(PaymentError::MissingRedirectUrl)
            }
        }
    }
}

#[async_trait]
impl SubmitPayment for PesaPalRail {
    async fn submit(
        &self,
        gateway: &dyn PaymentGateway,
        intent: &PaymentIntent,
        reference: &PaymentReference,
    ) -> Result<SubmitOutcome, PaymentError> {
        let response = gateway
            .create_pesapal_order(redirect_request(
                intent,
                reference,
                self.callback_url.clone(),
            ))
            .await
            .map_err(PaymentError::Transport)?;

        if !response.success {
            return Err(PaymentError::rejected(response.message));
        }

        match response.pesapal_redirect_url() {
            Some(url) => Ok(SubmitOutcome::Redirect {
                url: url.to_string(),
            }),
            None => {
                warn!(
                    %reference,
                    data_keys = ?response.data_keys(),
                    expected_keys = ?PESAPAL_REDIRECT_KEYS,
                    "payments: pesapal response has no recognised redirect field"
                );
                Err(PaymentError::MissingRedirectUrl)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::payments::{dto::RailResponse, gateway::MockPaymentGateway};

    fn intent() -> PaymentIntent {
        PaymentIntent::new(9.99, "USD", "Season pass").unwrap()
    }

    fn reference(kind: PaymentRailKind) -> PaymentReference {
        PaymentReference::generate(kind)
    }

    #[test]
    fn push_rail_rejects_numbers_without_country_code() {
        assert_eq!(
            Rail::select(PaymentRailKind::MobilePush, Some("0700123456"), None),
            Err(PaymentValidationError::MissingCountryCode)
        );
        assert_eq!(
            Rail::select(PaymentRailKind::MobilePush, None, None),
            Err(PaymentValidationError::MissingPhoneNumber)
        );
        assert!(Rail::select(PaymentRailKind::PayPal, None, None).is_ok());
    }

    #[tokio::test]
    async fn push_rejection_carries_the_rail_message() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_mobile_push().times(1).returning(|_| {
            Ok(RailResponse {
                success: false,
                message: Some("Subscriber not registered for mobile money".to_string()),
                data: None,
            })
        });
        let rail = Rail::select(PaymentRailKind::MobilePush, Some("+256700123456"), None).unwrap();

        let err = rail
            .submit(&gateway, &intent(), &reference(PaymentRailKind::MobilePush))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Subscriber not registered for mobile money");
    }

    #[tokio::test]
    async fn paypal_success_without_approval_url_is_not_success() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_paypal_order().times(1).returning(|_| {
            Ok(RailResponse {
                success: true,
                message: None,
                data: Some(json!({ "order_id": "O-1" })),
            })
        });
        let rail = Rail::select(PaymentRailKind::PayPal, None, None).unwrap();

        let err = rail
            .submit(&gateway, &intent(), &reference(PaymentRailKind::PayPal))
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::MissingRedirectUrl));
    }

    #[tokio::test]
    async fn pesapal_redirecturl_alone_still_redirects() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_pesapal_order()
            .withf(|request| {
                request.callback_url.as_deref() == Some("https://luo.example/payments/return")
                    && request.reference.starts_with("PESAPAL_")
            })
            .times(1)
            .returning(|_| {
                Ok(RailResponse {
                    success: true,
                    message: None,
                    data: Some(json!({ "redirecturl": "https://pay.pesapal.example/iframe?x=1" })),
                })
            });
        let rail = Rail::select(
            PaymentRailKind::PesaPal,
            None,
            Some("https://luo.example/payments/return".to_string()),
        )
        .unwrap();

        let outcome = rail
            .submit(&gateway, &intent(), &reference(PaymentRailKind::PesaPal))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::Redirect {
                url: "https://pay.pesapal.example/iframe?x=1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn transport_failure_is_reported_as_such() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_mobile_push()
            .returning(|_| Err(anyhow::anyhow!("connection refused")));
        let rail = Rail::select(PaymentRailKind::MobilePush, Some("+254712345678"), None).unwrap();

        let err = rail
            .submit(&gateway, &intent(), &reference(PaymentRailKind::MobilePush))
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::Transport(_)));
    }
}
