use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use super::dto::{
    MobilePushRequest, PayPalVerification, RailResponse, RedirectPaymentRequest, StatusResponse,
};
use crate::domain::value_objects::enums::payment_rails::PaymentRailKind;

/// The payment backend that talks to the providers. One method per endpoint.
#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_mobile_push(&self, request: MobilePushRequest) -> Result<RailResponse>;

    async fn create_paypal_order(&self, request: RedirectPaymentRequest) -> Result<RailResponse>;

    async fn create_pesapal_order(&self, request: RedirectPaymentRequest)
    -> Result<RailResponse>;

    async fn payment_status(&self, reference: &str, rail: PaymentRailKind)
    -> Result<StatusResponse>;

    async fn verify_paypal_order(&self, order_id: &str) -> Result<PayPalVerification>;
}
