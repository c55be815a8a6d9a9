use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Method, Response};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};
use url::Url;

use super::{
    dto::{
        MobilePushRequest, PayPalVerification, PayPalVerifyRequest, RailResponse,
        RedirectPaymentRequest, StatusResponse,
    },
    gateway::PaymentGateway,
};
use crate::domain::value_objects::enums::payment_rails::PaymentRailKind;

/// Paths of the payment backend, relative to its base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentEndpoints {
    pub mobile_push: String,
    pub paypal_create: String,
    pub pesapal_create: String,
    pub status: String,
    pub paypal_verify: String,
}

impl Default for PaymentEndpoints {
    fn default() -> Self {
        Self {
            mobile_push: "api/payments/mobile-money".to_string(),
            paypal_create: "api/payments/paypal/create-order".to_string(),
            pesapal_create: "api/payments/pesapal/create-order".to_string(),
            status: "api/payments/status".to_string(),
            paypal_verify: "api/payments/paypal/capture-order".to_string(),
        }
    }
}

pub struct PaymentApiClient {
    http: reqwest::Client,
    base_url: Url,
    endpoints: PaymentEndpoints,
}

impl PaymentApiClient {
    /// A request that outlives `timeout` fails like any other transport
    /// error, which the poller treats as a retryable attempt.
    pub fn new(mut base_url: Url, endpoints: PaymentEndpoints, timeout: Duration) -> Result<Self> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build the payment API http client")?;

        Ok(Self {
            http,
            base_url,
            endpoints,
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("invalid payment endpoint `{path}`"))
    }

    /// Rails put their user-facing `message` in error responses too, so the
    /// body is decoded whatever the status code.
    async fn decode<T: DeserializeOwned>(resp: Response, context: &str) -> Result<T> {
        let status = resp.status();
        let body = resp
            .text()
            .await
            .with_context(|| format!("{context}: failed to read response body"))?;

        match serde_json::from_str::<T>(&body) {
            Ok(parsed) => {
                if !status.is_success() {
                    warn!(status = %status, context = %context, "payment api returned an error status");
                }
                Ok(parsed)
            }
            Err(err) => {
                warn!(
                    status = %status,
                    response_body = %body,
                    context = %context,
                    "payment api returned an unreadable body"
                );
                Err(err).with_context(|| format!("{context}: unexpected response (status {status})"))
            }
        }
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<T> {
        let url = self.url(path)?;
        debug!(%method, %url, context = %context, "payment api: request");

        let resp = self
            .http
            .request(method, url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("{context}: request failed"))?;
        Self::decode(resp, context).await
    }
}

#[async_trait]
impl PaymentGateway for PaymentApiClient {
    async fn create_mobile_push(&self, request: MobilePushRequest) -> Result<RailResponse> {
        self.send_json(
            Method::POST,
            &self.endpoints.mobile_push,
            &request,
            "create mobile money payment",
        )
        .await
    }

    async fn create_paypal_order(&self, request: RedirectPaymentRequest) -> Result<RailResponse> {
        self.send_json(
            Method::POST,
            &self.endpoints.paypal_create,
            &request,
            "create paypal order",
        )
        .await
    }

    async fn create_pesapal_order(
        &self,
        request: RedirectPaymentRequest,
    ) -> Result<RailResponse> {
        self.send_json(
            Method::POST,
            &self.endpoints.pesapal_create,
            &request,
            "create pesapal order",
        )
        .await
    }

    async fn payment_status(
        &self,
        reference: &str,
        rail: PaymentRailKind,
    ) -> Result<StatusResponse> {
        let mut url = self.url(&self.endpoints.status)?;
        url.query_pairs_mut()
            .append_pair("reference", reference)
            .append_pair("type", rail.as_str());

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .context("payment status: request failed")?;
        Self::decode(resp, "payment status").await
    }

    async fn verify_paypal_order(&self, order_id: &str) -> Result<PayPalVerification> {
        let body = PayPalVerifyRequest {
            order_id: order_id.to_string(),
        };
        self.send_json(
            Method::PUT,
            &self.endpoints.paypal_verify,
            &body,
            "verify paypal order",
        )
        .await
    }
}
