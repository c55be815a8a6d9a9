//! Wire shapes of the payment backend endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field names PesaPal has been seen to use for the checkout link.
pub const PESAPAL_REDIRECT_KEYS: [&str; 3] = ["redirect_url", "redirecturl", "payment_url"];
pub const PAYPAL_APPROVAL_KEY: &str = "approval_url";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MobilePushRequest {
    pub msisdn: String,
    pub amount: f64,
    pub currency: String,
    pub description: String,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectPaymentRequest {
    pub amount: f64,
    pub currency: String,
    pub description: String,
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

/// Answer of every creation endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RailResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl RailResponse {
    fn data_str(&self, key: &str) -> Option<&str> {
        self.data
            .as_ref()?
            .get(key)?
            .as_str()
            .filter(|value| !value.trim().is_empty())
    }

    pub fn approval_url(&self) -> Option<&str> {
        self.data_str(PAYPAL_APPROVAL_KEY)
    }

    pub fn pesapal_redirect_url(&self) -> Option<&str> {
        PESAPAL_REDIRECT_KEYS
            .iter()
            .find_map(|key| self.data_str(key))
    }

    /// Keys present under `data`, for flagging unfamiliar response shapes.
    pub fn data_keys(&self) -> Vec<String> {
        match &self.data {
            Some(Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    Pending,
    Completed,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatusData {
    #[serde(default)]
    pub status: ProviderStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<StatusData>,
}

impl StatusResponse {
    /// An unsuccessful status call says nothing about the payment itself.
    pub fn provider_status(&self) -> ProviderStatus {
        match (&self.data, self.success) {
            (Some(data), true) => data.status,
            _ => ProviderStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayPalVerifyRequest {
    pub order_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PayPalOrderDetails {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PayPalVerification {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<PayPalOrderDetails>,
}
