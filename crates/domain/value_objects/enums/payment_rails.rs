use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Payment provider integration path chosen by the payer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PaymentRailKind {
    #[serde(rename = "mobile_money")]
    MobilePush,
    #[serde(rename = "paypal")]
    PayPal,
    #[serde(rename = "pesapal")]
    PesaPal,
}

impl PaymentRailKind {
    /// Wire value sent as the `type` query parameter of status checks.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentRailKind::MobilePush => "mobile_money",
            PaymentRailKind::PayPal => "paypal",
            PaymentRailKind::PesaPal => "pesapal",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "mobile_money" => Some(PaymentRailKind::MobilePush),
            "paypal" => Some(PaymentRailKind::PayPal),
            "pesapal" => Some(PaymentRailKind::PesaPal),
            _ => None,
        }
    }

    pub fn reference_prefix(&self) -> &'static str {
        match self {
            PaymentRailKind::MobilePush => "MOMO",
            PaymentRailKind::PayPal => "PAYPAL",
            PaymentRailKind::PesaPal => "PESAPAL",
        }
    }

    /// Redirect rails leave the page; confirmation happens on return.
    pub fn is_redirect(&self) -> bool {
        !matches!(self, PaymentRailKind::MobilePush)
    }
}

impl Display for PaymentRailKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
