use serde::{Deserialize, Serialize};

use super::library::CartItemEntity;
use crate::domain::value_objects::enums::{
    payment_rails::PaymentRailKind, payment_statuses::PaymentStatus,
};

/// Order record written to local client state once a payment is confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEntity {
    pub reference: String,
    pub rail: PaymentRailKind,
    pub amount: f64,
    pub currency: String,
    pub description: String,
    pub status: PaymentStatus,
    #[serde(default)]
    pub items: Vec<CartItemEntity>,
    pub created_at: i64,
}
