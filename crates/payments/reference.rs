use std::fmt::Display;

use chrono::Utc;
use rand::Rng;
use serde::Serialize;

use crate::domain::value_objects::enums::payment_rails::PaymentRailKind;

const SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Correlation id for exactly one payment attempt: `PREFIX_<epoch-ms>_<suffix>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PaymentReference(String);

impl PaymentReference {
    pub fn generate(rail: PaymentRailKind) -> Self {
        Self::generate_with(rail, Utc::now().timestamp_millis(), &mut rand::thread_rng())
    }

    fn generate_with(rail: PaymentRailKind, epoch_millis: i64, rng: &mut impl Rng) -> Self {
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
            .collect();
        Self(format!("{}_{epoch_millis}_{suffix}", rail.reference_prefix()))
    }

    /// Wraps a reference that came back from a rail or a return URL.
    pub fn from_existing(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for PaymentReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
