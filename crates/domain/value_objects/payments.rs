use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_MSISDN_DIGITS: usize = 8;
pub const MAX_MSISDN_DIGITS: usize = 15;

/// Problems caught before any payment request leaves the process.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaymentValidationError {
    #[error("Please enter the mobile money phone number to charge")]
    MissingPhoneNumber,
    #[error("Phone number must start with + and the country code, e.g. +256700123456")]
    MissingCountryCode,
    #[error("Phone number must be + followed by 8 to 15 digits")]
    InvalidPhoneNumber,
    #[error("Amount must be a positive number")]
    InvalidAmount,
    #[error("Currency is required")]
    MissingCurrency,
    #[error("Payment description is required")]
    MissingDescription,
}

/// What the payer is being charged for. Echoed verbatim to the rail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub amount: f64,
    pub currency: String,
    pub description: String,
}

impl PaymentIntent {
    pub fn new(
        amount: f64,
        currency: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, PaymentValidationError> {
        let intent = Self {
            amount,
            currency: currency.into(),
            description: description.into(),
        };
        intent.validate()?;
        Ok(intent)
    }

    pub fn validate(&self) -> Result<(), PaymentValidationError> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(PaymentValidationError::InvalidAmount);
        }
        if self.currency.trim().is_empty() {
            return Err(PaymentValidationError::MissingCurrency);
        }
        if self.description.trim().is_empty() {
            return Err(PaymentValidationError::MissingDescription);
        }
        Ok(())
    }
}

/// Phone number in E.164-like form (`+` then digits).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Msisdn(String);

impl Msisdn {
    pub fn parse(raw: Option<&str>) -> Result<Self, PaymentValidationError> {
        let compact: String = raw
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();

        if compact.is_empty() {
            return Err(PaymentValidationError::MissingPhoneNumber);
        }

        let digits = compact
            .strip_prefix('+')
            .ok_or(PaymentValidationError::MissingCountryCode)?;

        if !(MIN_MSISDN_DIGITS..=MAX_MSISDN_DIGITS).contains(&digits.len())
            || !digits.chars().all(|c| c.is_ascii_digit())
        {
            return Err(PaymentValidationError::InvalidPhoneNumber);
        }

        Ok(Self(compact))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_number_is_distinguished_from_missing_country_code() {
        assert_eq!(
            Msisdn::parse(None),
            Err(PaymentValidationError::MissingPhoneNumber)
        );
        assert_eq!(
            Msisdn::parse(Some("   ")),
            Err(PaymentValidationError::MissingPhoneNumber)
        );
        assert_eq!(
            Msisdn::parse(Some("0700123456")),
            Err(PaymentValidationError::MissingCountryCode)
        );
    }

    #[test]
    fn number_with_country_code_is_accepted_and_compacted() {
        let msisdn = Msisdn::parse(Some(" +256 700-123 456 ")).unwrap();
        assert_eq!(msisdn.as_str(), "+256700123456");
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        for raw in ["+", "+2567", "+256abc123456", "+1234567890123456"] {
            assert_eq!(
                Msisdn::parse(Some(raw)),
                Err(PaymentValidationError::InvalidPhoneNumber),
                "raw: {raw}"
            );
        }
    }

    #[test]
    fn intent_rejects_non_positive_amounts_and_blank_fields() {
        assert_eq!(
            PaymentIntent::new(0.0, "UGX", "Movie").unwrap_err(),
            PaymentValidationError::InvalidAmount
        );
        assert_eq!(
            PaymentIntent::new(f64::NAN, "UGX", "Movie").unwrap_err(),
            PaymentValidationError::InvalidAmount
        );
        assert_eq!(
            PaymentIntent::new(5000.0, " ", "Movie").unwrap_err(),
            PaymentValidationError::MissingCurrency
        );
        assert_eq!(
            PaymentIntent::new(5000.0, "UGX", "").unwrap_err(),
            PaymentValidationError::MissingDescription
        );
        assert!(PaymentIntent::new(5000.0, "UGX", "Movie rental").is_ok());
    }
}
