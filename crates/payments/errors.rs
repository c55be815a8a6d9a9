use thiserror::Error;

use crate::domain::value_objects::payments::PaymentValidationError;

/// Shown when a rail declines a request without saying why.
pub const DEFAULT_REJECTION_MESSAGE: &str = "Payment request failed. Please try again.";

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error(transparent)]
    Validation(#[from] PaymentValidationError),
    /// The rail answered `success: false`. Carries its message verbatim.
    #[error("{0}")]
    Rejected(String),
    #[error("Payment provider did not return a checkout link. Please try again.")]
    MissingRedirectUrl,
    #[error("The return link is missing the payment identifier")]
    MissingReturnToken,
    #[error("Could not reach the payment service. Please try again.")]
    Transport(#[source] anyhow::Error),
}

impl PaymentError {
    pub fn rejected(message: Option<String>) -> Self {
        let message = message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_string());
        Self::Rejected(message)
    }

    /// Validation problems are the caller's to fix; nothing was sent.
    pub fn is_pre_network(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::MissingReturnToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_keeps_the_rail_message() {
        let err = PaymentError::rejected(Some("Insufficient balance on wallet".to_string()));
        assert_eq!(err.to_string(), "Insufficient balance on wallet");
    }

    #[test]
    fn rejection_without_message_uses_the_default() {
        assert_eq!(
            PaymentError::rejected(Some(" ".to_string())).to_string(),
            DEFAULT_REJECTION_MESSAGE
        );
        assert_eq!(PaymentError::rejected(None).to_string(), DEFAULT_REJECTION_MESSAGE);
    }
}
