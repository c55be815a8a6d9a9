use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{
    errors::PaymentError,
    gateway::PaymentGateway,
    polling::{ConfirmationPoller, PollOutcome, PollingPolicy},
    rails::{Rail, SubmitOutcome},
    reference::PaymentReference,
};
use crate::domain::value_objects::{
    enums::{payment_rails::PaymentRailKind, payment_statuses::PaymentStatus},
    payments::PaymentIntent,
};

/// Shown when the polling budget runs out.
pub const TIMEOUT_GUIDANCE: &str = "We could not confirm your payment yet. If you approved it, \
     please contact support with your payment reference.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AttemptState {
    Idle,
    Submitting,
    Redirected { url: String },
    AwaitingConfirmation,
    Polling { attempt: u32 },
    Confirmed,
    Declined,
    TimedOut { attempts: u32 },
    SubmitFailed { message: String },
    Cancelled,
}

impl AttemptState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AttemptState::Redirected { .. }
                | AttemptState::Confirmed
                | AttemptState::Declined
                | AttemptState::TimedOut { .. }
                | AttemptState::SubmitFailed { .. }
                | AttemptState::Cancelled
        )
    }

    /// Status as the payer sees it. Redirected and cancelled attempts are
    /// still pending: the provider may settle them later.
    pub fn observed_status(&self) -> PaymentStatus {
        match self {
            AttemptState::Confirmed => PaymentStatus::Completed,
            AttemptState::Declined | AttemptState::SubmitFailed { .. } => PaymentStatus::Failed,
            AttemptState::TimedOut { .. } => PaymentStatus::Timeout,
            _ => PaymentStatus::Pending,
        }
    }

    pub fn user_message(&self) -> Option<&str> {
        match self {
            AttemptState::SubmitFailed { message } => Some(message),
            AttemptState::TimedOut { .. } => Some(TIMEOUT_GUIDANCE),
            AttemptState::Declined => Some("The payment was declined."),
            _ => None,
        }
    }
}

impl From<PollOutcome> for AttemptState {
    fn from(outcome: PollOutcome) -> Self {
        match outcome {
            PollOutcome::Confirmed => AttemptState::Confirmed,
            PollOutcome::Declined => AttemptState::Declined,
            PollOutcome::TimedOut { attempts } => AttemptState::TimedOut { attempts },
            PollOutcome::Cancelled => AttemptState::Cancelled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSnapshot {
    pub reference: String,
    pub rail: PaymentRailKind,
    pub amount: f64,
    pub currency: String,
    pub description: String,
    pub status: PaymentStatus,
    #[serde(flatten)]
    pub state: AttemptState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Handle to one payment attempt. Dropping it stops any polling behind it.
pub struct PaymentAttempt {
    reference: PaymentReference,
    rail: PaymentRailKind,
    intent: PaymentIntent,
    state: watch::Receiver<AttemptState>,
    cancel: CancellationToken,
}

impl PaymentAttempt {
    pub fn reference(&self) -> &PaymentReference {
        &self.reference
    }

    pub fn rail(&self) -> PaymentRailKind {
        self.rail
    }

    pub fn intent(&self) -> &PaymentIntent {
        &self.intent
    }

    pub fn state(&self) -> AttemptState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AttemptState> {
        self.state.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub async fn wait_terminal(&self) -> AttemptState {
        let mut state = self.state.clone();
        if let Ok(terminal) = state.wait_for(AttemptState::is_terminal).await {
            return terminal.clone();
        }
        // The poller is gone; whatever it last published is final.
        state.borrow().clone()
    }

    pub fn snapshot(&self) -> AttemptSnapshot {
        let state = self.state();
        AttemptSnapshot {
            reference: self.reference.to_string(),
            rail: self.rail,
            amount: self.intent.amount,
            currency: self.intent.currency.clone(),
            description: self.intent.description.clone(),
            status: state.observed_status(),
            message: state.user_message().map(str::to_string),
            state,
        }
    }
}

impl Drop for PaymentAttempt {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// What the payer asked for, before any validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub intent: PaymentIntent,
    pub rail: PaymentRailKind,
    pub phone_number: Option<String>,
}

pub struct PaymentDispatcher {
    gateway: Arc<dyn PaymentGateway>,
    policy: PollingPolicy,
    callback_url: Option<String>,
}

impl PaymentDispatcher {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        policy: PollingPolicy,
        callback_url: Option<String>,
    ) -> Self {
        Self {
            gateway,
            policy,
            callback_url,
        }
    }

    /// Validates, submits and, for push payments, starts confirmation polling
    /// in the background. Only validation errors are returned as `Err`; a
    /// rejected or failed submission is an attempt in `SubmitFailed`.
    ///
    /// Polling stops when the returned attempt is dropped or cancelled, or
    /// when `scope` is cancelled.
    pub async fn start(
        &self,
        request: PaymentRequest,
        scope: &CancellationToken,
    ) -> Result<PaymentAttempt, PaymentError> {
        request.intent.validate()?;
        let rail = Rail::select(
            request.rail,
            request.phone_number.as_deref(),
            self.callback_url.clone(),
        )?;

        let reference = PaymentReference::generate(rail.kind());
        let (state_tx, state_rx) = watch::channel(AttemptState::Idle);
        let attempt = PaymentAttempt {
            reference: reference.clone(),
            rail: rail.kind(),
            intent: request.intent,
            state: state_rx,
            cancel: scope.child_token(),
        };

        info!(%reference, rail = %rail.kind(), amount = attempt.intent.amount, "payments: submitting");
        state_tx.send_replace(AttemptState::Submitting);

        let outcome = tokio::select! {
            biased;
            _ = attempt.cancel.cancelled() => None,
            outcome = rail.submit(self.gateway.as_ref(), &attempt.intent, &reference) => Some(outcome),
        };
        let Some(outcome) = outcome else {
            info!(%reference, "payments: cancelled during submission");
            state_tx.send_replace(AttemptState::Cancelled);
            return Ok(attempt);
        };

        match outcome {
            Ok(SubmitOutcome::Redirect { url }) => {
                info!(%reference, "payments: redirecting payer to provider");
                state_tx.send_replace(AttemptState::Redirected { url });
            }
            Ok(SubmitOutcome::AwaitingConfirmation) => {
                state_tx.send_replace(AttemptState::AwaitingConfirmation);
                self.spawn_polling(reference, rail.kind(), state_tx, attempt.cancel.clone());
            }
            Err(err) => {
                warn!(%reference, error = ?err, "payments: submission failed");
                state_tx.send_replace(AttemptState::SubmitFailed {
                    message: err.to_string(),
                });
            }
        }

        Ok(attempt)
    }

    fn spawn_polling(
        &self,
        reference: PaymentReference,
        rail: PaymentRailKind,
        state_tx: watch::Sender<AttemptState>,
        cancel: CancellationToken,
    ) {
        let poller = ConfirmationPoller::new(Arc::clone(&self.gateway), self.policy);

        tokio::spawn(async move {
            let outcome = poller
                .run(&reference, rail, &cancel, |attempt| {
                    state_tx.send_replace(AttemptState::Polling { attempt });
                })
                .await;
            state_tx.send_replace(outcome.into());
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::domain::value_objects::payments::PaymentValidationError;
    use crate::payments::{
        dto::{RailResponse, StatusResponse},
        gateway::MockPaymentGateway,
    };

    fn push_request(phone_number: Option<&str>) -> PaymentRequest {
        PaymentRequest {
            intent: PaymentIntent::new(1500.0, "KES", "Movie: Nairobi Nights").unwrap(),
            rail: PaymentRailKind::MobilePush,
            phone_number: phone_number.map(str::to_string),
        }
    }

    fn accepted() -> RailResponse {
        RailResponse {
            success: true,
            message: None,
            data: None,
        }
    }

    fn status(value: &str) -> StatusResponse {
        serde_json::from_value(json!({ "success": true, "data": { "status": value } })).unwrap()
    }

    fn dispatcher(gateway: MockPaymentGateway) -> PaymentDispatcher {
        PaymentDispatcher::new(Arc::new(gateway), PollingPolicy::default(), None)
    }

    #[tokio::test]
    async fn phone_without_country_code_makes_no_calls() {
        // No expectations: any gateway call would panic.
        let dispatcher = dispatcher(MockPaymentGateway::new());

        let err = dispatcher
            .start(push_request(Some("0712345678")), &CancellationToken::new())
            .await
            .err()
            .unwrap();

        assert!(matches!(
            err,
            PaymentError::Validation(PaymentValidationError::MissingCountryCode)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn push_payment_runs_to_confirmation() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_mobile_push()
            .withf(|request| request.msisdn == "+254712345678" && request.currency == "KES")
            .times(1)
            .returning(|_| Ok(accepted()));
        let mut calls = 0;
        gateway
            .expect_payment_status()
            .times(2)
            .returning(move |_, _| {
                calls += 1;
                Ok(status(if calls == 1 { "pending" } else { "completed" }))
            });

        let attempt = dispatcher(gateway)
            .start(push_request(Some("+254 712 345 678")), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(attempt.state(), AttemptState::AwaitingConfirmation);
        assert_eq!(attempt.wait_terminal().await, AttemptState::Confirmed);
        assert_eq!(attempt.snapshot().status, PaymentStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn rail_rejection_ends_in_submit_failed() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_mobile_push().times(1).returning(|_| {
            Ok(RailResponse {
                success: false,
                message: Some("Invalid MSISDN for this network".to_string()),
                data: None,
            })
        });

        let attempt = dispatcher(gateway)
            .start(push_request(Some("+254712345678")), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            attempt.state(),
            AttemptState::SubmitFailed {
                message: "Invalid MSISDN for this network".to_string()
            }
        );
        assert_eq!(attempt.snapshot().status, PaymentStatus::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn sequential_attempts_get_distinct_references() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_mobile_push()
            .times(2)
            .returning(|_| Ok(accepted()));
        gateway
            .expect_payment_status()
            .returning(|_, _| Ok(status("pending")));
        let dispatcher = dispatcher(gateway);
        let scope = CancellationToken::new();

        let first = dispatcher
            .start(push_request(Some("+254712345678")), &scope)
            .await
            .unwrap();
        let second = dispatcher
            .start(push_request(Some("+254712345678")), &scope)
            .await
            .unwrap();

        assert_ne!(first.reference(), second.reference());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelling_the_scope_stops_polling() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_mobile_push()
            .times(1)
            .returning(|_| Ok(accepted()));
        gateway.expect_payment_status().never();
        let scope = CancellationToken::new();

        let attempt = dispatcher(gateway)
            .start(push_request(Some("+254712345678")), &scope)
            .await
            .unwrap();
        scope.cancel();

        assert_eq!(attempt.wait_terminal().await, AttemptState::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_attempt_stops_polling() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_mobile_push()
            .times(1)
            .returning(|_| Ok(accepted()));
        gateway.expect_payment_status().never();

        let attempt = dispatcher(gateway)
            .start(push_request(Some("+254712345678")), &CancellationToken::new())
            .await
            .unwrap();
        let mut state = attempt.subscribe();
        drop(attempt);

        let terminal = state
            .wait_for(AttemptState::is_terminal)
            .await
            .map(|state| state.clone())
            .unwrap();
        assert_eq!(terminal, AttemptState::Cancelled);
        tokio::time::sleep(Duration::from_secs(120)).await;
    }

    #[tokio::test]
    async fn redirect_rails_end_at_the_provider() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_paypal_order().times(1).returning(|_| {
            Ok(RailResponse {
                success: true,
                message: None,
                data: Some(json!({ "approval_url": "https://paypal.example/approve?token=EC-1" })),
            })
        });
        gateway.expect_payment_status().never();

        let attempt = dispatcher(gateway)
            .start(
                PaymentRequest {
                    intent: PaymentIntent::new(4.99, "USD", "Series pass").unwrap(),
                    rail: PaymentRailKind::PayPal,
                    phone_number: None,
                },
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(
            attempt.state(),
            AttemptState::Redirected {
                url: "https://paypal.example/approve?token=EC-1".to_string()
            }
        );
        assert!(attempt.reference().as_str().starts_with("PAYPAL_"));
    }
}
