use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{dto::ProviderStatus, gateway::PaymentGateway, reference::PaymentReference};
use crate::domain::value_objects::enums::payment_rails::PaymentRailKind;

/// Timing of confirmation polls for push payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingPolicy {
    /// Wait before the first poll; the prompt takes a moment to reach the phone.
    pub initial_delay: Duration,
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollingPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            interval: Duration::from_secs(10),
            max_attempts: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Confirmed,
    Declined,
    /// Budget spent without a final answer. The payment may still settle later.
    TimedOut { attempts: u32 },
    Cancelled,
}

pub struct ConfirmationPoller {
    gateway: Arc<dyn PaymentGateway>,
    policy: PollingPolicy,
}

impl ConfirmationPoller {
    pub fn new(gateway: Arc<dyn PaymentGateway>, policy: PollingPolicy) -> Self {
        Self { gateway, policy }
    }

    /// Polls sequentially until the rail reports a final status, the budget
    /// runs out or `cancel` fires. `on_attempt` sees each attempt number before
    /// its request goes out.
    pub async fn run<F>(
        &self,
        reference: &PaymentReference,
        rail: PaymentRailKind,
        cancel: &CancellationToken,
        mut on_attempt: F,
    ) -> PollOutcome
    where
        F: FnMut(u32) + Send,
    {
        let mut delay = self.policy.initial_delay;

        for attempt in 1..=self.policy.max_attempts {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(%reference, attempt, "payments: polling cancelled while waiting");
                    return PollOutcome::Cancelled;
                }
                _ = tokio::time::sleep(delay) => {}
            }
            delay = self.policy.interval;

            on_attempt(attempt);
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(%reference, attempt, "payments: polling cancelled mid-request");
                    return PollOutcome::Cancelled;
                }
                result = self.gateway.payment_status(reference.as_str(), rail) => result,
            };

            match result {
                Ok(response) => match response.provider_status() {
                    ProviderStatus::Completed => {
                        info!(%reference, attempt, "payments: payment confirmed");
                        return PollOutcome::Confirmed;
                    }
                    ProviderStatus::Failed => {
                        info!(%reference, attempt, "payments: payment declined");
                        return PollOutcome::Declined;
                    }
                    status => {
                        debug!(%reference, attempt, ?status, "payments: still waiting for confirmation");
                    }
                },
                Err(err) => {
                    warn!(%reference, attempt, error = ?err, "payments: status check failed, will retry");
                }
            }
        }

        warn!(
            %reference,
            attempts = self.policy.max_attempts,
            "payments: no final status within the polling budget"
        );
        PollOutcome::TimedOut {
            attempts: self.policy.max_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;
    use tokio::time::Instant;

    use super::*;
    use crate::payments::{dto::StatusResponse, gateway::MockPaymentGateway};

    fn status(value: &str) -> StatusResponse {
        serde_json::from_value(json!({ "success": true, "data": { "status": value } })).unwrap()
    }

    fn reference() -> PaymentReference {
        PaymentReference::from_existing("MOMO_1700000000000_abcdefghi")
    }

    #[tokio::test(start_paused = true)]
    async fn confirms_on_the_sixth_poll_and_stops() {
        let poll_times = Arc::new(Mutex::new(Vec::new()));
        let mut gateway = MockPaymentGateway::new();
        let mut calls = 0;
        let times = Arc::clone(&poll_times);
        gateway
            .expect_payment_status()
            .withf(|reference, rail| {
                reference == "MOMO_1700000000000_abcdefghi" && *rail == PaymentRailKind::MobilePush
            })
            .times(6)
            .returning(move |_, _| {
                calls += 1;
                times.lock().unwrap().push(Instant::now());
                Ok(status(if calls < 6 { "pending" } else { "completed" }))
            });

        let poller = ConfirmationPoller::new(Arc::new(gateway), PollingPolicy::default());
        let started = Instant::now();
        let outcome = poller
            .run(
                &reference(),
                PaymentRailKind::MobilePush,
                &CancellationToken::new(),
                |_| {},
            )
            .await;

        assert_eq!(outcome, PollOutcome::Confirmed);
        let times = poll_times.lock().unwrap();
        assert_eq!(times.len(), 6);
        assert_eq!(times[0] - started, Duration::from_secs(5));
        for pair in times.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::from_secs(10));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn always_pending_times_out_after_thirty_polls() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_payment_status()
            .times(30)
            .returning(|_, _| Ok(status("pending")));

        let poller = ConfirmationPoller::new(Arc::new(gateway), PollingPolicy::default());
        let mut seen = Vec::new();
        let outcome = poller
            .run(
                &reference(),
                PaymentRailKind::MobilePush,
                &CancellationToken::new(),
                |attempt| seen.push(attempt),
            )
            .await;

        assert_eq!(outcome, PollOutcome::TimedOut { attempts: 30 });
        assert_ne!(outcome, PollOutcome::Declined);
        assert_eq!(seen, (1..=30).collect::<Vec<_>>());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_status_is_a_decline() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_payment_status()
            .times(1)
            .returning(|_, _| Ok(status("failed")));

        let poller = ConfirmationPoller::new(Arc::new(gateway), PollingPolicy::default());
        let outcome = poller
            .run(
                &reference(),
                PaymentRailKind::MobilePush,
                &CancellationToken::new(),
                |_| {},
            )
            .await;

        assert_eq!(outcome, PollOutcome::Declined);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_errors_consume_attempts_without_aborting() {
        let mut gateway = MockPaymentGateway::new();
        let mut calls = 0;
        gateway
            .expect_payment_status()
            .times(4)
            .returning(move |_, _| {
                calls += 1;
                match calls {
                    1 | 2 => Err(anyhow::anyhow!("timed out")),
                    3 => Ok(StatusResponse::default()),
                    _ => Ok(status("completed")),
                }
            });

        let poller = ConfirmationPoller::new(Arc::new(gateway), PollingPolicy::default());
        let outcome = poller
            .run(
                &reference(),
                PaymentRailKind::MobilePush,
                &CancellationToken::new(),
                |_| {},
            )
            .await;

        assert_eq!(outcome, PollOutcome::Confirmed);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_further_polls() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let mut gateway = MockPaymentGateway::new();
        let mut calls = 0;
        gateway
            .expect_payment_status()
            .times(2)
            .returning(move |_, _| {
                calls += 1;
                if calls == 2 {
                    trigger.cancel();
                }
                Ok(status("pending"))
            });

        let poller = ConfirmationPoller::new(Arc::new(gateway), PollingPolicy::default());
        let started = Instant::now();
        let outcome = poller
            .run(&reference(), PaymentRailKind::MobilePush, &cancel, |_| {})
            .await;

        assert_eq!(outcome, PollOutcome::Cancelled);
        assert_eq!(Instant::now() - started, Duration::from_secs(15));
    }
}
