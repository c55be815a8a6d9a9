use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};

use tokio::sync::watch;
use tracing::debug;

use super::dispatcher::{AttemptSnapshot, AttemptState, PaymentAttempt};

/// How long a finished attempt stays visible to its owner.
pub const TERMINAL_RETENTION: Duration = Duration::from_secs(30 * 60);

struct TrackedAttempt {
    owner: String,
    attempt: PaymentAttempt,
}

type AttemptMap = Mutex<HashMap<String, TrackedAttempt>>;

fn lock(attempts: &AttemptMap) -> MutexGuard<'_, HashMap<String, TrackedAttempt>> {
    attempts.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-flight attempts by reference. Removing an entry drops the attempt,
/// which cancels its polling. Attempts that reach a terminal state are
/// evicted once the retention period has passed.
pub struct AttemptRegistry {
    attempts: Arc<AttemptMap>,
    retention: Duration,
}

impl Default for AttemptRegistry {
    fn default() -> Self {
        Self::with_retention(TERMINAL_RETENTION)
    }
}

impl AttemptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: Duration) -> Self {
        Self {
            attempts: Arc::new(Mutex::new(HashMap::new())),
            retention,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, TrackedAttempt>> {
        lock(&self.attempts)
    }

    /// Must be called from within a tokio runtime.
    pub fn insert(&self, owner: &str, attempt: PaymentAttempt) -> AttemptSnapshot {
        let snapshot = attempt.snapshot();
        let state = attempt.subscribe();
        let replaced = self.lock().insert(
            snapshot.reference.clone(),
            TrackedAttempt {
                owner: owner.to_string(),
                attempt,
            },
        );
        drop(replaced);

        self.schedule_eviction(snapshot.reference.clone(), state);
        snapshot
    }

    fn schedule_eviction(&self, reference: String, mut state: watch::Receiver<AttemptState>) {
        let attempts: Weak<AttemptMap> = Arc::downgrade(&self.attempts);
        let retention = self.retention;

        tokio::spawn(async move {
            // A closed channel means the poller is gone; its last state is final.
            let _ = state.wait_for(AttemptState::is_terminal).await;
            tokio::time::sleep(retention).await;

            let Some(attempts) = attempts.upgrade() else {
                return;
            };
            let evicted = {
                let mut attempts = lock(&attempts);
                let finished = attempts
                    .get(&reference)
                    .is_some_and(|tracked| tracked.attempt.state().is_terminal());
                if finished {
                    attempts.remove(&reference)
                } else {
                    None
                }
            };
            if evicted.is_some() {
                debug!(%reference, "payments: finished attempt evicted");
            }
        });
    }

    /// Only the owner can see an attempt.
    pub fn snapshot(&self, owner: &str, reference: &str) -> Option<AttemptSnapshot> {
        self.lock()
            .get(reference)
            .filter(|tracked| tracked.owner == owner)
            .map(|tracked| tracked.attempt.snapshot())
    }

    pub fn cancel(&self, owner: &str, reference: &str) -> Option<AttemptSnapshot> {
        let mut attempts = self.lock();
        if attempts.get(reference)?.owner != owner {
            return None;
        }
        let tracked = attempts.remove(reference)?;
        drop(attempts);

        tracked.attempt.cancel();
        let mut snapshot = tracked.attempt.snapshot();
        if !snapshot.state.is_terminal() {
            snapshot.state = AttemptState::Cancelled;
            snapshot.message = None;
        }
        Some(snapshot)
    }

    /// Drops every attempt owned by `owner`, e.g. on sign-out.
    pub fn remove_owner(&self, owner: &str) -> usize {
        let removed: Vec<TrackedAttempt> = {
            let mut attempts = self.lock();
            let references: Vec<String> = attempts
                .iter()
                .filter(|(_, tracked)| tracked.owner == owner)
                .map(|(reference, _)| reference.clone())
                .collect();
            references
                .iter()
                .filter_map(|reference| attempts.remove(reference))
                .collect()
        };
        removed.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::domain::value_objects::{
        enums::payment_rails::PaymentRailKind, payments::PaymentIntent,
    };
    use crate::payments::{
        dispatcher::{PaymentDispatcher, PaymentRequest},
        dto::RailResponse,
        gateway::MockPaymentGateway,
        polling::PollingPolicy,
    };

    async fn push_attempt() -> PaymentAttempt {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_payment_status().never();
        push_attempt_with(gateway).await
    }

    async fn push_attempt_with(mut gateway: MockPaymentGateway) -> PaymentAttempt {
        gateway.expect_create_mobile_push().returning(|_| {
            Ok(RailResponse {
                success: true,
                message: None,
                data: None,
            })
        });
        let dispatcher = PaymentDispatcher::new(Arc::new(gateway), PollingPolicy::default(), None);

        dispatcher
            .start(
                PaymentRequest {
                    intent: PaymentIntent::new(100.0, "UGX", "Rental").unwrap(),
                    rail: PaymentRailKind::MobilePush,
                    phone_number: Some("+256700123456".to_string()),
                },
                &CancellationToken::new(),
            )
            .await
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn attempts_are_private_to_their_owner() {
        let registry = AttemptRegistry::new();
        let snapshot = registry.insert("u1", push_attempt().await);

        assert!(registry.snapshot("u1", &snapshot.reference).is_some());
        assert!(registry.snapshot("u2", &snapshot.reference).is_none());
        assert!(registry.cancel("u2", &snapshot.reference).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_removes_and_stops_the_attempt() {
        let registry = AttemptRegistry::new();
        let attempt = push_attempt().await;
        let mut state = attempt.subscribe();
        let snapshot = registry.insert("u1", attempt);

        registry.cancel("u1", &snapshot.reference).unwrap();

        assert!(registry.is_empty());
        let terminal = state
            .wait_for(AttemptState::is_terminal)
            .await
            .map(|state| state.clone())
            .unwrap();
        assert_eq!(terminal, AttemptState::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn remove_owner_clears_only_that_owner() {
        let registry = AttemptRegistry::new();
        registry.insert("u1", push_attempt().await);
        registry.insert("u1", push_attempt().await);
        registry.insert("u2", push_attempt().await);

        assert_eq!(registry.remove_owner("u1"), 2);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn finished_attempts_are_evicted_after_retention() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_payment_status().returning(|_, _| {
            Ok(serde_json::from_value(
                serde_json::json!({ "success": true, "data": { "status": "completed" } }),
            )
            .unwrap())
        });
        let registry = AttemptRegistry::with_retention(Duration::from_secs(60));
        let attempt = push_attempt_with(gateway).await;
        let mut state = attempt.subscribe();
        let snapshot = registry.insert("u1", attempt);

        state.wait_for(AttemptState::is_terminal).await.unwrap();
        assert_eq!(
            registry.snapshot("u1", &snapshot.reference).unwrap().state,
            AttemptState::Confirmed
        );

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(registry.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn attempts_still_in_flight_are_kept() {
        let registry = AttemptRegistry::with_retention(Duration::from_secs(1));
        let snapshot = registry.insert("u1", push_attempt().await);

        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(registry.snapshot("u1", &snapshot.reference).is_some());
    }
}
