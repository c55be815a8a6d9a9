use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use axum::http::StatusCode;
use serde::Deserialize;
use storefront_core::{
    domain::{
        entities::{library::CartItemEntity, orders::OrderEntity},
        repositories::library::LibraryRepository,
        value_objects::{
            enums::{payment_rails::PaymentRailKind, payment_statuses::PaymentStatus},
            payments::PaymentIntent,
        },
    },
    payments::{
        attempts::{AttemptRegistry, TERMINAL_RETENTION},
        dispatcher::{AttemptSnapshot, AttemptState, PaymentDispatcher, PaymentRequest},
        errors::PaymentError,
        gateway::PaymentGateway,
        polling::PollingPolicy,
        redirect_return::{
            RedirectReturnVerifier, ReturnOutcome, paypal_order_id_from_approval_url,
            paypal_return_order_id, pesapal_return_reference,
        },
    },
    session::registry::SessionRegistry,
};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutModel {
    pub amount: f64,
    pub currency: String,
    pub description: String,
    pub rail: PaymentRailKind,
    #[serde(default)]
    pub phone_number: Option<String>,
    /// What the order is for. Defaults to the caller's cart.
    #[serde(default)]
    pub items: Option<Vec<CartItemEntity>>,
}

/// Query parameters the provider appended to the return URL, forwarded as-is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedirectReturnModel {
    /// PayPal's return link only carries its own order id, so the client
    /// passes the attempt reference it was given at checkout.
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub params: HashMap<String, String>,
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Payment(#[from] PaymentError),
    /// The rail refused the request. The message is the rail's own.
    #[error("{0}")]
    SubmitFailed(String),
    #[error("Sign in before paying")]
    NoSession,
    #[error("Payment not found")]
    NotFound,
    #[error("This return does not belong to that payment")]
    ReturnMismatch,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CheckoutError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CheckoutError::Payment(err) if err.is_pre_network() => StatusCode::BAD_REQUEST,
            CheckoutError::Payment(_) | CheckoutError::SubmitFailed(_) => StatusCode::BAD_GATEWAY,
            CheckoutError::NoSession => StatusCode::UNAUTHORIZED,
            CheckoutError::NotFound => StatusCode::NOT_FOUND,
            CheckoutError::ReturnMismatch => StatusCode::BAD_REQUEST,
            CheckoutError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type CheckoutResult<T> = std::result::Result<T, CheckoutError>;

struct PendingOrder {
    owner: String,
    order: OrderEntity,
    from_cart: bool,
    /// PayPal's id for the order created by this attempt.
    provider_order_id: Option<String>,
}

impl PendingOrder {
    /// A return confirms this order only if it comes back on the rail that
    /// started it and, for PayPal, carries the order that attempt created.
    fn accepts_return(&self, rail: PaymentRailKind, returned_order_id: Option<&str>) -> bool {
        if self.order.rail != rail {
            return false;
        }
        match rail {
            PaymentRailKind::PayPal => {
                self.provider_order_id.is_some()
                    && self.provider_order_id.as_deref() == returned_order_id
            }
            _ => true,
        }
    }
}

/// Orders waiting for their payment to be confirmed, by reference.
#[derive(Default)]
struct PendingOrders {
    orders: Mutex<HashMap<String, PendingOrder>>,
}

impl PendingOrders {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, PendingOrder>> {
        self.orders.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert(&self, pending: PendingOrder) {
        self.lock().insert(pending.order.reference.clone(), pending);
    }

    fn take(&self, owner: &str, reference: &str) -> Option<PendingOrder> {
        let mut orders = self.lock();
        if orders.get(reference)?.owner != owner {
            return None;
        }
        orders.remove(reference)
    }

    /// Errors when the owner has a pending order under `reference` that the
    /// return cannot confirm. Unknown references pass; nothing is recorded
    /// for them.
    fn check_return(
        &self,
        owner: &str,
        reference: &str,
        rail: PaymentRailKind,
        returned_order_id: Option<&str>,
    ) -> CheckoutResult<()> {
        match self.lock().get(reference) {
            Some(pending)
                if pending.owner == owner && !pending.accepts_return(rail, returned_order_id) =>
            {
                Err(CheckoutError::ReturnMismatch)
            }
            _ => Ok(()),
        }
    }

    fn take_for_return(
        &self,
        owner: &str,
        reference: &str,
        rail: PaymentRailKind,
        returned_order_id: Option<&str>,
    ) -> Option<PendingOrder> {
        let mut orders = self.lock();
        let pending = orders.get(reference)?;
        if pending.owner != owner || !pending.accepts_return(rail, returned_order_id) {
            return None;
        }
        orders.remove(reference)
    }
}

pub struct CheckoutUseCase<L>
where
    L: LibraryRepository + Send + Sync + 'static,
{
    dispatcher: PaymentDispatcher,
    verifier: RedirectReturnVerifier,
    attempts: Arc<AttemptRegistry>,
    sessions: Arc<SessionRegistry>,
    library_repo: Arc<L>,
    pending: Arc<PendingOrders>,
}

impl<L> CheckoutUseCase<L>
where
    L: LibraryRepository + Send + Sync + 'static,
{
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        policy: PollingPolicy,
        callback_url: Option<String>,
        attempts: Arc<AttemptRegistry>,
        sessions: Arc<SessionRegistry>,
        library_repo: Arc<L>,
    ) -> Self {
        Self {
            dispatcher: PaymentDispatcher::new(Arc::clone(&gateway), policy, callback_url),
            verifier: RedirectReturnVerifier::new(gateway),
            attempts,
            sessions,
            library_repo,
            pending: Arc::new(PendingOrders::default()),
        }
    }

    /// Submits a payment on behalf of a signed-in user. Push payments keep
    /// polling in the background under the user's session; the order is
    /// recorded once the rail confirms.
    pub async fn start(&self, uid: &str, checkout: CheckoutModel) -> CheckoutResult<AttemptSnapshot> {
        let scope = self
            .sessions
            .get(uid)
            .and_then(|session| session.active_scope())
            .ok_or(CheckoutError::NoSession)?;

        let (items, from_cart) = match checkout.items {
            Some(items) => (items, false),
            None => {
                let cart = self.library_repo.cart(uid).await.map_err(|err| {
                    error!(store_error = ?err, uid, "payments: failed to read cart");
                    CheckoutError::Internal(err)
                })?;
                (cart, true)
            }
        };

        let request = PaymentRequest {
            intent: PaymentIntent {
                amount: checkout.amount,
                currency: checkout.currency,
                description: checkout.description,
            },
            rail: checkout.rail,
            phone_number: checkout.phone_number,
        };
        let attempt = self.dispatcher.start(request, &scope).await?;

        let provider_order_id = match attempt.state() {
            AttemptState::SubmitFailed { message } => {
                return Err(CheckoutError::SubmitFailed(message));
            }
            AttemptState::Cancelled => {
                info!(uid, "payments: session ended during submission");
                return Err(CheckoutError::NoSession);
            }
            AttemptState::Redirected { url } if attempt.rail() == PaymentRailKind::PayPal => {
                let order_id = paypal_order_id_from_approval_url(&url);
                if order_id.is_none() {
                    warn!(uid, "payments: paypal approval link carries no order id");
                }
                order_id
            }
            _ => None,
        };

        let intent = attempt.intent();
        let reference = attempt.reference().to_string();
        self.pending.insert(PendingOrder {
            owner: uid.to_string(),
            order: OrderEntity {
                reference: reference.clone(),
                rail: attempt.rail(),
                amount: intent.amount,
                currency: intent.currency.clone(),
                description: intent.description.clone(),
                status: PaymentStatus::Pending,
                items,
                created_at: chrono::Utc::now().timestamp_millis(),
            },
            from_cart,
            provider_order_id,
        });

        if attempt.rail().is_redirect() {
            self.expire_unreturned(uid.to_string(), reference, scope.cancelled_owned());
        } else {
            self.follow_until_terminal(uid.to_string(), reference, attempt.subscribe());
        }

        Ok(self.attempts.insert(uid, attempt))
    }

    fn follow_until_terminal(
        &self,
        owner: String,
        reference: String,
        mut state: watch::Receiver<AttemptState>,
    ) {
        let pending = Arc::clone(&self.pending);
        let library_repo = Arc::clone(&self.library_repo);

        tokio::spawn(async move {
            let terminal = wait_terminal(&mut state).await;
            let Some(order) = pending.take(&owner, &reference) else {
                return;
            };

            if terminal == AttemptState::Confirmed {
                record_confirmed(library_repo.as_ref(), order).await;
            } else {
                debug!(%reference, ?terminal, "payments: attempt ended without confirmation");
            }
        });
    }

    /// Redirect orders wait for the payer to come back. They are dropped on
    /// sign-out or once the attempt itself would be evicted.
    fn expire_unreturned<F>(&self, owner: String, reference: String, signed_out: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let pending = Arc::clone(&self.pending);

        tokio::spawn(async move {
            tokio::select! {
                _ = signed_out => {}
                _ = tokio::time::sleep(TERMINAL_RETENTION) => {}
            }
            if pending.take(&owner, &reference).is_some() {
                debug!(uid = %owner, %reference, "payments: pending redirect order dropped");
            }
        });
    }

    pub fn status(&self, uid: &str, reference: &str) -> CheckoutResult<AttemptSnapshot> {
        self.attempts
            .snapshot(uid, reference)
            .ok_or(CheckoutError::NotFound)
    }

    pub fn cancel(&self, uid: &str, reference: &str) -> CheckoutResult<AttemptSnapshot> {
        let snapshot = self
            .attempts
            .cancel(uid, reference)
            .ok_or(CheckoutError::NotFound)?;
        self.pending.take(uid, reference);

        info!(uid, reference, "payments: attempt cancelled by payer");
        Ok(snapshot)
    }

    /// Confirms a redirect payment when the payer comes back from the
    /// provider. Exactly one verification call is made.
    pub async fn verify_return(
        &self,
        uid: &str,
        rail: PaymentRailKind,
        redirect_return: RedirectReturnModel,
    ) -> CheckoutResult<ReturnOutcome> {
        let params = &redirect_return.params;
        let reference = match rail {
            PaymentRailKind::PesaPal => pesapal_return_reference(params).map(str::to_string),
            _ => redirect_return.reference.clone(),
        };
        let returned_order_id = match rail {
            PaymentRailKind::PayPal => paypal_return_order_id(params),
            _ => None,
        };

        if let Some(reference) = &reference {
            self.pending
                .check_return(uid, reference, rail, returned_order_id)
                .inspect_err(|_| {
                    warn!(uid, %reference, %rail, "payments: return does not match the pending order");
                })?;
        }

        let outcome = self.verifier.verify(rail, params).await?;

        match (&outcome, reference) {
            (ReturnOutcome::Confirmed { .. }, Some(reference)) => {
                match self
                    .pending
                    .take_for_return(uid, &reference, rail, returned_order_id)
                {
                    Some(order) => record_confirmed(self.library_repo.as_ref(), order).await,
                    None => warn!(uid, %reference, "payments: confirmed return has no pending order"),
                }
            }
            (ReturnOutcome::Declined { .. }, Some(reference)) => {
                self.pending
                    .take_for_return(uid, &reference, rail, returned_order_id);
            }
            _ => {}
        }

        Ok(outcome)
    }
}

async fn wait_terminal(state: &mut watch::Receiver<AttemptState>) -> AttemptState {
    if let Ok(terminal) = state.wait_for(AttemptState::is_terminal).await {
        return terminal.clone();
    }
    state.borrow().clone()
}

async fn record_confirmed<L>(library_repo: &L, pending: PendingOrder)
where
    L: LibraryRepository + ?Sized,
{
    let PendingOrder {
        owner,
        mut order,
        from_cart,
        ..
    } = pending;
    order.status = PaymentStatus::Completed;
    let reference = order.reference.clone();

    if let Err(err) = library_repo.record_order(&owner, order).await {
        error!(store_error = ?err, uid = %owner, %reference, "payments: failed to record order");
        return;
    }
    if from_cart {
        if let Err(err) = library_repo.clear_cart(&owner).await {
            warn!(store_error = ?err, uid = %owner, "payments: failed to clear cart after order");
        }
    }

    info!(uid = %owner, %reference, "payments: order recorded");
}
