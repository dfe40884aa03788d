//! Payment orchestrator: the attempt state machine.
//!
//! Sequences ensure-session → advisory readiness check → instruction
//! planning → single atomic submission, and exposes the result as a
//! reactive [`PaymentStatus`] the presentation layer renders. Terminal
//! states auto-reset to idle after a fixed observation window unless a new
//! attempt interrupts them first.
//!
//! One attempt is in flight per orchestrator at any time: the begin step is
//! an atomic compare-and-swap on the state, so a second trigger while an
//! attempt runs is a no-op and never reaches the SDK.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::OrchestratorConfig;
use crate::error::{PayError, classify_submission_failure};
use crate::planner::{InstructionPlanner, PaymentRequest};
use crate::readiness::{ReadinessProbe, ReadinessResult};
use crate::session::{
    ConnectOptions, FeeMode, SessionSdk, Signature, SubmitRequest, TransactionOptions,
    WalletAddress,
};
use crate::store::{FlagStore, SESSION_PRESENT_KEY};

/// Finite attempt state.
///
/// `Idle` is both the initial state and the terminal-recovery state; the
/// UI trigger must be disabled for every other state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentState {
    /// No attempt in flight. The only state accepting a new attempt
    /// directly (terminals accept one by cancelling their reset timer).
    Idle,
    /// Establishing or restoring a session.
    Connecting,
    /// Instructions being built; conceptually overlaps with the SDK's
    /// signing prompt.
    Authenticating,
    /// Submission in flight.
    Processing,
    /// Terminal: submission resolved with a signature.
    Success,
    /// Terminal: the attempt failed with a classified message.
    Error,
}

impl PaymentState {
    /// Whether a new attempt may begin from this state.
    #[must_use]
    pub const fn accepts_new_attempt(self) -> bool {
        matches!(self, Self::Idle | Self::Success | Self::Error)
    }
}

/// Snapshot consumed by the presentation layer.
///
/// Exactly one error message is live at a time, scoped to the most recent
/// attempt; both `signature` and `error` are cleared when the state returns
/// to idle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    /// Current attempt state.
    pub state: PaymentState,
    /// Signature of the last successful submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    /// Classified message of the last failed attempt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PaymentStatus {
    const fn idle() -> Self {
        Self {
            state: PaymentState::Idle,
            signature: None,
            error: None,
        }
    }

    const fn connecting() -> Self {
        Self {
            state: PaymentState::Connecting,
            signature: None,
            error: None,
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        Self::idle()
    }
}

struct Inner<S, P, R> {
    sdk: S,
    planner: P,
    readiness: R,
    flags: Arc<dyn FlagStore>,
    config: OrchestratorConfig,
    status: watch::Sender<PaymentStatus>,
    readiness_tx: watch::Sender<Option<ReadinessResult>>,
    reset_task: Mutex<Option<JoinHandle<()>>>,
}

impl<S, P, R> Inner<S, P, R> {
    /// Atomically claims the machine for a new attempt.
    ///
    /// Succeeds from `Idle` and from either terminal state (cancelling the
    /// pending reset timer); previous signature and error are cleared so
    /// error display is scoped to the most recent attempt.
    fn try_begin(&self) -> bool {
        let mut begun = false;
        self.status.send_modify(|status| {
            if status.state.accepts_new_attempt() {
                *status = PaymentStatus::connecting();
                begun = true;
            }
        });
        if begun {
            self.cancel_reset();
        }
        begun
    }

    fn set_state(&self, state: PaymentState) {
        tracing::debug!(?state, "payment state transition");
        self.status.send_modify(|status| status.state = state);
    }

    fn finish_success(&self, signature: Signature) {
        tracing::info!(%signature, "payment submitted");
        self.status.send_modify(|status| {
            *status = PaymentStatus {
                state: PaymentState::Success,
                signature: Some(signature),
                error: None,
            };
        });
        self.schedule_reset();
    }

    fn finish_error(&self, error: &PayError) {
        tracing::warn!(%error, "payment attempt failed");
        self.status.send_modify(|status| {
            *status = PaymentStatus {
                state: PaymentState::Error,
                signature: None,
                error: Some(error.to_string()),
            };
        });
        self.schedule_reset();
    }

    /// Starts the terminal-state observation timer. When it elapses
    /// undisturbed the status returns to idle with signature and error
    /// cleared; a new attempt cancels it first via [`Self::cancel_reset`].
    fn schedule_reset(&self) {
        let status = self.status.clone();
        let window = self.config.reset_window;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            status.send_modify(|status| {
                if matches!(status.state, PaymentState::Success | PaymentState::Error) {
                    *status = PaymentStatus::idle();
                }
            });
        });
        let mut guard = self
            .reset_task
            .lock()
            .expect("reset timer lock poisoned");
        if let Some(previous) = guard.replace(handle) {
            previous.abort();
        }
    }

    fn cancel_reset(&self) {
        let mut guard = self
            .reset_task
            .lock()
            .expect("reset timer lock poisoned");
        if let Some(handle) = guard.take() {
            handle.abort();
        }
    }
}

impl<S, P, R> Inner<S, P, R>
where
    S: SessionSdk,
{
    /// Ensures an active session, connecting only when none exists, and
    /// returns the payer's wallet address.
    async fn ensure_session(&self, fee_mode: FeeMode) -> Result<WalletAddress, PayError> {
        if !self.sdk.is_connected() {
            self.sdk
                .connect(ConnectOptions { fee_mode })
                .await
                .map_err(|err| PayError::SessionUnavailable(err.to_string()))?;
        }
        let address = self.sdk.wallet_address().ok_or_else(|| {
            PayError::SessionUnavailable("no wallet address after connect".to_owned())
        })?;
        // Presence hint only; the SDK handshake stays the authority.
        self.flags.insert(SESSION_PRESENT_KEY);
        Ok(address)
    }
}

/// Drives a payment attempt from user intent to a terminal state.
///
/// Generic over the three external seams: the session SDK, the instruction
/// planner, and the advisory readiness probe. Cheap to clone; clones share
/// state, so one instance per UI surface serializes attempts at the source.
pub struct PaymentOrchestrator<S, P, R> {
    inner: Arc<Inner<S, P, R>>,
}

impl<S, P, R> Clone for PaymentOrchestrator<S, P, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, P, R> std::fmt::Debug for PaymentOrchestrator<S, P, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentOrchestrator")
            .field("status", &self.inner.status.borrow().clone())
            .finish_non_exhaustive()
    }
}

impl<S, P, R> PaymentOrchestrator<S, P, R>
where
    S: SessionSdk + 'static,
    P: InstructionPlanner<Instruction = S::Instruction> + 'static,
    R: ReadinessProbe + 'static,
{
    /// Creates an orchestrator in the idle state.
    #[must_use]
    pub fn new(
        sdk: S,
        planner: P,
        readiness: R,
        flags: Arc<dyn FlagStore>,
        config: OrchestratorConfig,
    ) -> Self {
        let (status, _) = watch::channel(PaymentStatus::idle());
        let (readiness_tx, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                sdk,
                planner,
                readiness,
                flags,
                config,
                status,
                readiness_tx,
                reset_task: Mutex::new(None),
            }),
        }
    }

    /// Runs one payment attempt end to end.
    ///
    /// The SDK submit operation is called at most once per attempt; there
    /// is no automatic retry — a retry is a new user-initiated call.
    ///
    /// # Errors
    ///
    /// Returns [`PayError::AttemptInFlight`] (without touching any state or
    /// the SDK) when another attempt is running, and the classified attempt
    /// failure otherwise. Failures are also mirrored into the status.
    pub async fn pay(&self, request: PaymentRequest) -> Result<Signature, PayError> {
        if !self.inner.try_begin() {
            return Err(PayError::AttemptInFlight);
        }
        match self.drive(request).await {
            Ok(signature) => {
                self.inner.finish_success(signature.clone());
                Ok(signature)
            }
            Err(err) => {
                self.inner.finish_error(&err);
                Err(err)
            }
        }
    }

    async fn drive(&self, request: PaymentRequest) -> Result<Signature, PayError> {
        let inner = &self.inner;

        // Connecting
        let sender = inner.ensure_session(inner.config.fee_mode).await?;

        // Advisory only: surfaced as guidance, never a gate on submission.
        let snapshot = inner.readiness.check(&sender).await;
        tracing::debug!(advice = ?snapshot.advice, "readiness advisory");
        inner.readiness_tx.send_replace(Some(snapshot));

        // Authenticating
        inner.set_state(PaymentState::Authenticating);
        let instructions = inner
            .planner
            .plan(
                Some(&sender),
                request.recipient(),
                request.asset(),
                request.amount(),
            )
            .await?;

        // Processing: the single submit call for this attempt.
        inner.set_state(PaymentState::Processing);
        let submit = SubmitRequest {
            instructions: instructions.into_vec(),
            transaction_options: TransactionOptions {
                fee_token: inner.config.fee_token_for(request.asset()),
                compute_unit_limit: inner.config.compute_unit_limit,
            },
        };
        inner
            .sdk
            .sign_and_send_transaction(submit)
            .await
            .map_err(|err| classify_submission_failure(&err.to_string()))
    }

    /// Disconnects the session and clears everything the core caches: the
    /// session-presence hint, the readiness "already checked" markers, the
    /// readiness snapshot, and any terminal status.
    ///
    /// # Errors
    ///
    /// Returns [`PayError::SessionUnavailable`] when the SDK rejects the
    /// disconnect; local state is cleared regardless.
    pub async fn disconnect(&self) -> Result<(), PayError> {
        let result = self
            .inner
            .sdk
            .disconnect()
            .await
            .map_err(|err| PayError::SessionUnavailable(err.to_string()));
        self.inner.flags.clear();
        self.inner.readiness_tx.send_replace(None);
        self.inner.cancel_reset();
        self.inner.status.send_replace(PaymentStatus::idle());
        result
    }

    /// Whether a silent reconnect is worth attempting on startup.
    #[must_use]
    pub fn should_attempt_reconnect(&self) -> bool {
        !self.inner.sdk.is_connected() && self.inner.flags.contains(SESSION_PRESENT_KEY)
    }

    /// Current status snapshot.
    #[must_use]
    pub fn current_status(&self) -> PaymentStatus {
        self.inner.status.borrow().clone()
    }

    /// Subscribes to status changes.
    #[must_use]
    pub fn subscribe_status(&self) -> watch::Receiver<PaymentStatus> {
        self.inner.status.subscribe()
    }

    /// Latest readiness snapshot, independent of payment attempts.
    #[must_use]
    pub fn readiness_snapshot(&self) -> Option<ReadinessResult> {
        self.inner.readiness_tx.borrow().clone()
    }

    /// Subscribes to readiness snapshot changes.
    #[must_use]
    pub fn subscribe_readiness(&self) -> watch::Receiver<Option<ReadinessResult>> {
        self.inner.readiness_tx.subscribe()
    }

    /// Runs the advisory readiness check for the connected wallet and
    /// publishes the snapshot. Returns `None` when no wallet is connected.
    pub async fn refresh_readiness(&self) -> Option<ReadinessResult> {
        let address = self.inner.sdk.wallet_address()?;
        let snapshot = self.inner.readiness.check(&address).await;
        self.inner.readiness_tx.send_replace(Some(snapshot.clone()));
        Some(snapshot)
    }

    /// Spawns a background task re-running the advisory readiness check on
    /// an interval. Refresh failures are swallowed inside the probe and
    /// never reach the orchestrator. Abort the handle to stop it.
    pub fn spawn_readiness_refresh(&self, interval: Duration) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Some(address) = inner.sdk.wallet_address() {
                    let snapshot = inner.readiness.check(&address).await;
                    inner.readiness_tx.send_replace(Some(snapshot));
                }
            }
        })
    }
}
