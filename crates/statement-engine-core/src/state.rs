use chrono::Utc;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::history::{History, HistoryEntry, HistoryState, RecordedTransaction};
use crate::ratios::{balance_check, ratios, BalanceCheck, RatioReport};
use crate::statements::{recompute, try_recompute, FullStatements};
use crate::transactions::{apply, DroppedEdit, Transaction, TransactionRequest};
use crate::StatementResult;

pub type SubscriptionId = u64;

/// Called after every published change.
pub type Observer = Box<dyn Fn(&StateView<'_>) + Send + Sync>;

/// Called by [`SharedFinancialState`] after a change, once its lock is released.
pub type SharedObserver = Arc<dyn Fn(&PublishedSnapshot) + Send + Sync>;

/// Read-only view of the published aggregate.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateView<'a> {
    pub statements: &'a FullStatements,
    pub ratios: &'a RatioReport,
    pub transactions: &'a [RecordedTransaction],
    pub history: &'a [HistoryEntry],
}

/// Outcome of a successfully recorded transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recorded {
    pub id: u64,
    pub dropped_edits: Vec<DroppedEdit>,
}

/// The aggregate root: current statements, their ratios, and the
/// transaction/snapshot logs.
///
/// All transitions take `&mut self`, so one mutation runs to completion
/// before the next can start. The published statements and ratios are
/// always a fully recomputed pair.
pub struct FinancialState {
    config: EngineConfig,
    statements: FullStatements,
    ratios: RatioReport,
    history: History,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: SubscriptionId,
}

impl fmt::Debug for FinancialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinancialState")
            .field("statements", &self.statements)
            .field("history", &self.history.state())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for FinancialState {
    fn default() -> Self {
        Self::seeded(EngineConfig::default())
    }
}

impl FinancialState {
    /// Build a state initialised from `config.seed`.
    pub fn new(config: EngineConfig) -> StatementResult<Self> {
        config.validate()?;
        Ok(Self::seeded(config))
    }

    // `config` has been validated, so its seed always recomputes.
    fn seeded(config: EngineConfig) -> Self {
        let statements = recompute(config.seed.clone());
        let ratios = ratios(&statements);
        FinancialState {
            config,
            statements,
            ratios,
            history: History::new(),
            observers: Vec::new(),
            next_subscription: 1,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Restore the recomputed seed and clear both logs.
    pub fn initialize(&mut self) {
        self.restore_seed();
        info!("initialized statements from seed");
        self.publish();
    }

    /// Validate and record a request. A rejected request, or one whose
    /// amounts would overflow an account, leaves the published state and
    /// both logs untouched.
    pub fn record_transaction(&mut self, request: &TransactionRequest) -> StatementResult<Recorded> {
        request
            .parse()
            .and_then(|transaction| self.commit(transaction, request.description.clone()))
            .inspect_err(|e| {
                warn!(kind = %request.kind, error = %e, "rejected transaction");
            })
    }

    /// Record an already-validated transaction.
    pub fn record(&mut self, transaction: Transaction) -> StatementResult<Recorded> {
        let kind = transaction.kind();
        self.commit(transaction, None).inspect_err(|e| {
            warn!(%kind, error = %e, "rejected transaction");
        })
    }

    /// Record requests in order, stopping at the first rejection. Requests
    /// before the rejected one stay recorded.
    pub fn replay<'a, I>(&mut self, requests: I) -> StatementResult<Vec<Recorded>>
    where
        I: IntoIterator<Item = &'a TransactionRequest>,
    {
        requests
            .into_iter()
            .map(|request| self.record_transaction(request))
            .collect()
    }

    /// Roll back the newest transaction by restoring the previous snapshot
    /// (or the seed when none is left). No-op on an empty log.
    pub fn undo(&mut self) -> Option<RecordedTransaction> {
        let undone = self.history.undo()?;
        self.statements = match self.history.latest() {
            Some(snapshot) => snapshot.clone(),
            None => recompute(self.config.seed.clone()),
        };
        info!(id = undone.id, kind = %undone.transaction.kind(), "undid transaction");
        self.publish();
        Some(undone)
    }

    /// Restore the recomputed seed and clear both logs.
    pub fn reset(&mut self) {
        self.restore_seed();
        info!("reset statements to seed");
        self.publish();
    }

    fn restore_seed(&mut self) {
        self.statements = recompute(self.config.seed.clone());
        self.history.clear();
    }

    fn commit(
        &mut self,
        transaction: Transaction,
        description: Option<String>,
    ) -> StatementResult<Recorded> {
        let applied = apply(self.statements.raw(), &transaction, &self.config.loan_split)?;
        let statements = try_recompute(applied.statements)?;
        let kind = transaction.kind();

        let id = self
            .history
            .record(transaction, description, statements.clone(), Utc::now())
            .id;
        self.statements = statements;
        info!(id, %kind, dropped = applied.dropped_edits.len(), "recorded transaction");
        self.publish();

        Ok(Recorded {
            id,
            dropped_edits: applied.dropped_edits,
        })
    }

    fn publish(&mut self) {
        self.ratios = ratios(&self.statements);
        let view = self.view();
        for (_, observer) in &self.observers {
            observer(&view);
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn view(&self) -> StateView<'_> {
        StateView {
            statements: &self.statements,
            ratios: &self.ratios,
            transactions: self.history.transactions(),
            history: self.history.entries(),
        }
    }

    pub fn statements(&self) -> &FullStatements {
        &self.statements
    }

    pub fn ratios(&self) -> &RatioReport {
        &self.ratios
    }

    pub fn balance_check(&self) -> BalanceCheck {
        balance_check(&self.statements)
    }

    pub fn transactions(&self) -> &[RecordedTransaction] {
        self.history.transactions()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    pub fn history_state(&self) -> HistoryState {
        self.history.state()
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: Fn(&StateView<'_>) + Send + Sync + 'static,
    {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns whether a subscription was removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }
}

// ---------------------------------------------------------------------------
// Shared handle
// ---------------------------------------------------------------------------

/// Owned copy of the published statements and ratios.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedSnapshot {
    pub statements: FullStatements,
    pub ratios: RatioReport,
    pub transaction_count: usize,
}

impl PublishedSnapshot {
    fn of(state: &FinancialState) -> Self {
        PublishedSnapshot {
            statements: state.statements.clone(),
            ratios: state.ratios,
            transaction_count: state.transactions().len(),
        }
    }
}

/// Cloneable handle for hosts that touch one state from several threads.
///
/// Each transition holds the write lock for its whole duration. Observers
/// registered here receive the snapshot that transition published, after
/// the lock is released, so they may read or write through the handle.
#[derive(Clone, Default)]
pub struct SharedFinancialState {
    inner: Arc<RwLock<FinancialState>>,
    observers: Arc<RwLock<Vec<(SubscriptionId, SharedObserver)>>>,
    next_subscription: Arc<AtomicU64>,
}

impl SharedFinancialState {
    pub fn new(state: FinancialState) -> Self {
        SharedFinancialState {
            inner: Arc::new(RwLock::new(state)),
            observers: Arc::default(),
            next_subscription: Arc::default(),
        }
    }

    pub fn record_transaction(&self, request: &TransactionRequest) -> StatementResult<Recorded> {
        let (recorded, published) = {
            let mut state = self.write();
            let recorded = state.record_transaction(request)?;
            (recorded, self.capture(&state))
        };
        self.notify(published);
        Ok(recorded)
    }

    pub fn undo(&self) -> Option<RecordedTransaction> {
        let (undone, published) = {
            let mut state = self.write();
            let undone = state.undo()?;
            (undone, self.capture(&state))
        };
        self.notify(published);
        Some(undone)
    }

    pub fn reset(&self) {
        let published = {
            let mut state = self.write();
            state.reset();
            self.capture(&state)
        };
        self.notify(published);
    }

    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&PublishedSnapshot) + Send + Sync + 'static,
    {
        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed) + 1;
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(observer)));
        id
    }

    /// Returns whether a subscription was removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.write().unwrap_or_else(PoisonError::into_inner);
        let before = observers.len();
        observers.retain(|(sid, _)| *sid != id);
        observers.len() != before
    }

    pub fn snapshot(&self) -> PublishedSnapshot {
        PublishedSnapshot::of(&self.read())
    }

    /// Run `f` against the state under the read lock.
    pub fn with<R>(&self, f: impl FnOnce(&FinancialState) -> R) -> R {
        f(&self.read())
    }

    fn observers(&self) -> Vec<SharedObserver> {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }

    // Copied while the write lock is still held, so each observer sees
    // exactly what its transition published.
    fn capture(&self, state: &FinancialState) -> Option<PublishedSnapshot> {
        if self.observers.read().unwrap_or_else(PoisonError::into_inner).is_empty() {
            None
        } else {
            Some(PublishedSnapshot::of(state))
        }
    }

    fn notify(&self, published: Option<PublishedSnapshot>) {
        let Some(snapshot) = published else {
            return;
        };
        for observer in self.observers() {
            observer(&snapshot);
        }
    }

    // A panicking observer poisons the lock; the state itself is still
    // consistent because publish runs after every field is assigned.
    fn read(&self) -> RwLockReadGuard<'_, FinancialState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FinancialState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatementError;
    use crate::statements::canonical_seed;
    use crate::types::Money;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn sale(amount: i64) -> TransactionRequest {
        TransactionRequest::new("sale")
            .amount(amount)
            .payment_method("cash")
    }

    #[test]
    fn test_new_state_publishes_recomputed_seed() {
        let state = FinancialState::default();
        assert_eq!(state.statements(), &recompute(canonical_seed()));
        assert_eq!(state.history_state(), HistoryState::Empty);
        assert_eq!(state.ratios(), &ratios(&recompute(canonical_seed())));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = EngineConfig::default();
        config.loan_split.interest_share = dec!(-0.1);
        assert!(FinancialState::new(config).is_err());
    }

    #[test]
    fn test_observers_see_every_published_change() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut state = FinancialState::default();
        let counter = Arc::clone(&calls);
        let id = state.subscribe(move |view| {
            assert_eq!(view.transactions.len(), view.history.len());
            counter.fetch_add(1, Ordering::SeqCst);
        });

        state.record_transaction(&sale(100)).unwrap();
        state.undo();
        state.reset();
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        // Rejections and no-op undos publish nothing.
        assert!(state.record_transaction(&TransactionRequest::new("foo")).is_err());
        assert!(state.undo().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        assert!(state.unsubscribe(id));
        assert!(!state.unsubscribe(id));
        state.record_transaction(&sale(100)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_observer_ratios_match_published_statements() {
        let mut state = FinancialState::default();
        state.subscribe(|view| {
            assert_eq!(view.ratios, &ratios(view.statements));
        });
        state.record_transaction(&sale(2500)).unwrap();
    }

    #[test]
    fn test_replay_stops_at_first_rejection() {
        let mut state = FinancialState::default();
        let requests = vec![sale(10), TransactionRequest::new("loan"), sale(20)];

        assert!(state.replay(&requests).is_err());
        assert_eq!(state.transactions().len(), 1);
        assert_eq!(
            state.statements().raw().income_statement.revenue,
            dec!(200010)
        );
    }

    #[test]
    fn test_overflowing_amount_is_rejected_without_publishing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut state = FinancialState::default();
        let counter = Arc::clone(&calls);
        state.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        state.record_transaction(&sale(100)).unwrap();
        let before = state.statements().clone();

        let huge = TransactionRequest::from_value(serde_json::json!({
            "type": "sale",
            "amount": "79228162514264337593543950000",
            "paymentMethod": "cash"
        }))
        .unwrap();
        match state.record_transaction(&huge) {
            Err(StatementError::Overflow { .. }) => {}
            other => panic!("expected Overflow, got {other:?}"),
        }

        assert_eq!(state.statements(), &before);
        assert_eq!(state.transactions().len(), 1);
        assert_eq!(state.history().len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_shared_state_survives_an_overflowing_amount() {
        let shared = SharedFinancialState::default();
        let huge = TransactionRequest::new("sale")
            .amount(Money::MAX.to_string())
            .payment_method("cash");

        assert!(matches!(
            shared.record_transaction(&huge),
            Err(StatementError::Overflow { .. })
        ));
        shared.record_transaction(&sale(10)).unwrap();

        let snapshot = shared.snapshot();
        assert_eq!(snapshot.transaction_count, 1);
        assert_eq!(
            snapshot.statements.raw().balance_sheet.assets.current_assets.cash,
            dec!(50010)
        );
    }

    #[test]
    fn test_shared_observers_may_read_and_write_through_the_handle() {
        let shared = SharedFinancialState::default();
        let seen = Arc::new(RwLock::new(Vec::new()));

        let handle = shared.clone();
        let log = Arc::clone(&seen);
        let id = shared.subscribe(move |published| {
            // Both calls take the lock the transition just released.
            let current = handle.snapshot();
            let count = handle.with(|state| state.transactions().len());
            log.write().unwrap().push((published.transaction_count, count));
            assert_eq!(current.transaction_count, count);
        });

        shared.record_transaction(&sale(5)).unwrap();
        shared.record_transaction(&sale(5)).unwrap();
        shared.undo();
        shared.reset();
        assert_eq!(*seen.read().unwrap(), vec![(1, 1), (2, 2), (1, 1), (0, 0)]);

        // A rejection publishes nothing, and neither does a removed observer.
        assert!(shared.record_transaction(&TransactionRequest::new("foo")).is_err());
        assert!(shared.unsubscribe(id));
        shared.record_transaction(&sale(5)).unwrap();
        assert_eq!(seen.read().unwrap().len(), 4);
    }

    #[test]
    fn test_shared_observer_can_record_a_follow_up() {
        let shared = SharedFinancialState::default();
        let handle = shared.clone();
        shared.subscribe(move |published| {
            if published.transaction_count == 1 {
                handle.record_transaction(&sale(1)).unwrap();
            }
        });

        shared.record_transaction(&sale(1)).unwrap();
        assert_eq!(shared.snapshot().transaction_count, 2);
    }

    #[test]
    fn test_shared_state_serialises_writers() {
        let shared = SharedFinancialState::default();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        shared.record_transaction(&sale(1)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = shared.snapshot();
        assert_eq!(snapshot.transaction_count, 100);
        assert_eq!(
            snapshot.statements.raw().balance_sheet.assets.current_assets.cash,
            dec!(50100)
        );
        assert_eq!(snapshot.ratios, ratios(&snapshot.statements));
        shared.with(|state| {
            let ids: Vec<u64> = state.transactions().iter().map(|t| t.id).collect();
            assert_eq!(ids, (1..=100).collect::<Vec<u64>>());
        });
    }
}
