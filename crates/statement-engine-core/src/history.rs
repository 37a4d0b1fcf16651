use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::statements::FullStatements;
use crate::transactions::Transaction;

/// A transaction as it sits in the log.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedTransaction {
    /// Sequential, 1-based. Reissued after an undo.
    pub id: u64,
    pub date: DateTime<Utc>,
    #[serde(flatten)]
    pub transaction: Transaction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Snapshot of the published statements right after one transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub statements: FullStatements,
    pub transaction: RecordedTransaction,
}

/// Where the log stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryState {
    Empty,
    NonEmpty(usize),
}

/// Append-only transaction log with one snapshot per transaction.
///
/// Both sequences grow and shrink together, so their lengths are always
/// equal.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    transactions: Vec<RecordedTransaction>,
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> HistoryState {
        match self.entries.len() {
            0 => HistoryState::Empty,
            n => HistoryState::NonEmpty(n),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn transactions(&self) -> &[RecordedTransaction] {
        &self.transactions
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Id the next recorded transaction will receive.
    pub fn next_id(&self) -> u64 {
        self.transactions.len() as u64 + 1
    }

    /// Append a transaction and the statements it produced.
    pub fn record(
        &mut self,
        transaction: Transaction,
        description: Option<String>,
        statements: FullStatements,
        at: DateTime<Utc>,
    ) -> &RecordedTransaction {
        let recorded = RecordedTransaction {
            id: self.next_id(),
            date: at,
            transaction,
            description,
        };

        self.entries.push(HistoryEntry {
            timestamp: at,
            statements,
            transaction: recorded.clone(),
        });
        self.transactions.push(recorded);

        &self.transactions[self.transactions.len() - 1]
    }

    /// Drop the newest entry. Returns the removed transaction, or `None` when
    /// the log was already empty.
    pub fn undo(&mut self) -> Option<RecordedTransaction> {
        self.entries.pop()?;
        self.transactions.pop()
    }

    /// Statements published by the newest entry; `None` once the log is
    /// empty and the seed applies.
    pub fn latest(&self) -> Option<&FullStatements> {
        self.entries.last().map(|entry| &entry.statements)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.transactions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statements::{canonical_seed, recompute};
    use rust_decimal_macros::dec;

    fn dividend(amount: i64) -> Transaction {
        Transaction::Dividend {
            amount: amount.into(),
        }
    }

    #[test]
    fn test_record_assigns_sequential_ids() {
        let mut history = History::new();
        let full = recompute(canonical_seed());

        assert_eq!(history.state(), HistoryState::Empty);
        let first = history.record(dividend(1), None, full.clone(), Utc::now()).id;
        let second = history.record(dividend(2), None, full, Utc::now()).id;

        assert_eq!((first, second), (1, 2));
        assert_eq!(history.state(), HistoryState::NonEmpty(2));
        assert_eq!(history.transactions().len(), history.entries().len());
    }

    #[test]
    fn test_undo_exposes_preceding_snapshot() {
        let mut history = History::new();
        let mut first = canonical_seed();
        first.balance_sheet.assets.current_assets.cash = dec!(1);
        let mut second = canonical_seed();
        second.balance_sheet.assets.current_assets.cash = dec!(2);

        history.record(dividend(1), None, recompute(first.clone()), Utc::now());
        history.record(dividend(2), None, recompute(second), Utc::now());

        let undone = history.undo().unwrap();
        assert_eq!(undone.id, 2);
        assert_eq!(history.latest(), Some(&recompute(first)));

        assert_eq!(history.undo().map(|t| t.id), Some(1));
        assert_eq!(history.latest(), None);
        assert_eq!(history.state(), HistoryState::Empty);

        assert_eq!(history.undo(), None);
        assert!(history.transactions().is_empty());
    }

    #[test]
    fn test_ids_are_reissued_after_undo() {
        let mut history = History::new();
        let full = recompute(canonical_seed());
        history.record(dividend(1), None, full.clone(), Utc::now());
        history.record(dividend(2), None, full.clone(), Utc::now());
        history.undo();

        let id = history.record(dividend(3), None, full, Utc::now()).id;
        assert_eq!(id, 2);
    }

    #[test]
    fn test_recorded_transaction_serialises_flat() {
        let mut history = History::new();
        let recorded = history
            .record(
                dividend(5),
                Some("Q3 payout".into()),
                recompute(canonical_seed()),
                Utc::now(),
            )
            .clone();
        let value = serde_json::to_value(&recorded).unwrap();

        assert_eq!(value["id"], 1);
        assert_eq!(value["type"], "dividend");
        assert_eq!(value["amount"], "5");
        assert_eq!(value["description"], "Q3 payout");
    }
}
