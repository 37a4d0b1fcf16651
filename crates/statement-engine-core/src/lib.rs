pub mod batch;
pub mod config;
pub mod error;
pub mod history;
pub mod ratios;
pub mod state;
pub mod statements;
pub mod transactions;
pub mod types;

pub use config::{EngineConfig, LoanSplit};
pub use error::StatementError;
pub use history::{HistoryEntry, HistoryState, RecordedTransaction};
pub use ratios::{BalanceCheck, RatioReport};
pub use state::{FinancialState, PublishedSnapshot, SharedFinancialState, StateView};
pub use statements::{recompute, try_recompute, FullStatements, Statements};
pub use transactions::{Transaction, TransactionKind, TransactionRequest};
pub use types::*;

/// Standard result type for all statement-engine operations
pub type StatementResult<T> = Result<T, StatementError>;
