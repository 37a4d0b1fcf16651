use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::EngineConfig;
use crate::history::RecordedTransaction;
use crate::ratios::{BalanceCheck, RatioReport};
use crate::state::FinancialState;
use crate::statements::FullStatements;
use crate::transactions::TransactionRequest;
use crate::types::{with_metadata, ComputationOutput};
use crate::StatementResult;

/// A batch run: start from the configured seed, record every request in
/// order, then undo the newest `undo` transactions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchInput {
    #[serde(default)]
    pub config: EngineConfig,
    #[serde(default)]
    pub transactions: Vec<TransactionRequest>,
    #[serde(default)]
    pub undo: usize,
}

impl BatchInput {
    /// Parse a batch document. Shape errors surface as
    /// [`crate::StatementError::SerializationError`]; individual transactions
    /// are only validated when the batch runs.
    pub fn from_json(json: &str) -> StatementResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutput {
    pub statements: FullStatements,
    pub ratios: RatioReport,
    pub balance_check: BalanceCheck,
    pub transactions: Vec<RecordedTransaction>,
    pub undone: Vec<RecordedTransaction>,
}

/// Run a batch. The first rejected request aborts the whole run.
pub fn run_batch(input: &BatchInput) -> StatementResult<ComputationOutput<BatchOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let mut state = FinancialState::new(input.config.clone())?;
    let recorded = state.replay(&input.transactions)?;

    for (outcome, request) in recorded.iter().zip(&input.transactions) {
        for dropped in &outcome.dropped_edits {
            warnings.push(format!(
                "Transaction {} ({}): edit #{} skipped: {}",
                outcome.id, request.kind, dropped.index, dropped.reason
            ));
        }
    }

    let mut undone = Vec::new();
    for _ in 0..input.undo {
        match state.undo() {
            Some(tx) => undone.push(tx),
            None => {
                warnings.push(format!(
                    "Requested {} undo step(s) but only {} transaction(s) were recorded",
                    input.undo,
                    undone.len()
                ));
                break;
            }
        }
    }

    let balance_check = state.balance_check();
    if !balance_check.balanced {
        warnings.push(format!(
            "Balance sheet out of balance: assets minus liabilities and equity is {}",
            balance_check.difference
        ));
    }

    let output = BatchOutput {
        statements: state.statements().clone(),
        ratios: *state.ratios(),
        balance_check,
        transactions: state.transactions().to_vec(),
        undone,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Linked three-statement transaction engine with snapshot undo",
        &serde_json::json!({
            "transactionsSubmitted": input.transactions.len(),
            "undoRequested": input.undo,
            "loanSplit": input.config.loan_split,
        }),
        warnings,
        elapsed,
        output,
    ))
}
