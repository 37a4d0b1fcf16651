use clap::Args;
use serde_json::Value;

use statement_engine_core::batch::run_batch;

use super::{load_batch, select_result};

/// Arguments for the transaction log
#[derive(Args)]
pub struct HistoryArgs {
    /// Path to a JSON or YAML transaction, list of transactions, or batch
    #[arg(long)]
    pub input: Option<String>,

    /// Undo the newest N transactions after applying (overrides the batch's `undo`)
    #[arg(long)]
    pub undo: Option<usize>,
}

pub fn run_history(args: HistoryArgs, config: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    let mut batch = load_batch(args.input.as_deref(), config, "history")?;
    if let Some(undo) = args.undo {
        batch.undo = undo;
    }

    let result = run_batch(&batch)?;
    let count = result.result.transactions.len();

    let mut value = select_result(serde_json::to_value(result)?, &["transactions", "undone"]);
    if let Some(Value::Object(map)) = value.get_mut("result") {
        map.insert("transactionCount".into(), count.into());
    }
    Ok(value)
}
