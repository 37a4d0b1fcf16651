use clap::Args;
use serde_json::Value;

use statement_engine_core::batch::run_batch;

use super::{load_batch, select_result};

/// Arguments for the ratio report
#[derive(Args)]
pub struct RatiosArgs {
    /// Path to a JSON or YAML transaction, list of transactions, or batch
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_ratios(args: RatiosArgs, config: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    let batch = load_batch(args.input.as_deref(), config, "ratios")?;
    let result = run_batch(&batch)?;
    Ok(select_result(
        serde_json::to_value(result)?,
        &["ratios", "balanceCheck"],
    ))
}
