use clap::Args;
use serde_json::Value;

use statement_engine_core::batch::{run_batch, BatchInput};

use super::{load_batch, load_config};

/// Arguments for applying transactions
#[derive(Args)]
pub struct ApplyArgs {
    /// Path to a JSON or YAML transaction, list of transactions, or batch
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_init(config: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    let batch = BatchInput {
        config: load_config(config)?.unwrap_or_default(),
        ..BatchInput::default()
    };
    let result = run_batch(&batch)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_apply(args: ApplyArgs, config: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    let batch = load_batch(args.input.as_deref(), config, "apply")?;
    let result = run_batch(&batch)?;
    Ok(serde_json::to_value(result)?)
}
