pub mod history;
pub mod ratios;
pub mod statements;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use statement_engine_core::batch::BatchInput;
use statement_engine_core::{EngineConfig, TransactionRequest};

use crate::input;

/// Shapes accepted by `--input`: a full batch, a bare list of
/// transactions, or a single transaction.
#[derive(Deserialize)]
#[serde(untagged)]
enum InputDocument {
    Batch(BatchDocument),
    Many(Vec<TransactionRequest>),
    One(TransactionRequest),
}

/// A batch document must name its `transactions`, which keeps a single
/// transaction object from being read as an empty batch.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchDocument {
    #[serde(default)]
    config: Option<EngineConfig>,
    transactions: Vec<TransactionRequest>,
    #[serde(default)]
    undo: usize,
}

impl From<InputDocument> for BatchInput {
    fn from(doc: InputDocument) -> Self {
        match doc {
            InputDocument::Batch(batch) => BatchInput {
                config: batch.config.unwrap_or_default(),
                transactions: batch.transactions,
                undo: batch.undo,
            },
            InputDocument::Many(transactions) => BatchInput {
                transactions,
                ..BatchInput::default()
            },
            InputDocument::One(transaction) => BatchInput {
                transactions: vec![transaction],
                ..BatchInput::default()
            },
        }
    }
}

/// Load `--config` if given. Validation happens when the engine is built.
pub fn load_config(path: Option<&str>) -> Result<Option<EngineConfig>, Box<dyn std::error::Error>> {
    path.map(input::file::read_document::<EngineConfig>)
        .transpose()
}

/// Build a batch from `--input` or stdin. A `--config` file takes
/// precedence over a `config` block inside the batch document.
pub fn load_batch(
    input_path: Option<&str>,
    config_path: Option<&str>,
    command: &str,
) -> Result<BatchInput, Box<dyn std::error::Error>> {
    let doc: InputDocument = if let Some(path) = input_path {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value::<InputDocument>(data)?
    } else {
        return Err(format!("--input <file.json|file.yaml> or stdin required for {command}").into());
    };

    let mut batch = BatchInput::from(doc);
    if let Some(config) = load_config(config_path)? {
        batch.config = config;
    }
    debug!(
        command,
        transactions = batch.transactions.len(),
        undo = batch.undo,
        "loaded batch"
    );
    Ok(batch)
}

/// Replace the envelope's `result` with the listed fields only.
pub fn select_result(mut envelope: Value, keys: &[&str]) -> Value {
    if let Some(Value::Object(result)) = envelope.get_mut("result") {
        result.retain(|key, _| keys.contains(&key.as_str()));
    }
    envelope
}
