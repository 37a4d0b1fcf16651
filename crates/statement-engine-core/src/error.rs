use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatementError {
    #[error("Unknown transaction kind: '{kind}'")]
    UnknownTransactionKind { kind: String },

    #[error("Malformed {kind} transaction: {reason}")]
    MalformedTransaction { kind: String, reason: String },

    #[error("Unknown custom target: {statement}.{account}.{sub_account}")]
    UnknownCustomTarget {
        statement: String,
        account: String,
        sub_account: String,
    },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for StatementError {
    fn from(e: serde_json::Error) -> Self {
        StatementError::SerializationError(e.to_string())
    }
}

impl StatementError {
    pub(crate) fn malformed(kind: &str, reason: impl Into<String>) -> Self {
        StatementError::MalformedTransaction {
            kind: kind.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(context: impl Into<String>) -> Self {
        StatementError::Overflow {
            context: context.into(),
        }
    }
}
