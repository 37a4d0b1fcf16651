pub mod custom;
pub mod processor;
pub mod types;

pub use custom::DroppedEdit;
pub use processor::{apply, apply_request, Applied};
pub use types::{
    AssetType, CustomEdit, LoanTerm, PaymentMethod, Transaction, TransactionKind,
    TransactionRequest,
};
