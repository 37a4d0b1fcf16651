pub mod accounts;
pub mod derived;
pub mod model;
pub mod seed;

pub use accounts::AccountGroup;
pub use derived::{
    recompute, try_recompute, BalanceSheetTotals, CashFlowTotals, DerivedValues, FullStatements,
    IncomeStatementTotals,
};
pub use model::*;
pub use seed::canonical_seed;
