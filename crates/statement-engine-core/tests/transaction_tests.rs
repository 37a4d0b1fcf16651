use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::json;

use statement_engine_core::{
    recompute, statements::canonical_seed, FinancialState, HistoryState, Ratio,
    SharedFinancialState, StatementError, TransactionRequest,
};

fn request(value: serde_json::Value) -> TransactionRequest {
    TransactionRequest::from_value(value).unwrap()
}

// ===========================================================================
// Worked examples
// ===========================================================================

#[test]
fn test_cash_sale_from_seed() {
    let mut state = FinancialState::default();
    state
        .record_transaction(&request(json!({
            "type": "sale", "amount": 1000, "paymentMethod": "cash"
        })))
        .unwrap();

    let raw = state.statements().raw();
    assert_eq!(raw.balance_sheet.assets.current_assets.cash, dec!(51000));
    assert_eq!(raw.income_statement.revenue, dec!(201000));
    assert_eq!(
        raw.balance_sheet.assets.current_assets.accounts_receivable,
        dec!(25000)
    );
}

#[test]
fn test_credit_purchase_from_seed() {
    let mut state = FinancialState::default();
    state
        .record_transaction(&request(json!({
            "type": "purchase", "amount": 2000, "paymentMethod": "credit"
        })))
        .unwrap();

    let bs = &state.statements().raw().balance_sheet;
    assert_eq!(bs.assets.current_assets.inventory, dec!(32000));
    assert_eq!(bs.liabilities.current_liabilities.accounts_payable, dec!(22000));
    assert_eq!(bs.assets.current_assets.cash, dec!(50000));
}

#[test]
fn test_short_term_loan_payment_default_split() {
    let mut state = FinancialState::default();
    state
        .record_transaction(&request(json!({
            "type": "loan-payment", "amount": 1000, "term": "short-term"
        })))
        .unwrap();

    let raw = state.statements().raw();
    assert_eq!(
        raw.balance_sheet.liabilities.current_liabilities.short_term_debt,
        dec!(9200)
    );
    assert_eq!(raw.income_statement.interest_expense, dec!(7700));
    assert_eq!(raw.balance_sheet.assets.current_assets.cash, dec!(49000));
    assert_eq!(
        raw.cash_flow_statement.financing_activities.debt_repayment,
        dec!(-10800)
    );
}

#[test]
fn test_short_term_loan_from_seed() {
    let mut state = FinancialState::default();
    state
        .record_transaction(&request(json!({
            "type": "loan", "amount": 5000, "term": "short-term"
        })))
        .unwrap();

    let raw = state.statements().raw();
    assert_eq!(raw.balance_sheet.assets.current_assets.cash, dec!(55000));
    assert_eq!(
        raw.balance_sheet.liabilities.current_liabilities.short_term_debt,
        dec!(15000)
    );
    assert_eq!(
        raw.balance_sheet.liabilities.non_current_liabilities.long_term_debt,
        dec!(100000)
    );
    // Borrowing shares the financing bucket that repayments draw down.
    assert_eq!(
        raw.cash_flow_statement.financing_activities.debt_repayment,
        dec!(-5000)
    );
    assert_eq!(
        state.statements().derived().balance_sheet.total_current_liabilities,
        dec!(55000)
    );
}

#[test]
fn test_cash_purchase_from_seed() {
    let mut state = FinancialState::default();
    state
        .record_transaction(&request(json!({
            "type": "purchase", "amount": 1500, "paymentMethod": "cash"
        })))
        .unwrap();

    let raw = state.statements().raw();
    assert_eq!(raw.balance_sheet.assets.current_assets.inventory, dec!(31500));
    assert_eq!(raw.balance_sheet.assets.current_assets.cash, dec!(48500));
    assert_eq!(
        raw.balance_sheet.liabilities.current_liabilities.accounts_payable,
        dec!(20000)
    );
    assert_eq!(
        raw.cash_flow_statement.operating_activities.other_operating_adjustments,
        dec!(-500)
    );
    assert_eq!(
        raw.cash_flow_statement.operating_activities.change_in_accounts_payable,
        dec!(2000)
    );
}

#[test]
fn test_zero_loan_payment_breakdown_uses_default_split() {
    let mut state = FinancialState::default();
    state
        .record_transaction(&request(json!({
            "type": "loan-payment", "amount": 1000, "term": "short-term",
            "principal": 0, "interest": 0
        })))
        .unwrap();

    let raw = state.statements().raw();
    assert_eq!(
        raw.balance_sheet.liabilities.current_liabilities.short_term_debt,
        dec!(9200)
    );
    assert_eq!(raw.income_statement.interest_expense, dec!(7700));
}

#[test]
fn test_overflowing_sale_leaves_state_untouched() {
    let shared = SharedFinancialState::default();
    shared
        .record_transaction(&request(json!({"type": "dividend", "amount": 100})))
        .unwrap();
    let before = shared.snapshot();

    let err = shared
        .record_transaction(&request(json!({
            "type": "sale", "amount": "79228162514264337593543950000", "paymentMethod": "cash"
        })))
        .unwrap_err();

    assert!(matches!(err, StatementError::Overflow { .. }));
    assert_eq!(shared.snapshot(), before);
    shared.with(|state| assert_eq!(state.history().len(), 1));

    // The handle stays usable afterwards.
    shared
        .record_transaction(&request(json!({"type": "sale", "amount": 50, "paymentMethod": "cash"})))
        .unwrap();
    assert_eq!(shared.snapshot().transaction_count, 2);
}

#[test]
fn test_depreciation_is_non_cash() {
    let mut state = FinancialState::default();
    state
        .record_transaction(&request(json!({"type": "depreciation", "amount": 500})))
        .unwrap();

    let raw = state.statements().raw();
    assert_eq!(raw.income_statement.operating_expenses.depreciation, dec!(8000));
    assert_eq!(
        raw.balance_sheet.assets.non_current_assets.accumulated_depreciation,
        dec!(-25500)
    );
    assert_eq!(
        raw.cash_flow_statement.operating_activities.depreciation,
        dec!(8000)
    );
    assert_eq!(raw.balance_sheet.assets.current_assets.cash, dec!(50000));

    // Net income falls by 500 and the add-back cancels it in operating cash flow.
    let cf = &state.statements().derived().cash_flow_statement;
    assert_eq!(cf.net_income, dec!(-3000));
    assert_eq!(cf.total_operating_cash_flow, dec!(1500));
}

#[test]
fn test_unknown_kind_leaves_state_untouched() {
    let mut state = FinancialState::default();
    state
        .record_transaction(&request(json!({"type": "dividend", "amount": 100})))
        .unwrap();
    let before = state.statements().clone();

    let err = state
        .record_transaction(&request(json!({"type": "foo", "amount": 100})))
        .unwrap_err();

    assert_eq!(err, StatementError::UnknownTransactionKind { kind: "foo".into() });
    assert_eq!(state.statements(), &before);
    assert_eq!(state.transactions().len(), 1);
    assert_eq!(state.history().len(), 1);
}

#[test]
fn test_malformed_transaction_leaves_state_untouched() {
    let mut state = FinancialState::default();
    let before = state.statements().clone();

    let err = state
        .record_transaction(&request(json!({"type": "sale", "amount": "ten"})))
        .unwrap_err();

    assert!(matches!(err, StatementError::MalformedTransaction { .. }));
    assert_eq!(state.statements(), &before);
    assert_eq!(state.history_state(), HistoryState::Empty);
}

#[test]
fn test_current_ratio_is_infinite_without_current_liabilities() {
    let mut state = FinancialState::default();
    // Clear every current liability through custom edits.
    state
        .record_transaction(&request(json!({
            "type": "custom",
            "affects": [
                {"statement": "balanceSheet", "account": "liabilities", "subAccount": "accountsPayable", "change": -20000},
                {"statement": "balanceSheet", "account": "liabilities", "subAccount": "shortTermDebt", "change": -10000},
                {"statement": "balanceSheet", "account": "liabilities", "subAccount": "accruedExpenses", "change": -8000},
                {"statement": "balanceSheet", "account": "liabilities", "subAccount": "deferredRevenue", "change": -5000},
                {"statement": "balanceSheet", "account": "liabilities", "subAccount": "taxesPayable", "change": -7000}
            ]
        })))
        .unwrap();

    assert_eq!(
        state.statements().derived().balance_sheet.total_current_liabilities,
        dec!(0)
    );
    assert_eq!(state.ratios().liquidity.current_ratio, Ratio::INFINITY);
}

// ===========================================================================
// History
// ===========================================================================

#[test]
fn test_undo_restores_prior_snapshot_exactly() {
    let mut state = FinancialState::default();
    state
        .record_transaction(&request(json!({"type": "loan", "amount": 5000, "term": "short-term"})))
        .unwrap();
    let after_first = state.statements().clone();
    let ratios_after_first = *state.ratios();

    state
        .record_transaction(&request(json!({
            "type": "asset-purchase", "amount": 3000, "assetType": "equipment"
        })))
        .unwrap();
    let undone = state.undo().unwrap();

    assert_eq!(undone.id, 2);
    assert_eq!(state.statements(), &after_first);
    assert_eq!(state.ratios(), &ratios_after_first);
    assert_eq!(state.history_state(), HistoryState::NonEmpty(1));
}

#[test]
fn test_undo_of_only_transaction_restores_seed() {
    let mut state = FinancialState::default();
    state
        .record_transaction(&request(json!({"type": "equity-investment", "amount": 1})))
        .unwrap();
    state.undo();

    assert_eq!(state.statements(), &recompute(canonical_seed()));
    assert_eq!(state.history_state(), HistoryState::Empty);
    assert!(state.undo().is_none());
}

#[test]
fn test_reset_then_replay_reproduces_final_statements() {
    let mut state = FinancialState::default();
    let requests: Vec<TransactionRequest> = vec![
        request(json!({"type": "sale", "amount": 1200, "paymentMethod": "credit", "cogs": 700})),
        request(json!({"type": "expense", "amount": 300, "expenseType": "rent", "paymentMethod": "cash"})),
        request(json!({"type": "loan", "amount": 8000})),
        request(json!({"type": "loan-payment", "amount": 500, "principal": 450, "interest": 50})),
        request(json!({"type": "dividend", "amount": 250})),
    ];
    state.replay(&requests).unwrap();
    let final_statements = state.statements().clone();

    let log: Vec<_> = state.transactions().iter().map(|t| t.transaction.clone()).collect();
    state.reset();
    assert_eq!(state.history_state(), HistoryState::Empty);
    for tx in log {
        state.record(tx).unwrap();
    }

    assert_eq!(state.statements(), &final_statements);
    assert_eq!(state.transactions().len(), 5);
}

#[test]
fn test_history_snapshots_track_each_step() {
    let mut state = FinancialState::default();
    state
        .record_transaction(&request(json!({"type": "sale", "amount": 100, "paymentMethod": "cash"})))
        .unwrap();
    state
        .record_transaction(&request(json!({"type": "sale", "amount": 100, "paymentMethod": "cash"})))
        .unwrap();

    let cash: Vec<_> = state
        .history()
        .iter()
        .map(|e| e.statements.raw().balance_sheet.assets.current_assets.cash)
        .collect();
    assert_eq!(cash, vec![dec!(50100), dec!(50200)]);
    assert_eq!(state.history()[1].transaction.id, 2);
}

// ===========================================================================
// Accounting equation (known, unenforced)
// ===========================================================================

#[test]
fn test_balanced_kinds_preserve_the_gap() {
    // The seed is 25000 out of balance; kinds that move both sides equally
    // keep that gap.
    let mut state = FinancialState::default();
    for tx in [
        json!({"type": "loan", "amount": 4000, "term": "short-term"}),
        json!({"type": "equity-investment", "amount": 1500}),
        json!({"type": "dividend", "amount": 500}),
        json!({"type": "purchase", "amount": 900, "paymentMethod": "credit"}),
    ] {
        state.record_transaction(&request(tx)).unwrap();
        assert_eq!(state.balance_check().difference, dec!(25000));
    }
}

#[test]
fn test_credit_expense_widens_the_gap() {
    let mut state = FinancialState::default();
    state
        .record_transaction(&request(json!({
            "type": "expense", "amount": 400, "paymentMethod": "credit"
        })))
        .unwrap();

    // Payable rises but nothing on the asset side or in equity moves.
    let check = state.balance_check();
    assert_eq!(check.difference, dec!(24600));
    assert!(!check.balanced);
}
