use serde::{Deserialize, Serialize};

use super::accounts::AccountGroup;
use super::model::Statements;
use crate::error::StatementError;
use crate::types::Money;
use crate::StatementResult;

// ---------------------------------------------------------------------------
// Derived values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheetTotals {
    pub total_current_assets: Money,
    pub total_non_current_assets: Money,
    pub total_assets: Money,
    pub total_current_liabilities: Money,
    pub total_non_current_liabilities: Money,
    pub total_liabilities: Money,
    pub total_equity: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatementTotals {
    pub gross_profit: Money,
    pub total_operating_expenses: Money,
    pub operating_income: Money,
    pub income_before_tax: Money,
    pub net_income: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowTotals {
    /// Mirrored from the income statement.
    pub net_income: Money,
    pub total_operating_cash_flow: Money,
    pub total_investing_cash_flow: Money,
    pub total_financing_cash_flow: Money,
    pub net_cash_flow: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedValues {
    pub balance_sheet: BalanceSheetTotals,
    pub income_statement: IncomeStatementTotals,
    pub cash_flow_statement: CashFlowTotals,
}

/// Raw statements paired with the values derived from them.
///
/// Only [`try_recompute`] builds one, so `derived` always agrees with `raw`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullStatements {
    raw: Statements,
    derived: DerivedValues,
}

impl FullStatements {
    pub fn raw(&self) -> &Statements {
        &self.raw
    }

    pub fn derived(&self) -> &DerivedValues {
        &self.derived
    }

    pub fn into_raw(self) -> Statements {
        self.raw
    }
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// Recompute every derived field from raw fields only.
///
/// Pure and idempotent: `recompute(recompute(s).raw().clone()) == recompute(s)`.
///
/// # Panics
///
/// If a total does not fit in a `Money`. Use [`try_recompute`] for
/// statements that have not been checked.
pub fn recompute(raw: Statements) -> FullStatements {
    match try_recompute(raw) {
        Ok(full) => full,
        Err(e) => panic!("{e}"),
    }
}

/// [`recompute`] with checked arithmetic.
///
/// Also checks that liabilities plus equity and the gap to total assets are
/// representable, so [`crate::ratios::balance_check`] never overflows on the
/// result.
pub fn try_recompute(raw: Statements) -> StatementResult<FullStatements> {
    let balance_sheet = balance_sheet_totals(&raw)?;
    let income_statement = income_statement_totals(&raw)?;
    let cash_flow_statement = cash_flow_totals(&raw, income_statement.net_income)?;

    balance_sheet
        .total_liabilities
        .checked_add(balance_sheet.total_equity)
        .and_then(|le| balance_sheet.total_assets.checked_sub(le))
        .ok_or_else(|| StatementError::overflow("balance check"))?;

    Ok(FullStatements {
        raw,
        derived: DerivedValues {
            balance_sheet,
            income_statement,
            cash_flow_statement,
        },
    })
}

fn total(group: &dyn AccountGroup, context: &str) -> StatementResult<Money> {
    group
        .total()
        .ok_or_else(|| StatementError::overflow(context))
}

fn add(a: Money, b: Money, context: &str) -> StatementResult<Money> {
    a.checked_add(b)
        .ok_or_else(|| StatementError::overflow(context))
}

fn sub(a: Money, b: Money, context: &str) -> StatementResult<Money> {
    a.checked_sub(b)
        .ok_or_else(|| StatementError::overflow(context))
}

fn balance_sheet_totals(raw: &Statements) -> StatementResult<BalanceSheetTotals> {
    let bs = &raw.balance_sheet;

    let total_current_assets = total(&bs.assets.current_assets, "totalCurrentAssets")?;
    let total_non_current_assets = total(&bs.assets.non_current_assets, "totalNonCurrentAssets")?;
    let total_current_liabilities =
        total(&bs.liabilities.current_liabilities, "totalCurrentLiabilities")?;
    let total_non_current_liabilities =
        total(&bs.liabilities.non_current_liabilities, "totalNonCurrentLiabilities")?;

    Ok(BalanceSheetTotals {
        total_current_assets,
        total_non_current_assets,
        total_assets: add(total_current_assets, total_non_current_assets, "totalAssets")?,
        total_current_liabilities,
        total_non_current_liabilities,
        total_liabilities: add(
            total_current_liabilities,
            total_non_current_liabilities,
            "totalLiabilities",
        )?,
        total_equity: total(&bs.equity, "totalEquity")?,
    })
}

fn income_statement_totals(raw: &Statements) -> StatementResult<IncomeStatementTotals> {
    let is = &raw.income_statement;

    let gross_profit = sub(is.revenue, is.cost_of_goods_sold, "grossProfit")?;
    let total_operating_expenses = total(&is.operating_expenses, "totalOperatingExpenses")?;
    let operating_income = sub(gross_profit, total_operating_expenses, "operatingIncome")?;
    let income_before_tax = sub(
        add(operating_income, is.other_income, "incomeBeforeTax")?,
        is.interest_expense,
        "incomeBeforeTax",
    )?;
    let net_income = sub(income_before_tax, is.tax_expense, "netIncome")?;

    Ok(IncomeStatementTotals {
        gross_profit,
        total_operating_expenses,
        operating_income,
        income_before_tax,
        net_income,
    })
}

fn cash_flow_totals(raw: &Statements, net_income: Money) -> StatementResult<CashFlowTotals> {
    let cf = &raw.cash_flow_statement;

    let total_operating_cash_flow = add(
        net_income,
        total(&cf.operating_activities, "totalOperatingCashFlow")?,
        "totalOperatingCashFlow",
    )?;
    let total_investing_cash_flow = total(&cf.investing_activities, "totalInvestingCashFlow")?;
    let total_financing_cash_flow = total(&cf.financing_activities, "totalFinancingCashFlow")?;
    let net_cash_flow = add(
        add(total_operating_cash_flow, total_investing_cash_flow, "netCashFlow")?,
        total_financing_cash_flow,
        "netCashFlow",
    )?;

    Ok(CashFlowTotals {
        net_income,
        total_operating_cash_flow,
        total_investing_cash_flow,
        total_financing_cash_flow,
        net_cash_flow,
    })
}
