use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::statements::FullStatements;
use crate::types::{Money, Ratio};

// ---------------------------------------------------------------------------
// Output structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityRatios {
    pub current_ratio: Ratio,
    pub quick_ratio: Ratio,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitabilityRatios {
    pub gross_profit_margin: Ratio,
    pub net_profit_margin: Ratio,
    pub return_on_assets: Ratio,
    pub return_on_equity: Ratio,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolvencyRatios {
    pub debt_to_equity_ratio: Ratio,
    pub debt_to_assets_ratio: Ratio,
    pub interest_coverage_ratio: Ratio,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EfficiencyRatios {
    pub inventory_turnover: Ratio,
    pub asset_turnover: Ratio,
}

/// Ratio report derived from a fully recomputed statement set.
///
/// Non-finite values are valid output: a zero denominator yields
/// `+Infinity` or `-Infinity` (by the numerator's sign) or `NaN` (0/0).
/// In JSON they serialise as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatioReport {
    pub liquidity: LiquidityRatios,
    pub profitability: ProfitabilityRatios,
    pub solvency: SolvencyRatios,
    pub efficiency: EfficiencyRatios,
}

/// Whether the accounting equation holds for a statement set.
///
/// Diagnostic only: transactions are never rejected for leaving the
/// balance sheet unbalanced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceCheck {
    pub total_assets: Money,
    pub total_liabilities_and_equity: Money,
    /// `total_assets - total_liabilities_and_equity`
    pub difference: Money,
    pub balanced: bool,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub fn ratios(full: &FullStatements) -> RatioReport {
    let raw = full.raw();
    let derived = full.derived();
    let bs = &derived.balance_sheet;
    let is = &derived.income_statement;
    let ca = &raw.balance_sheet.assets.current_assets;
    let revenue = raw.income_statement.revenue;
    let cogs = raw.income_statement.cost_of_goods_sold;

    let quick = [ca.cash, ca.accounts_receivable, ca.short_term_investments];
    let quick_ratio = match quick
        .iter()
        .try_fold(Money::ZERO, |acc, amount| acc.checked_add(*amount))
    {
        Some(quick_assets) => ratio(quick_assets, bs.total_current_liabilities),
        // A partial sum can leave Decimal range even when every total fits.
        None => float_ratio(
            quick.iter().map(|m| m.to_f64().unwrap_or(Ratio::NAN)).sum(),
            bs.total_current_liabilities,
        ),
    };

    RatioReport {
        liquidity: LiquidityRatios {
            current_ratio: ratio(bs.total_current_assets, bs.total_current_liabilities),
            quick_ratio,
        },
        profitability: ProfitabilityRatios {
            gross_profit_margin: ratio(is.gross_profit, revenue),
            net_profit_margin: ratio(is.net_income, revenue),
            return_on_assets: ratio(is.net_income, bs.total_assets),
            return_on_equity: ratio(is.net_income, bs.total_equity),
        },
        solvency: SolvencyRatios {
            debt_to_equity_ratio: ratio(bs.total_liabilities, bs.total_equity),
            debt_to_assets_ratio: ratio(bs.total_liabilities, bs.total_assets),
            interest_coverage_ratio: ratio(
                is.operating_income,
                raw.income_statement.interest_expense,
            ),
        },
        efficiency: EfficiencyRatios {
            inventory_turnover: ratio(cogs, ca.inventory),
            asset_turnover: ratio(revenue, bs.total_assets),
        },
    }
}

pub fn balance_check(full: &FullStatements) -> BalanceCheck {
    let bs = &full.derived().balance_sheet;
    let total_liabilities_and_equity = bs.total_liabilities + bs.total_equity;
    let difference = bs.total_assets - total_liabilities_and_equity;

    BalanceCheck {
        total_assets: bs.total_assets,
        total_liabilities_and_equity,
        difference,
        balanced: difference.is_zero(),
    }
}

/// Decimal division, widened to `f64`. A zero denominator follows IEEE
/// semantics rather than failing.
fn ratio(numerator: Money, denominator: Money) -> Ratio {
    if denominator.is_zero() {
        return if numerator.is_zero() {
            Ratio::NAN
        } else if numerator.is_sign_negative() {
            Ratio::NEG_INFINITY
        } else {
            Ratio::INFINITY
        };
    }

    match numerator.checked_div(denominator) {
        Some(q) => q.to_f64().unwrap_or(Ratio::NAN),
        // Quotient outside Decimal range; fall back to float division.
        None => float_ratio(numerator.to_f64().unwrap_or(Ratio::NAN), denominator),
    }
}

fn float_ratio(numerator: Ratio, denominator: Money) -> Ratio {
    numerator / denominator.to_f64().unwrap_or(Ratio::NAN)
}
