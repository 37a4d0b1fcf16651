use serde::{Deserialize, Serialize};

use super::accounts::account_group;
use crate::types::Money;

// ---------------------------------------------------------------------------
// Balance sheet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrentAssets {
    pub cash: Money,
    pub accounts_receivable: Money,
    pub inventory: Money,
    pub prepaid_expenses: Money,
    pub short_term_investments: Money,
}

account_group!(CurrentAssets {
    cash => "cash",
    accounts_receivable => "accountsReceivable",
    inventory => "inventory",
    prepaid_expenses => "prepaidExpenses",
    short_term_investments => "shortTermInvestments",
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NonCurrentAssets {
    pub property: Money,
    pub equipment: Money,
    /// Contra-asset; carried as a negative balance.
    pub accumulated_depreciation: Money,
    pub long_term_investments: Money,
    pub intangible_assets: Money,
}

account_group!(NonCurrentAssets {
    property => "property",
    equipment => "equipment",
    accumulated_depreciation => "accumulatedDepreciation",
    long_term_investments => "longTermInvestments",
    intangible_assets => "intangibleAssets",
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Assets {
    pub current_assets: CurrentAssets,
    pub non_current_assets: NonCurrentAssets,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrentLiabilities {
    pub accounts_payable: Money,
    pub short_term_debt: Money,
    pub accrued_expenses: Money,
    pub deferred_revenue: Money,
    pub taxes_payable: Money,
}

account_group!(CurrentLiabilities {
    accounts_payable => "accountsPayable",
    short_term_debt => "shortTermDebt",
    accrued_expenses => "accruedExpenses",
    deferred_revenue => "deferredRevenue",
    taxes_payable => "taxesPayable",
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NonCurrentLiabilities {
    pub long_term_debt: Money,
    pub deferred_tax_liabilities: Money,
    pub pension_liabilities: Money,
}

account_group!(NonCurrentLiabilities {
    long_term_debt => "longTermDebt",
    deferred_tax_liabilities => "deferredTaxLiabilities",
    pension_liabilities => "pensionLiabilities",
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Liabilities {
    pub current_liabilities: CurrentLiabilities,
    pub non_current_liabilities: NonCurrentLiabilities,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Equity {
    pub common_stock: Money,
    pub retained_earnings: Money,
    pub additional_paid_in_capital: Money,
    /// Contra-equity; carried as a negative balance.
    pub treasury_stock: Money,
}

account_group!(Equity {
    common_stock => "commonStock",
    retained_earnings => "retainedEarnings",
    additional_paid_in_capital => "additionalPaidInCapital",
    treasury_stock => "treasuryStock",
});

/// Raw balance sheet accounts. Totals live in [`super::BalanceSheetTotals`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceSheet {
    pub assets: Assets,
    pub liabilities: Liabilities,
    pub equity: Equity,
}

// ---------------------------------------------------------------------------
// Income statement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperatingExpenses {
    pub salaries: Money,
    pub rent: Money,
    pub utilities: Money,
    pub marketing: Money,
    pub depreciation: Money,
    /// Catch-all for categories without a dedicated line.
    pub other: Money,
}

account_group!(OperatingExpenses {
    salaries => "salaries",
    rent => "rent",
    utilities => "utilities",
    marketing => "marketing",
    depreciation => "depreciation",
    other => "other",
});

impl OperatingExpenses {
    /// The line for `category`, falling back to `other` when the category
    /// has no dedicated line.
    pub fn line_mut(&mut self, category: &str) -> &mut Money {
        match category {
            "salaries" => &mut self.salaries,
            "rent" => &mut self.rent,
            "utilities" => &mut self.utilities,
            "marketing" => &mut self.marketing,
            "depreciation" => &mut self.depreciation,
            _ => &mut self.other,
        }
    }
}

/// Raw income statement lines. Subtotals live in [`super::IncomeStatementTotals`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncomeStatement {
    pub revenue: Money,
    pub cost_of_goods_sold: Money,
    pub operating_expenses: OperatingExpenses,
    pub other_income: Money,
    pub interest_expense: Money,
    pub tax_expense: Money,
}

impl IncomeStatement {
    /// Scalar lines addressable by name. `operatingExpenses` is a group and
    /// is resolved separately.
    pub fn line_mut(&mut self, account: &str) -> Option<&mut Money> {
        match account {
            "revenue" => Some(&mut self.revenue),
            "costOfGoodsSold" => Some(&mut self.cost_of_goods_sold),
            "otherIncome" => Some(&mut self.other_income),
            "interestExpense" => Some(&mut self.interest_expense),
            "taxExpense" => Some(&mut self.tax_expense),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Cash flow statement
// ---------------------------------------------------------------------------

/// Raw operating adjustments. Net income is mirrored in from the income
/// statement during recomputation and is never stored here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperatingActivities {
    pub depreciation: Money,
    pub change_in_inventory: Money,
    pub change_in_accounts_receivable: Money,
    pub change_in_accounts_payable: Money,
    pub change_in_accrued_expenses: Money,
    pub other_operating_adjustments: Money,
}

account_group!(OperatingActivities {
    depreciation => "depreciation",
    change_in_inventory => "changeInInventory",
    change_in_accounts_receivable => "changeInAccountsReceivable",
    change_in_accounts_payable => "changeInAccountsPayable",
    change_in_accrued_expenses => "changeInAccruedExpenses",
    other_operating_adjustments => "otherOperatingAdjustments",
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvestingActivities {
    pub purchase_of_equipment: Money,
    pub purchase_of_investments: Money,
    pub sale_of_investments: Money,
}

account_group!(InvestingActivities {
    purchase_of_equipment => "purchaseOfEquipment",
    purchase_of_investments => "purchaseOfInvestments",
    sale_of_investments => "saleOfInvestments",
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancingActivities {
    /// Shared by loan issuance (+) and repayment (-).
    pub debt_repayment: Money,
    pub dividends_paid: Money,
    pub issuance_of_stock: Money,
}

account_group!(FinancingActivities {
    debt_repayment => "debtRepayment",
    dividends_paid => "dividendsPaid",
    issuance_of_stock => "issuanceOfStock",
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CashFlowStatement {
    pub operating_activities: OperatingActivities,
    pub investing_activities: InvestingActivities,
    pub financing_activities: FinancingActivities,
}

// ---------------------------------------------------------------------------
// Raw statement set
// ---------------------------------------------------------------------------

/// The three statements' raw fields: the only input the transaction
/// processor and the derived-value calculator accept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Statements {
    pub balance_sheet: BalanceSheet,
    pub income_statement: IncomeStatement,
    pub cash_flow_statement: CashFlowStatement,
}
