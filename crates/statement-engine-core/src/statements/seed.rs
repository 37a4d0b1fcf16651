use rust_decimal_macros::dec;

use super::model::*;

/// The canonical opening position restored by `initialize` and `reset`
/// when no other seed is configured.
pub fn canonical_seed() -> Statements {
    Statements {
        balance_sheet: BalanceSheet {
            assets: Assets {
                current_assets: CurrentAssets {
                    cash: dec!(50000),
                    accounts_receivable: dec!(25000),
                    inventory: dec!(30000),
                    prepaid_expenses: dec!(5000),
                    short_term_investments: dec!(10000),
                },
                non_current_assets: NonCurrentAssets {
                    property: dec!(150000),
                    equipment: dec!(75000),
                    accumulated_depreciation: dec!(-25000),
                    long_term_investments: dec!(40000),
                    intangible_assets: dec!(15000),
                },
            },
            liabilities: Liabilities {
                current_liabilities: CurrentLiabilities {
                    accounts_payable: dec!(20000),
                    short_term_debt: dec!(10000),
                    accrued_expenses: dec!(8000),
                    deferred_revenue: dec!(5000),
                    taxes_payable: dec!(7000),
                },
                non_current_liabilities: NonCurrentLiabilities {
                    long_term_debt: dec!(100000),
                    deferred_tax_liabilities: dec!(15000),
                    pension_liabilities: dec!(20000),
                },
            },
            equity: Equity {
                common_stock: dec!(80000),
                retained_earnings: dec!(60000),
                additional_paid_in_capital: dec!(40000),
                treasury_stock: dec!(-15000),
            },
        },
        income_statement: IncomeStatement {
            revenue: dec!(200000),
            cost_of_goods_sold: dec!(100000),
            operating_expenses: OperatingExpenses {
                salaries: dec!(40000),
                rent: dec!(15000),
                utilities: dec!(5000),
                marketing: dec!(10000),
                depreciation: dec!(7500),
                other: dec!(12500),
            },
            other_income: dec!(5000),
            interest_expense: dec!(7500),
            tax_expense: dec!(10000),
        },
        cash_flow_statement: CashFlowStatement {
            operating_activities: OperatingActivities {
                depreciation: dec!(7500),
                change_in_inventory: dec!(-5000),
                change_in_accounts_receivable: dec!(-3000),
                change_in_accounts_payable: dec!(2000),
                change_in_accrued_expenses: dec!(1500),
                other_operating_adjustments: dec!(1000),
            },
            investing_activities: InvestingActivities {
                purchase_of_equipment: dec!(-15000),
                purchase_of_investments: dec!(-5000),
                sale_of_investments: dec!(2000),
            },
            financing_activities: FinancingActivities {
                debt_repayment: dec!(-10000),
                dividends_paid: dec!(-5000),
                issuance_of_stock: dec!(0),
            },
        },
    }
}
