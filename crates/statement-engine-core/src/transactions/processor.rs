use serde::Serialize;
use tracing::{debug, warn};

use super::custom::{apply_edit, DroppedEdit};
use super::types::{AssetType, LoanTerm, PaymentMethod, Transaction, TransactionRequest};
use crate::config::LoanSplit;
use crate::error::StatementError;
use crate::statements::{OperatingActivities, Statements};
use crate::types::Money;
use crate::StatementResult;

/// Result of applying one transaction to a raw statement set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Applied {
    pub statements: Statements,
    /// Custom edits that were skipped; always empty for other kinds.
    pub dropped_edits: Vec<DroppedEdit>,
}

/// Validate a request and apply it. Nothing is applied when validation
/// fails.
pub fn apply_request(
    statements: &Statements,
    request: &TransactionRequest,
    loan_split: &LoanSplit,
) -> StatementResult<Applied> {
    let transaction = request.parse()?;
    apply(statements, &transaction, loan_split)
}

/// Map a transaction onto the three statements' raw fields.
///
/// Pure: `statements` is left untouched and a new raw set is returned.
/// Derived totals are not refreshed here; run the result through
/// [`crate::statements::try_recompute`].
///
/// Fails with [`StatementError::Overflow`] when a rule would push an account
/// past the range of `Money`; nothing is returned in that case.
pub fn apply(
    statements: &Statements,
    transaction: &Transaction,
    loan_split: &LoanSplit,
) -> StatementResult<Applied> {
    let mut next = statements.clone();
    let mut dropped_edits = Vec::new();

    let bs = &mut next.balance_sheet;
    let is = &mut next.income_statement;
    let cf = &mut next.cash_flow_statement;

    let current_assets = &mut bs.assets.current_assets;
    let non_current_assets = &mut bs.assets.non_current_assets;
    let current_liabilities = &mut bs.liabilities.current_liabilities;
    let non_current_liabilities = &mut bs.liabilities.non_current_liabilities;
    let operating = &mut cf.operating_activities;

    match transaction {
        Transaction::Sale {
            amount,
            payment_method,
            cogs,
        } => {
            increase(&mut is.revenue, *amount, "revenue")?;
            match payment_method {
                PaymentMethod::Cash => {
                    increase(&mut current_assets.cash, *amount, "cash")?;
                    increase(
                        &mut operating.other_operating_adjustments,
                        *amount,
                        "otherOperatingAdjustments",
                    )?;
                }
                PaymentMethod::Credit => {
                    increase(
                        &mut current_assets.accounts_receivable,
                        *amount,
                        "accountsReceivable",
                    )?;
                    decrease(
                        &mut operating.change_in_accounts_receivable,
                        *amount,
                        "changeInAccountsReceivable",
                    )?;
                }
            }
            if let Some(cogs) = cogs {
                increase(&mut is.cost_of_goods_sold, *cogs, "costOfGoodsSold")?;
                decrease(&mut current_assets.inventory, *cogs, "inventory")?;
            }
        }

        Transaction::Purchase {
            amount,
            payment_method,
        } => {
            increase(&mut current_assets.inventory, *amount, "inventory")?;
            settle_outflow(
                *payment_method,
                *amount,
                &mut current_assets.cash,
                &mut current_liabilities.accounts_payable,
                operating,
            )?;
        }

        Transaction::Expense {
            amount,
            expense_type,
            payment_method,
        } => {
            increase(
                is.operating_expenses.line_mut(expense_type),
                *amount,
                "operatingExpenses",
            )?;
            settle_outflow(
                *payment_method,
                *amount,
                &mut current_assets.cash,
                &mut current_liabilities.accounts_payable,
                operating,
            )?;
        }

        Transaction::AssetPurchase { amount, asset_type } => {
            let investing = &mut cf.investing_activities;
            match asset_type {
                AssetType::Equipment => {
                    increase(&mut non_current_assets.equipment, *amount, "equipment")?;
                    decrease(
                        &mut investing.purchase_of_equipment,
                        *amount,
                        "purchaseOfEquipment",
                    )?;
                }
                AssetType::Property => {
                    increase(&mut non_current_assets.property, *amount, "property")?;
                    decrease(
                        &mut investing.purchase_of_equipment,
                        *amount,
                        "purchaseOfEquipment",
                    )?;
                }
                AssetType::Investment => {
                    increase(
                        &mut non_current_assets.long_term_investments,
                        *amount,
                        "longTermInvestments",
                    )?;
                    decrease(
                        &mut investing.purchase_of_investments,
                        *amount,
                        "purchaseOfInvestments",
                    )?;
                }
            }
            decrease(&mut current_assets.cash, *amount, "cash")?;
        }

        Transaction::Loan { amount, term } => {
            increase(&mut current_assets.cash, *amount, "cash")?;
            match term {
                LoanTerm::ShortTerm => {
                    increase(&mut current_liabilities.short_term_debt, *amount, "shortTermDebt")?
                }
                LoanTerm::LongTerm => increase(
                    &mut non_current_liabilities.long_term_debt,
                    *amount,
                    "longTermDebt",
                )?,
            }
            increase(
                &mut cf.financing_activities.debt_repayment,
                *amount,
                "debtRepayment",
            )?;
        }

        Transaction::LoanPayment {
            amount,
            term,
            principal,
            interest,
        } => {
            // A zero breakdown counts as absent and falls back to the split.
            let principal = match principal.filter(|p| !p.is_zero()) {
                Some(p) => p,
                None => loan_split.principal_of(*amount)?,
            };
            let interest = match interest.filter(|i| !i.is_zero()) {
                Some(i) => i,
                None => loan_split.interest_of(*amount)?,
            };

            decrease(&mut current_assets.cash, *amount, "cash")?;
            match term {
                LoanTerm::ShortTerm => {
                    decrease(&mut current_liabilities.short_term_debt, principal, "shortTermDebt")?
                }
                LoanTerm::LongTerm => decrease(
                    &mut non_current_liabilities.long_term_debt,
                    principal,
                    "longTermDebt",
                )?,
            }
            increase(&mut is.interest_expense, interest, "interestExpense")?;
            decrease(
                &mut cf.financing_activities.debt_repayment,
                principal,
                "debtRepayment",
            )?;
        }

        Transaction::EquityInvestment { amount } => {
            increase(&mut current_assets.cash, *amount, "cash")?;
            increase(&mut bs.equity.common_stock, *amount, "commonStock")?;
            increase(
                &mut cf.financing_activities.issuance_of_stock,
                *amount,
                "issuanceOfStock",
            )?;
        }

        Transaction::Dividend { amount } => {
            decrease(&mut current_assets.cash, *amount, "cash")?;
            decrease(&mut bs.equity.retained_earnings, *amount, "retainedEarnings")?;
            decrease(
                &mut cf.financing_activities.dividends_paid,
                *amount,
                "dividendsPaid",
            )?;
        }

        Transaction::Depreciation { amount } => {
            increase(
                &mut is.operating_expenses.depreciation,
                *amount,
                "operatingExpenses.depreciation",
            )?;
            decrease(
                &mut non_current_assets.accumulated_depreciation,
                *amount,
                "accumulatedDepreciation",
            )?;
            increase(&mut operating.depreciation, *amount, "depreciation")?;
        }

        Transaction::Custom { affects } => {
            for (index, edit) in affects.iter().enumerate() {
                if let Err(reason) = apply_edit(&mut next, edit) {
                    warn!(index, error = %reason, "dropping custom edit");
                    dropped_edits.push(DroppedEdit {
                        index,
                        edit: edit.clone(),
                        reason,
                    });
                }
            }
        }
    }

    debug!(
        kind = %transaction.kind(),
        dropped = dropped_edits.len(),
        "applied transaction rules"
    );

    Ok(Applied {
        statements: next,
        dropped_edits,
    })
}

fn increase(account: &mut Money, amount: Money, name: &str) -> StatementResult<()> {
    *account = account
        .checked_add(amount)
        .ok_or_else(|| StatementError::overflow(name))?;
    Ok(())
}

fn decrease(account: &mut Money, amount: Money, name: &str) -> StatementResult<()> {
    *account = account
        .checked_sub(amount)
        .ok_or_else(|| StatementError::overflow(name))?;
    Ok(())
}

/// Settlement leg shared by purchases and expenses: cash out now, or a
/// payable for later.
fn settle_outflow(
    method: PaymentMethod,
    amount: Money,
    cash: &mut Money,
    accounts_payable: &mut Money,
    operating: &mut OperatingActivities,
) -> StatementResult<()> {
    match method {
        PaymentMethod::Cash => {
            decrease(cash, amount, "cash")?;
            decrease(
                &mut operating.other_operating_adjustments,
                amount,
                "otherOperatingAdjustments",
            )
        }
        PaymentMethod::Credit => {
            increase(accounts_payable, amount, "accountsPayable")?;
            increase(
                &mut operating.change_in_accounts_payable,
                amount,
                "changeInAccountsPayable",
            )
        }
    }
}
