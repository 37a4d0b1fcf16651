use serde::Serialize;

use super::types::CustomEdit;
use crate::error::StatementError;
use crate::statements::{AccountGroup, Statements};
use crate::types::Money;

/// A custom edit that could not be routed to any raw account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedEdit {
    /// Position of the edit within `affects`.
    pub index: usize,
    pub edit: CustomEdit,
    #[serde(serialize_with = "as_display")]
    pub reason: StatementError,
}

fn as_display<S: serde::Serializer>(err: &StatementError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(err)
}

/// Apply one custom edit in place.
///
/// Assets and liabilities try the current sub-map before the non-current
/// one. Income-statement scalar lines ignore `subAccount`; an unmapped
/// operating-expense sub-account lands in `other`. A change that would
/// overflow the target account is refused and leaves it as it was.
pub(crate) fn apply_edit(
    statements: &mut Statements,
    edit: &CustomEdit,
) -> Result<(), StatementError> {
    let target = route(statements, edit).ok_or_else(|| StatementError::UnknownCustomTarget {
        statement: edit.statement.clone(),
        account: edit.account.clone(),
        sub_account: edit.sub_account.clone().unwrap_or_default(),
    })?;
    *target = target
        .checked_add(edit.change)
        .ok_or_else(|| StatementError::overflow(format!("{}.{}", edit.statement, edit.account)))?;
    Ok(())
}

fn route<'a>(statements: &'a mut Statements, edit: &CustomEdit) -> Option<&'a mut Money> {
    let sub = edit.sub_account.as_deref().unwrap_or_default();

    match edit.statement.as_str() {
        "balanceSheet" => {
            let bs = &mut statements.balance_sheet;
            match edit.account.as_str() {
                "assets" => first_match(
                    &mut bs.assets.current_assets,
                    &mut bs.assets.non_current_assets,
                    sub,
                ),
                "liabilities" => first_match(
                    &mut bs.liabilities.current_liabilities,
                    &mut bs.liabilities.non_current_liabilities,
                    sub,
                ),
                "equity" => bs.equity.account_mut(sub),
                _ => None,
            }
        }
        "incomeStatement" => {
            let is = &mut statements.income_statement;
            match edit.account.as_str() {
                "operatingExpenses" => Some(is.operating_expenses.line_mut(sub)),
                account => is.line_mut(account),
            }
        }
        "cashFlowStatement" => {
            let cf = &mut statements.cash_flow_statement;
            match edit.account.as_str() {
                "operatingActivities" => cf.operating_activities.account_mut(sub),
                "investingActivities" => cf.investing_activities.account_mut(sub),
                "financingActivities" => cf.financing_activities.account_mut(sub),
                _ => None,
            }
        }
        _ => None,
    }
}

fn first_match<'a>(
    primary: &'a mut dyn AccountGroup,
    fallback: &'a mut dyn AccountGroup,
    name: &str,
) -> Option<&'a mut Money> {
    if primary.contains(name) {
        primary.account_mut(name)
    } else {
        fallback.account_mut(name)
    }
}
