use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::StatementError;
use crate::statements::{canonical_seed, try_recompute, Statements};
use crate::types::{Money, Rate};
use crate::StatementResult;

/// How a loan payment without an explicit breakdown is split between
/// principal and interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoanSplit {
    pub principal_share: Rate,
    pub interest_share: Rate,
}

impl Default for LoanSplit {
    fn default() -> Self {
        LoanSplit {
            principal_share: dec!(0.8),
            interest_share: dec!(0.2),
        }
    }
}

impl LoanSplit {
    pub fn principal_of(&self, amount: Money) -> StatementResult<Money> {
        amount
            .checked_mul(self.principal_share)
            .ok_or_else(|| StatementError::overflow("loanSplit.principalShare"))
    }

    pub fn interest_of(&self, amount: Money) -> StatementResult<Money> {
        amount
            .checked_mul(self.interest_share)
            .ok_or_else(|| StatementError::overflow("loanSplit.interestShare"))
    }
}

/// Engine configuration: the opening position and the loan-payment split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Raw statements restored by `initialize` and `reset`.
    pub seed: Statements,
    pub loan_split: LoanSplit,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            seed: canonical_seed(),
            loan_split: LoanSplit::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> StatementResult<()> {
        validate_share("loanSplit.principalShare", self.loan_split.principal_share)?;
        validate_share("loanSplit.interestShare", self.loan_split.interest_share)?;
        // The seed's totals must be representable before anything is built on it.
        try_recompute(self.seed.clone())?;
        Ok(())
    }
}

fn validate_share(field: &str, value: Rate) -> StatementResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(StatementError::InvalidInput {
            field: field.into(),
            reason: format!("Share must be between 0 and 1, got {value}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_split_is_eighty_twenty() {
        let split = LoanSplit::default();
        assert_eq!(split.principal_of(dec!(1000)).unwrap(), dec!(800));
        assert_eq!(split.interest_of(dec!(1000)).unwrap(), dec!(200));
    }

    #[test]
    fn test_split_of_unrepresentable_amount_is_an_error() {
        let split = LoanSplit {
            principal_share: dec!(1),
            interest_share: dec!(2),
        };

        assert_eq!(split.principal_of(Money::MAX).unwrap(), Money::MAX);
        assert!(matches!(
            split.interest_of(Money::MAX),
            Err(StatementError::Overflow { .. })
        ));
    }

    #[test]
    fn test_seed_with_unrepresentable_totals_is_rejected() {
        let mut config = EngineConfig::default();
        config.seed.balance_sheet.assets.current_assets.cash = Money::MAX;

        assert!(matches!(
            config.validate(),
            Err(StatementError::Overflow { .. })
        ));
    }

    #[test]
    fn test_partial_config_keeps_canonical_seed() {
        let config: EngineConfig =
            serde_json::from_value(json!({"loanSplit": {"principalShare": "0.9"}})).unwrap();

        assert_eq!(config.seed, canonical_seed());
        assert_eq!(config.loan_split.principal_share, dec!(0.9));
        assert_eq!(config.loan_split.interest_share, dec!(0.2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_seed_zero_fills_missing_accounts() {
        let config: EngineConfig = serde_json::from_value(json!({
            "seed": {"balanceSheet": {"assets": {"currentAssets": {"cash": 1200}}}}
        }))
        .unwrap();

        let current = &config.seed.balance_sheet.assets.current_assets;
        assert_eq!(current.cash, dec!(1200));
        assert_eq!(current.inventory, Decimal::ZERO);
        assert_eq!(config.seed.income_statement.revenue, Decimal::ZERO);
    }

    #[test]
    fn test_share_out_of_range_is_rejected() {
        let config = EngineConfig {
            loan_split: LoanSplit {
                principal_share: dec!(1.5),
                interest_share: dec!(0.2),
            },
            ..Default::default()
        };

        match config.validate() {
            Err(StatementError::InvalidInput { field, .. }) => {
                assert_eq!(field, "loanSplit.principalShare")
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}
