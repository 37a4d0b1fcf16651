use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::StatementError;
use crate::types::Money;
use crate::StatementResult;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionKind {
    Sale,
    Purchase,
    Expense,
    AssetPurchase,
    Loan,
    LoanPayment,
    EquityInvestment,
    Dividend,
    Depreciation,
    Custom,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 10] = [
        TransactionKind::Sale,
        TransactionKind::Purchase,
        TransactionKind::Expense,
        TransactionKind::AssetPurchase,
        TransactionKind::Loan,
        TransactionKind::LoanPayment,
        TransactionKind::EquityInvestment,
        TransactionKind::Dividend,
        TransactionKind::Depreciation,
        TransactionKind::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Sale => "sale",
            TransactionKind::Purchase => "purchase",
            TransactionKind::Expense => "expense",
            TransactionKind::AssetPurchase => "asset-purchase",
            TransactionKind::Loan => "loan",
            TransactionKind::LoanPayment => "loan-payment",
            TransactionKind::EquityInvestment => "equity-investment",
            TransactionKind::Dividend => "dividend",
            TransactionKind::Depreciation => "depreciation",
            TransactionKind::Custom => "custom",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| StatementError::UnknownTransactionKind {
                kind: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Credit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Equipment,
    Property,
    Investment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoanTerm {
    ShortTerm,
    LongTerm,
}

fn parse_choice<T: Copy>(
    kind: TransactionKind,
    field: &str,
    value: &str,
    options: &[(&str, T)],
) -> StatementResult<T> {
    options
        .iter()
        .find(|(name, _)| *name == value)
        .map(|(_, choice)| *choice)
        .ok_or_else(|| {
            let allowed: Vec<&str> = options.iter().map(|(name, _)| *name).collect();
            StatementError::malformed(
                kind.as_str(),
                format!("{field} must be one of [{}], got '{value}'", allowed.join(", ")),
            )
        })
}

// ---------------------------------------------------------------------------
// Custom edits
// ---------------------------------------------------------------------------

/// One field-level edit carried by a `custom` transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomEdit {
    pub statement: String,
    pub account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_account: Option<String>,
    pub change: Money,
}

// ---------------------------------------------------------------------------
// Typed transaction
// ---------------------------------------------------------------------------

/// A validated business event. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Transaction {
    #[serde(rename_all = "camelCase")]
    Sale {
        amount: Money,
        payment_method: PaymentMethod,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cogs: Option<Money>,
    },
    #[serde(rename_all = "camelCase")]
    Purchase {
        amount: Money,
        payment_method: PaymentMethod,
    },
    #[serde(rename_all = "camelCase")]
    Expense {
        amount: Money,
        expense_type: String,
        payment_method: PaymentMethod,
    },
    #[serde(rename_all = "camelCase")]
    AssetPurchase { amount: Money, asset_type: AssetType },
    Loan { amount: Money, term: LoanTerm },
    LoanPayment {
        amount: Money,
        term: LoanTerm,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        principal: Option<Money>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        interest: Option<Money>,
    },
    EquityInvestment { amount: Money },
    Dividend { amount: Money },
    Depreciation { amount: Money },
    Custom { affects: Vec<CustomEdit> },
}

impl Transaction {
    pub fn kind(&self) -> TransactionKind {
        match self {
            Transaction::Sale { .. } => TransactionKind::Sale,
            Transaction::Purchase { .. } => TransactionKind::Purchase,
            Transaction::Expense { .. } => TransactionKind::Expense,
            Transaction::AssetPurchase { .. } => TransactionKind::AssetPurchase,
            Transaction::Loan { .. } => TransactionKind::Loan,
            Transaction::LoanPayment { .. } => TransactionKind::LoanPayment,
            Transaction::EquityInvestment { .. } => TransactionKind::EquityInvestment,
            Transaction::Dividend { .. } => TransactionKind::Dividend,
            Transaction::Depreciation { .. } => TransactionKind::Depreciation,
            Transaction::Custom { .. } => TransactionKind::Custom,
        }
    }

    /// Headline amount; `None` for custom transactions.
    pub fn amount(&self) -> Option<Money> {
        match self {
            Transaction::Sale { amount, .. }
            | Transaction::Purchase { amount, .. }
            | Transaction::Expense { amount, .. }
            | Transaction::AssetPurchase { amount, .. }
            | Transaction::Loan { amount, .. }
            | Transaction::LoanPayment { amount, .. }
            | Transaction::EquityInvestment { amount }
            | Transaction::Dividend { amount }
            | Transaction::Depreciation { amount } => Some(*amount),
            Transaction::Custom { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Untyped request
// ---------------------------------------------------------------------------

/// A transaction as submitted by an outside caller, before validation.
///
/// Every field except `type` is optional here; [`TransactionRequest::parse`]
/// decides which ones the kind requires.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cogs: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affects: Option<Vec<CustomEdit>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TransactionRequest {
    pub fn new(kind: impl Into<String>) -> Self {
        TransactionRequest {
            kind: kind.into(),
            ..Default::default()
        }
    }

    pub fn amount(mut self, amount: impl Into<Value>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn payment_method(mut self, method: &str) -> Self {
        self.payment_method = Some(method.to_string());
        self
    }

    pub fn term(mut self, term: &str) -> Self {
        self.term = Some(term.to_string());
        self
    }

    /// Decode a request from loosely-typed JSON. A structurally invalid
    /// document is reported as malformed rather than as a serde failure.
    pub fn from_value(value: Value) -> StatementResult<Self> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("<missing>")
            .to_string();
        serde_json::from_value(value).map_err(|e| StatementError::malformed(&kind, e.to_string()))
    }

    /// Validate shape and produce a typed [`Transaction`].
    pub fn parse(&self) -> StatementResult<Transaction> {
        let kind: TransactionKind = self.kind.parse()?;

        let transaction = match kind {
            TransactionKind::Sale => Transaction::Sale {
                amount: self.required_amount(kind)?,
                payment_method: self.payment_method_or_credit(kind)?,
                cogs: money_field(kind, "cogs", self.cogs.as_ref())?,
            },
            TransactionKind::Purchase => Transaction::Purchase {
                amount: self.required_amount(kind)?,
                payment_method: self.payment_method_or_credit(kind)?,
            },
            TransactionKind::Expense => Transaction::Expense {
                amount: self.required_amount(kind)?,
                expense_type: self
                    .expense_type
                    .clone()
                    .unwrap_or_else(|| "other".to_string()),
                payment_method: self.payment_method_or_credit(kind)?,
            },
            TransactionKind::AssetPurchase => {
                let raw = self.asset_type.as_deref().ok_or_else(|| {
                    StatementError::malformed(kind.as_str(), "assetType is required")
                })?;
                Transaction::AssetPurchase {
                    amount: self.required_amount(kind)?,
                    asset_type: parse_choice(
                        kind,
                        "assetType",
                        raw,
                        &[
                            ("equipment", AssetType::Equipment),
                            ("property", AssetType::Property),
                            ("investment", AssetType::Investment),
                        ],
                    )?,
                }
            }
            TransactionKind::Loan => Transaction::Loan {
                amount: self.required_amount(kind)?,
                term: self.term_or_long(kind)?,
            },
            TransactionKind::LoanPayment => Transaction::LoanPayment {
                amount: self.required_amount(kind)?,
                term: self.term_or_long(kind)?,
                principal: money_field(kind, "principal", self.principal.as_ref())?,
                interest: money_field(kind, "interest", self.interest.as_ref())?,
            },
            TransactionKind::EquityInvestment => Transaction::EquityInvestment {
                amount: self.required_amount(kind)?,
            },
            TransactionKind::Dividend => Transaction::Dividend {
                amount: self.required_amount(kind)?,
            },
            TransactionKind::Depreciation => Transaction::Depreciation {
                amount: self.required_amount(kind)?,
            },
            TransactionKind::Custom => Transaction::Custom {
                affects: self.affects.clone().ok_or_else(|| {
                    StatementError::malformed(kind.as_str(), "affects is required")
                })?,
            },
        };

        Ok(transaction)
    }

    fn required_amount(&self, kind: TransactionKind) -> StatementResult<Money> {
        money_field(kind, "amount", self.amount.as_ref())?
            .ok_or_else(|| StatementError::malformed(kind.as_str(), "amount is required"))
    }

    /// An absent value defaults to credit; anything but `cash` or `credit`
    /// is malformed.
    fn payment_method_or_credit(&self, kind: TransactionKind) -> StatementResult<PaymentMethod> {
        match self.payment_method.as_deref() {
            None => Ok(PaymentMethod::Credit),
            Some(raw) => parse_choice(
                kind,
                "paymentMethod",
                raw,
                &[("cash", PaymentMethod::Cash), ("credit", PaymentMethod::Credit)],
            ),
        }
    }

    /// An absent value defaults to long-term; anything but `short-term` or
    /// `long-term` is malformed.
    fn term_or_long(&self, kind: TransactionKind) -> StatementResult<LoanTerm> {
        match self.term.as_deref() {
            None => Ok(LoanTerm::LongTerm),
            Some(raw) => parse_choice(
                kind,
                "term",
                raw,
                &[("short-term", LoanTerm::ShortTerm), ("long-term", LoanTerm::LongTerm)],
            ),
        }
    }
}

impl TryFrom<TransactionRequest> for Transaction {
    type Error = StatementError;

    fn try_from(request: TransactionRequest) -> Result<Self, Self::Error> {
        request.parse()
    }
}

/// Numeric JSON field. Accepts numbers and numeric strings; `null` counts
/// as absent.
fn money_field(
    kind: TransactionKind,
    field: &str,
    value: Option<&Value>,
) -> StatementResult<Option<Money>> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(Value::String(s)) => parse_decimal(s.trim()),
        Some(_) => None,
    };

    parsed.map(Some).ok_or_else(|| {
        StatementError::malformed(kind.as_str(), format!("{field} must be numeric"))
    })
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}
