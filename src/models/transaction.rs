//! Transaction model
//!
//! One expense: a date, a positive amount, and a normalized category. The
//! serde layout is the ledger table's layout (`Date,Amount,Category`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::{is_allowed_char, is_normalized, normalize, MAX_CATEGORY_LEN};
use super::money::Money;
use super::month::MonthKey;

/// Largest amount a single expense may carry
pub const MAX_AMOUNT: Money = Money::from_dollars_cents(10_000_000, 0);

/// A single expense record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    /// Calendar date of the expense
    #[serde(with = "iso_date")]
    pub date: NaiveDate,

    /// Amount spent; strictly positive for validated rows
    pub amount: Money,

    /// Normalized category label
    pub category: String,
}

impl Transaction {
    /// Create a transaction, normalizing the raw category text
    ///
    /// No validation happens here; see [`Transaction::validate`].
    pub fn new(date: NaiveDate, amount: Money, raw_category: &str) -> Self {
        Self {
            date,
            amount,
            category: normalize(raw_category),
        }
    }

    /// The month this transaction is grouped under
    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.date)
    }

    /// Validate the invariants every persisted row must hold
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }

        if self.amount > MAX_AMOUNT {
            return Err(TransactionValidationError::AmountTooLarge(self.amount));
        }

        if self.category.is_empty() {
            return Err(TransactionValidationError::MissingCategory);
        }

        if self.category.chars().count() > MAX_CATEGORY_LEN
            || !self.category.chars().all(is_allowed_char)
            || !is_normalized(&self.category)
        {
            return Err(TransactionValidationError::UnnormalizedCategory(
                self.category.clone(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.category,
            self.amount
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionValidationError {
    #[error("Please enter an amount greater than zero (got {0})")]
    NonPositiveAmount(Money),
    #[error("Amount exceeded limit ({}): {0}", MAX_AMOUNT)]
    AmountTooLarge(Money),
    #[error("Please select a category")]
    MissingCategory,
    #[error("Category is not in canonical form: {0:?}")]
    UnnormalizedCategory(String),
}

/// Serde adapter for ISO-8601 calendar dates
///
/// Accepts a trailing time component ("2024-03-05 00:00:00" or
/// "2024-03-05T00:00:00") on read, as spreadsheet tools tend to add one.
pub mod iso_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Parse a date, ignoring any time component
    pub fn parse(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
        let raw = raw.trim();
        let date_part = raw
            .split(|c: char| c == 'T' || c.is_whitespace())
            .next()
            .unwrap_or(raw);
        NaiveDate::parse_from_str(date_part, FORMAT)
    }
}
