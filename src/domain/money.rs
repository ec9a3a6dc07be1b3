use crate::error::PayStreamError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a strictly positive monetary amount for transactions.
///
/// Wraps `rust_decimal::Decimal` so a zero or negative amount can never reach
/// a persisted transaction.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, PayStreamError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PayStreamError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PayStreamError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// The monetary part of a transaction: what is moved and in which currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub currency: String,
    pub amount: Amount,
    pub exchange_rate: Option<Decimal>,
}

impl Money {
    pub fn new(
        currency: impl Into<String>,
        amount: Decimal,
        exchange_rate: Option<Decimal>,
    ) -> Result<Self, PayStreamError> {
        let currency = currency.into();
        if currency.trim().is_empty() {
            return Err(PayStreamError::ValidationError(
                "Currency is required".to_string(),
            ));
        }
        Ok(Self {
            currency,
            amount: Amount::new(amount)?,
            exchange_rate,
        })
    }
}
