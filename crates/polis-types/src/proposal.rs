//! Policy change descriptors.
//!
//! The government model offers a list of [`Proposal`]s to the chosen
//! proposer, the proposer submits one back, and players vote on it. The
//! coordinator treats the payload as opaque; only the engine interprets it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::Industry;

/// A single policy change the city government can enact.
///
/// Each variant carries the *new* level rather than a delta so that
/// applying the same proposal twice is harmless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Proposal {
    /// Set the income/profit tax rate.
    TaxRate {
        /// New tax rate in `[0, 1]`.
        #[serde(with = "rust_decimal::serde::float")]
        value: Decimal,
    },
    /// Set the daily welfare payment.
    Welfare {
        /// New daily welfare amount.
        #[serde(with = "rust_decimal::serde::float")]
        value: Decimal,
    },
    /// Set the daily subsidy paid to one industry.
    Subsidy {
        /// Industry receiving the subsidy.
        industry: Industry,
        /// New total daily subsidy.
        #[serde(with = "rust_decimal::serde::float")]
        value: Decimal,
    },
}

impl core::fmt::Display for Proposal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::TaxRate { value } => write!(f, "set tax rate to {value}"),
            Self::Welfare { value } => write!(f, "set welfare to {value}"),
            Self::Subsidy { industry, value } => {
                write!(f, "set {} subsidy to {value}", industry.tenant_type())
            }
        }
    }
}
