//! The city government: tax, welfare and industry subsidies.
//!
//! Policy is changed only through [`Proposal`]s. Each proposal carries the
//! new level, so [`Government::apply`] is idempotent; levels are clamped to
//! their valid range (tax in `[0, 1]`, welfare and subsidies non-negative).

use std::collections::BTreeMap;

use polis_types::{GovernmentState, Industry, Proposal, Subsidy};
use rust_decimal::Decimal;
use tracing::info;

use crate::config::CityConfig;

/// Fiscal state and policy levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Government {
    tax_rate: Decimal,
    welfare: Decimal,
    cash: Decimal,
    subsidies: BTreeMap<Industry, Decimal>,
    tax_rate_increment: Decimal,
    welfare_increment: Decimal,
    subsidy_increment: Decimal,
}

impl Government {
    /// Create a government with the configured starting policy and an
    /// empty treasury.
    pub fn new(config: &CityConfig) -> Self {
        Self {
            tax_rate: config.tax_rate,
            welfare: config.welfare,
            cash: Decimal::ZERO,
            subsidies: BTreeMap::new(),
            tax_rate_increment: config.tax_rate_increment,
            welfare_increment: config.welfare_increment,
            subsidy_increment: config.subsidy_increment,
        }
    }

    /// Current tax rate.
    pub const fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Current daily welfare per persona.
    pub const fn welfare(&self) -> Decimal {
        self.welfare
    }

    /// Treasury balance.
    pub const fn cash(&self) -> Decimal {
        self.cash
    }

    /// Daily subsidy for `industry`, zero if none is set.
    pub fn subsidy(&self, industry: Industry) -> Decimal {
        self.subsidies.get(&industry).copied().unwrap_or(Decimal::ZERO)
    }

    /// Collect tax revenue.
    pub fn collect(&mut self, amount: Decimal) {
        self.cash = self.cash.saturating_add(amount);
    }

    /// Spend from the treasury. Deficits are allowed.
    pub fn spend(&mut self, amount: Decimal) {
        self.cash = self.cash.saturating_sub(amount);
    }

    /// Tax owed on `amount` at the current rate.
    pub fn tax_on(&self, amount: Decimal) -> Decimal {
        amount.max(Decimal::ZERO).saturating_mul(self.tax_rate)
    }

    /// Public snapshot for notifications.
    pub fn state(&self) -> GovernmentState {
        GovernmentState {
            tax_rate: self.tax_rate,
            welfare: self.welfare,
            cash: self.cash,
            subsidies: self
                .subsidies
                .iter()
                .map(|(&industry, &amount)| Subsidy { industry, amount })
                .collect(),
        }
    }

    /// Policy changes one increment away from the current levels.
    ///
    /// Moves that would leave the valid range are not offered.
    pub fn proposal_options(&self) -> Vec<Proposal> {
        let mut options = Vec::new();
        let raised_tax = self.tax_rate.saturating_add(self.tax_rate_increment);
        if raised_tax <= Decimal::ONE {
            options.push(Proposal::TaxRate { value: raised_tax });
        }
        let lowered_tax = self.tax_rate.saturating_sub(self.tax_rate_increment);
        if lowered_tax >= Decimal::ZERO {
            options.push(Proposal::TaxRate { value: lowered_tax });
        }
        options.push(Proposal::Welfare {
            value: self.welfare.saturating_add(self.welfare_increment),
        });
        let lowered_welfare = self.welfare.saturating_sub(self.welfare_increment);
        if lowered_welfare >= Decimal::ZERO {
            options.push(Proposal::Welfare {
                value: lowered_welfare,
            });
        }
        for industry in Industry::ALL {
            options.push(Proposal::Subsidy {
                industry,
                value: self.subsidy(industry).saturating_add(self.subsidy_increment),
            });
        }
        options
    }

    /// Enact `proposal`, clamping to the valid range.
    pub fn apply(&mut self, proposal: &Proposal) {
        match proposal {
            Proposal::TaxRate { value } => {
                self.tax_rate = (*value).clamp(Decimal::ZERO, Decimal::ONE);
            }
            Proposal::Welfare { value } => {
                self.welfare = (*value).max(Decimal::ZERO);
            }
            Proposal::Subsidy { industry, value } => {
                let value = (*value).max(Decimal::ZERO);
                if value.is_zero() {
                    self.subsidies.remove(industry);
                } else {
                    self.subsidies.insert(*industry, value);
                }
            }
        }
        info!(
            proposal = %proposal,
            tax_rate = %self.tax_rate,
            welfare = %self.welfare,
            "Policy enacted"
        );
    }
}
