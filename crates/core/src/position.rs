//! Resolved lending position for one (account, chain) pair.

use sentinel_chain::{AccountData, HealthFactor};
use serde::{Serialize, Serializer};

use crate::config::ChainConfig;
use crate::risk::{RiskAssessment, RiskTier, WarningClass};

/// Decoded account snapshot tagged with the chain it was read from.
///
/// Only built for accounts holding collateral or debt; never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// Chain name
    pub chain: String,
    /// Chain ID
    pub chain_id: u64,
    /// Decoded account data
    pub account: AccountData,
}

impl Position {
    /// Attach chain identity to decoded account data.
    pub fn new(chain: &ChainConfig, account: AccountData) -> Self {
        Self {
            chain: chain.name.clone(),
            chain_id: chain.chain_id,
            account,
        }
    }

    pub fn collateral_usd(&self) -> f64 {
        self.account.collateral_usd
    }

    pub fn debt_usd(&self) -> f64 {
        self.account.debt_usd
    }

    pub fn health_factor(&self) -> HealthFactor {
        self.account.health_factor
    }

    pub fn has_debt(&self) -> bool {
        self.account.has_debt
    }

    /// Risk tier, recomputed from the health factor on every call.
    pub fn tier(&self) -> RiskTier {
        RiskTier::classify(self.account.health_factor)
    }

    pub fn warning(&self) -> Option<WarningClass> {
        WarningClass::for_health_factor(self.account.health_factor)
    }

    pub fn risk(&self) -> RiskAssessment {
        RiskAssessment::of(self.account.health_factor)
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Repr<'a> {
            chain: &'a str,
            chain_id: u64,
            #[serde(flatten)]
            account: &'a AccountData,
            #[serde(flatten)]
            risk: RiskAssessment,
        }

        Repr {
            chain: &self.chain,
            chain_id: self.chain_id,
            account: &self.account,
            risk: self.risk(),
        }
        .serialize(serializer)
    }
}
