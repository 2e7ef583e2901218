//! Cross-chain ordering and totals.

use std::cmp::Ordering;

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::position::Position;
use crate::resolver::{ChainOutcome, ChainStatus};

/// Display order: indebted positions first by ascending health factor, then
/// debt-free positions by descending collateral.
pub fn urgency_order(a: &Position, b: &Position) -> Ordering {
    match (a.has_debt(), b.has_debt()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => a.health_factor().total_cmp(&b.health_factor()),
        (false, false) => b.collateral_usd().total_cmp(&a.collateral_usd()),
    }
}

/// Sort positions into display order. Ties keep their input order.
pub fn order_positions(positions: &mut [Position]) {
    positions.sort_by(urgency_order);
}

/// Sums across every resolved position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Totals {
    pub collateral_usd: f64,
    pub debt_usd: f64,
    /// Collateral minus debt; `None` when there is no collateral.
    pub net_usd: Option<f64>,
}

impl Totals {
    pub fn of(positions: &[Position]) -> Self {
        let collateral_usd: f64 = positions.iter().map(Position::collateral_usd).sum();
        let debt_usd: f64 = positions.iter().map(Position::debt_usd).sum();
        let net_usd = (collateral_usd != 0.0).then(|| collateral_usd - debt_usd);

        Self {
            collateral_usd,
            debt_usd,
            net_usd,
        }
    }
}

/// Terminal state of a whole scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanStatus {
    PositionsFound { count: usize },
    /// Every chain was empty, unreachable, or undecodable. Not an error.
    NoPositionsFound,
    /// Scan stopped before every chain was queried. `found` counts positions
    /// from the chains that did run.
    Cancelled { found: usize, skipped: usize },
}

/// Ordered positions plus totals for one account.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    /// Account address (checksummed)
    pub account: String,
    pub scanned_at: DateTime<Utc>,
    pub status: ScanStatus,
    /// Positions in display order
    pub positions: Vec<Position>,
    pub totals: Totals,
    /// Per-chain outcomes in table order
    pub chains: Vec<ChainOutcome>,
}

impl ScanResult {
    /// Build from unordered positions. Used when outcomes are not tracked.
    pub fn new(account: Address, mut positions: Vec<Position>) -> Self {
        order_positions(&mut positions);
        let totals = Totals::of(&positions);
        let status = if positions.is_empty() {
            ScanStatus::NoPositionsFound
        } else {
            ScanStatus::PositionsFound {
                count: positions.len(),
            }
        };

        Self {
            account: account.to_string(),
            scanned_at: Utc::now(),
            status,
            positions,
            totals,
            chains: Vec::new(),
        }
    }

    /// Build from every chain's terminal outcome.
    pub fn from_outcomes(account: Address, outcomes: Vec<ChainOutcome>) -> Self {
        let positions = outcomes.iter().filter_map(|o| o.position().cloned()).collect();
        let skipped = outcomes
            .iter()
            .filter(|o| o.status == ChainStatus::Skipped)
            .count();

        let mut result = Self::new(account, positions);
        if skipped > 0 {
            result.status = ScanStatus::Cancelled {
                found: result.positions.len(),
                skipped,
            };
        }
        result.chains = outcomes;
        result
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.status, ScanStatus::Cancelled { .. })
    }

    /// First position in display order, if it carries debt.
    pub fn most_at_risk(&self) -> Option<&Position> {
        self.positions.first().filter(|p| p.has_debt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChainConfig;
    use sentinel_chain::{AccountData, HealthFactor};

    fn position(name: &str, collateral: f64, debt: f64, hf: Option<f64>) -> Position {
        let chain = ChainConfig {
            name: name.to_string(),
            chain_id: 1,
            rpc_urls: vec![],
            pool: Address::ZERO,
        };
        Position::new(
            &chain,
            AccountData {
                collateral_usd: collateral,
                debt_usd: debt,
                available_borrows_usd: 0.0,
                ltv_pct: 80.0,
                liquidation_threshold_pct: 85.0,
                health_factor: hf.map_or(HealthFactor::Infinite, HealthFactor::Finite),
                has_debt: debt > 0.0,
            },
        )
    }

    #[test]
    fn test_ordering() {
        let result = ScanResult::new(
            Address::ZERO,
            vec![
                position("hf-1.2", 2000.0, 1000.0, Some(1.2)),
                position("no-debt-500", 500.0, 0.0, None),
                position("hf-0.9", 1000.0, 950.0, Some(0.9)),
                position("no-debt-1000", 1000.0, 0.0, None),
            ],
        );

        let order: Vec<_> = result.positions.iter().map(|p| p.chain.as_str()).collect();
        assert_eq!(order, vec!["hf-0.9", "hf-1.2", "no-debt-1000", "no-debt-500"]);
        assert_eq!(result.most_at_risk().unwrap().chain, "hf-0.9");
    }

    #[test]
    fn test_totals() {
        let result = ScanResult::new(
            Address::ZERO,
            vec![
                position("a", 1000.0, 400.0, Some(2.1)),
                position("b", 250.0, 0.0, None),
            ],
        );

        assert_eq!(result.totals.collateral_usd, 1250.0);
        assert_eq!(result.totals.debt_usd, 400.0);
        assert_eq!(result.totals.net_usd, Some(850.0));
        assert_eq!(result.status, ScanStatus::PositionsFound { count: 2 });
    }

    #[test]
    fn test_debt_only_has_no_net_value() {
        let totals = Totals::of(&[position("a", 0.0, 100.0, Some(0.0))]);
        assert_eq!(totals.net_usd, None);
        assert_eq!(totals.debt_usd, 100.0);
    }

    #[test]
    fn test_empty_scan() {
        let result = ScanResult::new(Address::ZERO, vec![]);
        assert!(result.is_empty());
        assert_eq!(result.status, ScanStatus::NoPositionsFound);
        assert_eq!(result.totals, Totals::default());
        assert!(result.most_at_risk().is_none());
    }

    #[test]
    fn test_skipped_chain_marks_scan_cancelled() {
        let found = ChainOutcome {
            chain: "A".to_string(),
            chain_id: 1,
            status: ChainStatus::Found {
                endpoint: "http://a".to_string(),
                position: Box::new(position("A", 100.0, 0.0, None)),
            },
        };
        let skipped = ChainOutcome {
            chain: "B".to_string(),
            chain_id: 2,
            status: ChainStatus::Skipped,
        };

        let result = ScanResult::from_outcomes(Address::ZERO, vec![found, skipped]);
        assert!(result.is_cancelled());
        assert_eq!(result.status, ScanStatus::Cancelled { found: 1, skipped: 1 });
        assert_eq!(result.positions.len(), 1);
        assert_eq!(result.chains.len(), 2);
    }

    #[test]
    fn test_no_debt_scan_has_no_most_at_risk() {
        let result = ScanResult::new(Address::ZERO, vec![position("a", 10.0, 0.0, None)]);
        assert!(result.most_at_risk().is_none());
    }
}
