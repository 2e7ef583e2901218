//! Aave v3 position scanning.
//!
//! This crate resolves one account's Aave v3 positions across many EVM chains:
//! - Chain table with ordered RPC endpoints per chain
//! - Per-chain resolution with endpoint fallback and failure isolation
//! - Risk tiers and warnings derived from the health factor
//! - Cross-chain ordering and totals

mod aggregator;
pub mod config;
mod error;
mod position;
mod resolver;
pub mod risk;

pub use aggregator::{order_positions, urgency_order, ScanResult, ScanStatus, Totals};
pub use config::{ChainConfig, ChainTable, ScanConfig, SentinelConfig};
pub use error::SentinelError;
pub use position::Position;
pub use resolver::{ChainOutcome, ChainStatus, PositionResolver, ScanCancel};
pub use risk::{RiskAssessment, RiskTier, WarningClass};
