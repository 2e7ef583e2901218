//! Plain-text report for a finished scan.

use std::fmt::Write;

use sentinel_core::{Position, ScanResult, ScanStatus, Totals};

/// Render the full report printed after the header.
pub fn report(result: &ScanResult, account: &str) -> String {
    let mut out = String::new();

    for position in &result.positions {
        write_position(&mut out, position);
    }
    if !result.is_empty() {
        write_totals(&mut out, &result.totals, result.positions.len());
        if let Some(position) = result.most_at_risk() {
            let _ = writeln!(
                out,
                "  Most at risk:  {} (HF {})",
                position.chain,
                position.health_factor()
            );
        }
    }

    match result.status {
        ScanStatus::Cancelled { skipped, .. } => {
            if !result.is_empty() {
                out.push('\n');
            }
            let noun = if skipped == 1 { "chain" } else { "chains" };
            let _ = writeln!(
                out,
                "Scan interrupted: {skipped} {noun} not checked for {account}"
            );
        }
        ScanStatus::NoPositionsFound => {
            let _ = writeln!(out, "No Aave v3 positions found for {account}");
        }
        ScanStatus::PositionsFound { .. } => {}
    }
    out
}

/// Header printed before any network activity.
pub fn header(account: &str) -> String {
    format!("Scanning Aave v3 positions for {account}...\n")
}

fn write_position(out: &mut String, position: &Position) {
    let account = &position.account;

    let _ = writeln!(out, "=== {} \u{2014} Aave v3 ===", position.chain);
    let _ = writeln!(out, "  Collateral:    {}", usd(account.collateral_usd));
    let _ = writeln!(out, "  Debt:          {}", usd(account.debt_usd));
    let _ = writeln!(out, "  Available:     {}", usd(account.available_borrows_usd));
    let _ = writeln!(out, "  LTV:           {:.1}%", account.ltv_pct);
    let _ = writeln!(out, "  Liq Threshold: {:.1}%", account.liquidation_threshold_pct);

    if position.has_debt() {
        let _ = writeln!(
            out,
            "  Health Factor: {}  [{}]",
            position.health_factor(),
            position.tier().label()
        );
    } else {
        let _ = writeln!(out, "  Health Factor: inf  [No debt]");
    }

    if let Some(warning) = position.warning() {
        let _ = writeln!(out, "  ! {}", warning.message());
    }
    out.push('\n');
}

fn write_totals(out: &mut String, totals: &Totals, count: usize) {
    let noun = if count == 1 { "chain" } else { "chains" };
    let _ = writeln!(out, "=== Total across {count} {noun} ===");
    let _ = writeln!(out, "  Collateral:    {}", usd(totals.collateral_usd));
    let _ = writeln!(out, "  Debt:          {}", usd(totals.debt_usd));
    if let Some(net) = totals.net_usd {
        let _ = writeln!(out, "  Net:           {}", usd(net));
    }
}

/// `$1,234.56`, with the sign ahead of the dollar.
pub fn usd(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{frac}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_chain::{AccountData, Address, HealthFactor};
    use sentinel_core::{ChainConfig, ChainOutcome, ChainStatus};

    fn position(chain: &str, debt: f64, hf: HealthFactor) -> Position {
        let config = ChainConfig {
            name: chain.to_string(),
            chain_id: 1,
            rpc_urls: vec![],
            pool: Address::ZERO,
        };
        Position::new(
            &config,
            AccountData {
                collateral_usd: 12_345.678,
                debt_usd: debt,
                available_borrows_usd: 1_000.0,
                ltv_pct: 80.5,
                liquidation_threshold_pct: 82.25,
                health_factor: hf,
                has_debt: debt > 0.0,
            },
        )
    }

    #[test]
    fn test_usd() {
        assert_eq!(usd(0.0), "$0.00");
        assert_eq!(usd(999.999), "$1,000.00");
        assert_eq!(usd(1234.5), "$1,234.50");
        assert_eq!(usd(1_234_567.891), "$1,234,567.89");
        assert_eq!(usd(-2500.0), "-$2,500.00");
        assert_eq!(usd(-0.001), "$0.00");
    }

    #[test]
    fn test_empty_report() {
        let result = ScanResult::new(Address::ZERO, vec![]);
        assert_eq!(
            report(&result, "0xabc"),
            "No Aave v3 positions found for 0xabc\n"
        );
    }

    #[test]
    fn test_position_block() {
        let result = ScanResult::new(
            Address::ZERO,
            vec![position("Arbitrum", 10_000.0, HealthFactor::Finite(1.05))],
        );
        let text = report(&result, "0xabc");

        assert!(text.starts_with("=== Arbitrum \u{2014} Aave v3 ===\n"));
        assert!(text.contains("  Collateral:    $12,345.68\n"));
        assert!(text.contains("  LTV:           80.5%\n"));
        assert!(text.contains("  Health Factor: 1.0500  [DANGER]\n"));
        assert!(text.contains("Liquidation imminent"));
        assert!(text.contains("=== Total across 1 chain ===\n"));
        assert!(text.contains("  Net:           $2,345.68\n"));
        assert!(text.contains("  Most at risk:  Arbitrum (HF 1.0500)\n"));
    }

    #[test]
    fn test_interrupted_scan_is_not_reported_as_empty() {
        let skipped = ChainOutcome {
            chain: "Polygon".to_string(),
            chain_id: 137,
            status: ChainStatus::Skipped,
        };
        let result = ScanResult::from_outcomes(Address::ZERO, vec![skipped]);
        let text = report(&result, "0xabc");

        assert!(!text.contains("No Aave v3 positions found"));
        assert_eq!(text, "Scan interrupted: 1 chain not checked for 0xabc\n");
    }

    #[test]
    fn test_no_debt_block() {
        let result = ScanResult::new(
            Address::ZERO,
            vec![position("Base", 0.0, HealthFactor::Infinite)],
        );
        let text = report(&result, "0xabc");

        assert!(text.contains("  Health Factor: inf  [No debt]\n"));
        assert!(!text.contains("  ! "));
        assert!(!text.contains("Most at risk"));
    }
}
