//! End-to-end scans against scripted RPC endpoints.

use std::sync::Arc;

use alloy::primitives::Address;
use sentinel_chain::transport::mock::{Reply, ScriptedTransport};
use sentinel_chain::{EndpointResolver, HealthFactor, HttpTransport};
use sentinel_core::{
    ChainConfig, ChainStatus, ChainTable, PositionResolver, RiskTier, ScanCancel, ScanStatus,
    SentinelConfig, SentinelError, WarningClass,
};

const ACCOUNT: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
const WAD: u128 = 1_000_000_000_000_000_000;
const USD: u128 = 100_000_000;

fn account_data(words: [u128; 6]) -> Reply {
    let body: String = words.iter().map(|w| format!("{w:064x}")).collect();
    Reply::Result(format!("0x{body}"))
}

fn chain(name: &str, chain_id: u64, urls: &[&str]) -> ChainConfig {
    ChainConfig {
        name: name.to_string(),
        chain_id,
        rpc_urls: urls.iter().map(|u| u.to_string()).collect(),
        pool: Address::repeat_byte(0xaa),
    }
}

fn resolver(transport: ScriptedTransport, chains: Vec<ChainConfig>) -> PositionResolver {
    let table = ChainTable::new(chains).unwrap();
    PositionResolver::new(table, EndpointResolver::new(Arc::new(transport)))
}

#[tokio::test]
async fn test_empty_account_reports_no_positions() {
    let transport = ScriptedTransport::new()
        .reply("http://eth", account_data([0; 6]))
        .reply("http://arb", account_data([0; 6]));
    let resolver = resolver(
        transport,
        vec![chain("Ethereum", 1, &["http://eth"]), chain("Arbitrum", 42161, &["http://arb"])],
    );

    let result = resolver.scan(ACCOUNT, &ScanCancel::new()).await.unwrap();

    assert_eq!(result.status, ScanStatus::NoPositionsFound);
    assert!(result.is_empty());
    assert_eq!(result.totals.collateral_usd, 0.0);
    assert_eq!(result.totals.debt_usd, 0.0);
    assert_eq!(result.totals.net_usd, None);
    assert!(result
        .chains
        .iter()
        .all(|o| matches!(o.status, ChainStatus::NoPosition { .. })));
}

#[tokio::test]
async fn test_mixed_chains() {
    let transport = ScriptedTransport::new()
        // Ethereum: primary down, fallback serves a leveraged position
        .reply("http://eth-1", Reply::Status(429))
        .reply(
            "http://eth-2",
            account_data([
                10_000 * USD,
                9_200 * USD,
                0,
                8_300,
                8_000,
                1_050_000_000_000_000_000,
            ]),
        )
        // Polygon: collateral only
        .reply("http://poly", account_data([2_500 * USD, 0, 1_900 * USD, 8_000, 7_500, 0]))
        // Optimism: every endpoint unreachable
        .reply("http://op", Reply::Garbage)
        // Base: comfortable position
        .reply(
            "http://base",
            account_data([5_000 * USD, 1_000 * USD, 2_000 * USD, 8_250, 8_000, 4 * WAD]),
        );

    let resolver = resolver(
        transport,
        vec![
            chain("Ethereum", 1, &["http://eth-1", "http://eth-2"]),
            chain("Polygon", 137, &["http://poly"]),
            chain("Optimism", 10, &["http://op"]),
            chain("Base", 8453, &["http://base"]),
        ],
    );

    let result = resolver.scan(ACCOUNT, &ScanCancel::new()).await.unwrap();

    assert_eq!(result.status, ScanStatus::PositionsFound { count: 3 });
    let order: Vec<_> = result.positions.iter().map(|p| p.chain.as_str()).collect();
    assert_eq!(order, vec!["Ethereum", "Base", "Polygon"]);

    let eth = &result.positions[0];
    assert_eq!(eth.tier(), RiskTier::Danger);
    assert_eq!(eth.warning(), Some(WarningClass::Imminent));
    assert!((eth.account.liquidation_threshold_pct - 83.0).abs() < 1e-9);

    let poly = &result.positions[2];
    assert_eq!(poly.health_factor(), HealthFactor::Infinite);
    assert_eq!(poly.tier(), RiskTier::NoDebt);

    assert!((result.totals.collateral_usd - 17_500.0).abs() < 1e-6);
    assert!((result.totals.debt_usd - 10_200.0).abs() < 1e-6);
    assert!((result.totals.net_usd.unwrap() - 7_300.0).abs() < 1e-6);

    assert!(matches!(
        &result.chains[0].status,
        ChainStatus::Found { endpoint, .. } if endpoint == "http://eth-2"
    ));
    assert!(matches!(result.chains[2].status, ChainStatus::Unavailable { .. }));
}

#[tokio::test]
async fn test_result_serializes_for_json_output() {
    let transport = ScriptedTransport::new().reply(
        "http://gnosis",
        account_data([100 * USD, 0, 80 * USD, 8_000, 7_700, 0]),
    );
    let resolver = resolver(transport, vec![chain("Gnosis", 100, &["http://gnosis"])]);

    let result = resolver.scan(ACCOUNT, &ScanCancel::new()).await.unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["status"]["status"], "positions_found");
    assert_eq!(json["positions"][0]["chain"], "Gnosis");
    assert_eq!(json["positions"][0]["health_factor"], "inf");
    assert_eq!(json["positions"][0]["tier"], "no_debt");
    assert_eq!(json["totals"]["collateral_usd"], 100.0);
    assert_eq!(json["chains"][0]["status"], "found");
}

#[tokio::test]
async fn test_invalid_address_is_rejected() {
    let resolver = resolver(ScriptedTransport::new(), vec![chain("A", 1, &["http://a"])]);
    let padded = format!(" {ACCOUNT} ");
    let inputs = [
        "",
        "0x",
        "0x1234",
        "zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz",
        &ACCOUNT[2..],
        padded.as_str(),
    ];
    for bad in inputs {
        let err = resolver.scan(bad, &ScanCancel::new()).await.unwrap_err();
        assert!(matches!(err, SentinelError::InvalidAddress { .. }), "{bad:?}");
    }
}

#[tokio::test]
async fn test_cancelled_scan_is_not_reported_as_empty() {
    let transport = ScriptedTransport::new()
        .reply("http://funded", account_data([100 * USD, 0, 80 * USD, 8_000, 7_700, 0]));
    let resolver = resolver(transport, vec![chain("Funded", 1, &["http://funded"])]);
    let cancel = ScanCancel::new();
    cancel.cancel();

    let result = resolver.scan(ACCOUNT, &cancel).await.unwrap();

    assert_eq!(result.status, ScanStatus::Cancelled { found: 0, skipped: 1 });
    assert_ne!(result.status, ScanStatus::NoPositionsFound);
    assert!(result.is_cancelled());
    assert_eq!(result.chains[0].status, ChainStatus::Skipped);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["status"]["status"], "cancelled");
    assert_eq!(json["status"]["skipped"], 1);
}

#[tokio::test]
#[ignore = "requires network access to public RPC endpoints"]
async fn test_live_scan_builtin_chains() {
    let config = SentinelConfig::default();
    let resolver = PositionResolver::from_config(&config, Arc::new(HttpTransport::new()));

    let result = resolver.scan(ACCOUNT, &ScanCancel::new()).await.unwrap();

    assert_eq!(result.chains.len(), config.chains.len());
    for outcome in &result.chains {
        println!("{}: {:?}", outcome.chain, outcome.status);
    }
}
