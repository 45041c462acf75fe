//! End-to-end reconstruction against a scripted registry.
//!
//! Every test drives `AutomationReader` through the full pipeline
//! (logs → canonical batch → amendments → decode → merge) with
//! `ScriptedChainReader` standing in for the node.

use std::sync::Arc;

use alloy_primitives::{address, Address, U256};
use alloy_sol_types::SolEvent;
use automation_codec::sub_storage::{content_hash, StrategySub, Subscribe, UpdateData};
use automation_codec::subdata::{
    AaveCloseSubData, AaveLeverageSubData, LimitOrderSubData, SubDataLayout,
};
use automation_codec::trigger::{
    encode_trigger, OffchainPriceTrigger, QuotePriceTrigger, RatioTrigger,
};
use automation_codec::RatioState;
use automation_fetcher::{AutomationError, AutomationReader, QueryOptions};
use automation_transport::test_utils::ScriptedChainReader;
use automation_transport::{BlockRef, NetworkConfig, MULTICALL3_ADDRESS};
use automation_types::{ChainId, StrategyId};

const REGISTRY: Address = address!("00000000000000000000000000000000000005b0");
const AAVE_MARKET: Address = address!("2f39d218133afab8f2b819b1066c7e434ad94e9e");
const USDC: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
const WETH: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");

const AAVE_REPAY_BUNDLE: u64 = 4;
const AAVE_BOOST_BUNDLE: u64 = 5;
const AAVE_CLOSE_TO_DEBT_BUNDLE: u64 = 10;
const LIMIT_ORDER_STRATEGY: u64 = 51;

fn alice() -> Address {
    Address::with_last_byte(0xa1)
}

fn bob() -> Address {
    Address::with_last_byte(0xb0)
}

fn network() -> NetworkConfig {
    NetworkConfig::builtin(ChainId::Mainnet)
        .with_sub_storage(REGISTRY)
        .with_deploy_block(0)
}

fn setup() -> (Arc<ScriptedChainReader>, AutomationReader<Arc<ScriptedChainReader>>) {
    let chain = Arc::new(ScriptedChainReader::new(1, REGISTRY));
    let reader = AutomationReader::new(Arc::clone(&chain), network())
        .expect("registry is configured")
        .with_default_log_span(None);
    (chain, reader)
}

fn ratio(percent: u64) -> U256 {
    U256::from(percent) * U256::from(10u64).pow(U256::from(16u64))
}

fn aave_leverage(bundle: u64, owner: Address, trigger_pct: u64, target_pct: u64) -> StrategySub {
    let state = if bundle == AAVE_BOOST_BUNDLE {
        RatioState::Over
    } else {
        RatioState::Under
    };
    let trigger = RatioTrigger {
        owner,
        market: AAVE_MARKET,
        ratio: ratio(trigger_pct),
        ratioState: state.as_u8(),
    };
    let sub_data = AaveLeverageSubData {
        target_ratio: ratio(target_pct),
        ratio_state: state,
        use_default_market: true,
        use_on_behalf: false,
    };
    StrategySub::new(bundle, true, encode_trigger(&trigger), sub_data.encode())
}

fn aave_close(coll: Address, debt: Address, raw_state: RatioState) -> StrategySub {
    let trigger = QuotePriceTrigger {
        baseToken: coll,
        quoteToken: debt,
        price: U256::from(50_000_000u64),
        ratioState: raw_state.as_u8(),
    };
    let sub_data = AaveCloseSubData {
        coll_asset: coll,
        coll_asset_id: 4,
        debt_asset: debt,
        debt_asset_id: 0,
    };
    StrategySub::new(
        AAVE_CLOSE_TO_DEBT_BUNDLE,
        true,
        encode_trigger(&trigger),
        sub_data.encode(),
    )
}

fn limit_order(good_until: u64) -> StrategySub {
    let trigger = OffchainPriceTrigger {
        limitPrice: U256::from(2_000u64) * U256::from(10u64).pow(U256::from(18u64)),
        goodUntil: U256::from(good_until),
        orderType: 0,
    };
    let sub_data = LimitOrderSubData {
        from_token: WETH,
        to_token: USDC,
        amount: U256::from(10u64).pow(U256::from(18u64)),
    };
    StrategySub::new(
        LIMIT_ORDER_STRATEGY,
        false,
        encode_trigger(&trigger),
        sub_data.encode(),
    )
}

fn sub_id(id: u64) -> U256 {
    U256::from(id)
}

/// subIds 0-2 repay, 3-5 boost, 6 repay; one owner.
fn seed_leverage_fixture(chain: &ScriptedChainReader) {
    for id in 0..7u64 {
        let sub = match id {
            3..=5 => aave_leverage(AAVE_BOOST_BUNDLE, alice(), 165, 150),
            _ => aave_leverage(AAVE_REPAY_BUNDLE, alice(), 120, 150),
        };
        chain.subscribe(sub_id(id), alice(), &sub, 100 + id);
    }
}

#[tokio::test]
async fn test_merge_fixture_pairs_legs_positionally() {
    let (chain, reader) = setup();
    seed_leverage_fixture(&chain);

    let positions = reader
        .get_subscriptions(&QueryOptions::merged())
        .await
        .unwrap();

    let sub_ids: Vec<Vec<u64>> = positions
        .iter()
        .map(|p| p.sub_ids.clone().unwrap())
        .collect();
    assert_eq!(sub_ids, vec![vec![0, 3], vec![1, 4], vec![2, 5], vec![6]]);

    let first = &positions[0];
    assert_eq!(first.specific["triggerRepayRatio"], 120);
    assert_eq!(first.specific["triggerBoostRatio"], 165);
    assert_eq!(first.sub_id, 3);
    assert_eq!(first.block_number, 103);
    assert_eq!(first.strategy.strategy_id, StrategyId::LeverageManagement);
    assert!(first.merge_leg.is_none());
}

#[tokio::test]
async fn test_without_merge_every_leg_is_separate() {
    let (chain, reader) = setup();
    seed_leverage_fixture(&chain);

    let positions = reader
        .get_subscriptions(&QueryOptions::default())
        .await
        .unwrap();

    assert_eq!(positions.len(), 7);
    assert!(positions.iter().all(|p| p.sub_ids.is_none()));
    let ids: Vec<u64> = positions.iter().map(|p| p.sub_id).collect();
    assert_eq!(ids, (0..7).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_fresh_subscription_skips_amendment_lookup() {
    let (chain, reader) = setup();
    chain.subscribe(
        sub_id(379),
        alice(),
        &aave_leverage(AAVE_REPAY_BUNDLE, alice(), 185, 200),
        15_000_000,
    );

    let positions = reader
        .get_subscriptions_for(&[alice()], &QueryOptions::default())
        .await
        .unwrap();

    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].sub_id, 379);
    assert_eq!(positions[0].specific["triggerRepayRatio"], 185);
    assert!(chain.log_queries_for(UpdateData::SIGNATURE_HASH).is_empty());
}

#[tokio::test]
async fn test_amended_subscription_takes_last_update() {
    let (chain, reader) = setup();
    chain.subscribe(
        sub_id(7),
        alice(),
        &aave_leverage(AAVE_REPAY_BUNDLE, alice(), 120, 150),
        100,
    );
    chain.update(sub_id(7), &aave_leverage(AAVE_REPAY_BUNDLE, alice(), 130, 150), 200);
    chain.update(sub_id(7), &aave_leverage(AAVE_REPAY_BUNDLE, alice(), 140, 160), 300);

    let positions = reader
        .get_subscriptions(&QueryOptions::default())
        .await
        .unwrap();

    assert_eq!(positions.len(), 1);
    let position = &positions[0];
    assert_eq!(position.owner, alice());
    assert_eq!(position.block_number, 300);
    assert_eq!(position.specific["triggerRepayRatio"], 140);
    assert_eq!(position.specific["targetRepayRatio"], 160);
    assert_eq!(chain.log_queries_for(UpdateData::SIGNATURE_HASH).len(), 1);
}

#[tokio::test]
async fn test_update_not_reflected_on_chain_is_ignored() {
    let (chain, reader) = setup();
    chain.subscribe(
        sub_id(1),
        alice(),
        &aave_leverage(AAVE_REPAY_BUNDLE, alice(), 120, 150),
        100,
    );
    // event exists but the canonical hash never moved
    chain.update_event_only(sub_id(1), &aave_leverage(AAVE_REPAY_BUNDLE, alice(), 999, 150), 110);

    let positions = reader
        .get_subscriptions(&QueryOptions::default())
        .await
        .unwrap();

    assert_eq!(positions[0].specific["triggerRepayRatio"], 120);
    assert!(chain.log_queries_for(UpdateData::SIGNATURE_HASH).is_empty());
}

#[tokio::test]
async fn test_unreconcilable_payload_is_dropped() {
    let (chain, reader) = setup();
    let created = aave_leverage(AAVE_REPAY_BUNDLE, alice(), 120, 150);
    let unknown = aave_leverage(AAVE_REPAY_BUNDLE, alice(), 121, 150);
    chain.subscribe_event_only(sub_id(2), alice(), &created, 100);
    chain.set_canonical(sub_id(2), alice(), true, content_hash(&unknown));
    chain.subscribe(sub_id(3), alice(), &created, 101);

    let positions = reader
        .get_subscriptions(&QueryOptions::default())
        .await
        .unwrap();

    let ids: Vec<u64> = positions.iter().map(|p| p.sub_id).collect();
    assert_eq!(ids, vec![3]);
}

#[tokio::test]
async fn test_unknown_strategy_is_dropped_without_affecting_others() {
    let (chain, reader) = setup();
    let known = aave_leverage(AAVE_REPAY_BUNDLE, alice(), 120, 150);
    chain.subscribe(sub_id(0), alice(), &known, 100);
    chain.subscribe(
        sub_id(1),
        alice(),
        &StrategySub::new(9_999, true, vec![], vec![]),
        101,
    );
    chain.subscribe(sub_id(2), alice(), &known, 102);

    let positions = reader
        .get_subscriptions(&QueryOptions::default())
        .await
        .unwrap();

    let ids: Vec<u64> = positions.iter().map(|p| p.sub_id).collect();
    assert_eq!(ids, vec![0, 2]);
    for position in &positions {
        assert_eq!(position.specific["triggerRepayRatio"], 120);
        assert_eq!(position.specific["targetRepayRatio"], 150);
    }
}

#[tokio::test]
async fn test_extreme_ratio_decodes_without_failing_the_query() {
    let (chain, reader) = setup();
    chain.subscribe(
        sub_id(0),
        alice(),
        &aave_leverage(AAVE_REPAY_BUNDLE, alice(), 120, 150),
        100,
    );
    // 1e30 raw, past what a Decimal can hold
    chain.subscribe(
        sub_id(1),
        bob(),
        &aave_leverage(AAVE_REPAY_BUNDLE, bob(), 100_000_000_000_000, 150),
        101,
    );
    chain.subscribe(
        sub_id(2),
        alice(),
        &aave_leverage(AAVE_BOOST_BUNDLE, alice(), 165, 150),
        102,
    );

    let positions = reader
        .get_subscriptions(&QueryOptions::merged())
        .await
        .unwrap();

    assert_eq!(positions.len(), 2);
    assert_eq!(positions[0].sub_ids, Some(vec![0, 2]));
    assert_eq!(positions[0].specific["triggerRepayRatio"], 120);
    assert_eq!(positions[1].sub_id, 1);
    assert_eq!(
        positions[1].specific["triggerRepayRatio"],
        "100000000000000"
    );
    assert_eq!(positions[1].specific["targetRepayRatio"], 150);
}

#[tokio::test]
async fn test_unsubscribed_entry_is_dropped() {
    let (chain, reader) = setup();
    let sub = aave_leverage(AAVE_REPAY_BUNDLE, alice(), 120, 150);
    chain.subscribe(sub_id(0), alice(), &sub, 100);
    chain.subscribe(sub_id(1), alice(), &sub, 101);
    chain.remove_canonical(sub_id(0));

    let positions = reader
        .get_subscriptions(&QueryOptions::default())
        .await
        .unwrap();

    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].sub_id, 1);
}

#[tokio::test]
async fn test_enabled_flag_comes_from_canonical_record() {
    let (chain, reader) = setup();
    let sub = aave_leverage(AAVE_REPAY_BUNDLE, alice(), 120, 150);
    chain.subscribe(sub_id(0), alice(), &sub, 100);
    chain.subscribe(sub_id(1), alice(), &sub, 101);
    chain.set_enabled(sub_id(0), false);

    let all = reader
        .get_subscriptions(&QueryOptions::default())
        .await
        .unwrap();
    assert!(!all[0].enabled);
    assert_eq!(all[0].specific["repayEnabled"], false);
    assert!(all[1].enabled);

    let enabled = reader
        .get_subscriptions(&QueryOptions::default().enabled_only(true))
        .await
        .unwrap();
    assert_eq!(enabled.len(), 1);
    assert_eq!(enabled[0].sub_id, 1);
}

#[tokio::test]
async fn test_expired_limit_orders_filtered_on_request() {
    let (chain, reader) = setup();
    chain.subscribe(sub_id(0), alice(), &limit_order(1), 100);
    chain.subscribe(sub_id(1), alice(), &limit_order(4_102_444_800), 101);

    let all = reader
        .get_subscriptions(&QueryOptions::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let live = reader
        .get_subscriptions(&QueryOptions::default().unexpired_only(true))
        .await
        .unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].sub_id, 1);
    assert_eq!(live[0].specific["orderType"], "take-profit");
}

#[tokio::test]
async fn test_close_strategy_display_flip() {
    let (chain, reader) = setup();
    chain.subscribe(sub_id(0), alice(), &aave_close(USDC, WETH, RatioState::Over), 100);
    chain.subscribe(sub_id(1), alice(), &aave_close(WETH, USDC, RatioState::Over), 101);

    let positions = reader
        .get_subscriptions(&QueryOptions::default())
        .await
        .unwrap();

    assert_eq!(positions[0].strategy.strategy_id, StrategyId::StopLoss);
    assert_eq!(positions[0].specific["ratioState"], "under");
    assert_eq!(positions[1].strategy.strategy_id, StrategyId::TakeProfit);
    assert_eq!(positions[1].specific["ratioState"], "over");
}

#[tokio::test]
async fn test_every_position_matches_its_content_hash() {
    let (chain, reader) = setup();
    seed_leverage_fixture(&chain);
    chain.update(sub_id(2), &aave_leverage(AAVE_REPAY_BUNDLE, alice(), 125, 150), 500);
    chain.subscribe(sub_id(7), bob(), &limit_order(4_102_444_800), 600);

    for options in [QueryOptions::default(), QueryOptions::merged()] {
        let positions = reader.get_subscriptions(&options).await.unwrap();
        assert!(!positions.is_empty());
        for position in &positions {
            assert_eq!(
                content_hash(&position.strategy_sub()),
                position.sub_hash,
                "sub {} does not match its hash",
                position.sub_id
            );
        }
    }
}

#[tokio::test]
async fn test_repeated_query_is_identical() {
    let (chain, reader) = setup();
    seed_leverage_fixture(&chain);
    chain.update(sub_id(4), &aave_leverage(AAVE_BOOST_BUNDLE, alice(), 170, 150), 400);

    let options = QueryOptions::merged().at_block(BlockRef::Number(1_000));
    let first = reader.get_subscriptions(&options).await.unwrap();
    let first_calls = chain.recorded_calls();
    let first_queries = chain.log_queries();

    chain.clear_recordings();
    let second = reader.get_subscriptions(&options).await.unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(chain.recorded_calls(), first_calls);
    assert_eq!(chain.log_queries(), first_queries);
}

#[tokio::test]
async fn test_owner_filter() {
    let (chain, reader) = setup();
    let sub = aave_leverage(AAVE_REPAY_BUNDLE, alice(), 120, 150);
    chain.subscribe(sub_id(0), alice(), &sub, 100);
    chain.subscribe(sub_id(1), alice(), &sub, 101);
    chain.subscribe(sub_id(2), bob(), &sub, 102);

    let bobs = reader
        .get_subscriptions_for(&[bob()], &QueryOptions::default())
        .await
        .unwrap();
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0].owner, bob());

    let both = reader
        .get_subscriptions_for(&[alice(), bob()], &QueryOptions::default())
        .await
        .unwrap();
    assert_eq!(both.len(), 3);

    let nobody = reader
        .get_subscriptions_for(&[Address::with_last_byte(0xcc)], &QueryOptions::default())
        .await
        .unwrap();
    assert!(nobody.is_empty());
}

#[tokio::test]
async fn test_empty_owner_list_makes_no_requests() {
    let (chain, reader) = setup();
    seed_leverage_fixture(&chain);

    let positions = reader
        .get_subscriptions_for(&[], &QueryOptions::default())
        .await
        .unwrap();

    assert!(positions.is_empty());
    assert!(chain.recorded_calls().is_empty());
    assert!(chain.log_queries().is_empty());
}

#[tokio::test]
async fn test_canonical_records_read_in_one_batch_at_snapshot() {
    let chain = Arc::new(ScriptedChainReader::new(1, REGISTRY).with_head(12_345_678));
    let reader = AutomationReader::new(Arc::clone(&chain), network())
        .expect("registry is configured")
        .with_default_log_span(None);
    seed_leverage_fixture(&chain);

    reader
        .get_subscriptions(&QueryOptions::default())
        .await
        .unwrap();

    let calls = chain.recorded_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].to, MULTICALL3_ADDRESS);
    assert_eq!(calls[0].batch_size, Some(7));
    assert_eq!(calls[0].block, BlockRef::Number(12_345_678));
}

#[tokio::test]
async fn test_log_span_splits_queries() {
    let (chain, reader) = setup();
    let sub = aave_leverage(AAVE_REPAY_BUNDLE, alice(), 120, 150);
    chain.subscribe(sub_id(0), alice(), &sub, 100);
    chain.subscribe(sub_id(1), alice(), &sub, 2_500);

    let options = QueryOptions::default()
        .at_block(BlockRef::Number(2_999))
        .with_log_span(1_000);
    let positions = reader.get_subscriptions(&options).await.unwrap();
    assert_eq!(positions.len(), 2);

    let windows: Vec<(u64, u64)> = chain
        .log_queries_for(Subscribe::SIGNATURE_HASH)
        .iter()
        .map(|q| (q.from_block, q.to_block))
        .collect();
    assert_eq!(windows, vec![(0, 999), (1_000, 1_999), (2_000, 2_999)]);
}

#[tokio::test]
async fn test_events_after_snapshot_are_ignored() {
    let (chain, reader) = setup();
    let sub = aave_leverage(AAVE_REPAY_BUNDLE, alice(), 120, 150);
    chain.subscribe(sub_id(0), alice(), &sub, 100);
    chain.subscribe(sub_id(1), alice(), &sub, 5_000);

    let positions = reader
        .get_subscriptions(&QueryOptions::default().at_block(BlockRef::Number(1_000)))
        .await
        .unwrap();
    assert_eq!(positions.len(), 1);

    let inverted = QueryOptions::default()
        .from_block(2_000)
        .at_block(BlockRef::Number(1_000));
    assert!(reader.get_subscriptions(&inverted).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_transport_failures_propagate() {
    let (chain, reader) = setup();
    seed_leverage_fixture(&chain);

    chain.fail_logs(true);
    let err = reader
        .get_subscriptions(&QueryOptions::default())
        .await
        .unwrap_err();
    assert!(format!("{:#}", err).contains("scripted transport failure"));

    chain.fail_logs(false);
    chain.fail_calls(true);
    let err = reader
        .get_subscriptions(&QueryOptions::default())
        .await
        .unwrap_err();
    assert!(format!("{:#}", err).contains("scripted transport failure"));
}

#[tokio::test]
async fn test_configuration_errors() {
    let chain = Arc::new(ScriptedChainReader::new(1, REGISTRY));
    let err = AutomationReader::new(Arc::clone(&chain), NetworkConfig::builtin(ChainId::Base))
        .err()
        .unwrap();
    assert!(matches!(err, AutomationError::MissingRegistryAddress(ChainId::Base)));

    let optimism = Arc::new(ScriptedChainReader::new(10, REGISTRY));
    let err = AutomationReader::connect(optimism, network())
        .await
        .err()
        .unwrap();
    assert!(matches!(
        err.downcast_ref::<AutomationError>(),
        Some(AutomationError::ChainIdMismatch {
            expected: 1,
            actual: 10
        })
    ));

    let goerli = Arc::new(ScriptedChainReader::new(5, REGISTRY));
    let err = AutomationReader::detect(goerli).await.err().unwrap();
    assert!(matches!(
        err.downcast_ref::<AutomationError>(),
        Some(AutomationError::UnsupportedChain(5))
    ));

    let connected = AutomationReader::connect(chain, network()).await.unwrap();
    assert_eq!(connected.chain(), ChainId::Mainnet);
}
