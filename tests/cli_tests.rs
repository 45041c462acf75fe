#![allow(deprecated)]
//! Integration tests for automation-cli

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

const NETWORK_ENV: [&str; 8] = [
    "AUTOMATION_SUB_STORAGE_MAINNET",
    "AUTOMATION_SUB_STORAGE_OPTIMISM",
    "AUTOMATION_SUB_STORAGE_ARBITRUM",
    "AUTOMATION_SUB_STORAGE_BASE",
    "AUTOMATION_DEPLOY_BLOCK_MAINNET",
    "AUTOMATION_DEPLOY_BLOCK_OPTIMISM",
    "AUTOMATION_DEPLOY_BLOCK_ARBITRUM",
    "AUTOMATION_DEPLOY_BLOCK_BASE",
];

fn automation_cmd() -> Command {
    let mut cmd = Command::cargo_bin("automation-cli").expect("binary not found");
    cmd.env_remove("AUTOMATION_RPC_URL");
    for key in NETWORK_ENV {
        cmd.env_remove(key);
    }
    cmd
}

// ============================================================================
// Help and argument parsing
// ============================================================================

#[test]
fn test_help_output() {
    automation_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("positions"))
        .stdout(predicate::str::contains("networks"));
}

#[test]
fn test_positions_help_lists_filters() {
    automation_cmd()
        .args(["positions", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--owner"))
        .stdout(predicate::str::contains("--merge"))
        .stdout(predicate::str::contains("--enabled-only"))
        .stdout(predicate::str::contains("--unexpired-only"));
}

#[test]
fn test_positions_requires_rpc_url() {
    automation_cmd()
        .arg("positions")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--rpc-url"));
}

#[test]
fn test_unknown_chain_rejected() {
    automation_cmd()
        .args(["positions", "--chain", "polygon", "--rpc-url", "http://127.0.0.1:1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported network"));
}

#[test]
fn test_invalid_owner_rejected() {
    automation_cmd()
        .args(["positions", "--rpc-url", "http://127.0.0.1:1", "--owner", "0xnothex"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--owner"));
}

// ============================================================================
// Networks
// ============================================================================

#[test]
fn test_networks_table() {
    automation_cmd()
        .arg("networks")
        .assert()
        .success()
        .stdout(predicate::str::contains("mainnet"))
        .stdout(predicate::str::contains("arbitrum"))
        .stdout(predicate::str::contains("(not configured)"));
}

#[test]
fn test_networks_json() {
    let output = automation_cmd()
        .args(["--json", "networks"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).expect("Should be valid JSON");
    let networks = json.as_array().expect("array of networks");
    assert_eq!(networks.len(), 4);
    assert_eq!(networks[0]["chain"], 1);
    assert_eq!(networks[0]["deployBlock"], 14_171_278);
    assert!(networks[3]["subStorage"].is_null());
}

#[test]
fn test_registry_override_from_env() {
    let output = automation_cmd()
        .env(
            "AUTOMATION_SUB_STORAGE_BASE",
            "0x0000000000000000000000000000000000000abc",
        )
        .env("AUTOMATION_DEPLOY_BLOCK_BASE", "1234")
        .args(["networks", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).expect("Should be valid JSON");
    let base = &json[3];
    assert_eq!(base["chain"], 8453);
    assert_eq!(base["deployBlock"], 1234);
    assert_eq!(
        base["subStorage"].as_str().map(str::to_lowercase).as_deref(),
        Some("0x0000000000000000000000000000000000000abc")
    );
}

// ============================================================================
// Positions
// ============================================================================

#[test]
fn test_unconfigured_network_fails() {
    automation_cmd()
        .args(["positions", "--chain", "base", "--rpc-url", "http://127.0.0.1:1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to connect"));
}

#[test]
fn test_unreachable_endpoint_fails() {
    automation_cmd()
        .args(["positions", "--rpc-url", "http://127.0.0.1:1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to connect"));
}

#[test]
#[cfg(feature = "network-tests")]
#[ignore = "requires network access to an Ethereum mainnet RPC endpoint"]
fn test_positions_json_mainnet() {
    let rpc_url =
        std::env::var("AUTOMATION_RPC_URL").unwrap_or_else(|_| "https://eth.llamarpc.com".into());
    let output = automation_cmd()
        .args([
            "--json",
            "positions",
            "--rpc-url",
            &rpc_url,
            "--from-block",
            "14171278",
            "--block",
            "14300000",
            "--log-span",
            "10000",
            "--merge",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).expect("Should be valid JSON");
    for position in json.as_array().expect("array of positions") {
        assert_eq!(position["chainId"], 1);
        assert!(position["subIds"].is_array());
    }
}
