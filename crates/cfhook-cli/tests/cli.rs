//! Binary-contract tests: exit codes as dehydrated sees them.

use assert_cmd::Command;
use predicates::prelude::*;

fn hook() -> Command {
    let mut cmd = Command::cargo_bin("dehydrated-cloudflare").unwrap();
    for var in [
        "CF_API_EMAIL",
        "CF_API_KEY",
        "CF_DNS_SERVERS",
        "CF_CACHEFILE",
        "CF_DEBUG",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn deploy_cert_is_a_noop() {
    hook()
        .args([
            "deploy_cert",
            "example.com",
            "/tmp/privkey.pem",
            "/tmp/cert.pem",
            "/tmp/fullchain.pem",
            "/tmp/chain.pem",
            "1700000000",
        ])
        .assert()
        .success();
}

#[test]
fn unchanged_cert_is_a_noop() {
    hook()
        .args([
            "unchanged_cert",
            "example.com",
            "/tmp/privkey.pem",
            "/tmp/cert.pem",
            "/tmp/fullchain.pem",
            "/tmp/chain.pem",
        ])
        .assert()
        .success();
}

#[test]
fn unknown_hooks_are_ignored() {
    hook()
        .args(["startup_hook"])
        .assert()
        .success();

    hook()
        .args(["invalid_challenge", "example.com", "some response"])
        .assert()
        .success();
}

#[test]
fn deploy_challenge_requires_credentials() {
    hook()
        .args(["deploy_challenge", "example.com", "token", "validation"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CF_API_EMAIL"));
}

#[test]
fn clean_challenge_requires_credentials() {
    hook()
        .args(["clean_challenge", "example.com", "token", "validation"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CF_API_EMAIL"));
}
