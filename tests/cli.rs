//! End-to-end tests for the `sui-address` binary.

#![allow(deprecated)] // Command::cargo_bin is deprecated but still works

use assert_cmd::Command;
use predicates::prelude::*;

const FILM: &str = "film crazy soon outside stand loop subway crumble thrive popular green \
                    nuclear struggle pistol arm wife phrase warfare march wheat nephew ask \
                    sunny firm";
const FILM_ADDRESS: &str = "0xa2d14fad60c56049ecf75246a481934691214ce413e6a8ae2fe6834c173a6133";
const FILM_K1_ADDRESS: &str = "0x9e8f732575cc5386f8df3c784cd3ed1b53ce538da79926b2ad54dcc1197d2532";

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("sui-address").unwrap();
    cmd.env_remove("SUI_MNEMONIC")
        .env_remove("SUI_PASSPHRASE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn prints_only_the_address() {
    cli()
        .args(["--mnemonic", FILM])
        .assert()
        .success()
        .stdout(format!("{FILM_ADDRESS}\n"));
}

#[test]
fn reads_mnemonic_from_environment() {
    cli()
        .env("SUI_MNEMONIC", FILM)
        .arg("address")
        .assert()
        .success()
        .stdout(format!("{FILM_ADDRESS}\n"));
}

#[test]
fn explicit_default_path_matches() {
    cli()
        .args(["--mnemonic", FILM, "--path", "m/44'/784'/0'/0'/0'"])
        .assert()
        .success()
        .stdout(format!("{FILM_ADDRESS}\n"));
}

#[test]
fn bad_mnemonic_fails_without_output() {
    cli()
        .args(["--mnemonic", "film crazy soon"])
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("invalid mnemonic"));
}

#[test]
fn missing_mnemonic_fails() {
    cli()
        .assert()
        .failure()
        .stderr(predicate::str::contains("SUI_MNEMONIC"));
}

#[test]
fn path_must_suit_scheme() {
    cli()
        .args(["--mnemonic", FILM, "--path", "m/44'/784'/0'/0/0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("hardened"));
}

#[test]
fn secp256k1_address_matches_known_value() {
    cli()
        .args(["--mnemonic", FILM, "--scheme", "secp256k1"])
        .assert()
        .success()
        .stdout(format!("{FILM_K1_ADDRESS}\n"));
}

#[test]
fn generate_prints_mnemonic_and_address() {
    cli()
        .args(["generate", "--words", "24"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Mnemonic: ").and(predicate::str::contains("Address:  0x")),
        );
}

#[test]
fn sign_then_verify() {
    let output = cli()
        .args(["sign", "--mnemonic", FILM, "--message", "hello"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let signature = String::from_utf8(output.stdout).unwrap();

    cli()
        .args(["verify", "--message", "hello", "--signature", signature.trim()])
        .args(["--address", FILM_ADDRESS])
        .assert()
        .success()
        .stdout(format!("{FILM_ADDRESS}\n"));

    cli()
        .args(["verify", "--message", "hullo", "--signature", signature.trim()])
        .assert()
        .failure();
}
