//! Sui address derivation CLI
//!
//! Usage:
//!   SUI_MNEMONIC="..." sui-address                    # ed25519 address at m/44'/784'/0'/0'/0'
//!   sui-address --scheme secp256k1 -m "..."           # secp256k1 address at m/54'/784'/0'/0/0
//!   sui-address generate --words 24                   # new mnemonic plus its address
//!   sui-address sign -m "..." --message hello         # personal-message signature

use std::process;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sui_address::config::{Command, KeyArgs};
use sui_address::{
    Config, DerivationPath, Mnemonic, MnemonicLen, SignatureScheme, SuiAddress, SuiKeypair,
    SuiSignature,
};

fn main() {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(config) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(config: Config) -> anyhow::Result<()> {
    match config.command {
        None => print_address(&config.key),
        Some(Command::Address(key)) => print_address(&key),
        Some(Command::Generate { words, scheme }) => generate(words, scheme),
        Some(Command::Sign { key, message }) => {
            let keypair = key.keypair().context("failed to derive keypair")?;
            let signature = keypair.sign_personal_message(message.as_bytes());
            tracing::info!(address = %keypair.address(), "signed personal message");
            println!("{}", signature.to_hex());
            Ok(())
        }
        Some(Command::Verify {
            message,
            signature,
            address,
        }) => verify(&message, &signature, address),
    }
}

fn print_address(key: &KeyArgs) -> anyhow::Result<()> {
    let keypair = key.keypair().context("failed to derive keypair")?;
    tracing::info!(scheme = %key.scheme, path = %key.derivation_path(), "derived address");
    println!("{}", keypair.address());
    Ok(())
}

fn generate(words: usize, scheme: SignatureScheme) -> anyhow::Result<()> {
    let mnemonic = Mnemonic::generate(MnemonicLen::from_word_count(words)?);
    let path = DerivationPath::default_for(scheme);
    let keypair = SuiKeypair::derive(&mnemonic, "", &path, scheme)
        .context("failed to derive keypair from the new mnemonic")?;

    println!("Mnemonic: {}", mnemonic.phrase());
    println!("Path:     {}", path);
    println!("Scheme:   {}", scheme);
    println!("Address:  {}", keypair.address());
    Ok(())
}

fn verify(
    message: &str,
    signature: &str,
    expected: Option<SuiAddress>,
) -> anyhow::Result<()> {
    let bytes = hex::decode(signature.trim_start_matches("0x"))
        .context("signature is not valid hex")?;
    let signature = SuiSignature::from_bytes(bytes)?;
    signature.verify_personal_message(message.as_bytes())?;

    let signer = signature.public_key()?.to_sui_address();
    if let Some(expected) = expected {
        anyhow::ensure!(
            signer == expected,
            "signature is valid but was made by {signer}, not {expected}"
        );
    }
    println!("{}", signer);
    Ok(())
}
