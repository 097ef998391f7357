//! Derives Sui account addresses from BIP-39 mnemonics.
//!
//! - `mnemonic`: phrase generation, parsing and seed stretching
//! - `path`: derivation paths and the layouts Sui wallets use
//! - `slip10`, `derivation`: Ed25519 and secp256k1 key trees
//! - `keypair`: scheme flags and personal-message signatures
//! - `address`: address hashing and formatting

pub mod address;
pub mod config;
pub mod derivation;
pub mod error;
pub mod keypair;
pub mod mnemonic;
pub mod path;
pub mod slip10;

pub use address::SuiAddress;
pub use config::Config;
pub use error::KeyError;
pub use keypair::{SignatureScheme, SuiKeypair, SuiPublicKey, SuiSignature};
pub use mnemonic::{Mnemonic, MnemonicLen};
pub use path::DerivationPath;
