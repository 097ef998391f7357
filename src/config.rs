//! Command-line configuration.

use clap::{Args, Parser, Subcommand};

use crate::address::SuiAddress;
use crate::error::{KeyError, Result};
use crate::keypair::{SignatureScheme, SuiKeypair};
use crate::mnemonic::Mnemonic;
use crate::path::DerivationPath;

/// Derive Sui addresses from a BIP-39 mnemonic
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Config {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub key: KeyArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the address for a mnemonic (the default)
    Address(KeyArgs),

    /// Create a fresh mnemonic and print it with its first address
    Generate {
        /// Number of words: 12, 15, 18, 21 or 24
        #[arg(short, long, default_value = "12")]
        words: usize,

        /// Key scheme: ed25519 or secp256k1
        #[arg(short, long, default_value = "ed25519")]
        scheme: SignatureScheme,
    },

    /// Sign a personal message and print the serialized signature as hex
    Sign {
        #[command(flatten)]
        key: KeyArgs,

        /// Message text to sign
        #[arg(long)]
        message: String,
    },

    /// Verify a hex signature produced by `sign`
    Verify {
        /// Message text that was signed
        #[arg(long)]
        message: String,

        /// Serialized signature in hex
        #[arg(long)]
        signature: String,

        /// Also require the signer to have this address
        #[arg(long)]
        address: Option<SuiAddress>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct KeyArgs {
    /// Mnemonic phrase (prefer the environment variable over the flag)
    #[arg(short, long, env = "SUI_MNEMONIC", hide_env_values = true)]
    pub mnemonic: Option<String>,

    /// Derivation path (default depends on the scheme)
    #[arg(short, long)]
    pub path: Option<DerivationPath>,

    /// Key scheme: ed25519 or secp256k1
    #[arg(short, long, default_value = "ed25519")]
    pub scheme: SignatureScheme,

    /// Optional BIP-39 passphrase
    #[arg(long, env = "SUI_PASSPHRASE", hide_env_values = true, default_value = "")]
    pub passphrase: String,
}

impl KeyArgs {
    /// Returns the explicit path, or the scheme's default one.
    pub fn derivation_path(&self) -> DerivationPath {
        self.path
            .clone()
            .unwrap_or_else(|| DerivationPath::default_for(self.scheme))
    }

    /// Validates the arguments before any key material is touched.
    pub fn validate(&self) -> Result<()> {
        if self.mnemonic.as_deref().map_or(true, |m| m.trim().is_empty()) {
            return Err(KeyError::InvalidMnemonic(
                "no mnemonic given; pass --mnemonic or set SUI_MNEMONIC".into(),
            ));
        }
        self.derivation_path().validate_for(self.scheme)
    }

    pub fn keypair(&self) -> Result<SuiKeypair> {
        self.validate()?;
        let mnemonic = Mnemonic::parse(self.mnemonic.as_deref().unwrap_or_default())?;
        SuiKeypair::derive(
            &mnemonic,
            &self.passphrase,
            &self.derivation_path(),
            self.scheme,
        )
    }
}
