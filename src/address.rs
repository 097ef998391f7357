//! Sui account addresses.

use std::fmt;
use std::str::FromStr;

use crate::error::KeyError;
use crate::keypair::SuiPublicKey;

pub const SUI_ADDRESS_LENGTH: usize = 32;

/// `BLAKE2b-256(flag || public_key)`, shown as `0x` plus 64 hex digits.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SuiAddress([u8; SUI_ADDRESS_LENGTH]);

impl SuiAddress {
    pub const fn from_bytes(bytes: [u8; SUI_ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_public_key(public_key: &SuiPublicKey) -> Self {
        let mut state = blake2b_simd::Params::new()
            .hash_length(SUI_ADDRESS_LENGTH)
            .to_state();
        state.update(&[public_key.scheme().flag()]);
        state.update(public_key.as_bytes());

        let mut bytes = [0u8; SUI_ADDRESS_LENGTH];
        bytes.copy_from_slice(state.finalize().as_bytes());
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; SUI_ADDRESS_LENGTH] {
        &self.0
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuiAddress({})", self)
    }
}

impl FromStr for SuiAddress {
    type Err = KeyError;

    /// Accepts the `0x` prefix as optional and left-pads short forms like `0x2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() || digits.len() > SUI_ADDRESS_LENGTH * 2 {
            return Err(KeyError::InvalidAddress(format!(
                "{s:?} must have between 1 and 64 hex digits"
            )));
        }
        let padded = format!("{:0>64}", digits);
        let mut bytes = [0u8; SUI_ADDRESS_LENGTH];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|e| KeyError::InvalidAddress(format!("{s:?}: {e}")))?;
        Ok(Self(bytes))
    }
}
