//! SLIP-10 derivation for Ed25519. Only hardened children exist on this curve.

use ed25519_dalek::SigningKey;

use crate::derivation::{calculate_fingerprint, hmac_halves, ExtendedKeyAttrs, PrivateKey};
use crate::error::{KeyError, Result};
use crate::path::{is_hardened, DerivationPath};

#[derive(Clone)]
pub struct Ed25519ExtendedKey {
    private_key: PrivateKey,
    attrs: ExtendedKeyAttrs,
}

impl Ed25519ExtendedKey {
    pub fn master(seed: &[u8]) -> Ed25519ExtendedKey {
        let (private_key, chain_code) = hmac_halves(b"ed25519 seed", seed);
        Ed25519ExtendedKey {
            private_key,
            attrs: ExtendedKeyAttrs::master(chain_code),
        }
    }

    pub fn derive_from_path(seed: &[u8], path: &DerivationPath) -> Result<Ed25519ExtendedKey> {
        let mut extended_key = Self::master(seed);
        for index in path.indices() {
            extended_key = extended_key.derive_child(*index)?;
        }
        tracing::debug!(depth = extended_key.attrs.depth, "derived ed25519 key");
        Ok(extended_key)
    }

    pub fn derive_child(&self, index: u32) -> Result<Ed25519ExtendedKey> {
        if !is_hardened(index) {
            return Err(KeyError::InvalidPath(format!(
                "ed25519 only supports hardened derivation, got index {index}"
            )));
        }

        let mut data = Vec::with_capacity(37);
        data.push(0);
        data.extend_from_slice(&self.private_key);
        data.extend_from_slice(&index.to_be_bytes());
        let (private_key, chain_code) = hmac_halves(&self.attrs.chain_code, &data);

        Ok(Ed25519ExtendedKey {
            private_key,
            attrs: self.attrs.child(self.fingerprint(), index, chain_code)?,
        })
    }

    pub fn signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.private_key)
    }

    /// The public key with the `0x00` prefix SLIP-10 uses when hashing.
    pub fn prefixed_public_key(&self) -> [u8; 33] {
        let mut out = [0u8; 33];
        out[1..].copy_from_slice(self.signing_key().verifying_key().as_bytes());
        out
    }

    pub fn fingerprint(&self) -> [u8; 4] {
        calculate_fingerprint(&self.prefixed_public_key())
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn attrs(&self) -> &ExtendedKeyAttrs {
        &self.attrs
    }
}
