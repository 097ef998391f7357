//! BIP-32 derivation over secp256k1.

use hmac::{Hmac, Mac};
use k256::elliptic_curve::PrimeField;
use k256::Scalar;
use ripemd::Ripemd160;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256, Sha512};

use crate::error::{KeyError, Result};
use crate::path::{is_hardened, DerivationPath};

pub type PrivateKey = [u8; 32];
pub type ChainCode = [u8; 32];
pub type KeyFingerprint = [u8; 4];

pub(crate) type HmacSha512 = Hmac<Sha512>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedKeyAttrs {
    pub depth: u8,

    pub parent_fingerprint: KeyFingerprint,

    pub child_number: u32,

    pub chain_code: ChainCode,
}

impl ExtendedKeyAttrs {
    pub(crate) fn master(chain_code: ChainCode) -> ExtendedKeyAttrs {
        ExtendedKeyAttrs {
            depth: 0,
            parent_fingerprint: KeyFingerprint::default(),
            child_number: 0,
            chain_code,
        }
    }

    pub(crate) fn child(
        &self,
        parent_fingerprint: KeyFingerprint,
        child_number: u32,
        chain_code: ChainCode,
    ) -> Result<ExtendedKeyAttrs> {
        let depth = self
            .depth
            .checked_add(1)
            .ok_or_else(|| KeyError::InvalidPath("path is deeper than 255 levels".into()))?;
        Ok(ExtendedKeyAttrs {
            depth,
            parent_fingerprint,
            child_number,
            chain_code,
        })
    }
}

/// Splits `HMAC-SHA512(key, data)` into its left and right halves.
pub(crate) fn hmac_halves(key: &[u8], data: &[u8]) -> (PrivateKey, ChainCode) {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    let result = mac.finalize().into_bytes();

    let mut left = [0u8; 32];
    let mut right = [0u8; 32];
    left.copy_from_slice(&result[..32]);
    right.copy_from_slice(&result[32..]);
    (left, right)
}

/// First four bytes of `RIPEMD160(SHA256(public_key))`.
pub fn calculate_fingerprint(public_key: &[u8]) -> KeyFingerprint {
    let sha256_hash = Sha256::digest(public_key);
    let ripemd160_hash = Ripemd160::digest(sha256_hash);

    let mut fingerprint = KeyFingerprint::default();
    fingerprint.copy_from_slice(&ripemd160_hash[..4]);
    fingerprint
}

#[derive(Clone)]
pub struct ExtendedKey {
    private_key: PrivateKey,
    attrs: ExtendedKeyAttrs,
}

impl ExtendedKey {
    pub fn master(seed: &[u8]) -> Result<ExtendedKey> {
        let (private_key, chain_code) = hmac_halves(b"Bitcoin seed", seed);
        SecretKey::from_slice(&private_key).map_err(|_| KeyError::InvalidDerivedKey)?;
        Ok(ExtendedKey {
            private_key,
            attrs: ExtendedKeyAttrs::master(chain_code),
        })
    }

    pub fn derive_from_path(seed: &[u8], path: &DerivationPath) -> Result<ExtendedKey> {
        let mut extended_key = Self::master(seed)?;
        for index in path.indices() {
            extended_key = extended_key.derive_child(*index)?;
        }
        tracing::debug!(depth = extended_key.attrs.depth, "derived secp256k1 key");
        Ok(extended_key)
    }

    pub fn derive_child(&self, index: u32) -> Result<ExtendedKey> {
        let mut data = Vec::with_capacity(37);
        if is_hardened(index) {
            data.push(0);
            data.extend_from_slice(&self.private_key);
        } else {
            data.extend_from_slice(&self.public_key()?.serialize());
        }
        data.extend_from_slice(&index.to_be_bytes());
        let (left, chain_code) = hmac_halves(&self.attrs.chain_code, &data);

        let left_scalar = Self::scalar(&left)?;
        let parent_scalar = Self::scalar(&self.private_key)?;
        let child_scalar = left_scalar + parent_scalar;
        if bool::from(child_scalar.is_zero()) {
            return Err(KeyError::InvalidDerivedKey);
        }

        let fingerprint = self.fingerprint()?;
        Ok(ExtendedKey {
            private_key: child_scalar.to_bytes().into(),
            attrs: self.attrs.child(fingerprint, index, chain_code)?,
        })
    }

    fn scalar(bytes: &[u8; 32]) -> Result<Scalar> {
        Option::<Scalar>::from(Scalar::from_repr((*bytes).into()))
            .ok_or(KeyError::InvalidDerivedKey)
    }

    pub fn secret_key(&self) -> Result<SecretKey> {
        SecretKey::from_slice(&self.private_key).map_err(|_| KeyError::InvalidDerivedKey)
    }

    pub fn public_key(&self) -> Result<PublicKey> {
        let secp = Secp256k1::new();
        Ok(PublicKey::from_secret_key(&secp, &self.secret_key()?))
    }

    pub fn fingerprint(&self) -> Result<KeyFingerprint> {
        Ok(calculate_fingerprint(&self.public_key()?.serialize()))
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn attrs(&self) -> &ExtendedKeyAttrs {
        &self.attrs
    }
}
