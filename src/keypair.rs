use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use secp256k1::{ecdsa, Message, PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};

use crate::address::SuiAddress;
use crate::derivation::ExtendedKey;
use crate::error::{KeyError, Result};
use crate::mnemonic::Mnemonic;
use crate::path::DerivationPath;
use crate::slip10::Ed25519ExtendedKey;

/// Intent prefix for a personal message: scope 3, version 0, app id 0.
const PERSONAL_MESSAGE_INTENT: [u8; 3] = [3, 0, 0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureScheme {
    #[default]
    Ed25519,
    Secp256k1,
}

impl SignatureScheme {
    /// The byte Sui prepends to public keys and signatures of this scheme.
    pub fn flag(self) -> u8 {
        match self {
            SignatureScheme::Ed25519 => 0x00,
            SignatureScheme::Secp256k1 => 0x01,
        }
    }

    pub fn from_flag(flag: u8) -> Result<SignatureScheme> {
        match flag {
            0x00 => Ok(SignatureScheme::Ed25519),
            0x01 => Ok(SignatureScheme::Secp256k1),
            other => Err(KeyError::InvalidSignature(format!(
                "unsupported scheme flag {other:#04x}"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SignatureScheme::Ed25519 => "ed25519",
            SignatureScheme::Secp256k1 => "secp256k1",
        }
    }

    fn public_key_len(self) -> usize {
        match self {
            SignatureScheme::Ed25519 => 32,
            SignatureScheme::Secp256k1 => 33,
        }
    }
}

impl FromStr for SignatureScheme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ed25519" => Ok(SignatureScheme::Ed25519),
            "secp256k1" | "k1" => Ok(SignatureScheme::Secp256k1),
            _ => Err(format!("Unknown signature scheme: {}", s)),
        }
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuiPublicKey {
    Ed25519([u8; 32]),
    /// Compressed SEC1 form.
    Secp256k1([u8; 33]),
}

impl SuiPublicKey {
    pub fn scheme(&self) -> SignatureScheme {
        match self {
            SuiPublicKey::Ed25519(_) => SignatureScheme::Ed25519,
            SuiPublicKey::Secp256k1(_) => SignatureScheme::Secp256k1,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            SuiPublicKey::Ed25519(bytes) => bytes.as_slice(),
            SuiPublicKey::Secp256k1(bytes) => bytes.as_slice(),
        }
    }

    pub fn to_sui_address(&self) -> SuiAddress {
        SuiAddress::from_public_key(self)
    }
}

/// A keypair of either scheme Sui accepts for single-key accounts.
pub enum SuiKeypair {
    Ed25519(SigningKey),
    Secp256k1(SecretKey),
}

impl SuiKeypair {
    /// Derives a keypair from a mnemonic at `path`, checking the path first.
    pub fn derive(
        mnemonic: &Mnemonic,
        passphrase: &str,
        path: &DerivationPath,
        scheme: SignatureScheme,
    ) -> Result<SuiKeypair> {
        path.validate_for(scheme)?;
        let seed = mnemonic.to_seed(passphrase)?;
        Self::from_seed(&seed, path, scheme)
    }

    /// Derives without enforcing Sui's path layout.
    pub fn from_seed(
        seed: &[u8],
        path: &DerivationPath,
        scheme: SignatureScheme,
    ) -> Result<SuiKeypair> {
        tracing::debug!(%scheme, %path, "deriving keypair");
        match scheme {
            SignatureScheme::Ed25519 => {
                let key = Ed25519ExtendedKey::derive_from_path(seed, path)?;
                Ok(SuiKeypair::Ed25519(key.signing_key()))
            }
            SignatureScheme::Secp256k1 => {
                let key = ExtendedKey::derive_from_path(seed, path)?;
                Ok(SuiKeypair::Secp256k1(key.secret_key()?))
            }
        }
    }

    pub fn scheme(&self) -> SignatureScheme {
        match self {
            SuiKeypair::Ed25519(_) => SignatureScheme::Ed25519,
            SuiKeypair::Secp256k1(_) => SignatureScheme::Secp256k1,
        }
    }

    pub fn public_key(&self) -> SuiPublicKey {
        match self {
            SuiKeypair::Ed25519(signing_key) => {
                SuiPublicKey::Ed25519(signing_key.verifying_key().to_bytes())
            }
            SuiKeypair::Secp256k1(secret_key) => {
                let secp = Secp256k1::new();
                SuiPublicKey::Secp256k1(PublicKey::from_secret_key(&secp, secret_key).serialize())
            }
        }
    }

    pub fn address(&self) -> SuiAddress {
        self.public_key().to_sui_address()
    }

    pub fn sign_personal_message(&self, message: &[u8]) -> SuiSignature {
        let digest = personal_message_digest(message);
        let signature: [u8; 64] = match self {
            SuiKeypair::Ed25519(signing_key) => signing_key.sign(&digest).to_bytes(),
            SuiKeypair::Secp256k1(secret_key) => {
                let secp = Secp256k1::new();
                secp.sign_ecdsa(&secp256k1_message(&digest), secret_key)
                    .serialize_compact()
            }
        };

        let public_key = self.public_key();
        let mut bytes = Vec::with_capacity(1 + 64 + public_key.as_bytes().len());
        bytes.push(self.scheme().flag());
        bytes.extend_from_slice(&signature);
        bytes.extend_from_slice(public_key.as_bytes());
        SuiSignature(bytes)
    }
}

/// `flag || signature || public_key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiSignature(Vec<u8>);

impl SuiSignature {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<SuiSignature> {
        let flag = *bytes
            .first()
            .ok_or_else(|| KeyError::InvalidSignature("empty signature".into()))?;
        let scheme = SignatureScheme::from_flag(flag)?;
        let expected = 1 + 64 + scheme.public_key_len();
        if bytes.len() != expected {
            return Err(KeyError::InvalidSignature(format!(
                "{} signature must be {expected} bytes, got {}",
                scheme,
                bytes.len()
            )));
        }
        Ok(SuiSignature(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn scheme(&self) -> Result<SignatureScheme> {
        SignatureScheme::from_flag(self.0[0])
    }

    pub fn public_key(&self) -> Result<SuiPublicKey> {
        let raw = &self.0[65..];
        match self.scheme()? {
            SignatureScheme::Ed25519 => raw
                .try_into()
                .map(SuiPublicKey::Ed25519)
                .map_err(|_| KeyError::InvalidSignature("bad ed25519 public key".into())),
            SignatureScheme::Secp256k1 => raw
                .try_into()
                .map(SuiPublicKey::Secp256k1)
                .map_err(|_| KeyError::InvalidSignature("bad secp256k1 public key".into())),
        }
    }

    pub fn verify_personal_message(&self, message: &[u8]) -> Result<()> {
        let digest = personal_message_digest(message);
        let mut signature = [0u8; 64];
        signature.copy_from_slice(&self.0[1..65]);

        match self.public_key()? {
            SuiPublicKey::Ed25519(public_key) => {
                let verifying_key = VerifyingKey::from_bytes(&public_key)
                    .map_err(|e| KeyError::InvalidSignature(e.to_string()))?;
                verifying_key
                    .verify(&digest, &ed25519_dalek::Signature::from_bytes(&signature))
                    .map_err(|e| KeyError::InvalidSignature(e.to_string()))
            }
            SuiPublicKey::Secp256k1(public_key) => {
                let secp = Secp256k1::new();
                let public_key = PublicKey::from_slice(&public_key)
                    .map_err(|e| KeyError::InvalidSignature(e.to_string()))?;
                let signature = ecdsa::Signature::from_compact(&signature)
                    .map_err(|e| KeyError::InvalidSignature(e.to_string()))?;
                secp.verify_ecdsa(&secp256k1_message(&digest), &signature, &public_key)
                    .map_err(|e| KeyError::InvalidSignature(e.to_string()))
            }
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

/// `BLAKE2b-256(intent || uleb128(len) || message)`.
pub fn personal_message_digest(message: &[u8]) -> [u8; 32] {
    let mut state = blake2b_simd::Params::new().hash_length(32).to_state();
    state.update(&PERSONAL_MESSAGE_INTENT);
    state.update(&uleb128(message.len()));
    state.update(message);

    let mut digest = [0u8; 32];
    digest.copy_from_slice(state.finalize().as_bytes());
    digest
}

fn uleb128(mut value: usize) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return out;
        }
        out.push(byte | 0x80);
    }
}

// Secp256k1 keys sign the SHA-256 of the intent digest.
fn secp256k1_message(digest: &[u8; 32]) -> Message {
    Message::from_digest(Sha256::digest(digest).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILM: &str = "film crazy soon outside stand loop subway crumble thrive popular green \
                        nuclear struggle pistol arm wife phrase warfare march wheat nephew ask \
                        sunny firm";

    fn derive(scheme: SignatureScheme) -> SuiKeypair {
        let mnemonic = Mnemonic::parse(FILM).unwrap();
        SuiKeypair::derive(&mnemonic, "", &DerivationPath::default_for(scheme), scheme).unwrap()
    }

    #[test]
    fn test_known_ed25519_address() {
        let keypair = derive(SignatureScheme::Ed25519);
        assert_eq!(
            keypair.address().to_string(),
            "0xa2d14fad60c56049ecf75246a481934691214ce413e6a8ae2fe6834c173a6133"
        );
    }

    #[test]
    fn test_known_secp256k1_address() {
        let keypair = derive(SignatureScheme::Secp256k1);
        assert_eq!(
            keypair.address().to_string(),
            "0x9e8f732575cc5386f8df3c784cd3ed1b53ce538da79926b2ad54dcc1197d2532"
        );
    }

    #[test]
    fn test_schemes_give_different_addresses() {
        let ed = derive(SignatureScheme::Ed25519);
        let k1 = derive(SignatureScheme::Secp256k1);
        assert_ne!(ed.address(), k1.address());
        assert_eq!(k1.public_key().as_bytes().len(), 33);
        assert!(matches!(k1.public_key().as_bytes()[0], 0x02 | 0x03));
    }

    #[test]
    fn test_path_must_match_scheme() {
        let mnemonic = Mnemonic::parse(FILM).unwrap();
        let path = DerivationPath::default_for(SignatureScheme::Ed25519);
        assert!(SuiKeypair::derive(&mnemonic, "", &path, SignatureScheme::Secp256k1).is_err());
    }

    #[test]
    fn test_passphrase_changes_address() {
        let mnemonic = Mnemonic::parse(FILM).unwrap();
        let path = DerivationPath::default_for(SignatureScheme::Ed25519);
        let plain = SuiKeypair::derive(&mnemonic, "", &path, SignatureScheme::Ed25519).unwrap();
        let salted = SuiKeypair::derive(&mnemonic, "x", &path, SignatureScheme::Ed25519).unwrap();
        assert_ne!(plain.address(), salted.address());
    }

    #[test]
    fn test_sign_and_verify_personal_message() {
        for scheme in [SignatureScheme::Ed25519, SignatureScheme::Secp256k1] {
            let keypair = derive(scheme);
            let signature = keypair.sign_personal_message(b"hello sui");

            let parsed = SuiSignature::from_bytes(signature.as_bytes().to_vec()).unwrap();
            assert_eq!(parsed.scheme().unwrap(), scheme);
            assert_eq!(parsed.public_key().unwrap(), keypair.public_key());
            parsed.verify_personal_message(b"hello sui").unwrap();
            assert!(parsed.verify_personal_message(b"hello sue").is_err());
        }
    }

    #[test]
    fn test_malformed_signature_bytes() {
        assert!(SuiSignature::from_bytes(vec![]).is_err());
        assert!(SuiSignature::from_bytes(vec![0x05; 97]).is_err());
        assert!(SuiSignature::from_bytes(vec![0x00; 96]).is_err());
    }

    #[test]
    fn test_uleb128() {
        assert_eq!(uleb128(0), vec![0x00]);
        assert_eq!(uleb128(127), vec![0x7f]);
        assert_eq!(uleb128(128), vec![0x80, 0x01]);
        assert_eq!(uleb128(300), vec![0xac, 0x02]);
    }

    #[test]
    fn test_scheme_parsing() {
        assert_eq!("ED25519".parse::<SignatureScheme>().unwrap(), SignatureScheme::Ed25519);
        assert_eq!("k1".parse::<SignatureScheme>().unwrap(), SignatureScheme::Secp256k1);
        assert!("secp256r1".parse::<SignatureScheme>().is_err());
        assert_eq!(SignatureScheme::Secp256k1.flag(), 1);
    }
}
