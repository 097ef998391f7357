use std::fmt;
use std::str::FromStr;

use crate::error::{KeyError, Result};
use crate::keypair::SignatureScheme;

pub const HARDENED_OFFSET: u32 = 1 << 31;

const SUI_COIN_TYPE: u32 = 784;

/// A BIP-32 style path such as `m/44'/784'/0'/0'/0'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationPath(Vec<u32>);

pub fn is_hardened(index: u32) -> bool {
    index >= HARDENED_OFFSET
}

impl DerivationPath {
    pub fn default_for(scheme: SignatureScheme) -> DerivationPath {
        let h = |i: u32| i + HARDENED_OFFSET;
        match scheme {
            SignatureScheme::Ed25519 => {
                DerivationPath(vec![h(44), h(SUI_COIN_TYPE), h(0), h(0), h(0)])
            }
            SignatureScheme::Secp256k1 => DerivationPath(vec![h(54), h(SUI_COIN_TYPE), h(0), 0, 0]),
        }
    }

    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    /// Checks the path against the layout Sui wallets use for `scheme`.
    pub fn validate_for(&self, scheme: SignatureScheme) -> Result<()> {
        let fail = |reason| KeyError::UnsupportedPath {
            scheme: scheme.name(),
            path: self.to_string(),
            reason,
        };

        let [purpose, coin_type, account, change, address] = self.0.as_slice() else {
            return Err(fail("expected five levels"));
        };
        let expected_purpose = match scheme {
            SignatureScheme::Ed25519 => 44,
            SignatureScheme::Secp256k1 => 54,
        };
        if *purpose != expected_purpose + HARDENED_OFFSET {
            return Err(fail("wrong purpose level"));
        }
        if *coin_type != SUI_COIN_TYPE + HARDENED_OFFSET {
            return Err(fail("coin type must be 784'"));
        }
        if !is_hardened(*account) {
            return Err(fail("account level must be hardened"));
        }
        match scheme {
            SignatureScheme::Ed25519 if !is_hardened(*change) || !is_hardened(*address) => {
                Err(fail("every level must be hardened"))
            }
            SignatureScheme::Secp256k1 if is_hardened(*change) || is_hardened(*address) => {
                Err(fail("change and address levels must not be hardened"))
            }
            _ => Ok(()),
        }
    }
}

impl FromStr for DerivationPath {
    type Err = KeyError;

    fn from_str(path: &str) -> Result<DerivationPath> {
        let mut parts = path.trim().split('/');
        if parts.next() != Some("m") {
            return Err(KeyError::InvalidPath(format!("{path:?} must start with \"m\"")));
        }

        let mut result = vec![];
        for part in parts {
            let (digits, hardened) = match part.strip_suffix(['\'', 'h', 'H']) {
                Some(stripped) => (stripped, true),
                None => (part, false),
            };
            let number = digits
                .parse::<u32>()
                .map_err(|_| KeyError::InvalidPath(format!("bad index {part:?} in {path:?}")))?;
            if is_hardened(number) {
                return Err(KeyError::InvalidPath(format!(
                    "index {number} in {path:?} is out of range"
                )));
            }
            result.push(if hardened { number + HARDENED_OFFSET } else { number });
        }

        Ok(DerivationPath(result))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for index in &self.0 {
            if is_hardened(*index) {
                write!(f, "/{}'", index - HARDENED_OFFSET)?;
            } else {
                write!(f, "/{}", index)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let path: DerivationPath = "m/44'/784'/0'/0'/0'".parse().unwrap();
        assert_eq!(path, DerivationPath::default_for(SignatureScheme::Ed25519));
        assert_eq!(path.to_string(), "m/44'/784'/0'/0'/0'");

        let path: DerivationPath = "m/54h/784H/0'/0/1".parse().unwrap();
        assert_eq!(path.to_string(), "m/54'/784'/0'/0/1");
        assert_eq!(path.indices()[4], 1);
    }

    #[test]
    fn test_master_only() {
        let path: DerivationPath = "m".parse().unwrap();
        assert!(path.indices().is_empty());
    }

    #[test]
    fn test_malformed_paths() {
        for bad in ["", "44'/784'", "m/", "m/abc", "m/1''", "m/2147483648", "n/0"] {
            assert!(bad.parse::<DerivationPath>().is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn test_defaults_pass_validation() {
        for scheme in [SignatureScheme::Ed25519, SignatureScheme::Secp256k1] {
            DerivationPath::default_for(scheme).validate_for(scheme).unwrap();
        }
    }

    #[test]
    fn test_validation_rules() {
        let check = |path: &str, scheme| {
            path.parse::<DerivationPath>().unwrap().validate_for(scheme)
        };

        assert!(check("m/44'/784'/3'/0'/7'", SignatureScheme::Ed25519).is_ok());
        assert!(check("m/44'/784'/0'/0/0", SignatureScheme::Ed25519).is_err());
        assert!(check("m/44'/0'/0'/0'/0'", SignatureScheme::Ed25519).is_err());
        assert!(check("m/54'/784'/0'/0'/0'", SignatureScheme::Ed25519).is_err());
        assert!(check("m/44'/784'/0'/0'", SignatureScheme::Ed25519).is_err());

        assert!(check("m/54'/784'/1'/0/4", SignatureScheme::Secp256k1).is_ok());
        assert!(check("m/54'/784'/0'/0'/0'", SignatureScheme::Secp256k1).is_err());
        assert!(check("m/54'/784'/0/0/0", SignatureScheme::Secp256k1).is_err());
    }
}
