use bip39::Language;
use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::Rng;
use sha2::{Digest, Sha256, Sha512};
use unicode_normalization::UnicodeNormalization;

use crate::error::{KeyError, Result};

pub type Seed = [u8; 64];

const PBKDF2_ROUNDS: u32 = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnemonicLen {
    M12,
    M15,
    M18,
    M21,
    M24,
}

impl MnemonicLen {
    pub fn from_word_count(count: usize) -> Result<MnemonicLen> {
        match count {
            12 => Ok(MnemonicLen::M12),
            15 => Ok(MnemonicLen::M15),
            18 => Ok(MnemonicLen::M18),
            21 => Ok(MnemonicLen::M21),
            24 => Ok(MnemonicLen::M24),
            n => Err(KeyError::InvalidMnemonic(format!(
                "expected 12, 15, 18, 21 or 24 words, got {n}"
            ))),
        }
    }

    fn entropy_bits(self) -> usize {
        match self {
            MnemonicLen::M12 => 128,
            MnemonicLen::M15 => 160,
            MnemonicLen::M18 => 192,
            MnemonicLen::M21 => 224,
            MnemonicLen::M24 => 256,
        }
    }
}

/// A checksummed BIP-39 phrase over the English word list.
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic {
    words: Vec<&'static str>,
}

impl Mnemonic {
    pub fn generate(word_len: MnemonicLen) -> Mnemonic {
        let entropy_bits = word_len.entropy_bits();
        let entropy = Self::generate_entropy(entropy_bits);
        Mnemonic {
            words: Self::entropy_to_words(&entropy, entropy_bits),
        }
    }

    /// Parses a phrase, tolerating extra whitespace and upper case letters.
    pub fn parse(phrase: &str) -> Result<Mnemonic> {
        let word_list = Language::English.word_list();

        let mut indices = Vec::new();
        for word in phrase.split_whitespace() {
            let word = word.to_lowercase();
            let index = word_list
                .binary_search(&word.as_str())
                .map_err(|_| KeyError::InvalidMnemonic(format!("unknown word {word:?}")))?;
            indices.push(index);
        }
        if indices.is_empty() {
            return Err(KeyError::InvalidMnemonic("empty phrase".into()));
        }
        let entropy_bits = MnemonicLen::from_word_count(indices.len())?.entropy_bits();

        let bit_string: String = indices.iter().map(|i| format!("{:011b}", i)).collect();
        let (entropy_part, checksum_part) = bit_string.split_at(entropy_bits);

        let entropy = entropy_part
            .as_bytes()
            .chunks(8)
            .map(|byte| byte.iter().fold(0u8, |acc, bit| (acc << 1) | (bit - b'0')))
            .collect::<Vec<u8>>();
        let checksum = checksum_part
            .bytes()
            .fold(0u8, |acc, bit| (acc << 1) | (bit - b'0'));

        if checksum != Self::calculate_checksum(&entropy, entropy_bits) {
            return Err(KeyError::InvalidMnemonic("checksum mismatch".into()));
        }

        Ok(Mnemonic {
            words: indices.into_iter().map(|i| word_list[i]).collect(),
        })
    }

    pub fn words(&self) -> &[&'static str] {
        &self.words
    }

    pub fn phrase(&self) -> String {
        self.words.join(" ")
    }

    fn generate_entropy(bits: usize) -> Vec<u8> {
        let mut rng = rand::thread_rng();
        (0..bits / 8).map(|_| rng.gen::<u8>()).collect()
    }

    fn entropy_to_words(entropy: &[u8], entropy_bits: usize) -> Vec<&'static str> {
        let checksum = Self::calculate_checksum(entropy, entropy_bits);
        let checksum_bits = entropy_bits / 32;

        let mut bit_string: String = entropy.iter().map(|b| format!("{:08b}", b)).collect();
        bit_string.push_str(&format!("{:0width$b}", checksum, width = checksum_bits));

        let word_list = Language::English.word_list();
        bit_string
            .as_bytes()
            .chunks(11)
            .map(|segment| {
                let index = segment
                    .iter()
                    .fold(0usize, |acc, bit| (acc << 1) | usize::from(bit - b'0'));
                word_list[index]
            })
            .collect()
    }

    fn calculate_checksum(entropy: &[u8], entropy_bits: usize) -> u8 {
        let hash = Sha256::digest(entropy);
        let checksum_bits = entropy_bits / 32;
        hash[0] >> (8 - checksum_bits)
    }

    /// Both the phrase and the salt are NFKD-normalized before stretching.
    pub fn to_seed(&self, passphrase: &str) -> Result<Seed> {
        let phrase: String = self.phrase().nfkd().collect();
        let salt: String = format!("mnemonic{}", passphrase).nfkd().collect();
        let mut seed = [0u8; 64];
        pbkdf2::<Hmac<Sha512>>(
            phrase.as_bytes(),
            salt.as_bytes(),
            PBKDF2_ROUNDS,
            &mut seed,
        )
        .map_err(|e| KeyError::InvalidMnemonic(e.to_string()))?;
        Ok(seed)
    }
}

// Never print the words themselves.
impl std::fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mnemonic({} words)", self.words.len())
    }
}
