// Rabin cipher orchestration
// Encryption squares each plaintext unit mod n; decryption recovers up to
// four candidate plaintexts through per-prime square roots and the CRT

use num_integer::Integer;
use rand::Rng;

use crate::error::{RabinError, Result};
use crate::rabin::codec::{self, RADIX};
use crate::rabin::keys::{KeyPair, PrivateKey, BlockLengths, PRIME_LOWER_BOUND, PRIME_UPPER_BOUND};
use crate::rabin::math::{self, from_u64, RabinInt};

/// The Rabin public-key cipher.
///
/// Key material and block widths are fixed at construction; `encrypt` and
/// `decrypt` only read them, so a cipher can be shared freely across
/// threads.
#[derive(Debug, Clone)]
pub struct RabinCipher {
    keys: KeyPair,
}

impl RabinCipher {
    /// Build a cipher from an optional explicit private key.
    ///
    /// With `Some((p, q))` the pair is validated; with `None` a fresh pair
    /// is drawn from the default range [23, 101] using `rng`.
    pub fn new(private_key: Option<(u64, u64)>, rng: &mut impl Rng) -> Result<Self> {
        match private_key {
            Some((p, q)) => Self::with_key(p, q),
            None => Self::generate(rng),
        }
    }

    /// Build a cipher from an explicit prime pair
    pub fn with_key(p: u64, q: u64) -> Result<Self> {
        let private = PrivateKey::new(p, q)?;
        Ok(Self {
            keys: KeyPair::derive(private),
        })
    }

    /// Generate a cipher with a fresh key from the default prime range
    pub fn generate(rng: &mut impl Rng) -> Result<Self> {
        let private = PrivateKey::generate(PRIME_LOWER_BOUND, PRIME_UPPER_BOUND, rng)?;
        Ok(Self {
            keys: KeyPair::derive(private),
        })
    }

    /// The public modulus n = p * q
    pub fn public_key(&self) -> &RabinInt {
        self.keys.public_key()
    }

    /// The plaintext/ciphertext block widths (k, l)
    pub fn block_lengths(&self) -> BlockLengths {
        self.keys.block_lengths()
    }

    /// Encrypt a plaintext string.
    ///
    /// The text is encoded into width-k units, each unit m becomes
    /// c = m^2 mod n, and the squared units are rendered as width-l text.
    /// Deterministic: the same key and plaintext always produce the same
    /// ciphertext.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let block = self.keys.block_lengths();
        let n = self.keys.public_key();

        let units = codec::encode(plaintext, block.plaintext())?;
        let squared: Vec<RabinInt> = units.iter().map(|m| (m * m).mod_floor(n)).collect();

        Ok(codec::decode(&squared, block.ciphertext()))
    }

    /// Decrypt a ciphertext string into up to four candidate plaintexts.
    ///
    /// Squaring is not injective, so the caller receives every plaintext
    /// consistent with the ciphertext and must disambiguate externally.
    /// A unit that is not a quadratic residue modulo p or q cannot be
    /// inverted; its block renders as '?' characters in every candidate
    /// while the remaining blocks decrypt normally. When no unit at all
    /// can be inverted there is nothing to assemble and the returned list
    /// is empty.
    pub fn decrypt(&self, ciphertext: &str) -> Result<Vec<String>> {
        let block = self.keys.block_lengths();
        let units = codec::encode(ciphertext, block.ciphertext())?;

        let per_unit: Vec<Vec<RabinInt>> = units
            .iter()
            // a NoSquareRoot unit contributes an empty candidate list
            .map(|unit| self.unit_candidates(unit).unwrap_or_default())
            .collect();

        // As many full candidates as the longest per-unit list. Shorter
        // lists repeat their last entry; empty lists flag their block.
        let count = per_unit.iter().map(Vec::len).max().unwrap_or(0);
        let flagged_block = "?".repeat(block.plaintext() as usize);

        let mut candidates = Vec::with_capacity(count);
        for index in 0..count {
            let mut text = String::new();
            for unit_candidates in &per_unit {
                match unit_candidates.get(index).or_else(|| unit_candidates.last()) {
                    Some(residue) => {
                        text.push_str(&codec::decode(
                            std::slice::from_ref(residue),
                            block.plaintext(),
                        ));
                    }
                    None => text.push_str(&flagged_block),
                }
            }
            candidates.push(text);
        }

        Ok(candidates)
    }

    /// Candidate plaintext units for one ciphertext unit: the CRT
    /// combinations of the square roots mod p and mod q, filtered to the
    /// plaintext range [0, 27^k).
    fn unit_candidates(&self, unit: &RabinInt) -> Result<Vec<RabinInt>> {
        let (p, q) = self.keys.private().primes();
        let (p, q) = (from_u64(p), from_u64(q));
        let n = self.keys.public_key();

        let root_p = math::modular_square_root(unit, &p).ok_or_else(|| {
            RabinError::NoSquareRoot {
                modulus: self.keys.private().primes().0,
            }
        })?;
        let root_q = math::modular_square_root(unit, &q).ok_or_else(|| {
            RabinError::NoSquareRoot {
                modulus: self.keys.private().primes().1,
            }
        })?;

        // Residues at or above 27^k cannot decode into a k-character block
        let bound = from_u64(RADIX as u64).pow(self.keys.block_lengths().plaintext());

        let roots = math::combine_crt(&root_p, &root_q, &p, &q, n);
        Ok(roots.into_iter().filter(|root| root < &bound).collect())
    }
}
