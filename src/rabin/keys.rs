// Rabin key material
// Private prime pair, derived public modulus and the base-27 block widths

use rand::Rng;

use crate::error::{RabinError, Result};
use crate::rabin::codec::RADIX;
use crate::rabin::math::{from_u64, RabinInt};
use crate::rabin::primes::{self, PrimalityTest, TrialDivision, MAX_PRIME};

/// Default inclusive range the private primes are drawn from
pub const PRIME_LOWER_BOUND: u64 = 23;
pub const PRIME_UPPER_BOUND: u64 = 101;

/// The private prime pair (p, q). Fields stay private; the pair is chosen
/// once at construction and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateKey {
    p: u64,
    q: u64,
}

impl PrivateKey {
    /// Validate an explicitly supplied prime pair.
    ///
    /// Validation is independent of `primes::select_distinct_primes`: a
    /// caller-provided key has not been through the selector and must be
    /// checked from scratch.
    pub fn new(p: u64, q: u64) -> Result<Self> {
        if p == q {
            return Err(RabinError::InvalidKey {
                reason: format!("primes must be distinct, got {p} twice"),
            });
        }
        if p > MAX_PRIME || q > MAX_PRIME {
            return Err(RabinError::InvalidKey {
                reason: format!(
                    "primes must not exceed {MAX_PRIME}, the exhaustive \
                     square-root search does not scale past it"
                ),
            });
        }

        let test = TrialDivision;
        for candidate in [p, q] {
            if !test.is_prime(candidate) {
                return Err(RabinError::InvalidKey {
                    reason: format!("{candidate} is not prime"),
                });
            }
        }

        // a modulus below the radix leaves no room for even a one-character
        // plaintext block (the width k would be zero)
        if p * q < RADIX as u64 {
            return Err(RabinError::InvalidKey {
                reason: format!("modulus {} is below the radix {RADIX}", p * q),
            });
        }

        Ok(Self { p, q })
    }

    /// Generate a key from the given prime range using the injected
    /// random source.
    pub fn generate(lower: u64, upper: u64, rng: &mut impl Rng) -> Result<Self> {
        let (p, q) = primes::select_distinct_primes(lower, upper, rng)?;
        Ok(Self { p, q })
    }

    pub(crate) fn primes(&self) -> (u64, u64) {
        (self.p, self.q)
    }
}

/// Plaintext and ciphertext block widths (k, l) for a public modulus n,
/// satisfying 27^k <= n < 27^l with l minimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLengths {
    plaintext: u32,
    ciphertext: u32,
}

impl BlockLengths {
    /// Compute the block widths for a modulus.
    /// k is the largest integer with 27^k <= n; l starts at k + 1 and grows
    /// until 27^l > n.
    pub fn for_modulus(n: &RabinInt) -> Self {
        let radix = from_u64(RADIX as u64);

        let mut k = 0u32;
        let mut power = radix.clone();
        while &power <= n {
            k += 1;
            power *= &radix;
        }

        let mut l = k + 1;
        while &radix.pow(l) <= n {
            l += 1;
        }

        Self {
            plaintext: k,
            ciphertext: l,
        }
    }

    /// Characters per plaintext unit (k)
    pub fn plaintext(&self) -> u32 {
        self.plaintext
    }

    /// Characters per ciphertext unit (l)
    pub fn ciphertext(&self) -> u32 {
        self.ciphertext
    }
}

/// A validated private key together with its derived public modulus and
/// cached block widths. Immutable for the lifetime of the cipher.
#[derive(Debug, Clone)]
pub struct KeyPair {
    private: PrivateKey,
    n: RabinInt,
    block: BlockLengths,
}

impl KeyPair {
    /// Derive the public modulus n = p * q and the block widths
    pub fn derive(private: PrivateKey) -> Self {
        let (p, q) = private.primes();
        let n = from_u64(p) * from_u64(q);
        let block = BlockLengths::for_modulus(&n);
        Self { private, n, block }
    }

    /// Select a key with a caller-chosen primality test, for ranges where
    /// trial division is too slow.
    pub fn generate_with(
        test: &impl PrimalityTest,
        lower: u64,
        upper: u64,
        rng: &mut impl Rng,
    ) -> Result<Self> {
        let (p, q) = primes::select_distinct_primes_with(test, lower, upper, rng)?;
        Ok(Self::derive(PrivateKey { p, q }))
    }

    /// The public modulus n
    pub fn public_key(&self) -> &RabinInt {
        &self.n
    }

    /// The cached (k, l) block widths
    pub fn block_lengths(&self) -> BlockLengths {
        self.block
    }

    pub(crate) fn private(&self) -> &PrivateKey {
        &self.private
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rabin::primes::primes_in_range;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rejects_equal_primes() {
        assert!(matches!(
            PrivateKey::new(31, 31),
            Err(RabinError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_rejects_composite_factor() {
        assert!(matches!(
            PrivateKey::new(31, 55),
            Err(RabinError::InvalidKey { .. })
        ));
        assert!(matches!(
            PrivateKey::new(49, 53),
            Err(RabinError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_rejects_modulus_below_radix() {
        // 2 * 13 = 26 < 27 would make the plaintext width zero
        assert!(matches!(
            PrivateKey::new(2, 13),
            Err(RabinError::InvalidKey { .. })
        ));

        // 5 * 7 = 35 is the other side of the bound: one character per block
        let pair = KeyPair::derive(PrivateKey::new(5, 7).unwrap());
        assert_eq!(pair.block_lengths().plaintext(), 1);
        assert_eq!(pair.block_lengths().ciphertext(), 2);
    }

    #[test]
    fn test_rejects_oversized_primes() {
        // 10007 is prime but past the supported bound
        assert!(matches!(
            PrivateKey::new(10_007, 53),
            Err(RabinError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_block_lengths_for_reference_key() {
        let pair = KeyPair::derive(PrivateKey::new(31, 53).unwrap());
        assert_eq!(pair.public_key(), &from_u64(1643));

        let block = pair.block_lengths();
        assert_eq!(block.plaintext(), 2);
        assert_eq!(block.ciphertext(), 3);
    }

    #[test]
    fn test_block_length_law_over_default_range() {
        let candidates = primes_in_range(&TrialDivision, PRIME_LOWER_BOUND, PRIME_UPPER_BOUND);

        for &p in &candidates {
            for &q in &candidates {
                if p == q {
                    continue;
                }
                let pair = KeyPair::derive(PrivateKey::new(p, q).unwrap());
                let n = pair.public_key();
                let block = pair.block_lengths();

                let radix = from_u64(RADIX as u64);
                assert!(&radix.pow(block.plaintext()) <= n);
                assert!(&radix.pow(block.ciphertext()) > n);
                assert!(block.plaintext() < block.ciphertext());
            }
        }
    }

    #[test]
    fn test_generate_with_miller_rabin() {
        use crate::rabin::primes::MillerRabin;

        let mut rng = StdRng::seed_from_u64(3);
        let pair =
            KeyPair::generate_with(&MillerRabin::default(), 23, 101, &mut rng).unwrap();

        let (p, q) = pair.private().primes();
        assert!(PrivateKey::new(p, q).is_ok());
        assert_eq!(pair.public_key(), &(from_u64(p) * from_u64(q)));
    }

    #[test]
    fn test_generated_key_is_valid() {
        let mut rng = StdRng::seed_from_u64(99);
        let key = PrivateKey::generate(PRIME_LOWER_BOUND, PRIME_UPPER_BOUND, &mut rng).unwrap();
        let (p, q) = key.primes();

        // generation output passes the explicit-key validation path
        assert_eq!(PrivateKey::new(p, q).unwrap(), key);
    }
}
