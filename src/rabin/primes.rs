// Prime selection for the private key
// Trial-division enumeration over a small range, with a pluggable
// primality test for callers that want to push the range higher

use rand::Rng;

use crate::error::{RabinError, Result};

/// Largest prime the cipher accepts. The decryption square-root search is
/// exhaustive over [0, p), so anything past this bound stops being a quick
/// classroom computation.
pub const MAX_PRIME: u64 = 10_000;

/// A primality test the prime selector can be parameterized over
pub trait PrimalityTest {
    fn is_prime(&self, candidate: u64) -> bool;
}

/// Deterministic trial division up to the integer square root
#[derive(Debug, Clone, Copy, Default)]
pub struct TrialDivision;

impl PrimalityTest for TrialDivision {
    fn is_prime(&self, candidate: u64) -> bool {
        if candidate < 2 {
            return false;
        }
        let mut divisor = 2;
        // divisor <= candidate / divisor avoids overflow near u64::MAX
        while divisor <= candidate / divisor {
            if candidate % divisor == 0 {
                return false;
            }
            divisor += 1;
        }
        true
    }
}

/// Probabilistic Miller-Rabin test with a configurable number of witness
/// rounds. Witnesses are drawn from the thread-local generator; the test is
/// a drop-in replacement for `TrialDivision` on ranges where trial division
/// gets slow.
#[derive(Debug, Clone, Copy)]
pub struct MillerRabin {
    rounds: u32,
}

impl MillerRabin {
    pub fn new(rounds: u32) -> Self {
        Self { rounds }
    }
}

impl Default for MillerRabin {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PrimalityTest for MillerRabin {
    fn is_prime(&self, candidate: u64) -> bool {
        if candidate < 2 {
            return false;
        }
        if candidate == 2 || candidate == 3 {
            return true;
        }
        if candidate % 2 == 0 {
            return false;
        }

        // Write candidate - 1 as d * 2^s with d odd
        let mut d = candidate - 1;
        let mut s = 0u32;
        while d % 2 == 0 {
            d /= 2;
            s += 1;
        }

        let mut rng = rand::thread_rng();
        'witness: for _ in 0..self.rounds {
            let a = rng.gen_range(2..=candidate - 2);
            let mut x = mod_pow(a, d, candidate);

            if x == 1 || x == candidate - 1 {
                continue;
            }

            for _ in 1..s {
                x = mod_pow(x, 2, candidate);
                if x == candidate - 1 {
                    continue 'witness;
                }
            }

            // Composite
            return false;
        }

        true
    }
}

/// Modular exponentiation: base^exp mod modulus
/// Uses square-and-multiply; intermediate products go through u128 so the
/// multiplication cannot overflow for any u64 modulus.
fn mod_pow(base: u64, exp: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }

    let modulus = modulus as u128;
    let mut result = 1u128;
    let mut base = base as u128 % modulus;
    let mut exp = exp;

    while exp > 0 {
        if exp % 2 == 1 {
            result = result * base % modulus;
        }
        base = base * base % modulus;
        exp >>= 1;
    }

    result as u64
}

/// Enumerate every prime in the inclusive range [lower, upper]
pub fn primes_in_range(test: &impl PrimalityTest, lower: u64, upper: u64) -> Vec<u64> {
    (lower..=upper).filter(|&n| test.is_prime(n)).collect()
}

/// Select two distinct primes uniformly from the inclusive range
/// [lower, upper] using trial division.
pub fn select_distinct_primes(
    lower: u64,
    upper: u64,
    rng: &mut impl Rng,
) -> Result<(u64, u64)> {
    select_distinct_primes_with(&TrialDivision, lower, upper, rng)
}

/// Select two distinct primes with an explicit primality test.
///
/// p is drawn uniformly from the candidate set; q is resampled from the full
/// set until it differs from p, so both draws stay uniform over the
/// candidates.
pub fn select_distinct_primes_with(
    test: &impl PrimalityTest,
    lower: u64,
    upper: u64,
    rng: &mut impl Rng,
) -> Result<(u64, u64)> {
    if upper > MAX_PRIME {
        return Err(RabinError::KeyRangeTooLarge {
            upper,
            max: MAX_PRIME,
        });
    }

    let candidates = primes_in_range(test, lower, upper);
    if candidates.len() < 2 {
        return Err(RabinError::NoPrimesInRange { lower, upper });
    }

    let p = candidates[rng.gen_range(0..candidates.len())];
    let mut q = candidates[rng.gen_range(0..candidates.len())];
    while q == p {
        q = candidates[rng.gen_range(0..candidates.len())];
    }

    Ok((p, q))
}
