// Rabin Module - Main module file
// Exports all Rabin cryptosystem functionality

pub mod cipher;
pub mod codec;
pub mod keys;
pub mod math;
pub mod primes;

pub use cipher::RabinCipher;
pub use codec::RADIX;
pub use keys::{BlockLengths, KeyPair, PrivateKey, PRIME_LOWER_BOUND, PRIME_UPPER_BOUND};
pub use math::RabinInt;
pub use primes::{MillerRabin, PrimalityTest, TrialDivision, MAX_PRIME};
