// Rabin Public Key Cryptosystem
// Didactic implementation: small-prime key generation, base-27 text
// encoding, squaring encryption and ambiguous CRT decryption

pub mod error;
pub mod rabin;

pub use error::{RabinError, Result};
pub use rabin::{BlockLengths, KeyPair, PrivateKey, RabinCipher, RabinInt};
