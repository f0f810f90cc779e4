// Error types for the Rabin cryptosystem
// Construction failures are fatal; per-unit decryption failures are surfaced
// to the caller as flagged blocks rather than aborting the whole call

use thiserror::Error;

/// Errors that can occur during key construction, encoding and decryption
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RabinError {
    /// Fewer than two primes exist in the requested candidate range
    #[error("fewer than two primes in range [{lower}, {upper}]")]
    NoPrimesInRange { lower: u64, upper: u64 },

    /// The candidate range (or an explicit key) exceeds the size the
    /// exhaustive square-root search can handle
    #[error("prime bound {upper} exceeds the supported maximum {max}")]
    KeyRangeTooLarge { upper: u64, max: u64 },

    /// An explicitly supplied private key failed validation
    #[error("invalid private key: {reason}")]
    InvalidKey { reason: String },

    /// A character outside the blank + 'a'..'z' alphabet
    #[error("character {0:?} is not in the 27-symbol alphabet")]
    EncodingError(char),

    /// A ciphertext unit is not a quadratic residue modulo p or q.
    /// Raised per unit inside decryption and consumed there by the
    /// block-flagging policy; callers see flagged or absent blocks in the
    /// candidate list rather than this error.
    #[error("ciphertext unit has no square root modulo {modulus}")]
    NoSquareRoot { modulus: u64 },
}

/// Result type for all cipher operations
pub type Result<T> = std::result::Result<T, RabinError>;
