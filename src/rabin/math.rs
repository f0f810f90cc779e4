// Modular arithmetic for the Rabin cryptosystem
// Extended Euclid, exhaustive modular square roots and CRT combination

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};

/// Signed big integer type used throughout the cipher.
/// Signed because Bezout coefficients and the CRT sign combinations
/// go negative before normalization.
pub type RabinInt = BigInt;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RabinInt {
    RabinInt::from(n)
}

/// Extended Euclidean Algorithm
/// Returns (x, y) such that a*x + b*y = gcd(a, b).
/// Implemented iteratively so the stack depth is constant regardless of
/// input magnitude.
pub fn extended_euclid(a: &RabinInt, b: &RabinInt) -> (RabinInt, RabinInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_x, mut x) = (RabinInt::one(), RabinInt::zero());
    let (mut old_y, mut y) = (RabinInt::zero(), RabinInt::one());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_x = &old_x - &quotient * &x;
        old_x = std::mem::replace(&mut x, next_x);

        let next_y = &old_y - &quotient * &y;
        old_y = std::mem::replace(&mut y, next_y);
    }

    (old_x, old_y)
}

/// Find a square root of c modulo `modulus` by exhaustive search.
/// Returns the smallest x in [0, modulus) with x^2 = c (mod modulus), or
/// None when c is not a quadratic residue.
///
/// Intentionally O(modulus): the private primes are small by design, and
/// key construction rejects moduli large enough to make this search slow.
pub fn modular_square_root(c: &RabinInt, modulus: &RabinInt) -> Option<RabinInt> {
    let residue = c.mod_floor(modulus);

    let mut x = RabinInt::zero();
    while &x < modulus {
        if (&x * &x).mod_floor(modulus) == residue {
            return Some(x);
        }
        x += 1;
    }

    None
}

/// Combine square roots a1 (mod p) and a2 (mod q) into the four candidate
/// roots modulo n = p*q via the Chinese Remainder Theorem.
///
/// With (x, y) the Bezout coefficients of p and q, the term a2*x*p is
/// congruent to a2 mod q and to 0 mod p (and symmetrically for a1*y*q), so
/// every sign combination solves both congruences. The four values are not
/// necessarily distinct when a1 or a2 is zero.
pub fn combine_crt(
    a1: &RabinInt,
    a2: &RabinInt,
    p: &RabinInt,
    q: &RabinInt,
    n: &RabinInt,
) -> [RabinInt; 4] {
    let (x, y) = extended_euclid(p, q);

    let lift_q = a2 * &x * p;
    let lift_p = a1 * &y * q;

    [
        (&lift_q + &lift_p).mod_floor(n),
        (-&lift_q + &lift_p).mod_floor(n),
        (&lift_q - &lift_p).mod_floor(n),
        (-&lift_q - &lift_p).mod_floor(n),
    ]
}

/// Greatest common divisor of two signed integers
pub fn gcd(a: &RabinInt, b: &RabinInt) -> RabinInt {
    a.gcd(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extended_euclid_bezout_identity() {
        let pairs = [(31u64, 53u64), (23, 101), (240, 46), (1, 997)];
        for (a, b) in pairs {
            let (a, b) = (from_u64(a), from_u64(b));
            let (x, y) = extended_euclid(&a, &b);
            assert_eq!(&a * &x + &b * &y, gcd(&a, &b));
        }
    }

    #[test]
    fn test_extended_euclid_coprime_primes() {
        let (p, q) = (from_u64(31), from_u64(53));
        let (x, y) = extended_euclid(&p, &q);
        assert_eq!(&p * &x + &q * &y, RabinInt::one());
    }

    #[test]
    fn test_modular_square_root_finds_smallest_root() {
        // 4^2 = 16 mod 31
        let root = modular_square_root(&from_u64(16), &from_u64(31)).unwrap();
        assert_eq!(root, from_u64(4));

        // 0 is its own root
        let root = modular_square_root(&from_u64(0), &from_u64(53)).unwrap();
        assert_eq!(root, RabinInt::zero());
    }

    #[test]
    fn test_modular_square_root_reduces_input_first() {
        // 1597 mod 53 = 7, and 18^2 = 324 = 7 (mod 53)
        let root = modular_square_root(&from_u64(1597), &from_u64(53)).unwrap();
        assert_eq!((&root * &root).mod_floor(&from_u64(53)), from_u64(7));
    }

    #[test]
    fn test_modular_square_root_non_residue() {
        // squares mod 7 are {0, 1, 2, 4}; 3 is not among them
        assert!(modular_square_root(&from_u64(3), &from_u64(7)).is_none());
    }

    #[test]
    fn test_combine_crt_all_roots_square_to_same_residue() {
        let (p, q) = (from_u64(31), from_u64(53));
        let n = &p * &q;

        // c = 190^2 mod 1643 = 1597
        let c = from_u64(1597);
        let a1 = modular_square_root(&c, &p).unwrap();
        let a2 = modular_square_root(&c, &q).unwrap();

        let roots = combine_crt(&a1, &a2, &p, &q, &n);
        for root in &roots {
            assert!(root >= &RabinInt::zero() && root < &n);
            assert_eq!((root * root).mod_floor(&n), c);
        }
        // 190 itself must be among the four combinations
        assert!(roots.contains(&from_u64(190)));
    }

    #[test]
    fn test_combine_crt_tolerates_duplicate_roots() {
        let (p, q) = (from_u64(31), from_u64(53));
        let n = &p * &q;

        // a1 = 0 collapses the sign of the p-side term
        let roots = combine_crt(&RabinInt::zero(), &from_u64(5), &p, &q, &n);
        for root in &roots {
            assert_eq!(root.mod_floor(&p), RabinInt::zero());
            assert_eq!(
                (root * root).mod_floor(&q),
                from_u64(25).mod_floor(&from_u64(53))
            );
        }
    }
}
