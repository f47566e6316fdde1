//! Arithmetic in GF(p), p = 2^256 + 297
//!
//! p is the smallest prime above 2^256, so every 256-bit hash output and
//! every 256-bit key is a canonical residue. Intermediates need up to 512
//! bits, hence `U512` throughout; multiplication and inversion run on
//! Montgomery residues.

use crypto_bigint::modular::runtime_mod::{DynResidue, DynResidueParams};
use crypto_bigint::{NonZero, U512};

use matchlock_core::MatchlockError;

const LIMBS: usize = U512::LIMBS;

/// The field modulus, 2^256 + 297.
pub const P: U512 = U512::from_be_hex(
    "00000000000000000000000000000000000000000000000000000000000000010000000000000000000000000000000000000000000000000000000000000129",
);

// Fermat exponent for inversion: p - 2. p is prime, so a^(p-2) = a^-1.
const P_MINUS_2: U512 = U512::from_be_hex(
    "00000000000000000000000000000000000000000000000000000000000000010000000000000000000000000000000000000000000000000000000000000127",
);

/// One share's coordinates on the secret-sharing line y = a·x + k mod p.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharePoint {
    pub x: U512,
    pub y: U512,
}

fn params() -> DynResidueParams<LIMBS> {
    DynResidueParams::new(&P)
}

fn residue(v: &U512) -> DynResidue<LIMBS> {
    DynResidue::new(v, params())
}

/// Canonical residue of `v` mod p.
pub fn real_mod(v: &U512) -> U512 {
    let p = NonZero::new(P).unwrap();
    let (_, r) = v.div_rem(&p);
    r
}

/// Slope of the line through `c1` and `c2`: (y2 − y1)·(x2 − x1)^-1 mod p.
///
/// Equal x-coordinates leave the slope undefined; the caller treats that
/// pair as a decryption failure.
pub fn derive_slope(c1: &SharePoint, c2: &SharePoint) -> Result<U512, MatchlockError> {
    let dx = residue(&c2.x) - residue(&c1.x);
    if dx.retrieve() == U512::ZERO {
        return Err(MatchlockError::SymmetricDecrypt);
    }
    let dy = residue(&c2.y) - residue(&c1.y);
    let inv = dx.pow(&P_MINUS_2);
    Ok((dy * inv).retrieve())
}

/// Intercept of the line with the given slope through `c`: y − slope·x mod p.
pub fn intercept(c: &SharePoint, slope: &U512) -> U512 {
    (residue(&c.y) - residue(slope) * residue(&c.x)).retrieve()
}

/// Evaluate the line: slope·x + k mod p. The encryptor side of `intercept`.
pub fn line_eval(slope: &U512, x: &U512, k: &U512) -> U512 {
    (residue(slope) * residue(x) + residue(k)).retrieve()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: u64, y: u64) -> SharePoint {
        SharePoint {
            x: U512::from_u64(x),
            y: U512::from_u64(y),
        }
    }

    #[test]
    fn test_modulus_is_2_pow_256_plus_297() {
        let two_pow_256 = U512::ONE.shl_vartime(256);
        assert_eq!(P, two_pow_256.wrapping_add(&U512::from_u64(297)));
    }

    #[test]
    fn test_real_mod_reduces_values_above_p() {
        let v = P.wrapping_add(&U512::from_u64(5));
        assert_eq!(real_mod(&v), U512::from_u64(5));
        assert_eq!(real_mod(&U512::from_u64(5)), U512::from_u64(5));
        assert_eq!(real_mod(&P), U512::ZERO);
    }

    #[test]
    fn test_slope_and_intercept_recover_the_line() {
        // y = 3x + 7 through x = 2 and x = 11
        let c1 = point(2, 13);
        let c2 = point(11, 40);

        let slope = derive_slope(&c1, &c2).unwrap();
        assert_eq!(slope, U512::from_u64(3));
        assert_eq!(intercept(&c1, &slope), U512::from_u64(7));
        assert_eq!(intercept(&c2, &slope), U512::from_u64(7));
    }

    #[test]
    fn test_slope_order_independent() {
        let c1 = point(5, 21);
        let c2 = point(9, 37); // y = 4x + 1
        assert_eq!(
            derive_slope(&c1, &c2).unwrap(),
            derive_slope(&c2, &c1).unwrap()
        );
    }

    #[test]
    fn test_slope_wraps_when_y2_below_y1() {
        // Descending line: y = -2x + 100 ≡ (p - 2)x + 100
        let c1 = point(10, 80);
        let c2 = point(30, 40);

        let slope = derive_slope(&c1, &c2).unwrap();
        assert_eq!(slope, P.wrapping_sub(&U512::from_u64(2)));
        assert_eq!(intercept(&c1, &slope), U512::from_u64(100));
    }

    #[test]
    fn test_equal_x_is_rejected() {
        let c1 = point(4, 9);
        let c2 = point(4, 17);
        assert_eq!(
            derive_slope(&c1, &c2),
            Err(MatchlockError::SymmetricDecrypt)
        );
    }

    #[test]
    fn test_line_eval_round_trips_through_reconstruction() {
        let slope = U512::from_u64(123_456_789);
        let k = U512::from_u64(987_654_321);
        let x1 = U512::from_u64(111);
        let x2 = U512::from_u64(222);

        let c1 = SharePoint {
            x: x1,
            y: line_eval(&slope, &x1, &k),
        };
        let c2 = SharePoint {
            x: x2,
            y: line_eval(&slope, &x2, &k),
        };

        let recovered_slope = derive_slope(&c1, &c2).unwrap();
        assert_eq!(recovered_slope, slope);
        assert_eq!(intercept(&c1, &recovered_slope), k);
    }

    #[test]
    fn test_reconstruction_near_the_modulus() {
        // Coordinates just below p exercise the 512-bit intermediates.
        let slope = P.wrapping_sub(&U512::from_u64(1));
        let k = P.wrapping_sub(&U512::from_u64(2));
        let x1 = P.wrapping_sub(&U512::from_u64(3));
        let x2 = U512::from_u64(7);

        let c1 = SharePoint {
            x: x1,
            y: line_eval(&slope, &x1, &k),
        };
        let c2 = SharePoint {
            x: x2,
            y: line_eval(&slope, &x2, &k),
        };

        let recovered = derive_slope(&c1, &c2).unwrap();
        assert_eq!(recovered, slope);
        assert_eq!(intercept(&c2, &recovered), k);
    }
}
