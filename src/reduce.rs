use crate::Q;

/// q^-1 mod 2^16
pub(crate) const QINV: i32 = -3327;

/// Montgomery reduction: given a 32-bit integer `a` in
/// `[-q*2^15, q*2^15)`, computes a 16-bit integer congruent to
/// `a * R^-1 mod q` with `R = 2^16`, in `(-q, q)`.
///
/// Uses wrapping 16/32-bit signed arithmetic so that every build profile
/// reproduces the reference arithmetic bit-for-bit.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn montgomery_reduce(a: i32) -> i16 {
    let t = a.wrapping_mul(QINV) as i16;
    ((a - i32::from(t) * i32::from(Q)) >> 16) as i16
}

/// Barrett reduction: given any 16-bit integer `a`, computes the centered
/// representative congruent to `a mod q` in `[-(q-1)/2, (q-1)/2]`.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn barrett_reduce(a: i16) -> i16 {
    const V: i16 = (((1u32 << 26) + (Q as u32) / 2) / (Q as u32)) as i16;

    let t = ((i32::from(V) * i32::from(a) + (1 << 25)) >> 26) as i16;
    a.wrapping_sub(t.wrapping_mul(Q))
}


#[cfg(test)]
mod tests {
    use super::{barrett_reduce, montgomery_reduce};
    use crate::Q;
    use rand::{Rng, SeedableRng};

    fn mod_q(a: i64) -> i64 { a.rem_euclid(i64::from(Q)) }

    #[test]
    fn test_montgomery_congruence_and_range() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        let bound = i32::from(Q) * (1 << 15);
        for _i in 0..10_000 {
            let a = rng.gen_range(-bound..bound);
            let r = montgomery_reduce(a);
            assert!((r > -Q) & (r < Q));
            // r * R ≡ a (mod q) with R = 2^16
            assert_eq!(mod_q(i64::from(r) << 16), mod_q(i64::from(a)));
        }
    }

    #[test]
    fn test_barrett_congruence_and_range() {
        for a in i16::MIN..=i16::MAX {
            let r = barrett_reduce(a);
            assert!((r >= -(Q - 1) / 2) & (r <= (Q - 1) / 2));
            assert_eq!(mod_q(i64::from(r)), mod_q(i64::from(a)));
        }
    }
}
