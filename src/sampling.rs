use crate::poly::Poly;
use crate::{N, Q};

/// Load 4 bytes into a 32-bit integer in little-endian order.
fn load32_littleendian(x: &[u8]) -> u32 {
    u32::from(x[0]) | (u32::from(x[1]) << 8) | (u32::from(x[2]) << 16) | (u32::from(x[3]) << 24)
}

/// Load 3 bytes into a 32-bit integer in little-endian order.
/// Only needed for eta = 3 (Kyber-512 secrets).
fn load24_littleendian(x: &[u8]) -> u32 {
    u32::from(x[0]) | (u32::from(x[1]) << 8) | (u32::from(x[2]) << 16)
}

/// Given uniformly random bytes (`2 * N / 4` of them), computes a polynomial
/// with coefficients distributed according to the centered binomial
/// distribution with parameter eta = 2.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub(crate) fn cbd2(r: &mut Poly, buf: &[u8]) {
    for i in 0..N / 8 {
        let t = load32_littleendian(&buf[4 * i..]);
        let mut d = t & 0x5555_5555;
        d += (t >> 1) & 0x5555_5555;

        for j in 0..8 {
            let a = ((d >> (4 * j)) & 0x3) as i16;
            let b = ((d >> (4 * j + 2)) & 0x3) as i16;
            r.coeffs[8 * i + j] = a - b;
        }
    }
}

/// Centered binomial distribution with parameter eta = 3, consuming
/// `3 * N / 4` uniformly random bytes. Only needed for Kyber-512.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub(crate) fn cbd3(r: &mut Poly, buf: &[u8]) {
    for i in 0..N / 4 {
        let t = load24_littleendian(&buf[3 * i..]);
        let mut d = t & 0x0024_9249;
        d += (t >> 1) & 0x0024_9249;
        d += (t >> 2) & 0x0024_9249;

        for j in 0..4 {
            let a = ((d >> (6 * j)) & 0x7) as i16;
            let b = ((d >> (6 * j + 3)) & 0x7) as i16;
            r.coeffs[4 * i + j] = a - b;
        }
    }
}

/// Rejection sampling on uniform random bytes: decodes 3-byte groups into
/// two 12-bit candidates each and keeps those below q. Returns the number
/// of coefficients written into `r` (at most `r.len()`).
///
/// This loop branches only on XOF output derived from the public seed, so
/// it carries no secret-dependent control flow.
#[allow(clippy::cast_possible_wrap)]
pub(crate) fn rej_uniform(r: &mut [i16], buf: &[u8]) -> usize {
    #[allow(clippy::cast_sign_loss)]
    const UQ: u16 = Q as u16;

    let mut ctr = 0;
    let mut pos = 0;
    while (ctr < r.len()) & (pos + 3 <= buf.len()) {
        let val0 = (u16::from(buf[pos]) | (u16::from(buf[pos + 1]) << 8)) & 0xFFF;
        let val1 = ((u16::from(buf[pos + 1]) >> 4) | (u16::from(buf[pos + 2]) << 4)) & 0xFFF;
        pos += 3;

        if val0 < UQ {
            r[ctr] = val0 as i16;
            ctr += 1;
        }
        if (ctr < r.len()) & (val1 < UQ) {
            r[ctr] = val1 as i16;
            ctr += 1;
        }
    }
    ctr
}


#[cfg(test)]
mod tests {
    use super::{cbd2, cbd3, rej_uniform};
    use crate::poly::Poly;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_cbd_ranges() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);

        let mut buf2 = [0u8; 128];
        let mut buf3 = [0u8; 192];
        for _i in 0..100 {
            rng.fill(&mut buf2[..]);
            let mut r = Poly::new();
            cbd2(&mut r, &buf2);
            assert!(r.coeffs.iter().all(|&c| (-2..=2).contains(&c)));

            rng.fill(&mut buf3[..]);
            let mut r = Poly::new();
            cbd3(&mut r, &buf3);
            assert!(r.coeffs.iter().all(|&c| (-3..=3).contains(&c)));
        }
    }

    #[test]
    fn test_rej_uniform_decoding() {
        // One 3-byte group yields candidates 0x001 and 0x002, both below q.
        let mut r = [0i16; 4];
        let ctr = rej_uniform(&mut r, &[0x01, 0x20, 0x00]);
        assert_eq!(ctr, 2);
        assert_eq!(&r[..2], &[1, 2]);

        // 0xFFF candidates are rejected.
        let ctr = rej_uniform(&mut r, &[0xFF, 0xFF, 0xFF]);
        assert_eq!(ctr, 0);

        // A trailing partial group is never consumed.
        let ctr = rej_uniform(&mut r, &[0x01, 0x20]);
        assert_eq!(ctr, 0);
    }
}
