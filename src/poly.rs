use crate::helpers::prf;
use crate::ntt::{basemul, invntt, ntt, ZETAS};
use crate::params::Params;
use crate::reduce::{barrett_reduce, montgomery_reduce};
use crate::sampling::{cbd2, cbd3};
use crate::{ETA2, MSG_BYTES, N, Q, SYM_BYTES};
use alloc::vec;
use alloc::vec::Vec;
use zeroize::Zeroize;


/// Element of `R_q = Z_q[X]/(X^256 + 1)`: 256 signed 16-bit coefficients.
///
/// Operations that claim "reduced" leave every coefficient in the centered
/// range `[-(q-1)/2, (q-1)/2]`; intermediate values may transiently exceed
/// it but stay within the Montgomery input range.
#[derive(Clone, Copy, Zeroize)]
pub(crate) struct Poly {
    pub(crate) coeffs: [i16; N],
}

impl Poly {
    pub(crate) fn new() -> Self { Poly { coeffs: [0i16; N] } }

    /// Compression and subsequent serialization to
    /// `poly_compressed_bytes` (128 bytes at d = 4, 160 bytes at d = 5).
    ///
    /// The division by q is carried out with the reference's
    /// multiplicative-inverse constants; the 32-bit products deliberately
    /// wrap, the masked result is unaffected.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn compress(&self, params: &Params) -> Vec<u8> {
        let mut r = vec![0u8; params.poly_compressed_bytes];
        let mut t = [0u8; 8];
        match params.poly_compressed_bytes {
            128 => {
                for i in 0..N / 8 {
                    for j in 0..8 {
                        // map to positive standard representatives
                        let mut u = self.coeffs[8 * i + j];
                        u += (u >> 15) & Q;
                        let mut d0 = u32::from(u as u16) << 4;
                        d0 += 1665;
                        d0 = d0.wrapping_mul(80635);
                        d0 >>= 28;
                        t[j] = (d0 & 0xF) as u8;
                    }
                    r[4 * i] = t[0] | (t[1] << 4);
                    r[4 * i + 1] = t[2] | (t[3] << 4);
                    r[4 * i + 2] = t[4] | (t[5] << 4);
                    r[4 * i + 3] = t[6] | (t[7] << 4);
                }
            }
            160 => {
                for i in 0..N / 8 {
                    for j in 0..8 {
                        let mut u = self.coeffs[8 * i + j];
                        u += (u >> 15) & Q;
                        let mut d0 = u32::from(u as u16) << 5;
                        d0 += 1664;
                        d0 = d0.wrapping_mul(40318);
                        d0 >>= 27;
                        t[j] = (d0 & 0x1F) as u8;
                    }
                    r[5 * i] = t[0] | (t[1] << 5);
                    r[5 * i + 1] = (t[1] >> 3) | (t[2] << 2) | (t[3] << 7);
                    r[5 * i + 2] = (t[3] >> 1) | (t[4] << 4);
                    r[5 * i + 3] = (t[4] >> 4) | (t[5] << 1) | (t[6] << 6);
                    r[5 * i + 4] = (t[6] >> 2) | (t[7] << 3);
                }
            }
            _ => unreachable!("poly compressed width must be 128 or 160"),
        }
        r
    }

    /// De-serialization and subsequent decompression; approximate inverse
    /// of `compress`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub(crate) fn decompress(params: &Params, a: &[u8]) -> Self {
        let mut r = Poly::new();
        match params.poly_compressed_bytes {
            128 => {
                for i in 0..N / 2 {
                    r.coeffs[2 * i] = (((u16::from(a[i] & 15) * (Q as u16)) + 8) >> 4) as i16;
                    r.coeffs[2 * i + 1] = (((u16::from(a[i] >> 4) * (Q as u16)) + 8) >> 4) as i16;
                }
            }
            160 => {
                let mut t = [0u8; 8];
                for i in 0..N / 8 {
                    t[0] = a[5 * i];
                    t[1] = (a[5 * i] >> 5) | (a[5 * i + 1] << 3);
                    t[2] = a[5 * i + 1] >> 2;
                    t[3] = (a[5 * i + 1] >> 7) | (a[5 * i + 2] << 1);
                    t[4] = (a[5 * i + 2] >> 4) | (a[5 * i + 3] << 4);
                    t[5] = a[5 * i + 3] >> 1;
                    t[6] = (a[5 * i + 3] >> 6) | (a[5 * i + 4] << 2);
                    t[7] = a[5 * i + 4] >> 3;

                    for j in 0..8 {
                        r.coeffs[8 * i + j] =
                            ((u32::from(t[j] & 31) * u32::from(Q as u16) + 16) >> 5) as i16;
                    }
                }
            }
            _ => unreachable!("poly compressed width must be 128 or 160"),
        }
        r
    }

    /// Serialization: 12 bits per coefficient, 384 bytes total.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn to_bytes(&self, r: &mut [u8]) {
        for i in 0..N / 2 {
            // map to positive standard representatives
            let mut t0 = self.coeffs[2 * i];
            t0 += (t0 >> 15) & Q;
            let mut t1 = self.coeffs[2 * i + 1];
            t1 += (t1 >> 15) & Q;
            r[3 * i] = t0 as u8;
            r[3 * i + 1] = (((t0 as u16) >> 8) | ((t1 as u16) << 4)) as u8;
            r[3 * i + 2] = ((t1 as u16) >> 4) as u8;
        }
    }

    /// De-serialization; inverse of `to_bytes`.
    #[allow(clippy::cast_possible_wrap)]
    pub(crate) fn from_bytes(a: &[u8]) -> Self {
        let mut r = Poly::new();
        for i in 0..N / 2 {
            r.coeffs[2 * i] =
                ((u16::from(a[3 * i]) | (u16::from(a[3 * i + 1]) << 8)) & 0xFFF) as i16;
            r.coeffs[2 * i + 1] =
                (((u16::from(a[3 * i + 1]) >> 4) | (u16::from(a[3 * i + 2]) << 4)) & 0xFFF) as i16;
        }
        r
    }

    /// Converts a 32-byte message to a polynomial: bit b becomes the
    /// coefficient `b * (q+1)/2`, i.e. 0 or 1665.
    pub(crate) fn from_msg(msg: &[u8; MSG_BYTES]) -> Self {
        let mut r = Poly::new();
        for i in 0..N / 8 {
            for j in 0..8 {
                let mask = -i16::from((msg[i] >> j) & 1);
                r.coeffs[8 * i + j] = mask & ((Q + 1) / 2);
            }
        }
        r
    }

    /// Converts a polynomial back to a 32-byte message, rounding each
    /// coefficient to one bit, LSB first within each byte.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn to_msg(&self) -> [u8; MSG_BYTES] {
        let mut msg = [0u8; MSG_BYTES];
        for i in 0..N / 8 {
            for j in 0..8 {
                // map to positive standard representative, then round
                let mut u = self.coeffs[8 * i + j];
                u += (u >> 15) & Q;
                let mut t = u32::from(u as u16);
                t <<= 1;
                t += 1665;
                t = t.wrapping_mul(80635);
                t >>= 28;
                t &= 1;
                msg[i] |= (t as u8) << j;
            }
        }
        msg
    }

    /// Samples a polynomial from the centered binomial distribution with
    /// the parameter set's eta1, deterministically from `seed` and `nonce`.
    pub(crate) fn getnoise_eta1(params: &Params, seed: &[u8; SYM_BYTES], nonce: u8) -> Self {
        let mut buf = vec![0u8; params.eta1 * N / 4];
        prf(&mut buf, seed, nonce);
        let mut r = Poly::new();
        match params.eta1 {
            2 => cbd2(&mut r, &buf),
            3 => cbd3(&mut r, &buf),
            _ => unreachable!("eta1 must be 2 or 3"),
        }
        buf.zeroize();
        r
    }

    /// Samples encryption noise from the centered binomial distribution
    /// with eta2 = 2, deterministically from `seed` and `nonce`.
    pub(crate) fn getnoise_eta2(seed: &[u8; SYM_BYTES], nonce: u8) -> Self {
        let mut buf = [0u8; ETA2 * N / 4];
        prf(&mut buf, seed, nonce);
        let mut r = Poly::new();
        cbd2(&mut r, &buf);
        buf.zeroize();
        r
    }

    /// In-place forward NTT followed by a full Barrett reduction pass.
    /// Input in standard order, output in bit-reversed order.
    pub(crate) fn ntt(&mut self) {
        ntt(&mut self.coeffs);
        self.reduce();
    }

    /// In-place inverse NTT and multiplication by the Montgomery factor
    /// `2^16`. Input in bit-reversed order, output in standard order.
    pub(crate) fn invntt_tomont(&mut self) { invntt(&mut self.coeffs); }

    /// Multiplication of two polynomials in NTT domain; the result picks up
    /// a factor of `2^-16` from the Montgomery reductions.
    pub(crate) fn basemul_montgomery(a: &Self, b: &Self) -> Self {
        let mut r = Poly::new();
        for i in 0..N / 4 {
            basemul(
                &mut r.coeffs[4 * i..4 * i + 2],
                &a.coeffs[4 * i..4 * i + 2],
                &b.coeffs[4 * i..4 * i + 2],
                ZETAS[64 + i],
            );
            basemul(
                &mut r.coeffs[4 * i + 2..4 * i + 4],
                &a.coeffs[4 * i + 2..4 * i + 4],
                &b.coeffs[4 * i + 2..4 * i + 4],
                -ZETAS[64 + i],
            );
        }
        r
    }

    /// In-place conversion of all coefficients to Montgomery domain.
    pub(crate) fn to_mont(&mut self) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
        const F: i16 = ((1u64 << 32) % (Q as u64)) as i16;
        for coeff in &mut self.coeffs {
            *coeff = montgomery_reduce(i32::from(*coeff) * i32::from(F));
        }
    }

    /// Applies Barrett reduction to every coefficient.
    pub(crate) fn reduce(&mut self) {
        for coeff in &mut self.coeffs {
            *coeff = barrett_reduce(*coeff);
        }
    }

    /// Coefficient-wise addition; no modular reduction is performed.
    pub(crate) fn add(&self, other: &Self) -> Self {
        let mut r = Poly::new();
        for i in 0..N {
            r.coeffs[i] = self.coeffs[i] + other.coeffs[i];
        }
        r
    }

    /// Coefficient-wise subtraction; no modular reduction is performed.
    pub(crate) fn sub(&self, other: &Self) -> Self {
        let mut r = Poly::new();
        for i in 0..N {
            r.coeffs[i] = self.coeffs[i] - other.coeffs[i];
        }
        r
    }
}


#[cfg(test)]
mod tests {
    use super::Poly;
    use crate::params::Params;
    use crate::{MSG_BYTES, N, POLY_BYTES, Q};
    use rand::{Rng, SeedableRng};

    fn dist_mod_q(a: i32, b: i32) -> i32 {
        let d = (a - b).rem_euclid(i32::from(Q));
        d.min(i32::from(Q) - d)
    }

    #[test]
    fn test_bytes_round_trip() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        for _i in 0..100 {
            let mut p = Poly::new();
            for coeff in &mut p.coeffs {
                *coeff = rng.gen_range(0..Q);
            }
            let mut bytes = [0u8; POLY_BYTES];
            p.to_bytes(&mut bytes);
            let p2 = Poly::from_bytes(&bytes);
            assert_eq!(p.coeffs, p2.coeffs);
        }
    }

    #[test]
    fn test_compress_error_bound() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(456);
        // (params, d) pairs covering both tabulated widths
        for (params, d) in [(Params::kyber512(), 4u32), (Params::kyber1024(), 5u32)] {
            let bound = (i32::from(Q) + (1 << (d + 1)) - 1) >> (d + 1);
            for _i in 0..25 {
                let mut p = Poly::new();
                for coeff in &mut p.coeffs {
                    *coeff = rng.gen_range(0..Q);
                }
                let compressed = p.compress(&params);
                let p2 = Poly::decompress(&params, &compressed);
                for i in 0..N {
                    let err = dist_mod_q(i32::from(p.coeffs[i]), i32::from(p2.coeffs[i]));
                    assert!(err <= bound, "coefficient error {err} exceeds bound {bound}");
                }
            }
        }
    }

    #[test]
    fn test_msg_round_trip() {
        // All-ones message maps every coefficient to (q+1)/2 = 1665
        let m = [0xFFu8; MSG_BYTES];
        let p = Poly::from_msg(&m);
        assert!(p.coeffs.iter().all(|&c| c == 1665));
        assert_eq!(p.to_msg(), m);

        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(789);
        for _i in 0..100 {
            let mut m = [0u8; MSG_BYTES];
            rng.fill(&mut m[..]);
            assert_eq!(Poly::from_msg(&m).to_msg(), m);
        }
    }

    #[test]
    fn test_noise_is_deterministic_and_small() {
        let seed = [7u8; 32];
        let p512 = Params::kyber512();
        let a = Poly::getnoise_eta1(&p512, &seed, 3);
        let b = Poly::getnoise_eta1(&p512, &seed, 3);
        assert_eq!(a.coeffs, b.coeffs);
        assert!(a.coeffs.iter().all(|&c| (-3..=3).contains(&c)));

        let c = Poly::getnoise_eta2(&seed, 3);
        assert!(c.coeffs.iter().all(|&x| (-2..=2).contains(&x)));
        // eta1 = 3 and eta2 = 2 streams must differ for the same seed/nonce
        assert_ne!(a.coeffs, c.coeffs);
    }
}
