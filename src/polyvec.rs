use crate::params::Params;
use crate::poly::Poly;
use crate::{N, POLY_BYTES, Q};
use alloc::vec;
use alloc::vec::Vec;
use zeroize::Zeroize;


/// Vector of k polynomials; k is the module rank of the parameter set.
#[derive(Clone, Zeroize)]
pub(crate) struct PolyVec {
    pub(crate) vec: Vec<Poly>,
}

impl PolyVec {
    pub(crate) fn new(k: usize) -> Self { PolyVec { vec: vec![Poly::new(); k] } }

    /// Compress and serialize to `polyvec_compressed_bytes`
    /// (`k*320` bytes at d = 10, `k*352` bytes at d = 11).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn compress(&self, params: &Params) -> Vec<u8> {
        let mut r = vec![0u8; params.polyvec_compressed_bytes];
        match params.polyvec_compressed_bytes / params.k {
            352 => {
                let mut t = [0u16; 8];
                let mut z = 0;
                for i in 0..params.k {
                    for j in 0..N / 8 {
                        for (x, t_x) in t.iter_mut().enumerate() {
                            // map to positive standard representatives
                            let mut u = self.vec[i].coeffs[8 * j + x];
                            u += (u >> 15) & Q;
                            let mut d0 = u64::from(u as u16) << 11;
                            d0 += 1664;
                            d0 *= 645_084;
                            d0 >>= 31;
                            *t_x = (d0 & 0x7FF) as u16;
                        }
                        r[z] = t[0] as u8;
                        r[z + 1] = ((t[0] >> 8) | (t[1] << 3)) as u8;
                        r[z + 2] = ((t[1] >> 5) | (t[2] << 6)) as u8;
                        r[z + 3] = (t[2] >> 2) as u8;
                        r[z + 4] = ((t[2] >> 10) | (t[3] << 1)) as u8;
                        r[z + 5] = ((t[3] >> 7) | (t[4] << 4)) as u8;
                        r[z + 6] = ((t[4] >> 4) | (t[5] << 7)) as u8;
                        r[z + 7] = (t[5] >> 1) as u8;
                        r[z + 8] = ((t[5] >> 9) | (t[6] << 2)) as u8;
                        r[z + 9] = ((t[6] >> 6) | (t[7] << 5)) as u8;
                        r[z + 10] = (t[7] >> 3) as u8;
                        z += 11;
                    }
                }
            }
            320 => {
                let mut t = [0u16; 4];
                let mut z = 0;
                for i in 0..params.k {
                    for j in 0..N / 4 {
                        for (x, t_x) in t.iter_mut().enumerate() {
                            let mut u = self.vec[i].coeffs[4 * j + x];
                            u += (u >> 15) & Q;
                            let mut d0 = u64::from(u as u16) << 10;
                            d0 += 1665;
                            d0 *= 1_290_167;
                            d0 >>= 32;
                            *t_x = (d0 & 0x3FF) as u16;
                        }
                        r[z] = t[0] as u8;
                        r[z + 1] = ((t[0] >> 8) | (t[1] << 2)) as u8;
                        r[z + 2] = ((t[1] >> 6) | (t[2] << 4)) as u8;
                        r[z + 3] = ((t[2] >> 4) | (t[3] << 6)) as u8;
                        r[z + 4] = (t[3] >> 2) as u8;
                        z += 5;
                    }
                }
            }
            _ => unreachable!("polyvec compressed width must be k*320 or k*352"),
        }
        r
    }

    /// De-serialize and decompress; approximate inverse of `compress`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub(crate) fn decompress(params: &Params, a: &[u8]) -> Self {
        let mut r = PolyVec::new(params.k);
        match params.polyvec_compressed_bytes / params.k {
            352 => {
                let mut t = [0u16; 8];
                let mut z = 0;
                for i in 0..params.k {
                    for j in 0..N / 8 {
                        t[0] = u16::from(a[z]) | (u16::from(a[z + 1]) << 8);
                        t[1] = (u16::from(a[z + 1]) >> 3) | (u16::from(a[z + 2]) << 5);
                        t[2] = (u16::from(a[z + 2]) >> 6)
                            | (u16::from(a[z + 3]) << 2)
                            | (u16::from(a[z + 4]) << 10);
                        t[3] = (u16::from(a[z + 4]) >> 1) | (u16::from(a[z + 5]) << 7);
                        t[4] = (u16::from(a[z + 5]) >> 4) | (u16::from(a[z + 6]) << 4);
                        t[5] = (u16::from(a[z + 6]) >> 7)
                            | (u16::from(a[z + 7]) << 1)
                            | (u16::from(a[z + 8]) << 9);
                        t[6] = (u16::from(a[z + 8]) >> 2) | (u16::from(a[z + 9]) << 6);
                        t[7] = (u16::from(a[z + 9]) >> 5) | (u16::from(a[z + 10]) << 3);
                        z += 11;

                        for x in 0..8 {
                            r.vec[i].coeffs[8 * j + x] =
                                ((u32::from(t[x] & 0x7FF) * u32::from(Q as u16) + 1024) >> 11)
                                    as i16;
                        }
                    }
                }
            }
            320 => {
                let mut t = [0u16; 4];
                let mut z = 0;
                for i in 0..params.k {
                    for j in 0..N / 4 {
                        t[0] = u16::from(a[z]) | (u16::from(a[z + 1]) << 8);
                        t[1] = (u16::from(a[z + 1]) >> 2) | (u16::from(a[z + 2]) << 6);
                        t[2] = (u16::from(a[z + 2]) >> 4) | (u16::from(a[z + 3]) << 4);
                        t[3] = (u16::from(a[z + 3]) >> 6) | (u16::from(a[z + 4]) << 2);
                        z += 5;

                        for x in 0..4 {
                            r.vec[i].coeffs[4 * j + x] =
                                ((u32::from(t[x] & 0x3FF) * u32::from(Q as u16) + 512) >> 10)
                                    as i16;
                        }
                    }
                }
            }
            _ => unreachable!("polyvec compressed width must be k*320 or k*352"),
        }
        r
    }

    /// Serialize the vector: 384 bytes per polynomial.
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut r = vec![0u8; self.vec.len() * POLY_BYTES];
        for (i, p) in self.vec.iter().enumerate() {
            p.to_bytes(&mut r[i * POLY_BYTES..(i + 1) * POLY_BYTES]);
        }
        r
    }

    /// De-serialize a vector of k polynomials; inverse of `to_bytes`.
    pub(crate) fn from_bytes(k: usize, a: &[u8]) -> Self {
        let mut r = PolyVec::new(k);
        for (i, p) in r.vec.iter_mut().enumerate() {
            *p = Poly::from_bytes(&a[i * POLY_BYTES..(i + 1) * POLY_BYTES]);
        }
        r
    }

    /// Apply the forward NTT to every element.
    pub(crate) fn ntt(&mut self) {
        for p in &mut self.vec {
            p.ntt();
        }
    }

    /// Apply the inverse NTT (with Montgomery factor) to every element.
    pub(crate) fn invntt_tomont(&mut self) {
        for p in &mut self.vec {
            p.invntt_tomont();
        }
    }

    /// Barrett-reduce every coefficient of every element.
    pub(crate) fn reduce(&mut self) {
        for p in &mut self.vec {
            p.reduce();
        }
    }

    /// Element-wise vector addition; no modular reduction is performed.
    pub(crate) fn add(&self, other: &Self) -> Self {
        let mut r = PolyVec::new(self.vec.len());
        for i in 0..self.vec.len() {
            r.vec[i] = self.vec[i].add(&other.vec[i]);
        }
        r
    }

    /// Pointwise-accumulate multiply of two vectors in NTT domain: the
    /// inner product with an extra factor of `2^-16`, Barrett-reduced.
    pub(crate) fn basemul_acc_montgomery(a: &Self, b: &Self) -> Poly {
        let mut r = Poly::basemul_montgomery(&a.vec[0], &b.vec[0]);
        for i in 1..a.vec.len() {
            let t = Poly::basemul_montgomery(&a.vec[i], &b.vec[i]);
            r = r.add(&t);
        }
        r.reduce();
        r
    }
}
