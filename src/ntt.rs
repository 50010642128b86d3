use crate::reduce::{barrett_reduce, montgomery_reduce};
use crate::N;

/// Roots of unity in Montgomery form: entry i is `zeta^{br(i)} * 2^16 mod q`
/// for `zeta = 17` and `br` the 7-bit bit reversal, as centered signed values.
pub(crate) static ZETAS: [i16; 128] = [
    -1044, -758, -359, -1517, 1493, 1422, 287, 202,
    -171, 622, 1577, 182, 962, -1202, -1474, 1468,
    573, -1325, 264, 383, -829, 1458, -1602, -130,
    -681, 1017, 732, 608, -1542, 411, -205, -1571,
    1223, 652, -552, 1015, -1293, 1491, -282, -1544,
    516, -8, -320, -666, -1618, -1162, 126, 1469,
    -853, -90, -271, 830, 107, -1421, -247, -951,
    -398, 961, -1508, -725, 448, -1065, 677, -1275,
    -1103, 430, 555, 843, -1251, 871, 1550, 105,
    422, 587, 177, -235, -291, -460, 1574, 1653,
    -246, 778, 1159, -147, -777, 1483, -602, 1119,
    -1590, 644, -872, 349, 418, 329, -156, -75,
    817, 1097, 603, 610, 1322, -1285, -1465, 384,
    -1215, -136, 1218, -1335, -874, 220, -1187, -1659,
    -1185, -1530, -1278, 794, -1510, -854, -870, 478,
    -108, -308, 996, 991, 958, -1460, 1522, 1628,
];

/// Multiplication followed by Montgomery reduction; returns a value
/// congruent to `a * b * R^-1 mod q`.
pub(crate) fn fqmul(a: i16, b: i16) -> i16 { montgomery_reduce(i32::from(a) * i32::from(b)) }

/// In-place number-theoretic transform in `R_q`, Cooley-Tukey layout.
/// Input is in standard order, output is in bit-reversed order.
pub(crate) fn ntt(r: &mut [i16; N]) {
    let mut k = 1;
    for len in [128, 64, 32, 16, 8, 4, 2] {
        for start in (0..N).step_by(2 * len) {
            let zeta = ZETAS[k];
            k += 1;
            for j in start..(start + len) {
                let t = fqmul(zeta, r[j + len]);
                r[j + len] = r[j] - t;
                r[j] += t;
            }
        }
    }
}

/// In-place inverse NTT, Gentleman-Sande layout, plus multiplication by the
/// Montgomery factor `2^16`. Input is in bit-reversed order, output in
/// standard order.
pub(crate) fn invntt(r: &mut [i16; N]) {
    const F: i16 = 1441; // mont^2 / 128

    let mut k = 127;
    for len in [2, 4, 8, 16, 32, 64, 128] {
        for start in (0..N).step_by(2 * len) {
            let zeta = ZETAS[k];
            k -= 1;
            for j in start..(start + len) {
                let t = r[j];
                r[j] = barrett_reduce(t + r[j + len]);
                r[j + len] = fqmul(zeta, r[j + len] - t);
            }
        }
    }

    for coeff in r.iter_mut() {
        *coeff = fqmul(*coeff, F);
    }
}

/// Multiplication of two degree-one polynomials in `Z_q[X]/(X^2 - zeta)`,
/// the base case of multiplication in NTT domain.
pub(crate) fn basemul(r: &mut [i16], a: &[i16], b: &[i16], zeta: i16) {
    r[0] = fqmul(a[1], b[1]);
    r[0] = fqmul(r[0], zeta);
    r[0] += fqmul(a[0], b[0]);
    r[1] = fqmul(a[0], b[1]);
    r[1] += fqmul(a[1], b[0]);
}
