use crate::helpers::{g, xof};
use crate::params::Params;
use crate::poly::Poly;
use crate::polyvec::PolyVec;
use crate::sampling::rej_uniform;
use crate::{MSG_BYTES, N, SHAKE128_RATE, SYM_BYTES};
use alloc::vec::Vec;
use sha3::digest::XofReader;
use zeroize::Zeroize;


// Enough XOF blocks that one squeeze usually satisfies the sampler
#[allow(clippy::cast_sign_loss)]
const GEN_MATRIX_NBLOCKS: usize =
    (12 * N / 8 * (1 << 12) / (crate::Q as usize) + SHAKE128_RATE) / SHAKE128_RATE;


/// Serialize the public key as the vector `t` followed by the 32-byte
/// public seed used to generate the matrix A.
fn pack_pk(pk: &PolyVec, seed: &[u8; SYM_BYTES]) -> Vec<u8> {
    let mut r = pk.to_bytes();
    r.extend_from_slice(seed);
    r
}

/// De-serialize a public key into the vector `t` and the matrix seed.
fn unpack_pk(params: &Params, packed_pk: &[u8]) -> (PolyVec, [u8; SYM_BYTES]) {
    let pk = PolyVec::from_bytes(params.k, &packed_pk[..params.polyvec_bytes]);
    let seed = packed_pk[params.polyvec_bytes..params.polyvec_bytes + SYM_BYTES]
        .try_into()
        .expect("pk seed fail");
    (pk, seed)
}

/// Serialize the secret key vector.
fn pack_sk(sk: &PolyVec) -> Vec<u8> { sk.to_bytes() }

/// De-serialize the secret key vector; inverse of `pack_sk`.
fn unpack_sk(params: &Params, packed_sk: &[u8]) -> PolyVec {
    PolyVec::from_bytes(params.k, packed_sk)
}

/// Serialize the ciphertext as the compressed vector `u` followed by the
/// compressed polynomial `v`.
fn pack_ciphertext(params: &Params, b: &PolyVec, v: &Poly) -> Vec<u8> {
    let mut r = b.compress(params);
    r.extend_from_slice(&v.compress(params));
    r
}

/// De-serialize and decompress a ciphertext; approximate inverse of
/// `pack_ciphertext`.
fn unpack_ciphertext(params: &Params, c: &[u8]) -> (PolyVec, Poly) {
    let b = PolyVec::decompress(params, &c[..params.polyvec_compressed_bytes]);
    let v = Poly::decompress(params, &c[params.polyvec_compressed_bytes..]);
    (b, v)
}

/// Deterministically generate the matrix A (or its transpose) from a seed
/// by rejection sampling on SHAKE-128 output. Entry (i, j) of A absorbs
/// `seed || j || i`; of A^T, `seed || i || j`.
///
/// The sampler branches only on XOF output derived from the public seed.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn gen_matrix(params: &Params, seed: &[u8; SYM_BYTES], transposed: bool) -> Vec<PolyVec> {
    let mut a = Vec::with_capacity(params.k);
    let mut buf = [0u8; GEN_MATRIX_NBLOCKS * SHAKE128_RATE + 2];

    for i in 0..params.k {
        let mut row = PolyVec::new(params.k);
        for j in 0..params.k {
            let (b0, b1) = if transposed { (i as u8, j as u8) } else { (j as u8, i as u8) };
            let mut reader = xof(seed, b0, b1);

            let mut buflen = GEN_MATRIX_NBLOCKS * SHAKE128_RATE;
            reader.read(&mut buf[..buflen]);
            let mut ctr = rej_uniform(&mut row.vec[j].coeffs, &buf[..buflen]);

            while ctr < N {
                // carry the trailing partial 3-byte group, then squeeze one
                // more block so the decoder only ever sees whole groups
                let off = buflen % 3;
                for x in 0..off {
                    buf[x] = buf[buflen - off + x];
                }
                reader.read(&mut buf[off..off + SHAKE128_RATE]);
                buflen = off + SHAKE128_RATE;
                ctr += rej_uniform(&mut row.vec[j].coeffs[ctr..], &buf[..buflen]);
            }
        }
        a.push(row);
    }
    a
}

/// Key generation for the CPA-secure public-key encryption scheme
/// underlying the KEM, deterministic in the 32-byte seed `d`:
/// `(rho, sigma) := G(d)`, `t := A*s + e` with `s`, `e` sampled from the
/// CBD via `sigma`.
///
/// Returns `(pk, sk)` of `indcpa_public_key_bytes` and
/// `indcpa_secret_key_bytes` respectively.
pub(crate) fn indcpa_keypair(params: &Params, d: &[u8; SYM_BYTES]) -> (Vec<u8>, Vec<u8>) {
    let (public_seed, mut noise_seed) = g(&[d]);

    let a = gen_matrix(params, &public_seed, false);

    let mut nonce = 0u8;
    let mut skpv = PolyVec::new(params.k);
    for p in &mut skpv.vec {
        *p = Poly::getnoise_eta1(params, &noise_seed, nonce);
        nonce += 1;
    }
    let mut e = PolyVec::new(params.k);
    for p in &mut e.vec {
        *p = Poly::getnoise_eta1(params, &noise_seed, nonce);
        nonce += 1;
    }

    skpv.ntt();
    e.ntt();

    // matrix-vector multiplication
    let mut pkpv = PolyVec::new(params.k);
    for i in 0..params.k {
        pkpv.vec[i] = PolyVec::basemul_acc_montgomery(&a[i], &skpv);
        pkpv.vec[i].to_mont();
    }
    let mut pkpv = pkpv.add(&e);
    pkpv.reduce();

    let sk = pack_sk(&skpv);
    let pk = pack_pk(&pkpv, &public_seed);

    skpv.zeroize();
    noise_seed.zeroize();
    (pk, sk)
}

/// Encryption function of the CPA-secure scheme: all randomness is derived
/// deterministically from the 32-byte `coins`.
pub(crate) fn indcpa_encrypt(
    params: &Params, m: &[u8; MSG_BYTES], pk: &[u8], coins: &[u8; SYM_BYTES],
) -> Vec<u8> {
    debug_assert_eq!(pk.len(), params.indcpa_public_key_bytes, "indcpa_encrypt: pk length");

    let (pkpv, seed) = unpack_pk(params, pk);
    let k_poly = Poly::from_msg(m);
    let at = gen_matrix(params, &seed, true);

    let mut nonce = 0u8;
    let mut sp = PolyVec::new(params.k);
    for p in &mut sp.vec {
        *p = Poly::getnoise_eta1(params, coins, nonce);
        nonce += 1;
    }
    let mut ep = PolyVec::new(params.k);
    for p in &mut ep.vec {
        *p = Poly::getnoise_eta2(coins, nonce);
        nonce += 1;
    }
    let epp = Poly::getnoise_eta2(coins, nonce);

    sp.ntt();

    // matrix-vector multiplication
    let mut b = PolyVec::new(params.k);
    for i in 0..params.k {
        b.vec[i] = PolyVec::basemul_acc_montgomery(&at[i], &sp);
    }
    let mut v = PolyVec::basemul_acc_montgomery(&pkpv, &sp);

    b.invntt_tomont();
    v.invntt_tomont();

    let mut b = b.add(&ep);
    let mut v = v.add(&epp).add(&k_poly);
    b.reduce();
    v.reduce();

    let c = pack_ciphertext(params, &b, &v);
    sp.zeroize();
    c
}

/// Decryption function of the CPA-secure scheme:
/// `m := v - invNTT(s_hat o NTT(u))`, rounded to one bit per coefficient.
pub(crate) fn indcpa_decrypt(params: &Params, c: &[u8], sk: &[u8]) -> [u8; MSG_BYTES] {
    debug_assert_eq!(c.len(), params.indcpa_bytes, "indcpa_decrypt: ct length");
    debug_assert_eq!(sk.len(), params.indcpa_secret_key_bytes, "indcpa_decrypt: sk length");

    let (mut b, v) = unpack_ciphertext(params, c);
    let mut skpv = unpack_sk(params, sk);

    b.ntt();
    let mut mp = PolyVec::basemul_acc_montgomery(&skpv, &b);
    mp.invntt_tomont();

    let mut mp = v.sub(&mp);
    mp.reduce();

    let m = mp.to_msg();
    skpv.zeroize();
    m
}
