use crate::helpers::{ensure, g, h, kdf};
use crate::indcpa::{indcpa_decrypt, indcpa_encrypt, indcpa_keypair};
use crate::params::Params;
use crate::{SS_BYTES, SYM_BYTES};
use alloc::vec;
use alloc::vec::Vec;
use rand_core::CryptoRngCore;
#[cfg(feature = "default-rng")]
use rand_core::OsRng;
use subtle::{ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;


/// Shared keygen body: CPA keypair from `d`, then the CCA secret key
/// `indcpa_sk || pk || H(pk) || z` with `z` the implicit-rejection secret.
fn keygen_internal(params: &Params, d: &[u8; SYM_BYTES], z: &[u8; SYM_BYTES]) -> (Vec<u8>, Vec<u8>) {
    let (pk, mut indcpa_sk) = indcpa_keypair(params, d);

    let mut sk = Vec::with_capacity(params.secret_key_bytes);
    // fixed-length copies; access pattern is independent of the key bytes
    sk.extend_from_slice(&indcpa_sk);
    sk.extend_from_slice(&pk);
    sk.extend_from_slice(&h(&pk));
    sk.extend_from_slice(z);

    indcpa_sk.zeroize();
    (pk, sk)
}

/// Encapsulation body, deterministic in `m` (32 bytes of randomness):
/// `(K_bar, r) := G(H(m) || H(pk))`, `c := Enc(pk, H(m), r)`,
/// `K := KDF(K_bar || H(c))`.
fn encaps_internal(params: &Params, pk: &[u8], m: &[u8; SYM_BYTES]) -> (Vec<u8>, Vec<u8>) {
    // never release raw RNG output
    let hash_m = h(m);
    let hash_pk = h(pk);

    let (mut k_bar, mut coins) = g(&[&hash_m, &hash_pk]);
    let ct = indcpa_encrypt(params, &hash_m, pk, &coins);

    let mut pre = [0u8; 2 * SYM_BYTES];
    pre[..SYM_BYTES].copy_from_slice(&k_bar);
    pre[SYM_BYTES..].copy_from_slice(&h(&ct));
    let mut ss = vec![0u8; SS_BYTES];
    kdf(&mut ss, &pre);

    pre.zeroize();
    k_bar.zeroize();
    coins.zeroize();
    (ct, ss)
}

/// Generates a public/secret key pair for the CCA-secure KEM using the
/// provided random number generator.
///
/// # Errors
/// Returns an error if the random number generator fails.
pub fn try_keygen_with_rng(
    params: &Params, rng: &mut impl CryptoRngCore,
) -> Result<(Vec<u8>, Vec<u8>), &'static str> {
    let mut d = [0u8; SYM_BYTES];
    rng.try_fill_bytes(&mut d).map_err(|_| "keygen: rng failed for d")?;
    let mut z = [0u8; SYM_BYTES];
    rng.try_fill_bytes(&mut z).map_err(|_| "keygen: rng failed for z")?;

    let keys = keygen_internal(params, &d, &z);
    d.zeroize();
    z.zeroize();
    Ok(keys)
}

/// Generates a key pair with the CPA key derivation seeded by `seed`
/// (playing the role of `d`), for key recovery and known-answer testing.
/// The implicit-rejection value `z` is still drawn fresh from `rng`, so
/// everything except the final 32 bytes of the secret key is a pure
/// function of `seed`.
///
/// # Errors
/// Returns an error if the random number generator fails.
pub fn try_keygen_with_recovery(
    params: &Params, seed: &[u8; SYM_BYTES], rng: &mut impl CryptoRngCore,
) -> Result<(Vec<u8>, Vec<u8>), &'static str> {
    let mut z = [0u8; SYM_BYTES];
    rng.try_fill_bytes(&mut z).map_err(|_| "keygen: rng failed for z")?;

    let keys = keygen_internal(params, seed, &z);
    z.zeroize();
    Ok(keys)
}

/// Generates a key pair using the OS random number generator.
///
/// # Errors
/// Returns an error if the random number generator fails.
///
/// # Examples
/// ```rust
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use kyber_kex::{try_decaps, try_encaps, try_keygen, Params};
///
/// let params = Params::kyber512(); // Could also be kyber768 or kyber1024.
/// let (pk, sk) = try_keygen(&params)?; // Originator generates a key pair
/// let (ct, ss_remote) = try_encaps(&params, &pk)?; // Remote party encapsulates
/// let ss_local = try_decaps(&params, &ct, &sk)?; // Originator decapsulates
/// assert_eq!(ss_remote, ss_local); // Both ends hold the same shared secret
/// # Ok(())}
/// ```
#[cfg(feature = "default-rng")]
pub fn try_keygen(params: &Params) -> Result<(Vec<u8>, Vec<u8>), &'static str> {
    try_keygen_with_rng(params, &mut OsRng)
}

/// Generates a ciphertext and shared secret for the given public key using
/// the provided random number generator.
///
/// # Errors
/// Returns an error if `pk` has the wrong length or the random number
/// generator fails.
pub fn try_encaps_with_rng(
    params: &Params, pk: &[u8], rng: &mut impl CryptoRngCore,
) -> Result<(Vec<u8>, Vec<u8>), &'static str> {
    ensure!(pk.len() == params.public_key_bytes, "encaps: pk length mismatch");

    let mut m = [0u8; SYM_BYTES];
    rng.try_fill_bytes(&mut m).map_err(|_| "encaps: rng failed for m")?;

    let out = encaps_internal(params, pk, &m);
    m.zeroize();
    Ok(out)
}

/// Generates a ciphertext and shared secret for the given public key using
/// the OS random number generator.
///
/// # Errors
/// Returns an error if `pk` has the wrong length or the random number
/// generator fails.
#[cfg(feature = "default-rng")]
pub fn try_encaps(params: &Params, pk: &[u8]) -> Result<(Vec<u8>, Vec<u8>), &'static str> {
    try_encaps_with_rng(params, pk, &mut OsRng)
}

/// Deterministic encapsulation: `seed` stands in for the 32 bytes of
/// randomness. Intended for key recovery and known-answer testing; use
/// [`try_encaps`] or [`try_encaps_with_rng`] for session establishment.
///
/// # Errors
/// Returns an error if `pk` has the wrong length.
pub fn encaps_from_seed(
    params: &Params, pk: &[u8], seed: &[u8; SYM_BYTES],
) -> Result<(Vec<u8>, Vec<u8>), &'static str> {
    ensure!(pk.len() == params.public_key_bytes, "encaps: pk length mismatch");
    Ok(encaps_internal(params, pk, seed))
}

/// Recovers the shared secret from a ciphertext and secret key.
///
/// Decapsulation never fails observably: a malformed or tampered
/// ciphertext yields a pseudorandom shared secret derived from the
/// implicit-rejection value `z` held in the secret key. The re-encryption
/// comparison and the selection between the real pre-key and `z` are
/// performed without secret-dependent branches.
///
/// # Errors
/// Returns an error only for mis-sized `ct` or `sk` buffers, which is a
/// caller bug rather than a property of the ciphertext.
pub fn try_decaps(params: &Params, ct: &[u8], sk: &[u8]) -> Result<Vec<u8>, &'static str> {
    ensure!(ct.len() == params.ciphertext_bytes, "decaps: ct length mismatch");
    ensure!(sk.len() == params.secret_key_bytes, "decaps: sk length mismatch");

    let indcpa_sk = &sk[..params.indcpa_secret_key_bytes];
    let pk_pos = params.indcpa_secret_key_bytes;
    let pk = &sk[pk_pos..pk_pos + params.indcpa_public_key_bytes];
    let h_pk = &sk[params.secret_key_bytes - 2 * SYM_BYTES..params.secret_key_bytes - SYM_BYTES];
    let z = &sk[params.secret_key_bytes - SYM_BYTES..];

    let mut m_prime = indcpa_decrypt(params, ct, indcpa_sk);

    let (mut k_bar, mut coins_prime) = g(&[&m_prime, h_pk]);

    // re-encrypt with the derived randomness and compare in constant time
    let cmp = indcpa_encrypt(params, &m_prime, pk, &coins_prime);
    let fail = !ct.ct_eq(&cmp);

    // overwrite the pre-key with z on re-encryption failure
    for i in 0..SYM_BYTES {
        k_bar[i].conditional_assign(&z[i], fail);
    }

    let mut pre = [0u8; 2 * SYM_BYTES];
    pre[..SYM_BYTES].copy_from_slice(&k_bar);
    pre[SYM_BYTES..].copy_from_slice(&h(ct));
    let mut ss = vec![0u8; SS_BYTES];
    kdf(&mut ss, &pre);

    pre.zeroize();
    k_bar.zeroize();
    coins_prime.zeroize();
    m_prime.zeroize();
    Ok(ss)
}
