//! Key exchange constructions from the Kyber submission, built on the
//! CCA-secure KEM: a unilaterally authenticated exchange (UAKE, two
//! messages, authenticating Bob's static key) and a mutually authenticated
//! exchange (AKE, two messages, authenticating both static keys).
//!
//! Both flows are initiated by Alice. The final 32-byte session key is
//! SHAKE-256 over the concatenated KEM shared secrets; an honest run
//! yields the same key on both sides.
//!
//! ```rust
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! use kyber_kex::kex::{uake_init_a, uake_shared_a, uake_shared_b, KexParams};
//! use kyber_kex::try_keygen;
//!
//! let kx = KexParams::new(3)?;
//! let (pk_b, sk_b) = try_keygen(kx.kem())?; // Bob's static key
//!
//! let (send_a, tk, esk_a) = uake_init_a(&kx, &pk_b)?; // Alice
//! let (send_b, kb) = uake_shared_b(&kx, &send_a, &sk_b)?; // Bob
//! let ka = uake_shared_a(&kx, &send_b, &tk, &esk_a)?; // Alice
//!
//! assert_eq!(ka, kb);
//! # Ok(())}
//! ```

use crate::helpers::{ensure, kdf};
use crate::kem::{try_decaps, try_encaps_with_rng, try_keygen_with_rng};
use crate::params::Params;
use crate::SS_BYTES;
use alloc::vec;
use alloc::vec::Vec;
use rand_core::CryptoRngCore;
#[cfg(feature = "default-rng")]
use rand_core::OsRng;
use zeroize::Zeroize;


/// Parameter set for the key exchange flows: the underlying KEM parameters
/// plus the four derived message lengths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KexParams {
    kem: Params,
    uake_send_a_bytes: usize,
    uake_send_b_bytes: usize,
    ake_send_a_bytes: usize,
    ake_send_b_bytes: usize,
}

impl KexParams {
    /// Builds the key exchange parameters for module rank `k`.
    ///
    /// # Errors
    /// Returns an error for `k` outside `{2, 3, 4}`.
    pub fn new(k: usize) -> Result<Self, &'static str> {
        let kem = Params::new(k)?;
        Ok(KexParams {
            uake_send_a_bytes: kem.public_key_bytes + kem.ciphertext_bytes,
            uake_send_b_bytes: kem.ciphertext_bytes,
            ake_send_a_bytes: kem.public_key_bytes + kem.ciphertext_bytes,
            ake_send_b_bytes: 2 * kem.ciphertext_bytes,
            kem,
        })
    }

    /// The underlying KEM parameter set.
    #[must_use]
    pub fn kem(&self) -> &Params { &self.kem }

    /// Length of Alice's UAKE message (ephemeral public key + ciphertext).
    #[must_use]
    pub fn uake_send_a_bytes(&self) -> usize { self.uake_send_a_bytes }

    /// Length of Bob's UAKE reply (one ciphertext).
    #[must_use]
    pub fn uake_send_b_bytes(&self) -> usize { self.uake_send_b_bytes }

    /// Length of Alice's AKE message (ephemeral public key + ciphertext).
    #[must_use]
    pub fn ake_send_a_bytes(&self) -> usize { self.ake_send_a_bytes }

    /// Length of Bob's AKE reply (two ciphertexts).
    #[must_use]
    pub fn ake_send_b_bytes(&self) -> usize { self.ake_send_b_bytes }
}

/// Derives the session key as SHAKE-256 over the concatenated shares,
/// clearing the intermediate buffer.
fn kdf_shares(shares: &[&[u8]]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(shares.len() * SS_BYTES);
    for s in shares {
        buf.extend_from_slice(s);
    }
    let mut k = vec![0u8; SS_BYTES];
    kdf(&mut k, &buf);
    buf.zeroize();
    k
}

/// UAKE step 1 (Alice): generate an ephemeral key pair and encapsulate to
/// Bob's static public key. Returns the message for Bob (ephemeral public
/// key followed by the ciphertext), the intermediate shared secret `tk`,
/// and the ephemeral secret key, both needed for [`uake_shared_a`].
///
/// # Errors
/// Returns an error on a mis-sized `pk_b` or a failing rng.
pub fn uake_init_a_with_rng(
    kx: &KexParams, pk_b: &[u8], rng: &mut impl CryptoRngCore,
) -> Result<(Vec<u8>, Vec<u8>, Vec<u8>), &'static str> {
    ensure!(pk_b.len() == kx.kem.public_key_bytes, "uake init: pk length mismatch");

    let (pk_e, sk_e) = try_keygen_with_rng(&kx.kem, rng)?;
    let (ct, tk) = try_encaps_with_rng(&kx.kem, pk_b, rng)?;

    let mut send = Vec::with_capacity(kx.uake_send_a_bytes);
    send.extend_from_slice(&pk_e);
    send.extend_from_slice(&ct);
    Ok((send, tk, sk_e))
}

/// UAKE step 2 (Bob): encapsulate to Alice's ephemeral key, decapsulate
/// the ciphertext addressed to the static key, and derive the session key
/// `KDF(ss_e || ss_b)`. Returns the reply ciphertext and the session key.
///
/// # Errors
/// Returns an error on mis-sized inputs or a failing rng.
pub fn uake_shared_b_with_rng(
    kx: &KexParams, recv: &[u8], sk_b: &[u8], rng: &mut impl CryptoRngCore,
) -> Result<(Vec<u8>, Vec<u8>), &'static str> {
    ensure!(recv.len() == kx.uake_send_a_bytes, "uake shared b: recv length mismatch");
    ensure!(sk_b.len() == kx.kem.secret_key_bytes, "uake shared b: sk length mismatch");

    let pk_e = &recv[..kx.kem.public_key_bytes];
    let ct_b = &recv[kx.kem.public_key_bytes..];

    let (send, mut ss_e) = try_encaps_with_rng(&kx.kem, pk_e, rng)?;
    let mut ss_b = try_decaps(&kx.kem, ct_b, sk_b)?;

    let k = kdf_shares(&[&ss_e, &ss_b]);
    ss_e.zeroize();
    ss_b.zeroize();
    Ok((send, k))
}

/// UAKE step 3 (Alice): decapsulate Bob's reply with the ephemeral secret
/// key and derive the session key `KDF(ss_e || tk)`.
///
/// # Errors
/// Returns an error on mis-sized inputs.
pub fn uake_shared_a(
    kx: &KexParams, recv: &[u8], tk: &[u8], sk_e: &[u8],
) -> Result<Vec<u8>, &'static str> {
    ensure!(recv.len() == kx.uake_send_b_bytes, "uake shared a: recv length mismatch");
    ensure!(tk.len() == SS_BYTES, "uake shared a: tk length mismatch");

    let mut ss_e = try_decaps(&kx.kem, recv, sk_e)?;
    let k = kdf_shares(&[&ss_e, tk]);
    ss_e.zeroize();
    Ok(k)
}

/// AKE step 1 (Alice): identical flow to [`uake_init_a_with_rng`]; the
/// message is sized from the AKE definition.
///
/// # Errors
/// Returns an error on a mis-sized `pk_b` or a failing rng.
pub fn ake_init_a_with_rng(
    kx: &KexParams, pk_b: &[u8], rng: &mut impl CryptoRngCore,
) -> Result<(Vec<u8>, Vec<u8>, Vec<u8>), &'static str> {
    ensure!(pk_b.len() == kx.kem.public_key_bytes, "ake init: pk length mismatch");

    let (pk_e, sk_e) = try_keygen_with_rng(&kx.kem, rng)?;
    let (ct, tk) = try_encaps_with_rng(&kx.kem, pk_b, rng)?;

    let mut send = Vec::with_capacity(kx.ake_send_a_bytes);
    send.extend_from_slice(&pk_e);
    send.extend_from_slice(&ct);
    Ok((send, tk, sk_e))
}

/// AKE step 2 (Bob): encapsulate to both Alice's ephemeral key and her
/// static key, decapsulate the ciphertext addressed to Bob's static key,
/// and derive `KDF(ss_e || ss_a || ss_b)`. Returns the two-ciphertext
/// reply and the session key.
///
/// # Errors
/// Returns an error on mis-sized inputs or a failing rng.
pub fn ake_shared_b_with_rng(
    kx: &KexParams, recv: &[u8], sk_b: &[u8], pk_a: &[u8], rng: &mut impl CryptoRngCore,
) -> Result<(Vec<u8>, Vec<u8>), &'static str> {
    ensure!(recv.len() == kx.ake_send_a_bytes, "ake shared b: recv length mismatch");
    ensure!(sk_b.len() == kx.kem.secret_key_bytes, "ake shared b: sk length mismatch");
    ensure!(pk_a.len() == kx.kem.public_key_bytes, "ake shared b: pk length mismatch");

    let pk_e = &recv[..kx.kem.public_key_bytes];
    let ct_b = &recv[kx.kem.public_key_bytes..];

    let (ct_e, mut ss_e) = try_encaps_with_rng(&kx.kem, pk_e, rng)?;
    let (ct_a, mut ss_a) = try_encaps_with_rng(&kx.kem, pk_a, rng)?;
    let mut ss_b = try_decaps(&kx.kem, ct_b, sk_b)?;

    let mut send = Vec::with_capacity(kx.ake_send_b_bytes);
    send.extend_from_slice(&ct_e);
    send.extend_from_slice(&ct_a);

    let k = kdf_shares(&[&ss_e, &ss_a, &ss_b]);
    ss_e.zeroize();
    ss_a.zeroize();
    ss_b.zeroize();
    Ok((send, k))
}

/// AKE step 3 (Alice): decapsulate both reply ciphertexts (ephemeral and
/// static) and derive `KDF(ss_e || ss_a || tk)`.
///
/// # Errors
/// Returns an error on mis-sized inputs.
pub fn ake_shared_a(
    kx: &KexParams, recv: &[u8], tk: &[u8], sk_e: &[u8], sk_a: &[u8],
) -> Result<Vec<u8>, &'static str> {
    ensure!(recv.len() == kx.ake_send_b_bytes, "ake shared a: recv length mismatch");
    ensure!(tk.len() == SS_BYTES, "ake shared a: tk length mismatch");

    let ct_e = &recv[..kx.kem.ciphertext_bytes];
    let ct_a = &recv[kx.kem.ciphertext_bytes..];

    let mut ss_e = try_decaps(&kx.kem, ct_e, sk_e)?;
    let mut ss_a = try_decaps(&kx.kem, ct_a, sk_a)?;

    let k = kdf_shares(&[&ss_e, &ss_a, tk]);
    ss_e.zeroize();
    ss_a.zeroize();
    Ok(k)
}

/// [`uake_init_a_with_rng`] backed by the OS random number generator.
///
/// # Errors
/// Returns an error on a mis-sized `pk_b` or a failing rng.
#[cfg(feature = "default-rng")]
pub fn uake_init_a(kx: &KexParams, pk_b: &[u8]) -> Result<(Vec<u8>, Vec<u8>, Vec<u8>), &'static str> {
    uake_init_a_with_rng(kx, pk_b, &mut OsRng)
}

/// [`uake_shared_b_with_rng`] backed by the OS random number generator.
///
/// # Errors
/// Returns an error on mis-sized inputs or a failing rng.
#[cfg(feature = "default-rng")]
pub fn uake_shared_b(
    kx: &KexParams, recv: &[u8], sk_b: &[u8],
) -> Result<(Vec<u8>, Vec<u8>), &'static str> {
    uake_shared_b_with_rng(kx, recv, sk_b, &mut OsRng)
}

/// [`ake_init_a_with_rng`] backed by the OS random number generator.
///
/// # Errors
/// Returns an error on a mis-sized `pk_b` or a failing rng.
#[cfg(feature = "default-rng")]
pub fn ake_init_a(kx: &KexParams, pk_b: &[u8]) -> Result<(Vec<u8>, Vec<u8>, Vec<u8>), &'static str> {
    ake_init_a_with_rng(kx, pk_b, &mut OsRng)
}

/// [`ake_shared_b_with_rng`] backed by the OS random number generator.
///
/// # Errors
/// Returns an error on mis-sized inputs or a failing rng.
#[cfg(feature = "default-rng")]
pub fn ake_shared_b(
    kx: &KexParams, recv: &[u8], sk_b: &[u8], pk_a: &[u8],
) -> Result<(Vec<u8>, Vec<u8>), &'static str> {
    ake_shared_b_with_rng(kx, recv, sk_b, pk_a, &mut OsRng)
}


#[cfg(test)]
mod tests {
    use super::{
        ake_init_a_with_rng, ake_shared_a, ake_shared_b_with_rng, uake_init_a_with_rng,
        uake_shared_a, uake_shared_b_with_rng, KexParams,
    };
    use crate::kem::try_keygen_with_rng;
    use rand_core::SeedableRng;

    #[test]
    fn test_uake_honest_run() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        for k in [2usize, 3, 4] {
            let kx = KexParams::new(k).unwrap();
            let (pk_b, sk_b) = try_keygen_with_rng(kx.kem(), &mut rng).unwrap();

            let (send_a, tk, esk_a) = uake_init_a_with_rng(&kx, &pk_b, &mut rng).unwrap();
            assert_eq!(send_a.len(), kx.uake_send_a_bytes());
            let (send_b, kb) = uake_shared_b_with_rng(&kx, &send_a, &sk_b, &mut rng).unwrap();
            assert_eq!(send_b.len(), kx.uake_send_b_bytes());
            let ka = uake_shared_a(&kx, &send_b, &tk, &esk_a).unwrap();

            assert_eq!(ka, kb);
            assert_ne!(ka, alloc::vec![0u8; 32]);
        }
    }

    #[test]
    fn test_ake_honest_run() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(456);
        for k in [2usize, 3, 4] {
            let kx = KexParams::new(k).unwrap();
            let (pk_b, sk_b) = try_keygen_with_rng(kx.kem(), &mut rng).unwrap();
            let (pk_a, sk_a) = try_keygen_with_rng(kx.kem(), &mut rng).unwrap();

            let (send_a, tk, esk_a) = ake_init_a_with_rng(&kx, &pk_b, &mut rng).unwrap();
            assert_eq!(send_a.len(), kx.ake_send_a_bytes());
            let (send_b, kb) = ake_shared_b_with_rng(&kx, &send_a, &sk_b, &pk_a, &mut rng).unwrap();
            assert_eq!(send_b.len(), kx.ake_send_b_bytes());
            let ka = ake_shared_a(&kx, &send_b, &tk, &esk_a, &sk_a).unwrap();

            assert_eq!(ka, kb);
            assert_ne!(ka, alloc::vec![0u8; 32]);
        }
    }
}
