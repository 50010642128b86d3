use crate::helpers::ensure;
use crate::{POLY_BYTES, SS_BYTES, SYM_BYTES};

/// Parameter set for one Kyber security level, selected by the module rank
/// `k ∈ {2, 3, 4}` (Kyber-512, Kyber-768 and Kyber-1024 respectively).
///
/// Every byte length used by the KEM and KEX APIs is derived from `k` at
/// construction time; the struct is a plain value and can be freely copied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Params {
    pub(crate) k: usize,
    pub(crate) eta1: usize,
    pub(crate) poly_compressed_bytes: usize,
    pub(crate) polyvec_compressed_bytes: usize,
    pub(crate) polyvec_bytes: usize,
    pub(crate) indcpa_public_key_bytes: usize,
    pub(crate) indcpa_secret_key_bytes: usize,
    pub(crate) indcpa_bytes: usize,
    pub(crate) public_key_bytes: usize,
    pub(crate) secret_key_bytes: usize,
    pub(crate) ciphertext_bytes: usize,
}

impl Params {
    /// Builds the parameter set for module rank `k`.
    ///
    /// # Errors
    /// Returns an error for `k` outside `{2, 3, 4}`.
    pub fn new(k: usize) -> Result<Self, &'static str> {
        ensure!((k == 2) | (k == 3) | (k == 4), "Params: k must be 2, 3 or 4");
        let eta1 = if k == 2 { 3 } else { 2 };
        let (poly_compressed_bytes, polyvec_compressed_bytes) =
            if k == 4 { (160, 352 * k) } else { (128, 320 * k) };
        let polyvec_bytes = k * POLY_BYTES;
        let indcpa_public_key_bytes = polyvec_bytes + SYM_BYTES;
        let indcpa_secret_key_bytes = polyvec_bytes;
        let indcpa_bytes = polyvec_compressed_bytes + poly_compressed_bytes;
        Ok(Params {
            k,
            eta1,
            poly_compressed_bytes,
            polyvec_compressed_bytes,
            polyvec_bytes,
            indcpa_public_key_bytes,
            indcpa_secret_key_bytes,
            indcpa_bytes,
            public_key_bytes: indcpa_public_key_bytes,
            // indcpa sk, then a full copy of pk, then H(pk) and z
            secret_key_bytes: indcpa_secret_key_bytes + indcpa_public_key_bytes + 2 * SYM_BYTES,
            ciphertext_bytes: indcpa_bytes,
        })
    }

    /// Parameters for Kyber-512 (k = 2, NIST security category 1).
    #[must_use]
    pub fn kyber512() -> Self { Self::new(2).expect("k = 2 is tabulated") }

    /// Parameters for Kyber-768 (k = 3, NIST security category 3).
    #[must_use]
    pub fn kyber768() -> Self { Self::new(3).expect("k = 3 is tabulated") }

    /// Parameters for Kyber-1024 (k = 4, NIST security category 5).
    #[must_use]
    pub fn kyber1024() -> Self { Self::new(4).expect("k = 4 is tabulated") }

    /// Module rank of this parameter set.
    #[must_use]
    pub fn k(&self) -> usize { self.k }

    /// Serialized public (encapsulation) key length in bytes.
    #[must_use]
    pub fn public_key_bytes(&self) -> usize { self.public_key_bytes }

    /// Serialized secret (decapsulation) key length in bytes.
    #[must_use]
    pub fn secret_key_bytes(&self) -> usize { self.secret_key_bytes }

    /// Ciphertext length in bytes.
    #[must_use]
    pub fn ciphertext_bytes(&self) -> usize { self.ciphertext_bytes }

    /// Shared-secret length in bytes (32 for every parameter set).
    #[must_use]
    pub fn shared_secret_bytes(&self) -> usize { SS_BYTES }
}


#[cfg(test)]
mod tests {
    use super::Params;

    #[test]
    fn test_tabulated_lengths() {
        let p = Params::kyber512();
        assert_eq!((p.public_key_bytes, p.secret_key_bytes, p.ciphertext_bytes), (800, 1632, 768));
        assert_eq!((p.eta1, p.poly_compressed_bytes, p.polyvec_compressed_bytes), (3, 128, 640));

        let p = Params::kyber768();
        assert_eq!(
            (p.public_key_bytes, p.secret_key_bytes, p.ciphertext_bytes),
            (1184, 2400, 1088)
        );
        assert_eq!((p.eta1, p.poly_compressed_bytes, p.polyvec_compressed_bytes), (2, 128, 960));

        let p = Params::kyber1024();
        assert_eq!(
            (p.public_key_bytes, p.secret_key_bytes, p.ciphertext_bytes),
            (1568, 3168, 1568)
        );
        assert_eq!((p.eta1, p.poly_compressed_bytes, p.polyvec_compressed_bytes), (2, 160, 1408));
    }

    #[test]
    fn test_rejects_unsupported_rank() {
        assert!(Params::new(1).is_err());
        assert!(Params::new(5).is_err());
        assert!(Params::new(0).is_err());
    }
}
