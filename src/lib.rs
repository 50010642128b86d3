#![no_std]
#![deny(clippy::pedantic)]
#![deny(warnings)]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

extern crate alloc;

// Implements the CRYSTALS-Kyber (round 3) key encapsulation mechanism and
// the UAKE/AKE key exchange constructions from the Kyber submission.
//
// Functionality map per the round-3 reference implementation
//
// montgomery_reduce / barrett_reduce          --> reduce.rs
// zetas, ntt, invntt, basemul                 --> ntt.rs
// H, G, PRF, KDF, XOF wrappers                --> helpers.rs
// cbd2, cbd3, rej_uniform                     --> sampling.rs
// poly arithmetic, (de)serialization,
//   compression, message conversion, noise    --> poly.rs
// polyvec arithmetic and compression          --> polyvec.rs
// gen_matrix, indcpa keypair/encrypt/decrypt  --> indcpa.rs
// crypto_kem keypair/enc/dec (FO transform)   --> kem.rs
// UAKE and AKE flows                          --> kex.rs

mod helpers;
mod indcpa;
mod kem;
mod ntt;
mod params;
mod poly;
mod polyvec;
mod reduce;
mod sampling;

/// The UAKE and AKE key exchange constructions layered on the KEM.
pub mod kex;

pub use crate::kem::{
    encaps_from_seed, try_decaps, try_encaps_with_rng, try_keygen_with_recovery,
    try_keygen_with_rng,
};
#[cfg(feature = "default-rng")]
pub use crate::kem::{try_encaps, try_keygen};
pub use crate::params::Params;

// Relevant to all parameter sets
pub(crate) const N: usize = 256;
pub(crate) const Q: i16 = 3329;
pub(crate) const SYM_BYTES: usize = 32;
pub(crate) const POLY_BYTES: usize = 384;
pub(crate) const MSG_BYTES: usize = N / 8;
pub(crate) const ETA2: usize = 2;
pub(crate) const SHAKE128_RATE: usize = 168;

/// Shared-secret length for all parameter sets (in bytes).
pub const SS_BYTES: usize = 32;
