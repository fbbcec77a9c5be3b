//! `ascon-core`: the [ASCON](https://ascon.iaik.tugraz.at/) lightweight
//! permutation and the sponge constructions built directly on it — the
//! ASCON-XOF/XOFA extensible-output hash functions, the ASCON-80pq-SIV
//! AEAD, and (behind the `masked` feature) a 2- and 4-share masked
//! permutation for side-channel resistance.
//!
//! # Layout
//!
//! The crate is organized bottom-up: an unmasked permutation, an optional
//! masked alternative with the same functional contract, a sponge state
//! machine built on top of the permutation layer, and the hash/AEAD
//! constructions built on top of the sponge:
//!
//! - [`permutation`] — the unmasked 320-bit `p^12` permutation (`L0`).
//! - [`masked`] (feature `masked`) — the 2-/4-share masked permutation,
//!   same functional contract, different representation (`L0`).
//! - [`sponge`] — the rate/capacity absorb-squeeze state machine (`L1`).
//! - [`xof`] — ASCON-XOF / ASCON-XOFA (`L2`).
//! - [`siv`] — ASCON-80pq-SIV AEAD (`L2`).
//!
//! # `no_std`
//!
//! The crate is `no_std` by default when the `std` feature (on by
//! default) is disabled; without `std` only the buffer-passing incremental
//! APIs are available (no `Vec`-returning convenience wrappers).
//!
//! # Secret hygiene
//!
//! Every stateful type in this crate (`permutation::State`,
//! `masked::MaskedState`, `sponge::Sponge`) derives [`zeroize::Zeroize`] /
//! [`zeroize::ZeroizeOnDrop`], so scratch state is scrubbed on every exit
//! path, including panics.
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

#[cfg(feature = "std")]
extern crate std;

pub mod error;
#[cfg(feature = "masked")]
pub mod masked;
pub mod permutation;
pub mod siv;
pub mod sponge;
pub mod xof;

pub use error::{AeadError, XofError};
pub use permutation::State;
pub use siv::{decrypt as siv_decrypt, encrypt as siv_encrypt};
pub use xof::{xof, xofa, Xof, XofA, XofFixed};
