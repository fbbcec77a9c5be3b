//! The 320-bit ASCON permutation (p^12 with a variable start round).
//!
//! This is layer L0: a total function over a fixed-width state, with no
//! notion of rate/capacity or absorbed data. [`crate::sponge`] builds the
//! sponge construction on top of it.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// The five 64-bit words of the ASCON permutation state, in `X0..X4` order.
///
/// The "regular" serialization ([`State::to_regular`] / [`State::from_regular`])
/// is big-endian per word, matching the ASCON reference specification
/// byte-for-byte; internally the words are plain `u64`s and every operation
/// (round constant addition, S-box, rotations) is defined directly over
/// them, since the permutation's bit-level behaviour does not depend on how
/// the word is eventually serialized to bytes.
#[derive(Clone, PartialEq, Eq, Default, Zeroize, ZeroizeOnDrop)]
pub struct State(pub(crate) [u64; 5]);

/// The 12 round constants of the ASCON permutation, low byte only (upper
/// bits are zero), applied to `X2` in round order.
pub(crate) const ROUND_CONSTANTS: [u64; 12] = [
    0xf0, 0xe1, 0xd2, 0xc3, 0xb4, 0xa5, 0x96, 0x87, 0x78, 0x69, 0x5a, 0x4b,
];

/// Total number of rounds in the full permutation.
pub const ROUNDS: usize = 12;

impl State {
    /// The all-zero state.
    #[must_use]
    pub fn zero() -> Self {
        Self([0; 5])
    }

    /// Build a state directly from its five words, in `X0..X4` order.
    #[must_use]
    pub fn from_words(words: [u64; 5]) -> Self {
        Self(words)
    }

    /// The five words of the state, in `X0..X4` order.
    #[must_use]
    pub fn words(&self) -> &[u64; 5] {
        &self.0
    }

    /// Mutable access to the five words of the state, in `X0..X4` order.
    pub fn words_mut(&mut self) -> &mut [u64; 5] {
        &mut self.0
    }

    /// Deserialize a state from its 40-byte regular (big-endian per word)
    /// serialization.
    #[must_use]
    pub fn from_regular(bytes: &[u8; 40]) -> Self {
        let mut words = [0u64; 5];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(8)) {
            *word = u64::from_be_bytes(chunk.try_into().expect("8-byte chunk"));
        }
        Self(words)
    }

    /// Serialize the state to its 40-byte regular (big-endian per word)
    /// serialization.
    #[must_use]
    pub fn to_regular(&self) -> [u8; 40] {
        let mut out = [0u8; 40];
        for (chunk, word) in out.chunks_exact_mut(8).zip(self.0.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        out
    }

    /// Apply one round of the permutation, with round constant `rc`.
    #[inline]
    fn round(&mut self, rc: u64) {
        let [x0, x1, x2, x3, x4] = &mut self.0;

        // round constant addition
        *x2 ^= rc;

        // substitution layer (5-bit chi-like S-box)
        *x0 ^= *x4;
        *x4 ^= *x3;
        *x2 ^= *x1;

        let t0 = !*x0 & *x1;
        let t1 = !*x1 & *x2;
        let t2 = !*x2 & *x3;
        let t3 = !*x3 & *x4;
        let t4 = !*x4 & *x0;

        *x0 ^= t1;
        *x1 ^= t2;
        *x2 ^= t3;
        *x3 ^= t4;
        *x4 ^= t0;

        *x1 ^= *x0;
        *x0 ^= *x4;
        *x3 ^= *x2;
        *x2 = !*x2;

        // linear diffusion layer
        *x0 ^= x0.rotate_right(19) ^ x0.rotate_right(28);
        *x1 ^= x1.rotate_right(61) ^ x1.rotate_right(39);
        *x2 ^= x2.rotate_right(1) ^ x2.rotate_right(6);
        *x3 ^= x3.rotate_right(10) ^ x3.rotate_right(17);
        *x4 ^= x4.rotate_right(7) ^ x4.rotate_right(41);
    }

    /// Apply the permutation starting at round `first_round`, running
    /// through round 11 inclusive.
    ///
    /// `first_round == 0` is the full `p^12`; `first_round == 6` is `p^6`
    /// (the inter-block permutation used by the sponge in both the XOF and
    /// the SIV AEAD).
    ///
    /// # Panics
    ///
    /// Debug builds assert `first_round <= ROUNDS`; this is a caller-misuse
    /// invariant per the error-handling design, not a recoverable error.
    pub fn permute(&mut self, first_round: usize) {
        debug_assert!(first_round <= ROUNDS, "first_round out of range");
        for &rc in &ROUND_CONSTANTS[first_round.min(ROUNDS)..] {
            self.round(rc);
        }
    }
}
