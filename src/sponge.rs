//! L1: the sponge absorb/squeeze state machine built on top of
//! [`crate::permutation::State`].
//!
//! This is ASCON's own sponge mode: XOR-absorption into the rate rather
//! than overwrite mode, and a `first_round` parameter selecting `p^12` vs
//! `p^6` between blocks.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::permutation::State;

/// Bytes of rate shared by every construction built on this sponge
/// (XOF/XOFA and ASCON-80pq-SIV alike).
pub const RATE: usize = 8;

/// Bytes of capacity (320-bit state minus the 8-byte rate).
pub const CAPACITY: usize = 320 / 8 - RATE;

/// Whether the sponge is still accepting input or has begun producing
/// output. Once `Squeeze`, never returns to `Absorb`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Mode {
    Absorb,
    Squeeze,
}

/// The incremental absorb/squeeze sponge state machine.
///
/// `first_round` is fixed for the lifetime of the sponge: `0` gives the
/// full `p^12` between blocks (ASCON-XOF), `6` gives `p^6` (ASCON-XOFA and
/// the SIV AEAD's AD/message absorption).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Sponge {
    state: State,
    #[zeroize(skip)]
    count: usize,
    #[zeroize(skip)]
    mode: Mode,
    #[zeroize(skip)]
    first_round: usize,
}

impl Sponge {
    /// Wrap an already-initialized permutation state into a fresh sponge,
    /// in absorb mode, zero count.
    pub(crate) fn from_state(state: State, first_round: usize) -> Self {
        Self {
            state,
            count: 0,
            mode: Mode::Absorb,
            first_round,
        }
    }

    /// Borrow the underlying permutation state.
    pub(crate) fn state(&self) -> &State {
        &self.state
    }

    /// Mutably borrow the underlying permutation state.
    pub(crate) fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Absorb `data` of arbitrary length, XORing it into the rate 8 bytes
    /// at a time and permuting between full blocks. Does not pad; the
    /// trailing partial block (if any) is left pending until [`Self::pad`],
    /// [`Self::squeeze`], or [`Self::clear_rate`] finalizes it.
    ///
    /// # Panics
    ///
    /// Debug builds assert the sponge has not already transitioned to
    /// squeeze mode (absorb-after-squeeze is caller misuse).
    pub fn absorb(&mut self, mut data: &[u8]) {
        debug_assert_eq!(self.mode, Mode::Absorb, "absorb called after squeeze");
        while !data.is_empty() {
            if self.count == RATE {
                self.state.permute(self.first_round);
                self.count = 0;
            }
            let n = data.len().min(RATE - self.count);
            xor_into_x0_at(&mut self.state, self.count, &data[..n]);
            self.count += n;
            data = &data[n..];
        }
    }

    /// Squeeze `out.len()` bytes of output, transitioning to squeeze mode
    /// (padding the pending partial block, if any) on the first call.
    pub fn squeeze(&mut self, mut out: &mut [u8]) {
        if out.is_empty() {
            return;
        }
        if self.mode == Mode::Absorb {
            self.transition_to_squeeze();
        }
        loop {
            if self.count == RATE {
                self.state.permute(self.first_round);
                self.count = 0;
            }
            let n = out.len().min(RATE - self.count);
            let block = read_x0_rate(&self.state);
            out[..n].copy_from_slice(&block[self.count..self.count + n]);
            self.count += n;
            out = &mut out[n..];
            if out.is_empty() {
                return;
            }
        }
    }

    /// The mode-transition operation: unconditionally XOR the 0x80 padding
    /// byte at the current absorb position, permute once, and move to
    /// squeeze mode with a full rate block available.
    fn transition_to_squeeze(&mut self) {
        self.finalize_absorb_block();
        self.mode = Mode::Squeeze;
        self.count = 0;
    }

    /// Unconditionally XOR the 0x80 padding byte at the current absorb
    /// position and permute, without changing `mode`. This is the
    /// finalization step the SIV AEAD applies to its AD and message
    /// absorption phases: unlike the generic [`Self::pad`], it always
    /// runs, even on an exact rate-boundary (an empty trailing block still
    /// gets padded and permuted), matching the standard SpongeWrap
    /// finalization used by ASCON's own reference associated-data
    /// processing.
    pub(crate) fn finalize_absorb_block(&mut self) {
        debug_assert_eq!(self.mode, Mode::Absorb);
        // `absorb` leaves a just-completed full block unflushed (its permute
        // happens at the top of the *next* absorb/squeeze call); flush it
        // here first so the padding byte below always lands inside a block
        // with room for it.
        if self.count == RATE {
            self.state.permute(self.first_round);
            self.count = 0;
        }
        xor_into_x0_at(&mut self.state, self.count, &[0x80]);
        self.state.permute(self.first_round);
        self.count = 0;
    }

    /// The generic Pad operation: a no-op if nothing is pending
    /// (`count == 0`), otherwise identical to
    /// [`Self::transition_to_squeeze`]'s padding step but without flipping
    /// the mode — used standalone by [`Self::clear_rate`].
    pub fn pad(&mut self) {
        if self.count == RATE {
            self.state.permute(self.first_round);
            self.count = 0;
        }
        if self.count > 0 {
            xor_into_x0_at(&mut self.state, self.count, &[0x80]);
            self.state.permute(self.first_round);
            self.count = 0;
        }
    }

    /// Destroy backtracking information: pad, zero the rate, permute.
    /// Used by constructions (e.g. a sponge-based PRNG) that need forward
    /// secrecy for previously squeezed output.
    pub fn clear_rate(&mut self) {
        self.pad();
        self.state.words_mut()[0] = 0;
        self.state.permute(self.first_round);
    }

    /// Produce an independent clone of this sponge.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }
}

/// XOR `data` (at most [`RATE`] bytes) into the big-endian serialization of
/// `X0`, starting at byte `offset`.
fn xor_into_x0_at(state: &mut State, offset: usize, data: &[u8]) {
    debug_assert!(offset + data.len() <= RATE);
    let x0 = &mut state.words_mut()[0];
    for (i, &byte) in data.iter().enumerate() {
        let shift = (RATE - 1 - (offset + i)) * 8;
        *x0 ^= u64::from(byte) << shift;
    }
}

/// Read the big-endian serialization of `X0`'s rate bytes.
fn read_x0_rate(state: &State) -> [u8; RATE] {
    state.words()[0].to_be_bytes()
}
