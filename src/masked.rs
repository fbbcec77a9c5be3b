//! L0: a side-channel-hardened variant of [`crate::permutation::State`] that
//! never materializes a secret-dependent word, only its `N`-way XOR-shared
//! representation.
//!
//! The non-linear step of each round (the `(!y) & z` terms of the S-box) is
//! rewritten as an `N×N` cross-share expansion rather than unmasking and
//! re-masking; everything linear (XOR, NOT, rotation, round-constant
//! addition) is simply applied share-wise, since those operations commute
//! with an XOR split. `N = 4` is the concrete, recommended instantiation;
//! `N = 2` is supported as an analogous lower-order backend with the same
//! cross-share expansion generalized down. Both are expressed here as one
//! generic `MaskedState<N>` so the cross-share table is written once.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::permutation::{State, ROUND_CONSTANTS, ROUNDS};

/// Number of 32-bit entropy words the caller must supply per
/// [`MaskedState4::permute`] call (24 bytes).
pub const ENTROPY_WORDS: usize = 6;

/// The caller-owned randomness buffer consumed (and refreshed in place) by
/// a masked permutation call.
pub type EntropyBuf = [u32; ENTROPY_WORDS];

/// Fixed rotation amounts the entropy pool cycles its words through
/// between draws, one per share channel, so repeated draws never reuse a
/// word verbatim.
const CHANNEL_ROTATIONS: [u32; 3] = [7, 13, 29];

/// A cursor over the caller's [`EntropyBuf`] that hands out fresh-looking
/// 64-bit masks and writes the consumed word back rotated, so repeated
/// draws within one permutation call (and across calls, once the caller
/// reuses the buffer as its own new entropy seed) never repeat verbatim.
struct EntropyPool<'a> {
    words: &'a mut EntropyBuf,
    cursor: usize,
}

impl<'a> EntropyPool<'a> {
    fn new(words: &'a mut EntropyBuf) -> Self {
        Self { words, cursor: 0 }
    }

    /// Draw a 64-bit mask, duplicated across both halves of the word (a
    /// single 32-bit draw already covers one 64-bit share-word once
    /// interleaved into a bit-sliced even/odd representation), and rotate
    /// the consumed entropy word in place.
    fn next_u64(&mut self) -> u64 {
        let i = self.cursor % ENTROPY_WORDS;
        let rot = CHANNEL_ROTATIONS[i % CHANNEL_ROTATIONS.len()];
        let refreshed = self.words[i].rotate_left(rot);
        self.words[i] = refreshed;
        self.cursor += 1;
        (u64::from(refreshed) << 32) | u64::from(refreshed)
    }
}

/// An `N`-way XOR split of one 64-bit word: `unshare(shares) == word`.
type Shares<const N: usize> = [u64; N];

fn unshare<const N: usize>(shares: &Shares<N>) -> u64 {
    shares.iter().fold(0, |acc, &s| acc ^ s)
}

/// Produce a fresh `N`-share representation of `word`, drawing `N-1` masks
/// from `entropy` and completing the XOR with the last share.
fn reshare<const N: usize>(word: u64, entropy: &mut EntropyPool) -> Shares<N> {
    let mut shares = [0u64; N];
    let mut acc = 0u64;
    for share in shares.iter_mut().take(N - 1) {
        let r = entropy.next_u64();
        *share = r;
        acc ^= r;
    }
    shares[N - 1] = word ^ acc;
    shares
}

/// `NOT` is affine over XOR (`!(a^b) == !a^b`), so negating a shared value
/// only requires complementing a single share.
fn not_shared<const N: usize>(shares: Shares<N>) -> Shares<N> {
    let mut out = shares;
    out[0] = !out[0];
    out
}

/// The masked non-linear AND gadget (Ishai-Sahai-Wagner, 2003): computes
/// `N` shares of `a & b` from the `N` shares of `a` and `b`, consuming one
/// fresh mask per unordered share pair (`N*(N-1)/2` draws — 6 for `N=4`
/// (matching [`ENTROPY_WORDS`]'s 24-byte buffer), 1 for `N=2`).
///
/// This is an algebraic identity: `unshare(masked_and(a, b)) == unshare(a)
/// & unshare(b)` for *any* values drawn from `entropy`, not only uniform
/// ones, so a degenerate entropy source cannot break functional
/// correctness — only the statistical-independence half of the masking
/// contract depends on `entropy` being fresh.
fn masked_and<const N: usize>(a: Shares<N>, b: Shares<N>, entropy: &mut EntropyPool) -> Shares<N> {
    let mut c = [0u64; N];
    for i in 0..N {
        c[i] = a[i] & b[i];
    }
    for i in 0..N {
        for j in (i + 1)..N {
            let r = entropy.next_u64();
            c[i] ^= r;
            c[j] ^= r ^ (a[i] & b[j]) ^ (a[j] & b[i]);
        }
    }
    c
}

/// Re-randomize a shared word's representation without changing its
/// unshared value: fold a fresh mask into one share and its complement
/// into another. Applied to `X4` at the end of each round's S-box.
fn refresh<const N: usize>(shares: &mut Shares<N>, entropy: &mut EntropyPool) {
    if N < 2 {
        return;
    }
    let mask = entropy.next_u64();
    shares[0] ^= mask;
    shares[N - 1] ^= mask;
}

/// The 320-bit ASCON permutation state as five `N`-way shared words.
///
/// `unshare`d, this is bit-for-bit [`State`]; no operation on this type
/// ever computes an unshared intermediate.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MaskedState<const N: usize> {
    words: [Shares<N>; 5],
}

/// The recommended 4-share masked permutation.
pub type MaskedState4 = MaskedState<4>;
/// The 2-share masked permutation: the same cross-share expansion,
/// narrowed to 2x2.
pub type MaskedState2 = MaskedState<2>;

impl<const N: usize> MaskedState<N> {
    /// Split an unmasked [`State`] into a fresh `N`-share representation,
    /// consuming entropy for every word but the last share of each.
    #[must_use]
    pub fn from_state(state: &State, entropy: &mut EntropyBuf) -> Self {
        let mut pool = EntropyPool::new(entropy);
        let mut words = [[0u64; N]; 5];
        for (shares, &word) in words.iter_mut().zip(state.words().iter()) {
            *shares = reshare(word, &mut pool);
        }
        Self { words }
    }

    /// Recombine the shares back into the logical [`State`].
    #[must_use]
    pub fn unshare(&self) -> State {
        let mut out = [0u64; 5];
        for (word, shares) in out.iter_mut().zip(self.words.iter()) {
            *word = unshare(shares);
        }
        State::from_words(out)
    }

    /// Re-randomize every word's share representation in place without
    /// changing the unshared state.
    pub fn reshare_all(&mut self, entropy: &mut EntropyBuf) {
        let mut pool = EntropyPool::new(entropy);
        for shares in &mut self.words {
            refresh(shares, &mut pool);
        }
    }

    fn round(&mut self, rc: u64, entropy: &mut EntropyPool) {
        let [x0, x1, x2, x3, x4] = &mut self.words;

        // Round constant addition is a public, linear XOR: folding it into
        // a single share preserves the unshared value exactly.
        x2[0] ^= rc;

        // Substitution layer, generalized share-wise from the unmasked
        // formulation in crate::permutation::State::round.
        for k in 0..N {
            x0[k] ^= x4[k];
            x4[k] ^= x3[k];
            x2[k] ^= x1[k];
        }

        let t = *x0;
        let x1_old = *x1;

        let and1 = masked_and(not_shared(*x1), *x2, entropy);
        for k in 0..N {
            x0[k] ^= and1[k];
        }
        let and2 = masked_and(not_shared(*x2), *x3, entropy);
        for k in 0..N {
            x1[k] ^= and2[k];
        }
        let and3 = masked_and(not_shared(*x3), *x4, entropy);
        for k in 0..N {
            x2[k] ^= and3[k];
        }
        let and4 = masked_and(not_shared(*x4), t, entropy);
        for k in 0..N {
            x3[k] ^= and4[k];
        }
        let and5 = masked_and(not_shared(t), x1_old, entropy);
        for k in 0..N {
            x4[k] ^= and5[k];
        }

        for k in 0..N {
            x1[k] ^= x0[k];
            x0[k] ^= x4[k];
            x3[k] ^= x2[k];
        }
        *x2 = not_shared(*x2);

        refresh(x4, entropy);

        // Linear diffusion, applied independently per share: rotation and
        // XOR both commute with the XOR split, so no cross-share term is
        // needed here, unlike the S-box.
        for k in 0..N {
            x0[k] ^= x0[k].rotate_right(19) ^ x0[k].rotate_right(28);
            x1[k] ^= x1[k].rotate_right(61) ^ x1[k].rotate_right(39);
            x2[k] ^= x2[k].rotate_right(1) ^ x2[k].rotate_right(6);
            x3[k] ^= x3[k].rotate_right(10) ^ x3[k].rotate_right(17);
            x4[k] ^= x4[k].rotate_right(7) ^ x4[k].rotate_right(41);
        }
    }

    /// Apply the masked permutation from `first_round` through round 11,
    /// consuming and refreshing the caller-owned `entropy` buffer.
    ///
    /// # Panics
    ///
    /// Debug builds assert `first_round <= ROUNDS`, mirroring
    /// [`State::permute`].
    pub fn permute(&mut self, first_round: usize, entropy: &mut EntropyBuf) {
        debug_assert!(first_round <= ROUNDS, "first_round out of range");
        #[cfg(feature = "tracing")]
        tracing::debug!(first_round, shares = N, "masked permute");
        let mut pool = EntropyPool::new(entropy);
        for &rc in &ROUND_CONSTANTS[first_round.min(ROUNDS)..] {
            self.round(rc, &mut pool);
        }
    }
}

/// Free-function form of [`MaskedState4::permute`].
pub fn permute_masked_4(state: &mut MaskedState4, first_round: usize, entropy: &mut EntropyBuf) {
    state.permute(first_round, entropy);
}

/// Free-function form of [`MaskedState2::permute`]; see `DESIGN.md` for why
/// the 2-share backend is included alongside the recommended 4-share one.
pub fn permute_masked_2(state: &mut MaskedState2, first_round: usize, entropy: &mut EntropyBuf) {
    state.permute(first_round, entropy);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entropy(seed: u32) -> EntropyBuf {
        let mut e = [0u32; ENTROPY_WORDS];
        for (i, w) in e.iter_mut().enumerate() {
            *w = seed.wrapping_mul(0x9e37_79b9).wrapping_add(i as u32);
        }
        e
    }

    /// Unsharing the masked permutation's output equals running the
    /// unmasked permutation on the unshared input, for the 4-share backend.
    #[test]
    fn masked_4_matches_unmasked() {
        let state = State::from_words([1, 2, 3, 4, 5]);
        let mut expected = state.clone();
        expected.permute(0);

        let mut e = entropy(42);
        let mut masked = MaskedState4::from_state(&state, &mut e);
        masked.permute(0, &mut e);

        assert_eq!(masked.unshare(), expected);
    }

    /// Same property, for the 2-share backend.
    #[test]
    fn masked_2_matches_unmasked() {
        let state = State::from_words([10, 20, 30, 40, 50]);
        let mut expected = state.clone();
        expected.permute(0);

        let mut e = entropy(7);
        let mut masked = MaskedState2::from_state(&state, &mut e);
        masked.permute(0, &mut e);

        assert_eq!(masked.unshare(), expected);
    }

    #[test]
    fn masked_permute_matches_unmasked_from_nonzero_start_round() {
        let state = State::from_words([0xdead, 0xbeef, 0xcafe, 0xbabe, 0xf00d]);
        let mut expected = state.clone();
        expected.permute(6);

        let mut e = entropy(99);
        let mut masked = MaskedState4::from_state(&state, &mut e);
        masked.permute(6, &mut e);

        assert_eq!(masked.unshare(), expected);
    }

    #[test]
    fn reshare_all_preserves_unshared_value() {
        let state = State::from_words([1, 2, 3, 4, 5]);
        let mut e = entropy(1);
        let mut masked = MaskedState4::from_state(&state, &mut e);
        masked.reshare_all(&mut e);
        assert_eq!(masked.unshare(), state);
    }

    #[test]
    fn different_entropy_produces_different_share_representation() {
        let state = State::from_words([1, 2, 3, 4, 5]);
        let mut e1 = entropy(1);
        let mut e2 = entropy(2);
        let masked1 = MaskedState4::from_state(&state, &mut e1);
        let masked2 = MaskedState4::from_state(&state, &mut e2);
        assert_eq!(masked1.unshare(), masked2.unshare());
        assert_ne!(masked1.words, masked2.words);
    }
}
