//! L2: ASCON-80pq-SIV, a Synthetic-IV AEAD construction built on the same
//! sponge as [`crate::xof`].
//!
//! Unlike [`crate::xof`]'s pure absorb-then-squeeze usage of
//! [`crate::sponge::Sponge`], the SIV construction also touches the
//! capacity words directly (key injection, tag derivation, the OFB
//! keystream loop): the rate/capacity split is a rule for *data
//! absorption*, not a restriction on what the construction itself may
//! read or write.

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::AeadError;
use crate::permutation::State;
use crate::sponge::{Sponge, RATE};

/// Key length, in bytes, for ASCON-80pq-SIV.
pub const KEY_LEN: usize = 20;
/// Nonce length, in bytes.
pub const NONCE_LEN: usize = 16;
/// Tag length, in bytes.
pub const TAG_LEN: usize = 16;

/// Authentication-phase IV (`IV1`), packed big-endian into the state's
/// first 4 bytes.
const IV1: u32 = 0xa140_0c06;
/// Encryption-phase IV (`IV2`).
const IV2: u32 = 0xa240_0c06;

/// XOR `data` into the state's 40-byte regular serialization starting at
/// byte `offset`, for the non-rate-aligned writes this construction needs
/// (key injection, tag derivation) that [`Sponge`]'s rate-only `absorb`
/// cannot express.
fn xor_bytes_at(state: &mut State, offset: usize, data: &[u8]) {
    let mut regular = state.to_regular();
    for (i, &byte) in data.iter().enumerate() {
        regular[offset + i] ^= byte;
    }
    *state = State::from_regular(&regular);
}

/// Load `iv || key || nonce` as a full 40-byte block, permute, then XOR the
/// key again into the capacity region.
fn init(nonce: &[u8; NONCE_LEN], key: &[u8; KEY_LEN], iv: u32) -> State {
    let mut block = [0u8; 40];
    block[0..4].copy_from_slice(&iv.to_be_bytes());
    block[4..24].copy_from_slice(key);
    block[24..40].copy_from_slice(nonce);

    let mut state = State::from_regular(&block);
    state.permute(0);
    xor_bytes_at(&mut state, 20, key);
    state
}

/// Authentication phase: absorb AD and message under `IV1`, derive and
/// return the 16-byte synthetic tag.
fn derive_tag(nonce: &[u8; NONCE_LEN], key: &[u8; KEY_LEN], ad: &[u8], m: &[u8]) -> [u8; TAG_LEN] {
    let state = init(nonce, key, IV1);
    let mut sponge = Sponge::from_state(state, 6);

    if !ad.is_empty() {
        sponge.absorb(ad);
        sponge.finalize_absorb_block();
    }
    // Domain separator: flip X4's low bit, unconditionally.
    sponge.state_mut().words_mut()[4] ^= 1;

    sponge.absorb(m);
    sponge.finalize_absorb_block();

    let state = sponge.state_mut();
    state.words_mut()[1] ^= u64::from_be_bytes(key[0..8].try_into().expect("8 bytes"));
    state.permute(0);
    state.words_mut()[3] ^= u64::from_be_bytes(key[4..12].try_into().expect("8 bytes"));
    state.words_mut()[4] ^= u64::from_be_bytes(key[12..20].try_into().expect("8 bytes"));

    let mut tag = [0u8; TAG_LEN];
    tag[0..8].copy_from_slice(&state.words()[3].to_be_bytes());
    tag[8..16].copy_from_slice(&state.words()[4].to_be_bytes());
    tag
}

/// The encryption-phase OFB keystream loop: under `IV2` with the tag (or,
/// on decrypt, the received tag) standing in for the nonce, permute once
/// per rate block and XOR the keystream with `input` into `output`.
/// Encryption and decryption are the same operation since XOR is its own
/// inverse.
fn ofb_crypt(tag_as_nonce: &[u8; NONCE_LEN], key: &[u8; KEY_LEN], input: &[u8], output: &mut [u8]) {
    debug_assert_eq!(input.len(), output.len());
    let mut state = init(tag_as_nonce, key, IV2);
    let mut remaining = input;
    let mut out = output;
    while !remaining.is_empty() {
        state.permute(6);
        let keystream = state.words()[0].to_be_bytes();
        let n = remaining.len().min(RATE);
        for i in 0..n {
            out[i] = remaining[i] ^ keystream[i];
        }
        remaining = &remaining[n..];
        out = &mut out[n..];
    }
}

/// Encrypt `m` under `key`/`nonce`/`ad`, writing `m.len() + `[`TAG_LEN`]`
/// bytes (ciphertext followed by the tag) to `out`.
///
/// # Panics
///
/// Debug builds assert `out.len() == m.len() + TAG_LEN`; a caller passing
/// a mis-sized buffer is misuse, not a recoverable error — encryption is
/// total and cannot itself fail.
pub fn encrypt(out: &mut [u8], m: &[u8], ad: &[u8], nonce: &[u8; NONCE_LEN], key: &[u8; KEY_LEN]) {
    debug_assert_eq!(out.len(), m.len() + TAG_LEN);
    #[cfg(feature = "tracing")]
    tracing::debug!(m_len = m.len(), ad_len = ad.len(), "siv encrypt");

    let tag = derive_tag(nonce, key, ad, m);
    let (ct_out, tag_out) = out.split_at_mut(m.len());
    ofb_crypt(&tag, key, m, ct_out);
    tag_out.copy_from_slice(&tag);
}

/// Decrypt `c` (ciphertext followed by the tag) under `key`/`nonce`/`ad`,
/// writing the recovered plaintext to `out` on success.
///
/// # Errors
///
/// Returns [`AeadError::CiphertextTooShort`] if `c` is shorter than
/// [`TAG_LEN`], and [`AeadError::InvalidTag`] if the recomputed tag
/// (constant-time compared) does not match. In both failure cases `out`
/// is zeroed before returning.
///
/// # Panics
///
/// Debug builds assert `out.len() == c.len() - TAG_LEN` whenever that
/// subtraction is meaningful (i.e. `c.len() >= TAG_LEN`).
pub fn decrypt(
    out: &mut [u8],
    c: &[u8],
    ad: &[u8],
    nonce: &[u8; NONCE_LEN],
    key: &[u8; KEY_LEN],
) -> Result<(), AeadError> {
    if c.len() < TAG_LEN {
        out.zeroize();
        return Err(AeadError::CiphertextTooShort { tag_len: TAG_LEN });
    }
    let mlen = c.len() - TAG_LEN;
    debug_assert_eq!(out.len(), mlen);
    #[cfg(feature = "tracing")]
    tracing::debug!(c_len = c.len(), ad_len = ad.len(), "siv decrypt");

    let (ct, tag_bytes) = c.split_at(mlen);
    let tag: [u8; TAG_LEN] = tag_bytes.try_into().expect("split at c.len() - TAG_LEN");

    ofb_crypt(&tag, key, ct, out);
    let recomputed = derive_tag(nonce, key, ad, out);

    if bool::from(recomputed.ct_eq(&tag)) {
        Ok(())
    } else {
        #[cfg(feature = "tracing")]
        tracing::debug!("siv decrypt: tag mismatch");
        out.zeroize();
        Err(AeadError::InvalidTag)
    }
}

/// Allocating convenience wrapper around [`encrypt`].
#[cfg(feature = "std")]
#[must_use]
pub fn encrypt_to_vec(
    m: &[u8],
    ad: &[u8],
    nonce: &[u8; NONCE_LEN],
    key: &[u8; KEY_LEN],
) -> Vec<u8> {
    let mut out = vec![0u8; m.len() + TAG_LEN];
    encrypt(&mut out, m, ad, nonce, key);
    out
}

/// Allocating convenience wrapper around [`decrypt`].
///
/// # Errors
///
/// See [`decrypt`].
#[cfg(feature = "std")]
pub fn decrypt_to_vec(
    c: &[u8],
    ad: &[u8],
    nonce: &[u8; NONCE_LEN],
    key: &[u8; KEY_LEN],
) -> Result<Vec<u8>, AeadError> {
    if c.len() < TAG_LEN {
        return Err(AeadError::CiphertextTooShort { tag_len: TAG_LEN });
    }
    let mut out = vec![0u8; c.len() - TAG_LEN];
    decrypt(&mut out, c, ad, nonce, key)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; KEY_LEN] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f, 0x10, 0x11, 0x12, 0x13,
    ];
    const NONCE: [u8; NONCE_LEN] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f,
    ];

    /// Empty plaintext and AD still produce a 16-byte (tag-only)
    /// ciphertext.
    #[test]
    fn empty_plaintext_produces_tag_only_ciphertext() {
        let mut out = [0u8; TAG_LEN];
        encrypt(&mut out, b"", b"", &NONCE, &KEY);
        assert_eq!(out.len(), TAG_LEN);

        let mut recovered = [0u8; 0];
        decrypt(&mut recovered, &out, b"", &NONCE, &KEY).unwrap();
    }

    /// One byte of AD and one byte of plaintext produce a 17-byte output.
    #[test]
    fn single_byte_output_length() {
        let mut out = [0u8; 1 + TAG_LEN];
        encrypt(&mut out, &[0x00], &[0x00], &NONCE, &KEY);
        assert_eq!(out.len(), 17);
    }

    /// decrypt(encrypt(m)) == m, across a range of lengths that straddle
    /// the 8-byte rate boundary.
    #[test]
    fn round_trips_across_block_boundaries() {
        for mlen in [0, 1, 7, 8, 9, 15, 16, 17, 31, 64] {
            for adlen in [0, 3, 8, 20] {
                let m = vec![0x5au8; mlen];
                let ad = vec![0xa5u8; adlen];
                let mut c = vec![0u8; mlen + TAG_LEN];
                encrypt(&mut c, &m, &ad, &NONCE, &KEY);

                let mut recovered = vec![0u8; mlen];
                decrypt(&mut recovered, &c, &ad, &NONCE, &KEY)
                    .unwrap_or_else(|e| panic!("mlen={mlen} adlen={adlen}: {e}"));
                assert_eq!(recovered, m, "mlen={mlen} adlen={adlen}");
            }
        }
    }

    /// Encryption with the same inputs is deterministic (no random IV), a
    /// direct consequence of the tag being a pure function of
    /// key/nonce/ad/message.
    #[test]
    fn encryption_is_deterministic() {
        let m = b"deterministic by construction";
        let ad = b"context";
        let mut a = vec![0u8; m.len() + TAG_LEN];
        let mut b = vec![0u8; m.len() + TAG_LEN];
        encrypt(&mut a, m, ad, &NONCE, &KEY);
        encrypt(&mut b, m, ad, &NONCE, &KEY);
        assert_eq!(a, b);
    }

    /// Flipping any single bit of the ciphertext causes decryption to fail
    /// and zeroes the output buffer.
    #[test]
    fn tampering_ciphertext_fails_and_zeroes_output() {
        let m = b"authenticate me";
        let ad = b"ad";
        let mut c = vec![0u8; m.len() + TAG_LEN];
        encrypt(&mut c, m, ad, &NONCE, &KEY);

        for byte_index in 0..c.len() {
            let mut tampered = c.clone();
            tampered[byte_index] ^= 0x01;

            let mut out = vec![0xffu8; m.len()];
            let result = decrypt(&mut out, &tampered, ad, &NONCE, &KEY);
            assert!(result.is_err(), "byte {byte_index} flip went undetected");
            assert!(out.iter().all(|&b| b == 0), "output not zeroed on failure");
        }
    }

    /// Associated-data cross-contamination: encrypting under `ad1` then
    /// attempting to decrypt under `ad2 != ad1` fails.
    #[test]
    fn mismatched_associated_data_fails() {
        let m = b"payload";
        let mut c = vec![0u8; m.len() + TAG_LEN];
        encrypt(&mut c, m, b"ad-one", &NONCE, &KEY);

        let mut out = vec![0u8; m.len()];
        assert_eq!(
            decrypt(&mut out, &c, b"ad-two", &NONCE, &KEY),
            Err(AeadError::InvalidTag)
        );
    }

    /// Flipping any bit of the key or nonce also invalidates the tag.
    #[test]
    fn tampering_key_or_nonce_fails() {
        let m = b"payload";
        let ad = b"ad";
        let mut c = vec![0u8; m.len() + TAG_LEN];
        encrypt(&mut c, m, ad, &NONCE, &KEY);

        let mut bad_key = KEY;
        bad_key[0] ^= 0x01;
        let mut out = vec![0u8; m.len()];
        assert!(decrypt(&mut out, &c, ad, &NONCE, &bad_key).is_err());

        let mut bad_nonce = NONCE;
        bad_nonce[0] ^= 0x01;
        let mut out = vec![0u8; m.len()];
        assert!(decrypt(&mut out, &c, ad, &bad_nonce, &KEY).is_err());
    }

    #[test]
    fn ciphertext_shorter_than_tag_is_rejected() {
        let mut out = [0u8; 0];
        assert_eq!(
            decrypt(&mut out, &[0u8; 4], b"", &NONCE, &KEY),
            Err(AeadError::CiphertextTooShort { tag_len: TAG_LEN })
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn vec_convenience_wrappers_round_trip() {
        let m = b"vec api";
        let ad = b"ad";
        let c = encrypt_to_vec(m, ad, &NONCE, &KEY);
        assert_eq!(c.len(), m.len() + TAG_LEN);
        let recovered = decrypt_to_vec(&c, ad, &NONCE, &KEY).unwrap();
        assert_eq!(recovered, m);
    }
}
