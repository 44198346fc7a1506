//! CCM implementation.

use core::fmt;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use aead::Buffer;
use aes::cipher::KeyInit;
use aes::{Aes128, Aes192, Aes256};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::cipher::{Block, BlockCipher128, BLOCK_SIZE};
use crate::error::Error;
use crate::format::{self, AdLength};

const MIN_NONCE_LEN: usize = 7;
const MAX_NONCE_LEN: usize = 13;
const MIN_TAG_LEN: usize = 4;
const MAX_TAG_LEN: usize = 16;

/// CCM over AES-128.
pub type Aes128Ccm = Ccm<Aes128>;
/// CCM over AES-192.
pub type Aes192Ccm = Ccm<Aes192>;
/// CCM over AES-256.
pub type Aes256Ccm = Ccm<Aes256>;

/// The CCM instance.
///
/// Nonce and MAC length are fixed at construction, every message is then
/// sealed or opened independently. The instance holds no per-message state,
/// so it can be shared between threads whenever the cipher can.
///
/// **Never seal two messages under the same key with the same nonce.** The
/// instance has no memory of past nonces and cannot detect reuse, which
/// destroys both confidentiality and authenticity.
pub struct Ccm<C> {
    cipher: C,
    nonce_len: usize,
    tag_len: usize,
}

/// An authentication tag of between 4 and 16 bytes.
#[derive(Clone)]
pub struct Tag {
    bytes: Block,
    len: usize,
}

impl Tag {
    /// The tag bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl AsRef<[u8]> for Tag {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Tag").field(&self.as_slice()).finish()
    }
}

impl Drop for Tag {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl<C> fmt::Debug for Ccm<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Ccm")
            .field("nonce_len", &self.nonce_len)
            .field("tag_len", &self.tag_len)
            .finish_non_exhaustive()
    }
}

impl<C: BlockCipher128 + KeyInit> Ccm<C> {
    /// Creates a new `Ccm` keyed from a byte slice.
    ///
    /// Fails with [`Error::InvalidKeyLength`] if `key` does not fit `C`.
    pub fn new_from_slice(
        key: &[u8],
        nonce_len: usize,
        tag_len: usize,
    ) -> Result<Self, Error> {
        let cipher =
            C::new_from_slice(key).map_err(|_| Error::InvalidKeyLength)?;
        Self::new(cipher, nonce_len, tag_len)
    }
}

impl<C: BlockCipher128> Ccm<C> {
    /// Creates a new `Ccm`.
    ///
    /// Valid `nonce_len` values are 7 to 13, valid `tag_len` values are:
    /// 4, 6, 8, 10, 12, 14, 16. The nonce length determines the longest
    /// message, a 13 byte nonce leaves 2 bytes for the length and caps
    /// messages at 65535 bytes.
    pub fn new(
        cipher: C,
        nonce_len: usize,
        tag_len: usize,
    ) -> Result<Self, Error> {
        if !(MIN_NONCE_LEN..=MAX_NONCE_LEN).contains(&nonce_len) {
            return Err(Error::InvalidNonceLength);
        }
        if tag_len < MIN_TAG_LEN || tag_len > MAX_TAG_LEN || tag_len & 1 != 0
        {
            return Err(Error::InvalidTagLength);
        }
        if cipher.block_size() != BLOCK_SIZE {
            return Err(Error::InvalidCipher);
        }

        Ok(Ccm {
            cipher,
            nonce_len,
            tag_len,
        })
    }

    /// Nonce length in bytes.
    pub fn nonce_len(&self) -> usize {
        self.nonce_len
    }

    /// MAC length in bytes, which is also the ciphertext overhead.
    pub fn tag_len(&self) -> usize {
        self.tag_len
    }

    /// Longest payload accepted by this instance.
    pub fn max_message_len(&self) -> u64 {
        format::max_message_len(self.length_size())
    }

    /// Size L of the message-length field.
    fn length_size(&self) -> usize {
        BLOCK_SIZE - 1 - self.nonce_len
    }

    fn check_nonce(&self, nonce: &[u8]) -> Result<(), Error> {
        if nonce.len() != self.nonce_len {
            return Err(Error::InvalidNonceLength);
        }
        Ok(())
    }

    fn check_message_len(&self, len: usize) -> Result<(), Error> {
        let len = u64::try_from(len).map_err(|_| Error::MessageTooLong)?;
        if len > self.max_message_len() {
            return Err(Error::MessageTooLong);
        }
        Ok(())
    }

    /// Encrypts `buffer` in place and returns the tag.
    pub fn seal_in_place_detached(
        &self,
        nonce: &[u8],
        associated_data: &[u8],
        buffer: &mut [u8],
    ) -> Result<Tag, Error> {
        self.check_nonce(nonce)?;
        self.check_message_len(buffer.len())?;

        let tag = self.compute_tag(nonce, associated_data, buffer);
        self.apply_keystream(nonce, buffer);

        Ok(tag)
    }

    /// Decrypts `buffer` in place and verifies it against `tag`.
    ///
    /// On [`Error::AuthenticationFailed`] `buffer` is wiped.
    pub fn open_in_place_detached(
        &self,
        nonce: &[u8],
        associated_data: &[u8],
        buffer: &mut [u8],
        tag: &[u8],
    ) -> Result<(), Error> {
        self.check_nonce(nonce)?;
        if tag.len() != self.tag_len {
            return Err(Error::InvalidTagLength);
        }
        self.check_message_len(buffer.len())?;

        self.apply_keystream(nonce, buffer);
        let expected = self.compute_tag(nonce, associated_data, buffer);

        if bool::from(expected.as_slice().ct_eq(tag)) {
            Ok(())
        } else {
            buffer.zeroize();
            Err(Error::AuthenticationFailed)
        }
    }

    /// Encrypts the contents of `buffer` and appends the tag.
    ///
    /// If the tag does not fit, `buffer` is restored to the plaintext and
    /// [`Error::BufferTooSmall`] is returned.
    pub fn seal_in_place(
        &self,
        nonce: &[u8],
        associated_data: &[u8],
        buffer: &mut dyn Buffer,
    ) -> Result<(), Error> {
        let tag = self.seal_in_place_detached(
            nonce,
            associated_data,
            buffer.as_mut(),
        )?;
        if let Err(e) = buffer.extend_from_slice(tag.as_slice()) {
            self.apply_keystream(nonce, buffer.as_mut());
            return Err(e.into());
        }
        Ok(())
    }

    /// Verifies and decrypts the ciphertext and tag held in `buffer`,
    /// leaving only the plaintext.
    ///
    /// On [`Error::AuthenticationFailed`] `buffer` is wiped and emptied.
    pub fn open_in_place(
        &self,
        nonce: &[u8],
        associated_data: &[u8],
        buffer: &mut dyn Buffer,
    ) -> Result<(), Error> {
        self.check_nonce(nonce)?;
        let msg_len = buffer
            .len()
            .checked_sub(self.tag_len)
            .ok_or(Error::CiphertextTooShort)?;

        let (msg, tag) = buffer.as_mut().split_at_mut(msg_len);
        match self.open_in_place_detached(nonce, associated_data, msg, tag) {
            Ok(()) => {
                buffer.truncate(msg_len);
                Ok(())
            }
            Err(Error::AuthenticationFailed) => {
                buffer.as_mut().zeroize();
                buffer.truncate(0);
                Err(Error::AuthenticationFailed)
            }
            Err(e) => Err(e),
        }
    }

    /// Encrypts and authenticates `plaintext`, returning ciphertext || tag.
    #[cfg(feature = "alloc")]
    pub fn seal(
        &self,
        nonce: &[u8],
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        self.seal_append(&mut out, nonce, plaintext, associated_data)?;
        Ok(out)
    }

    /// Like [`seal`](Self::seal), but appends ciphertext || tag to `dst`.
    ///
    /// On error `dst` is left as it was.
    #[cfg(feature = "alloc")]
    pub fn seal_append(
        &self,
        dst: &mut Vec<u8>,
        nonce: &[u8],
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<(), Error> {
        self.check_nonce(nonce)?;
        self.check_message_len(plaintext.len())?;

        let start = dst.len();
        dst.reserve(plaintext.len() + self.tag_len);
        dst.extend_from_slice(plaintext);
        match self.seal_in_place_detached(
            nonce,
            associated_data,
            &mut dst[start..],
        ) {
            Ok(tag) => {
                dst.extend_from_slice(tag.as_slice());
                Ok(())
            }
            Err(e) => {
                dst[start..].zeroize();
                dst.truncate(start);
                Err(e)
            }
        }
    }

    /// Verifies and decrypts ciphertext || tag, returning the plaintext.
    #[cfg(feature = "alloc")]
    pub fn open(
        &self,
        nonce: &[u8],
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        self.open_append(&mut out, nonce, ciphertext, associated_data)?;
        Ok(out)
    }

    /// Like [`open`](Self::open), but appends the plaintext to `dst`.
    ///
    /// On error `dst` is left as it was and no plaintext byte remains in
    /// its spare capacity.
    #[cfg(feature = "alloc")]
    pub fn open_append(
        &self,
        dst: &mut Vec<u8>,
        nonce: &[u8],
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> Result<(), Error> {
        self.check_nonce(nonce)?;
        let msg_len = ciphertext
            .len()
            .checked_sub(self.tag_len)
            .ok_or(Error::CiphertextTooShort)?;
        self.check_message_len(msg_len)?;

        let (msg, tag) = ciphertext.split_at(msg_len);
        let start = dst.len();
        dst.extend_from_slice(msg);
        if let Err(e) = self.open_in_place_detached(
            nonce,
            associated_data,
            &mut dst[start..],
            tag,
        ) {
            dst[start..].zeroize();
            dst.truncate(start);
            return Err(e);
        }
        Ok(())
    }

    /// Computes the masked tag: the CBC-MAC over B0, the formatted
    /// associated data and `payload`, XORed with S0 = E(A0).
    fn compute_tag(
        &self,
        nonce: &[u8],
        associated_data: &[u8],
        payload: &[u8],
    ) -> Tag {
        let has_ad = !associated_data.is_empty();
        let b0 = format::b0(nonce, has_ad, self.tag_len, payload.len() as u64);

        let mut mac = CbcMac::new(&self.cipher, b0);
        if has_ad {
            let mut prefix = [0u8; 10];
            let n = AdLength::classify(associated_data.len() as u64)
                .encode(&mut prefix);
            mac.update(&prefix[..n]);
            mac.update(associated_data);
            mac.pad();
        }
        mac.update(payload);
        let mut u = mac.finalize();

        let mut s0 = format::a0(nonce);
        self.cipher.encrypt_block(&mut s0);

        let mut tag = Tag {
            bytes: [0u8; BLOCK_SIZE],
            len: self.tag_len,
        };
        let len = tag.len;
        for ((t, x), s) in tag.bytes.iter_mut().zip(&u).zip(&s0).take(len) {
            *t = x ^ s;
        }

        u.zeroize();
        s0.zeroize();
        tag
    }

    /// Variation of CTR mode used in CCM.
    ///
    /// Counter 0 is reserved for the tag, so the payload starts at A_1. The
    /// length check guarantees the counter never wraps within its L bytes.
    fn apply_keystream(&self, nonce: &[u8], data: &mut [u8]) {
        let l = self.length_size();
        let mut ctr = format::a0(nonce);
        let mut keystream = [0u8; BLOCK_SIZE];

        for (i, chunk) in data.chunks_mut(BLOCK_SIZE).enumerate() {
            format::set_counter(&mut ctr, l, i as u64 + 1);
            keystream.copy_from_slice(&ctr);
            self.cipher.encrypt_block(&mut keystream);
            for (d, k) in chunk.iter_mut().zip(&keystream) {
                *d ^= k;
            }
        }

        keystream.zeroize();
    }
}

/// Variation of CBC-MAC used in CCM.
///
/// The chain starts from E(B0) instead of an IV. Input is absorbed byte by
/// byte; [`pad`](Self::pad) closes a partial block, which is equivalent to
/// zero padding it.
struct CbcMac<'a, C: BlockCipher128> {
    cipher: &'a C,
    state: Block,
    pos: usize,
}

impl<'a, C: BlockCipher128> CbcMac<'a, C> {
    fn new(cipher: &'a C, b0: Block) -> Self {
        let mut state = b0;
        cipher.encrypt_block(&mut state);
        CbcMac {
            cipher,
            state,
            pos: 0,
        }
    }

    fn update(&mut self, data: &[u8]) {
        for byte in data {
            self.state[self.pos] ^= byte;
            self.pos += 1;
            if self.pos == BLOCK_SIZE {
                self.cipher.encrypt_block(&mut self.state);
                self.pos = 0;
            }
        }
    }

    fn pad(&mut self) {
        if self.pos != 0 {
            self.cipher.encrypt_block(&mut self.state);
            self.pos = 0;
        }
    }

    fn finalize(mut self) -> Block {
        self.pad();
        self.state
    }
}

impl<C: BlockCipher128> Drop for CbcMac<'_, C> {
    fn drop(&mut self) {
        self.state.zeroize();
    }
}
