//! A pure-Rust, `#![no_std]` CCM implementation over any 128-bit block
//! cipher, with ready-made instances for [RustCrypto's AES].
//!
//! ## Overview
//! CCM (for "Counter with CBC-MAC") mode is a NIST approved mode of operation
//! defined in [SP 800-38C] and [RFC 3610]. It encrypts a payload in CTR mode
//! and authenticates both the payload and some associated data with a
//! CBC-MAC, producing ciphertext followed by a tag in a single call.
//!
//! This implementation accepts:
//! 1. Both non-empty payload and associated data (it encrypts and
//!    authenticates the payload and also authenticates the associated data).
//! 2. Non-empty payload and empty associated data (it encrypts and
//!    authenticates the payload).
//! 3. Non-empty associated data and empty payload (it degenerates to an
//!    authentication mode on the associated data).
//!
//! Nonces may be 7 to 13 bytes long. The nonce length N leaves L = 15 - N
//! bytes to encode the payload length, so payloads must be shorter than
//! 2^(8L) bytes: a 13 byte nonce allows at most 65535 bytes, a 7 byte nonce
//! practically anything. Associated data has no practical limit.
//!
//! ## Usage
//! ```rust
//! use ccm_mode::Aes128Ccm;
//!
//! let key = [
//!     0xC0, 0xC1, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6, 0xC7, 0xC8, 0xC9, 0xCA,
//!     0xCB, 0xCC, 0xCD, 0xCE, 0xCF,
//! ];
//!
//! // 13 byte nonces and 8 byte tags
//! let ccm = Aes128Ccm::new_from_slice(&key, 13, 8).unwrap();
//!
//! let nonce = [
//!     0x00, 0x00, 0x00, 0x03, 0x02, 0x01, 0x00, 0xA0, 0xA1, 0xA2, 0xA3,
//!     0xA4, 0xA5,
//! ];
//! let msg = [
//!     0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10, 0x11, 0x12,
//!     0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x1B, 0x1C, 0x1D,
//!     0x1E,
//! ];
//! let associated_data = [0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
//!
//! let ciphertext = ccm.seal(&nonce, &msg, &associated_data).unwrap();
//! assert_eq!(msg.len() + 8, ciphertext.len());
//!
//! let plaintext = ccm.open(&nonce, &ciphertext, &associated_data).unwrap();
//! assert_eq!(&msg[..], plaintext.as_slice());
//! ```
//!
//! ## Other block ciphers
//! Anything implementing [`BlockCipher128`] can drive the engine, and so can
//! a reference to it, which lets one keyed cipher back several instances:
//!
//! ```rust
//! use ccm_mode::{
//!     aes::{cipher::KeyInit, Aes256},
//!     Ccm,
//! };
//!
//! let cipher = Aes256::new(&[0x42; 32].into());
//! let short_tags = Ccm::new(&cipher, 12, 4).unwrap();
//! let long_tags = Ccm::new(&cipher, 12, 16).unwrap();
//! assert_eq!(4, short_tags.tag_len());
//! assert_eq!(16, long_tags.tag_len());
//! ```
//!
//! ## In-place Usage (eliminates `alloc` requirement)
//! This crate has an optional `alloc` feature which can be disabled in e.g.
//! microcontroller environments that don't have a heap.
//!
//! [`Ccm::seal_in_place`] and [`Ccm::open_in_place`] accept any type that
//! impls the [`aead::Buffer`] trait, and the `*_detached` variants work on a
//! plain `&mut [u8]` with the tag kept separately.
//!
//! Note that if you enable the `heapless` feature of this crate,
//! you will receive an impl of `aead::Buffer` for [`heapless::Vec`]
//! (re-exported from the `aead` crate as `aead::heapless::Vec`),
//! which can then be passed as the `buffer` parameter to the in-place seal
//! and open methods.
//!
//! ```rust
//! use ccm_mode::Aes128Ccm;
//!
//! let ccm = Aes128Ccm::new_from_slice(&[0xC0; 16], 7, 16).unwrap();
//! let nonce = [0x01; 7];
//! let plaintext = *b"sixteen byte msg";
//!
//! let mut buffer = plaintext;
//! let tag = ccm
//!     .seal_in_place_detached(&nonce, b"header", &mut buffer)
//!     .unwrap();
//! assert_ne!(buffer, plaintext);
//!
//! ccm.open_in_place_detached(&nonce, b"header", &mut buffer, tag.as_slice())
//!     .unwrap();
//! assert_eq!(buffer, plaintext);
//! ```
//!
//! ## Security
//! The MAC length parameter is an important parameter to estimate the security
//! against collision attacks (that aim at finding different messages that
//! produce the same authentication tag).
//! The implementation accepts any even integer between 4 and 16, as suggested
//! in [SP 800-38C].
//!
//! [RFC 3610], which also specifies CCM, presents a few relevant security
//! suggestions, such as:
//! * It is recommended that most applications use a MAC length greater than 8.
//! * The usage of the same nonce for two different messages which are
//!   encrypted with the same key destroys the security of CCM mode.
//!
//! The engine cannot enforce nonce uniqueness, that is up to the caller.
//! Tags are compared in constant time, and on a failed verification the
//! decrypted bytes are wiped before the error is returned.
//!
//! [RustCrypto's AES]: https://github.com/RustCrypto/block-ciphers
//! [SP 800-38C]: https://csrc.nist.gov/publications/detail/sp/800-38c/final
//! [RFC 3610]: https://tools.ietf.org/html/rfc3610
//! [`aead::Buffer`]: https://docs.rs/aead/latest/aead/trait.Buffer.html
//! [`heapless::Vec`]: https://docs.rs/heapless/latest/heapless/struct.Vec.html

#![cfg_attr(not(any(feature = "std", test)), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate hex_literal;

mod ccm;
mod cipher;
mod error;
mod format;

pub use aead;
pub use aes;
pub use ccm::{Aes128Ccm, Aes192Ccm, Aes256Ccm, Ccm, Tag};
pub use cipher::{Block, BlockCipher128, BLOCK_SIZE};
pub use error::Error;
