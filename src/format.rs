//! Formatting of the CCM control blocks.
//!
//! The B0 block starts the CBC-MAC and the A_i blocks feed CTR mode:
//! ```text
//! B0  = [ FLAGS | nonce | message length ]
//! A_i = [ FLAGS | nonce | counter i      ]
//! ```
//! FLAGS of B0 is composed by the following 8 bits:
//! ```text
//!   0-2 bits: L-1, where L = 15 - nonce length
//!   3-5 bits: mac length (encoded as: (mlen-2)/2)
//!   6:        Adata (0 if alen == 0, and 1 otherwise)
//!   7:        always 0
//! ```
//! FLAGS of A_i only carries L-1 in bits 0-2, all other bits are 0.

use crate::cipher::{Block, BLOCK_SIZE};

/// Flags byte of B0.
pub(crate) fn auth_flags(has_ad: bool, tag_len: usize, l: usize) -> u8 {
    let adata = if has_ad { 0x40 } else { 0 };
    adata | (((tag_len - 2) / 2) as u8) << 3 | (l - 1) as u8
}

/// Flags byte of the counter blocks.
pub(crate) fn ctr_flags(l: usize) -> u8 {
    (l - 1) as u8
}

/// Writes `value` big-endian into the last `l` bytes of `block`.
///
/// `l` is at most 8, so a `u64` always covers the field.
fn put_field(block: &mut Block, l: usize, value: u64) {
    block[BLOCK_SIZE - l..].copy_from_slice(&value.to_be_bytes()[8 - l..]);
}

/// Builds B0 for a message of `msg_len` bytes.
pub(crate) fn b0(
    nonce: &[u8],
    has_ad: bool,
    tag_len: usize,
    msg_len: u64,
) -> Block {
    let l = BLOCK_SIZE - 1 - nonce.len();
    let mut b = [0u8; BLOCK_SIZE];
    b[0] = auth_flags(has_ad, tag_len, l);
    b[1..=nonce.len()].copy_from_slice(nonce);
    put_field(&mut b, l, msg_len);
    b
}

/// Builds the counter block A_0 for `nonce`.
pub(crate) fn a0(nonce: &[u8]) -> Block {
    let l = BLOCK_SIZE - 1 - nonce.len();
    let mut a = [0u8; BLOCK_SIZE];
    a[0] = ctr_flags(l);
    a[1..=nonce.len()].copy_from_slice(nonce);
    a
}

/// Sets the counter field of an A_i block.
pub(crate) fn set_counter(a: &mut Block, l: usize, counter: u64) {
    put_field(a, l, counter);
}

/// Largest payload length encodable in an `l` byte length field.
pub(crate) fn max_message_len(l: usize) -> u64 {
    if l >= 8 {
        u64::MAX
    } else {
        (1u64 << (8 * l)) - 1
    }
}

// AD shorter than 2^16 - 2^8 gets a plain two byte length
const AD_SHORT_LIMIT: u64 = 0xFF00;
const AD_MEDIUM_LIMIT: u64 = 1 << 32;

/// Length prefix put in front of the associated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AdLength {
    /// `len` as 2 bytes.
    Short(u16),
    /// `0xFF 0xFE` followed by `len` as 4 bytes.
    Medium(u32),
    /// `0xFF 0xFF` followed by `len` as 8 bytes.
    Long(u64),
}

impl AdLength {
    pub(crate) fn classify(len: u64) -> Self {
        if len < AD_SHORT_LIMIT {
            AdLength::Short(len as u16)
        } else if len < AD_MEDIUM_LIMIT {
            AdLength::Medium(len as u32)
        } else {
            AdLength::Long(len)
        }
    }

    /// Writes the prefix into `out` and returns the number of bytes used.
    pub(crate) fn encode(self, out: &mut [u8; 10]) -> usize {
        match self {
            AdLength::Short(len) => {
                out[..2].copy_from_slice(&len.to_be_bytes());
                2
            }
            AdLength::Medium(len) => {
                out[..2].copy_from_slice(&[0xFF, 0xFE]);
                out[2..6].copy_from_slice(&len.to_be_bytes());
                6
            }
            AdLength::Long(len) => {
                out[..2].copy_from_slice(&[0xFF, 0xFF]);
                out[2..10].copy_from_slice(&len.to_be_bytes());
                10
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_layout() {
        // SP 800-38C examples C.1 to C.4
        assert_eq!(0x4F, auth_flags(true, 4, 8));
        assert_eq!(0x56, auth_flags(true, 6, 7));
        assert_eq!(0x5A, auth_flags(true, 8, 3));
        assert_eq!(0x71, auth_flags(true, 14, 2));

        assert_eq!(0x09, auth_flags(false, 4, 2));
        assert_eq!(0x3F, auth_flags(false, 16, 8));
        for l in 2..=8 {
            assert_eq!((l - 1) as u8, ctr_flags(l));
        }
    }

    #[test]
    fn b0_c1() {
        let b = b0(&hex!("10111213141516"), true, 4, 4);
        assert_eq!(hex!("4f101112131415160000000000000004"), b);
    }

    #[test]
    fn b0_c4() {
        let b = b0(&hex!("101112131415161718191a1b1c"), true, 14, 32);
        assert_eq!(hex!("71101112131415161718191a1b1c0020"), b);
    }

    #[test]
    fn counter_blocks() {
        let mut a = a0(&hex!("1011121314151617"));
        assert_eq!(hex!("06101112131415161700000000000000"), a);
        set_counter(&mut a, 7, 0x0102);
        assert_eq!(hex!("06101112131415161700000000000102"), a);
        set_counter(&mut a, 7, 0);
        assert_eq!(hex!("06101112131415161700000000000000"), a);
    }

    #[test]
    fn message_limits() {
        assert_eq!(0xFFFF, max_message_len(2));
        assert_eq!(0xFFFF_FFFF, max_message_len(4));
        assert_eq!((1 << 56) - 1, max_message_len(7));
        assert_eq!(u64::MAX, max_message_len(8));
    }

    #[test]
    fn ad_length_classes() {
        let mut out = [0u8; 10];

        assert_eq!(AdLength::Short(8), AdLength::classify(8));
        assert_eq!(2, AdLength::classify(8).encode(&mut out));
        assert_eq!(hex!("0008"), out[..2]);

        assert_eq!(AdLength::Short(0xFEFF), AdLength::classify(0xFEFF));
        assert_eq!(AdLength::Medium(0xFF00), AdLength::classify(0xFF00));
        assert_eq!(6, AdLength::classify(0x10000).encode(&mut out));
        assert_eq!(hex!("fffe00010000"), out[..6]);

        assert_eq!(
            AdLength::Medium(0xFFFF_FFFF),
            AdLength::classify(0xFFFF_FFFF)
        );
        let long = AdLength::classify(1 << 32);
        assert_eq!(AdLength::Long(1 << 32), long);
        assert_eq!(10, long.encode(&mut out));
        assert_eq!(hex!("ffff0000000100000000"), out);
    }
}
