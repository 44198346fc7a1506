//! Block cipher adapter.
//!
//! CCM only ever runs the forward direction of its block cipher, so the
//! engine is written against this single-method trait instead of a concrete
//! cipher.

use aes::cipher::{generic_array::GenericArray, BlockEncrypt};
use aes::{Aes128, Aes192, Aes256};

/// Size of a CCM block in bytes.
pub const BLOCK_SIZE: usize = 16;

/// A single 128-bit block.
pub type Block = [u8; BLOCK_SIZE];

/// A block cipher usable by CCM.
///
/// The key is fixed when the implementor is constructed; any key error must
/// surface there and not in [`encrypt_block`](Self::encrypt_block).
///
/// Implementations must be safe to call through a shared reference from
/// several threads at once if the engine is shared between threads. Ciphers
/// that keep per-call scratch state have to guard it themselves.
pub trait BlockCipher128 {
    /// Block size in bytes. CCM rejects anything but 16.
    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    /// Encrypts `block` in place.
    fn encrypt_block(&self, block: &mut Block);
}

impl<C: BlockCipher128 + ?Sized> BlockCipher128 for &C {
    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn encrypt_block(&self, block: &mut Block) {
        (**self).encrypt_block(block)
    }
}

macro_rules! impl_aes {
    ($($aes:ty),+) => {
        $(
            impl BlockCipher128 for $aes {
                fn encrypt_block(&self, block: &mut Block) {
                    BlockEncrypt::encrypt_block(
                        self,
                        GenericArray::from_mut_slice(block),
                    );
                }
            }
        )+
    };
}

impl_aes!(Aes128, Aes192, Aes256);

#[cfg(test)]
mod tests {
    use super::*;
    use aes::cipher::KeyInit;

    #[test]
    fn aes128_fips197() {
        // FIPS-197 appendix C.1
        let key = hex!("000102030405060708090a0b0c0d0e0f");
        let cipher = Aes128::new(GenericArray::from_slice(&key));
        let mut block = hex!("00112233445566778899aabbccddeeff");
        BlockCipher128::encrypt_block(&cipher, &mut block);
        assert_eq!(hex!("69c4e0d86a7b0430d8cdb78070b4c55a"), block);
        assert_eq!(BLOCK_SIZE, BlockCipher128::block_size(&cipher));
    }

    #[test]
    fn reference_forwards() {
        let cipher = Aes256::new(GenericArray::from_slice(&hex!(
            "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f"
        )));
        let by_ref = &cipher;
        let mut block = hex!("00112233445566778899aabbccddeeff");
        BlockCipher128::encrypt_block(&by_ref, &mut block);
        assert_eq!(hex!("8ea2b7ca516745bfeafc49904b496089"), block);
    }
}
