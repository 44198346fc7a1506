//! CCM errors.

use core::fmt;

/// The error type for CCM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Nonce length outside of 7..=13, or not the configured length.
    InvalidNonceLength,
    /// Wrong MAC length.
    InvalidTagLength,
    /// The block cipher does not have a 128-bit block.
    InvalidCipher,
    /// The key does not fit the block cipher.
    InvalidKeyLength,
    /// The payload does not fit the message-length field.
    MessageTooLong,
    /// The input is shorter than the tag.
    CiphertextTooShort,
    /// The buffer has no room left for the tag.
    BufferTooSmall,
    /// Tag verification failed.
    AuthenticationFailed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidNonceLength => write!(
                f,
                "Bad nonce length. Allowed sizes are 7 to 13 bytes and must \
                 match the configured length"
            ),
            Error::InvalidTagLength => write!(
                f,
                "Bad MAC length. Allowed sizes are: 4, 6, 8, 10, 12, 14, 16"
            ),
            Error::InvalidCipher => {
                write!(f, "Block cipher must have a 16 byte block size")
            }
            Error::InvalidKeyLength => {
                write!(f, "Key length does not fit the block cipher")
            }
            Error::MessageTooLong => {
                write!(f, "Payload too long for the chosen nonce length")
            }
            Error::CiphertextTooShort => {
                write!(f, "Ciphertext is shorter than the MAC")
            }
            Error::BufferTooSmall => write!(f, "Out buffer is too small"),
            Error::AuthenticationFailed => {
                write!(f, "Message authentication failed")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<aead::Error> for Error {
    fn from(_: aead::Error) -> Self {
        Error::BufferTooSmall
    }
}
