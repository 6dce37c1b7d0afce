//! Error types.
use core::fmt;
#[cfg(feature = "std")]
use std::error;

/// Errors raised by the buffering engine, padding schemes and modes.
///
/// None of these are transient: every variant is the result of a programmer
/// or input error and retrying the same call yields the same result.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// `update`/`do_final` called before `init_mode`, or after `do_final`
    /// has already retired the session.
    Uninitialized,
    /// Key length is not accepted by the block cipher.
    InvalidKeyLength,
    /// IV is longer than the cipher block.
    InvalidIvLength,
    /// Nonce is empty or does not fit in one block next to its marker bit.
    InvalidNonceLength,
    /// AEAD mode configured without a tag length.
    MissingTagLength,
    /// Tag length exceeds the cipher block size.
    InvalidTagLength,
    /// The mode is not defined for the block size of the bound cipher.
    UnsupportedBlockSize,
    /// Unpadded input is not a whole number of blocks.
    IllegalLength,
    /// Padding bytes are inconsistent.
    InvalidPadding,
    /// Output buffer is shorter than the bytes the call will produce.
    OutputTooSmall,
    /// Computed authentication tag does not match the received one.
    AuthenticationFailure,
    /// Operation is only defined for the other session direction.
    WrongDirection,
}

impl Error {
    fn as_str(&self) -> &'static str {
        match self {
            Error::Uninitialized => "cipher session is not initialized",
            Error::InvalidKeyLength => "invalid key length",
            Error::InvalidIvLength => "IV is longer than the cipher block size",
            Error::InvalidNonceLength => "invalid nonce length",
            Error::MissingTagLength => "tag length must be set for AEAD modes",
            Error::InvalidTagLength => "tag length exceeds the cipher block size",
            Error::UnsupportedBlockSize => "mode does not support the cipher block size",
            Error::IllegalLength => "message length is not multiple of the cipher block size",
            Error::InvalidPadding => "invalid padding",
            Error::OutputTooSmall => "output buffer is too small",
            Error::AuthenticationFailure => "authentication tag mismatch",
            Error::WrongDirection => "operation not supported in this cipher direction",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "std")]
impl error::Error for Error {}
