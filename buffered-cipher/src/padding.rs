//! Block padding schemes.
use crate::Error;
use subtle::{Choice, ConstantTimeEq, ConstantTimeGreater, ConstantTimeLess};

/// Padding scheme applied to the final block of a padded mode.
pub trait Padding {
    /// Scheme name.
    fn name(&self) -> &'static str;

    /// Block size the scheme pads to.
    fn block_size(&self) -> usize;

    /// Write `src` followed by padding into the first `block_size` bytes of
    /// `dst`.
    ///
    /// # Errors
    /// [`Error::IllegalLength`] if `src` is not shorter than one block,
    /// [`Error::OutputTooSmall`] if `dst` is shorter than one block.
    fn pad(&self, dst: &mut [u8], src: &[u8]) -> Result<(), Error>;

    /// Strip padding from the block `src`, writing the message bytes to `dst`
    /// and returning their count.
    ///
    /// # Errors
    /// [`Error::InvalidPadding`] if the padding is malformed.
    fn unpad(&self, dst: &mut [u8], src: &[u8]) -> Result<usize, Error>;
}

/// PKCS#7 padding: `n` bytes of value `n`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Pkcs7 {
    block_size: usize,
}

impl Pkcs7 {
    /// Create padding for blocks of `block_size` bytes.
    ///
    /// # Panics
    /// If `block_size` is zero or does not fit in a pad byte.
    pub fn new(block_size: usize) -> Self {
        assert!(block_size > 0 && block_size <= u8::MAX as usize);
        Self { block_size }
    }
}

impl Padding for Pkcs7 {
    fn name(&self) -> &'static str {
        "PKCS7Padding"
    }

    fn block_size(&self) -> usize {
        self.block_size
    }

    fn pad(&self, dst: &mut [u8], src: &[u8]) -> Result<(), Error> {
        let bs = self.block_size;
        if src.len() >= bs {
            return Err(Error::IllegalLength);
        }
        if dst.len() < bs {
            return Err(Error::OutputTooSmall);
        }
        // bs <= 255, see `new`
        let pad = (bs - src.len()) as u8;
        dst[..src.len()].copy_from_slice(src);
        dst[src.len()..bs].fill(pad);
        Ok(())
    }

    fn unpad(&self, dst: &mut [u8], src: &[u8]) -> Result<usize, Error> {
        let bs = self.block_size;
        if src.len() != bs {
            return Err(Error::IllegalLength);
        }

        let pad = src[bs - 1];
        let bs16 = bs as u16;
        let pad16 = u16::from(pad);

        let mut valid: Choice = !pad.ct_eq(&0) & !pad16.ct_gt(&bs16);
        // every byte in the last `pad` positions must equal `pad`, without
        // branching on where the padding starts
        for (i, b) in src.iter().enumerate() {
            let in_pad = !(i as u16 + pad16).ct_lt(&bs16);
            valid &= !in_pad | b.ct_eq(&pad);
        }

        if !bool::from(valid) {
            return Err(Error::InvalidPadding);
        }

        let len = bs - usize::from(pad);
        if dst.len() < len {
            return Err(Error::OutputTooSmall);
        }
        dst[..len].copy_from_slice(&src[..len]);
        Ok(len)
    }
}
