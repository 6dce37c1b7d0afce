//! Byte-stream buffering engine for block cipher [modes of operation][1].
//!
//! A block cipher only knows how to permute exactly one block. This crate
//! turns such a primitive into a cipher that accepts input of any length,
//! split across any number of calls:
//!
//! - [`BlockCipher`] is the one-block primitive contract. Any RustCrypto
//!   cipher (e.g. `aes::Aes128`) can be plugged in through [`CipherAdapter`].
//! - [`BlockModeCore`] is implemented by a mode (ECB, CTR, ...) and only
//!   ever sees whole blocks plus the final remainder.
//! - [`BufferedBlockCipher`] and [`BufferedBlockCipherAead`] hold the
//!   pending partial block and drive the core.
//!
//! # Examples
//! ```
//! use buffered_cipher::{
//!     BlockCipher, BlockModeCore, BufferedBlockCipher, CipherAdapter, CipherDirection,
//!     Error, IvModeCore,
//! };
//!
//! /// Toy mode that passes blocks through the raw cipher.
//! struct Raw<C: BlockCipher>(C);
//!
//! impl<C: BlockCipher> BlockModeCore for Raw<C> {
//!     type Cipher = C;
//!
//!     fn from_cipher(cipher: C) -> Self {
//!         Raw(cipher)
//!     }
//!     fn cipher(&self) -> &C {
//!         &self.0
//!     }
//!     fn mode_name(&self) -> &'static str {
//!         "RAW"
//!     }
//!     fn update_block(&mut self, out: &mut [u8], input: &[u8]) {
//!         out.copy_from_slice(input);
//!         self.0.encrypt_block(out);
//!     }
//!     fn finalize(&mut self, _out: &mut [u8], pending: &[u8]) -> Result<usize, Error> {
//!         if pending.is_empty() { Ok(0) } else { Err(Error::IllegalLength) }
//!     }
//!     fn final_output_len(&self, _pending: usize) -> usize {
//!         0
//!     }
//! }
//!
//! impl<C: BlockCipher> IvModeCore for Raw<C> {
//!     fn init_mode(&mut self, _direction: CipherDirection, _iv: &[u8]) -> Result<(), Error> {
//!         Ok(())
//!     }
//! }
//!
//! let mut raw = BufferedBlockCipher::<Raw<CipherAdapter<aes::Aes128>>>::new_from_slice(&[0; 16])?;
//! raw.init_mode(CipherDirection::Encrypt, &[])?;
//!
//! let mut out = [0u8; 32];
//! // nothing is produced until a whole block is available
//! assert_eq!(raw.update(&mut out, &[1; 10])?, 0);
//! assert_eq!(raw.update(&mut out, &[1; 22])?, 32);
//! assert_eq!(raw.do_final(&mut out)?, 0);
//! # Ok::<(), Error>(())
//! ```
//!
//! [1]: https://en.wikipedia.org/wiki/Block_cipher_mode_of_operation

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use cipher;
pub use subtle;
#[cfg(feature = "zeroize")]
pub use zeroize;

mod aead;
mod block;
mod buffered;
mod errors;
mod padding;

pub use aead::{AeadModeCore, BufferedBlockCipherAead};
pub use block::{BlockCipher, BlockCipherInit, CipherAdapter};
pub use buffered::{BlockModeCore, BufferedBlockCipher, IvModeCore};
pub use errors::Error;
pub use padding::{Padding, Pkcs7};

/// Direction of a mode session, fixed by `init_mode`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CipherDirection {
    /// Plaintext in, ciphertext out.
    Encrypt,
    /// Ciphertext in, plaintext out.
    Decrypt,
}

/// XOR `other` into `buf`.
#[inline(always)]
pub fn xor(buf: &mut [u8], other: &[u8]) {
    debug_assert_eq!(buf.len(), other.len());
    for (a, b) in buf.iter_mut().zip(other) {
        *a ^= *b;
    }
}

/// Write `lhs ^ rhs` into `out`.
#[inline(always)]
pub fn xor_into(out: &mut [u8], lhs: &[u8], rhs: &[u8]) {
    debug_assert_eq!(out.len(), lhs.len());
    debug_assert_eq!(out.len(), rhs.len());
    for ((o, a), b) in out.iter_mut().zip(lhs).zip(rhs) {
        *o = *a ^ *b;
    }
}
