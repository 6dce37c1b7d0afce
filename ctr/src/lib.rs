//! Generic implementation of [CTR mode][1] over a block cipher of any block
//! size.
//!
//! The counter is one full block, big endian, loaded from the IV
//! left-aligned and zero extended. Each block of keystream is the
//! encryption of the current counter; the counter then increments with
//! wraparound at the top. Encryption and decryption are the same operation.
//!
//! # Security Warning
//! This crate does not ensure ciphertexts are authentic! Thus ciphertext
//! integrity is not verified, which can lead to serious vulnerabilities!
//!
//! # Examples
//! ```
//! use buffered_cipher::{CipherAdapter, CipherDirection};
//! use ctr_mode::Ctr;
//!
//! type Aes128Ctr = Ctr<CipherAdapter<aes::Aes128>>;
//!
//! let key = [0x42; 16];
//! let iv = [0x24; 16];
//! let plaintext = *b"hello world! this is my plaintext.";
//!
//! let mut cipher = Aes128Ctr::new_from_slice(&key).unwrap();
//! cipher.init_mode(CipherDirection::Encrypt, &iv).unwrap();
//! let ciphertext = cipher.do_final_vec(&plaintext).unwrap();
//! assert_eq!(ciphertext.len(), plaintext.len());
//!
//! // CTR is self-inverse
//! cipher.init_mode(CipherDirection::Decrypt, &iv).unwrap();
//! assert_eq!(cipher.do_final_vec(&ciphertext).unwrap(), plaintext);
//! ```
//!
//! [1]: https://en.wikipedia.org/wiki/Block_cipher_mode_of_operation#CTR

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

extern crate alloc;

pub use buffered_cipher;

use alloc::{vec, vec::Vec};
use buffered_cipher::{
    xor_into, BlockCipher, BlockModeCore, BufferedBlockCipher, CipherDirection, Error, IvModeCore,
};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// CTR mode over the block cipher `C`, with input buffering.
pub type Ctr<C> = BufferedBlockCipher<CtrCore<C>>;

/// CTR keystream generator.
pub struct CtrCore<C: BlockCipher> {
    cipher: C,
    counter: Vec<u8>,
    block: Vec<u8>,
}

impl<C: BlockCipher> CtrCore<C> {
    /// Current counter block.
    pub fn counter(&self) -> &[u8] {
        &self.counter
    }

    /// Encrypt the counter into `self.block` and step the counter.
    #[inline(always)]
    fn generate_block(&mut self) {
        self.block.copy_from_slice(&self.counter);
        self.cipher.encrypt_block(&mut self.block);
        increment(&mut self.counter);
    }
}

/// Big endian increment with wraparound.
#[inline(always)]
fn increment(counter: &mut [u8]) {
    for b in counter.iter_mut().rev() {
        *b = b.wrapping_add(1);
        if *b != 0 {
            break;
        }
    }
}

impl<C: BlockCipher> BlockModeCore for CtrCore<C> {
    type Cipher = C;

    fn from_cipher(cipher: C) -> Self {
        Self {
            cipher,
            counter: Vec::new(),
            block: Vec::new(),
        }
    }

    fn cipher(&self) -> &C {
        &self.cipher
    }

    fn mode_name(&self) -> &'static str {
        "CTR"
    }

    #[inline]
    fn update_block(&mut self, out: &mut [u8], input: &[u8]) {
        self.generate_block();
        xor_into(out, input, &self.block);
    }

    fn finalize(&mut self, out: &mut [u8], pending: &[u8]) -> Result<usize, Error> {
        let n = pending.len();
        if n != 0 {
            self.generate_block();
            xor_into(&mut out[..n], pending, &self.block[..n]);
        }
        Ok(n)
    }

    fn final_output_len(&self, pending: usize) -> usize {
        pending
    }
}

impl<C: BlockCipher> IvModeCore for CtrCore<C> {
    fn init_mode(&mut self, _direction: CipherDirection, iv: &[u8]) -> Result<(), Error> {
        let bs = self.cipher.block_size();
        if iv.len() > bs {
            return Err(Error::InvalidIvLength);
        }
        #[cfg(feature = "zeroize")]
        {
            self.counter.zeroize();
            self.block.zeroize();
        }

        self.counter = vec![0; bs];
        self.counter[..iv.len()].copy_from_slice(iv);
        self.block = vec![0; bs];
        Ok(())
    }
}

#[cfg(feature = "zeroize")]
impl<C: BlockCipher> Drop for CtrCore<C> {
    fn drop(&mut self) {
        self.counter.zeroize();
        self.block.zeroize();
    }
}
