//! Generic [Electronic Codebook (ECB)][1] mode implementation.
//!
//! Every block is passed through the block cipher independently. Without a
//! padding scheme the message must be a whole number of blocks; with one
//! (e.g. [`Pkcs7`]) the final block is padded on encryption and unpadded on
//! decryption.
//!
//! # Warning
//! ECB leaks equality of plaintext blocks and provides no authentication.
//! It exists for compatibility and as a building block only.
//!
//! # Examples
//! ```
//! use buffered_cipher::{BlockCipherInit, CipherAdapter, CipherDirection, Pkcs7};
//! use ecb_mode::{Ecb, EcbCore};
//! use hex_literal::hex;
//!
//! type Aes128Ecb = Ecb<CipherAdapter<aes::Aes128>>;
//!
//! let key = hex!("2B7E151628AED2A6ABF7158809CF4F3C");
//! let plaintext = hex!("6BC1BEE22E409F96E93D7E117393172A");
//!
//! let mut ecb = Aes128Ecb::new_from_slice(&key).unwrap();
//! ecb.init_mode(CipherDirection::Encrypt, &[]).unwrap();
//! let ciphertext = ecb.do_final_vec(&plaintext).unwrap();
//! assert_eq!(ciphertext, hex!("3AD77BB40D7A3660A89ECAF32466EF97"));
//!
//! // padded messages may have any length
//! let cipher = CipherAdapter::<aes::Aes128>::new_from_slice(&key).unwrap();
//! let core = EcbCore::with_padding(cipher, Pkcs7::new(16)).unwrap();
//! let mut ecb = Aes128Ecb::from_core(core);
//! ecb.init_mode(CipherDirection::Encrypt, &[]).unwrap();
//! let ciphertext = ecb.do_final_vec(b"hello").unwrap();
//! assert_eq!(ciphertext.len(), 16);
//!
//! ecb.init_mode(CipherDirection::Decrypt, &[]).unwrap();
//! assert_eq!(ecb.do_final_vec(&ciphertext).unwrap(), b"hello");
//! ```
//!
//! [1]: https://en.wikipedia.org/wiki/Block_cipher_mode_of_operation#ECB

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

extern crate alloc;

pub use buffered_cipher;
pub use buffered_cipher::Pkcs7;

use alloc::{boxed::Box, vec};
use buffered_cipher::{
    BlockCipher, BlockModeCore, BufferedBlockCipher, CipherDirection, Error, IvModeCore, Padding,
};

/// ECB mode over the block cipher `C`, with input buffering.
pub type Ecb<C> = BufferedBlockCipher<EcbCore<C>>;

/// ECB per-block transform.
pub struct EcbCore<C: BlockCipher> {
    cipher: C,
    direction: CipherDirection,
    padding: Option<Box<dyn Padding>>,
}

impl<C: BlockCipher> EcbCore<C> {
    /// ECB core which pads the final block with `padding`.
    ///
    /// # Errors
    /// [`Error::UnsupportedBlockSize`] if `padding` targets a different block
    /// size than `cipher`.
    pub fn with_padding<P: Padding + 'static>(cipher: C, padding: P) -> Result<Self, Error> {
        if padding.block_size() != cipher.block_size() {
            return Err(Error::UnsupportedBlockSize);
        }
        Ok(Self {
            cipher,
            direction: CipherDirection::Encrypt,
            padding: Some(Box::new(padding)),
        })
    }

    /// Name of the configured padding scheme, if any.
    pub fn padding_name(&self) -> Option<&'static str> {
        self.padding.as_ref().map(|p| p.name())
    }

    /// Whole blocks are flushed by `update`, so any residue is illegal.
    fn finalize_unpadded(pending: &[u8]) -> Result<usize, Error> {
        if pending.is_empty() {
            Ok(0)
        } else {
            Err(Error::IllegalLength)
        }
    }
}

impl<C: BlockCipher> BlockModeCore for EcbCore<C> {
    type Cipher = C;

    fn from_cipher(cipher: C) -> Self {
        Self {
            cipher,
            direction: CipherDirection::Encrypt,
            padding: None,
        }
    }

    fn cipher(&self) -> &C {
        &self.cipher
    }

    fn mode_name(&self) -> &'static str {
        "ECB"
    }

    #[inline]
    fn update_block(&mut self, out: &mut [u8], input: &[u8]) {
        out.copy_from_slice(input);
        match self.direction {
            CipherDirection::Encrypt => self.cipher.encrypt_block(out),
            CipherDirection::Decrypt => self.cipher.decrypt_block(out),
        }
    }

    fn finalize(&mut self, out: &mut [u8], pending: &[u8]) -> Result<usize, Error> {
        let Some(padding) = self.padding.as_deref() else {
            return Self::finalize_unpadded(pending);
        };

        let bs = self.cipher.block_size();
        let mut block = vec![0u8; bs];
        match self.direction {
            CipherDirection::Encrypt => {
                padding.pad(&mut block, pending)?;
                self.cipher.encrypt_block(&mut block);
                out[..bs].copy_from_slice(&block);
                Ok(bs)
            }
            CipherDirection::Decrypt => {
                if pending.len() != bs {
                    return Err(Error::IllegalLength);
                }
                block.copy_from_slice(pending);
                self.cipher.decrypt_block(&mut block);
                let res = padding.unpad(out, &block);
                block.fill(0);
                res
            }
        }
    }

    fn final_output_len(&self, pending: usize) -> usize {
        match (&self.padding, self.direction) {
            (Some(_), CipherDirection::Encrypt) => self.cipher.block_size(),
            _ => pending,
        }
    }

    fn retains_last_block(&self) -> bool {
        self.padding.is_some() && self.direction == CipherDirection::Decrypt
    }
}

impl<C: BlockCipher> IvModeCore for EcbCore<C> {
    fn init_mode(&mut self, direction: CipherDirection, _iv: &[u8]) -> Result<(), Error> {
        self.direction = direction;
        Ok(())
    }
}
