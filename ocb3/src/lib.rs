//! [OCB3][1] authenticated encryption with associated data, over block
//! ciphers with 128- or 256-bit blocks.
//!
//! The output of a session is the ciphertext followed by the tag. Nonces
//! are `1..block_size` bytes and must never repeat under one key. The nonce
//! block is `0..0 || 0x01 || nonce` without a tag length prefix, which is
//! the RFC 7253 encoding for full-width tags.
//!
//! Associated data and message data are authenticated with independent
//! offset sequences drawn from one lazily grown `L` table, so
//! [`update_aad`](Ocb3::update_aad) and [`update`](Ocb3::update) calls may
//! interleave freely.
//!
//! # Examples
//! ```
//! use buffered_cipher::{CipherAdapter, CipherDirection};
//! use hex_literal::hex;
//! use ocb3::Ocb3;
//!
//! type Aes128Ocb3 = Ocb3<CipherAdapter<aes::Aes128>>;
//!
//! let key = hex!("000102030405060708090A0B0C0D0E0F");
//! let nonce = hex!("BBAA99887766554433221101");
//! let data = hex!("0001020304050607");
//!
//! let mut ocb = Aes128Ocb3::new_from_slice(&key)?;
//! ocb.init_mode(CipherDirection::Encrypt, &nonce, 16)?;
//! ocb.update_aad(&data)?;
//! let sealed = ocb.do_final_vec(&data)?;
//! assert_eq!(sealed, hex!("6820B3657B6F615A5725BDA0D3B4EB3A257C9AF1F8F03009"));
//!
//! let (ciphertext, tag) = sealed.split_at(data.len());
//! ocb.init_mode(CipherDirection::Decrypt, &nonce, 16)?;
//! ocb.update_aad(&data)?;
//! let mut buf = [0u8; 8];
//! let n = ocb.update(&mut buf, ciphertext)?;
//! let n = n + ocb.do_final_verify(&mut buf[n..], tag)?;
//! assert_eq!(buf[..n], data);
//! # Ok::<(), buffered_cipher::Error>(())
//! ```
//!
//! [1]: https://www.rfc-editor.org/rfc/rfc7253

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

extern crate alloc;

mod field;

pub use buffered_cipher;

use alloc::{vec, vec::Vec};
use buffered_cipher::{
    xor, xor_into, AeadModeCore, BlockCipher, BlockModeCore, BufferedBlockCipherAead,
    CipherDirection, Error,
};
use core::{cmp, mem};
use field::{advance, bit_window, Field, LTable};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// OCB3 over the block cipher `C`, with input buffering.
pub type Ocb3<C> = BufferedBlockCipherAead<Ocb3Core<C>>;

/// OCB3 offset, checksum and authentication state.
pub struct Ocb3Core<C: BlockCipher> {
    cipher: C,
    direction: CipherDirection,
    field: Field,
    tag_len: usize,
    l_star: Vec<u8>,
    l_dollar: Vec<u8>,
    l: LTable,
    offset: Vec<u8>,
    index: u64,
    aad_offset: Vec<u8>,
    aad_index: u64,
    aad_pending: Vec<u8>,
    checksum: Vec<u8>,
    auth: Vec<u8>,
}

impl<C: BlockCipher> Ocb3Core<C> {
    /// Fold one full block of associated data into the accumulator.
    fn hash_block(&mut self, block: &[u8]) {
        advance(&self.field, &mut self.l, &mut self.aad_index, &mut self.aad_offset);
        let mut buf = vec![0u8; block.len()];
        xor_into(&mut buf, block, &self.aad_offset);
        self.cipher.encrypt_block(&mut buf);
        xor(&mut self.auth, &buf);
    }

    /// Fold the buffered partial block of associated data, if any.
    fn hash_final(&mut self) {
        if self.aad_pending.is_empty() {
            return;
        }
        let bs = self.block_size();
        let mut buf = mem::take(&mut self.aad_pending);
        let n = buf.len();
        buf.resize(bs, 0);
        buf[n] = 0x80;

        xor(&mut self.aad_offset, &self.l_star);
        xor(&mut buf, &self.aad_offset);
        self.cipher.encrypt_block(&mut buf);
        xor(&mut self.auth, &buf);
    }

    /// Derive the initial message offset from the nonce.
    fn nonce_offset(&self, nonce: &[u8]) -> Vec<u8> {
        let bs = self.block_size();
        let mut block = vec![0u8; bs];
        block[bs - nonce.len() - 1] = 0x01;
        block[bs - nonce.len()..].copy_from_slice(nonce);

        let [hi, lo] = self.field.mask;
        let mut top = block.clone();
        top[bs - 2] &= !hi;
        top[bs - 1] &= !lo;
        self.cipher.encrypt_block(&mut top);
        let bottom = (usize::from(block[bs - 2] & hi) << 8) | usize::from(block[bs - 1] & lo);

        // stretch = top || (top ^ (top << shift))
        let mut stretch = vec![0u8; 2 * bs];
        bit_window(&top, self.field.shift, &mut stretch[bs..]);
        xor(&mut stretch[bs..], &top);
        stretch[..bs].copy_from_slice(&top);

        let mut offset = vec![0u8; bs];
        bit_window(&stretch, bottom, &mut offset);
        offset
    }

    fn reset(&mut self) {
        #[cfg(feature = "zeroize")]
        self.wipe();

        let bs = self.block_size();
        self.aad_pending.clear();
        self.aad_offset = vec![0; bs];
        self.checksum = vec![0; bs];
        self.auth = vec![0; bs];
        self.index = 0;
        self.aad_index = 0;
    }

    #[cfg(feature = "zeroize")]
    fn wipe(&mut self) {
        self.l_star.zeroize();
        self.l_dollar.zeroize();
        self.l.zeroize();
        self.offset.zeroize();
        self.aad_offset.zeroize();
        self.aad_pending.zeroize();
        self.checksum.zeroize();
        self.auth.zeroize();
    }
}

impl<C: BlockCipher> BlockModeCore for Ocb3Core<C> {
    type Cipher = C;

    fn from_cipher(cipher: C) -> Self {
        Self {
            cipher,
            direction: CipherDirection::Encrypt,
            field: Field::GF128,
            tag_len: 0,
            l_star: Vec::new(),
            l_dollar: Vec::new(),
            l: LTable::default(),
            offset: Vec::new(),
            index: 0,
            aad_offset: Vec::new(),
            aad_index: 0,
            aad_pending: Vec::new(),
            checksum: Vec::new(),
            auth: Vec::new(),
        }
    }

    fn cipher(&self) -> &C {
        &self.cipher
    }

    fn mode_name(&self) -> &'static str {
        "OCB3"
    }

    fn update_block(&mut self, out: &mut [u8], input: &[u8]) {
        advance(&self.field, &mut self.l, &mut self.index, &mut self.offset);
        xor_into(out, input, &self.offset);
        match self.direction {
            CipherDirection::Encrypt => {
                self.cipher.encrypt_block(out);
                xor(out, &self.offset);
                xor(&mut self.checksum, input);
            }
            CipherDirection::Decrypt => {
                self.cipher.decrypt_block(out);
                xor(out, &self.offset);
                xor(&mut self.checksum, out);
            }
        }
    }

    fn finalize(&mut self, out: &mut [u8], pending: &[u8]) -> Result<usize, Error> {
        self.hash_final();

        let n = pending.len();
        if n != 0 {
            xor(&mut self.offset, &self.l_star);
            let mut pad = self.offset.clone();
            self.cipher.encrypt_block(&mut pad);
            xor_into(&mut out[..n], pending, &pad[..n]);

            let plaintext = match self.direction {
                CipherDirection::Encrypt => pending,
                CipherDirection::Decrypt => &out[..n],
            };
            xor(&mut self.checksum[..n], plaintext);
            self.checksum[n] ^= 0x80;
            pad.fill(0);
        }

        let mut tag = self.checksum.clone();
        xor(&mut tag, &self.offset);
        xor(&mut tag, &self.l_dollar);
        self.cipher.encrypt_block(&mut tag);
        xor(&mut tag, &self.auth);

        out[n..n + self.tag_len].copy_from_slice(&tag[..self.tag_len]);
        Ok(n + self.tag_len)
    }

    fn final_output_len(&self, pending: usize) -> usize {
        pending + self.tag_len
    }
}

impl<C: BlockCipher> AeadModeCore for Ocb3Core<C> {
    fn init_mode(
        &mut self,
        direction: CipherDirection,
        nonce: &[u8],
        tag_len: usize,
    ) -> Result<(), Error> {
        if tag_len == 0 {
            return Err(Error::MissingTagLength);
        }
        let bs = self.block_size();
        self.field = Field::for_block_size(bs).ok_or(Error::UnsupportedBlockSize)?;
        if tag_len > bs {
            return Err(Error::InvalidTagLength);
        }
        if nonce.is_empty() || nonce.len() >= bs {
            return Err(Error::InvalidNonceLength);
        }

        self.reset();
        self.direction = direction;
        self.tag_len = tag_len;

        let mut l_star = vec![0u8; bs];
        self.cipher.encrypt_block(&mut l_star);
        let mut l_dollar = l_star.clone();
        self.field.double(&mut l_dollar);
        let mut l0 = l_dollar.clone();
        self.field.double(&mut l0);

        self.l_star = l_star;
        self.l_dollar = l_dollar;
        self.l = LTable::new(l0);
        self.offset = self.nonce_offset(nonce);
        Ok(())
    }

    fn update_aad(&mut self, mut aad: &[u8]) {
        let bs = self.block_size();

        if !self.aad_pending.is_empty() {
            let take = cmp::min(bs - self.aad_pending.len(), aad.len());
            let (head, rest) = aad.split_at(take);
            self.aad_pending.extend_from_slice(head);
            aad = rest;

            if self.aad_pending.len() < bs {
                return;
            }
            let block = mem::take(&mut self.aad_pending);
            self.hash_block(&block);
        }

        while aad.len() >= bs {
            let (block, rest) = aad.split_at(bs);
            self.hash_block(block);
            aad = rest;
        }
        self.aad_pending.extend_from_slice(aad);
    }

    fn tag_len(&self) -> usize {
        self.tag_len
    }

    fn direction(&self) -> CipherDirection {
        self.direction
    }
}

#[cfg(feature = "zeroize")]
impl<C: BlockCipher> Drop for Ocb3Core<C> {
    fn drop(&mut self) {
        self.wipe();
    }
}
