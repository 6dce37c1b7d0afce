//! One-block permutation contract and its binding to RustCrypto ciphers.
use crate::Error;
use alloc::{boxed::Box, format, string::String};
use core::{fmt, marker::PhantomData};

use cipher::{
    generic_array::GenericArray, typenum::Unsigned, AlgorithmName, BlockDecrypt, BlockEncrypt,
    KeyInit, KeySizeUser,
};

/// Keyed block cipher primitive.
///
/// Once keyed the primitive is stateless across blocks: all chaining state
/// lives in the mode. Both block methods work in place on exactly
/// [`block_size`](BlockCipher::block_size) bytes.
pub trait BlockCipher {
    /// Algorithm name, e.g. `Aes128`.
    fn name(&self) -> String;

    /// Key size in bytes.
    fn key_size(&self) -> usize;

    /// Block size in bytes.
    fn block_size(&self) -> usize;

    /// Encrypt one block in place.
    fn encrypt_block(&self, block: &mut [u8]);

    /// Decrypt one block in place.
    fn decrypt_block(&self, block: &mut [u8]);
}

/// Block cipher which can be keyed from a byte slice.
pub trait BlockCipherInit: BlockCipher + Sized {
    /// Derive the key schedule from `key`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidKeyLength`] if the cipher rejects the key.
    fn new_from_slice(key: &[u8]) -> Result<Self, Error>;
}

impl<T: BlockCipher + ?Sized> BlockCipher for &T {
    fn name(&self) -> String {
        (**self).name()
    }

    fn key_size(&self) -> usize {
        (**self).key_size()
    }

    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    #[inline]
    fn encrypt_block(&self, block: &mut [u8]) {
        (**self).encrypt_block(block)
    }

    #[inline]
    fn decrypt_block(&self, block: &mut [u8]) {
        (**self).decrypt_block(block)
    }
}

impl<T: BlockCipher + ?Sized> BlockCipher for Box<T> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn key_size(&self) -> usize {
        (**self).key_size()
    }

    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    #[inline]
    fn encrypt_block(&self, block: &mut [u8]) {
        (**self).encrypt_block(block)
    }

    #[inline]
    fn decrypt_block(&self, block: &mut [u8]) {
        (**self).decrypt_block(block)
    }
}

/// [`BlockCipher`] implementation for any RustCrypto block cipher.
///
/// ```
/// use buffered_cipher::{BlockCipher, BlockCipherInit, CipherAdapter};
/// use hex_literal::hex;
///
/// let aes128 = CipherAdapter::<aes::Aes128>::new_from_slice(&hex!("2B7E151628AED2A6ABF7158809CF4F3C")).unwrap();
/// let mut block = hex!("3243F6A8885A308D313198A2E0370734");
/// aes128.encrypt_block(&mut block);
/// assert_eq!(block, hex!("3925841D02DC09FBDC118597196A0B32"));
/// ```
#[derive(Clone)]
pub struct CipherAdapter<C> {
    inner: C,
}

impl<C> CipherAdapter<C> {
    /// Wrap an already keyed cipher.
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    /// Wrapped cipher.
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C> fmt::Debug for CipherAdapter<C>
where
    C: AlgorithmName,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CipherAdapter<")?;
        C::write_alg_name(f)?;
        f.write_str("> { ... }")
    }
}

struct AlgName<C>(PhantomData<C>);

impl<C: AlgorithmName> fmt::Display for AlgName<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        C::write_alg_name(f)
    }
}

impl<C> BlockCipher for CipherAdapter<C>
where
    C: BlockEncrypt + BlockDecrypt + KeySizeUser + AlgorithmName,
{
    fn name(&self) -> String {
        format!("{}", AlgName::<C>(PhantomData))
    }

    fn key_size(&self) -> usize {
        C::KeySize::USIZE
    }

    fn block_size(&self) -> usize {
        C::BlockSize::USIZE
    }

    #[inline]
    fn encrypt_block(&self, block: &mut [u8]) {
        BlockEncrypt::encrypt_block(&self.inner, GenericArray::from_mut_slice(block));
    }

    #[inline]
    fn decrypt_block(&self, block: &mut [u8]) {
        BlockDecrypt::decrypt_block(&self.inner, GenericArray::from_mut_slice(block));
    }
}

impl<C> BlockCipherInit for CipherAdapter<C>
where
    C: BlockEncrypt + BlockDecrypt + KeyInit + AlgorithmName,
{
    fn new_from_slice(key: &[u8]) -> Result<Self, Error> {
        C::new_from_slice(key)
            .map(Self::new)
            .map_err(|_| Error::InvalidKeyLength)
    }
}
