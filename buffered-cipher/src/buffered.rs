//! Buffering engine for block modes without associated data.
use crate::{BlockCipher, BlockCipherInit, CipherDirection, Error};
use alloc::{format, string::String, vec, vec::Vec};
use core::cmp;

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// Per-block transform of a mode of operation.
///
/// The core never sees partial blocks during streaming: the wrapper hands it
/// whole blocks through [`update_block`](BlockModeCore::update_block) and
/// the sub-block remainder once, at [`finalize`](BlockModeCore::finalize).
pub trait BlockModeCore {
    /// Underlying block cipher.
    type Cipher: BlockCipher;

    /// Bind a keyed block cipher.
    fn from_cipher(cipher: Self::Cipher) -> Self;

    /// Bound block cipher.
    fn cipher(&self) -> &Self::Cipher;

    /// Short mode name, e.g. `"CTR"`.
    fn mode_name(&self) -> &'static str;

    /// Transform exactly one block from `input` into `out`.
    fn update_block(&mut self, out: &mut [u8], input: &[u8]);

    /// Flush the session given the `pending` bytes still buffered.
    ///
    /// Returns the number of bytes written to `out`.
    ///
    /// # Errors
    /// Mode specific, e.g. [`Error::IllegalLength`] for unpadded ECB.
    fn finalize(&mut self, out: &mut [u8], pending: &[u8]) -> Result<usize, Error>;

    /// Upper bound on the bytes [`finalize`](BlockModeCore::finalize)
    /// writes for `pending` buffered bytes.
    fn final_output_len(&self, pending: usize) -> usize;

    /// Keep the last whole block buffered until finalization.
    ///
    /// Needed by modes which must inspect the final block, e.g. padded
    /// decryption.
    fn retains_last_block(&self) -> bool {
        false
    }

    /// Block size of the bound cipher.
    fn block_size(&self) -> usize {
        self.cipher().block_size()
    }
}

/// Mode configured by a direction and an IV.
pub trait IvModeCore: BlockModeCore {
    /// Start a new session. Modes without an IV ignore `iv`.
    ///
    /// # Errors
    /// Mode specific, e.g. [`Error::InvalidIvLength`].
    fn init_mode(&mut self, direction: CipherDirection, iv: &[u8]) -> Result<(), Error>;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Session {
    Unconfigured,
    Active,
    Retired,
}

/// Input bytes not yet forming a whole block.
#[derive(Clone, Debug, Default)]
pub(crate) struct Pending {
    bytes: Vec<u8>,
}

impl Pending {
    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn clear(&mut self) {
        #[cfg(feature = "zeroize")]
        self.bytes.zeroize();
        self.bytes.clear();
    }

    /// Bytes the next `process` call writes for `input_len` more input.
    pub(crate) fn output_len(&self, input_len: usize, bs: usize, retain: bool) -> usize {
        let total = self.bytes.len() + input_len;
        let kept = match (retain, total) {
            (_, 0) => 0,
            (true, _) => (total - 1) % bs + 1,
            (false, _) => total % bs,
        };
        total - kept
    }

    /// Feed `input`, running every completed block through `core`.
    pub(crate) fn process<M: BlockModeCore>(
        &mut self,
        core: &mut M,
        out: &mut [u8],
        mut input: &[u8],
    ) -> usize {
        let bs = core.block_size();
        let retain = core.retains_last_block();
        let mut written = 0;

        if !self.bytes.is_empty() {
            let take = cmp::min(bs - self.bytes.len(), input.len());
            let (head, rest) = input.split_at(take);
            self.bytes.extend_from_slice(head);
            input = rest;

            if self.bytes.len() < bs || (retain && input.is_empty()) {
                return 0;
            }
            core.update_block(&mut out[..bs], &self.bytes);
            self.clear();
            written = bs;
        }

        while input.len() > bs || (input.len() == bs && !retain) {
            let (block, rest) = input.split_at(bs);
            core.update_block(&mut out[written..written + bs], block);
            written += bs;
            input = rest;
        }

        self.bytes.extend_from_slice(input);
        written
    }
}

/// Streaming wrapper around a [`BlockModeCore`].
///
/// Accepts input in arbitrarily sized chunks; output is produced one whole
/// block at a time and the remainder is flushed by
/// [`do_final`](BufferedBlockCipher::do_final). Between calls fewer than
/// one block of input is held (exactly one block for cores which
/// [retain](BlockModeCore::retains_last_block) the final block).
///
/// A session is not safe to share between threads; use one instance per
/// message. The bound cipher may be a reference, so several sessions can
/// share one key schedule.
#[derive(Clone, Debug)]
pub struct BufferedBlockCipher<M: BlockModeCore> {
    core: M,
    pending: Pending,
    session: Session,
}

impl<M: BlockModeCore> BufferedBlockCipher<M> {
    /// Bind an already keyed block cipher.
    pub fn new(cipher: M::Cipher) -> Self {
        Self::from_core(M::from_cipher(cipher))
    }

    /// Key a new block cipher instance and bind it.
    ///
    /// # Errors
    /// [`Error::InvalidKeyLength`] if the cipher rejects `key`.
    pub fn new_from_slice(key: &[u8]) -> Result<Self, Error>
    where
        M::Cipher: BlockCipherInit,
    {
        <M::Cipher as BlockCipherInit>::new_from_slice(key).map(Self::new)
    }

    /// Wrap a configured mode core.
    pub fn from_core(core: M) -> Self {
        Self {
            core,
            pending: Pending::default(),
            session: Session::Unconfigured,
        }
    }

    /// Mode core.
    pub fn core(&self) -> &M {
        &self.core
    }

    /// Full algorithm name, e.g. `"CTR/Aes128"`.
    pub fn name(&self) -> String {
        format!("{}/{}", self.core.mode_name(), self.core.cipher().name())
    }

    /// Block size of the bound cipher.
    pub fn block_size(&self) -> usize {
        self.core.block_size()
    }

    /// Bytes the next [`update`](Self::update) writes for `input_len` bytes
    /// of input.
    pub fn update_output_len(&self, input_len: usize) -> usize {
        let bs = self.core.block_size();
        self.pending.output_len(input_len, bs, self.core.retains_last_block())
    }

    /// Upper bound on the bytes the next [`do_final`](Self::do_final)
    /// writes.
    pub fn final_output_len(&self) -> usize {
        self.core.final_output_len(self.pending.as_slice().len())
    }

    /// Process a chunk of input, returning the number of bytes written to
    /// `out`.
    ///
    /// # Errors
    /// [`Error::Uninitialized`] outside of an active session,
    /// [`Error::OutputTooSmall`] if `out` is shorter than
    /// [`update_output_len`](Self::update_output_len).
    pub fn update(&mut self, out: &mut [u8], input: &[u8]) -> Result<usize, Error> {
        self.check_active()?;
        if out.len() < self.update_output_len(input.len()) {
            return Err(Error::OutputTooSmall);
        }
        Ok(self.pending.process(&mut self.core, out, input))
    }

    /// Flush the remaining input and retire the session.
    ///
    /// # Errors
    /// [`Error::Uninitialized`] outside of an active session,
    /// [`Error::OutputTooSmall`] if `out` is shorter than
    /// [`final_output_len`](Self::final_output_len), otherwise mode
    /// specific.
    pub fn do_final(&mut self, out: &mut [u8]) -> Result<usize, Error> {
        self.check_active()?;
        if out.len() < self.final_output_len() {
            return Err(Error::OutputTooSmall);
        }
        self.session = Session::Retired;
        let res = self.core.finalize(out, self.pending.as_slice());
        self.pending.clear();
        res
    }

    /// [`update`](Self::update) with `input` followed by
    /// [`do_final`](Self::do_final), both writing into `out`.
    ///
    /// # Errors
    /// See [`update`](Self::update) and [`do_final`](Self::do_final).
    pub fn do_final_with(&mut self, out: &mut [u8], input: &[u8]) -> Result<usize, Error> {
        let n = self.update(out, input)?;
        let m = self.do_final(&mut out[n..])?;
        Ok(n + m)
    }

    /// Run [`do_final_with`](Self::do_final_with) into a new vector.
    ///
    /// # Errors
    /// See [`do_final`](Self::do_final).
    pub fn do_final_vec(&mut self, input: &[u8]) -> Result<Vec<u8>, Error> {
        self.check_active()?;
        let n = self.update_output_len(input.len());
        let kept = self.pending.as_slice().len() + input.len() - n;
        let mut out = vec![0u8; n + self.core.final_output_len(kept)];
        let len = self.do_final_with(&mut out, input)?;
        out.truncate(len);
        Ok(out)
    }

    fn check_active(&self) -> Result<(), Error> {
        match self.session {
            Session::Active => Ok(()),
            Session::Unconfigured | Session::Retired => Err(Error::Uninitialized),
        }
    }
}

impl<M: IvModeCore> BufferedBlockCipher<M> {
    /// Start a new session, discarding any buffered input.
    ///
    /// # Errors
    /// Mode specific, see [`IvModeCore::init_mode`].
    pub fn init_mode(&mut self, direction: CipherDirection, iv: &[u8]) -> Result<(), Error> {
        self.pending.clear();
        self.session = Session::Unconfigured;
        self.core.init_mode(direction, iv)?;
        self.session = Session::Active;
        Ok(())
    }
}

#[cfg(feature = "zeroize")]
impl Drop for Pending {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}
