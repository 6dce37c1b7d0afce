//! Buffering engine for AEAD modes.
use crate::{
    buffered::{Pending, Session},
    BlockCipher, BlockCipherInit, BlockModeCore, CipherDirection, Error,
};
use alloc::{format, string::String, vec, vec::Vec};
use subtle::ConstantTimeEq;

/// Block mode with an associated data channel and an authentication tag.
///
/// [`finalize`](BlockModeCore::finalize) writes the final message bytes
/// followed by [`tag_len`](AeadModeCore::tag_len) bytes of tag, in both
/// directions.
pub trait AeadModeCore: BlockModeCore {
    /// Start a new session.
    ///
    /// # Errors
    /// [`Error::MissingTagLength`] if `tag_len` is zero, otherwise mode
    /// specific nonce and tag length checks.
    fn init_mode(
        &mut self,
        direction: CipherDirection,
        nonce: &[u8],
        tag_len: usize,
    ) -> Result<(), Error>;

    /// Authenticate a chunk of associated data.
    fn update_aad(&mut self, aad: &[u8]);

    /// Tag length of the current session.
    fn tag_len(&self) -> usize;

    /// Direction of the current session.
    fn direction(&self) -> CipherDirection;
}

/// Streaming wrapper around an [`AeadModeCore`].
///
/// Associated data may be supplied in any number of
/// [`update_aad`](Self::update_aad) calls and message bytes in any number of
/// [`update`](Self::update) calls. The wrapper also counts message bytes so
/// callers can frame `ciphertext || tag` without tracking lengths
/// themselves.
#[derive(Clone, Debug)]
pub struct BufferedBlockCipherAead<M: AeadModeCore> {
    core: M,
    pending: Pending,
    session: Session,
    message_len: u64,
}

impl<M: AeadModeCore> BufferedBlockCipherAead<M> {
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

    /// Wrap a mode core.
    pub fn from_core(core: M) -> Self {
        Self {
            core,
            pending: Pending::default(),
            session: Session::Unconfigured,
            message_len: 0,
        }
    }

    /// Mode core.
    pub fn core(&self) -> &M {
        &self.core
    }

    /// Full algorithm name, e.g. `"OCB3/Aes128"`.
    pub fn name(&self) -> String {
        format!("{}/{}", self.core.mode_name(), self.core.cipher().name())
    }

    /// Block size of the bound cipher.
    pub fn block_size(&self) -> usize {
        self.core.block_size()
    }

    /// Tag length of the current session.
    pub fn tag_len(&self) -> usize {
        self.core.tag_len()
    }

    /// Message bytes accepted by [`update`](Self::update) in this session.
    pub fn message_len(&self) -> u64 {
        self.message_len
    }

    /// Start a new session, discarding any buffered input.
    ///
    /// # Errors
    /// See [`AeadModeCore::init_mode`].
    pub fn init_mode(
        &mut self,
        direction: CipherDirection,
        nonce: &[u8],
        tag_len: usize,
    ) -> Result<(), Error> {
        self.pending.clear();
        self.message_len = 0;
        self.session = Session::Unconfigured;
        self.core.init_mode(direction, nonce, tag_len)?;
        self.session = Session::Active;
        Ok(())
    }

    /// Authenticate a chunk of associated data.
    ///
    /// # Errors
    /// [`Error::Uninitialized`] outside of an active session.
    pub fn update_aad(&mut self, aad: &[u8]) -> Result<(), Error> {
        self.check_active()?;
        self.core.update_aad(aad);
        Ok(())
    }

    /// Bytes the next [`update`](Self::update) writes for `input_len` bytes
    /// of input.
    pub fn update_output_len(&self, input_len: usize) -> usize {
        let bs = self.core.block_size();
        self.pending.output_len(input_len, bs, self.core.retains_last_block())
    }

    /// Bytes the next [`do_final`](Self::do_final) writes, tag included.
    pub fn final_output_len(&self) -> usize {
        self.core.final_output_len(self.pending.as_slice().len())
    }

    /// Process a chunk of the message, returning the number of bytes written
    /// to `out`.
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
        self.message_len += input.len() as u64;
        Ok(self.pending.process(&mut self.core, out, input))
    }

    /// Flush the message remainder followed by the tag and retire the
    /// session.
    ///
    /// When decrypting, the trailing tag bytes are the tag computed over the
    /// recovered plaintext; comparing it against the received tag is up to
    /// the caller, or use [`do_final_verify`](Self::do_final_verify).
    ///
    /// # Errors
    /// [`Error::Uninitialized`] outside of an active session,
    /// [`Error::OutputTooSmall`] if `out` is shorter than
    /// [`final_output_len`](Self::final_output_len).
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

    /// Run [`do_final_with`](Self::do_final_with) into a new vector holding
    /// `message || tag`.
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

    /// Flush the message remainder and check the computed tag against
    /// `tag` in constant time.
    ///
    /// Only the message bytes are written to `out` and their count returned.
    /// Nothing is written when the tag does not match. Output of earlier
    /// [`update`](Self::update) calls must not be trusted until this
    /// returns `Ok`.
    ///
    /// # Errors
    /// [`Error::AuthenticationFailure`] on a tag mismatch,
    /// [`Error::WrongDirection`] for an encrypting session,
    /// [`Error::OutputTooSmall`] if `out` cannot hold the remainder,
    /// otherwise as [`do_final`](Self::do_final).
    pub fn do_final_verify(&mut self, out: &mut [u8], tag: &[u8]) -> Result<usize, Error> {
        self.check_active()?;
        if self.core.direction() != CipherDirection::Decrypt {
            return Err(Error::WrongDirection);
        }
        let tag_len = self.core.tag_len();
        let mut buf = vec![0u8; self.final_output_len()];
        if out.len() + tag_len < buf.len() {
            return Err(Error::OutputTooSmall);
        }

        let len = self.do_final(&mut buf)?;
        let (msg, computed) = buf[..len].split_at(len - tag_len);
        if !bool::from(computed.ct_eq(tag)) {
            buf.fill(0);
            return Err(Error::AuthenticationFailure);
        }

        out[..msg.len()].copy_from_slice(msg);
        let n = msg.len();
        buf.fill(0);
        Ok(n)
    }

    fn check_active(&self) -> Result<(), Error> {
        match self.session {
            Session::Active => Ok(()),
            Session::Unconfigured | Session::Retired => Err(Error::Uninitialized),
        }
    }
}
