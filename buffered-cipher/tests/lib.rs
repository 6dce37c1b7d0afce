use buffered_cipher::{
    BlockCipher, BlockCipherInit, BlockModeCore, BufferedBlockCipher, CipherAdapter,
    CipherDirection, Error, IvModeCore,
};
use hex_literal::hex;

type Aes128 = CipherAdapter<aes::Aes128>;

/// Encrypts whole blocks and echoes the remainder back unchanged, so every
/// byte of input is accounted for in the output.
struct Echo<C: BlockCipher> {
    cipher: C,
    blocks: usize,
}

impl<C: BlockCipher> BlockModeCore for Echo<C> {
    type Cipher = C;

    fn from_cipher(cipher: C) -> Self {
        Self { cipher, blocks: 0 }
    }

    fn cipher(&self) -> &C {
        &self.cipher
    }

    fn mode_name(&self) -> &'static str {
        "ECHO"
    }

    fn update_block(&mut self, out: &mut [u8], input: &[u8]) {
        out.copy_from_slice(input);
        self.cipher.encrypt_block(out);
        self.blocks += 1;
    }

    fn finalize(&mut self, out: &mut [u8], pending: &[u8]) -> Result<usize, Error> {
        out[..pending.len()].copy_from_slice(pending);
        Ok(pending.len())
    }

    fn final_output_len(&self, pending: usize) -> usize {
        pending
    }
}

impl<C: BlockCipher> IvModeCore for Echo<C> {
    fn init_mode(&mut self, _direction: CipherDirection, _iv: &[u8]) -> Result<(), Error> {
        self.blocks = 0;
        Ok(())
    }
}

fn echo(cipher: &Aes128) -> BufferedBlockCipher<Echo<&Aes128>> {
    let mut echo = BufferedBlockCipher::new(cipher);
    echo.init_mode(CipherDirection::Encrypt, &[]).unwrap();
    echo
}

#[test]
fn aes128_known_answer() {
    let aes = Aes128::new_from_slice(&hex!("2B7E151628AED2A6ABF7158809CF4F3C")).unwrap();
    assert_eq!(aes.block_size(), 16);
    assert_eq!(aes.key_size(), 16);

    let mut block = hex!("3243F6A8885A308D313198A2E0370734");
    aes.encrypt_block(&mut block);
    assert_eq!(block, hex!("3925841D02DC09FBDC118597196A0B32"));
    aes.decrypt_block(&mut block);
    assert_eq!(block, hex!("3243F6A8885A308D313198A2E0370734"));
}

#[test]
fn aes_round_trip_all_key_sizes() {
    fn check<C: BlockCipher>(cipher: C) {
        let pt: Vec<u8> = (0..cipher.block_size() as u8).collect();
        let mut block = pt.clone();
        cipher.encrypt_block(&mut block);
        assert_ne!(block, pt);
        cipher.decrypt_block(&mut block);
        assert_eq!(block, pt);
    }

    check(CipherAdapter::<aes::Aes128>::new_from_slice(&[7; 16]).unwrap());
    check(CipherAdapter::<aes::Aes192>::new_from_slice(&[7; 24]).unwrap());
    check(CipherAdapter::<aes::Aes256>::new_from_slice(&[7; 32]).unwrap());
}

#[test]
fn rejects_bad_key_length() {
    assert_eq!(
        Aes128::new_from_slice(&[0; 15]).unwrap_err(),
        Error::InvalidKeyLength
    );
}

#[test]
fn name_combines_mode_and_cipher() {
    let aes = Aes128::new_from_slice(&[0; 16]).unwrap();
    assert_eq!(echo(&aes).name(), "ECHO/Aes128");
}

#[test]
fn fragmented_input_matches_single_call() {
    let aes = Aes128::new_from_slice(&[0x42; 16]).unwrap();
    let msg: Vec<u8> = (0..100u8).collect();

    let expected = echo(&aes).do_final_vec(&msg).unwrap();
    assert_eq!(expected.len(), msg.len());

    for chunk in [1, 3, 15, 16, 17, 33, 99] {
        let mut cipher = echo(&aes);
        let mut out = vec![0u8; msg.len()];
        let mut pos = 0;
        for part in msg.chunks(chunk) {
            pos += cipher.update(&mut out[pos..], part).unwrap();
        }
        pos += cipher.do_final(&mut out[pos..]).unwrap();
        assert_eq!(pos, msg.len());
        assert_eq!(out, expected, "chunk size {}", chunk);
        assert_eq!(cipher.core().blocks, 6);
    }
}

#[test]
fn output_is_produced_per_whole_block() {
    let aes = Aes128::new_from_slice(&[0; 16]).unwrap();
    let mut cipher = echo(&aes);
    let mut out = [0u8; 48];

    assert_eq!(cipher.update_output_len(15), 0);
    assert_eq!(cipher.update(&mut out, &[0; 15]).unwrap(), 0);
    assert_eq!(cipher.update_output_len(1), 16);
    assert_eq!(cipher.update(&mut out, &[0; 1]).unwrap(), 16);
    assert_eq!(cipher.update(&mut out, &[0; 40]).unwrap(), 32);
    assert_eq!(cipher.final_output_len(), 8);
    assert_eq!(cipher.do_final(&mut out).unwrap(), 8);
}

#[test]
fn short_output_is_rejected() {
    let aes = Aes128::new_from_slice(&[0; 16]).unwrap();
    let mut cipher = echo(&aes);
    let mut out = [0u8; 15];
    assert_eq!(cipher.update(&mut out, &[0; 16]), Err(Error::OutputTooSmall));
}

#[test]
fn session_must_be_initialized() {
    let aes = Aes128::new_from_slice(&[0; 16]).unwrap();
    let mut cipher: BufferedBlockCipher<Echo<&Aes128>> = BufferedBlockCipher::new(&aes);
    let mut out = [0u8; 16];
    assert_eq!(cipher.update(&mut out, &[0; 16]), Err(Error::Uninitialized));
    assert_eq!(cipher.do_final(&mut out), Err(Error::Uninitialized));

    cipher.init_mode(CipherDirection::Encrypt, &[]).unwrap();
    cipher.do_final(&mut out).unwrap();
    // retired until the next init_mode
    assert_eq!(cipher.update(&mut out, &[0; 16]), Err(Error::Uninitialized));

    cipher.init_mode(CipherDirection::Encrypt, &[]).unwrap();
    assert_eq!(cipher.update(&mut out, &[0; 16]), Ok(16));
}

#[test]
fn init_mode_discards_pending_input() {
    let aes = Aes128::new_from_slice(&[0; 16]).unwrap();
    let mut cipher = echo(&aes);
    let mut out = [0u8; 16];
    cipher.update(&mut out, &[1; 10]).unwrap();

    cipher.init_mode(CipherDirection::Encrypt, &[]).unwrap();
    assert_eq!(cipher.final_output_len(), 0);
    assert_eq!(cipher.do_final(&mut out).unwrap(), 0);
}

#[test]
fn sessions_share_one_key_schedule() {
    let aes = Aes128::new_from_slice(&[9; 16]).unwrap();
    let mut a = echo(&aes);
    let mut b = echo(&aes);
    let msg = [5u8; 32];
    assert_eq!(a.do_final_vec(&msg).unwrap(), b.do_final_vec(&msg).unwrap());
}
