use buffered_cipher::{BlockCipherInit, CipherAdapter, CipherDirection, Error, Pkcs7};
use ecb_mode::{Ecb, EcbCore};
use hex_literal::hex;

type Aes128 = CipherAdapter<aes::Aes128>;
type Aes128Ecb = Ecb<Aes128>;

// https://nvlpubs.nist.gov/nistpubs/Legacy/SP/nistspecialpublication800-38a.pdf
const KEY: [u8; 16] = hex!("2B7E151628AED2A6ABF7158809CF4F3C");
const PLAINTEXT: [u8; 64] = hex!(
    "6BC1BEE22E409F96E93D7E117393172A"
    "AE2D8A571E03AC9C9EB76FAC45AF8E51"
    "30C81C46A35CE411E5FBC1191A0A52EF"
    "F69F2445DF4F9B17AD2B417BE66C3710"
);
const CIPHERTEXT: [u8; 64] = hex!(
    "3AD77BB40D7A3660A89ECAF32466EF97"
    "F5D3D58503B9699DE785895A96FDBAAF"
    "43B1CD7F598ECE23881B00E3ED030688"
    "7B0C785E27E8AD3F8223207104725DD4"
);

fn ecb(direction: CipherDirection) -> Aes128Ecb {
    let mut ecb = Aes128Ecb::new_from_slice(&KEY).unwrap();
    ecb.init_mode(direction, &[]).unwrap();
    ecb
}

fn padded_ecb(direction: CipherDirection) -> Aes128Ecb {
    let cipher = Aes128::new_from_slice(&KEY).unwrap();
    let mut ecb = Aes128Ecb::from_core(EcbCore::with_padding(cipher, Pkcs7::new(16)).unwrap());
    ecb.init_mode(direction, &[]).unwrap();
    ecb
}

#[test]
fn ecb_aes128_encrypt() {
    assert_eq!(
        ecb(CipherDirection::Encrypt).do_final_vec(&PLAINTEXT).unwrap(),
        CIPHERTEXT
    );
}

#[test]
fn ecb_aes128_decrypt() {
    assert_eq!(
        ecb(CipherDirection::Decrypt).do_final_vec(&CIPHERTEXT).unwrap(),
        PLAINTEXT
    );
}

#[test]
fn fips197_single_block() {
    let mut ecb = Aes128Ecb::new_from_slice(&KEY).unwrap();
    ecb.init_mode(CipherDirection::Encrypt, &[]).unwrap();
    let ct = ecb.do_final_vec(&hex!("3243F6A8885A308D313198A2E0370734")).unwrap();
    assert_eq!(ct, hex!("3925841D02DC09FBDC118597196A0B32"));
}

#[test]
fn chunked_input_matches_vectors() {
    for chunk in [1, 5, 16, 17, 31, 64] {
        let mut cipher = ecb(CipherDirection::Encrypt);
        let mut out = [0u8; 64];
        let mut pos = 0;
        for part in PLAINTEXT.chunks(chunk) {
            pos += cipher.update(&mut out[pos..], part).unwrap();
        }
        pos += cipher.do_final(&mut out[pos..]).unwrap();
        assert_eq!(pos, 64);
        assert_eq!(out, CIPHERTEXT, "chunk size {}", chunk);
    }
}

#[test]
fn unpadded_residue_is_illegal() {
    let mut cipher = ecb(CipherDirection::Encrypt);
    assert_eq!(
        cipher.do_final_vec(&PLAINTEXT[..20]),
        Err(Error::IllegalLength)
    );
}

#[test]
fn whole_blocks_leave_nothing_for_do_final() {
    let mut cipher = ecb(CipherDirection::Encrypt);
    let mut out = [0u8; 64];
    let mut pos = 0;
    for part in PLAINTEXT.chunks(8) {
        pos += cipher.update(&mut out[pos..], part).unwrap();
    }
    assert_eq!(pos, 64);
    assert_eq!(cipher.final_output_len(), 0);
    assert_eq!(cipher.do_final(&mut []).unwrap(), 0);
    assert_eq!(out, CIPHERTEXT);
}

#[test]
fn empty_unpadded_message() {
    assert!(ecb(CipherDirection::Encrypt).do_final_vec(&[]).unwrap().is_empty());
}

#[test]
fn padded_round_trip() {
    for len in 0..=40 {
        let ct = padded_ecb(CipherDirection::Encrypt)
            .do_final_vec(&PLAINTEXT[..len])
            .unwrap();
        assert_eq!(ct.len(), (len / 16 + 1) * 16);
        // leading whole blocks are plain ECB
        assert_eq!(ct[..len / 16 * 16], CIPHERTEXT[..len / 16 * 16]);

        let pt = padded_ecb(CipherDirection::Decrypt).do_final_vec(&ct).unwrap();
        assert_eq!(pt, &PLAINTEXT[..len]);
    }
}

#[test]
fn padded_decrypt_streams_in_chunks() {
    let ct = padded_ecb(CipherDirection::Encrypt)
        .do_final_vec(&PLAINTEXT[..37])
        .unwrap();

    for chunk in [1, 7, 16, 48] {
        let mut cipher = padded_ecb(CipherDirection::Decrypt);
        let mut out = [0u8; 48];
        let mut pos = 0;
        for part in ct.chunks(chunk) {
            pos += cipher.update(&mut out[pos..], part).unwrap();
        }
        // the final block stays buffered until do_final
        assert_eq!(pos, 32);
        pos += cipher.do_final(&mut out[pos..]).unwrap();
        assert_eq!(out[..pos], PLAINTEXT[..37]);
    }
}

#[test]
fn padded_decrypt_rejects_partial_block() {
    let mut cipher = padded_ecb(CipherDirection::Decrypt);
    assert_eq!(cipher.do_final_vec(&CIPHERTEXT[..20]), Err(Error::IllegalLength));

    let mut cipher = padded_ecb(CipherDirection::Decrypt);
    assert_eq!(cipher.do_final_vec(&[]), Err(Error::IllegalLength));
}

#[test]
fn padded_decrypt_rejects_bad_padding() {
    let mut bad = [0x11u8; 16];
    bad[15] = 0x03;
    bad[14] = 0x03;
    let ct = ecb(CipherDirection::Encrypt).do_final_vec(&bad).unwrap();

    let mut cipher = padded_ecb(CipherDirection::Decrypt);
    assert_eq!(cipher.do_final_vec(&ct), Err(Error::InvalidPadding));
}

#[test]
fn padding_must_match_block_size() {
    let cipher = Aes128::new_from_slice(&KEY).unwrap();
    assert!(matches!(
        EcbCore::with_padding(cipher, Pkcs7::new(8)),
        Err(Error::UnsupportedBlockSize)
    ));
}

#[test]
fn names() {
    let cipher = padded_ecb(CipherDirection::Encrypt);
    assert_eq!(cipher.name(), "ECB/Aes128");
    assert_eq!(cipher.core().padding_name(), Some("PKCS7Padding"));
    assert_eq!(ecb(CipherDirection::Encrypt).core().padding_name(), None);
}
