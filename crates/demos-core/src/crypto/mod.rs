//! Password-based encryption of a single secret string.
//!
//! The credential is protected with AES-256-CBC under a key derived from
//! the user's password via PBKDF2-HMAC-SHA256 (100,000 rounds). A fresh
//! 256-bit salt and 128-bit IV are generated per call and stored alongside
//! the ciphertext as hex strings.
//!
//! PBKDF2 derives 64 bytes: the first 32 key the cipher, the last 32 key
//! an HMAC-SHA256 tag over `salt || iv || ciphertext` (encrypt-then-MAC).
//! The tag is appended to the ciphertext, so a wrong password fails the
//! MAC check deterministically instead of unpadding garbage.

pub mod password;

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{CoreError, Result};

pub use password::validate_password;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// PBKDF2 iteration count. Deliberately slow to resist brute force.
const PBKDF2_ROUNDS: u32 = 100_000;

/// Salt length in bytes (256 bits).
const SALT_LEN: usize = 32;

/// IV length in bytes (128 bits, one AES block).
const IV_LEN: usize = 16;

/// AES key + MAC key, both 256-bit.
const DERIVED_KEY_LEN: usize = 64;

/// HMAC-SHA256 tag length in bytes.
const TAG_LEN: usize = 32;

/// An encrypted credential as stored on disk.
///
/// All three components are lower-case hex. `ciphertext` carries the
/// CBC output followed by the 32-byte integrity tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedSecret {
    pub ciphertext: String,
    pub salt: String,
    pub iv: String,
}

/// Encrypt `plaintext` under `password` with a fresh salt and IV.
pub fn encrypt(plaintext: &str, password: &str) -> EncryptedSecret {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let mut iv = [0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut iv);

    let keys = derive_keys(password, &salt);
    let (enc_key, mac_key) = keys.split_at(32);

    let mut key = [0u8; 32];
    key.copy_from_slice(enc_key);
    let ciphertext = Aes256CbcEnc::new(&key.into(), &iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    let mut mac = HmacSha256::new_from_slice(mac_key).expect("HMAC accepts any key length");
    mac.update(&salt);
    mac.update(&iv);
    mac.update(&ciphertext);
    let tag = mac.finalize().into_bytes();

    let mut payload = ciphertext;
    payload.extend_from_slice(&tag);

    EncryptedSecret {
        ciphertext: hex::encode(payload),
        salt: hex::encode(salt),
        iv: hex::encode(iv),
    }
}

/// Decrypt an [`EncryptedSecret`], reproducing the original plaintext.
///
/// Fails with [`CoreError::Decryption`] when the password is wrong or any
/// component is malformed; callers never receive truncated or garbled
/// output.
pub fn decrypt(secret: &EncryptedSecret, password: &str) -> Result<String> {
    let salt = decode_component(&secret.salt, SALT_LEN)?;
    let iv = decode_component(&secret.iv, IV_LEN)?;
    let payload = hex::decode(&secret.ciphertext).map_err(|_| CoreError::Decryption)?;

    // Payload must hold the tag plus at least one cipher block.
    if payload.len() < TAG_LEN + IV_LEN {
        return Err(CoreError::Decryption);
    }
    let (ciphertext, tag) = payload.split_at(payload.len() - TAG_LEN);
    if ciphertext.len() % IV_LEN != 0 {
        return Err(CoreError::Decryption);
    }

    let keys = derive_keys(password, &salt);
    let (enc_key, mac_key) = keys.split_at(32);

    let mut mac = HmacSha256::new_from_slice(mac_key).expect("HMAC accepts any key length");
    mac.update(&salt);
    mac.update(&iv);
    mac.update(ciphertext);
    mac.verify_slice(tag).map_err(|_| CoreError::Decryption)?;

    let mut key = [0u8; 32];
    key.copy_from_slice(enc_key);
    let mut iv_block = [0u8; IV_LEN];
    iv_block.copy_from_slice(&iv);
    let plaintext = Aes256CbcDec::new(&key.into(), &iv_block.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CoreError::Decryption)?;

    String::from_utf8(plaintext).map_err(|_| CoreError::Decryption)
}

fn derive_keys(password: &str, salt: &[u8]) -> Zeroizing<[u8; DERIVED_KEY_LEN]> {
    let mut keys = Zeroizing::new([0u8; DERIVED_KEY_LEN]);
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ROUNDS, &mut keys[..]);
    keys
}

fn decode_component(hex_str: &str, expected_len: usize) -> Result<Vec<u8>> {
    let bytes = hex::decode(hex_str).map_err(|_| CoreError::Decryption)?;
    if bytes.len() != expected_len {
        return Err(CoreError::Decryption);
    }
    Ok(bytes)
}
