//! `to` tokens: AES-256-GCM with the key carried in the token itself.
//!
//! Layout before base64url: `key (32) || nonce (12) || ciphertext || tag (16)`.
//! Anyone holding the link can open it; the point is only that the recipient
//! is not readable at a glance.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;

use crate::error::{SantaError, SantaResult};

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

pub(crate) fn seal<R: Rng + ?Sized>(plaintext: &[u8], rng: &mut R) -> SantaResult<String> {
    let mut key = [0u8; KEY_LEN];
    let mut nonce = [0u8; NONCE_LEN];
    rng.fill(&mut key);
    rng.fill(&mut nonce);

    let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| SantaError::EncryptionFailed)?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| SantaError::EncryptionFailed)?;

    let mut token = Vec::with_capacity(KEY_LEN + NONCE_LEN + ciphertext.len());
    token.extend_from_slice(&key);
    token.extend_from_slice(&nonce);
    token.extend_from_slice(&ciphertext);

    Ok(URL_SAFE_NO_PAD.encode(token))
}

pub(crate) fn open(token: &str) -> SantaResult<String> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token.trim_end_matches('='))
        .map_err(|_| SantaError::DecryptionFailed)?;
    if bytes.len() < KEY_LEN + NONCE_LEN + TAG_LEN {
        return Err(SantaError::DecryptionFailed);
    }

    let (key, rest) = bytes.split_at(KEY_LEN);
    let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| SantaError::DecryptionFailed)?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| SantaError::DecryptionFailed)?;

    String::from_utf8(plaintext).map_err(|_| SantaError::DecryptionFailed)
}
