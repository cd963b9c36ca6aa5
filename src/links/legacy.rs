//! `pairing` tokens from the first link format.
//!
//! These are OpenSSL-style passphrase envelopes: standard base64 of
//! `"Salted__" || salt (8) || AES-256-CBC ciphertext`, with key and IV derived
//! by `EVP_BytesToKey` (MD5, one iteration) from the `key` parameter and salt.
//! Only decryption is supported; no new links use this format.

use aes::Aes256;
use base64::{Engine, engine::general_purpose::STANDARD};
use cbc::cipher::{BlockDecryptMut, KeyIvInit, block_padding::Pkcs7};
use md5::{Digest, Md5};

use crate::error::{SantaError, SantaResult};

type Aes256CbcDec = cbc::Decryptor<Aes256>;

const MAGIC: &[u8; 8] = b"Salted__";
const SALT_LEN: usize = 8;
const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;

pub(crate) fn open(ciphertext: &str, passphrase: &str) -> SantaResult<String> {
    // Unescaped `+` in old links arrives as a space after query decoding.
    let bytes = STANDARD
        .decode(ciphertext.trim().replace(' ', "+"))
        .map_err(|_| SantaError::DecryptionFailed)?;
    let Some(rest) = bytes.strip_prefix(MAGIC.as_slice()) else {
        return Err(SantaError::DecryptionFailed);
    };
    if rest.len() <= SALT_LEN {
        return Err(SantaError::DecryptionFailed);
    }
    let (salt, body) = rest.split_at(SALT_LEN);

    let (key, iv) = derive_key_iv(passphrase.as_bytes(), salt);
    let plaintext = Aes256CbcDec::new_from_slices(&key, &iv)
        .map_err(|_| SantaError::DecryptionFailed)?
        .decrypt_padded_vec_mut::<Pkcs7>(body)
        .map_err(|_| SantaError::DecryptionFailed)?;

    // A wrong passphrase occasionally yields valid padding; the result is
    // then either not UTF-8 or empty.
    match String::from_utf8(plaintext) {
        Ok(name) if !name.is_empty() => Ok(name),
        _ => Err(SantaError::DecryptionFailed),
    }
}

fn derive_key_iv(passphrase: &[u8], salt: &[u8]) -> ([u8; KEY_LEN], [u8; IV_LEN]) {
    let mut material = Vec::with_capacity(KEY_LEN + IV_LEN);
    let mut block: Vec<u8> = Vec::new();

    while material.len() < KEY_LEN + IV_LEN {
        let mut hasher = Md5::new();
        hasher.update(&block);
        hasher.update(passphrase);
        hasher.update(salt);
        block = hasher.finalize().to_vec();
        material.extend_from_slice(&block);
    }

    let mut key = [0u8; KEY_LEN];
    let mut iv = [0u8; IV_LEN];
    key.copy_from_slice(&material[..KEY_LEN]);
    iv.copy_from_slice(&material[KEY_LEN..KEY_LEN + IV_LEN]);
    (key, iv)
}

/// Builds a legacy token the way the first link generator did.
#[cfg(test)]
pub(crate) fn seal(plaintext: &str, passphrase: &str, salt: [u8; SALT_LEN]) -> String {
    use cbc::cipher::BlockEncryptMut;

    let (key, iv) = derive_key_iv(passphrase.as_bytes(), &salt);
    let body = cbc::Encryptor::<Aes256>::new_from_slices(&key, &iv)
        .unwrap()
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    let mut bytes = MAGIC.to_vec();
    bytes.extend_from_slice(&salt);
    bytes.extend_from_slice(&body);
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_starts_with_first_md5_round() {
        let (key, iv) = derive_key_iv(b"password", &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(key.len(), 32);
        assert_eq!(iv.len(), 16);

        let first = Md5::new()
            .chain_update(b"password")
            .chain_update([0, 1, 2, 3, 4, 5, 6, 7])
            .finalize();
        assert_eq!(&key[..16], first.as_slice());
    }

    #[test]
    fn sealed_token_opens() {
        let token = seal("Bob", "s3cret", *b"saltsalt");
        assert!(token.starts_with("U2FsdGVkX1"));
        assert_eq!(open(&token, "s3cret").unwrap(), "Bob");
    }

    #[test]
    fn opens_openssl_cli_output() {
        // printf Bob | openssl enc -aes-256-cbc -md md5 -a -k k3y
        let token = "U2FsdGVkX19eXJ5qO+UGak0cPlwWXnR/llTElxm5yhQ=";
        assert_eq!(open(token, "k3y").unwrap(), "Bob");
        assert_eq!(open(&token.replace('+', " "), "k3y").unwrap(), "Bob");
    }

    #[test]
    fn wrong_passphrase_fails() {
        let token = seal("Bob", "s3cret", *b"saltsalt");
        assert_eq!(open(&token, "guess"), Err(SantaError::DecryptionFailed));
    }

    #[test]
    fn missing_header_fails() {
        let token = STANDARD.encode(b"no magic header here, just bytes");
        assert_eq!(open(&token, "s3cret"), Err(SantaError::DecryptionFailed));
        assert_eq!(open("%%%", "s3cret"), Err(SantaError::DecryptionFailed));
    }
}
