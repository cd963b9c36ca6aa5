use std::future::Future;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use tower_cookies::{Cookie, Cookies, cookie::SameSite};

use crate::{
    error::{SantaError, SantaResult},
    links::StoredPairing,
};

/// Cookie holding the decoded pairing on the giver's device.
pub const PAIRING_COOKIE: &str = "secretSantaPairing";

/// Browsers drop cookies past roughly 4 KiB, name and attributes included.
const MAX_COOKIE_VALUE: usize = 3800;

/// Device-local cache of the pairing a giver already opened.
///
/// `load` reports an entry that no longer parses as
/// [`SantaError::MalformedPersistedState`]; callers are expected to `clear` it.
pub trait PairingStore {
    fn load(&self) -> impl Future<Output = SantaResult<Option<StoredPairing>>> + Send;
    fn save(&self, pairing: &StoredPairing) -> impl Future<Output = SantaResult<()>> + Send;
    fn clear(&self) -> impl Future<Output = SantaResult<()>> + Send;
}

#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    pub secure: bool,
    pub max_age: time::Duration,
}

/// Keeps the pairing in a cookie, so it only ever lives on the visitor's
/// device. The value is the JSON record, base64url encoded.
#[derive(Clone)]
pub struct CookiePairingStore {
    cookies: Cookies,
    settings: CookieSettings,
}

impl CookiePairingStore {
    pub fn new(cookies: Cookies, settings: CookieSettings) -> Self {
        Self { cookies, settings }
    }
}

pub fn encode_cookie_value(pairing: &StoredPairing) -> SantaResult<String> {
    let json = serde_json::to_vec(pairing).map_err(|err| SantaError::Store(err.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

pub fn decode_cookie_value(value: &str) -> SantaResult<StoredPairing> {
    let json = URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|_| SantaError::MalformedPersistedState)?;
    serde_json::from_slice(&json).map_err(|_| SantaError::MalformedPersistedState)
}

impl PairingStore for CookiePairingStore {
    async fn load(&self) -> SantaResult<Option<StoredPairing>> {
        self.cookies
            .get(PAIRING_COOKIE)
            .map(|cookie| decode_cookie_value(cookie.value()))
            .transpose()
    }

    async fn save(&self, pairing: &StoredPairing) -> SantaResult<()> {
        let value = encode_cookie_value(pairing)?;
        if value.len() > MAX_COOKIE_VALUE {
            tracing::warn!(len = value.len(), "pairing too large to cache on the device");
            return Ok(());
        }

        let cookie = Cookie::build((PAIRING_COOKIE, value))
            .path("/")
            .http_only(true)
            .secure(self.settings.secure)
            .same_site(SameSite::Lax)
            .max_age(self.settings.max_age)
            .build();
        self.cookies.add(cookie);
        Ok(())
    }

    async fn clear(&self) -> SantaResult<()> {
        self.cookies.remove(Cookie::build((PAIRING_COOKIE, "")).path("/").build());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::ReceiverData;

    fn pairing() -> StoredPairing {
        StoredPairing {
            giver: "Alice".into(),
            receiver: ReceiverData { name: "Bob".into(), hint: Some("tea".into()) },
            instructions: None,
        }
    }

    #[test]
    fn cookie_value_round_trips() {
        let value = encode_cookie_value(&pairing()).unwrap();
        assert!(value.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'));
        assert_eq!(decode_cookie_value(&value).unwrap(), pairing());
    }

    #[test]
    fn garbage_cookie_is_malformed() {
        assert_eq!(decode_cookie_value("%%%"), Err(SantaError::MalformedPersistedState));
        assert_eq!(
            decode_cookie_value(&URL_SAFE_NO_PAD.encode(br#"{"giver":1}"#)),
            Err(SantaError::MalformedPersistedState)
        );
    }

    #[tokio::test]
    async fn oversized_pairing_is_not_cached() {
        let store = CookiePairingStore::new(
            Cookies::default(),
            CookieSettings { secure: false, max_age: time::Duration::days(1) },
        );
        let mut big = pairing();
        big.instructions = Some("x".repeat(4000));

        store.save(&big).await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);

        store.save(&pairing()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(pairing()));
    }
}
