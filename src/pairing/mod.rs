mod page;
mod store;

use crate::{
    error::{SantaError, SantaResult},
    links::{LinkCodec, LinkParams, StoredPairing},
};

pub(crate) use page::pairing_page;
pub use store::{CookiePairingStore, CookieSettings, PAIRING_COOKIE, PairingStore, decode_cookie_value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingSource {
    /// Already on this device from an earlier visit.
    Cached,
    /// Decoded from the link just now and cached.
    Link,
}

/// Finds the pairing to show for a visit to an assignment link.
///
/// Whatever the device cached first keeps being shown, even when a different
/// link is opened later. A cached entry that fails to parse is dropped and the
/// link is decoded instead.
pub async fn resolve_pairing<S>(store: &S, params: &LinkParams) -> SantaResult<(StoredPairing, PairingSource)>
where
    S: PairingStore + Sync,
{
    match store.load().await {
        Ok(Some(pairing)) => return Ok((pairing, PairingSource::Cached)),
        Ok(None) => {}
        Err(SantaError::MalformedPersistedState) => {
            tracing::warn!("discarding malformed stored pairing");
            store.clear().await?;
        }
        Err(err) => return Err(err),
    }

    let pairing = LinkCodec::decode(params)?;
    store.save(&pairing).await?;

    Ok((pairing, PairingSource::Link))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::{Value, json};
    use url::Url;

    use super::*;
    use crate::links::ReceiverData;

    #[derive(Default)]
    struct MemoryPairingStore {
        slot: Mutex<Option<Value>>,
    }

    impl MemoryPairingStore {
        fn holding(value: Value) -> Self {
            Self { slot: Mutex::new(Some(value)) }
        }

        fn raw(&self) -> Option<Value> {
            self.slot.lock().unwrap().clone()
        }
    }

    impl PairingStore for MemoryPairingStore {
        async fn load(&self) -> SantaResult<Option<StoredPairing>> {
            match self.raw() {
                Some(value) => serde_json::from_value(value)
                    .map(Some)
                    .map_err(|_| SantaError::MalformedPersistedState),
                None => Ok(None),
            }
        }

        async fn save(&self, pairing: &StoredPairing) -> SantaResult<()> {
            *self.slot.lock().unwrap() = Some(serde_json::to_value(pairing).unwrap());
            Ok(())
        }

        async fn clear(&self) -> SantaResult<()> {
            *self.slot.lock().unwrap() = None;
            Ok(())
        }
    }

    fn link_params(giver: &str, receiver: &str) -> LinkParams {
        let codec = LinkCodec::new(&Url::parse("http://localhost:8080").unwrap()).unwrap();
        let link = codec.encode(giver, receiver, Some("books"), Some("Budget 15")).unwrap();
        LinkParams::from_url(&link)
    }

    #[tokio::test]
    async fn first_visit_decodes_and_caches() {
        let store = MemoryPairingStore::default();

        let (pairing, source) = resolve_pairing(&store, &link_params("Alice", "Bob")).await.unwrap();
        assert_eq!(source, PairingSource::Link);
        assert_eq!(pairing.receiver, ReceiverData { name: "Bob".into(), hint: Some("books".into()) });
        assert_eq!(
            store.raw(),
            Some(json!({
                "giver": "Alice",
                "receiver": { "name": "Bob", "hint": "books" },
                "instructions": "Budget 15",
            }))
        );
    }

    #[tokio::test]
    async fn cached_pairing_wins_over_other_links() {
        let store = MemoryPairingStore::default();
        resolve_pairing(&store, &link_params("Alice", "Bob")).await.unwrap();

        let (pairing, source) = resolve_pairing(&store, &link_params("Cara", "Alice")).await.unwrap();
        assert_eq!(source, PairingSource::Cached);
        assert_eq!(pairing.giver, "Alice");
        assert_eq!(pairing.receiver.name, "Bob");
    }

    #[tokio::test]
    async fn cache_survives_a_visit_without_parameters() {
        let store = MemoryPairingStore::default();
        resolve_pairing(&store, &link_params("Alice", "Bob")).await.unwrap();

        let (pairing, source) = resolve_pairing(&store, &LinkParams::default()).await.unwrap();
        assert_eq!(source, PairingSource::Cached);
        assert_eq!(pairing.receiver.name, "Bob");
    }

    #[tokio::test]
    async fn malformed_cache_falls_back_to_link() {
        let store = MemoryPairingStore::holding(json!({ "giver": 12, "oops": true }));

        let (pairing, source) = resolve_pairing(&store, &link_params("Alice", "Bob")).await.unwrap();
        assert_eq!(source, PairingSource::Link);
        assert_eq!(pairing.receiver.name, "Bob");
        assert_eq!(store.raw().unwrap()["giver"], "Alice");
    }

    #[tokio::test]
    async fn malformed_cache_and_bad_link_leaves_store_empty() {
        let store = MemoryPairingStore::holding(json!("garbage"));

        let err = resolve_pairing(&store, &LinkParams::default()).await.unwrap_err();
        assert_eq!(err, SantaError::MissingLinkParameters);
        assert_eq!(store.raw(), None);
    }

    #[tokio::test]
    async fn failed_decode_is_not_cached() {
        let store = MemoryPairingStore::default();
        let params = LinkParams {
            from: Some("Alice".into()),
            to: Some("garbled".into()),
            ..Default::default()
        };

        assert_eq!(
            resolve_pairing(&store, &params).await.unwrap_err(),
            SantaError::DecryptionFailed
        );
        assert_eq!(store.raw(), None);
    }
}
