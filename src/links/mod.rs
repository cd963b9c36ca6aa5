//! Assignment links.
//!
//! A link tells one giver who they are gifting. The giver's name and any
//! shared instructions travel in the clear; the receiver (and their hint) is
//! encrypted into the `to` parameter.
//!
//! Two formats are accepted on the way in:
//!
//! | format  | parameters                  | receiver payload                  |
//! |---------|-----------------------------|-----------------------------------|
//! | current | `from`, `to`, `info`        | `{"name", "hint"}` JSON or a bare name |
//! | legacy  | `name`, `key`, `pairing`    | bare name                         |
//!
//! Only the current format is ever produced.

mod current;
mod legacy;

use rand::Rng;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, macros::date};
use url::Url;

use crate::error::{SantaError, SantaResult};

/// Links in the legacy format stopped being issued before this date.
pub const LEGACY_SUNSET: Date = date!(2025 - 01 - 01);

/// What a giver learns about their receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// A decoded link, as cached on the giver's device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPairing {
    pub giver: String,
    pub receiver: ReceiverData,
    pub instructions: Option<String>,
}

/// Query parameters of an assignment link, any of which may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LinkParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub info: Option<String>,
    pub name: Option<String>,
    pub key: Option<String>,
    pub pairing: Option<String>,
}

impl LinkParams {
    pub fn from_url(url: &Url) -> Self {
        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            let slot = match key.as_ref() {
                "from" => &mut params.from,
                "to" => &mut params.to,
                "info" => &mut params.info,
                "name" => &mut params.name,
                "key" => &mut params.key,
                "pairing" => &mut params.pairing,
                _ => continue,
            };
            slot.get_or_insert_with(|| value.into_owned());
        }
        params
    }

    /// Picks the format from which parameters are present. `to` wins.
    pub fn format(&self) -> SantaResult<LinkFormat<'_>> {
        if let Some(to) = &self.to {
            return Ok(LinkFormat::Current {
                from: self.from.as_deref().unwrap_or_default(),
                to,
            });
        }

        match (&self.name, &self.key, &self.pairing) {
            (Some(name), Some(key), Some(pairing)) => Ok(LinkFormat::Legacy { name, key, pairing }),
            _ => Err(SantaError::MissingLinkParameters),
        }
    }

    fn instructions(&self) -> Option<String> {
        self.info.clone().filter(|info| !info.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkFormat<'a> {
    Current { from: &'a str, to: &'a str },
    Legacy { name: &'a str, key: &'a str, pairing: &'a str },
}

/// Builds and reads assignment links rooted at `{public_url}/pairing`.
#[derive(Debug, Clone)]
pub struct LinkCodec {
    pairing_url: Url,
}

impl LinkCodec {
    pub fn new(public_url: &Url) -> Result<Self, url::ParseError> {
        let mut base = public_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { pairing_url: base.join("pairing")? })
    }

    pub fn encode(
        &self,
        giver: &str,
        receiver: &str,
        hint: Option<&str>,
        instructions: Option<&str>,
    ) -> SantaResult<Url> {
        self.encode_with(giver, receiver, hint, instructions, &mut rand::rng())
    }

    pub fn encode_with<R: Rng + ?Sized>(
        &self,
        giver: &str,
        receiver: &str,
        hint: Option<&str>,
        instructions: Option<&str>,
        rng: &mut R,
    ) -> SantaResult<Url> {
        let payload = serde_json::to_vec(&ReceiverData {
            name: receiver.to_owned(),
            hint: hint.map(str::to_owned),
        })
        .map_err(|_| SantaError::EncryptionFailed)?;
        let token = current::seal(&payload, rng)?;

        let mut url = self.pairing_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("from", giver).append_pair("to", &token);
            if let Some(info) = instructions.filter(|info| !info.is_empty()) {
                query.append_pair("info", info);
            }
        }

        Ok(url)
    }

    pub fn decode(params: &LinkParams) -> SantaResult<StoredPairing> {
        let (giver, receiver) = match params.format()? {
            LinkFormat::Current { from, to } => {
                tracing::debug!(format = "current", "decoding link");
                (from.to_owned(), decode_receiver(current::open(to)?))
            }
            LinkFormat::Legacy { name, key, pairing } => {
                if OffsetDateTime::now_utc().date() >= LEGACY_SUNSET {
                    tracing::warn!(sunset = %LEGACY_SUNSET, "decoding legacy link after its sunset");
                } else {
                    tracing::debug!(format = "legacy", "decoding link");
                }
                let receiver = ReceiverData {
                    name: legacy::open(pairing, key)?,
                    hint: None,
                };
                (name.to_owned(), receiver)
            }
        };

        Ok(StoredPairing {
            giver,
            receiver,
            instructions: params.instructions(),
        })
    }
}

/// Structured payload first; anything else is a bare name from before hints.
fn decode_receiver(plaintext: String) -> ReceiverData {
    match serde_json::from_str::<ReceiverData>(&plaintext) {
        Ok(receiver) => receiver,
        Err(_) => ReceiverData { name: plaintext, hint: None },
    }
}
