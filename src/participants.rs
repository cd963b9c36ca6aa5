use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{SantaError, SantaResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl Participant {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Ordered, id-unique snapshot of everyone taking part.
///
/// Edits replace the whole set; nothing in the crate mutates one after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Participant>", into = "Vec<Participant>")]
pub struct ParticipantSet {
    participants: Vec<Participant>,
}

impl ParticipantSet {
    pub fn new(participants: Vec<Participant>) -> SantaResult<Self> {
        let mut seen = HashSet::with_capacity(participants.len());
        for participant in &participants {
            if !seen.insert(participant.id) {
                return Err(SantaError::DuplicateParticipant(participant.id));
            }
        }

        Ok(Self { participants })
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Participant> {
        self.participants.iter()
    }

    pub fn as_slice(&self) -> &[Participant] {
        &self.participants
    }

    pub fn get(&self, id: Uuid) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Digest of every participant's id, name and hint.
    ///
    /// Display order does not matter: entries are sorted by id before hashing.
    /// Fields are length-prefixed so `("ab", "c")` and `("a", "bc")` differ.
    /// Only used to notice that the set changed since pairs were drawn.
    pub fn fingerprint(&self) -> String {
        let mut sorted: Vec<&Participant> = self.participants.iter().collect();
        sorted.sort_by_key(|p| p.id);

        let mut hasher = Sha256::new();
        hasher.update((sorted.len() as u64).to_le_bytes());
        for participant in sorted {
            hasher.update(participant.id.as_bytes());
            update_field(&mut hasher, participant.name.as_bytes());
            match &participant.hint {
                Some(hint) => {
                    hasher.update([1]);
                    update_field(&mut hasher, hint.as_bytes());
                }
                None => hasher.update([0]),
            }
        }

        hex::encode(hasher.finalize())
    }
}

fn update_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

impl TryFrom<Vec<Participant>> for ParticipantSet {
    type Error = SantaError;

    fn try_from(participants: Vec<Participant>) -> SantaResult<Self> {
        Self::new(participants)
    }
}

impl From<ParticipantSet> for Vec<Participant> {
    fn from(set: ParticipantSet) -> Self {
        set.participants
    }
}

impl<'a> IntoIterator for &'a ParticipantSet {
    type Item = &'a Participant;
    type IntoIter = std::slice::Iter<'a, Participant>;

    fn into_iter(self) -> Self::IntoIter {
        self.participants.iter()
    }
}
