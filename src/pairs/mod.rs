mod draw;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    error::{SantaError, SantaResult},
    participants::{Participant, ParticipantSet},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub giver: Participant,
    pub receiver: Participant,
}

/// A full draw plus the fingerprint of the set it was drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPairs {
    pub pairings: Vec<Assignment>,
    pub fingerprint: String,
}

/// One pairing with names and hint taken from the current participant list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPairing {
    pub giver: String,
    pub receiver: String,
    pub hint: Option<String>,
}

pub fn generate_pairs(participants: &ParticipantSet) -> SantaResult<GeneratedPairs> {
    generate_pairs_with(participants, &mut rand::rng())
}

/// Draws a derangement of `participants` using `rng`.
///
/// Each attempt is an unbiased shuffle, so when a derangement turns up within
/// the redraw limit it is uniform over all derangements. When the limit is hit
/// the last shuffle is patched by swapping fixed points with their neighbour;
/// that fallback is not known to be uniform. It is reached with probability
/// below 3e-6 for any set size.
pub fn generate_pairs_with<R: Rng + ?Sized>(
    participants: &ParticipantSet,
    rng: &mut R,
) -> SantaResult<GeneratedPairs> {
    let count = participants.len();
    if count < 2 {
        return Err(SantaError::InsufficientParticipants { count });
    }

    let people = participants.as_slice();
    let receivers = draw::derange(count, rng, draw::MAX_SHUFFLE_ATTEMPTS);
    let pairings = people
        .iter()
        .zip(receivers)
        .map(|(giver, receiver)| Assignment {
            giver: giver.clone(),
            receiver: people[receiver].clone(),
        })
        .collect();

    tracing::info!(participants = count, "generated pairs");

    Ok(GeneratedPairs {
        pairings,
        fingerprint: participants.fingerprint(),
    })
}

impl GeneratedPairs {
    /// Whether `participants` changed since these pairs were drawn.
    pub fn is_stale(&self, participants: &ParticipantSet) -> bool {
        self.fingerprint != participants.fingerprint()
    }

    /// Pairings sorted by giver name ignoring case, preferring current names
    /// and hints.
    ///
    /// Anyone no longer in `participants` keeps the name captured when the
    /// pairs were drawn and loses their hint.
    pub fn resolve(&self, participants: &ParticipantSet) -> Vec<ResolvedPairing> {
        let mut resolved: Vec<ResolvedPairing> = self
            .pairings
            .iter()
            .map(|Assignment { giver, receiver }| {
                let current_receiver = participants.get(receiver.id);
                ResolvedPairing {
                    giver: participants
                        .get(giver.id)
                        .map_or(&giver.name, |p| &p.name)
                        .clone(),
                    receiver: current_receiver.map_or(&receiver.name, |p| &p.name).clone(),
                    hint: current_receiver.and_then(|p| p.hint.clone()),
                }
            })
            .collect();

        resolved.sort_by_cached_key(|r| (r.giver.to_lowercase(), r.giver.clone()));
        resolved
    }
}
