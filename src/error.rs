use thiserror::Error;
use uuid::Uuid;

pub type SantaResult<T> = Result<T, SantaError>;

/// Failures of the assignment and link core.
///
/// `MissingLinkParameters` and `DecryptionFailed` are kept apart here for logging,
/// but the HTTP layer renders both as the same "cannot resolve this link" page.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SantaError {
    #[error("need at least 2 participants to draw pairs, got {count}")]
    InsufficientParticipants { count: usize },

    #[error("participant {0} appears more than once")]
    DuplicateParticipant(Uuid),

    #[error("link carries neither `to` nor `name`/`key`/`pairing`")]
    MissingLinkParameters,

    #[error("link payload could not be decrypted")]
    DecryptionFailed,

    #[error("link payload could not be encrypted")]
    EncryptionFailed,

    #[error("stored pairing is malformed")]
    MalformedPersistedState,

    #[error("pairing store: {0}")]
    Store(String),
}

impl SantaError {
    pub fn is_invalid_participants(&self) -> bool {
        matches!(self, Self::InsufficientParticipants { .. } | Self::DuplicateParticipant(_))
    }

    /// Whether this error means a link could not be turned into a pairing.
    pub fn is_unresolvable_link(&self) -> bool {
        matches!(self, Self::MissingLinkParameters | Self::DecryptionFailed)
    }
}
