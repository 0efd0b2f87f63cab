use serde::{Deserialize, Serialize};

use crate::error::TraceError;
use crate::hash::ContentHash;
use crate::temporal::{MarkClock, TemporalAnchor};

/// Content-addressed mark identifier.
pub type MarkId = ContentHash;

/// An immutable audit record of one computational step.
///
/// Fields are read-only after construction; the id is derived from the
/// other four fields and can be re-checked with [`Mark::verify_id`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mark {
    id: MarkId,
    timestamp: TemporalAnchor,
    actor: String,
    description: String,
    payload_digest: ContentHash,
}

impl Mark {
    /// Canonical id: `blake3(json(timestamp) || json(actor) || json(description) || json(payload_digest))`.
    pub fn compute_id(
        timestamp: &TemporalAnchor,
        actor: &str,
        description: &str,
        payload_digest: &ContentHash,
    ) -> MarkId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&serde_json::to_vec(timestamp).expect("timestamp serializable"));
        hasher.update(&serde_json::to_vec(actor).expect("actor serializable"));
        hasher.update(&serde_json::to_vec(description).expect("description serializable"));
        hasher.update(&serde_json::to_vec(payload_digest).expect("digest serializable"));
        ContentHash::from_bytes(*hasher.finalize().as_bytes())
    }

    pub fn new(
        timestamp: TemporalAnchor,
        actor: impl Into<String>,
        description: impl Into<String>,
        payload_digest: ContentHash,
    ) -> Self {
        let actor = actor.into();
        let description = description.into();
        let id = Self::compute_id(&timestamp, &actor, &description, &payload_digest);
        Self {
            id,
            timestamp,
            actor,
            description,
            payload_digest,
        }
    }

    /// Create a mark whose payload digest is the hash of `payload`'s JSON form.
    pub fn with_payload<P: Serialize + ?Sized>(
        timestamp: TemporalAnchor,
        actor: impl Into<String>,
        description: impl Into<String>,
        payload: &P,
    ) -> Self {
        Self::new(timestamp, actor, description, ContentHash::of_json(payload))
    }

    pub fn id(&self) -> &MarkId {
        &self.id
    }

    pub fn timestamp(&self) -> TemporalAnchor {
        self.timestamp
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn payload_digest(&self) -> &ContentHash {
        &self.payload_digest
    }

    /// Check that the stored id matches the mark's contents.
    pub fn verify_id(&self) -> Result<(), TraceError> {
        let computed = Self::compute_id(
            &self.timestamp,
            &self.actor,
            &self.description,
            &self.payload_digest,
        );
        if computed != self.id {
            return Err(TraceError::MarkIdMismatch {
                position: 0,
                stored: self.id.clone(),
                computed,
            });
        }
        Ok(())
    }
}

/// Stamps marks for one actor with strictly increasing anchors.
///
/// The logical counter advances on every mark, so two marks from the same
/// recorder never share an anchor even under a frozen clock.
pub struct MarkRecorder<'c> {
    clock: &'c dyn MarkClock,
    actor: String,
    logical: u32,
}

impl<'c> MarkRecorder<'c> {
    pub fn new(clock: &'c dyn MarkClock, actor: impl Into<String>) -> Self {
        Self {
            clock,
            actor: actor.into(),
            logical: 0,
        }
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Number of marks recorded so far.
    pub fn recorded(&self) -> u32 {
        self.logical
    }

    fn next_anchor(&mut self) -> TemporalAnchor {
        let anchor = TemporalAnchor::new(self.clock.now_ms(), self.logical);
        self.logical = self.logical.saturating_add(1);
        anchor
    }

    /// Record a mark with an explicit payload digest.
    pub fn record(&mut self, description: impl Into<String>, payload_digest: ContentHash) -> Mark {
        let anchor = self.next_anchor();
        Mark::new(anchor, self.actor.clone(), description, payload_digest)
    }

    /// Record a mark digesting a serializable payload.
    pub fn record_payload<P: Serialize + ?Sized>(
        &mut self,
        description: impl Into<String>,
        payload: &P,
    ) -> Mark {
        let anchor = self.next_anchor();
        Mark::with_payload(anchor, self.actor.clone(), description, payload)
    }
}
