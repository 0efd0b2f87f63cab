use serde::{Deserialize, Serialize};

use crate::error::FusionError;

/// Fusion engine configuration.
///
/// There is no default attempt cap; callers choose how long the resolution
/// search for one tension may run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FusionConfig {
    /// Strategy attempts per tension before the run ends in impasse.
    pub max_resolution_attempts: usize,
    /// Actor stamped on every transition mark.
    pub actor: String,
}

impl FusionConfig {
    pub fn new(max_resolution_attempts: usize) -> Result<Self, FusionError> {
        if max_resolution_attempts == 0 {
            return Err(FusionError::ZeroAttemptCap);
        }
        Ok(Self {
            max_resolution_attempts,
            actor: "fusion-engine".into(),
        })
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }
}
