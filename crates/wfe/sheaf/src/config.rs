use serde::{Deserialize, Serialize};

use crate::error::SheafError;

/// Belief sheaf configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SheafConfig {
    /// Multiplier applied to confidence on every restriction.
    pub restriction_decay: f64,
}

impl Default for SheafConfig {
    fn default() -> Self {
        Self {
            restriction_decay: 0.95,
        }
    }
}

impl SheafConfig {
    pub fn with_restriction_decay(decay: f64) -> Result<Self, SheafError> {
        if !(decay > 0.0 && decay <= 1.0) {
            return Err(SheafError::InvalidDecay(decay));
        }
        Ok(Self {
            restriction_decay: decay,
        })
    }
}
