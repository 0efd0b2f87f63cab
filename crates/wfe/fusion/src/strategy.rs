//! Tension resolution strategies.

use crate::types::{Resolution, Tension};

/// Proposes a resolution for one tension.
///
/// The engine calls `propose` with attempts `0, 1, ..` up to its configured
/// cap and accepts the first resolution that embeds both sides' stances.
/// Returning `None` skips the attempt.
pub trait ResolutionStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn propose(&self, tension: &Tension, attempt: usize) -> Option<Resolution>;
}

/// Adopt one side under a time-boxed validation, falling back to the other.
///
/// Attempt 0 validates B's stance and falls back to A's; attempt 1 is the
/// mirror. Further attempts propose nothing.
#[derive(Clone, Debug)]
pub struct TimeboxedFallbackStrategy {
    timebox_days: u32,
}

impl TimeboxedFallbackStrategy {
    pub fn new(timebox_days: u32) -> Self {
        Self { timebox_days }
    }

    pub fn timebox_days(&self) -> u32 {
        self.timebox_days
    }

    fn clause(&self, trial: &str, fallback: &str) -> String {
        format!(
            "{} under time-boxed validation ({} days), with fallback to {}",
            trial, self.timebox_days, fallback
        )
    }
}

impl Default for TimeboxedFallbackStrategy {
    fn default() -> Self {
        Self::new(14)
    }
}

impl ResolutionStrategy for TimeboxedFallbackStrategy {
    fn name(&self) -> &str {
        "timeboxed-fallback"
    }

    fn propose(&self, tension: &Tension, attempt: usize) -> Option<Resolution> {
        let stance = match attempt {
            0 => self.clause(&tension.stance_b, &tension.stance_a),
            1 => self.clause(&tension.stance_a, &tension.stance_b),
            _ => return None,
        };
        Some(Resolution {
            dimension: tension.divergent_dimension.clone(),
            stance,
            from_a: tension.stance_a.clone(),
            from_b: tension.stance_b.clone(),
        })
    }
}

/// Never resolves anything; every tension ends the run in impasse.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoResolution;

impl ResolutionStrategy for NoResolution {
    fn name(&self) -> &str {
        "none"
    }

    fn propose(&self, _tension: &Tension, _attempt: usize) -> Option<Resolution> {
        None
    }
}
