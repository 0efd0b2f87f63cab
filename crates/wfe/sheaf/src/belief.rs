use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::error::SheafError;

/// A confidence-weighted claim held in one context.
///
/// Beliefs are immutable: [`supersede`](Belief::supersede) produces a newer
/// belief in the same context rather than editing this one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Belief<T> {
    content: T,
    confidence: f64,
    justification: String,
    context: Context,
}

impl<T> Belief<T> {
    pub fn new(
        content: T,
        confidence: f64,
        justification: impl Into<String>,
        context: Context,
    ) -> Result<Self, SheafError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(SheafError::InvalidConfidence(confidence));
        }
        Ok(Self {
            content,
            confidence,
            justification: justification.into(),
            context,
        })
    }

    /// A belief held with full confidence.
    pub fn certain(content: T, justification: impl Into<String>, context: Context) -> Self {
        Self::assemble(content, 1.0, justification.into(), context)
    }

    pub fn content(&self) -> &T {
        &self.content
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn justification(&self) -> &str {
        &self.justification
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn into_content(self) -> T {
        self.content
    }

    pub fn supersede(
        &self,
        content: T,
        confidence: f64,
        justification: impl Into<String>,
    ) -> Result<Belief<T>, SheafError> {
        Belief::new(content, confidence, justification, self.context.clone())
    }

    pub(crate) fn assemble(
        content: T,
        confidence: f64,
        justification: String,
        context: Context,
    ) -> Belief<T> {
        Belief {
            content,
            confidence: confidence.clamp(0.0, 1.0),
            justification,
            context,
        }
    }
}
