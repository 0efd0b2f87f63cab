use serde::{Deserialize, Serialize};

use crate::error::TraceError;
use crate::hash::ContentHash;
use crate::mark::Mark;

/// An append-only, totally ordered sequence of [`Mark`]s.
///
/// Position in the sequence is the causal order of the composed effects.
/// There is no API to remove, reorder or edit marks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    marks: Vec<Mark>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_marks(marks: Vec<Mark>) -> Self {
        Self { marks }
    }

    /// Trace holding a single mark.
    pub fn single(mark: Mark) -> Self {
        Self { marks: vec![mark] }
    }

    pub fn push(&mut self, mark: Mark) {
        self.marks.push(mark);
    }

    /// Concatenate `other` after this trace's marks.
    pub fn append(&mut self, other: Trace) {
        self.marks.extend(other.marks);
    }

    /// `self ++ other`, consuming both.
    pub fn concat(mut self, other: Trace) -> Trace {
        self.append(other);
        self
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mark> {
        self.marks.iter()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn last(&self) -> Option<&Mark> {
        self.marks.last()
    }

    /// Mark descriptions in trace order.
    pub fn descriptions(&self) -> Vec<&str> {
        self.marks.iter().map(Mark::description).collect()
    }

    /// Order-sensitive digest over the mark ids.
    pub fn digest(&self) -> ContentHash {
        let mut hasher = blake3::Hasher::new();
        for mark in &self.marks {
            hasher.update(mark.id().as_bytes());
        }
        ContentHash::from_bytes(*hasher.finalize().as_bytes())
    }

    /// Re-derive every mark id; fails on the first tampered mark.
    pub fn verify(&self) -> Result<(), TraceError> {
        for (position, mark) in self.marks.iter().enumerate() {
            mark.verify_id().map_err(|e| match e {
                TraceError::MarkIdMismatch {
                    stored, computed, ..
                } => TraceError::MarkIdMismatch {
                    position,
                    stored,
                    computed,
                },
                other => other,
            })?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Mark;
    type IntoIter = std::slice::Iter<'a, Mark>;

    fn into_iter(self) -> Self::IntoIter {
        self.marks.iter()
    }
}

impl From<Vec<Mark>> for Trace {
    fn from(marks: Vec<Mark>) -> Self {
        Self::from_marks(marks)
    }
}
