#![deny(unsafe_code)]
//! # maple-wfe-types
//!
//! Leaf types of the Witnessed Fusion Engine (WFE): the audit primitives every
//! other WFE crate builds on.
//!
//! ## Key Types
//!
//! - [`ContentHash`] — BLAKE3 content address (marks, payloads, syntheses)
//! - [`TemporalAnchor`] — hybrid physical/logical timestamp
//! - [`Mark`] — immutable, self-verifying record of one reasoning step
//! - [`Trace`] — append-only, totally ordered sequence of marks
//! - [`MarkRecorder`] — stamps marks with strictly increasing anchors
//!
//! A mark's id is the hash of its own fields:
//! `mark_id = blake3(json(timestamp) || json(actor) || json(description) || json(payload_digest))`,
//! so a trace can be re-verified after it leaves the engine.

pub mod error;
pub mod hash;
pub mod mark;
pub mod temporal;
pub mod trace;

pub use error::TraceError;
pub use hash::ContentHash;
pub use mark::{Mark, MarkId, MarkRecorder};
pub use temporal::{FixedClock, MarkClock, SystemClock, TemporalAnchor};
pub use trace::Trace;
