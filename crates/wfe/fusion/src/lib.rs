#![deny(unsafe_code)]
//! # maple-wfe-fusion
//!
//! Dialectical fusion of conflicting proposals.
//!
//! A run moves through
//!
//! ```text
//! ARTICULATED -> CHALLENGED -> OVERLAP_FOUND -> SYNTHESIS_CONSTRUCTED -> VERIFIED
//!                     |              |                  |
//!                     v              v                  +-> VETOED
//!                  IMPASSE        IMPASSE               +-> IMPASSE
//! ```
//!
//! and is returned as a [`Witnessed<FusionResult>`](maple_wfe_witness::Witnessed)
//! holding one mark per transition. A verified [`Synthesis`] embeds both
//! proposals and equals neither. A [`VetoPredicate`] can reject any candidate;
//! the engine's [`VetoLedger`] keeps that rejection for every later run that
//! arrives at the same synthesis.

pub mod config;
pub mod dialectic;
pub mod engine;
pub mod error;
pub mod strategy;
pub mod types;
pub mod veto;

pub use config::FusionConfig;
pub use engine::{FusionEngine, Reconciliation};
pub use error::FusionError;
pub use strategy::{NoResolution, ResolutionStrategy, TimeboxedFallbackStrategy};
pub use types::{
    Challenge, FusionResult, FusionState, ImpasseReason, PositionMap, Proposal, ProposalHandle,
    ProposalId, Resolution, Synthesis, Tension, VetoRecord, CONTENT_DIMENSION,
};
pub use veto::{AnyVeto, AuthorityVeto, NoVeto, VetoLedger, VetoPredicate};
