#![deny(unsafe_code)]
//! # maple-wfe-sheaf
//!
//! Context-indexed beliefs with sheaf-style restriction and gluing.
//!
//! - [`Context`] — a scope (time window × evidence set) ordered by refinement
//! - [`Belief`] — a confidence-weighted claim held in one context
//! - [`restrict`] — project a belief onto a narrower context (confidence decays)
//! - [`compatible`] — do beliefs agree wherever their contexts overlap?
//! - [`glue`] — combine compatible beliefs over their covering context
//! - [`BeliefSheaf`] — handle-based registry wiring in the injected collaborators
//!
//! Content equality and content synthesis are collaborator concerns
//! ([`ContentComparator`], [`ContentSynthesizer`]); the sheaf only decides
//! *where* beliefs must agree and *how confident* the glued result may be.
//! Glued confidence is the minimum of the inputs.

pub mod belief;
pub mod collaborators;
pub mod config;
pub mod context;
pub mod error;
pub mod sheaf;

pub use belief::Belief;
pub use collaborators::{
    ConsistentMapComparator, ContentComparator, ContentSynthesizer, ExactComparator,
    MapUnionSynthesizer, SetUnionSynthesizer,
};
pub use config::SheafConfig;
pub use context::{Context, EvidenceSet, Scope, TimeWindow};
pub use error::SheafError;
pub use sheaf::{compatible, glue, restrict, BeliefHandle, BeliefSheaf};
