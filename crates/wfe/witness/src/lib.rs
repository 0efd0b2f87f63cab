#![deny(unsafe_code)]
//! # maple-wfe-witness
//!
//! The Witnessed monad and its list-nondeterminism extension.
//!
//! A [`Witnessed<A>`] pairs a value with the [`Trace`](maple_wfe_types::Trace)
//! of marks that produced it. `bind` runs the next step and appends that
//! step's trace after the existing one, so the trace order is the causal
//! order of the composed effects:
//!
//! ```text
//! pure(a) >>= f          ==  f(a)
//! m >>= pure             ==  m
//! (m >>= f) >>= g        ==  m >>= (λx. f(x) >>= g)
//! ```
//!
//! The laws hold on both the value and the trace order.
//!
//! A [`Branch<A>`] carries several witnessed paths at once; its `bind`
//! expands every path and grafts each child trace onto its parent's.

pub mod branch;
pub mod witnessed;

pub use branch::Branch;
pub use witnessed::{kleisli, Witnessed};
