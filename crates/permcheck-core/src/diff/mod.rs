//! Permission diff engine.
//!
//! Compares the baseline set of a variant with the set parsed from its
//! manifest and classifies every difference as a [`Violation`](crate::model::Violation).
//!
//! ## Guarantees
//!
//! - **Pairing**: an entry whose only change is an optional field yields a
//!   change violation, never an unrelated add/remove pair.
//! - **Determinism**: violations are ordered by the canonical entry order.
//! - **Strict superset**: strict mode only ever adds violations.

pub mod engine;

pub use crate::model::StrictnessPolicy;
pub use engine::find_violations;
