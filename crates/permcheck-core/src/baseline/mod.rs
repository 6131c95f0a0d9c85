//! Baseline persistence

pub mod store;

pub use store::BaselineStore;
