//! Command orchestration layer.
//!
//! Provides high-level command functions that coordinate between the core
//! domain logic and the baseline/report files.

pub mod check;
