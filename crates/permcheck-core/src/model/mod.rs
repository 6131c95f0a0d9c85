//! Value types shared by the parser, baseline store, diff engine and reporters

pub mod entry;
pub mod variant_set;
pub mod violation;

pub use entry::{EntryKind, PermissionEntry};
pub use variant_set::{EntrySet, VariantPermissionSet};
pub use violation::{StrictnessPolicy, Violation, ViolationKind};
