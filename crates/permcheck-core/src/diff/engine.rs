//! Merge-diff between a baseline set and the current set of one variant.
//!
//! The core entry point is [`find_violations`].

use crate::errors::{PermCheckError, Result};
use crate::model::entry::compare_max_version;
use crate::model::{EntrySet, PermissionEntry, StrictnessPolicy, Violation, ViolationKind};
use std::cmp::Ordering;

/// Classify every difference between `baseline` and `current`
///
/// Entries sharing a `(name, tag)` key are paired and reported as one change
/// violation per differing optional field instead of an add/remove pair.
/// Violations come back in canonical entry order. With `strict == false`,
/// kinds the policy marks strict-only are dropped.
///
/// # Errors
///
/// - `Internal` — two paired entries that differ in no known field
pub fn find_violations(
    baseline: &EntrySet,
    current: &EntrySet,
    strict: bool,
    policy: &StrictnessPolicy,
) -> Result<Vec<Violation>> {
    // 1. Set differences, already in canonical order
    let only_in_current: Vec<&PermissionEntry> = current.difference(baseline).collect();
    let only_in_baseline: Vec<&PermissionEntry> = baseline.difference(current).collect();

    // 2. Two-cursor walk over both sequences
    let mut violations = Vec::new();
    let mut current_iter = only_in_current.into_iter().peekable();
    let mut baseline_iter = only_in_baseline.into_iter().peekable();

    while let (Some(&cur), Some(&base)) = (current_iter.peek(), baseline_iter.peek()) {
        match cur.key().cmp(&base.key()) {
            Ordering::Less => {
                violations.push(ViolationKind::Added { entry: cur.clone() });
                current_iter.next();
            }
            Ordering::Greater => {
                violations.push(ViolationKind::Removed {
                    entry: base.clone(),
                });
                baseline_iter.next();
            }
            Ordering::Equal => {
                violations.extend(changed_in_place(base, cur)?);
                current_iter.next();
                baseline_iter.next();
            }
        }
    }

    // 3. Drain whatever is left on either side
    violations.extend(current_iter.map(|entry| ViolationKind::Added {
        entry: entry.clone(),
    }));
    violations.extend(baseline_iter.map(|entry| ViolationKind::Removed {
        entry: entry.clone(),
    }));

    // 4. Classify, then drop strict-only kinds outside strict mode
    let violations = violations
        .into_iter()
        .map(|kind| Violation::classify(kind, policy))
        .filter(|violation| strict || !violation.strict())
        .collect();

    Ok(violations)
}

/// Violations for two entries with the same key, one per differing field
fn changed_in_place(base: &PermissionEntry, cur: &PermissionEntry) -> Result<Vec<ViolationKind>> {
    let mut changes = Vec::new();

    match compare_max_version(cur.max_version(), base.max_version()) {
        Ordering::Less => changes.push(ViolationKind::MaxVersionDecreased {
            entry: cur.clone(),
            from: base.max_version(),
        }),
        Ordering::Greater => changes.push(ViolationKind::MaxVersionIncreased {
            entry: cur.clone(),
            from: base.max_version(),
        }),
        Ordering::Equal => {}
    }
    if cur.required() != base.required() {
        changes.push(ViolationKind::RequiredChanged {
            entry: cur.clone(),
            from: base.required(),
        });
    }
    if cur.gl_version() != base.gl_version() {
        changes.push(ViolationKind::CapabilityChanged {
            entry: cur.clone(),
            from: base.gl_version().map(str::to_string),
        });
    }

    if changes.is_empty() {
        return Err(PermCheckError::Internal {
            reason: format!(
                "entries '{}' and '{}' share a key but differ in no known field",
                base, cur
            ),
        });
    }
    Ok(changes)
}
