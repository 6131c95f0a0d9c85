use crate::model::PermissionEntry;

/// What changed between a baseline entry and the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// Entry declared in the manifest but not in the baseline
    Added { entry: PermissionEntry },
    /// Entry recorded in the baseline but no longer declared
    Removed { entry: PermissionEntry },
    /// Upper SDK bound raised (or lifted entirely)
    MaxVersionIncreased {
        entry: PermissionEntry,
        from: Option<u32>,
    },
    /// Upper SDK bound lowered (or newly introduced)
    MaxVersionDecreased {
        entry: PermissionEntry,
        from: Option<u32>,
    },
    /// `required` flag of a feature changed
    RequiredChanged {
        entry: PermissionEntry,
        from: Option<bool>,
    },
    /// `glEsVersion` of a feature changed
    CapabilityChanged {
        entry: PermissionEntry,
        from: Option<String>,
    },
}

impl ViolationKind {
    /// Affected entry: the manifest side, or the baseline side for `Removed`
    pub fn entry(&self) -> &PermissionEntry {
        match self {
            ViolationKind::Added { entry }
            | ViolationKind::Removed { entry }
            | ViolationKind::MaxVersionIncreased { entry, .. }
            | ViolationKind::MaxVersionDecreased { entry, .. }
            | ViolationKind::RequiredChanged { entry, .. }
            | ViolationKind::CapabilityChanged { entry, .. } => entry,
        }
    }

    /// Stable identifier used as the `type` attribute of the XML report
    pub fn slug(&self) -> &'static str {
        match self {
            ViolationKind::Added { .. } => "added",
            ViolationKind::Removed { .. } => "removed",
            ViolationKind::MaxVersionIncreased { .. } => "max-sdk-increased",
            ViolationKind::MaxVersionDecreased { .. } => "max-sdk-decreased",
            ViolationKind::RequiredChanged { .. } => "required-changed",
            ViolationKind::CapabilityChanged { .. } => "glEsVersion-changed",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViolationKind::Added { .. } => "New permission added",
            ViolationKind::Removed { .. } => "Permission removed",
            ViolationKind::MaxVersionIncreased { .. } => "Max SDK increased",
            ViolationKind::MaxVersionDecreased { .. } => "Max SDK decreased",
            ViolationKind::RequiredChanged { .. } => "Required changed",
            ViolationKind::CapabilityChanged { .. } => "glEsVersion changed",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ViolationKind::Added { .. } => {
                "Permission was found in the manifest, but not in the baseline."
            }
            ViolationKind::Removed { .. } => {
                "Permission was found in the baseline, but not in the manifest."
            }
            ViolationKind::MaxVersionIncreased { .. } => {
                "Manifest contains a higher max SDK for permission than the baseline entry."
            }
            ViolationKind::MaxVersionDecreased { .. } => {
                "Manifest contains a lower max SDK for permission than the baseline entry."
            }
            ViolationKind::RequiredChanged { .. } => "Required has changed.",
            ViolationKind::CapabilityChanged { .. } => "glEsVersion has changed.",
        }
    }

    /// One-line log message
    pub fn message(&self) -> String {
        match self {
            ViolationKind::Added { entry } => format!("New permission '{}' was added", entry),
            ViolationKind::Removed { entry } => format!("Permission '{}' was removed", entry),
            ViolationKind::MaxVersionIncreased { entry, from } => format!(
                "Max SDK of permission '{}' was increased (from {})",
                entry,
                display_previous(from)
            ),
            ViolationKind::MaxVersionDecreased { entry, from } => format!(
                "Max SDK of permission '{}' was decreased (from {})",
                entry,
                display_previous(from)
            ),
            ViolationKind::RequiredChanged { entry, from } => format!(
                "Required of '{}' has changed (required {})",
                entry,
                display_previous(from)
            ),
            ViolationKind::CapabilityChanged { entry, from } => format!(
                "GlEsVersion of '{}' has changed (glEsVersion {})",
                entry,
                display_previous(from)
            ),
        }
    }

    /// Attribute name and rendered prior value for change kinds
    pub fn previous_value(&self) -> Option<(&'static str, String)> {
        match self {
            ViolationKind::Added { .. } | ViolationKind::Removed { .. } => None,
            ViolationKind::MaxVersionIncreased { from, .. }
            | ViolationKind::MaxVersionDecreased { from, .. } => {
                Some(("previousMaxSdkVersion", display_previous(from)))
            }
            ViolationKind::RequiredChanged { from, .. } => {
                Some(("previousRequired", display_previous(from)))
            }
            ViolationKind::CapabilityChanged { from, .. } => {
                Some(("previousGlEsVersion", display_previous(from)))
            }
        }
    }

    /// The entry as it was recorded in the baseline, if there was one
    pub fn previous_entry(&self) -> Option<PermissionEntry> {
        match self {
            ViolationKind::Added { .. } => None,
            ViolationKind::Removed { entry } => Some(entry.clone()),
            ViolationKind::MaxVersionIncreased { entry, from }
            | ViolationKind::MaxVersionDecreased { entry, from } => {
                Some(entry.clone().replace_max_version(*from))
            }
            ViolationKind::RequiredChanged { entry, from } => {
                Some(entry.clone().replace_required(*from))
            }
            ViolationKind::CapabilityChanged { entry, from } => {
                Some(entry.clone().replace_gl_version(from.clone()))
            }
        }
    }

    /// The entry as it is declared in the manifest, if it still is
    pub fn current_entry(&self) -> Option<&PermissionEntry> {
        match self {
            ViolationKind::Removed { .. } => None,
            other => Some(other.entry()),
        }
    }
}

fn display_previous<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string())
}

/// Which violation kinds are only reported in strict mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrictnessPolicy {
    pub removed_strict: bool,
    pub max_version_decreased_strict: bool,
    pub required_changed_strict: bool,
    pub capability_changed_strict: bool,
}

impl Default for StrictnessPolicy {
    fn default() -> Self {
        Self {
            removed_strict: true,
            max_version_decreased_strict: true,
            required_changed_strict: false,
            capability_changed_strict: false,
        }
    }
}

impl StrictnessPolicy {
    pub fn is_strict(&self, kind: &ViolationKind) -> bool {
        match kind {
            ViolationKind::Added { .. } | ViolationKind::MaxVersionIncreased { .. } => false,
            ViolationKind::Removed { .. } => self.removed_strict,
            ViolationKind::MaxVersionDecreased { .. } => self.max_version_decreased_strict,
            ViolationKind::RequiredChanged { .. } => self.required_changed_strict,
            ViolationKind::CapabilityChanged { .. } => self.capability_changed_strict,
        }
    }
}

/// A classified difference, tagged with whether it is strict-only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    kind: ViolationKind,
    strict: bool,
}

impl Violation {
    pub fn new(kind: ViolationKind, strict: bool) -> Self {
        Self { kind, strict }
    }

    /// Tag `kind` according to `policy`
    pub fn classify(kind: ViolationKind, policy: &StrictnessPolicy) -> Self {
        let strict = policy.is_strict(&kind);
        Self { kind, strict }
    }

    pub fn added(entry: PermissionEntry) -> Self {
        Self::classify(ViolationKind::Added { entry }, &StrictnessPolicy::default())
    }

    pub fn removed(entry: PermissionEntry) -> Self {
        Self::classify(ViolationKind::Removed { entry }, &StrictnessPolicy::default())
    }

    pub fn max_version_increased(entry: PermissionEntry, from: Option<u32>) -> Self {
        Self::classify(
            ViolationKind::MaxVersionIncreased { entry, from },
            &StrictnessPolicy::default(),
        )
    }

    pub fn max_version_decreased(entry: PermissionEntry, from: Option<u32>) -> Self {
        Self::classify(
            ViolationKind::MaxVersionDecreased { entry, from },
            &StrictnessPolicy::default(),
        )
    }

    pub fn kind(&self) -> &ViolationKind {
        &self.kind
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn entry(&self) -> &PermissionEntry {
        self.kind.entry()
    }

    pub fn message(&self) -> String {
        self.kind.message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_render_absent_bound_as_dash() {
        let v = Violation::max_version_increased(
            PermissionEntry::permission("android.permission.ACCESS_FINE_LOCATION"),
            None,
        );
        assert_eq!(
            v.message(),
            r#"Max SDK of permission '<uses-permission android:name="android.permission.ACCESS_FINE_LOCATION" />' was increased (from -)"#
        );
    }

    #[test]
    fn test_default_policy_marks_removal_and_decrease_strict() {
        let entry = PermissionEntry::permission("X");
        assert!(!Violation::added(entry.clone()).strict());
        assert!(Violation::removed(entry.clone()).strict());
        assert!(!Violation::max_version_increased(entry.clone(), Some(1)).strict());
        assert!(Violation::max_version_decreased(entry, Some(30)).strict());
    }

    #[test]
    fn test_previous_entry_restores_baseline_side() {
        let current = PermissionEntry::runtime_permission("INTERNET").with_max_version(25);
        let kind = ViolationKind::MaxVersionDecreased {
            entry: current.clone(),
            from: Some(28),
        };
        assert_eq!(
            kind.previous_entry(),
            Some(PermissionEntry::runtime_permission("INTERNET").with_max_version(28))
        );
        assert_eq!(kind.current_entry(), Some(&current));

        let feature = PermissionEntry::feature("android.hardware.camera").with_required(false);
        let kind = ViolationKind::RequiredChanged {
            entry: feature,
            from: None,
        };
        assert_eq!(
            kind.previous_entry(),
            Some(PermissionEntry::feature("android.hardware.camera"))
        );
        assert_eq!(kind.previous_value(), Some(("previousRequired", "-".to_string())));
    }

    #[test]
    fn test_policy_can_promote_feature_changes_to_strict() {
        let policy = StrictnessPolicy {
            required_changed_strict: true,
            ..StrictnessPolicy::default()
        };
        let v = Violation::classify(
            ViolationKind::RequiredChanged {
                entry: PermissionEntry::feature("f").with_required(true),
                from: Some(false),
            },
            &policy,
        );
        assert!(v.strict());
        assert_eq!(v.kind().slug(), "required-changed");
    }
}
