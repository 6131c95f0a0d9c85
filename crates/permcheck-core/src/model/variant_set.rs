use crate::model::PermissionEntry;
use std::collections::BTreeSet;

/// Unique entries declared by one variant
pub type EntrySet = BTreeSet<PermissionEntry>;

/// Variant name → entry set, in insertion order
///
/// Insertion order is what the baseline writer and the reporters emit, so the
/// map keeps it explicitly instead of sorting by name. Re-inserting an
/// existing variant replaces its set in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantPermissionSet {
    variants: Vec<(String, EntrySet)>,
}

impl VariantPermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or fully replace the set of `variant`, returning the previous set
    pub fn insert(&mut self, variant: impl Into<String>, entries: EntrySet) -> Option<EntrySet> {
        let variant = variant.into();
        match self.variants.iter_mut().find(|(name, _)| *name == variant) {
            Some((_, existing)) => Some(std::mem::replace(existing, entries)),
            None => {
                self.variants.push((variant, entries));
                None
            }
        }
    }

    pub fn get(&self, variant: &str) -> Option<&EntrySet> {
        self.variants
            .iter()
            .find(|(name, _)| name == variant)
            .map(|(_, entries)| entries)
    }

    pub fn contains_variant(&self, variant: &str) -> bool {
        self.get(variant).is_some()
    }

    pub fn variant_names(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntrySet)> {
        self.variants
            .iter()
            .map(|(name, entries)| (name.as_str(), entries))
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Replace every variant named in `update`, leaving all others untouched
    ///
    /// Existing variants keep their position; new ones are appended in the
    /// order `update` introduces them.
    pub fn merge_from(&mut self, update: VariantPermissionSet) {
        for (variant, entries) in update.variants {
            self.insert(variant, entries);
        }
    }
}

impl<N: Into<String>> FromIterator<(N, EntrySet)> for VariantPermissionSet {
    fn from_iter<I: IntoIterator<Item = (N, EntrySet)>>(iter: I) -> Self {
        let mut set = VariantPermissionSet::new();
        for (variant, entries) in iter {
            set.insert(variant, entries);
        }
        set
    }
}

impl IntoIterator for VariantPermissionSet {
    type Item = (String, EntrySet);
    type IntoIter = std::vec::IntoIter<(String, EntrySet)>;

    fn into_iter(self) -> Self::IntoIter {
        self.variants.into_iter()
    }
}
