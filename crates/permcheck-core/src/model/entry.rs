use std::cmp::Ordering;
use std::fmt;

/// Declaration shape of a permission or feature entry
///
/// The tag string doubles as the element name in manifests, baselines and
/// reports, and as the secondary sort key of [`PermissionEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// `<uses-permission>`
    Permission,
    /// `<uses-permission-sdk-23>`, only requested on runtime-permission platforms
    RuntimePermission,
    /// `<uses-feature>`
    Feature,
}

impl EntryKind {
    /// All kinds in document order (the order the parser and baseline writer use)
    pub const ALL: [EntryKind; 3] = [
        EntryKind::Permission,
        EntryKind::RuntimePermission,
        EntryKind::Feature,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            EntryKind::Permission => "uses-permission",
            EntryKind::RuntimePermission => "uses-permission-sdk-23",
            EntryKind::Feature => "uses-feature",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        EntryKind::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single declared permission or feature
///
/// Equality is structural over every field. Two entries with the same name
/// and kind but different optional fields are distinct; the diff engine
/// relies on that to report in-place changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionEntry {
    kind: EntryKind,
    name: String,
    max_version: Option<u32>,
    required: Option<bool>,
    gl_version: Option<String>,
}

impl PermissionEntry {
    pub fn new(kind: EntryKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            max_version: None,
            required: None,
            gl_version: None,
        }
    }

    /// A regular `<uses-permission>` entry
    pub fn permission(name: impl Into<String>) -> Self {
        Self::new(EntryKind::Permission, name)
    }

    /// A runtime-scoped `<uses-permission-sdk-23>` entry
    pub fn runtime_permission(name: impl Into<String>) -> Self {
        Self::new(EntryKind::RuntimePermission, name)
    }

    /// A `<uses-feature>` entry; `name` may be empty for a pure OpenGL ES constraint
    pub fn feature(name: impl Into<String>) -> Self {
        Self::new(EntryKind::Feature, name)
    }

    pub fn with_max_version(mut self, max_version: u32) -> Self {
        self.max_version = Some(max_version);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_gl_version(mut self, gl_version: impl Into<String>) -> Self {
        self.gl_version = Some(gl_version.into());
        self
    }

    pub(crate) fn replace_max_version(mut self, max_version: Option<u32>) -> Self {
        self.max_version = max_version;
        self
    }

    pub(crate) fn replace_required(mut self, required: Option<bool>) -> Self {
        self.required = required;
        self
    }

    pub(crate) fn replace_gl_version(mut self, gl_version: Option<String>) -> Self {
        self.gl_version = gl_version;
        self
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Upper SDK bound; `None` is unbounded
    pub fn max_version(&self) -> Option<u32> {
        self.max_version
    }

    pub fn required(&self) -> Option<bool> {
        self.required
    }

    pub fn gl_version(&self) -> Option<&str> {
        self.gl_version.as_deref()
    }

    /// Canonical `(name, tag)` key used to pair baseline and manifest entries
    pub fn key(&self) -> (&str, &'static str) {
        (&self.name, self.kind.tag())
    }

    /// Present attributes in canonical order, un-namespaced
    ///
    /// An empty name is omitted so name-less features round-trip.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attributes = Vec::with_capacity(4);
        if !self.name.is_empty() {
            attributes.push(("name", self.name.clone()));
        }
        if let Some(max_version) = self.max_version {
            attributes.push(("maxSdkVersion", max_version.to_string()));
        }
        if let Some(required) = self.required {
            attributes.push(("required", required.to_string()));
        }
        if let Some(gl_version) = &self.gl_version {
            attributes.push(("glEsVersion", gl_version.clone()));
        }
        attributes
    }
}

/// Compare upper bounds where an absent bound is larger than any value
pub(crate) fn compare_max_version(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(&b),
    }
}

impl Ord for PermissionEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key()
            .cmp(&other.key())
            .then_with(|| compare_max_version(self.max_version, other.max_version))
            .then_with(|| self.required.cmp(&other.required))
            .then_with(|| self.gl_version.cmp(&other.gl_version))
    }
}

impl PartialOrd for PermissionEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Manifest-style rendering, e.g.
/// `<uses-permission android:name="android.permission.CAMERA" android:maxSdkVersion="26" />`
impl fmt::Display for PermissionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} ", self.kind.tag())?;
        for (name, value) in self.attributes() {
            write!(f, "android:{}=\"{}\" ", name, value)?;
        }
        f.write_str("/>")
    }
}
