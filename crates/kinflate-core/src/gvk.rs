//! Resource identity: GroupVersionKind and GroupVersionKindName

use std::cmp::Ordering;
use std::fmt;

/// Kubernetes API type identifier
///
/// When used as a selector (see [`Gvk::is_selected`]) empty fields match
/// anything, so `Gvk::kind("ConfigMap")` selects ConfigMaps of any group or
/// version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Gvk {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl Gvk {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// Selector matching `kind` in any group and version
    pub fn kind(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// Split an `apiVersion` (`group/version`, or `version` for the core group)
    pub fn from_api_version(api_version: &str, kind: impl Into<String>) -> Self {
        let (group, version) = api_version
            .split_once('/')
            .unwrap_or(("", api_version));
        Self::new(group, version, kind)
    }

    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    /// Whether this type is selected by `selector`, treating empty selector
    /// fields as wildcards
    pub fn is_selected(&self, selector: &Gvk) -> bool {
        (selector.group.is_empty() || selector.group == self.group)
            && (selector.version.is_empty() || selector.version == self.version)
            && (selector.kind.is_empty() || selector.kind == self.kind)
    }
}

impl fmt::Display for Gvk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}, Kind={}", self.group, self.version, self.kind)
    }
}

impl Ord for Gvk {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string()
            .cmp(&other.to_string())
            .then_with(|| self.group.cmp(&other.group))
            .then_with(|| self.version.cmp(&other.version))
            .then_with(|| self.kind.cmp(&other.kind))
    }
}

impl PartialOrd for Gvk {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Identity of a resource before any renaming
///
/// Collections are keyed by this value, ordered by type then name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupVersionKindName {
    pub gvk: Gvk,
    pub name: String,
}

impl GroupVersionKindName {
    pub fn new(gvk: Gvk, name: impl Into<String>) -> Self {
        Self {
            gvk,
            name: name.into(),
        }
    }
}

impl fmt::Display for GroupVersionKindName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Name={}", self.gvk, self.name)
    }
}
