//! Search record types.

use serde::Serialize;
use std::borrow::Cow;

use super::decode::{decode_entities, decode_key};

/// One place in the generated documentation that a record resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    /// Relative document path, optionally followed by `#fragment`
    pub path: String,
    /// Namespace, class or file that qualifies the label (may be empty)
    pub scope: String,
    /// Generator link flag: open inside the documentation frame
    pub in_frame: bool,
}

impl Location {
    pub fn new(path: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            scope: scope.into(),
            in_frame: true,
        }
    }

    /// The document part of the path, without the fragment.
    pub fn document(&self) -> &str {
        self.path.split_once('#').map_or(&self.path, |(doc, _)| doc)
    }

    /// The anchor after `#`, if any.
    pub fn fragment(&self) -> Option<&str> {
        self.path
            .split_once('#')
            .map(|(_, fragment)| fragment)
            .filter(|fragment| !fragment.is_empty())
    }

    /// Scope label with HTML entities decoded.
    pub fn display_scope(&self) -> Cow<'_, str> {
        decode_entities(&self.scope)
    }
}

/// Where a label resolves to.
///
/// Overloaded names and members repeated across scopes resolve to several
/// locations; everything else to exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Target {
    Single(Location),
    Multiple(Vec<Location>),
}

impl Target {
    /// Builds the natural variant for a list of locations.
    pub fn from_locations(mut locations: Vec<Location>) -> Self {
        if locations.len() == 1 {
            Self::Single(locations.remove(0))
        } else {
            Self::Multiple(locations)
        }
    }

    /// Flat view of every location regardless of variant.
    pub fn locations(&self) -> &[Location] {
        match self {
            Self::Single(location) => std::slice::from_ref(location),
            Self::Multiple(locations) => locations,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.locations().is_empty()
    }
}

/// One entry of the search index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SearchRecord {
    /// Search token exactly as stored, e.g. `elf_2eh_161`
    pub key: String,
    /// Label shown in results, may contain HTML entities
    pub label: String,
    pub target: Target,
}

impl SearchRecord {
    pub fn new(key: impl Into<String>, label: impl Into<String>, target: Target) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            target,
        }
    }

    /// The key with its numeric suffix stripped and hex escapes decoded.
    ///
    /// `elf_2eh_161` becomes `elf.h`.
    pub fn term(&self) -> String {
        decode_key(&self.key)
    }

    /// Label with HTML entities decoded, e.g. `extend_integral_type< char >`.
    pub fn display_label(&self) -> Cow<'_, str> {
        decode_entities(&self.label)
    }

    pub fn locations(&self) -> &[Location] {
        self.target.locations()
    }
}
