//! Loading of a generator `search/` directory into per-section stores.
//!
//! The generator splits its index by section and by first letter, writing
//! files such as `all_4.js`, `classes_a.js` or `functions_1f.js`. Shards of a
//! section are concatenated in shard order to rebuild the section's index.

use crate::error::IndexError;
use ignore::WalkBuilder;
use regex::Regex;
use rmcp::schemars;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use super::store::{IndexStore, read_path};

static SHARD_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z]+)_([0-9a-f]+)\.js$").unwrap());

/// An index section, named after the generator's file prefix.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lower")]
pub enum Section {
    All,
    Classes,
    Namespaces,
    Files,
    Functions,
    Variables,
    Typedefs,
    Enums,
    EnumValues,
    Related,
    Defines,
    Groups,
    Pages,
    Concepts,
}

impl Section {
    pub const ALL: [Section; 14] = [
        Section::All,
        Section::Classes,
        Section::Namespaces,
        Section::Files,
        Section::Functions,
        Section::Variables,
        Section::Typedefs,
        Section::Enums,
        Section::EnumValues,
        Section::Related,
        Section::Defines,
        Section::Groups,
        Section::Pages,
        Section::Concepts,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::All => "all",
            Section::Classes => "classes",
            Section::Namespaces => "namespaces",
            Section::Files => "files",
            Section::Functions => "functions",
            Section::Variables => "variables",
            Section::Typedefs => "typedefs",
            Section::Enums => "enums",
            Section::EnumValues => "enumvalues",
            Section::Related => "related",
            Section::Defines => "defines",
            Section::Groups => "groups",
            Section::Pages => "pages",
            Section::Concepts => "concepts",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown index section '{}'", s))
    }
}

/// Parses `<section>_<hex shard>.js` into its parts.
pub(crate) fn parse_shard_name(file_name: &str) -> Option<(Section, u32)> {
    let captures = SHARD_FILE.captures(file_name)?;
    let section = captures[1].parse().ok()?;
    let shard = u32::from_str_radix(&captures[2], 16).ok()?;
    Some((section, shard))
}

/// Every loaded section of one documentation set.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sections: BTreeMap<Section, IndexStore>,
}

impl Catalog {
    /// Wraps a single store as the given section.
    pub fn from_store(section: Section, store: IndexStore) -> Self {
        Self {
            sections: BTreeMap::from([(section, store)]),
        }
    }

    /// Loads either a `search/` directory or a single search data file.
    ///
    /// A single file takes its section from its name, falling back to `all`.
    pub fn load_path(path: &Path) -> Result<Self, IndexError> {
        if path.is_dir() {
            return Self::load_dir(path);
        }

        let section = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(parse_shard_name)
            .map_or(Section::All, |(section, _)| section);

        let store = IndexStore::from_path(path)?;
        tracing::info!(
            "Loaded {} records from {} as section '{}'",
            store.len(),
            path.display(),
            section
        );
        Ok(Self::from_store(section, store))
    }

    /// Loads every shard file directly inside `dir`.
    ///
    /// Other files (`search.js`, `searchdata.js`, HTML, CSS) are ignored.
    pub fn load_dir(dir: &Path) -> Result<Self, IndexError> {
        let start = std::time::Instant::now();
        let mut shards: BTreeMap<Section, Vec<(u32, PathBuf)>> = BTreeMap::new();

        // Generated docs are often gitignored, so ignore files must not apply
        for entry in WalkBuilder::new(dir)
            .standard_filters(false)
            .max_depth(Some(1))
            .build()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_some_and(|t| t.is_file()))
        {
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            match parse_shard_name(name) {
                Some((section, shard)) => shards
                    .entry(section)
                    .or_default()
                    .push((shard, entry.path().to_path_buf())),
                None => tracing::debug!("Skipping non-shard file {}", entry.path().display()),
            }
        }

        if shards.is_empty() {
            return Err(IndexError::NoShards {
                dir: dir.to_path_buf(),
            });
        }

        let mut sections = BTreeMap::new();
        for (section, mut files) in shards {
            files.sort_by_key(|(shard, _)| *shard);
            let stores = files
                .iter()
                .map(|(_, path)| read_path(path).and_then(IndexStore::build))
                .collect::<Result<Vec<_>, _>>()?;
            let store = IndexStore::concat(stores);
            tracing::debug!(
                "Section '{}': {} records from {} shards",
                section,
                store.len(),
                files.len()
            );
            sections.insert(section, store);
        }

        let catalog = Self { sections };
        tracing::info!(
            "Loaded search index from {}: {} sections, {} records in {:?}",
            dir.display(),
            catalog.sections.len(),
            catalog.total_records(),
            start.elapsed()
        );
        Ok(catalog)
    }

    pub fn section(&self, section: Section) -> Option<&IndexStore> {
        self.sections.get(&section)
    }

    /// Loaded sections in declaration order.
    pub fn sections(&self) -> impl Iterator<Item = (Section, &IndexStore)> + '_ {
        self.sections.iter().map(|(section, store)| (*section, store))
    }

    pub fn total_records(&self) -> usize {
        self.sections.values().map(IndexStore::len).sum()
    }

    /// The section searched when a caller does not name one: `all` if
    /// present, otherwise the first loaded section.
    pub fn default_section(&self) -> Option<Section> {
        if self.sections.contains_key(&Section::All) {
            Some(Section::All)
        } else {
            self.sections.keys().next().copied()
        }
    }
}
