//! Immutable, ordered storage of search records.

use crate::error::IndexError;
use ahash::AHashSet;
use std::path::Path;

use super::record::SearchRecord;
use super::searchdata::{parse_search_data, render_search_data};

/// Lowercased forms of a record's key used for matching.
///
/// Computed once at load so that searching never allocates per record.
#[derive(Debug, Clone)]
pub(crate) struct Needles {
    /// The stored key, lowercased
    pub(crate) key: String,
    /// The decoded term, lowercased
    pub(crate) term: String,
}

/// The ordered collection of records for one index.
///
/// There is no mutation API: once loaded, a store is shared read-only.
#[derive(Debug, Clone, Default)]
pub struct IndexStore {
    records: Vec<SearchRecord>,
    needles: Vec<Needles>,
}

impl IndexStore {
    /// Validates and stores records in the order given.
    ///
    /// Fails on the first record that lacks a key, a label, or any target;
    /// no partial store is returned.
    pub fn load(records: impl IntoIterator<Item = SearchRecord>) -> Result<Self, IndexError> {
        let store = Self::build(records.into_iter().collect())?;
        store.report_duplicates();
        Ok(store)
    }

    /// Validation and match forms without the duplicate report, for shards
    /// that are reported once merged.
    pub(crate) fn build(records: Vec<SearchRecord>) -> Result<Self, IndexError> {

        for (position, record) in records.iter().enumerate() {
            if record.key.trim().is_empty() {
                return Err(IndexError::malformed(position, "missing key"));
            }
            if record.label.is_empty() {
                return Err(IndexError::malformed(
                    position,
                    format!("'{}' has no label", record.key),
                ));
            }
            if record.target.is_empty() {
                return Err(IndexError::malformed(
                    position,
                    format!("'{}' has no targets", record.key),
                ));
            }
        }

        // Queries are trimmed, so the match forms are too
        let needles = records
            .iter()
            .map(|record| Needles {
                key: record.key.trim().to_lowercase(),
                term: record.term().trim().to_lowercase(),
            })
            .collect();

        tracing::debug!("Loaded {} search records", records.len());
        Ok(Self { records, needles })
    }

    /// Parses generator search data and loads it.
    pub fn from_search_data(text: &str) -> Result<Self, IndexError> {
        Self::load(parse_search_data(text)?)
    }

    /// Reads, parses and loads a search data file.
    pub fn from_path(path: &Path) -> Result<Self, IndexError> {
        Self::load(read_path(path)?)
    }

    /// Iterates every record in original order. Can be called any number of times.
    pub fn all(&self) -> impl ExactSizeIterator<Item = &SearchRecord> + Clone + '_ {
        self.records.iter()
    }

    pub fn get(&self, position: usize) -> Option<&SearchRecord> {
        self.records.get(position)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records that exactly repeat an earlier one.
    pub fn duplicate_count(&self) -> usize {
        count_duplicates(&self.records)
    }

    /// Renders the store in the generator's `var searchData=[...];` format.
    pub fn to_search_data(&self) -> String {
        render_search_data(&self.records)
    }

    /// Records paired with their match forms, in order.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&SearchRecord, &Needles)> + '_ {
        self.records.iter().zip(&self.needles)
    }

    /// Concatenates stores in the order given and reports duplicates across
    /// all of them.
    pub(crate) fn concat(stores: Vec<IndexStore>) -> Self {
        let mut merged = IndexStore::default();
        for store in stores {
            merged.records.extend(store.records);
            merged.needles.extend(store.needles);
        }
        merged.report_duplicates();
        merged
    }

    fn report_duplicates(&self) {
        let duplicates = self.duplicate_count();
        if duplicates > 0 {
            tracing::warn!("Search index contains {} duplicate records", duplicates);
        }
    }
}

/// Reads and parses a search data file without loading it.
pub(crate) fn read_path(path: &Path) -> Result<Vec<SearchRecord>, IndexError> {
    let text = std::fs::read_to_string(path).map_err(|source| IndexError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_search_data(&text)
}

fn count_duplicates(records: &[SearchRecord]) -> usize {
    let mut seen = AHashSet::with_capacity(records.len());
    records.iter().filter(|record| !seen.insert(*record)).count()
}
