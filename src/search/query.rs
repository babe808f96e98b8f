//! Keyword lookups against an [`IndexStore`].
//!
//! Matching is purely textual. Results always come back in index order; there
//! is no scoring or re-ranking of matches.

use ahash::AHashSet;
use rapidfuzz::distance::jaro_winkler;
use rmcp::schemars;
use serde::{Deserialize, Serialize};

use super::record::SearchRecord;
use super::store::{IndexStore, Needles};

/// Minimum Jaro-Winkler similarity for a term to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// How a normalized query is compared against keys.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Key starts with or contains the query
    #[default]
    Substring,
    /// Key starts with the query, as the generated search box does
    Prefix,
}

/// Trims and lowercases user input. Returns `None` for blank input.
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

/// A stateless query evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEngine {
    mode: MatchMode,
}

impl QueryEngine {
    pub fn new(mode: MatchMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Returns every record whose key matches `query`, in index order.
    ///
    /// Both the stored key (`elf_2eh_161`) and its decoded term (`elf.h`) are
    /// tried, so users can type either form. Blank queries match nothing.
    pub fn search<'s>(&self, store: &'s IndexStore, query: &str) -> Vec<&'s SearchRecord> {
        let Some(query) = normalize_query(query) else {
            return Vec::new();
        };

        let results: Vec<_> = store
            .entries()
            .filter(|(_, needles)| self.matches(needles, &query))
            .map(|(record, _)| record)
            .collect();

        tracing::debug!(
            "Query '{}' ({:?}) matched {} of {} records",
            query,
            self.mode,
            results.len(),
            store.len()
        );
        results
    }

    fn matches(&self, needles: &Needles, query: &str) -> bool {
        match self.mode {
            MatchMode::Substring => needles.key.contains(query) || needles.term.contains(query),
            MatchMode::Prefix => needles.key.starts_with(query) || needles.term.starts_with(query),
        }
    }

    /// Terms that resemble `query`, best first, for "did you mean" hints.
    ///
    /// Only meant for presenting an empty result; it never changes what
    /// [`QueryEngine::search`] returns.
    pub fn suggest(&self, store: &IndexStore, query: &str, limit: usize) -> Vec<String> {
        let Some(query) = normalize_query(query) else {
            return Vec::new();
        };

        let mut seen = AHashSet::new();
        let mut scored: Vec<(f64, &str)> = store
            .entries()
            .filter(|(_, needles)| seen.insert(needles.term.as_str()))
            .map(|(_, needles)| {
                let score = jaro_winkler::similarity(query.chars(), needles.term.chars());
                (score, needles.term.as_str())
            })
            .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
            .collect();

        // Stable sort keeps index order among equal scores
        scored.sort_by(|(a, _), (b, _)| b.total_cmp(a));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, term)| term.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{Location, Target};
    use assert2::{check, let_assert};
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> IndexStore {
        let records = ["enqueue", "error", "europe"]
            .into_iter()
            .map(|key| {
                SearchRecord::new(key, key, Target::Single(Location::new("x.html", "CKSDK")))
            });
        IndexStore::load(records).unwrap()
    }

    fn keys(results: &[&SearchRecord]) -> Vec<String> {
        results.iter().map(|r| r.key.clone()).collect()
    }

    #[rstest]
    #[case("e", &["enqueue", "error", "europe"])]
    #[case("enq", &["enqueue"])]
    #[case("zz", &[])]
    #[case("ro", &["error", "europe"])]
    #[case("  ENQ ", &["enqueue"])]
    fn substring_matches_in_index_order(
        store: IndexStore,
        #[case] query: &str,
        #[case] expected: &[&str],
    ) {
        let results = QueryEngine::default().search(&store, query);
        check!(keys(&results) == expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_query_matches_nothing(store: IndexStore, #[case] query: &str) {
        check!(QueryEngine::default().search(&store, query).is_empty());
    }

    #[rstest]
    fn prefix_mode_requires_leading_match(store: IndexStore) {
        let engine = QueryEngine::new(MatchMode::Prefix);
        check!(keys(&engine.search(&store, "eu")) == ["europe"]);
        check!(engine.search(&store, "ro").is_empty());
    }

    #[test]
    fn decoded_term_is_searchable() {
        let records = vec![
            SearchRecord::new("elf_2eh_161", "ELF.h", Target::Single(Location::new("elf.html", ""))),
            SearchRecord::new("elfhash_172", "ElfHash", Target::Single(Location::new("e.html", ""))),
        ];
        let_assert!(Ok(store) = IndexStore::load(records));
        let engine = QueryEngine::default();

        check!(keys(&engine.search(&store, "ELF.H")) == ["elf_2eh_161"]);
        check!(keys(&engine.search(&store, "elf_2eh")) == ["elf_2eh_161"]);
        check!(engine.search(&store, "elf").len() == 2);
    }

    #[rstest]
    fn suggests_close_terms(store: IndexStore) {
        let engine = QueryEngine::default();
        let suggestions = engine.suggest(&store, "eror", 3);
        check!(suggestions.first().map(String::as_str) == Some("error"));
        check!(engine.suggest(&store, "", 3).is_empty());
        check!(engine.suggest(&store, "qqqqqqqq", 3).is_empty());
    }
}
