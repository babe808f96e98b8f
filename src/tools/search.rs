//! Keyword search handler over the loaded catalog.

use crate::search::{IndexStore, Location, SearchRecord, Section};
use crate::state::IndexState;
use rmcp::schemars;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Maximum number of "did you mean" terms shown for an empty result.
const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Keyword to look up (case-insensitive; matches key prefixes and substrings)
    pub query: String,
    /// Index section to search (default: "all", or the only loaded section)
    #[serde(default)]
    pub section: Option<Section>,
    /// Maximum number of results to return (default from configuration)
    #[serde(default)]
    pub limit: Option<usize>,
}

/// A search result in serializable form.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub key: String,
    pub term: String,
    pub label: String,
    pub locations: Vec<Location>,
}

impl From<&SearchRecord> for SearchHit {
    fn from(record: &SearchRecord) -> Self {
        Self {
            key: record.key.clone(),
            term: record.term(),
            label: record.display_label().into_owned(),
            locations: record.locations().to_vec(),
        }
    }
}

/// Outcome of a lookup, before formatting.
#[derive(Debug)]
pub struct SearchOutcome<'a> {
    pub section: Section,
    /// Every match, in index order
    pub matches: Vec<&'a SearchRecord>,
    /// Number of matches to present
    pub limit: usize,
    /// Close terms, only filled when nothing matched
    pub suggestions: Vec<String>,
}

impl SearchOutcome<'_> {
    pub fn shown(&self) -> &[&SearchRecord] {
        &self.matches[..self.matches.len().min(self.limit)]
    }

    pub fn hits(&self) -> Vec<SearchHit> {
        self.shown().iter().map(|record| SearchHit::from(*record)).collect()
    }
}

/// Resolves the section and runs the query.
pub fn run_search<'a>(
    state: &'a IndexState,
    request: &SearchRequest,
) -> Result<SearchOutcome<'a>, String> {
    let catalog = state.catalog();
    let section = request
        .section
        .or_else(|| catalog.default_section())
        .ok_or_else(|| "The search index is empty.".to_string())?;

    let store: &IndexStore = catalog.section(section).ok_or_else(|| {
        let available: Vec<_> = catalog.sections().map(|(s, _)| s.as_str()).collect();
        format!(
            "Section '{}' is not loaded. Available sections: {}",
            section,
            available.join(", ")
        )
    })?;

    let engine = state.engine();
    let matches = engine.search(store, &request.query);
    let suggestions = if matches.is_empty() {
        engine.suggest(store, &request.query, MAX_SUGGESTIONS)
    } else {
        Vec::new()
    };

    Ok(SearchOutcome {
        section,
        matches,
        limit: request.limit.unwrap_or(state.default_limit()).max(1),
        suggestions,
    })
}

/// Execute the search operation and format a readable response.
pub fn handle_search(state: &IndexState, request: SearchRequest) -> Result<String, String> {
    if request.query.trim().is_empty() {
        return Ok("Enter a keyword to search for.".to_string());
    }

    let outcome = run_search(state, &request)?;
    tracing::info!(
        "Search '{}' in '{}': {} matches",
        request.query,
        outcome.section,
        outcome.matches.len()
    );

    if outcome.matches.is_empty() {
        return Ok(format_no_results(&request.query, &outcome));
    }

    Ok(format_search_results(&request.query, &outcome))
}

fn format_no_results(query: &str, outcome: &SearchOutcome<'_>) -> String {
    let mut msg = format!(
        "No results found for '{}' in section '{}'.\n",
        query.trim(),
        outcome.section
    );

    if !outcome.suggestions.is_empty() {
        msg.push_str("\nDid you mean:\n");
        for suggestion in &outcome.suggestions {
            let _ = writeln!(msg, "• `{}`", suggestion);
        }
    }

    msg.push_str("\nSearch tips:\n");
    msg.push_str("• Try a shorter prefix of the name\n");
    msg.push_str("• Search by the bare member name, not the qualified path\n");
    if query.contains("::") {
        msg.push_str("• Note: qualified scopes are shown with results but not searched\n");
    }
    msg
}

/// Format search results into a readable string output.
fn format_search_results(query: &str, outcome: &SearchOutcome<'_>) -> String {
    let shown = outcome.shown();
    let mut output = format!(
        "Search results for '{}' in '{}' ({} of {}):\n\n",
        query.trim(),
        outcome.section,
        shown.len(),
        outcome.matches.len()
    );

    for (idx, record) in shown.iter().enumerate() {
        let label = record.display_label();
        match record.locations() {
            [location] => {
                let scope = location.display_scope();
                if scope.is_empty() {
                    let _ = writeln!(output, "{}. {}", idx + 1, label);
                } else {
                    let _ = writeln!(output, "{}. {} - {}", idx + 1, label, scope);
                }
                let _ = writeln!(output, "   {}", location.path);
            }
            locations => {
                let _ = writeln!(output, "{}. {} ({} locations)", idx + 1, label, locations.len());
                for location in locations {
                    let _ = writeln!(output, "   • {} - {}", location.display_scope(), location.path);
                }
            }
        }
    }

    if outcome.matches.len() > shown.len() {
        let _ = write!(
            output,
            "\n{} more matches not shown; raise the limit or refine the query.\n",
            outcome.matches.len() - shown.len()
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{Catalog, QueryEngine};
    use assert2::{check, let_assert};

    fn state() -> IndexState {
        let store = IndexStore::from_search_data(
            "var searchData=[
              ['enc_176',['Enc',['bcd.html#a1',1,'CKSDK::CD::BCD::Enc()'],['loc.html#a2',1,'CKSDK::CD::Loc::Enc()']]],
              ['enqueue_177',['Enqueue',['queue.html#a3',1,'CKSDK::Queue::Queue']]],
              ['exscreen_2eh_185',['ExScreen.h',['exscreen.html',1,'']]]
            ];",
        )
        .unwrap();
        IndexState::new(Catalog::from_store(Section::All, store), QueryEngine::default(), 10)
    }

    fn request(query: &str) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            section: None,
            limit: None,
        }
    }

    #[test]
    fn lists_multiple_locations_as_children() {
        let_assert!(Ok(output) = handle_search(&state(), request("en")));
        check!(output.contains("1. Enc (2 locations)"));
        check!(output.contains("   • CKSDK::CD::Loc::Enc() - loc.html#a2"));
        check!(output.contains("2. Enqueue - CKSDK::Queue::Queue"));
    }

    #[test]
    fn file_results_have_no_scope() {
        let_assert!(Ok(output) = handle_search(&state(), request("exscreen.h")));
        check!(output.contains("1. ExScreen.h\n   exscreen.html"));
    }

    #[test]
    fn limit_truncates_and_reports_rest() {
        let mut req = request("e");
        req.limit = Some(1);
        let_assert!(Ok(output) = handle_search(&state(), req));
        check!(output.contains("(1 of 3)"));
        check!(output.contains("2 more matches not shown"));
    }

    #[test]
    fn empty_result_offers_suggestions() {
        let_assert!(Ok(output) = handle_search(&state(), request("enqeue")));
        check!(output.contains("No results found"));
        check!(output.contains("• `enqueue`"));
    }

    #[test]
    fn missing_section_is_an_error() {
        let mut req = request("enc");
        req.section = Some(Section::Classes);
        let_assert!(Err(message) = handle_search(&state(), req));
        check!(message.contains("Available sections: all"));
    }

    #[test]
    fn hits_carry_decoded_term() {
        let state = state();
        let_assert!(Ok(outcome) = run_search(&state, &request("exscreen")));
        let hits = outcome.hits();
        check!(hits.len() == 1);
        check!(hits[0].term == "exscreen.h");
        check!(hits[0].key == "exscreen_2eh_185");
    }
}
