use crate::state::IndexState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ListSectionsRequest {}

/// List loaded index sections with their record counts.
pub fn handle_list_sections(state: &IndexState, _request: ListSectionsRequest) -> String {
    let catalog = state.catalog();
    let mut output = String::new();

    if state.source().as_os_str().is_empty() {
        output.push_str("Search index sections:\n\n");
    } else {
        let _ = writeln!(output, "Search index sections ({}):\n", state.source().display());
    }

    for (section, store) in catalog.sections() {
        let default_marker = if catalog.default_section() == Some(section) {
            " (default)"
        } else {
            ""
        };
        let _ = writeln!(output, "• {}: {} records{}", section, store.len(), default_marker);
    }

    let _ = write!(
        output,
        "\nTotal: {} records. Matching mode: {:?}.\n",
        catalog.total_records(),
        state.engine().mode()
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{Catalog, IndexStore, QueryEngine, Section};
    use assert2::check;

    #[test]
    fn reports_counts_and_default() {
        let store = IndexStore::from_search_data("[['a_1',['A',['a.html',1,'']]]]").unwrap();
        let state = IndexState::new(
            Catalog::from_store(Section::Functions, store),
            QueryEngine::default(),
            10,
        );
        let output = handle_list_sections(&state, ListSectionsRequest::default());
        check!(output.contains("• functions: 1 records (default)"));
        check!(output.contains("Total: 1 records"));
    }
}
