//! Tool handlers shared by the MCP server and the command line.

pub mod list_sections;
pub mod search;

pub use list_sections::{ListSectionsRequest, handle_list_sections};
pub use search::{SearchHit, SearchRequest, handle_search, run_search};
