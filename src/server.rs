//! MCP server exposing the loaded search index.

use crate::schema::inline_schema_for_type;
use crate::state::IndexState;
use crate::tools::{
    ListSectionsRequest, SearchRequest, handle_list_sections, handle_search,
};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP Server for documentation keyword lookups
#[derive(Clone)]
pub struct SearchServer {
    /// Immutable index state shared by every request
    state: Arc<IndexState>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for SearchServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchServer")
            .field("state", &self.state)
            .finish()
    }
}

#[tool_router]
impl SearchServer {
    pub fn new(state: IndexState) -> Self {
        Self {
            state: Arc::new(state),
            tool_router: Self::tool_router(),
        }
    }

    pub fn state(&self) -> &Arc<IndexState> {
        &self.state
    }

    #[tool(
        description = "Look up a keyword in the documentation search index. Matches keys that start with or contain the query (case-insensitive) and returns labels, scopes and document links in index order.",
        input_schema = inline_schema_for_type::<SearchRequest>()
    )]
    async fn search(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        handle_search(&self.state, request)
    }

    #[tool(
        description = "List the loaded index sections (all, classes, functions, ...) with their record counts.",
        input_schema = inline_schema_for_type::<ListSectionsRequest>()
    )]
    async fn list_sections(
        &self,
        Parameters(request): Parameters<ListSectionsRequest>,
    ) -> std::result::Result<String, String> {
        Ok(handle_list_sections(&self.state, request))
    }
}

#[tool_handler]
impl ServerHandler for SearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "docsearch: keyword lookup over a generated documentation search index. \
                 Use search with a name or name prefix (e.g. 'enqueue', 'elf32') to find \
                 where it is documented; use list_sections to see which index sections are loaded.",
            )
    }
}
