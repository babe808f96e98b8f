use anyhow::Context;
use clap::Parser;
use docsearch::cli::{Cli, Commands};
use docsearch::config::{Config, Overrides};
use docsearch::search::MatchMode;
use docsearch::server::SearchServer;
use docsearch::state::IndexState;
use docsearch::tools::{SearchRequest, handle_search, run_search};
use rmcp::{ServiceExt, transport::stdio};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    docsearch::tracing::init(cli.verbose);

    let match_mode = match &cli.command {
        Commands::Search { prefix: true, .. } => Some(MatchMode::Prefix),
        _ => None,
    };
    let overrides = Overrides {
        config: cli.config.clone(),
        index: cli.index.clone(),
        match_mode,
    };
    let config = Config::resolve(&overrides)?;

    // A malformed index is fatal: nothing runs against a partial store
    let state = IndexState::load(&config)?;

    match cli.command {
        Commands::Serve => serve(state).await,
        Commands::Search {
            query,
            section,
            limit,
            json,
            ..
        } => {
            let request = SearchRequest {
                query,
                section,
                limit,
            };
            if json {
                let outcome = run_search(&state, &request).map_err(anyhow::Error::msg)?;
                let rendered = serde_json::to_string_pretty(&outcome.hits())
                    .context("Failed to serialize search results")?;
                println!("{}", rendered);
            } else {
                let output = handle_search(&state, request).map_err(anyhow::Error::msg)?;
                print!("{}", output);
            }
            Ok(())
        }
        Commands::Check { normalize } => {
            check(&state, normalize);
            Ok(())
        }
    }
}

async fn serve(state: IndexState) -> anyhow::Result<()> {
    tracing::info!(
        "Starting docsearch MCP server ({} records)",
        state.catalog().total_records()
    );

    // Create and serve the MCP server over stdio
    let server = SearchServer::new(state);
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    // Wait for the service to complete
    service.waiting().await?;

    Ok(())
}

fn check(state: &IndexState, normalize: bool) {
    let catalog = state.catalog();

    if normalize {
        for (section, store) in catalog.sections() {
            println!("// section: {}", section);
            print!("{}", store.to_search_data());
        }
        return;
    }

    println!("{}", state.source().display());
    for (section, store) in catalog.sections() {
        println!(
            "  {:<12} {:>7} records  {:>5} duplicates",
            section.as_str(),
            store.len(),
            store.duplicate_count()
        );
    }
    println!("  {:<12} {:>7} records", "total", catalog.total_records());
}
