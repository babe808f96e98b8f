use crate::search::Section;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "docsearch", version)]
#[command(about = "Keyword lookup over generated documentation search indexes", long_about = None)]
pub struct Cli {
    /// Search data file or generator `search/` directory (overrides $DOCSEARCH_INDEX)
    #[arg(short, long, global = true)]
    pub index: Option<String>,
    /// Configuration file (default: ./docsearch.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the index over MCP on stdio
    Serve,
    /// Look up a keyword and print matches in index order
    Search {
        query: String,
        #[arg(short, long, value_enum)]
        section: Option<Section>,
        /// Only match keys that start with the query
        #[arg(long)]
        prefix: bool,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load the index, report per-section counts and duplicates
    Check {
        /// Print the index re-rendered in search data form
        #[arg(long)]
        normalize: bool,
    },
}
