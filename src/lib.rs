pub mod cli;
pub mod config;
pub mod error;
pub mod schema;
pub mod search;
pub mod server;
pub mod state;
pub mod tools;
pub mod tracing;

pub use error::IndexError;
pub use search::{
    Catalog, IndexStore, Location, MatchMode, QueryEngine, SearchRecord, Section, Target,
};
pub use server::SearchServer;
pub use state::IndexState;
