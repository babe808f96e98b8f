//! Process-wide, read-only search state.
//!
//! The catalog is loaded once at startup and never written afterwards, so
//! handlers share it through an `Arc` without any locking.

use crate::config::Config;
use crate::error::Result;
use crate::search::{Catalog, QueryEngine};
use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared state handed to every tool handler.
#[derive(Debug, Clone)]
pub struct IndexState {
    catalog: Arc<Catalog>,
    engine: QueryEngine,
    default_limit: usize,
    source: PathBuf,
}

impl IndexState {
    pub fn new(catalog: Catalog, engine: QueryEngine, default_limit: usize) -> Self {
        Self {
            catalog: Arc::new(catalog),
            engine,
            default_limit,
            source: PathBuf::new(),
        }
    }

    /// Loads the configured index. Any malformed record aborts startup.
    pub fn load(config: &Config) -> Result<Self> {
        let catalog = Catalog::load_path(&config.index)
            .with_context(|| format!("Failed to load search index {}", config.index.display()))?;

        let mut state = Self::new(
            catalog,
            QueryEngine::new(config.match_mode),
            config.default_limit,
        );
        state.source = config.index.clone();
        Ok(state)
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn engine(&self) -> QueryEngine {
        self.engine
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Where the index was loaded from (empty for in-memory catalogs).
    pub fn source(&self) -> &PathBuf {
        &self.source
    }
}
