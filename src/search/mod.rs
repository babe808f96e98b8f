//! Static documentation search index.
//!
//! This module provides the record model, the generator file reader, the
//! immutable [`IndexStore`], the textual [`QueryEngine`] and the per-section
//! [`Catalog`].

// Module declarations
pub(crate) mod catalog;
pub(crate) mod decode;
pub(crate) mod query;
pub(crate) mod record;
pub(crate) mod searchdata;
pub(crate) mod store;

// Public re-exports (used via lib.rs)
pub use catalog::{Catalog, Section};
pub use query::{MatchMode, QueryEngine, normalize_query};
pub use record::{Location, SearchRecord, Target};
pub use searchdata::{parse_search_data, render_search_data};
pub use store::IndexStore;
