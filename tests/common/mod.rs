//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `generated_store`: the real generated shard `tests/fixtures/all_4.js`
//! - `search_dir`: a temporary generator `search/` directory with several
//!   sections and shards, plus files that must be ignored
//!
//! [`TempWorkspace`] provides the temp directory abstraction the fixtures use.

use docsearch::{IndexStore, SearchRecord};
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Returns the project root directory (where Cargo.toml lives).
pub fn project_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Path of the generated shard shipped as a fixture.
pub fn generated_shard_path() -> PathBuf {
    project_root().join("tests/fixtures/all_4.js")
}

/// A temporary directory that is removed when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    /// Creates a new empty temporary workspace.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Returns the root path of this workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with the given content within this workspace.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }

    /// Copies a file from the real filesystem into this workspace.
    ///
    /// # Panics
    /// Panics if copying fails.
    pub fn copy_file(&self, source: &Path, dest_relative: &str) {
        let dest = self.root.join(dest_relative);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::copy(source, &dest).unwrap_or_else(|e| {
            panic!(
                "Failed to copy '{}' to '{}': {}",
                source.display(),
                dest_relative,
                e
            )
        });
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds one line of generator output for a single-target record.
#[allow(dead_code)]
pub fn shard_line(key: &str, label: &str, path: &str, scope: &str) -> String {
    format!("  ['{}',['{}',['{}',1,'{}']]]", key, label, path, scope)
}

/// Wraps record lines in the generator's file layout.
#[allow(dead_code)]
pub fn shard_file(lines: &[String]) -> String {
    format!("var searchData=\n[\n{}\n];\n", lines.join(",\n"))
}

/// The real generated shard, loaded.
#[fixture]
pub fn generated_store() -> IndexStore {
    IndexStore::from_path(&generated_shard_path()).expect("fixture shard should load")
}

/// A `search/` directory with `all` split over two shards (written out of
/// order on purpose), one `classes` shard, and non-shard files.
#[fixture]
pub fn search_dir() -> TempWorkspace {
    let workspace = TempWorkspace::new();

    // Shard 0x10 must sort after shard 4 even though "10" < "4" as text
    workspace.create_file(
        "search/all_10.js",
        &shard_file(&[shard_line("queue_200", "Queue", "queue.html", "CKSDK::Queue")]),
    );
    workspace.copy_file(&generated_shard_path(), "search/all_4.js");
    workspace.create_file(
        "search/classes_0.js",
        &shard_file(&[shard_line(
            "elf32_5fdyn_10",
            "Elf32_Dyn",
            "../d0/d8f/structCKSDK_1_1ELF_1_1Elf32__Dyn.html",
            "CKSDK::ELF",
        )]),
    );
    workspace.create_file("search/search.js", "function SearchBox() {}\n");
    workspace.create_file("search/searchdata.js", "var indexSectionsWithContent = {};\n");
    workspace.create_file("search/search.css", "body {}\n");

    workspace
}

/// Keys of a result list, for compact assertions.
#[allow(dead_code)]
pub fn keys(results: &[&SearchRecord]) -> Vec<String> {
    results.iter().map(|r| r.key.clone()).collect()
}
