//! Configuration resolution: CLI flags, environment, then `docsearch.toml`.

use crate::error::Result;
use crate::search::MatchMode;
use anyhow::{Context, bail};
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "docsearch.toml";

/// Environment variable naming the index file or directory.
pub const INDEX_ENV_VAR: &str = "DOCSEARCH_INDEX";

/// Result limit used when neither the caller nor the config sets one.
pub const DEFAULT_LIMIT: usize = 25;

/// Contents of a `docsearch.toml` file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Search data file or generator `search/` directory
    pub index: Option<String>,
    pub match_mode: Option<MatchMode>,
    pub default_limit: Option<usize>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }
}

/// Values given on the command line, which win over everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub index: Option<String>,
    pub match_mode: Option<MatchMode>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub index: PathBuf,
    pub match_mode: MatchMode,
    pub default_limit: usize,
}

impl Config {
    /// Resolves settings from the process environment and working directory.
    pub fn resolve(overrides: &Overrides) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        let env_index = std::env::var(INDEX_ENV_VAR).ok();
        let user_dir = dirs::config_dir().map(|dir| dir.join("docsearch"));
        Self::resolve_in(overrides, env_index.as_deref(), &cwd, user_dir.as_deref())
    }

    /// Resolution with explicit inputs.
    ///
    /// Precedence for the index: `--index`, then `$DOCSEARCH_INDEX`, then the
    /// config file. A relative `index` inside a config file is taken relative
    /// to that file. Without `--config`, `docsearch.toml` is looked up in `cwd`
    /// and then in `user_dir`.
    pub fn resolve_in(
        overrides: &Overrides,
        env_index: Option<&str>,
        cwd: &Path,
        user_dir: Option<&Path>,
    ) -> Result<Self> {
        let config_path = match &overrides.config {
            Some(path) => Some(cwd.join(&*expand_tilde(&path.to_string_lossy()))),
            None => discover_config(cwd, user_dir),
        };

        let file = match &config_path {
            Some(path) => {
                tracing::debug!("Using config file {}", path.display());
                FileConfig::from_path(path)?
            }
            None => FileConfig::default(),
        };

        let index = if let Some(index) = &overrides.index {
            cwd.join(&*expand_tilde(index))
        } else if let Some(index) = env_index.filter(|s| !s.trim().is_empty()) {
            cwd.join(&*expand_tilde(index))
        } else if let Some(index) = &file.index {
            let base = config_path
                .as_deref()
                .and_then(Path::parent)
                .unwrap_or(cwd);
            base.join(&*expand_tilde(index))
        } else {
            bail!(
                "No search index configured. Pass --index, set {}, or add `index = \"...\"` to {}",
                INDEX_ENV_VAR,
                CONFIG_FILE_NAME
            );
        };

        let default_limit = file.default_limit.unwrap_or(DEFAULT_LIMIT);
        if default_limit == 0 {
            bail!("default_limit must be at least 1");
        }

        Ok(Self {
            index,
            match_mode: overrides
                .match_mode
                .or(file.match_mode)
                .unwrap_or_default(),
            default_limit,
        })
    }
}

/// Looks for `docsearch.toml` in `cwd`, then in the user config directory.
fn discover_config(cwd: &Path, user_dir: Option<&Path>) -> Option<PathBuf> {
    std::iter::once(cwd)
        .chain(user_dir)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
