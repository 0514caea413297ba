//! Run settings: command-line flags over environment over `snipgen.toml`
//! over built-in defaults.

use anyhow::{bail, Context, Result};
use codegen::assembler::DEFAULT_INDENT;
use frontend::macro_store::DEFAULT_STORE_FILE;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "snipgen.toml";
pub const DEFAULT_HISTORY_FILE: &str = ".snipgen_history";
pub const STORE_ENV: &str = "SNIPGEN_STORE";
const MAX_INDENT: usize = 16;

/// Contents of `snipgen.toml`. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub store: Option<PathBuf>,
    pub history: Option<PathBuf>,
    pub indent: Option<usize>,
}

/// Values supplied on the command line (the store flag also reads
/// `SNIPGEN_STORE` through clap).
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub store: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub history: Option<PathBuf>,
    pub no_history: bool,
    pub indent: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store: PathBuf,
    /// `None` disables the history file.
    pub history: Option<PathBuf>,
    pub indent: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            store: PathBuf::from(DEFAULT_STORE_FILE),
            history: Some(PathBuf::from(DEFAULT_HISTORY_FILE)),
            indent: DEFAULT_INDENT,
        }
    }
}

pub fn read_config(path: &Path) -> Result<FileConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config '{}'", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse config '{}'", path.display()))
}

impl Settings {
    /// An explicit `--config` must exist; the implicit `snipgen.toml` in
    /// `dir` is read only when present.
    pub fn resolve(overrides: &Overrides, dir: &Path) -> Result<Settings> {
        let file = match &overrides.config {
            Some(path) => read_config(path)?,
            None => {
                let implicit = dir.join(CONFIG_FILE);
                if implicit.is_file() {
                    read_config(&implicit)?
                } else {
                    FileConfig::default()
                }
            }
        };
        Self::merge(overrides, file)
    }

    pub fn merge(overrides: &Overrides, file: FileConfig) -> Result<Settings> {
        let defaults = Settings::default();
        let indent = overrides.indent.or(file.indent).unwrap_or(defaults.indent);
        if indent > MAX_INDENT {
            bail!("indent must be at most {} spaces, got {}", MAX_INDENT, indent);
        }
        let history = if overrides.no_history {
            None
        } else {
            overrides.history.clone().or(file.history).or(defaults.history)
        };
        let settings = Settings {
            store: overrides.store.clone().or(file.store).unwrap_or(defaults.store),
            history,
            indent,
        };
        tracing::debug!(?settings, "resolved settings");
        Ok(settings)
    }
}
