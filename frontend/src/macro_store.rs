//! Persistent user-defined keywords ("macros") and their flat on-disk format.
//!
//! ```text
//! ===KEYWORD:<name>===
//! ===PARAMS:<name1>=<default1>,<name2>=<default2>===
//! <raw template body>
//! ===END===
//! ```
//!
//! The `PARAMS` line is omitted when a macro has no parameters. Loading is
//! best-effort: malformed marker lines are skipped and an unterminated final
//! block is still committed; both are reported as warnings.

use crate::diagnostics::{Diagnostic, DiagnosticCollector, DiagnosticHandler};
use crate::keywords::is_builtin;
use crate::normalize::{format_params, normalize_token, parse_params, Param};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_STORE_FILE: &str = "user_keywords.db";

const KEYWORD_MARKER: &str = "===KEYWORD:";
const PARAMS_MARKER: &str = "===PARAMS:";
const MARKER_CLOSE: &str = "===";
const END_MARKER: &str = "===END===";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroDefinition {
    /// Prompting order, and the only record of which placeholders exist.
    pub params: Vec<Param>,
    /// Unexpanded template text.
    pub body: String,
}

impl MacroDefinition {
    pub fn new(params: Vec<Param>, body: impl Into<String>) -> Self {
        MacroDefinition {
            params,
            body: canonical_body(body.into()),
        }
    }

    pub fn from_lines(params: Vec<Param>, lines: &[String]) -> Self {
        let mut body = String::new();
        for line in lines {
            body.push_str(line);
            body.push('\n');
        }
        MacroDefinition { params, body }
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }
}

// The loader yields bodies that end in a newline, so stored bodies do too.
fn canonical_body(mut body: String) -> String {
    if !body.is_empty() && !body.ends_with('\n') {
        body.push('\n');
    }
    body
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("keyword name is empty after normalization")]
    EmptyName,
    #[error("keyword name '{0}' contains whitespace or the reserved '===' marker")]
    InvalidName(String),
    #[error("'{0}' conflicts with a builtin C++17 keyword")]
    BuiltinCollision(String),
    #[error("no such custom keyword: '{0}'")]
    UnknownKeyword(String),
    #[error("keyword '{keyword}' has no parameter '{param}'")]
    UnknownParam { keyword: String, param: String },
    #[error("keyword '{keyword}' already has a parameter '{param}'")]
    DuplicateParam { keyword: String, param: String },
    #[error("keyword '{keyword}' cannot be stored: {problem}")]
    Unstorable { keyword: String, problem: String },
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What happened to the file after an accepted in-memory mutation.
///
/// A failed save never rolls the mutation back.
#[must_use]
#[derive(Debug)]
pub enum SaveOutcome {
    Saved,
    Unsaved(StoreError),
    /// The store has no backing file.
    Detached,
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved)
    }
}

#[derive(Debug, Default)]
pub struct ParsedStore {
    pub macros: BTreeMap<String, MacroDefinition>,
    pub diagnostics: Vec<Diagnostic>,
}

struct OpenBlock {
    name: String,
    opened_at: usize,
    params: Vec<Param>,
    body: String,
}

enum ParseState {
    Outside,
    InBlock(OpenBlock),
}

/// Text between `marker` and the last closing `===` on the line, if the line
/// is well formed and the payload is non-empty.
fn marker_payload<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(marker)?;
    let end = rest.rfind(MARKER_CLOSE)?;
    if end == 0 {
        return None;
    }
    Some(&rest[..end])
}

fn commit_block(
    block: OpenBlock,
    macros: &mut BTreeMap<String, MacroDefinition>,
    diagnostics: &mut DiagnosticCollector,
) {
    let name = normalize_token(&block.name);
    if name.is_empty() {
        diagnostics.handle(
            Diagnostic::warning(format!(
                "skipping block with unusable keyword name '{}'",
                block.name
            ))
            .with_line(block.opened_at),
        );
        return;
    }
    if is_builtin(&name) {
        diagnostics.handle(
            Diagnostic::warning(format!(
                "skipping block '{}': the name is a builtin C++17 keyword",
                name
            ))
            .with_line(block.opened_at),
        );
        return;
    }
    let definition = MacroDefinition {
        params: block.params,
        body: block.body,
    };
    if macros.insert(name.clone(), definition).is_some() {
        diagnostics.handle(
            Diagnostic::warning(format!(
                "keyword '{}' is defined more than once; the later block wins",
                name
            ))
            .with_line(block.opened_at),
        );
    }
}

/// Parse the on-disk format. Never fails; recovered problems are returned as
/// diagnostics.
pub fn parse_store(text: &str) -> ParsedStore {
    let mut macros = BTreeMap::new();
    let mut diagnostics = DiagnosticCollector::new();
    let mut state = ParseState::Outside;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        state = match state {
            ParseState::Outside => {
                if !line.starts_with(KEYWORD_MARKER) {
                    ParseState::Outside
                } else if let Some(name) = marker_payload(line, KEYWORD_MARKER) {
                    ParseState::InBlock(OpenBlock {
                        name: name.trim().to_string(),
                        opened_at: line_no,
                        params: Vec::new(),
                        body: String::new(),
                    })
                } else {
                    diagnostics.handle(
                        Diagnostic::warning("ignoring malformed KEYWORD marker".to_string())
                            .with_line(line_no),
                    );
                    ParseState::Outside
                }
            }
            ParseState::InBlock(mut block) => {
                if line == END_MARKER {
                    commit_block(block, &mut macros, &mut diagnostics);
                    ParseState::Outside
                } else if line.starts_with(PARAMS_MARKER) {
                    match marker_payload(line, PARAMS_MARKER) {
                        Some(list) => block.params.extend(parse_params(list)),
                        None => diagnostics.handle(
                            Diagnostic::warning("ignoring malformed PARAMS marker".to_string())
                                .with_line(line_no),
                        ),
                    }
                    ParseState::InBlock(block)
                } else {
                    block.body.push_str(line);
                    block.body.push('\n');
                    ParseState::InBlock(block)
                }
            }
        };
    }

    if let ParseState::InBlock(block) = state {
        diagnostics.handle(
            Diagnostic::warning(format!(
                "block '{}' has no {} marker; keeping what was read",
                block.name, END_MARKER
            ))
            .with_line(block.opened_at),
        );
        commit_block(block, &mut macros, &mut diagnostics);
    }

    ParsedStore {
        macros,
        diagnostics: diagnostics.into_vec(),
    }
}

/// Serialise every macro, sorted by name.
pub fn render_store(macros: &BTreeMap<String, MacroDefinition>) -> String {
    let mut out = String::new();
    for (name, definition) in macros {
        out.push_str(KEYWORD_MARKER);
        out.push_str(name);
        out.push_str(MARKER_CLOSE);
        out.push('\n');
        if !definition.params.is_empty() {
            out.push_str(PARAMS_MARKER);
            out.push_str(&format_params(&definition.params));
            out.push_str(MARKER_CLOSE);
            out.push('\n');
        }
        out.push_str(&definition.body);
        if !definition.body.is_empty() && !definition.body.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(END_MARKER);
        out.push('\n');
    }
    out
}

/// In-memory macro mapping kept in lockstep with its backing file.
#[derive(Debug, Default)]
pub struct MacroStore {
    path: Option<PathBuf>,
    macros: BTreeMap<String, MacroDefinition>,
}

impl MacroStore {
    /// A store with no backing file; mutations report `SaveOutcome::Detached`.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn from_macros(macros: BTreeMap<String, MacroDefinition>, path: Option<PathBuf>) -> Self {
        MacroStore { path, macros }
    }

    /// Load `path`, failing soft: a missing file is an empty store, and an
    /// unreadable one is an empty store plus an error diagnostic.
    pub fn load(path: impl Into<PathBuf>) -> (Self, Vec<Diagnostic>) {
        let path = path.into();
        match fs::read_to_string(&path) {
            Ok(text) => {
                let parsed = parse_store(&text);
                tracing::info!(
                    path = %path.display(),
                    keywords = parsed.macros.len(),
                    warnings = parsed.diagnostics.len(),
                    "loaded keyword store"
                );
                (Self::from_macros(parsed.macros, Some(path)), parsed.diagnostics)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "keyword store not found; starting empty");
                (Self::from_macros(BTreeMap::new(), Some(path)), Vec::new())
            }
            Err(err) => {
                let diagnostic = Diagnostic::error(format!(
                    "could not read {}: {}; starting with no custom keywords",
                    path.display(),
                    err
                ));
                (Self::from_macros(BTreeMap::new(), Some(path)), vec![diagnostic])
            }
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Rewrite the whole backing file.
    pub fn save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        fs::write(path, render_store(&self.macros)).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), keywords = self.macros.len(), "saved keyword store");
        Ok(())
    }

    fn persist(&self) -> SaveOutcome {
        if self.path.is_none() {
            return SaveOutcome::Detached;
        }
        match self.save() {
            Ok(()) => SaveOutcome::Saved,
            Err(err) => {
                tracing::warn!(error = %err, "keyword store not persisted");
                SaveOutcome::Unsaved(err)
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&MacroDefinition> {
        self.macros.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.macros.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MacroDefinition)> {
        self.macros.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// Validate and canonicalise a name for insertion.
    pub fn check_name(name: &str) -> Result<String, StoreError> {
        let name = normalize_token(name);
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if name.chars().any(char::is_whitespace) || name.contains(MARKER_CLOSE) {
            return Err(StoreError::InvalidName(name));
        }
        if is_builtin(&name) {
            return Err(StoreError::BuiltinCollision(name));
        }
        Ok(name)
    }

    /// Reject a parameter the `PARAMS` line could not reproduce on reload.
    pub fn check_param(keyword: &str, param: &Param) -> Result<(), StoreError> {
        let unstorable = |problem: String| StoreError::Unstorable {
            keyword: keyword.to_string(),
            problem,
        };
        let name = &param.name;
        if name.is_empty() || name.trim() != name.as_str() {
            return Err(unstorable(format!(
                "parameter name '{}' is empty or padded with whitespace",
                name
            )));
        }
        if name.contains([',', '=', '\n', '\r']) {
            return Err(unstorable(format!(
                "parameter name '{}' contains ',', '=' or a line break",
                name
            )));
        }
        let default = &param.default;
        if default.trim() != default.as_str() {
            return Err(unstorable(format!(
                "default for '{}' is padded with whitespace",
                name
            )));
        }
        if default.contains([',', '\n', '\r']) {
            return Err(unstorable(format!(
                "default for '{}' contains ',' or a line break",
                name
            )));
        }
        Ok(())
    }

    /// Reject a body with a line the loader would read as a marker.
    pub fn check_body(keyword: &str, body: &str) -> Result<(), StoreError> {
        for line in body.split('\n') {
            let problem = if line == END_MARKER {
                format!("a body line equal to '{}' would end the block", END_MARKER)
            } else if line.starts_with(PARAMS_MARKER) {
                format!(
                    "a body line starting with '{}' would be read as parameters",
                    PARAMS_MARKER
                )
            } else if line.ends_with('\r') {
                "a body line ends in a carriage return".to_string()
            } else {
                continue;
            };
            return Err(StoreError::Unstorable {
                keyword: keyword.to_string(),
                problem,
            });
        }
        Ok(())
    }

    /// Insert or overwrite a macro. Builtin names and definitions the file
    /// cannot hold are rejected and leave the store untouched.
    pub fn define(
        &mut self,
        name: &str,
        definition: MacroDefinition,
    ) -> Result<SaveOutcome, StoreError> {
        let name = Self::check_name(name)?;
        let definition = MacroDefinition::new(definition.params, definition.body);
        for param in &definition.params {
            Self::check_param(&name, param)?;
        }
        Self::check_body(&name, &definition.body)?;
        self.macros.insert(name, definition);
        Ok(self.persist())
    }

    pub fn remove(&mut self, name: &str) -> Result<SaveOutcome, StoreError> {
        let name = normalize_token(name);
        if self.macros.remove(&name).is_none() {
            return Err(StoreError::UnknownKeyword(name));
        }
        Ok(self.persist())
    }

    fn entry_mut(&mut self, name: &str) -> Result<&mut MacroDefinition, StoreError> {
        self.macros
            .get_mut(name)
            .ok_or_else(|| StoreError::UnknownKeyword(name.to_string()))
    }

    pub fn set_default(
        &mut self,
        name: &str,
        param: &str,
        value: &str,
    ) -> Result<SaveOutcome, StoreError> {
        let value = value.trim();
        Self::check_param(name, &Param::new(param, value))?;
        let definition = self.entry_mut(name)?;
        let slot = definition
            .params
            .iter_mut()
            .find(|p| p.name == param)
            .ok_or_else(|| StoreError::UnknownParam {
                keyword: name.to_string(),
                param: param.to_string(),
            })?;
        slot.default = value.to_string();
        Ok(self.persist())
    }

    pub fn add_param(&mut self, name: &str, param: Param) -> Result<SaveOutcome, StoreError> {
        Self::check_param(name, &param)?;
        let definition = self.entry_mut(name)?;
        if definition.param(&param.name).is_some() {
            return Err(StoreError::DuplicateParam {
                keyword: name.to_string(),
                param: param.name,
            });
        }
        definition.params.push(param);
        Ok(self.persist())
    }

    pub fn replace_body(&mut self, name: &str, body: String) -> Result<SaveOutcome, StoreError> {
        let body = canonical_body(body);
        Self::check_body(name, &body)?;
        let definition = self.entry_mut(name)?;
        definition.body = body;
        Ok(self.persist())
    }
}
