use crate::macro_store::MacroDefinition;
use crate::normalize::Param;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpansionError {
    #[error("keyword '{0}' expands to a second `int main(`; the program already has one")]
    EntryPoint(String),
}

/// Expanded macro split into include targets and body lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedMacro {
    /// Text after `#include`, trimmed (`<vector>`, `"local.h"`).
    pub includes: Vec<String>,
    /// Origin comment followed by every non-include line.
    pub body: Vec<String>,
}

/// Replace every `{name}` placeholder of a declared parameter with its
/// override, or the stored default when no override was supplied.
///
/// The body is scanned once, left to right, and each brace pair is matched
/// as a whole name, so `{a}` never touches `{ab}`. Inserted values are not
/// rescanned, and brace text naming no parameter (plain C++ blocks) is kept.
pub fn substitute(body: &str, params: &[Param], overrides: &HashMap<String, String>) -> String {
    let values: HashMap<&str, &str> = params
        .iter()
        .map(|p| {
            let value = overrides.get(&p.name).unwrap_or(&p.default);
            (p.name.as_str(), value.as_str())
        })
        .collect();

    let mut out = String::with_capacity(body.len());
    let mut rest = body;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        if let Some(close) = after.find('}') {
            if let Some(value) = values.get(&after[..close]) {
                out.push_str(value);
                rest = &after[close + 1..];
                continue;
            }
        }
        out.push('{');
        rest = after;
    }
    out.push_str(rest);
    out
}

/// True when `text` defines the entry point (`int main(`, with any spacing).
pub fn contains_entry_point(text: &str) -> bool {
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';
    text.match_indices("main").any(|(idx, _)| {
        let before = &text[..idx];
        let after = &text[idx + "main".len()..];
        if before.chars().next_back().is_some_and(is_ident) {
            return false;
        }
        if !after.trim_start().starts_with('(') {
            return false;
        }
        let before = before.trim_end();
        before.ends_with("int")
            && !before[..before.len() - "int".len()]
                .chars()
                .next_back()
                .is_some_and(is_ident)
    })
}

/// Include target for an `#include` line (`# include` and indentation are
/// tolerated), or `None` for any other line.
pub fn include_target(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('#')?;
    let target = rest.trim_start().strip_prefix("include")?;
    if !target.starts_with(|c: char| c.is_whitespace() || c == '<' || c == '"') {
        return None;
    }
    let target = target.trim();
    if target.is_empty() {
        None
    } else {
        Some(target)
    }
}

/// Expand one occurrence of a user-defined keyword.
///
/// `tag` names the occurrence in the origin comment. A body that defines the
/// entry point after substitution is refused.
pub fn expand_macro(
    name: &str,
    definition: &MacroDefinition,
    overrides: &HashMap<String, String>,
    tag: &str,
) -> Result<ExpandedMacro, ExpansionError> {
    let text = substitute(&definition.body, &definition.params, overrides);
    if contains_entry_point(&text) {
        return Err(ExpansionError::EntryPoint(name.to_string()));
    }

    let mut expanded = ExpandedMacro::default();
    expanded.body.push(format!(
        "// ({}) User-defined keyword '{}' (with parameter substitution):",
        tag, name
    ));
    for line in text.lines() {
        match include_target(line) {
            Some(target) => expanded.includes.push(target.to_string()),
            None => expanded.body.push(line.to_string()),
        }
    }
    Ok(expanded)
}
