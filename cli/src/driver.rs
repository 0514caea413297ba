//! Per-line pipeline: resolve occurrences, dispatch each one, aggregate the
//! fragments and assemble the program.

use crate::console::{Console, EndOfInput};
use codegen::{Aggregate, Fragment, GenerationContext, ProgramAssembler};
use frontend::expander::{contains_entry_point, expand_macro};
use frontend::keywords::Builtin;
use frontend::macro_store::{MacroDefinition, MacroStore};
use frontend::registry::{handler_for, Handler};
use frontend::resolver::{resolve_with_store, Occurrence};
use std::collections::HashMap;

/// Generators for the builtin keywords.
pub trait BuiltinHandlers {
    fn generate(
        &self,
        builtin: Builtin,
        ctx: &mut GenerationContext,
        console: &mut dyn Console,
        tag: &str,
    ) -> Result<Fragment, EndOfInput>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Nothing on the line was a known keyword.
    NoKeywords,
    Program {
        occurrences: Vec<Occurrence>,
        aggregate: Aggregate,
        program: String,
    },
}

/// Produce the fragment for one occurrence.
pub fn dispatch(
    occurrence: &Occurrence,
    ctx: &mut GenerationContext,
    store: &MacroStore,
    console: &mut dyn Console,
    handlers: &dyn BuiltinHandlers,
) -> Result<Fragment, EndOfInput> {
    let tag = occurrence.tag();
    let handler = match handler_for(&occurrence.keyword, store) {
        Some(handler) => handler,
        None => {
            // The store changed between resolving and dispatching.
            tracing::warn!(keyword = %occurrence.keyword, "occurrence no longer resolves");
            return Ok(Fragment::error(
                &tag,
                &format!("unknown keyword '{}'", occurrence.keyword),
            ));
        }
    };

    match handler {
        Handler::Macro { name, definition } => {
            tracing::debug!(keyword = name, %tag, "expanding custom keyword");
            expand_user_keyword(name, definition, console, &tag)
        }
        Handler::Builtin(builtin) => {
            tracing::debug!(keyword = builtin.keyword, kind = ?builtin.kind, %tag, "generating builtin");
            handlers.generate(builtin, ctx, console, &tag)
        }
        Handler::Fallback(name) => {
            tracing::debug!(keyword = name, %tag, "no tailored generator; asking for a fragment");
            free_form(name, console, &tag)
        }
    }
}

fn expand_user_keyword(
    name: &str,
    definition: &MacroDefinition,
    console: &mut dyn Console,
    tag: &str,
) -> Result<Fragment, EndOfInput> {
    let mut overrides = HashMap::new();
    for param in &definition.params {
        let value = console.ask(
            &format!("[{}] Value for parameter '{}'", tag, param.name),
            &param.default,
        )?;
        overrides.insert(param.name.clone(), value);
    }

    match expand_macro(name, definition, &overrides, tag) {
        Ok(expanded) => Ok(Fragment {
            includes: expanded.includes,
            top: Vec::new(),
            body: expanded.body,
        }),
        Err(err) => {
            tracing::warn!(error = %err, "refusing expansion");
            console.println(&format!("Error: {}", err));
            Ok(Fragment::error(tag, &err.to_string()))
        }
    }
}

fn free_form(name: &str, console: &mut dyn Console, tag: &str) -> Result<Fragment, EndOfInput> {
    let lines = console.read_block(&format!(
        "[{}] No built-in example for '{}'. Enter a code fragment (end with a single '.' line):",
        tag, name
    ))?;
    let text = lines.join("\n");

    let mut fragment = Fragment::new();
    if contains_entry_point(&text) {
        fragment
            .top(format!("// ({}) Full program supplied for '{}':", tag, name))
            .top(text);
    } else {
        fragment.stmt(format!("// ({}) Custom fragment for '{}':", tag, name));
        for line in lines {
            fragment.stmt(line);
        }
    }
    Ok(fragment)
}

/// Run one input line through the whole pipeline.
///
/// End of input while prompting abandons the line; nothing is assembled.
pub fn process_line(
    line: &str,
    store: &MacroStore,
    console: &mut dyn Console,
    handlers: &dyn BuiltinHandlers,
    assembler: &ProgramAssembler,
) -> Result<LineOutcome, EndOfInput> {
    let occurrences = resolve_with_store(line, store);
    if occurrences.is_empty() {
        return Ok(LineOutcome::NoKeywords);
    }
    tracing::debug!(count = occurrences.len(), "resolved occurrences");

    let detected: Vec<String> = occurrences.iter().map(ToString::to_string).collect();
    console.println(&format!("Detected occurrences in order: {}", detected.join(" ")));

    let mut ctx = GenerationContext::new();
    let mut aggregate = Aggregate::new();
    for occurrence in &occurrences {
        console.println(&format!(
            "--- Asking about keyword occurrence {}: '{}' (token {}) ---",
            occurrence.index, occurrence.keyword, occurrence.position
        ));
        let fragment = dispatch(occurrence, &mut ctx, store, console, handlers)?;
        aggregate.append(fragment);
    }

    let program = assembler.assemble(&aggregate);
    Ok(LineOutcome::Program {
        occurrences,
        aggregate,
        program,
    })
}
