//! `:`-prefixed REPL commands for managing custom keywords.

use crate::console::{Console, EndOfInput};
use crate::keyword_summary;
use frontend::keywords::BUILTIN_KEYWORDS;
use frontend::macro_store::{MacroDefinition, MacroStore, SaveOutcome, StoreError};
use frontend::normalize::{format_params, normalize_token, parse_params, Param};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Define,
    Edit(String),
    List,
    Show(String),
    Remove(String),
    Help,
    Quit,
    /// A command that needs an argument was given none.
    Usage(&'static str),
    Unknown(String),
}

/// What the REPL loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub const HELP: &str = "\
Commands:
  :add / :define     - define a new custom keyword with parameters
  :edit <keyword>    - change defaults, add parameters or replace the body
  :list              - list stored custom keywords
  :show <keyword>    - print a custom keyword's parameters and body
  :remove <keyword>  - remove a stored custom keyword
  :help              - show this help (includes C++ standard keywords)
  exit / :quit       - leave";

/// `None` for lines that are keyword input rather than a command.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line == "exit" {
        return Some(Command::Quit);
    }
    if !line.starts_with(':') {
        return None;
    }
    let mut parts = line.split_whitespace();
    let cmd = parts.next().unwrap_or(line);
    let arg = parts.next().map(str::to_string);
    let command = match (cmd, arg) {
        (":add" | ":define", _) => Command::Define,
        (":list", _) => Command::List,
        (":help", _) => Command::Help,
        (":quit" | ":exit", _) => Command::Quit,
        (":edit", Some(name)) => Command::Edit(name),
        (":show", Some(name)) => Command::Show(name),
        (":remove", Some(name)) => Command::Remove(name),
        (":edit", None) => Command::Usage(":edit <keyword>"),
        (":show", None) => Command::Usage(":show <keyword>"),
        (":remove", None) => Command::Usage(":remove <keyword>"),
        (other, _) => Command::Unknown(other.to_string()),
    };
    Some(command)
}

/// Run a command. End of input inside a multi-step command cancels it and
/// leaves the store as it was before the command started.
pub fn execute(command: Command, store: &mut MacroStore, console: &mut dyn Console) -> Flow {
    let result = match command {
        Command::Quit => return Flow::Quit,
        Command::Define => define(store, console),
        Command::Edit(name) => edit(&name, store, console),
        Command::List => {
            list(store, console);
            Ok(())
        }
        Command::Show(name) => {
            show(&name, store, console);
            Ok(())
        }
        Command::Remove(name) => {
            remove(&name, store, console);
            Ok(())
        }
        Command::Help => {
            help(console);
            Ok(())
        }
        Command::Usage(usage) => {
            console.println(&format!("Usage: {}", usage));
            Ok(())
        }
        Command::Unknown(cmd) => {
            console.println(&format!(
                "Unknown command '{}'. Type :help for commands.",
                cmd
            ));
            Ok(())
        }
    };
    if result.is_err() {
        console.println("Input ended; command cancelled.");
    }
    Flow::Continue
}

fn report(console: &mut dyn Console, done: &str, outcome: SaveOutcome) {
    match outcome {
        SaveOutcome::Saved => console.println(&format!("{} and saved changes.", done)),
        SaveOutcome::Detached => console.println(&format!("{} (not persisted).", done)),
        SaveOutcome::Unsaved(err) => {
            console.println(&format!("{} but failed to save to disk: {}", done, err))
        }
    }
}

fn define(store: &mut MacroStore, console: &mut dyn Console) -> Result<(), EndOfInput> {
    let raw = console.ask("Keyword name to define (single word, no punctuation)", "mykw")?;
    let name = match MacroStore::check_name(&raw) {
        Ok(name) => name,
        Err(StoreError::EmptyName) => {
            console.println("Empty keyword name; aborting.");
            return Ok(());
        }
        Err(StoreError::BuiltinCollision(_)) => {
            console.println(
                "That name conflicts with a built-in C++17 keyword. Choose another name.",
            );
            return Ok(());
        }
        Err(err) => {
            console.println(&format!("{}; aborting.", err));
            return Ok(());
        }
    };
    if store.contains(&name) {
        let answer = console.ask("Keyword already exists. Overwrite? (y/n)", "n")?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            console.println("Aborted.");
            return Ok(());
        }
    }

    let params = parse_params(&console.ask(
        "Provide parameters (format: name=default,other=val) or leave blank",
        "",
    )?);
    console.println(
        "Paste the snippet that demonstrates this custom keyword. You may use placeholders {name}.",
    );
    let lines = console.read_block("End with a single '.' line:")?;
    let param_count = params.len();

    match store.define(&name, MacroDefinition::from_lines(params, &lines)) {
        Ok(outcome) => report(
            console,
            &format!(
                "Custom keyword '{}' defined with {} parameter(s)",
                name, param_count
            ),
            outcome,
        ),
        Err(err) => console.println(&format!("Error: {}", err)),
    }
    Ok(())
}

fn edit(raw: &str, store: &mut MacroStore, console: &mut dyn Console) -> Result<(), EndOfInput> {
    let name = normalize_token(raw);
    let Some(current) = store.get(&name).cloned() else {
        console.println(&format!("No such custom keyword: '{}'.", name));
        return Ok(());
    };

    // Gather every answer first so end of input leaves the store untouched.
    let mut defaults = Vec::new();
    for param in &current.params {
        let value = console.ask(&format!("Default for '{}'", param.name), &param.default)?;
        if value != param.default {
            defaults.push((param.name.clone(), value));
        }
    }
    let added = parse_params(&console.ask(
        "New parameters to add (name=default,...) or leave blank",
        "",
    )?);
    let replace = console.ask("Replace the body? (y/n)", "n")?;
    let body = if replace.trim().eq_ignore_ascii_case("y") {
        let lines = console.read_block("Enter the new body, finish with a single '.' line:")?;
        Some(MacroDefinition::from_lines(Vec::new(), &lines).body)
    } else {
        None
    };

    // Refuse the whole edit if any answer could not survive a reload.
    let storable = defaults
        .iter()
        .map(|(param, value)| Param::new(param.as_str(), value.trim()))
        .chain(added.iter().cloned())
        .map(|param| MacroStore::check_param(&name, &param))
        .chain(body.iter().map(|body| MacroStore::check_body(&name, body)))
        .collect::<Result<Vec<()>, StoreError>>();
    if let Err(err) = storable {
        console.println(&format!("Error: {}", err));
        console.println("Nothing changed.");
        return Ok(());
    }

    let mut results = Vec::new();
    for (param, value) in defaults {
        results.push(store.set_default(&name, &param, &value));
    }
    for param in added {
        results.push(store.add_param(&name, param));
    }
    if let Some(body) = body {
        results.push(store.replace_body(&name, body));
    }

    // Every accepted change rewrites the file, so the last outcome is the
    // state on disk.
    let mut saved = None;
    for result in results {
        match result {
            Ok(outcome) => saved = Some(outcome),
            Err(err) => console.println(&format!("Error: {}", err)),
        }
    }
    match saved {
        Some(outcome) => report(console, &format!("Updated '{}'", name), outcome),
        None => console.println("Nothing changed."),
    }
    Ok(())
}

fn list(store: &MacroStore, console: &mut dyn Console) {
    if store.is_empty() {
        console.println("No custom keywords stored.");
        return;
    }
    console.println("Stored custom keywords and parameters:");
    for line in keyword_summary(store) {
        console.println(&format!("  - {}", line));
    }
}

fn show(raw: &str, store: &MacroStore, console: &mut dyn Console) {
    let name = normalize_token(raw);
    let Some(definition) = store.get(&name) else {
        console.println(&format!("No such custom keyword: '{}'.", name));
        return;
    };
    console.println(&format!("{} [{}]", name, format_params(&definition.params)));
    for line in definition.body.lines() {
        console.println(&format!("  | {}", line));
    }
}

fn remove(raw: &str, store: &mut MacroStore, console: &mut dyn Console) {
    match store.remove(raw) {
        Ok(outcome) => report(
            console,
            &format!("Removed '{}'", normalize_token(raw)),
            outcome,
        ),
        Err(err) => console.println(&format!("{}.", err)),
    }
}

fn help(console: &mut dyn Console) {
    console.println(HELP);
    console.println("");
    console.println("C++17 standard keywords:");
    for row in BUILTIN_KEYWORDS.chunks(8) {
        console.println(&row.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;

    #[test]
    fn parses_commands_and_arguments() {
        assert_eq!(parse_command("int for"), None);
        assert_eq!(parse_command("  exit "), Some(Command::Quit));
        assert_eq!(parse_command(":define"), Some(Command::Define));
        assert_eq!(
            parse_command(":remove greet"),
            Some(Command::Remove("greet".to_string()))
        );
        assert_eq!(
            parse_command(":show"),
            Some(Command::Usage(":show <keyword>"))
        );
        assert_eq!(
            parse_command(":frobnicate"),
            Some(Command::Unknown(":frobnicate".to_string()))
        );
    }

    #[test]
    fn define_flow_stores_params_and_body() {
        let mut store = MacroStore::detached();
        let mut console = ScriptedConsole::new([
            "Repeat!",
            "n=3, msg=hi",
            "for (int i = 0; i < {n}; ++i)",
            "    cout << \"{msg}\" << endl;",
            ".",
        ]);
        assert_eq!(execute(Command::Define, &mut store, &mut console), Flow::Continue);

        let definition = store.get("repeat").expect("defined");
        assert_eq!(
            definition.params,
            vec![Param::new("n", "3"), Param::new("msg", "hi")]
        );
        assert_eq!(
            definition.body,
            "for (int i = 0; i < {n}; ++i)\n    cout << \"{msg}\" << endl;\n"
        );
        assert_eq!(
            console.transcript().last().map(String::as_str),
            Some("Custom keyword 'repeat' defined with 2 parameter(s) (not persisted).")
        );
    }

    #[test]
    fn define_rejects_builtin_names() {
        let mut store = MacroStore::detached();
        let mut console = ScriptedConsole::new(["While"]);
        execute(Command::Define, &mut store, &mut console);
        assert!(store.is_empty());
        assert_eq!(
            console.transcript().last().map(String::as_str),
            Some("That name conflicts with a built-in C++17 keyword. Choose another name.")
        );
    }

    #[test]
    fn overwrite_needs_confirmation() {
        let mut store = MacroStore::detached();
        let _ = store
            .define("greet", MacroDefinition::new(Vec::new(), "old"))
            .unwrap();
        let mut console = ScriptedConsole::new(["greet", ""]);
        execute(Command::Define, &mut store, &mut console);
        assert_eq!(store.get("greet").unwrap().body, "old\n");
    }

    #[test]
    fn end_of_input_cancels_definition() {
        let mut store = MacroStore::detached();
        let mut console = ScriptedConsole::new(["greet", "", "cout << 1;"]);
        assert_eq!(execute(Command::Define, &mut store, &mut console), Flow::Continue);
        assert!(store.is_empty());
        assert_eq!(
            console.transcript().last().map(String::as_str),
            Some("Input ended; command cancelled.")
        );
    }

    #[test]
    fn edit_changes_defaults_adds_params_and_replaces_body() {
        let mut store = MacroStore::detached();
        let _ = store
            .define(
                "greet",
                MacroDefinition::new(vec![Param::new("who", "world")], "cout << \"{who}\";"),
            )
            .unwrap();
        let mut console = ScriptedConsole::new([
            "there",
            "times=2",
            "y",
            "for (int i = 0; i < {times}; ++i) cout << \"{who}\";",
            ".",
        ]);
        execute(Command::Edit("GREET".to_string()), &mut store, &mut console);

        let definition = store.get("greet").unwrap();
        assert_eq!(
            definition.params,
            vec![Param::new("who", "there"), Param::new("times", "2")]
        );
        assert_eq!(
            definition.body,
            "for (int i = 0; i < {times}; ++i) cout << \"{who}\";\n"
        );
    }

    #[test]
    fn end_of_input_during_edit_changes_nothing() {
        let mut store = MacroStore::detached();
        let _ = store
            .define(
                "greet",
                MacroDefinition::new(vec![Param::new("who", "world")], "x"),
            )
            .unwrap();
        let mut console = ScriptedConsole::new(["there"]);
        execute(Command::Edit("greet".to_string()), &mut store, &mut console);
        assert_eq!(store.get("greet").unwrap().params[0].default, "world");
    }

    #[test]
    fn edit_refuses_values_the_store_file_cannot_hold() {
        let mut store = MacroStore::detached();
        let _ = store
            .define(
                "join",
                MacroDefinition::new(vec![Param::new("sep", "-")], "cout << \"{sep}\";"),
            )
            .unwrap();
        let mut console = ScriptedConsole::new(["a,b", "extra=1", "n"]);
        execute(Command::Edit("join".to_string()), &mut store, &mut console);

        let definition = store.get("join").unwrap();
        assert_eq!(definition.params, vec![Param::new("sep", "-")]);
        assert_eq!(
            console.transcript().last().map(String::as_str),
            Some("Nothing changed.")
        );
        assert!(console
            .transcript()
            .iter()
            .any(|line| line.starts_with("Error: keyword 'join' cannot be stored")));
    }

    #[test]
    fn define_refuses_a_body_that_closes_the_block() {
        let mut store = MacroStore::detached();
        let mut console = ScriptedConsole::new(["tail", "", "cout << 1;", "===END===", "."]);
        execute(Command::Define, &mut store, &mut console);
        assert!(store.is_empty());
        assert!(console
            .transcript()
            .last()
            .is_some_and(|line| line.starts_with("Error: keyword 'tail' cannot be stored")));
    }

    #[test]
    fn list_and_remove_report_state() {
        let mut store = MacroStore::detached();
        let _ = store
            .define("greet", MacroDefinition::new(vec![Param::new("who", "world")], "x"))
            .unwrap();
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        execute(Command::List, &mut store, &mut console);
        execute(Command::Remove("greet".to_string()), &mut store, &mut console);
        execute(Command::Remove("greet".to_string()), &mut store, &mut console);
        execute(Command::List, &mut store, &mut console);
        assert_eq!(
            console.transcript(),
            &[
                "Stored custom keywords and parameters:",
                "  - greet (params: who=world)",
                "Removed 'greet' (not persisted).",
                "no such custom keyword: 'greet'.",
                "No custom keywords stored.",
            ]
        );
    }

    #[test]
    fn help_lists_every_builtin() {
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        execute(Command::Help, &mut MacroStore::detached(), &mut console);
        let listed: usize = console
            .transcript()
            .iter()
            .skip_while(|line| *line != "C++17 standard keywords:")
            .skip(1)
            .map(|row| row.split(", ").count())
            .sum();
        assert_eq!(listed, BUILTIN_KEYWORDS.len());
    }
}
