use crate::commands::{execute, parse_command, Flow};
use crate::config::Settings;
use crate::console::{Console, EditorConsole, ScriptedConsole};
use crate::driver::{process_line, BuiltinHandlers, LineOutcome};
use crate::handlers::Demonstrations;
use anyhow::{Context, Result};
use codegen::ProgramAssembler;
use frontend::macro_store::MacroStore;
use std::path::Path;

pub const PROMPT: &str = "Enter keyword(s)> ";

const BANNER: &str = "\
C++17 keyword-driven snippet generator
Enter a line containing C++17 keywords (duplicates allowed). Every occurrence
is asked about in order, then one integrated C++17 program is printed.
Type :help for commands, 'exit' or EOF to quit.";

/// The interactive loop over one keyword store.
pub struct Repl<'h> {
    store: MacroStore,
    handlers: &'h dyn BuiltinHandlers,
    assembler: ProgramAssembler,
}

impl<'h> Repl<'h> {
    pub fn new(
        store: MacroStore,
        handlers: &'h dyn BuiltinHandlers,
        assembler: ProgramAssembler,
    ) -> Self {
        Repl {
            store,
            handlers,
            assembler,
        }
    }

    pub fn store(&self) -> &MacroStore {
        &self.store
    }

    /// Read lines until `exit` or end of input at the top-level prompt.
    pub fn run(&mut self, console: &mut dyn Console) {
        loop {
            let line = match console.read_command(PROMPT) {
                Ok(line) => line,
                Err(_) => {
                    console.println("EOF received at top-level. Exiting cleanly.");
                    return;
                }
            };
            if self.handle_line(&line, console) == Flow::Quit {
                console.println("Exit requested. Goodbye.");
                return;
            }
        }
    }

    pub fn handle_line(&mut self, line: &str, console: &mut dyn Console) -> Flow {
        let line = line.trim();
        if line.is_empty() {
            return Flow::Continue;
        }
        if let Some(command) = parse_command(line) {
            tracing::debug!(?command, "running command");
            return execute(command, &mut self.store, console);
        }

        match process_line(line, &self.store, console, self.handlers, &self.assembler) {
            Ok(LineOutcome::NoKeywords) => console.println(
                "No recognized C++17 or user-defined keyword found in the input. Try again.",
            ),
            Ok(LineOutcome::Program { program, .. }) => {
                console.println("");
                console.println("--- Generated C++17 program (single integrated example) ---");
                console.println(program.trim_end());
                console.println(
                    "Copy the program into a .cpp file and compile: g++ -std=c++17 yourfile.cpp",
                );
            }
            Err(_) => {
                tracing::info!("input ended during prompts; line discarded");
                console.println("Input ended during follow-up prompts; line discarded.");
            }
        }
        Flow::Continue
    }
}

/// Load the store named by `settings` and run the loop, reading from the
/// terminal or, with `script`, from a file of pre-recorded answers.
pub fn start(settings: &Settings, script: Option<&Path>) -> Result<()> {
    let (store, diagnostics) = MacroStore::load(&settings.store);
    let handlers = Demonstrations;
    let mut repl = Repl::new(store, &handlers, ProgramAssembler::new(settings.indent));

    match script {
        Some(path) => {
            let mut console = ScriptedConsole::from_file(path)
                .with_context(|| format!("failed to read script '{}'", path.display()))?
                .echoing();
            greet(&mut console, &diagnostics, &repl);
            repl.run(&mut console);
        }
        None => {
            let mut console = EditorConsole::new(settings.history.clone())
                .context("failed to initialise the line editor")?;
            greet(&mut console, &diagnostics, &repl);
            repl.run(&mut console);
            console.save_history();
        }
    }
    Ok(())
}

fn greet(
    console: &mut dyn Console,
    diagnostics: &[frontend::diagnostics::Diagnostic],
    repl: &Repl<'_>,
) {
    console.println(BANNER);
    for diagnostic in diagnostics {
        console.println(&diagnostic.to_string());
    }
    if !repl.store().is_empty() {
        console.println(&format!(
            "Loaded {} custom keyword(s).",
            repl.store().len()
        ));
    }
    console.println("");
}
