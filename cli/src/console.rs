//! Blocking line input with an explicit end-of-input signal.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Input ran out (EOF or an interrupt) while a line was expected.
///
/// Aborts the line being processed; it is not a failure to report.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("input ended")]
pub struct EndOfInput;

pub trait Console {
    fn read_line(&mut self, prompt: &str) -> Result<String, EndOfInput>;

    fn println(&mut self, text: &str);

    /// Read a top-level line. Editors record it in their history.
    fn read_command(&mut self, prompt: &str) -> Result<String, EndOfInput> {
        self.read_line(prompt)
    }

    /// Ask with a pre-filled default; an empty answer keeps the default.
    fn ask(&mut self, prompt: &str, default: &str) -> Result<String, EndOfInput> {
        let answer = self.read_line(&format!("{} [{}]: ", prompt, default))?;
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }

    /// Read lines until one consisting of a single `.`.
    fn read_block(&mut self, instruction: &str) -> Result<Vec<String>, EndOfInput> {
        self.println(instruction);
        let mut lines = Vec::new();
        loop {
            let line = self.read_line("> ")?;
            if line == "." {
                return Ok(lines);
            }
            lines.push(line);
        }
    }
}

/// Interactive console backed by rustyline, with optional history file.
pub struct EditorConsole {
    editor: DefaultEditor,
    history: Option<PathBuf>,
}

impl EditorConsole {
    pub fn new(history: Option<PathBuf>) -> rustyline::Result<Self> {
        let mut editor = DefaultEditor::new()?;
        if let Some(path) = &history {
            if editor.load_history(path).is_err() {
                tracing::debug!(path = %path.display(), "no history yet");
            }
        }
        Ok(EditorConsole { editor, history })
    }

    pub fn save_history(&mut self) {
        if let Some(path) = &self.history {
            if let Err(err) = self.editor.save_history(path) {
                tracing::warn!(path = %path.display(), error = %err, "could not save history");
            }
        }
    }
}

impl Console for EditorConsole {
    fn read_line(&mut self, prompt: &str) -> Result<String, EndOfInput> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(line),
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Err(EndOfInput),
            Err(err) => {
                tracing::warn!(error = %err, "readline failed; treating as end of input");
                Err(EndOfInput)
            }
        }
    }

    fn read_command(&mut self, prompt: &str) -> Result<String, EndOfInput> {
        let line = self.read_line(prompt)?;
        if !line.trim().is_empty() {
            let _ = self.editor.add_history_entry(line.as_str());
        }
        Ok(line)
    }

    fn println(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// Replays a fixed sequence of input lines and records everything shown.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    lines: VecDeque<String>,
    transcript: Vec<String>,
    echo: bool,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedConsole {
            lines: lines.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
            echo: false,
        }
    }

    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(text.lines()))
    }

    /// Also print prompts, answers and output to stdout.
    pub fn echoing(mut self) -> Self {
        self.echo = true;
        self
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> Result<String, EndOfInput> {
        let line = self.lines.pop_front().ok_or(EndOfInput)?;
        let shown = format!("{}{}", prompt, line);
        if self.echo {
            println!("{}", shown);
        }
        self.transcript.push(shown);
        Ok(line)
    }

    fn println(&mut self, text: &str) {
        if self.echo {
            println!("{}", text);
        }
        self.transcript.push(text.to_string());
    }
}
