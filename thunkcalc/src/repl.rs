//! Terminal line editing for interactive sessions
//!
//! Lines typed at a terminal are read through rustyline, with history that
//! can persist between runs. Evaluation itself happens in the interpreter
//! session; this module only supplies lines.

use miette::Diagnostic;
use rustyline::{DefaultEditor, error::ReadlineError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use thunkcalc_parser::LineSource;

/// Errors that can occur in the command line front end
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("cannot open {path}: {source}")]
    #[diagnostic(code(thunkcalc::cli::open), help("Check that the file exists and is readable"))]
    Open {
        path: String,
        source: io::Error,
    },

    #[error("Readline error: {source}")]
    #[diagnostic(code(thunkcalc::cli::readline))]
    Readline {
        #[from]
        source: ReadlineError,
    },
}

/// Line editor configuration options
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Prompt string for input
    pub prompt: String,

    /// Enable history persistence
    pub persist_history: bool,

    /// History file path
    pub history_file: Option<PathBuf>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            // Output is printed while the next line is already being read,
            // so a visible prompt would land in front of it
            prompt: String::new(),
            persist_history: true,
            history_file: Some(PathBuf::from(".thunkcalc_history")),
        }
    }
}

/// Lines typed at the terminal
pub struct EditorSource {
    /// Interactive line editor with history
    editor: DefaultEditor,

    config: ReplConfig,
}

impl EditorSource {
    pub fn new(config: ReplConfig) -> Result<Self, CliError> {
        let mut editor = DefaultEditor::new()?;

        if config.persist_history {
            if let Some(history_file) = &config.history_file {
                let _ = editor.load_history(history_file); // Ignore errors for new sessions
            }
        }

        Ok(Self { editor, config })
    }

    fn save_history(&mut self) {
        if !self.config.persist_history {
            return;
        }
        if let Some(history_file) = &self.config.history_file {
            if let Err(err) = self.editor.save_history(history_file) {
                log::warn!("failed to save history to {}: {err}", history_file.display());
            }
        }
    }
}

impl LineSource for EditorSource {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        match self.editor.readline(&self.config.prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            // Ctrl-C abandons the line being typed
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => {
                self.save_history();
                Ok(None)
            }
            Err(err) => {
                self.save_history();
                Err(io::Error::other(err))
            }
        }
    }
}
