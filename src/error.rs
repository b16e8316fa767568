//! Errors produced while compiling a program.
//!
//! Compilation is fail-fast: the first [`CompileError`] aborts the whole run
//! and no output is written.

use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum CompileError {
    /// Unknown character, malformed number, bare `!`, bad string or char literal
    Lex(String),

    /// Unexpected token or a semantic violation (redeclaration, undeclared
    /// variable, type mismatch, duplicate or missing label)
    Syntax(String),

    /// Reading the source or writing the generated C failed
    Io { path: PathBuf, source: io::Error },
}

impl CompileError {
    pub fn lex(message: impl Into<String>) -> Self {
        CompileError::Lex(message.into())
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        CompileError::Syntax(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CompileError::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Lex(message) => write!(f, "Lexing error: {}", message),
            CompileError::Syntax(message) => write!(f, "Error: {}", message),
            CompileError::Io { path, source } => {
                write!(f, "Error: {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;
