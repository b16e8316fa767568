//! Single-pass compiler from a small BASIC dialect to C.
//!
//! The [`parser::Parser`] pulls tokens from the [`lexer::Lexer`] and writes C
//! into an [`emitter::Emitter`] as each statement is recognized; no syntax
//! tree is built. The first error aborts the compilation.
//!
//! ```
//! let c = teeny::compile("PRINT \"Hello\"", &teeny::Options::default()).unwrap();
//! assert!(c.contains("printf(\"Hello\\n\");"));
//! ```

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

pub mod config;
pub mod emitter;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod symbols;
pub mod token;

pub use config::{Dialect, Options};
pub use error::CompileError;

use crate::{error::Result, lexer::Lexer, parser::Parser};

/// Compiles source text to C.
pub fn compile(source: &str, options: &Options) -> Result<String> {
    let lexer = Lexer::new(source, options.dialect);
    let parser = Parser::new(lexer, *options)?;
    parser.compile()
}

/// Compiles `input` and writes the C program to `output`.
///
/// The output is written to a temporary file beside it and moved into place,
/// so it is either replaced completely or left untouched.
pub fn compile_file(input: &Path, output: &Path, options: &Options) -> Result<()> {
    let source = fs::read_to_string(input).map_err(|e| CompileError::io(input, e))?;
    let code = compile(&source, options)?;

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(|e| CompileError::io(dir, e))?;
    file.write_all(code.as_bytes())
        .map_err(|e| CompileError::io(file.path(), e))?;
    file.persist(output)
        .map_err(|e| CompileError::io(output, e.error))?;
    Ok(())
}
