//! Runtime errors raised while executing a program.
//!
//! Every variant carries the 1-based source line of the statement that was
//! executing, so the command line can report `error on line <n>: <message>`.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("uninitialized variable {name}")]
    #[diagnostic(
        code(barebones::runtime::uninitialized_variable),
        help("Clear the variable before reading it, or run without -u")
    )]
    UninitializedVariable { name: String, line: usize },

    #[error("overflow")]
    #[diagnostic(
        code(barebones::runtime::overflow),
        help("Values cannot exceed 18446744073709551615")
    )]
    Overflow { line: usize },

    #[error("subroutine doesn't exist")]
    #[diagnostic(
        code(barebones::runtime::unknown_procedure),
        help("Define {name} with defproc, or bind a closure to it with lambda")
    )]
    UnknownProcedure { name: String, line: usize },

    #[error("not enough arguments")]
    #[diagnostic(
        code(barebones::runtime::not_enough_arguments),
        help("The call to {name} supplies fewer arguments than its parameter list")
    )]
    NotEnoughArguments { name: String, line: usize },
}

impl RuntimeError {
    /// Source line of the statement that raised the error.
    pub fn line(&self) -> usize {
        match self {
            RuntimeError::UninitializedVariable { line, .. }
            | RuntimeError::Overflow { line }
            | RuntimeError::UnknownProcedure { line, .. }
            | RuntimeError::NotEnoughArguments { line, .. } => *line,
        }
    }
}

/// Result type for evaluation operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;
