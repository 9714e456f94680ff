//! Tree-walking evaluator for the Bare Bones language.
//!
//! Executes parsed programs against a chain of lexical scopes: a global
//! scope for top-level code, with a child frame pushed for every procedure
//! or closure call. Variables hold unsigned values and may carry an attached
//! closure; procedures live in a separate case-insensitive registry.
//!
//! The optimizer rewrites copy-accumulate loops into constant-time
//! statements; the printer renders statement lists back to source when a
//! closure-holding variable is printed.

pub mod environment;
pub mod error;
pub mod evaluator;
pub mod optimizer;
pub mod printer;
pub mod registry;

#[cfg(test)]
#[path = "tests/mod.rs"]
pub mod tests;

pub use environment::*;
pub use error::*;
pub use evaluator::*;
pub use optimizer::*;
pub use printer::*;
pub use registry::*;

/// Parse and execute a program with output going to stdout, returning the
/// interpreter so callers can inspect final variable state.
pub fn run_source(
    source: &str,
    options: Options,
) -> Result<Interpreter, Box<dyn std::error::Error>> {
    let program = barebones_parser::parse_program(source)?;
    let mut interpreter = Interpreter::new(options);
    interpreter.run(&program)?;
    Ok(interpreter)
}
