// Bare Bones Parser Library
// Pest-based parser for the Bare Bones statement language

pub mod ast;
pub mod error;
pub mod parser;

pub use ast::*;
pub use error::*;
pub use parser::*;

// Re-export parser rule for manual testing
pub use parser::Rule;

#[cfg(test)]
#[path = "tests/mod.rs"]
pub mod tests;

// Main parsing function
pub fn parse_program(input: &str) -> Result<Program, ParseError> {
    parser::BareBonesParser::parse_program(input)
}

// Version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
