// Bare Bones Parser Error Handling
// Parse failures reported as miette diagnostics

use crate::parser::Rule;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Main parse error type with miette integration
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("{message}")]
    #[diagnostic(
        code(barebones::parse::pest_error),
        help("Check the statement syntax near the highlighted location")
    )]
    PestError {
        #[source_code]
        src: String,
        #[label("error occurred here")]
        span: SourceSpan,
        message: String,
    },

    #[error("Invalid integer literal")]
    #[diagnostic(
        code(barebones::parse::invalid_integer),
        help("Integer literals must fit in an unsigned 64-bit value")
    )]
    InvalidInteger {
        #[source_code]
        src: String,
        #[label("invalid integer")]
        span: SourceSpan,
        found: String,
    },

    #[error("Unexpected grammar rule")]
    #[diagnostic(code(barebones::parse::unexpected_rule), help("Expected {expected}"))]
    UnexpectedRule { expected: String, found: Rule },

    #[error("Malformed statement")]
    #[diagnostic(
        code(barebones::parse::malformed_statement),
        help("The statement is missing its {expected}")
    )]
    MalformedStatement { expected: String },
}

impl ParseError {
    /// Create a parse error from a Pest parsing error
    pub fn from_pest_error(error: pest::error::Error<Rule>, src: String) -> Self {
        let span = match error.location {
            pest::error::InputLocation::Pos(pos) => SourceSpan::new(pos.into(), 1),
            pest::error::InputLocation::Span((start, end)) => {
                SourceSpan::new(start.into(), end - start)
            }
        };

        let message = match &error.variant {
            pest::error::ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => {
                let mut expected: Vec<String> = positives.iter().map(rule_description).collect();
                expected.sort();
                expected.dedup();
                format!("expected {}", expected.join(" or "))
            }
            variant => variant.message().to_string(),
        };

        ParseError::PestError { src, span, message }
    }

    /// Create an invalid integer error
    pub fn invalid_integer(src: String, span: SourceSpan, found: String) -> Self {
        ParseError::InvalidInteger { src, span, found }
    }

    /// Create an unexpected rule error
    pub fn unexpected_rule(expected: &str, found: Rule) -> Self {
        ParseError::UnexpectedRule {
            expected: expected.to_string(),
            found,
        }
    }

    /// Create a malformed statement error
    pub fn malformed(expected: &str) -> Self {
        ParseError::MalformedStatement {
            expected: expected.to_string(),
        }
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Convert a parser rule to a user-friendly description
fn rule_description(rule: &Rule) -> String {
    match rule {
        Rule::ident => "a variable name".to_string(),
        Rule::integer => "a number".to_string(),
        Rule::param_list => "a parameter list".to_string(),
        Rule::arg_list => "an argument list".to_string(),

        Rule::clear_stmt
        | Rule::incr_stmt
        | Rule::decr_stmt
        | Rule::while_stmt
        | Rule::copy_stmt
        | Rule::print_stmt
        | Rule::defproc_stmt
        | Rule::runproc_stmt
        | Rule::lambda_stmt
        | Rule::exit_stmt => "a statement".to_string(),

        Rule::kw_clear => "the 'clear' keyword".to_string(),
        Rule::kw_incr => "the 'incr' keyword".to_string(),
        Rule::kw_decr => "the 'decr' keyword".to_string(),
        Rule::kw_while => "the 'while' keyword".to_string(),
        Rule::kw_not => "the 'not' keyword".to_string(),
        Rule::kw_do => "the 'do' keyword".to_string(),
        Rule::kw_end => "the 'end' keyword".to_string(),
        Rule::kw_copy => "the 'copy' keyword".to_string(),
        Rule::kw_to => "the 'to' keyword".to_string(),
        Rule::kw_print => "the 'print' keyword".to_string(),
        Rule::kw_defproc => "the 'defproc' keyword".to_string(),
        Rule::kw_runproc => "the 'runproc' keyword".to_string(),
        Rule::kw_lambda => "the 'lambda' keyword".to_string(),
        Rule::kw_exit => "the 'exit' keyword".to_string(),

        Rule::EOI => "end of input".to_string(),

        _ => format!("a {:?}", rule).replace('_', " "),
    }
}
