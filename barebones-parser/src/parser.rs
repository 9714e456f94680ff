// Bare Bones Statement Parser
// Walks the pest parse tree into the statement AST

use miette::SourceSpan;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::ast::{Program, Stmt, StmtKind, VarNode};
use crate::error::{ParseError, ParseResult};

#[derive(Parser)]
#[grammar = "barebones.pest"]
pub struct BareBonesParser;

impl BareBonesParser {
    /// Parse a complete source file into its statement list.
    pub fn parse_program(input: &str) -> ParseResult<Program> {
        let pairs = Self::parse(Rule::program, input)
            .map_err(|error| ParseError::from_pest_error(error, input.to_string()))?;

        let mut statements = Vec::new();
        for pair in pairs {
            if pair.as_rule() == Rule::program {
                for inner in pair.into_inner() {
                    if inner.as_rule() == Rule::EOI {
                        continue;
                    }
                    statements.push(Self::parse_stmt(inner, input)?);
                }
            }
        }

        Ok(Program { statements })
    }

    fn parse_stmt(pair: Pair<Rule>, src: &str) -> ParseResult<Stmt> {
        let line = pair.as_span().start_pos().line_col().0;
        let kind = match pair.as_rule() {
            Rule::clear_stmt => StmtKind::Clear {
                var: Self::parse_only_ident(pair)?,
            },
            Rule::incr_stmt => StmtKind::Incr {
                var: Self::parse_only_ident(pair)?,
            },
            Rule::decr_stmt => StmtKind::Decr {
                var: Self::parse_only_ident(pair)?,
            },
            Rule::print_stmt => StmtKind::Print {
                var: Self::parse_only_ident(pair)?,
            },
            Rule::while_stmt => Self::parse_while(pair, src)?,
            Rule::copy_stmt => Self::parse_copy(pair)?,
            Rule::defproc_stmt => Self::parse_defproc(pair, src)?,
            Rule::runproc_stmt => Self::parse_runproc(pair, src)?,
            Rule::lambda_stmt => Self::parse_lambda(pair, src)?,
            Rule::exit_stmt => StmtKind::Exit,
            rule => return Err(ParseError::unexpected_rule("a statement", rule)),
        };
        Ok(Stmt::new(kind, line))
    }

    /// The single variable operand of clear/incr/decr/print.
    fn parse_only_ident(pair: Pair<Rule>) -> ParseResult<VarNode> {
        for inner in pair.into_inner() {
            if inner.as_rule() == Rule::ident {
                return Ok(VarNode::named(inner.as_str()));
            }
        }
        Err(ParseError::malformed("variable name"))
    }

    fn parse_while(pair: Pair<Rule>, src: &str) -> ParseResult<StmtKind> {
        let mut var = None;
        let mut body = Vec::new();
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::ident => var = Some(VarNode::named(inner.as_str())),
                Rule::kw_while | Rule::kw_not | Rule::kw_do | Rule::kw_end => {}
                _ => body.push(Self::parse_stmt(inner, src)?),
            }
        }
        let var = var.ok_or_else(|| ParseError::malformed("loop variable"))?;
        Ok(StmtKind::While { var, body })
    }

    fn parse_copy(pair: Pair<Rule>) -> ParseResult<StmtKind> {
        let mut idents = pair
            .into_inner()
            .filter(|inner| inner.as_rule() == Rule::ident);
        let src_var = idents
            .next()
            .map(|inner| VarNode::named(inner.as_str()))
            .ok_or_else(|| ParseError::malformed("source variable"))?;
        let dest = idents
            .next()
            .map(|inner| VarNode::named(inner.as_str()))
            .ok_or_else(|| ParseError::malformed("destination variable"))?;
        Ok(StmtKind::Copy {
            src: src_var,
            dest,
        })
    }

    fn parse_defproc(pair: Pair<Rule>, src: &str) -> ParseResult<StmtKind> {
        let mut name = None;
        let mut params = Vec::new();
        let mut body = Vec::new();
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::ident => name = Some(inner.as_str().to_string()),
                Rule::param_list => params = Self::parse_param_list(inner),
                Rule::kw_defproc | Rule::kw_do | Rule::kw_end => {}
                _ => body.push(Self::parse_stmt(inner, src)?),
            }
        }
        let name = name.ok_or_else(|| ParseError::malformed("procedure name"))?;
        Ok(StmtKind::DefProc { name, params, body })
    }

    fn parse_runproc(pair: Pair<Rule>, src: &str) -> ParseResult<StmtKind> {
        let mut name = None;
        let mut args = Vec::new();
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::ident => name = Some(inner.as_str().to_string()),
                Rule::arg_list => args = Self::parse_arg_list(inner, src)?,
                _ => {}
            }
        }
        let name = name.ok_or_else(|| ParseError::malformed("procedure name"))?;
        Ok(StmtKind::RunProc { name, args })
    }

    fn parse_lambda(pair: Pair<Rule>, src: &str) -> ParseResult<StmtKind> {
        let mut var = None;
        let mut params = Vec::new();
        let mut body = Vec::new();
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::ident => var = Some(VarNode::named(inner.as_str())),
                Rule::param_list => params = Self::parse_param_list(inner),
                Rule::kw_lambda | Rule::kw_do | Rule::kw_end => {}
                _ => body.push(Self::parse_stmt(inner, src)?),
            }
        }
        let var = var.ok_or_else(|| ParseError::malformed("target variable"))?;
        Ok(StmtKind::Lambda { var, params, body })
    }

    fn parse_param_list(pair: Pair<Rule>) -> Vec<VarNode> {
        pair.into_inner()
            .filter(|inner| inner.as_rule() == Rule::ident)
            .map(|inner| VarNode::named(inner.as_str()))
            .collect()
    }

    fn parse_arg_list(pair: Pair<Rule>, src: &str) -> ParseResult<Vec<VarNode>> {
        let mut args = Vec::new();
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::ident => args.push(VarNode::named(inner.as_str())),
                Rule::integer => args.push(Self::parse_integer(inner, src)?),
                _ => {}
            }
        }
        Ok(args)
    }

    fn parse_integer(pair: Pair<Rule>, src: &str) -> ParseResult<VarNode> {
        let text = pair.as_str();
        let value: u64 = text.parse().map_err(|_| {
            let span = pair.as_span();
            ParseError::invalid_integer(
                src.to_string(),
                SourceSpan::new(span.start().into(), span.end() - span.start()),
                text.to_string(),
            )
        })?;
        Ok(VarNode::literal(value))
    }
}
