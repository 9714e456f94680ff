//! Parser acceptance tests
//!
//! These exercise the full pest pipeline: source text in, statement tree out.
