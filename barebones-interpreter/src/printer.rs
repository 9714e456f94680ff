//! Source rendering for statement lists.
//!
//! Printing a variable that holds a closure prints the closure's body as
//! source text; this module turns parsed statements back into that text.

use std::fmt::Write as _;

use barebones_parser::{Stmt, StmtKind, VarNode};

/// Render a statement list as source text, one statement per line, nested
/// blocks indented by two spaces.
pub fn render_body(stmts: &[Stmt]) -> String {
    let mut out = String::new();
    render_list(stmts, 0, &mut out);
    out
}

fn render_list(stmts: &[Stmt], indent: usize, out: &mut String) {
    for stmt in stmts {
        render_stmt(stmt, indent, out);
    }
}

fn render_stmt(stmt: &Stmt, indent: usize, out: &mut String) {
    let pad = " ".repeat(indent);
    match &stmt.kind {
        StmtKind::Clear { var } => {
            let _ = writeln!(out, "{}clear {};", pad, var.name);
        }
        StmtKind::Incr { var } => {
            let _ = writeln!(out, "{}incr {};", pad, var.name);
        }
        StmtKind::Decr { var } => {
            let _ = writeln!(out, "{}decr {};", pad, var.name);
        }
        StmtKind::While { var, body } => {
            let _ = writeln!(out, "{}while {} not 0 do;", pad, var.name);
            render_list(body, indent + 2, out);
            let _ = writeln!(out, "{}end;", pad);
        }
        StmtKind::Copy { src, dest } => {
            let _ = writeln!(out, "{}copy {} to {};", pad, src.name, dest.name);
        }
        StmtKind::AddClear { src, dest } => {
            let _ = writeln!(out, "{}addclear {} to {};", pad, src.name, dest.name);
        }
        StmtKind::Print { var } => {
            let _ = writeln!(out, "{}print {};", pad, var.name);
        }
        StmtKind::DefProc { name, params, body } => {
            let _ = writeln!(out, "{}defproc {}{} do;", pad, name, render_vars(params));
            render_list(body, indent + 2, out);
            let _ = writeln!(out, "{}end;", pad);
        }
        StmtKind::RunProc { name, args } => {
            let _ = writeln!(out, "{}runproc {}{};", pad, name, render_vars(args));
        }
        StmtKind::Lambda { var, params, body } => {
            let _ = writeln!(out, "{}lambda {}{} do;", pad, var.name, render_vars(params));
            render_list(body, indent + 2, out);
            let _ = writeln!(out, "{}end;", pad);
        }
        StmtKind::Exit => {
            let _ = writeln!(out, "{}exit;", pad);
        }
    }
}

/// Parameter and argument lists render as ` ( a b )`, or nothing when empty.
/// Literal arguments carry their value as their name, so one path covers
/// both.
fn render_vars(vars: &[VarNode]) -> String {
    if vars.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = vars.iter().map(|var| var.name.as_str()).collect();
    format!(" ( {} )", names.join(" "))
}
