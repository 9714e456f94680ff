//! Peephole rewrite of copy-accumulate loops.
//!
//! A `while` whose body only increments some other variable and decrements
//! the loop variable is a move: it adds the loop variable into the other one
//! and leaves the loop variable at zero. The optimizer collapses such loops
//! into a single add-and-clear statement that runs in constant time.

use barebones_parser::{Program, Stmt, StmtKind, VarNode};

/// Rewrite every eligible loop in the program, recursing into loop bodies.
/// Procedure and closure bodies are left as written; they are optimized
/// neither here nor at call time.
pub fn optimize_program(program: &mut Program) {
    optimize_list(&mut program.statements);
}

fn optimize_list(stmts: &mut [Stmt]) {
    for stmt in stmts {
        optimize_stmt(stmt);
    }
}

fn optimize_stmt(stmt: &mut Stmt) {
    let StmtKind::While { var, body } = &mut stmt.kind else {
        return;
    };
    if let Some((src, dest)) = add_clear_operands(var, body) {
        stmt.kind = StmtKind::AddClear { src, dest };
    } else {
        optimize_list(body);
    }
}

/// The body must be exactly an `incr` and a `decr` in either order, the
/// decrement hitting the loop variable and the increment hitting a different
/// one. Returns the (source, destination) pair for the rewrite.
fn add_clear_operands(loop_var: &VarNode, body: &[Stmt]) -> Option<(VarNode, VarNode)> {
    let [first, second] = body else {
        return None;
    };
    let (incremented, decremented) = match (&first.kind, &second.kind) {
        (StmtKind::Incr { var: incremented }, StmtKind::Decr { var: decremented }) => {
            (incremented, decremented)
        }
        (StmtKind::Decr { var: decremented }, StmtKind::Incr { var: incremented }) => {
            (incremented, decremented)
        }
        _ => return None,
    };
    if !decremented.name.eq_ignore_ascii_case(&loop_var.name) {
        return None;
    }
    if incremented.name.eq_ignore_ascii_case(&loop_var.name) {
        return None;
    }
    Some((decremented.clone(), incremented.clone()))
}
