//! The procedure registry: append-only, case-insensitive, newest wins.

use std::rc::Rc;

use barebones_parser::{Stmt, VarNode};

/// A procedure registered by `defproc`.
#[derive(Debug, Clone)]
pub struct Procedure {
    pub name: String,
    pub params: Vec<VarNode>,
    pub body: Vec<Stmt>,
}

/// All registered procedures in registration order. Lookup scans newest-first
/// so a redefinition shadows the original without removing it.
#[derive(Debug, Default)]
pub struct ProcedureRegistry {
    procedures: Vec<Rc<Procedure>>,
}

impl ProcedureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, params: &[VarNode], body: &[Stmt]) {
        self.procedures.push(Rc::new(Procedure {
            name: name.to_string(),
            params: params.to_vec(),
            body: body.to_vec(),
        }));
    }

    pub fn find(&self, name: &str) -> Option<Rc<Procedure>> {
        self.procedures
            .iter()
            .rev()
            .find(|procedure| procedure.name.eq_ignore_ascii_case(name))
            .map(Rc::clone)
    }
}
