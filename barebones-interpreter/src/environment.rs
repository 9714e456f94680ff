//! Variable cells, closures, and the lexically-nested scope chain.
//!
//! Scopes are reference-counted: a closure keeps its captured frame alive
//! after the call that created it has returned. Parent links only ever point
//! outward toward the root, so the chain cannot form a cycle and plain `Rc`
//! ownership is enough.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use indexmap::IndexMap;

use barebones_parser::{Stmt, VarNode};

/// Shared handle to a scope frame.
pub type EnvRef = Rc<Environment>;

/// Shared mutable handle to a variable cell.
pub type VarRef = Rc<RefCell<Variable>>;

/// A closure: parameter list and body plus the environment captured when the
/// closure was made.
#[derive(Debug, Clone)]
pub struct Closure {
    pub params: Vec<VarNode>,
    pub body: Vec<Stmt>,
    pub env: EnvRef,
}

/// A mutable variable cell.
///
/// `name` keeps the spelling from the first creation; lookups ignore ASCII
/// case. A variable may also hold a closure, attached by `lambda` and
/// propagated by `copy`.
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub value: u64,
    pub init: bool,
    pub closure: Option<Rc<Closure>>,
}

impl Variable {
    fn new(name: &str, init: bool) -> Self {
        Self {
            name: name.to_string(),
            value: 0,
            init,
            closure: None,
        }
    }

    /// Assign a value and mark the cell initialized.
    pub fn set(&mut self, value: u64) {
        self.value = value;
        self.init = true;
    }
}

/// A scope frame: named variables plus a link to the enclosing scope.
#[derive(Debug)]
pub struct Environment {
    parent: Option<EnvRef>,
    level: u32,
    vars: RefCell<IndexMap<String, VarRef>>,
}

impl Environment {
    /// The root (global) scope, level 0.
    pub fn root() -> EnvRef {
        Rc::new(Self {
            parent: None,
            level: 0,
            vars: RefCell::new(IndexMap::new()),
        })
    }

    /// A fresh scope nested inside `parent`.
    pub fn child(parent: &EnvRef) -> EnvRef {
        Rc::new(Self {
            parent: Some(Rc::clone(parent)),
            level: parent.level + 1,
            vars: RefCell::new(IndexMap::new()),
        })
    }

    /// Nesting depth, used only for diagnostics and verbose output.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Find `name` in this scope or any enclosing one.
    pub fn lookup(&self, name: &str) -> Option<VarRef> {
        self.lookup_key(&name.to_ascii_lowercase())
    }

    fn lookup_key(&self, key: &str) -> Option<VarRef> {
        if let Some(var) = self.vars.borrow().get(key) {
            return Some(Rc::clone(var));
        }
        self.parent.as_ref().and_then(|parent| parent.lookup_key(key))
    }

    /// Find `name` anywhere on the chain, or create it in this scope.
    ///
    /// New variables have value 0; `init_to_zero` decides whether they start
    /// initialized (permissive mode) or must be cleared before their first
    /// read (strict mode).
    pub fn resolve_or_create(&self, name: &str, init_to_zero: bool) -> VarRef {
        if let Some(var) = self.lookup(name) {
            return var;
        }
        let var = Rc::new(RefCell::new(Variable::new(name, init_to_zero)));
        self.vars
            .borrow_mut()
            .insert(name.to_ascii_lowercase(), Rc::clone(&var));
        var
    }

    /// Bind `name` in this scope directly, shadowing any outer binding.
    /// Used for procedure parameters, which never link into the caller.
    pub fn define(&self, name: &str, value: u64) -> VarRef {
        let var = Rc::new(RefCell::new(Variable {
            name: name.to_string(),
            value,
            init: true,
            closure: None,
        }));
        self.vars
            .borrow_mut()
            .insert(name.to_ascii_lowercase(), Rc::clone(&var));
        var
    }

    /// Copy every variable owned by `source` (not its ancestors) into this
    /// scope by value. Copies are marked initialized and keep any closure
    /// attachment of the original.
    pub fn merge_from(&self, source: &Environment) {
        let copies: Vec<(String, Variable)> = source
            .vars
            .borrow()
            .iter()
            .map(|(key, cell)| {
                let var = cell.borrow();
                (
                    key.clone(),
                    Variable {
                        name: var.name.clone(),
                        value: var.value,
                        init: true,
                        closure: var.closure.clone(),
                    },
                )
            })
            .collect();
        for (key, var) in copies {
            self.vars
                .borrow_mut()
                .insert(key, Rc::new(RefCell::new(var)));
        }
    }

    /// Write one line per variable, this scope first, then enclosing scopes.
    pub fn dump(&self, out: &mut dyn Write, show_uninitialized: bool) {
        for cell in self.vars.borrow().values() {
            let var = cell.borrow();
            if !var.init && !show_uninitialized {
                continue;
            }
            if var.init {
                let _ = writeln!(out, "{} at level {}: {}", var.name, self.level, var.value);
            } else {
                let _ = writeln!(out, "{} at level {}: uninitialized", var.name, self.level);
            }
        }
        if let Some(parent) = &self.parent {
            parent.dump(out, show_uninitialized);
        }
    }
}
