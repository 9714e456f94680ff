//! Statement execution: dispatch, scoping, and the procedure-call protocol.

use std::io::{self, Write};
use std::rc::Rc;

use barebones_parser::{Program, Stmt, StmtKind, VarNode};

use crate::environment::{Closure, EnvRef, Environment, VarRef, Variable};
use crate::error::{RuntimeError, RuntimeResult};
use crate::printer::render_body;
use crate::registry::{Procedure, ProcedureRegistry};

/// Evaluation settings, normally taken from the command line.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// When false (`-u`), reading a variable that was never assigned is a
    /// runtime error instead of silently yielding 0.
    pub init_to_zero: bool,
    /// Verbose output: scope levels on prints and argument-binding traces.
    pub verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            init_to_zero: true,
            verbose: false,
        }
    }
}

/// Outcome of executing a statement or statement list.
///
/// `Exit` unwinds to the nearest procedure-call boundary, or ends the program
/// when nothing is on the call stack. Runtime failures travel separately as
/// errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// What a `runproc` resolved to: a registered procedure, or a closure held by
/// a variable of the same name.
enum Callee {
    Procedure(Rc<Procedure>),
    Closure(Rc<Closure>),
}

/// The execution engine: current scope, registered procedures, output sink.
pub struct Interpreter {
    options: Options,
    env: EnvRef,
    registry: ProcedureRegistry,
    out: Box<dyn Write>,
}

impl Interpreter {
    /// An interpreter writing program output to stdout.
    pub fn new(options: Options) -> Self {
        Self::with_output(options, Box::new(io::stdout()))
    }

    /// An interpreter writing program output to an arbitrary sink; tests use
    /// this to capture transcripts.
    pub fn with_output(options: Options, out: Box<dyn Write>) -> Self {
        Self {
            options,
            env: Environment::root(),
            registry: ProcedureRegistry::new(),
            out,
        }
    }

    /// Pre-set a variable in the global scope (the command line's
    /// `name=value` initializers).
    pub fn define_initializer(&mut self, name: &str, value: u64) {
        let var = self.env.resolve_or_create(name, self.options.init_to_zero);
        var.borrow_mut().set(value);
    }

    /// Snapshot of a variable as visible from the current scope, if it
    /// exists. Does not create the variable.
    pub fn variable(&self, name: &str) -> Option<Variable> {
        self.env.lookup(name).map(|var| var.borrow().clone())
    }

    /// Dump every variable reachable from the current scope.
    pub fn dump_variables(&mut self, show_uninitialized: bool) {
        let env = Rc::clone(&self.env);
        env.dump(self.out.as_mut(), show_uninitialized);
    }

    /// Execute a whole program. A top-level `exit` stops the remaining
    /// statements and is not an error.
    pub fn run(&mut self, program: &Program) -> RuntimeResult<()> {
        self.execute_list(&program.statements)?;
        Ok(())
    }

    fn execute_list(&mut self, stmts: &[Stmt]) -> RuntimeResult<Flow> {
        for stmt in stmts {
            if self.execute_stmt(stmt)? == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    fn execute_stmt(&mut self, stmt: &Stmt) -> RuntimeResult<Flow> {
        match &stmt.kind {
            StmtKind::Clear { var } => self.exec_clear(var),
            StmtKind::Incr { var } => self.exec_incr(var, stmt.line),
            StmtKind::Decr { var } => self.exec_decr(var, stmt.line),
            StmtKind::While { var, body } => self.exec_while(var, body, stmt.line),
            StmtKind::Copy { src, dest } => self.exec_copy(src, dest, stmt.line),
            StmtKind::AddClear { src, dest } => self.exec_add_clear(src, dest, stmt.line),
            StmtKind::Print { var } => self.exec_print(var, stmt.line),
            StmtKind::DefProc { name, params, body } => self.exec_defproc(name, params, body),
            StmtKind::RunProc { name, args } => self.exec_runproc(name, args, stmt.line),
            StmtKind::Lambda { var, params, body } => self.exec_lambda(var, params, body),
            StmtKind::Exit => Ok(Flow::Exit),
        }
    }

    /// Resolve a statement operand against the current scope chain, creating
    /// it in the innermost scope when absent.
    fn resolve(&self, node: &VarNode) -> VarRef {
        self.env
            .resolve_or_create(&node.name, self.options.init_to_zero)
    }

    fn require_init(&self, cell: &VarRef, line: usize) -> RuntimeResult<()> {
        let var = cell.borrow();
        if var.init {
            Ok(())
        } else {
            Err(RuntimeError::UninitializedVariable {
                name: var.name.clone(),
                line,
            })
        }
    }

    fn exec_clear(&mut self, node: &VarNode) -> RuntimeResult<Flow> {
        let cell = self.resolve(node);
        cell.borrow_mut().set(0);
        Ok(Flow::Continue)
    }

    fn exec_incr(&mut self, node: &VarNode, line: usize) -> RuntimeResult<Flow> {
        let cell = self.resolve(node);
        self.require_init(&cell, line)?;
        let mut var = cell.borrow_mut();
        var.value = var
            .value
            .checked_add(1)
            .ok_or(RuntimeError::Overflow { line })?;
        Ok(Flow::Continue)
    }

    fn exec_decr(&mut self, node: &VarNode, line: usize) -> RuntimeResult<Flow> {
        let cell = self.resolve(node);
        self.require_init(&cell, line)?;
        let mut var = cell.borrow_mut();
        var.value = var.value.saturating_sub(1);
        Ok(Flow::Continue)
    }

    /// The control variable is resolved and checked once; the loop then
    /// re-reads that same cell after every body execution.
    fn exec_while(&mut self, node: &VarNode, body: &[Stmt], line: usize) -> RuntimeResult<Flow> {
        let cell = self.resolve(node);
        self.require_init(&cell, line)?;
        while cell.borrow().value != 0 {
            if self.execute_list(body)? == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    fn exec_copy(&mut self, src: &VarNode, dest: &VarNode, line: usize) -> RuntimeResult<Flow> {
        let src_cell = self.resolve(src);
        self.require_init(&src_cell, line)?;
        let (value, closure) = {
            let var = src_cell.borrow();
            (var.value, var.closure.clone())
        };
        let dest_cell = self.resolve(dest);
        let mut var = dest_cell.borrow_mut();
        var.value = value;
        var.closure = closure;
        var.init = true;
        Ok(Flow::Continue)
    }

    fn exec_add_clear(
        &mut self,
        src: &VarNode,
        dest: &VarNode,
        line: usize,
    ) -> RuntimeResult<Flow> {
        let src_cell = self.resolve(src);
        self.require_init(&src_cell, line)?;
        let added = src_cell.borrow().value;
        // A zero-trip loop never touches the destination, so neither may the
        // rewrite: resolving it here would materialize a variable the plain
        // run does not have. Strict mode still checks both operands up front.
        if added == 0 && self.options.init_to_zero {
            return Ok(Flow::Continue);
        }
        let dest_cell = self.resolve(dest);
        self.require_init(&dest_cell, line)?;
        {
            let mut var = dest_cell.borrow_mut();
            var.value = var
                .value
                .checked_add(added)
                .ok_or(RuntimeError::Overflow { line })?;
        }
        src_cell.borrow_mut().value = 0;
        Ok(Flow::Continue)
    }

    fn exec_print(&mut self, node: &VarNode, line: usize) -> RuntimeResult<Flow> {
        let cell = self.resolve(node);
        self.require_init(&cell, line)?;
        let var = cell.borrow();
        if let Some(closure) = &var.closure {
            let _ = write!(self.out, "{} : ", var.name);
            let _ = write!(self.out, "{}", render_body(&closure.body));
        } else if self.options.verbose {
            let _ = writeln!(
                self.out,
                "{} : {} at level {}",
                var.name,
                var.value,
                self.env.level()
            );
        } else {
            let _ = writeln!(self.out, "{} : {} ", var.name, var.value);
        }
        Ok(Flow::Continue)
    }

    fn exec_defproc(
        &mut self,
        name: &str,
        params: &[VarNode],
        body: &[Stmt],
    ) -> RuntimeResult<Flow> {
        self.registry.register(name, params, body);
        let _ = writeln!(self.out, "New Subroutine : {}", name);
        if self.options.verbose {
            for param in params {
                let _ = writeln!(self.out, "\tArgument needed : {}", param.name);
            }
        }
        Ok(Flow::Continue)
    }

    /// Attach a closure capturing the current scope to the target variable.
    /// The variable's value and initialized flag are untouched.
    fn exec_lambda(
        &mut self,
        node: &VarNode,
        params: &[VarNode],
        body: &[Stmt],
    ) -> RuntimeResult<Flow> {
        let cell = self.resolve(node);
        let closure = Closure {
            params: params.to_vec(),
            body: body.to_vec(),
            env: Rc::clone(&self.env),
        };
        cell.borrow_mut().closure = Some(Rc::new(closure));
        Ok(Flow::Continue)
    }

    /// The call protocol: registry lookup (falling back to a closure-holding
    /// variable), a fresh frame under the caller, captured-scope merge,
    /// by-value argument binding, body execution, frame restore. The body's
    /// `exit`, if any, ends here.
    fn exec_runproc(&mut self, name: &str, args: &[VarNode], line: usize) -> RuntimeResult<Flow> {
        let caller_env = Rc::clone(&self.env);
        let frame = Environment::child(&caller_env);

        let callee = match self.registry.find(name) {
            Some(procedure) => Callee::Procedure(procedure),
            None => {
                let cell = caller_env.resolve_or_create(name, self.options.init_to_zero);
                let closure = cell.borrow().closure.clone();
                match closure {
                    Some(closure) => {
                        frame.merge_from(&closure.env);
                        Callee::Closure(closure)
                    }
                    None => {
                        return Err(RuntimeError::UnknownProcedure {
                            name: name.to_string(),
                            line,
                        });
                    }
                }
            }
        };
        let (params, body) = match &callee {
            Callee::Procedure(procedure) => (&procedure.params, &procedure.body),
            Callee::Closure(closure) => (&closure.params, &closure.body),
        };

        let _ = writeln!(self.out, "Running subroutine : {}", name);

        for (position, param) in params.iter().enumerate() {
            if self.options.verbose {
                let _ = write!(self.out, "\targ {}", param.name);
            }
            let Some(arg) = args.get(position) else {
                return Err(RuntimeError::NotEnoughArguments {
                    name: name.to_string(),
                    line,
                });
            };
            // A zero value tag means the argument names a variable: read it
            // from the caller's scope, with no initialization check.
            let value = if arg.value == 0 {
                caller_env
                    .resolve_or_create(&arg.name, self.options.init_to_zero)
                    .borrow()
                    .value
            } else {
                arg.value
            };
            frame.define(&param.name, value);
            if self.options.verbose {
                let _ = writeln!(self.out, " => {} ", value);
            }
        }

        self.env = frame;
        let result = self.execute_list(body);
        self.env = caller_env;
        result?;

        Ok(Flow::Continue)
    }
}
