//! Test suite for the Bare Bones evaluator.
//!
//! Programs run against an in-memory output sink; every helper returns a
//! [`ProgramRun`] bundling the finished interpreter, the result, and the
//! captured transcript.

use std::cell::RefCell;
use std::io;
use std::io::Write;
use std::rc::Rc;

use crate::environment::Variable;
use crate::error::RuntimeError;
use crate::evaluator::{Interpreter, Options};
use crate::optimizer::optimize_program;

pub mod test_optimizer;

/// Clonable byte sink; the interpreter writes through one handle while the
/// test reads back through another.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A finished program run: final interpreter state, outcome, and transcript.
pub struct ProgramRun {
    pub interpreter: Interpreter,
    pub result: Result<(), RuntimeError>,
    pub buffer: SharedBuffer,
}

impl ProgramRun {
    /// Everything the program wrote, as UTF-8 text.
    pub fn output(&self) -> String {
        String::from_utf8(self.buffer.0.borrow().clone()).unwrap()
    }

    /// The value of an initialized global, or `None` when the variable is
    /// missing or was never assigned.
    pub fn value(&self, name: &str) -> Option<u64> {
        self.variable(name)
            .filter(|var| var.init)
            .map(|var| var.value)
    }

    /// Snapshot of a global variable, initialized or not.
    pub fn variable(&self, name: &str) -> Option<Variable> {
        self.interpreter.variable(name)
    }

    /// The runtime error the program died with. Panics if it succeeded.
    pub fn error(&self) -> RuntimeError {
        match &self.result {
            Ok(()) => panic!("expected a runtime error, but the program succeeded"),
            Err(err) => err.clone(),
        }
    }
}

pub fn run_with_initializers(
    source: &str,
    options: Options,
    optimize: bool,
    initializers: &[(&str, u64)],
) -> ProgramRun {
    let mut program = barebones_parser::parse_program(source).unwrap();
    if optimize {
        optimize_program(&mut program);
    }
    let buffer = SharedBuffer::default();
    let mut interpreter = Interpreter::with_output(options, Box::new(buffer.clone()));
    for (name, value) in initializers {
        interpreter.define_initializer(name, *value);
    }
    let result = interpreter.run(&program);
    ProgramRun {
        interpreter,
        result,
        buffer,
    }
}

pub fn run_with(source: &str, options: Options, optimize: bool) -> ProgramRun {
    run_with_initializers(source, options, optimize, &[])
}

/// Default settings: uninitialized reads yield zero, terse output.
pub fn run(source: &str) -> ProgramRun {
    run_with(source, Options::default(), false)
}

pub fn run_verbose(source: &str) -> ProgramRun {
    let options = Options {
        verbose: true,
        ..Options::default()
    };
    run_with(source, options, false)
}

/// Strict mode (`-u`): reading an unassigned variable is an error.
pub fn run_strict(source: &str) -> ProgramRun {
    let options = Options {
        init_to_zero: false,
        ..Options::default()
    };
    run_with(source, options, false)
}

pub fn run_optimized(source: &str) -> ProgramRun {
    run_with(source, Options::default(), true)
}
