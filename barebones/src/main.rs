use std::fs;
use std::process;

use barebones_interpreter::{Interpreter, Options, optimize_program};
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "barebones",
    version,
    about = "Interpreter for the Bare Bones teaching language"
)]
struct Cli {
    /// Leave variables uninitialized until they are first assigned; reading
    /// one before that is a runtime error
    #[arg(short = 'u')]
    uninitialized: bool,

    /// Collapse copy-accumulate loops into single add-and-clear statements
    /// before running
    #[arg(short = 'O')]
    optimize: bool,

    /// Verbose output: variable dumps, scope levels, argument binding
    #[arg(short = 'v')]
    verbose: bool,

    /// name=value presets, plus the program file to run
    #[arg(value_name = "ARG")]
    inputs: Vec<String>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    let (initializers, path) = split_arguments(&cli.inputs);

    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => fail_usage(&format!("{}: {}", path, err)),
    };

    let mut program = match barebones_parser::parse_program(&source) {
        Ok(program) => program,
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            process::exit(2);
        }
    };
    if cli.optimize {
        optimize_program(&mut program);
    }

    let options = Options {
        init_to_zero: !cli.uninitialized,
        verbose: cli.verbose,
    };
    let mut interpreter = Interpreter::new(options);
    for (name, value) in &initializers {
        interpreter.define_initializer(name, *value);
    }

    if cli.verbose {
        println!("initial values of variables:");
        interpreter.dump_variables(false);
    }

    println!("\nbegin main_prog:\n");
    if let Err(err) = interpreter.run(&program) {
        eprintln!("error on line {}: {}", err.line(), err);
        process::exit(2);
    }
    println!("\nend of main_prog:\n");

    if cli.verbose {
        println!("final values of variables:");
        interpreter.dump_variables(true);
    }
}

/// Split the positional arguments into `name=value` initializers and the
/// single program path. Anything containing `=` is an initializer.
fn split_arguments(inputs: &[String]) -> (Vec<(String, u64)>, String) {
    let mut initializers = Vec::new();
    let mut path: Option<&str> = None;
    for input in inputs {
        if let Some((name, value)) = input.split_once('=') {
            initializers.push((name.to_string(), parse_initializer(input, name, value)));
        } else if path.is_some() {
            fail_usage("more than one program file given");
        } else {
            path = Some(input);
        }
    }
    match path {
        Some(path) => (initializers, path.to_string()),
        None => fail_usage("no program file given"),
    }
}

fn parse_initializer(raw: &str, name: &str, value: &str) -> u64 {
    if name.is_empty() {
        fail_usage(&format!(
            "invalid initializer '{}': empty variable name",
            raw
        ));
    }
    if value.starts_with('-') {
        fail_usage(&format!(
            "invalid initializer '{}': negative values are not permitted",
            raw
        ));
    }
    match value.parse::<u64>() {
        Ok(value) => value,
        Err(_) => fail_usage(&format!(
            "invalid initializer '{}': '{}' is not a non-negative integer",
            raw, value
        )),
    }
}

fn fail_usage(message: &str) -> ! {
    eprintln!("barebones: {}", message);
    process::exit(1);
}
