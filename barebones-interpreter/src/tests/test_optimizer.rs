//! Loop rewriting: which shapes collapse into add-and-clear, which are left
//! alone, and the observable equivalence of the rewritten programs.

use barebones_parser::{Program, StmtKind, VarNode};

use crate::error::RuntimeError;
use crate::evaluator::Options;
use crate::optimizer::optimize_program;
use crate::tests::{run, run_optimized, run_with, run_with_initializers};

fn optimized(source: &str) -> Program {
    let mut program = barebones_parser::parse_program(source).unwrap();
    optimize_program(&mut program);
    program
}

#[test]
fn test_rewrites_increment_then_decrement() {
    let program = optimized("while l not 0 do; incr x; decr l; end;");
    assert_eq!(
        program.statements[0].kind,
        StmtKind::AddClear {
            src: VarNode::named("l"),
            dest: VarNode::named("x"),
        }
    );
    assert_eq!(program.statements[0].line, 1);
}

#[test]
fn test_rewrites_decrement_then_increment() {
    let program = optimized("while l not 0 do; decr l; incr x; end;");
    assert_eq!(
        program.statements[0].kind,
        StmtKind::AddClear {
            src: VarNode::named("l"),
            dest: VarNode::named("x"),
        }
    );
}

#[test]
fn test_keeps_loop_incrementing_itself() {
    let program = optimized("while l not 0 do; incr l; decr l; end;");
    assert!(matches!(
        program.statements[0].kind,
        StmtKind::While { .. }
    ));
}

#[test]
fn test_keeps_loop_decrementing_another_variable() {
    let program = optimized("while l not 0 do; incr x; decr y; end;");
    assert!(matches!(
        program.statements[0].kind,
        StmtKind::While { .. }
    ));
}

#[test]
fn test_keeps_other_body_shapes() {
    for source in [
        "while l not 0 do; incr x; decr l; incr z; end;",
        "while l not 0 do; decr l; end;",
        "while l not 0 do; end;",
        "while l not 0 do; copy l to x; decr l; end;",
    ] {
        let program = optimized(source);
        assert!(
            matches!(program.statements[0].kind, StmtKind::While { .. }),
            "should not rewrite: {}",
            source
        );
    }
}

#[test]
fn test_matches_loop_variable_case_insensitively() {
    let program = optimized("while Loop not 0 do; decr LOOP; incr x; end;");
    assert_eq!(
        program.statements[0].kind,
        StmtKind::AddClear {
            src: VarNode::named("LOOP"),
            dest: VarNode::named("x"),
        }
    );
}

#[test]
fn test_rewrites_nested_loops() {
    let source = "while a not 0 do;
decr a;
while b not 0 do;
incr c;
decr b;
end;
clear z;
end;";
    let program = optimized(source);
    let StmtKind::While { body, .. } = &program.statements[0].kind else {
        panic!("outer loop should survive");
    };
    assert_eq!(
        body[1].kind,
        StmtKind::AddClear {
            src: VarNode::named("b"),
            dest: VarNode::named("c"),
        }
    );
    assert_eq!(body[1].line, 3);
}

#[test]
fn test_skips_procedure_and_closure_bodies() {
    let source = "defproc f do; while l not 0 do; incr x; decr l; end; end; \
                  lambda v do; while m not 0 do; incr y; decr m; end; end;";
    let program = optimized(source);
    let StmtKind::DefProc { body, .. } = &program.statements[0].kind else {
        panic!("expected a procedure definition");
    };
    assert!(matches!(body[0].kind, StmtKind::While { .. }));
    let StmtKind::Lambda { body, .. } = &program.statements[1].kind else {
        panic!("expected a lambda");
    };
    assert!(matches!(body[0].kind, StmtKind::While { .. }));
}

#[test]
fn test_rewritten_loop_moves_and_clears() {
    let run = run_with_initializers(
        "while a not 0 do; incr b; decr a; end;",
        Options::default(),
        true,
        &[("a", 5), ("b", 3)],
    );
    assert!(run.result.is_ok());
    assert_eq!(run.value("a"), Some(0));
    assert_eq!(run.value("b"), Some(8));
}

#[test]
fn test_strict_mode_checks_destination_even_for_skipped_loops() {
    // Unoptimized, a zero-trip loop never touches b; the rewritten form
    // reads both operands up front.
    let source = "clear a;\nwhile a not 0 do;\nincr b;\ndecr a;\nend;";
    let strict = Options {
        init_to_zero: false,
        ..Options::default()
    };
    let plain = run_with(source, strict, false);
    assert!(plain.result.is_ok());

    let fast = run_with(source, strict, true);
    assert_eq!(
        fast.error(),
        RuntimeError::UninitializedVariable {
            name: "b".to_string(),
            line: 2,
        }
    );
}

#[test]
fn test_overflow_reports_the_loop_line_in_both_forms() {
    let source = "while a not 0 do; incr b; decr a; end;";
    for optimize in [false, true] {
        let run = run_with_initializers(
            source,
            Options::default(),
            optimize,
            &[("a", 2), ("b", u64::MAX - 1)],
        );
        assert_eq!(run.error(), RuntimeError::Overflow { line: 1 });
    }
}

#[test]
fn test_rewritten_program_is_observably_equivalent() {
    let source = "clear src; incr src; incr src; incr src;
        clear dst; incr dst; incr dst;
        while src not 0 do; incr dst; decr src; end;
        print dst; print src;";
    let plain = run(source);
    let fast = run_optimized(source);
    assert_eq!(plain.output(), fast.output());
    assert_eq!(plain.output(), "dst : 5 \nsrc : 0 \n");
    assert_eq!(fast.value("dst"), Some(5));
    assert_eq!(fast.value("src"), Some(0));
}

#[test]
fn test_zero_trip_rewrite_leaves_destination_unmaterialized() {
    // A skipped loop never touches b, so the rewritten form must not create
    // it either; otherwise the final dumps diverge between -O and plain runs.
    let source = "clear a; while a not 0 do; incr b; decr a; end;";
    let plain = run(source);
    let fast = run_optimized(source);
    assert!(plain.result.is_ok());
    assert!(fast.result.is_ok());
    assert!(plain.variable("b").is_none());
    assert!(fast.variable("b").is_none());
    assert_eq!(fast.value("a"), Some(0));
}
