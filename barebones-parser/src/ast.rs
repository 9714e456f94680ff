// Bare Bones AST Definitions
// Statement-tree nodes built by the parser and rewritten in place by the
// optimizer

/// A variable operand as written in source: either a reference by name or an
/// integer literal.
///
/// Named references start uninitialized with value 0; literals carry the
/// value and its decimal text as the name, tagged initialized. Argument
/// binding relies on the value tag to tell the two apart, so a literal `0`
/// argument is indistinguishable from a name reference.
#[derive(Debug, Clone, PartialEq)]
pub struct VarNode {
    pub name: String,
    pub value: u64,
    pub init: bool,
}

impl VarNode {
    /// A reference-by-name operand.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: 0,
            init: false,
        }
    }

    /// An integer-literal operand.
    pub fn literal(value: u64) -> Self {
        Self {
            name: value.to_string(),
            value,
            init: true,
        }
    }
}

/// Executable statement kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Clear {
        var: VarNode,
    },
    Incr {
        var: VarNode,
    },
    Decr {
        var: VarNode,
    },
    While {
        var: VarNode,
        body: Vec<Stmt>,
    },
    Copy {
        src: VarNode,
        dest: VarNode,
    },
    Print {
        var: VarNode,
    },
    DefProc {
        name: String,
        params: Vec<VarNode>,
        body: Vec<Stmt>,
    },
    RunProc {
        name: String,
        args: Vec<VarNode>,
    },
    Lambda {
        var: VarNode,
        params: Vec<VarNode>,
        body: Vec<Stmt>,
    },
    Exit,
    /// Introduced by the optimizer in place of a matching while loop:
    /// `dest += src; src = 0` in one step.
    AddClear {
        src: VarNode,
        dest: VarNode,
    },
}

/// A statement together with the 1-based source line of its first token.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub line: usize,
}

impl Stmt {
    pub fn new(kind: StmtKind, line: usize) -> Self {
        Self { kind, line }
    }
}

/// A parsed source file: the main program's statement list.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}
