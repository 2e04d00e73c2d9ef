use std::fmt::Display;

use thiserror::Error;

use crate::ast::types::{BinOp, Type};

/// A recoverable semantic error tied to the source line of the node that
/// produced it. Diagnostics never abort the analysis pass; they accumulate
/// so one run can surface every problem in the program.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    line: u32,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, line: u32) -> Self {
        Diagnostic { kind, line }
    }

    pub fn kind(&self) -> &DiagnosticKind {
        &self.kind
    }

    /// The line of the owning node. Condition errors report the line of
    /// the `if`/`repeat` statement, not of the condition expression.
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error at line {}: {}", self.line, self.kind)
    }
}

/// The closed set of recoverable semantic errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    #[error("variable '{name}' already declared in this scope")]
    VariableAlreadyDeclared { name: String },
    #[error("variable '{name}' not declared")]
    VariableNotDeclared { name: String },
    #[error("type mismatch in declaration of '{name}': expected {expected}, got {found}")]
    DeclarationTypeMismatch {
        name: String,
        expected: Type,
        found: Type,
    },
    #[error("type mismatch in assignment to '{name}': expected {expected}, got {found}")]
    AssignmentTypeMismatch {
        name: String,
        expected: Type,
        found: Type,
    },
    #[error("type mismatch in binary expression: {left} vs {right}")]
    OperandTypeMismatch { left: Type, right: Type },
    #[error("operator '{op}' requires integer or float operands, got {found}")]
    ArithmeticRequiresNumeric { op: BinOp, found: Type },
    #[error("logical operator '{op}' requires boolean operands, got {found}")]
    LogicalRequiresBool { op: BinOp, found: Type },
    #[error("'not' operator requires a boolean operand, got {found}")]
    NotRequiresBool { found: Type },
    #[error("unary '-' requires an integer or float operand, got {found}")]
    NegationRequiresNumeric { found: Type },
    #[error("condition in {construct} statement must be of type 'bool', got '{found}'")]
    NonBooleanCondition {
        construct: &'static str,
        found: Type,
    },
    #[error("'stop' used outside of loop")]
    BreakOutsideLoop,
    #[error("'skip' used outside of loop")]
    ContinueOutsideLoop,
}

/// Errors from the lowering stage. Unlike diagnostics these are terminal:
/// an unverifiable module must not reach the backend.
#[derive(Error, Debug)]
pub enum LowerError {
    #[error("module verification failed: {message}")]
    InvalidModule { message: String },
}
