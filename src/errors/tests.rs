//! Unit tests for error handling.
//!
//! This module contains tests for diagnostic construction and rendering.

use crate::ast::types::{BinOp, Type};
use crate::errors::errors::{Diagnostic, DiagnosticKind, LowerError};

#[test]
fn test_diagnostic_carries_line() {
    let diagnostic = Diagnostic::new(
        DiagnosticKind::VariableNotDeclared {
            name: "foo".to_string(),
        },
        12,
    );

    assert_eq!(diagnostic.line(), 12);
}

#[test]
fn test_diagnostic_display_prefixes_line() {
    let diagnostic = Diagnostic::new(
        DiagnosticKind::VariableAlreadyDeclared {
            name: "x".to_string(),
        },
        3,
    );

    assert_eq!(
        diagnostic.to_string(),
        "Error at line 3: variable 'x' already declared in this scope"
    );
}

#[test]
fn test_declaration_mismatch_message() {
    let kind = DiagnosticKind::DeclarationTypeMismatch {
        name: "x".to_string(),
        expected: Type::Int,
        found: Type::Bool,
    };

    assert_eq!(
        kind.to_string(),
        "type mismatch in declaration of 'x': expected int, got bool"
    );
}

#[test]
fn test_operand_mismatch_message() {
    let kind = DiagnosticKind::OperandTypeMismatch {
        left: Type::Int,
        right: Type::Float,
    };

    assert_eq!(
        kind.to_string(),
        "type mismatch in binary expression: int vs float"
    );
}

#[test]
fn test_condition_message_names_the_construct() {
    let kind = DiagnosticKind::NonBooleanCondition {
        construct: "repeat",
        found: Type::Int,
    };

    assert_eq!(
        kind.to_string(),
        "condition in repeat statement must be of type 'bool', got 'int'"
    );
}

#[test]
fn test_loop_keyword_messages() {
    assert_eq!(
        DiagnosticKind::BreakOutsideLoop.to_string(),
        "'stop' used outside of loop"
    );
    assert_eq!(
        DiagnosticKind::ContinueOutsideLoop.to_string(),
        "'skip' used outside of loop"
    );
}

#[test]
fn test_logical_operand_message() {
    let kind = DiagnosticKind::LogicalRequiresBool {
        op: BinOp::And,
        found: Type::Int,
    };

    assert_eq!(
        kind.to_string(),
        "logical operator 'and' requires boolean operands, got int"
    );
}

#[test]
fn test_diagnostic_kind_accessor() {
    let diagnostic = Diagnostic::new(DiagnosticKind::BreakOutsideLoop, 7);

    assert!(matches!(
        diagnostic.kind(),
        DiagnosticKind::BreakOutsideLoop
    ));
}

#[test]
fn test_lower_error_display() {
    let error = LowerError::InvalidModule {
        message: "terminator missing".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "module verification failed: terminator missing"
    );
}
