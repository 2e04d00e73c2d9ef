//! Unit tests for AST construction.
//!
//! These cover the factory functions the parser drives, the lazy program
//! accumulator, and the literal/operator classification helpers.

use super::ast::{append_statement, Node, NodeKind};
use super::types::{BinOp, Literal, Type, UnOp};

#[test]
fn test_factories_record_line_numbers() {
    let node = Node::int_literal(7, 42);
    assert_eq!(node.line, 42);

    let node = Node::declaration(Type::Int, "x", Node::int_literal(0, 3), 3);
    assert_eq!(node.line, 3);

    let node = Node::break_stmt(9);
    assert_eq!(node.line, 9);
    assert_eq!(node.kind, NodeKind::Break);
}

#[test]
fn test_literal_factories_fix_the_kind() {
    assert_eq!(
        Node::bool_literal(true, 1).kind,
        NodeKind::Literal(Literal::Bool(true))
    );
    assert_eq!(
        Node::string_literal("hi", 1).kind,
        NodeKind::Literal(Literal::Str("hi".to_string()))
    );
    assert_eq!(
        Node::char_literal('c', 1).kind,
        NodeKind::Literal(Literal::Char('c'))
    );
}

#[test]
fn test_binary_factory_owns_children() {
    let node = Node::binary(
        Node::identifier("x", 5),
        BinOp::Add,
        Node::int_literal(1, 5),
        5,
    );

    match node.kind {
        NodeKind::Binary { op, left, right } => {
            assert_eq!(op, BinOp::Add);
            assert_eq!(
                left.kind,
                NodeKind::Identifier {
                    name: "x".to_string()
                }
            );
            assert_eq!(right.kind, NodeKind::Literal(Literal::Int(1)));
        }
        other => panic!("expected a binary node, got {:?}", other),
    }
}

#[test]
fn test_if_factory_optional_else() {
    let with_else = Node::if_stmt(
        Node::bool_literal(true, 1),
        Node::block(vec![], 1),
        Some(Node::block(vec![], 2)),
        1,
    );
    let without_else = Node::if_stmt(Node::bool_literal(true, 1), Node::block(vec![], 1), None, 1);

    match (with_else.kind, without_else.kind) {
        (
            NodeKind::If {
                else_branch: Some(_),
                ..
            },
            NodeKind::If {
                else_branch: None, ..
            },
        ) => {}
        other => panic!("unexpected node shapes: {:?}", other),
    }
}

#[test]
fn test_append_statement_creates_root_lazily() {
    let mut root = None;
    assert!(root.is_none());

    append_statement(&mut root, Node::int_literal(1, 1));
    append_statement(&mut root, Node::int_literal(2, 2));

    let root = root.expect("root should exist after the first append");
    match root.kind {
        NodeKind::Program { statements } => {
            assert_eq!(statements.len(), 2);
            assert_eq!(statements[0].line, 1);
            assert_eq!(statements[1].line, 2);
        }
        other => panic!("expected a program root, got {:?}", other),
    }
}

#[test]
fn test_literal_types() {
    assert_eq!(Literal::Int(0).type_of(), Type::Int);
    assert_eq!(Literal::Float(0.0).type_of(), Type::Float);
    assert_eq!(Literal::Str(String::new()).type_of(), Type::String);
    assert_eq!(Literal::Char('a').type_of(), Type::Char);
    assert_eq!(Literal::Bool(false).type_of(), Type::Bool);
}

#[test]
fn test_operator_classification() {
    assert!(BinOp::Add.is_arithmetic());
    assert!(!BinOp::Add.is_comparison());
    assert!(BinOp::Lt.is_comparison());
    assert!(BinOp::And.is_logical());
    assert!(!BinOp::And.is_arithmetic());
}

#[test]
fn test_display_forms() {
    assert_eq!(Type::Int.to_string(), "int");
    assert_eq!(Type::Error.to_string(), "error");
    assert_eq!(BinOp::Leq.to_string(), "<=");
    assert_eq!(BinOp::And.to_string(), "and");
    assert_eq!(UnOp::Not.to_string(), "not");
    assert_eq!(UnOp::Neg.to_string(), "-");
}

#[test]
fn test_sentinel_classification() {
    assert!(Type::Error.is_sentinel());
    assert!(Type::Unknown.is_sentinel());
    assert!(!Type::Void.is_sentinel());
    assert!(Type::Int.is_numeric());
    assert!(Type::Float.is_numeric());
    assert!(!Type::Bool.is_numeric());
}
