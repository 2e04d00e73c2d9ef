//! The per-node semantic pass.
//!
//! A depth-first walk over the tree that infers a [`Type`] for every node,
//! populates the symbol table scope-by-scope, and collects diagnostics.
//! The walk visits every reachable node even after an error so a single
//! run reports everything; sentinel types (`error`, `unknown`) keep one
//! mistake from echoing through every enclosing expression.

use crate::ast::ast::{Node, NodeKind};
use crate::ast::types::{Type, UnOp};
use crate::errors::errors::{Diagnostic, DiagnosticKind};

use super::symbol_table::SymbolTable;

/// Analysis context threaded through the recursive walk: the scope stack
/// and the diagnostics collected so far. One instance per compilation.
#[derive(Debug, Default)]
pub struct Analyzer {
    pub symbols: SymbolTable,
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs the semantic pass over a tree and returns the finished context.
pub fn analyze(root: &Node) -> Analyzer {
    let mut analyzer = Analyzer::new();
    analyzer.analyze_node(root);
    analyzer
}

impl Analyzer {
    pub fn new() -> Self {
        Analyzer {
            symbols: SymbolTable::new(),
            diagnostics: vec![],
        }
    }

    fn report(&mut self, kind: DiagnosticKind, line: u32) {
        self.diagnostics.push(Diagnostic::new(kind, line));
    }

    /// Writes every collected diagnostic to the error stream.
    pub fn emit_diagnostics(&self) {
        for diagnostic in &self.diagnostics {
            eprintln!("{}", diagnostic);
        }
    }

    /// Analyzes one node, returning its inferred type. Statements yield
    /// `void`; unresolvable expressions yield a sentinel.
    pub fn analyze_node(&mut self, node: &Node) -> Type {
        match &node.kind {
            NodeKind::Literal(literal) => literal.type_of(),

            NodeKind::Identifier { name } => match self.symbols.lookup(name) {
                Some(symbol) => symbol.ty,
                None => {
                    self.report(
                        DiagnosticKind::VariableNotDeclared { name: name.clone() },
                        node.line,
                    );
                    Type::Error
                }
            },

            NodeKind::Binary { op, left, right } => {
                let left_ty = self.analyze_node(left);
                let right_ty = self.analyze_node(right);

                let mismatched = left_ty != right_ty;
                if mismatched && !left_ty.is_sentinel() && !right_ty.is_sentinel() {
                    self.report(
                        DiagnosticKind::OperandTypeMismatch {
                            left: left_ty,
                            right: right_ty,
                        },
                        node.line,
                    );
                }

                if op.is_comparison() {
                    // Comparisons produce bool regardless; a mismatch was
                    // already reported above.
                    Type::Bool
                } else if op.is_logical() {
                    if !mismatched && left_ty != Type::Bool && !left_ty.is_sentinel() {
                        self.report(
                            DiagnosticKind::LogicalRequiresBool {
                                op: *op,
                                found: left_ty,
                            },
                            node.line,
                        );
                    }
                    Type::Bool
                } else {
                    // Arithmetic: defined only on matching numeric operands.
                    if left_ty.is_sentinel() || right_ty.is_sentinel() || mismatched {
                        Type::Error
                    } else if !left_ty.is_numeric() {
                        self.report(
                            DiagnosticKind::ArithmeticRequiresNumeric {
                                op: *op,
                                found: left_ty,
                            },
                            node.line,
                        );
                        Type::Error
                    } else {
                        left_ty
                    }
                }
            }

            NodeKind::Unary { op, operand } => {
                let operand_ty = self.analyze_node(operand);
                match op {
                    UnOp::Not => {
                        if operand_ty == Type::Bool {
                            Type::Bool
                        } else {
                            if !operand_ty.is_sentinel() {
                                self.report(
                                    DiagnosticKind::NotRequiresBool { found: operand_ty },
                                    node.line,
                                );
                            }
                            Type::Error
                        }
                    }
                    UnOp::Neg => {
                        if operand_ty.is_numeric() {
                            operand_ty
                        } else {
                            if !operand_ty.is_sentinel() {
                                self.report(
                                    DiagnosticKind::NegationRequiresNumeric { found: operand_ty },
                                    node.line,
                                );
                            }
                            Type::Error
                        }
                    }
                }
            }

            NodeKind::Declaration {
                declared_type,
                name,
                init,
            } => {
                let init_ty = self.analyze_node(init);
                if init_ty != *declared_type && !init_ty.is_sentinel() {
                    self.report(
                        DiagnosticKind::DeclarationTypeMismatch {
                            name: name.clone(),
                            expected: *declared_type,
                            found: init_ty,
                        },
                        node.line,
                    );
                }
                // The declaration itself goes through even on mismatch so
                // later uses of the name resolve.
                if self.symbols.declare(name, *declared_type, node.line).is_err() {
                    self.report(
                        DiagnosticKind::VariableAlreadyDeclared { name: name.clone() },
                        node.line,
                    );
                }
                Type::Void
            }

            NodeKind::Assignment { name, value } => {
                let expected = self.symbols.lookup(name).map(|symbol| symbol.ty);
                match expected {
                    Some(expected) => {
                        let value_ty = self.analyze_node(value);
                        if value_ty != expected
                            && !value_ty.is_sentinel()
                            && !expected.is_sentinel()
                        {
                            self.report(
                                DiagnosticKind::AssignmentTypeMismatch {
                                    name: name.clone(),
                                    expected,
                                    found: value_ty,
                                },
                                node.line,
                            );
                        }
                        Type::Void
                    }
                    None => {
                        self.report(
                            DiagnosticKind::VariableNotDeclared { name: name.clone() },
                            node.line,
                        );
                        Type::Error
                    }
                }
            }

            NodeKind::Print { value } => {
                self.analyze_node(value);
                Type::Void
            }

            NodeKind::Return { value } => {
                let value_ty = self.analyze_node(value);
                println!("Line {}: return {}", node.line, value_ty);
                value_ty
            }

            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let cond_ty = self.analyze_node(condition);
                if cond_ty != Type::Bool && !cond_ty.is_sentinel() {
                    // Reported against the if statement's own line.
                    self.report(
                        DiagnosticKind::NonBooleanCondition {
                            construct: "if",
                            found: cond_ty,
                        },
                        node.line,
                    );
                }
                self.analyze_node(then_branch);
                if let Some(else_branch) = else_branch {
                    self.analyze_node(else_branch);
                }
                Type::Void
            }

            NodeKind::Repeat { condition, body } => {
                let cond_ty = self.analyze_node(condition);
                if cond_ty != Type::Bool && !cond_ty.is_sentinel() {
                    self.report(
                        DiagnosticKind::NonBooleanCondition {
                            construct: "repeat",
                            found: cond_ty,
                        },
                        node.line,
                    );
                }
                self.symbols.enter_loop();
                self.analyze_node(body);
                self.symbols.exit_loop();
                Type::Void
            }

            NodeKind::Break => {
                if !self.symbols.is_inside_loop() {
                    self.report(DiagnosticKind::BreakOutsideLoop, node.line);
                }
                Type::Void
            }

            NodeKind::Continue => {
                if !self.symbols.is_inside_loop() {
                    self.report(DiagnosticKind::ContinueOutsideLoop, node.line);
                }
                Type::Void
            }

            NodeKind::Block { statements } => {
                self.symbols.enter_scope();
                for statement in statements {
                    self.analyze_node(statement);
                }
                self.symbols.exit_scope();
                Type::Void
            }

            // Extension point: no argument checking yet.
            NodeKind::BuiltinCall { .. } => Type::Unknown,

            NodeKind::Program { statements } => {
                // Top-level statements live directly in the global scope.
                for statement in statements {
                    self.analyze_node(statement);
                }
                Type::Void
            }
        }
    }
}
