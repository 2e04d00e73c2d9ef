//! AST (Abstract Syntax Tree) module
//! Contains all definitions related to the AST structure
//!
//! Submodules:
//! - ast: Core node definitions and the factory functions used by the parser
//! - types: Type tags, operators and literal payloads
pub mod ast;
pub mod types;

#[cfg(test)]
mod tests;
