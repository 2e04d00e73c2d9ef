//! Error types and error handling for the semantic core.
//!
//! This module defines the two error families the crate produces:
//!
//! - Recoverable semantic diagnostics, tied to a source line, collected
//!   during analysis and reported without stopping the traversal
//! - Lowering errors for a module that fails LLVM verification

pub mod errors;

#[cfg(test)]
mod tests;
