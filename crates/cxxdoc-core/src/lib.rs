//! cxxdoc Core - C++ declaration domain for documentation builds
//!
//! This crate provides the core functionality:
//! - Span: Byte ranges inside a declaration
//! - AST: Definition expression trees, text form and identifiers
//! - Parser: Recursive-descent parsing of C++ declarations
//! - Domain: Signature registration and cross-reference resolution
//! - Project: Manifest-driven two-pass builds

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Source spans for error reporting
pub mod span;

/// Definition expression tree - parsed representation of C++ declarations
pub mod ast;

/// Parser module - converts declaration strings into expression trees
pub mod parser;

/// C++ domain - object registry, signatures and reference resolution
pub mod domain;

/// Domain configuration
pub mod config;

/// Project manifests and builds
pub mod project;

/// Test utilities - helpers for testing declarations and lookups
pub mod testutil;

/// Convenience re-export of the parser
pub use parser::{parse_type, DefinitionError, DefinitionParser};

/// Convenience re-export of AST types
pub use ast::{Declaration, DefExpr};

/// Convenience re-export of the domain
pub use domain::{CppDomain, DocContext, ObjectKind, RefRole};

/// Convenience re-export of configuration
pub use config::DomainConfig;

/// Convenience re-export of project types
pub use project::{BuildReport, Project};
