//! Test utilities for cxxdoc
//!
//! This module provides common helpers for testing the C++ domain,
//! including declaration parsing, domain setup and reference lookups.

use crate::ast::{Declaration, DefExpr};
use crate::domain::{parse_declaration, CppDomain, DocContext, ObjectKind, RefRole};
use crate::parser::parse_type;

/// Result type for test helpers
pub type TestResult<T> = Result<T, String>;

/// Parse a declaration of the given kind
///
/// # Errors
/// Returns error if the declaration does not parse completely
pub fn parse_decl(kind: ObjectKind, source: &str) -> TestResult<Declaration> {
    parse_declaration(kind, source).map_err(|e| format!("Parse error: {e}"))
}

/// Parse a type expression
///
/// # Errors
/// Returns error if the type does not parse completely
pub fn parse_ty(source: &str) -> TestResult<DefExpr> {
    parse_type(source).map_err(|e| format!("Parse error: {e}"))
}

/// Parse a declaration and return its identifier
///
/// # Errors
/// Returns error if parsing fails
pub fn identifier_of(kind: ObjectKind, source: &str) -> TestResult<String> {
    Ok(parse_decl(kind, source)?.identifier())
}

/// Parse a declaration, render it and parse the rendering again
///
/// # Errors
/// Returns error if either parse fails or the two trees differ
pub fn reparse(kind: ObjectKind, source: &str) -> TestResult<Declaration> {
    let first = parse_decl(kind, source)?;
    let rendered = first.to_string();
    let second = parse_decl(kind, &rendered)?;
    if first == second {
        Ok(second)
    } else {
        Err(format!("Round trip of {source:?} via {rendered:?} changed the tree"))
    }
}

/// Describe top-level objects in one document of a fresh domain
///
/// # Errors
/// Returns error if any signature fails to parse
pub fn domain_with(docname: &str, objects: &[(ObjectKind, &str)]) -> TestResult<CppDomain> {
    let mut domain = CppDomain::new();
    describe_in(&mut domain, &DocContext::new(docname), objects)?;
    Ok(domain)
}

/// Describe objects in `ctx`
///
/// # Errors
/// Returns error if any signature fails to parse
pub fn describe_in(
    domain: &mut CppDomain,
    ctx: &DocContext,
    objects: &[(ObjectKind, &str)],
) -> TestResult<()> {
    for (kind, source) in objects {
        domain
            .describe(ctx, *kind, source)
            .map_err(|e| format!("Describe error: {e}"))?;
    }
    Ok(())
}

/// Resolve a reference and return the matched fullname
///
/// # Errors
/// Returns error if the target or the parent scope fails to parse
pub fn resolve_name(
    domain: &CppDomain,
    role: RefRole,
    target: &str,
    parent: Option<&str>,
) -> TestResult<Option<String>> {
    let parent = parent.map(parse_ty).transpose()?;
    let found = domain
        .resolve_xref(role, target, parent.as_ref())
        .map_err(|e| format!("Resolve error: {e}"))?;
    Ok(found.map(|found| found.fullname))
}
