//! Cross-reference resolution with scope fallback

use serde::Serialize;
use thiserror::Error;

use super::{CppDomain, ObjectKind, RefRole};
use crate::ast::DefExpr;
use crate::config::DomainConfig;
use crate::parser::{parse_type, DefinitionError};

/// Why a reference target could not be looked up at all
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("unparseable C++ definition: {0}")]
    Unparseable(#[from] DefinitionError),

    #[error("C++ reference target {0:?} does not name anything")]
    Unnamed(String),
}

/// A resolved reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRef {
    /// The fullname that matched
    pub fullname: String,
    pub kind: ObjectKind,
    pub docname: String,
    pub anchor: String,
}

impl CppDomain {
    /// Resolve `target` for `role`, written inside `parent`
    ///
    /// Tries the bare name, then the name inside `parent`, then the name inside
    /// the owner of `parent`. A candidate only matches if its kind is allowed
    /// for the role. `Ok(None)` means nothing matched.
    pub fn resolve_xref(
        &self,
        role: RefRole,
        target: &str,
        parent: Option<&DefExpr>,
    ) -> Result<Option<ResolvedRef>, ResolveError> {
        let name = match parse_type(target) {
            Ok(expr) => match expr.name() {
                Some(name) => name.clone(),
                None => {
                    tracing::warn!(xref = target, "C++ reference target has no name");
                    return Err(ResolveError::Unnamed(target.to_string()));
                }
            },
            Err(err) => {
                tracing::warn!(xref = target, "unparseable C++ definition: {err}");
                return Err(ResolveError::Unparseable(err));
            }
        };

        let mut candidates = vec![name.clone()];
        if let Some(parent) = parent.and_then(DefExpr::name) {
            candidates.push(name.prefix(parent));
            if let (Some(owner), _) = parent.split_owner() {
                candidates.push(name.prefix(&owner));
            }
        }

        for candidate in &candidates {
            if let Some(found) = self.lookup(role, candidate) {
                tracing::debug!(xref = target, role = %role, fullname = %found.fullname, "resolved C++ reference");
                return Ok(Some(found));
            }
        }

        if self.config().warn_unresolved {
            tracing::warn!(xref = target, role = %role, "unresolved C++ reference");
        } else {
            tracing::debug!(xref = target, role = %role, "unresolved C++ reference");
        }
        Ok(None)
    }

    fn lookup(&self, role: RefRole, candidate: &DefExpr) -> Option<ResolvedRef> {
        let fullname = candidate.to_string();
        let entry = self.get(&fullname)?;
        if !role.allows(entry.kind) {
            return None;
        }
        Some(ResolvedRef {
            kind: entry.kind,
            docname: entry.docname.clone(),
            anchor: entry.anchor.clone(),
            fullname,
        })
    }
}

/// Title and target of a reference after role processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedLink {
    pub title: String,
    pub target: String,
}

/// Title/target normalization for one reference role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XRefRole {
    pub role: RefRole,
    /// Strip `()` from targets and normalize title parentheses
    pub fix_parens: bool,
    /// Append `()` to implicit titles (only with `fix_parens`)
    pub add_function_parentheses: bool,
}

impl XRefRole {
    /// Role with the domain's defaults: only `func` fixes parentheses
    #[must_use]
    pub fn new(role: RefRole) -> Self {
        Self {
            role,
            fix_parens: role == RefRole::Func,
            add_function_parentheses: false,
        }
    }

    /// Role configured from `config`
    #[must_use]
    pub fn with_config(role: RefRole, config: &DomainConfig) -> Self {
        Self {
            add_function_parentheses: config.add_function_parentheses,
            ..Self::new(role)
        }
    }

    /// Normalize a reference written as `title <target>` (or just `target`)
    ///
    /// Without an explicit title, a leading `~` on the target only affects the
    /// title, which is then cut down to the part after the last `::`.
    #[must_use]
    pub fn process_link(&self, title: &str, target: &str, has_explicit_title: bool) -> ProcessedLink {
        let mut title = title.to_string();
        let mut target = target.to_string();

        if self.fix_parens {
            if !has_explicit_title {
                if let Some(stripped) = title.strip_suffix("()") {
                    title = stripped.to_string();
                }
                if self.add_function_parentheses {
                    title.push_str("()");
                }
            }
            if let Some(stripped) = target.strip_suffix("()") {
                target = stripped.to_string();
            }
        }

        if !has_explicit_title {
            target = target.trim_start_matches('~').to_string();
            if let Some(rest) = title.strip_prefix('~') {
                title = match rest.rfind("::") {
                    Some(idx) => rest[idx + 2..].to_string(),
                    None => rest.to_string(),
                };
            }
        }

        ProcessedLink { title, target }
    }
}
