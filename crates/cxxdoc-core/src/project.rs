//! Project manifests (`cxxdoc-project.toml`) and the two-pass build
//!
//! A project lists documents; each document describes C++ objects (possibly
//! nested) and references to resolve. [`Project::build`] registers every
//! document in order and only then resolves the references, so a reference may
//! point at an object described in a later document.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    CppDomain, DescribedObject, DocContext, ObjectKind, RefRole, ResolvedRef, SignatureDesc,
    XRefRole,
};
use crate::parser::parse_type;

/// Pseudo-kind that changes the current scope instead of describing an object
pub const NAMESPACE_KIND: &str = "namespace";

/// Errors that can occur when loading a project manifest.
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("failed to read project file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse project: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("document '{document}': unknown object kind '{kind}'")]
    UnknownKind { document: String, kind: String },

    #[error("document '{document}': unknown reference role '{role}'")]
    UnknownRole { document: String, role: String },

    #[error("document '{document}': a namespace cannot have children")]
    NamespaceChildren { document: String },

    #[error("duplicate document name '{0}'")]
    DuplicateDocument(String),
}

/// The complete project manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    /// Documents, in build order.
    #[serde(default, rename = "document")]
    pub documents: Vec<DocumentSpec>,
}

/// One document of the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentSpec {
    pub name: String,

    /// Objects described at the top level of the document.
    #[serde(default, rename = "object")]
    pub objects: Vec<ObjectSpec>,

    /// References written in the document.
    #[serde(default, rename = "reference")]
    pub references: Vec<ReferenceSpec>,
}

/// A described object, or a `namespace` directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectSpec {
    /// `class`, `function`, `member`, `type` or `namespace`.
    pub kind: String,

    /// Declaration text (the scope, for a namespace).
    pub signature: String,

    /// Objects described inside this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ObjectSpec>,
}

/// A cross-reference to resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceSpec {
    /// `class`, `func`, `member` or `type`.
    pub role: String,

    pub target: String,

    /// Explicit link title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Parent scope the reference is written in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// One described object in a build report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectReport {
    pub docname: String,
    pub kind: ObjectKind,
    pub fullname: String,
    pub anchor: String,
    pub registered: bool,
    pub index_text: String,
    pub signature: SignatureDesc,
}

impl ObjectReport {
    fn new(docname: &str, described: &DescribedObject) -> Self {
        Self {
            docname: docname.to_string(),
            kind: described.kind,
            fullname: described.fullname.clone(),
            anchor: described.anchor.clone(),
            registered: described.registered,
            index_text: described.index_text.clone(),
            signature: described.signature.clone(),
        }
    }
}

/// How one reference turned out
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Resolution {
    Resolved(ResolvedRef),
    Unresolved,
    Error { message: String },
}

/// One reference in a build report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceReport {
    pub docname: String,
    pub role: RefRole,
    pub title: String,
    pub target: String,
    pub resolution: Resolution,
}

/// Everything a build produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildReport {
    pub objects: Vec<ObjectReport>,
    pub references: Vec<ReferenceReport>,
    /// Signatures and scopes that could not be parsed
    pub warnings: Vec<String>,
}

impl BuildReport {
    /// References that resolved
    pub fn resolved(&self) -> impl Iterator<Item = &ReferenceReport> {
        self.references
            .iter()
            .filter(|r| matches!(r.resolution, Resolution::Resolved(_)))
    }

    /// References that did not resolve or could not be parsed
    pub fn unresolved(&self) -> impl Iterator<Item = &ReferenceReport> {
        self.references
            .iter()
            .filter(|r| !matches!(r.resolution, Resolution::Resolved(_)))
    }
}

impl Project {
    /// Parse a project from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ProjectError> {
        let project: Project = toml::from_str(content)?;
        project.validate()?;
        Ok(project)
    }

    /// Load a project file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), ProjectError> {
        let mut seen = HashSet::new();
        for doc in &self.documents {
            if !seen.insert(doc.name.as_str()) {
                return Err(ProjectError::DuplicateDocument(doc.name.clone()));
            }
            validate_objects(&doc.name, &doc.objects)?;
            for reference in &doc.references {
                if RefRole::from_name(&reference.role).is_none() {
                    return Err(ProjectError::UnknownRole {
                        document: doc.name.clone(),
                        role: reference.role.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Register every document, then resolve every reference
    ///
    /// Each document is cleared from `domain` before it is registered again.
    pub fn build(&self, domain: &mut CppDomain) -> BuildReport {
        let mut report = BuildReport::default();

        for doc in &self.documents {
            domain.clear_doc(&doc.name);
            let ctx = DocContext::new(doc.name.clone());
            describe_all(domain, &ctx, &doc.objects, &mut report);
        }

        for doc in &self.documents {
            for reference in &doc.references {
                let Some(role) = RefRole::from_name(&reference.role) else {
                    report
                        .warnings
                        .push(format!("{}: unknown reference role '{}'", doc.name, reference.role));
                    continue;
                };
                let outcome = resolve_reference(domain, &doc.name, role, reference, &mut report.warnings);
                report.references.push(outcome);
            }
        }

        tracing::debug!(
            objects = report.objects.len(),
            references = report.references.len(),
            warnings = report.warnings.len(),
            "project build finished"
        );
        report
    }
}

fn validate_objects(document: &str, objects: &[ObjectSpec]) -> Result<(), ProjectError> {
    for object in objects {
        if object.kind == NAMESPACE_KIND {
            if !object.children.is_empty() {
                return Err(ProjectError::NamespaceChildren {
                    document: document.to_string(),
                });
            }
        } else if ObjectKind::from_name(&object.kind).is_none() {
            return Err(ProjectError::UnknownKind {
                document: document.to_string(),
                kind: object.kind.clone(),
            });
        }
        validate_objects(document, &object.children)?;
    }
    Ok(())
}

fn describe_all(domain: &mut CppDomain, ctx: &DocContext, objects: &[ObjectSpec], report: &mut BuildReport) {
    // a namespace directive applies to the siblings that follow it
    let mut ctx = ctx.clone();
    for object in objects {
        if object.kind == NAMESPACE_KIND {
            match ctx.with_namespace(&object.signature) {
                Ok(next) => ctx = next,
                Err(err) => report.warnings.push(format!("{}: {err}", ctx.docname)),
            }
            continue;
        }
        let Some(kind) = ObjectKind::from_name(&object.kind) else {
            report
                .warnings
                .push(format!("{}: unknown object kind '{}'", ctx.docname, object.kind));
            continue;
        };
        match domain.describe(&ctx, kind, &object.signature) {
            Ok(described) => {
                report.objects.push(ObjectReport::new(&ctx.docname, &described));
                describe_all(domain, &ctx.nested(&described), &object.children, report);
            }
            Err(err) => report.warnings.push(format!("{}: {err}", ctx.docname)),
        }
    }
}

fn resolve_reference(
    domain: &CppDomain,
    docname: &str,
    role: RefRole,
    reference: &ReferenceSpec,
    warnings: &mut Vec<String>,
) -> ReferenceReport {
    let xref = XRefRole::with_config(role, domain.config());
    let link = match &reference.title {
        Some(title) => xref.process_link(title, &reference.target, true),
        None => xref.process_link(&reference.target, &reference.target, false),
    };

    let resolution = match reference.scope.as_deref().map(parse_type).transpose() {
        Err(err) => {
            warnings.push(format!("{docname}: {err}"));
            Resolution::Error {
                message: err.to_string(),
            }
        }
        Ok(scope) => match domain.resolve_xref(role, &link.target, scope.as_ref()) {
            Ok(Some(found)) => Resolution::Resolved(found),
            Ok(None) => Resolution::Unresolved,
            Err(err) => {
                warnings.push(format!("{docname}: {err}"));
                Resolution::Error {
                    message: err.to_string(),
                }
            }
        },
    };

    ReferenceReport {
        docname: docname.to_string(),
        role,
        title: link.title,
        target: link.target,
        resolution,
    }
}
