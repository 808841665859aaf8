//! C++ documentation domain
//!
//! Ties the definition parser to a symbol registry:
//!
//! - [`CppDomain::describe`] parses one signature, renders it and registers
//!   the object under its fully qualified name
//! - [`CppDomain::resolve_xref`] looks a reference target up again, falling
//!   back through the enclosing scopes
//! - [`DocContext`] carries the document name and the active parent scope
//!   between those calls

mod registry;
mod resolve;
mod signature;

pub use registry::{Collision, DocumentAnchors, ObjectEntry, ObjectRecord, ObjectRegistry};
pub use resolve::{ProcessedLink, ResolveError, ResolvedRef, XRefRole};
pub use signature::{ParamDesc, SigName, SignatureDesc, TypeRef};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ast::{Declaration, DefExpr};
use crate::config::DomainConfig;
use crate::parser::{parse_type, DefResult, DefinitionError, DefinitionParser};

/// The kinds of object the domain can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Class,
    Function,
    Member,
    Type,
}

impl ObjectKind {
    /// All kinds, in declaration order
    pub const ALL: [ObjectKind; 4] = [
        ObjectKind::Class,
        ObjectKind::Function,
        ObjectKind::Member,
        ObjectKind::Type,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Class => "class",
            ObjectKind::Function => "function",
            ObjectKind::Member => "member",
            ObjectKind::Type => "type",
        }
    }

    /// Parse a kind name (`class`, `function`, `member`, `type`)
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// The reference role that links to this kind
    #[must_use]
    pub const fn role(&self) -> RefRole {
        match self {
            ObjectKind::Class => RefRole::Class,
            ObjectKind::Function => RefRole::Func,
            ObjectKind::Member => RefRole::Member,
            ObjectKind::Type => RefRole::Type,
        }
    }

    /// Index entry for an object of this kind
    #[must_use]
    pub fn index_text(&self, fullname: &str) -> String {
        format!("{fullname} (C++ {})", self.as_str())
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cross-reference roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefRole {
    Class,
    Func,
    Member,
    Type,
}

impl RefRole {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RefRole::Class => "class",
            RefRole::Func => "func",
            RefRole::Member => "member",
            RefRole::Type => "type",
        }
    }

    /// Parse a role name (`class`, `func`, `member`, `type`)
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "class" => Some(RefRole::Class),
            "func" => Some(RefRole::Func),
            "member" => Some(RefRole::Member),
            "type" => Some(RefRole::Type),
            _ => None,
        }
    }

    /// Whether a reference with this role may point at `kind`
    #[must_use]
    pub fn allows(&self, kind: ObjectKind) -> bool {
        kind.role() == *self
    }
}

impl fmt::Display for RefRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse `text` as a declaration of `kind`, rejecting trailing input
pub fn parse_declaration(kind: ObjectKind, text: &str) -> DefResult<Declaration> {
    let mut parser = DefinitionParser::new(text);
    let decl = match kind {
        ObjectKind::Class => parser.parse_class()?,
        ObjectKind::Function => parser.parse_function()?,
        ObjectKind::Member => parser.parse_member_object()?,
        ObjectKind::Type => parser.parse_type_object()?,
    };
    parser.assert_end()?;
    Ok(decl)
}

/// Where a signature is being described: document and enclosing scope
#[derive(Debug, Clone, PartialEq)]
pub struct DocContext {
    pub docname: String,
    /// Scope that new declarations are prefixed with
    pub parent: Option<DefExpr>,
}

impl DocContext {
    /// Top-level context of a document
    #[must_use]
    pub fn new(docname: impl Into<String>) -> Self {
        Self {
            docname: docname.into(),
            parent: None,
        }
    }

    /// Same document, explicit parent scope
    #[must_use]
    pub fn with_parent(&self, parent: Option<DefExpr>) -> Self {
        Self {
            docname: self.docname.clone(),
            parent,
        }
    }

    /// Context for the content of `described` (its members, methods, ...)
    #[must_use]
    pub fn nested(&self, described: &DescribedObject) -> Self {
        let parent = described
            .declaration
            .name()
            .cloned()
            .or_else(|| self.parent.clone());
        self.with_parent(parent)
    }

    /// Apply a namespace directive
    ///
    /// `NULL`, `0` and `nullptr` return to the global scope; anything else must
    /// be a type expression and becomes the new parent.
    pub fn with_namespace(&self, namespace: &str) -> DefResult<Self> {
        let namespace = namespace.trim();
        if matches!(namespace, "NULL" | "0" | "nullptr") {
            return Ok(self.with_parent(None));
        }
        let scope = parse_type(namespace)?;
        Ok(self.with_parent(Some(scope)))
    }
}

/// Result of describing one signature
#[derive(Debug, Clone, PartialEq)]
pub struct DescribedObject {
    pub kind: ObjectKind,
    /// The declaration with the parent scope applied
    pub declaration: Declaration,
    /// Rendering of the signature as written
    pub signature: SignatureDesc,
    /// Registry key
    pub fullname: String,
    /// Identifier used as the document anchor
    pub anchor: String,
    /// False when the document already had this anchor and nothing was registered
    pub registered: bool,
    pub index_text: String,
}

/// The C++ domain: object registry, anchors and configuration
#[derive(Debug, Clone, Default)]
pub struct CppDomain {
    registry: ObjectRegistry,
    anchors: DocumentAnchors,
    config: DomainConfig,
}

impl CppDomain {
    /// Create a domain with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DomainConfig::default())
    }

    #[must_use]
    pub fn with_config(config: DomainConfig) -> Self {
        Self {
            registry: ObjectRegistry::new(config.collision_policy),
            anchors: DocumentAnchors::default(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &DomainConfig {
        &self.config
    }

    /// Parse, render and register one signature
    ///
    /// A malformed signature is logged and returned as an error; the caller
    /// skips it and carries on with the rest of the document.
    pub fn describe(
        &mut self,
        ctx: &DocContext,
        kind: ObjectKind,
        text: &str,
    ) -> Result<DescribedObject, DefinitionError> {
        let decl = match parse_declaration(kind, text) {
            Ok(decl) => decl,
            Err(err) => {
                tracing::warn!(doc = %ctx.docname, kind = %kind, "{err}");
                return Err(err);
            }
        };

        let signature = SignatureDesc::describe(&decl, ctx.parent.as_ref());
        let declaration = match &ctx.parent {
            Some(parent) => decl.with_scope(parent),
            None => decl,
        };
        let anchor = declaration.identifier();
        let fullname = declaration.name.to_string();

        let registered = self.anchors.claim(&ctx.docname, &anchor);
        if registered {
            let entry = ObjectEntry {
                docname: ctx.docname.clone(),
                kind,
                anchor: anchor.clone(),
            };
            self.registry.insert(fullname.clone(), entry);
            tracing::debug!(doc = %ctx.docname, %fullname, %anchor, "registered C++ {kind}");
        } else {
            tracing::debug!(doc = %ctx.docname, %fullname, %anchor, "anchor already present, not registered");
        }

        Ok(DescribedObject {
            kind,
            index_text: kind.index_text(&fullname),
            declaration,
            signature,
            fullname,
            anchor,
            registered,
        })
    }

    /// Forget every object and anchor of `docname`
    pub fn clear_doc(&mut self, docname: &str) {
        let removed = self.registry.clear_doc(docname);
        self.anchors.clear_doc(docname);
        tracing::debug!(doc = %docname, removed, "cleared C++ objects");
    }

    /// Registered objects, sorted by fullname
    pub fn objects(&self) -> impl Iterator<Item = ObjectRecord<'_>> {
        self.registry.iter()
    }

    /// Look up a fullname
    #[must_use]
    pub fn get(&self, fullname: &str) -> Option<&ObjectEntry> {
        self.registry.get(fullname)
    }

    /// Fullnames registered more than once (recorded with the `warn` policy)
    #[must_use]
    pub fn collisions(&self) -> &[Collision] {
        self.registry.collisions()
    }

    /// Number of registered objects
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollisionPolicy;

    #[test]
    fn kind_and_role_names() {
        for kind in ObjectKind::ALL {
            assert_eq!(ObjectKind::from_name(kind.as_str()), Some(kind));
            assert!(kind.role().allows(kind));
        }
        assert_eq!(ObjectKind::from_name("namespace"), None);
        assert_eq!(RefRole::from_name("func"), Some(RefRole::Func));
        assert_eq!(RefRole::from_name("function"), None);
        assert!(!RefRole::Class.allows(ObjectKind::Type));
        assert_eq!(ObjectKind::Member.index_text("A::x"), "A::x (C++ member)");
    }

    #[test]
    fn describe_registers_fullname() {
        let mut domain = CppDomain::new();
        let ctx = DocContext::new("api");
        let obj = domain
            .describe(&ctx, ObjectKind::Function, "void foo(int x = 0) const")
            .unwrap();
        assert_eq!(obj.fullname, "foo");
        assert_eq!(obj.anchor, "foo__iC");
        assert!(obj.registered);
        assert_eq!(obj.index_text, "foo (C++ function)");

        let entry = domain.get("foo").unwrap();
        assert_eq!(entry.docname, "api");
        assert_eq!(entry.kind, ObjectKind::Function);
        assert_eq!(entry.anchor, "foo__iC");
    }

    #[test]
    fn nested_declarations_get_parent_prefix() {
        let mut domain = CppDomain::new();
        let ctx = DocContext::new("api");
        let class = domain.describe(&ctx, ObjectKind::Class, "ns::Widget").unwrap();
        let inner = ctx.nested(&class);
        assert_eq!(inner.parent, Some(DefExpr::path_of(["ns", "Widget"])));

        let method = domain
            .describe(&inner, ObjectKind::Function, "void draw() const")
            .unwrap();
        assert_eq!(method.fullname, "ns::Widget::draw");
        assert_eq!(method.anchor, "ns::Widget::drawC");
        // the rendered signature shows the name as written
        assert_eq!(method.signature.to_string(), "void draw() const");

        let nested_class = domain.describe(&inner, ObjectKind::Class, "Impl").unwrap();
        let deeper = inner.nested(&nested_class);
        let member = domain.describe(&deeper, ObjectKind::Member, "int refs").unwrap();
        assert_eq!(member.fullname, "ns::Widget::Impl::refs");
    }

    #[test]
    fn malformed_signature_is_an_error_and_registers_nothing() {
        let mut domain = CppDomain::new();
        let err = domain
            .describe(&DocContext::new("api"), ObjectKind::Function, "void foo(int")
            .unwrap_err();
        assert_eq!(err.definition, "void foo(int");
        assert!(domain.is_empty());
    }

    #[test]
    fn trailing_input_is_rejected_for_every_kind() {
        assert!(parse_declaration(ObjectKind::Class, "Foo Bar").is_err());
        assert!(parse_declaration(ObjectKind::Function, "void f() extra").is_err());
        assert!(parse_declaration(ObjectKind::Type, "int a b").is_err());
        assert!(parse_declaration(ObjectKind::Member, "int x").is_ok());
    }

    #[test]
    fn duplicate_anchor_in_same_document_is_not_registered_again() {
        let mut domain = CppDomain::new();
        let ctx = DocContext::new("api");
        let first = domain.describe(&ctx, ObjectKind::Class, "Foo").unwrap();
        let second = domain.describe(&ctx, ObjectKind::Class, "Foo").unwrap();
        assert!(first.registered);
        assert!(!second.registered);
        assert_eq!(second.index_text, "Foo (C++ class)");
        assert_eq!(domain.len(), 1);
    }

    #[test]
    fn later_document_overwrites_fullname() {
        let mut domain = CppDomain::new();
        domain
            .describe(&DocContext::new("a"), ObjectKind::Function, "void f(int)")
            .unwrap();
        domain
            .describe(&DocContext::new("b"), ObjectKind::Function, "void f(char)")
            .unwrap();
        let entry = domain.get("f").unwrap();
        assert_eq!(entry.docname, "b");
        assert_eq!(entry.anchor, "f__c");
        assert!(domain.collisions().is_empty());
    }

    #[test]
    fn warn_policy_reports_overwrites() {
        let config = DomainConfig {
            collision_policy: CollisionPolicy::Warn,
            ..DomainConfig::default()
        };
        let mut domain = CppDomain::with_config(config);
        let ctx = DocContext::new("a");
        domain.describe(&ctx, ObjectKind::Function, "void f(int)").unwrap();
        domain.describe(&ctx, ObjectKind::Function, "void f(char)").unwrap();
        assert_eq!(domain.collisions().len(), 1);
        assert_eq!(domain.collisions()[0].previous.anchor, "f__i");
        assert_eq!(domain.get("f").unwrap().anchor, "f__c");
    }

    #[test]
    fn clear_doc_forgets_objects_and_anchors() {
        let mut domain = CppDomain::new();
        let a = DocContext::new("a");
        domain.describe(&a, ObjectKind::Class, "Foo").unwrap();
        domain
            .describe(&DocContext::new("b"), ObjectKind::Class, "Bar")
            .unwrap();

        domain.clear_doc("a");
        assert!(domain.get("Foo").is_none());
        assert!(domain.get("Bar").is_some());

        let again = domain.describe(&a, ObjectKind::Class, "Foo").unwrap();
        assert!(again.registered);
    }

    #[test]
    fn namespace_directive() {
        let ctx = DocContext::new("api").with_namespace("std::chrono").unwrap();
        assert_eq!(ctx.parent, Some(DefExpr::path_of(["std", "chrono"])));
        for reset in ["NULL", "0", " nullptr "] {
            assert_eq!(ctx.with_namespace(reset).unwrap().parent, None);
        }
        assert!(ctx.with_namespace("std::").is_err());
    }

    #[test]
    fn objects_are_sorted() {
        let mut domain = CppDomain::new();
        let ctx = DocContext::new("api");
        domain.describe(&ctx, ObjectKind::Type, "size_type").unwrap();
        domain.describe(&ctx, ObjectKind::Class, "Array").unwrap();
        let names: Vec<_> = domain.objects().map(|o| o.fullname).collect();
        assert_eq!(names, vec!["Array", "size_type"]);
    }
}
