//! Rendered signature descriptions
//!
//! A [`SignatureDesc`] is what a renderer receives for one described object:
//! annotation keywords, the leading type, owner and name, parameters and
//! trailing markers. Every type inside it is a [`TypeRef`], a pending
//! `type` cross-reference that remembers the scope it was written in.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::ast::{Argument, DeclKind, Declaration, DefExpr};

/// A type mention that can later be resolved with the `type` role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeRef {
    /// Canonical text of the type
    pub text: String,
    /// Parent scope active where the type was written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl TypeRef {
    fn new(ty: &DefExpr, parent: Option<&DefExpr>) -> Self {
        Self {
            text: ty.to_string(),
            parent: parent.map(ToString::to_string),
        }
    }
}

/// The displayed name of an object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum SigName {
    /// An ordinary name (`draw`, `operator==`, `~Widget`)
    Plain(String),
    /// `operator <type>`; the target type is a reference in its own right
    CastOperator(TypeRef),
}

/// One rendered function parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamDesc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Renderer-facing description of a declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureDesc {
    /// Leading keywords (`private`, `static`, `explicit`, `class`, `type`)
    pub annotations: Vec<String>,
    /// Return type, member type or alias target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leading_type: Option<TypeRef>,
    /// Owner part of a qualified name, without the trailing `::`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub name: SigName,
    /// Parameter list; `None` for everything but functions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<ParamDesc>>,
    /// Member initializer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Trailing markers (`const`, `= 0`)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suffixes: Vec<String>,
}

impl SignatureDesc {
    /// Describe `decl` as written, with types remembering `parent`
    ///
    /// The declaration should not be prefixed with `parent` yet; the owner shown
    /// is the one written in the signature itself.
    #[must_use]
    pub fn describe(decl: &Declaration, parent: Option<&DefExpr>) -> Self {
        let mut annotations: Vec<String> =
            decl.modifiers().into_iter().map(String::from).collect();
        let mut leading_type = None;
        let mut params = None;
        let mut value: Option<String> = None;
        let mut suffixes = Vec::new();

        match &decl.kind {
            DeclKind::Class => annotations.push("class".to_string()),
            DeclKind::Type { typename } => {
                annotations.push("type".to_string());
                leading_type = typename.as_ref().map(|ty| TypeRef::new(ty, parent));
            }
            DeclKind::Member {
                typename,
                value: initializer,
            } => {
                leading_type = Some(TypeRef::new(typename, parent));
                value.clone_from(initializer);
            }
            DeclKind::Function(func) => {
                if func.is_virtual {
                    annotations.push("virtual".to_string());
                }
                if func.explicit {
                    annotations.push("explicit".to_string());
                }
                leading_type = func.return_type.as_ref().map(|ty| TypeRef::new(ty, parent));
                params = Some(
                    func.params
                        .iter()
                        .map(|arg| param_desc(arg, parent))
                        .collect(),
                );
                if func.is_const {
                    suffixes.push("const".to_string());
                }
                if func.pure_virtual {
                    suffixes.push("= 0".to_string());
                }
            }
        }

        let (owner, leaf) = decl.name.split_owner();
        let name = match leaf {
            DefExpr::CastOperator(target) => SigName::CastOperator(TypeRef::new(&target, parent)),
            other => SigName::Plain(other.to_string()),
        };

        Self {
            annotations,
            leading_type,
            owner: owner.map(|owner| owner.to_string()),
            name,
            params,
            value,
            suffixes,
        }
    }
}

fn param_desc(arg: &Argument, parent: Option<&DefExpr>) -> ParamDesc {
    ParamDesc {
        ty: arg.ty.as_ref().map(|ty| TypeRef::new(ty, parent)),
        name: arg.name.as_ref().map(ToString::to_string),
        default: arg.default.clone(),
    }
}

impl Display for SigName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SigName::Plain(name) => write!(f, "{name}"),
            SigName::CastOperator(target) => write!(f, "operator {}", target.text),
        }
    }
}

impl Display for ParamDesc {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (&self.ty, &self.name) {
            (Some(ty), Some(name)) => write!(f, "{} {name}", ty.text)?,
            (Some(ty), None) => write!(f, "{}", ty.text)?,
            (None, Some(name)) => write!(f, "{name}")?,
            (None, None) => {}
        }
        if let Some(default) = &self.default {
            write!(f, "={default}")?;
        }
        Ok(())
    }
}

impl Display for SignatureDesc {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for annotation in &self.annotations {
            write!(f, "{annotation} ")?;
        }
        if let Some(ty) = &self.leading_type {
            write!(f, "{} ", ty.text)?;
        }
        if let Some(owner) = &self.owner {
            write!(f, "{owner}::")?;
        }
        write!(f, "{}", self.name)?;
        if let Some(params) = &self.params {
            write!(f, "(")?;
            for (i, param) in params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{param}")?;
            }
            write!(f, ")")?;
        }
        if let Some(value) = &self.value {
            write!(f, " = {value}")?;
        }
        for suffix in &self.suffixes {
            write!(f, " {suffix}")?;
        }
        Ok(())
    }
}
