//! Identifier building
//!
//! Identifiers are deterministic, syntax-free keys derived from the structure
//! of a declaration. They are used as document anchors and must survive in a
//! URL fragment, so well-known builtins and operators are abbreviated through
//! a fixed table and everything else is joined with `-`, `.`, `:` and `__`.
//!
//! Two distinct declarations may still end up with the same identifier; the
//! registry decides what happens then.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::{Argument, DeclKind, Declaration, DefExpr};

const SHORTWORDS: &[(&str, &str)] = &[
    ("char", "c"),
    ("signed char", "c"),
    ("unsigned char", "C"),
    ("int", "i"),
    ("signed int", "i"),
    ("unsigned int", "U"),
    ("long", "l"),
    ("signed long", "l"),
    ("unsigned long", "L"),
    ("bool", "b"),
    ("size_t", "s"),
    ("std::string", "ss"),
    ("std::ostream", "os"),
    ("std::istream", "is"),
    ("std::iostream", "ios"),
    ("std::vector", "v"),
    ("std::map", "m"),
    ("operator[]", "subscript-operator"),
    ("operator()", "call-operator"),
    ("operator!", "not-operator"),
    ("operator<", "lt-operator"),
    ("operator<=", "lte-operator"),
    ("operator>", "gt-operator"),
    ("operator>=", "gte-operator"),
    ("operator=", "assign-operator"),
    ("operator/", "div-operator"),
    ("operator*", "mul-operator"),
    ("operator%", "mod-operator"),
    ("operator+", "add-operator"),
    ("operator-", "sub-operator"),
    ("operator|", "or-operator"),
    ("operator&", "and-operator"),
    ("operator^", "xor-operator"),
    ("operator&&", "sand-operator"),
    ("operator||", "sor-operator"),
    ("operator==", "eq-operator"),
    ("operator!=", "neq-operator"),
    ("operator<<", "lshift-operator"),
    ("operator>>", "rshift-operator"),
    ("operator-=", "sub-assign-operator"),
    ("operator+=", "add-assign-operator"),
    ("operator*=", "mul-assign-operator"),
    ("operator/=", "div-assign-operator"),
    ("operator%=", "mod-assign-operator"),
    ("operator&=", "and-assign-operator"),
    ("operator|=", "or-assign-operator"),
    ("operator<<=", "lshift-assign-operator"),
    ("operator>>=", "rshift-assign-operator"),
    ("operator^=", "xor-assign-operator"),
    ("operator,", "comma-operator"),
    ("operator->", "pointer-operator"),
    ("operator->*", "pointer-by-pointer-operator"),
    ("operator~", "inv-operator"),
    ("operator++", "inc-operator"),
    ("operator--", "dec-operator"),
    ("operator new", "new-operator"),
    ("operator new[]", "new-array-operator"),
    ("operator delete", "delete-operator"),
    ("operator delete[]", "delete-array-operator"),
];

fn shortwords() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| SHORTWORDS.iter().copied().collect())
}

/// Abbreviation for a well-known builtin type or operator name
#[must_use]
pub fn shortword(word: &str) -> Option<&'static str> {
    shortwords().get(word).copied()
}

fn abbreviate(word: String) -> String {
    match shortword(&word) {
        Some(short) => short.to_string(),
        None => word,
    }
}

fn join_ids<'a>(exprs: impl IntoIterator<Item = &'a DefExpr>, sep: &str) -> String {
    exprs
        .into_iter()
        .map(DefExpr::identifier)
        .collect::<Vec<_>>()
        .join(sep)
}

impl DefExpr {
    /// Compact, link-safe identifier for this expression
    #[must_use]
    pub fn identifier(&self) -> String {
        match self {
            DefExpr::Name(name) => match shortword(name) {
                Some(short) => short.to_string(),
                None => name.replace(' ', "-"),
            },
            DefExpr::Path(parts) => abbreviate(join_ids(parts, "::")),
            DefExpr::Template { typename, args } => {
                format!("{}:{}:", typename.identifier(), join_ids(args, "."))
            }
            DefExpr::Modifier { inner, modifiers } => {
                let mut pieces: Vec<String> = modifiers
                    .iter()
                    .map(|word| abbreviate(word.clone()))
                    .collect();
                pieces.push(inner.identifier());
                pieces.join("-")
            }
            DefExpr::Pointer(inner) => inner.identifier() + "P",
            DefExpr::Reference(inner) => inner.identifier() + "R",
            DefExpr::Array { inner, .. } => inner.identifier() + "A",
            DefExpr::Const { inner, .. } => inner.identifier() + "C",
            DefExpr::CastOperator(target) => format!("castto-{}-operator", target.identifier()),
        }
    }
}

impl Argument {
    /// Identifier of the parameter type, `X` when untyped
    #[must_use]
    pub fn identifier(&self) -> String {
        match &self.ty {
            Some(ty) => ty.identifier(),
            None => "X".to_string(),
        }
    }
}

impl Declaration {
    /// Identifier used as anchor and registry key
    #[must_use]
    pub fn identifier(&self) -> String {
        let name = self.name.identifier();
        match &self.kind {
            DeclKind::Type { typename: None } | DeclKind::Class => name,
            DeclKind::Type {
                typename: Some(typename),
            }
            | DeclKind::Member { typename, .. } => format!("{}__{}", name, typename.identifier()),
            DeclKind::Function(func) => {
                let mut id = name;
                if !func.params.is_empty() {
                    id.push_str("__");
                    let params: Vec<String> = func.params.iter().map(Argument::identifier).collect();
                    id.push_str(&params.join("."));
                }
                if func.is_const {
                    id.push('C');
                }
                id
            }
        }
    }
}
