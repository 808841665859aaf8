//! Canonical text form of definition expressions
//!
//! Implements Display for every node. The output re-parses to an equal tree.

use std::fmt::{self, Display, Formatter};

use super::{Argument, DeclKind, Declaration, DefExpr};

fn write_separated<T: Display>(f: &mut Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{sep}")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl Display for DefExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DefExpr::Name(name) => write!(f, "{name}"),
            DefExpr::Path(parts) => write_separated(f, parts, "::"),
            DefExpr::Template { typename, args } => {
                write!(f, "{typename}<")?;
                write_separated(f, args, ", ")?;
                write!(f, ">")
            }
            DefExpr::Modifier { inner, modifiers } => {
                for modifier in modifiers {
                    write!(f, "{modifier} ")?;
                }
                write!(f, "{inner}")
            }
            DefExpr::Pointer(inner) => write!(f, "{inner}*"),
            DefExpr::Reference(inner) => write!(f, "{inner}&"),
            DefExpr::Array { inner, size_hint } => {
                write!(f, "{inner}[{}]", size_hint.as_deref().unwrap_or(""))
            }
            DefExpr::Const { inner, prefix: true } => write!(f, "const {inner}"),
            DefExpr::Const { inner, prefix: false } => write!(f, "{inner} const"),
            DefExpr::CastOperator(target) => write!(f, "operator {target}"),
        }
    }
}

impl Display for Argument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (&self.ty, &self.name) {
            (Some(ty), Some(name)) => write!(f, "{ty} {name}")?,
            (Some(ty), None) => write!(f, "{ty}")?,
            (None, Some(name)) => write!(f, "{name}")?,
            (None, None) => {}
        }
        if let Some(default) = &self.default {
            write!(f, "={default}")?;
        }
        Ok(())
    }
}

impl Display for Declaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut words: Vec<String> = self.modifiers().into_iter().map(String::from).collect();

        match &self.kind {
            DeclKind::Class | DeclKind::Type { typename: None } => words.push(self.name.to_string()),
            DeclKind::Type {
                typename: Some(typename),
            } => {
                words.push(typename.to_string());
                words.push(self.name.to_string());
            }
            DeclKind::Member { typename, value } => {
                words.push(format!("{typename} {}", self.name));
                if let Some(value) = value {
                    words.push(format!("= {value}"));
                }
            }
            DeclKind::Function(func) => {
                if func.is_virtual {
                    words.push("virtual".to_string());
                }
                if func.explicit {
                    words.push("explicit".to_string());
                }
                if let Some(ret) = &func.return_type {
                    words.push(ret.to_string());
                }
                let params: Vec<String> = func.params.iter().map(ToString::to_string).collect();
                words.push(format!("{}({})", self.name, params.join(", ")));
                if func.is_const {
                    words.push("const".to_string());
                }
                if func.pure_virtual {
                    words.push("= 0".to_string());
                }
            }
        }

        write!(f, "{}", words.join(" "))
    }
}
