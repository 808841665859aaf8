//! Definition expression tree for C++ declarations
//!
//! A parsed declaration is a [`Declaration`] whose names and types are
//! [`DefExpr`] trees. Every node supports the same small set of operations:
//!
//! - `Display` renders the canonical text form (`std::vector<int> const&`)
//! - `identifier()` builds a compact, link-safe key (see [`ident`](self::ident))
//! - `name()` returns the nameable sub-node, if any
//! - `split_owner()` splits `a::b::c` into `a::b` and `c`
//! - `prefix(scope)` returns `scope::self`, merging paths instead of nesting them
//!
//! Nodes are plain values: cloning deep-copies and equality is structural. They
//! deliberately do not implement `Hash`.

mod ident;
mod pretty;

pub use ident::shortword;

/// A type or name expression inside a declaration
#[derive(Debug, Clone, PartialEq)]
pub enum DefExpr {
    /// A bare identifier (`foo`, `~Foo`, `operator==`, `operator new[]`)
    Name(String),

    /// Components joined by `::` (never empty)
    Path(Vec<DefExpr>),

    /// A name or path followed by template arguments (`std::vector<int>`)
    Template {
        /// The templated name
        typename: Box<DefExpr>,
        /// Type arguments in declaration order
        args: Vec<DefExpr>,
    },

    /// Keyword modifiers in front of a type (`unsigned int`, `volatile Foo`)
    Modifier {
        /// The modified type
        inner: Box<DefExpr>,
        /// Modifier words in source order
        modifiers: Vec<String>,
    },

    /// `T*`
    Pointer(Box<DefExpr>),

    /// `T&`
    Reference(Box<DefExpr>),

    /// `T[n]`
    Array {
        /// Element type
        inner: Box<DefExpr>,
        /// Text between the brackets, if any
        size_hint: Option<String>,
    },

    /// `const T` or `T const`
    Const {
        /// The qualified type
        inner: Box<DefExpr>,
        /// Whether `const` was written in front of the type
        prefix: bool,
    },

    /// A conversion operator (`operator bool`)
    CastOperator(Box<DefExpr>),
}

impl DefExpr {
    /// Create a bare name
    #[must_use]
    pub fn name_of(name: impl Into<String>) -> Self {
        DefExpr::Name(name.into())
    }

    /// Create a `::` path from name components
    #[must_use]
    pub fn path_of<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DefExpr::Path(components.into_iter().map(DefExpr::name_of).collect())
    }

    /// Create a template instantiation
    #[must_use]
    pub fn template(typename: DefExpr, args: Vec<DefExpr>) -> Self {
        DefExpr::Template {
            typename: Box::new(typename),
            args,
        }
    }

    /// Wrap in a modifier list
    #[must_use]
    pub fn modified(inner: DefExpr, modifiers: Vec<String>) -> Self {
        DefExpr::Modifier {
            inner: Box::new(inner),
            modifiers,
        }
    }

    /// Wrap in a pointer
    #[must_use]
    pub fn pointer(inner: DefExpr) -> Self {
        DefExpr::Pointer(Box::new(inner))
    }

    /// Wrap in a reference
    #[must_use]
    pub fn reference(inner: DefExpr) -> Self {
        DefExpr::Reference(Box::new(inner))
    }

    /// Wrap in an array suffix
    #[must_use]
    pub fn array(inner: DefExpr, size_hint: Option<String>) -> Self {
        DefExpr::Array {
            inner: Box::new(inner),
            size_hint,
        }
    }

    /// Wrap in a const qualifier
    #[must_use]
    pub fn constant(inner: DefExpr, prefix: bool) -> Self {
        DefExpr::Const {
            inner: Box::new(inner),
            prefix,
        }
    }

    /// Returns true for nodes that are names themselves (name, path, template, cast operator)
    #[must_use]
    pub const fn is_primary(&self) -> bool {
        matches!(
            self,
            DefExpr::Name(_) | DefExpr::Path(_) | DefExpr::Template { .. } | DefExpr::CastOperator(_)
        )
    }

    /// The wrapped type of a pointer, reference, array, const or modifier node
    #[must_use]
    pub fn inner(&self) -> Option<&DefExpr> {
        match self {
            DefExpr::Modifier { inner, .. }
            | DefExpr::Pointer(inner)
            | DefExpr::Reference(inner)
            | DefExpr::Array { inner, .. }
            | DefExpr::Const { inner, .. } => Some(inner),
            DefExpr::Name(_)
            | DefExpr::Path(_)
            | DefExpr::Template { .. }
            | DefExpr::CastOperator(_) => None,
        }
    }

    /// The nameable node of this expression
    ///
    /// Primary nodes are their own name; wrappers delegate to the type they wrap.
    #[must_use]
    pub fn name(&self) -> Option<&DefExpr> {
        match self.inner() {
            Some(inner) => inner.name(),
            None => Some(self),
        }
    }

    /// Split a qualified name into its owner and its last component
    ///
    /// `a::b::c` becomes `(Some(a::b), c)`; a template keeps its arguments on the
    /// leaf. Anything that cannot be split is returned whole with no owner.
    #[must_use]
    pub fn split_owner(&self) -> (Option<DefExpr>, DefExpr) {
        match self {
            DefExpr::Path(parts) if parts.len() > 1 => match parts.split_last() {
                Some((leaf, owner)) => (Some(DefExpr::Path(owner.to_vec())), leaf.clone()),
                None => (None, self.clone()),
            },
            DefExpr::Template { typename, args } => {
                let (owner, leaf) = typename.split_owner();
                (owner, DefExpr::template(leaf, args.clone()))
            }
            _ => (None, self.clone()),
        }
    }

    /// Return `scope::self`
    ///
    /// Paths are spliced together, a template gets the prefix on its typename,
    /// and wrappers prefix the type they wrap.
    #[must_use]
    pub fn prefix(&self, scope: &DefExpr) -> DefExpr {
        match self {
            DefExpr::Path(parts) => {
                let mut path = scope.path_components();
                path.extend(parts.iter().cloned());
                DefExpr::Path(path)
            }
            DefExpr::Name(_) | DefExpr::CastOperator(_) => {
                let mut path = scope.path_components();
                path.push(self.clone());
                DefExpr::Path(path)
            }
            DefExpr::Template { typename, args } => {
                DefExpr::template(typename.prefix(scope), args.clone())
            }
            DefExpr::Modifier { inner, modifiers } => {
                DefExpr::modified(inner.prefix(scope), modifiers.clone())
            }
            DefExpr::Pointer(inner) => DefExpr::pointer(inner.prefix(scope)),
            DefExpr::Reference(inner) => DefExpr::reference(inner.prefix(scope)),
            DefExpr::Array { inner, size_hint } => {
                DefExpr::array(inner.prefix(scope), size_hint.clone())
            }
            DefExpr::Const { inner, prefix } => DefExpr::constant(inner.prefix(scope), *prefix),
        }
    }

    fn path_components(&self) -> Vec<DefExpr> {
        match self {
            DefExpr::Path(parts) => parts.clone(),
            other => vec![other.clone()],
        }
    }
}

/// A function parameter
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Argument {
    /// Parameter type
    pub ty: Option<DefExpr>,
    /// Parameter name
    pub name: Option<DefExpr>,
    /// Default value text, verbatim
    pub default: Option<String>,
}

impl Argument {
    /// Create a new argument
    #[must_use]
    pub fn new(ty: Option<DefExpr>, name: Option<DefExpr>, default: Option<String>) -> Self {
        Self { ty, name, default }
    }

    /// The nameable node of the parameter name
    #[must_use]
    pub fn name(&self) -> Option<&DefExpr> {
        self.name.as_ref().and_then(DefExpr::name)
    }
}

/// Access level of a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    /// Keyword for this visibility
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }

    /// Parse a visibility keyword
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "public" => Some(Visibility::Public),
            "protected" => Some(Visibility::Protected),
            "private" => Some(Visibility::Private),
            _ => None,
        }
    }
}

/// A parsed declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Declared name (possibly qualified)
    pub name: DefExpr,
    /// Access level
    pub visibility: Visibility,
    /// Whether `static` was given
    pub is_static: bool,
    /// What is being declared
    pub kind: DeclKind,
}

/// The four kinds of declaration
#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    /// A type alias; `typename` is `None` for a bare type name
    Type { typename: Option<DefExpr> },

    /// A data member or variable
    Member {
        typename: DefExpr,
        /// Initializer text after `=`
        value: Option<String>,
    },

    /// A function, method, constructor or operator
    Function(FunctionDecl),

    /// A class or struct
    Class,
}

/// Function-specific parts of a declaration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionDecl {
    pub explicit: bool,
    pub is_virtual: bool,
    /// `None` for constructors, destructors and cast operators
    pub return_type: Option<DefExpr>,
    pub params: Vec<Argument>,
    pub is_const: bool,
    pub pure_virtual: bool,
}

impl Declaration {
    /// Create a declaration with public visibility
    #[must_use]
    pub fn new(name: DefExpr, kind: DeclKind) -> Self {
        Self {
            name,
            visibility: Visibility::Public,
            is_static: false,
            kind,
        }
    }

    /// The nameable node of the declared name
    #[must_use]
    pub fn name(&self) -> Option<&DefExpr> {
        self.name.name()
    }

    /// Function details, if this is a function declaration
    #[must_use]
    pub fn as_function(&self) -> Option<&FunctionDecl> {
        match &self.kind {
            DeclKind::Function(func) => Some(func),
            _ => None,
        }
    }

    /// Leading keywords shown before the declaration (`private static`)
    #[must_use]
    pub fn modifiers(&self) -> Vec<&'static str> {
        let mut words = Vec::new();
        if self.visibility != Visibility::Public {
            words.push(self.visibility.as_str());
        }
        if self.is_static {
            words.push("static");
        }
        words
    }

    /// Copy of this declaration with its name moved into `scope`
    #[must_use]
    pub fn with_scope(&self, scope: &DefExpr) -> Declaration {
        let mut scoped = self.clone();
        scoped.name = self.name.prefix(scope);
        scoped
    }
}
