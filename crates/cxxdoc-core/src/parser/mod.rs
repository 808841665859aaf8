//! Definition parser for C++ declarations
//!
//! A hand-written recursive-descent parser over a single declaration string.
//! It backtracks with explicit cursor marks and reports malformed input as a
//! [`DefinitionError`] carrying the byte offset and the whole declaration.
//!
//! # Example
//!
//! ```
//! use cxxdoc_core::parser::DefinitionParser;
//!
//! let mut parser = DefinitionParser::new("void foo(int x = 0) const");
//! let decl = parser.parse_function().unwrap();
//! parser.assert_end().unwrap();
//! assert_eq!(decl.to_string(), "void foo(int x=0) const");
//! assert_eq!(decl.identifier(), "foo__iC");
//! ```

mod cursor;
mod error;

pub use error::{DefinitionError, DefinitionErrorKind};

use std::sync::OnceLock;

use regex::Regex;

use crate::ast::{Argument, DeclKind, Declaration, DefExpr, FunctionDecl, Visibility};
use crate::span::Span;
use cursor::Cursor;

/// Result type for definition parsing
pub type DefResult<T> = Result<T, DefinitionError>;

macro_rules! static_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("static pattern compiles"))
        }
    };
}

static_regex!(identifier_re, r"~?\b[a-zA-Z_][a-zA-Z0-9_]*\b");
static_regex!(
    string_re,
    r#"(?s)[LuU8]?('([^'\\]*(?:\\.[^'\\]*)*)'|"([^"\\]*(?:\\.[^"\\]*)*)")"#
);
static_regex!(visibility_re, r"\b(?:public|private|protected)\b");
static_regex!(array_re, r"\[\s*(.+?)?\s*\]");
// Longer tokens come first: alternation is leftmost-first, so `<<` must be
// tried before `<`.
static_regex!(
    operator_re,
    r"\[\s*\]|\(\s*\)|->\*?|\+\+|--|(?:<<|>>)=?|&&|\|\||[!<>=/*%+|&^-]=?|~|,"
);

/// Which words a builtin modifier may be followed by
#[derive(Debug, Clone, Copy)]
enum ModifierRule {
    /// May prefix any type
    Any,
    /// Only the listed builtin keywords may follow
    Builtin(&'static [&'static str]),
}

fn modifier_rule(word: &str) -> Option<ModifierRule> {
    match word {
        "volatile" | "register" | "mutable" | "const" | "typename" => Some(ModifierRule::Any),
        "unsigned" | "signed" => Some(ModifierRule::Builtin(&["char", "short", "int", "long"])),
        "short" => Some(ModifierRule::Builtin(&["int"])),
        "long" => Some(ModifierRule::Builtin(&["int", "long", "double"])),
        _ => None,
    }
}

fn builtin_followers(word: &str) -> &'static [&'static str] {
    match modifier_rule(word) {
        Some(ModifierRule::Builtin(following)) => following,
        _ => &[],
    }
}

/// Remove one `const` from a word list, reporting whether there was one
fn take_const(words: &mut Vec<String>) -> bool {
    match words.iter().position(|w| w == "const") {
        Some(idx) => {
            words.remove(idx);
            true
        }
        None => false,
    }
}

/// Split builtin keywords into modifier words and a base typename
///
/// `long long int` becomes `([long], long)`, `unsigned char` becomes
/// `([unsigned], char)`, `long double` becomes `([long], double)`.
fn guess_typename(mut words: Vec<String>) -> (Vec<String>, &'static str) {
    if words.iter().any(|w| w == "double") {
        words.retain(|w| w != "double");
        return (words, "double");
    }
    if let Some(idx) = words.iter().position(|w| w == "long") {
        words.remove(idx);
        words.retain(|w| w != "int");
        return (words, "long");
    }
    match words.last().map(String::as_str) {
        Some("int") => {
            words.pop();
            (words, "int")
        }
        Some("char") => {
            words.pop();
            (words, "char")
        }
        _ => (words, "int"),
    }
}

/// Recursive-descent parser over one declaration string
pub struct DefinitionParser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> DefinitionParser<'a> {
    /// Create a parser; surrounding whitespace is ignored
    #[must_use]
    pub fn new(definition: &'a str) -> Self {
        Self {
            cursor: Cursor::new(definition.trim()),
        }
    }

    /// The declaration being parsed (trimmed)
    #[must_use]
    pub fn definition(&self) -> &'a str {
        self.cursor.text()
    }

    /// Current byte offset
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor.pos()
    }

    /// Check if all input has been consumed
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.cursor.is_eof()
    }

    /// Skip whitespace
    pub fn skip_ws(&mut self) -> bool {
        self.cursor.skip_ws()
    }

    fn error(&self, kind: DefinitionErrorKind) -> DefinitionError {
        DefinitionError::new(kind, Span::point(self.cursor.pos()), self.cursor.text())
    }

    fn fail<T>(&self, kind: DefinitionErrorKind) -> DefResult<T> {
        Err(self.error(kind))
    }

    // ==================== Entry Points ====================

    /// Parse a single type expression
    pub fn parse_type(&mut self) -> DefResult<DefExpr> {
        self.type_expr(false)
    }

    /// Parse `[visibility] [static] <type> [<name>]`
    ///
    /// Without a name the type is reinterpreted as the name of a bare type alias.
    pub fn parse_type_object(&mut self) -> DefResult<Declaration> {
        let (visibility, is_static) = self.visibility_static();
        let first = self.type_expr(false)?;
        self.cursor.skip_ws();
        let (typename, name) = if self.cursor.is_eof() {
            (None, first)
        } else {
            (Some(first), self.type_expr(false)?)
        };
        Ok(Declaration {
            name,
            visibility,
            is_static,
            kind: DeclKind::Type { typename },
        })
    }

    /// Parse `[visibility] [static] <type> <name> [= <value>]`
    pub fn parse_member_object(&mut self) -> DefResult<Declaration> {
        let (visibility, is_static) = self.visibility_static();
        let typename = self.type_expr(false)?;
        let name = self.type_expr(false)?;
        self.cursor.skip_ws();
        let value = if self.cursor.skip_str("=") {
            Some(self.cursor.read_rest().trim().to_string())
        } else {
            None
        };
        Ok(Declaration {
            name,
            visibility,
            is_static,
            kind: DeclKind::Member { typename, value },
        })
    }

    /// Parse a function, method, constructor or operator declaration
    pub fn parse_function(&mut self) -> DefResult<Declaration> {
        let (visibility, is_static) = self.visibility_static();
        let mut func = FunctionDecl::default();
        loop {
            self.cursor.skip_ws();
            if self.cursor.skip_word("explicit") {
                func.explicit = true;
            } else if self.cursor.skip_word("virtual") {
                func.is_virtual = true;
            } else {
                break;
            }
        }

        let first = self.type_expr(false)?;
        self.cursor.skip_ws();
        // constructors, destructors and cast operators have no return type
        let name = if self.cursor.current_char() == Some('(') {
            first
        } else {
            func.return_type = Some(first);
            self.type_expr(false)?
        };

        self.signature(&mut func)?;
        Ok(Declaration {
            name,
            visibility,
            is_static,
            kind: DeclKind::Function(func),
        })
    }

    /// Parse `[visibility] [static] <type>`
    pub fn parse_class(&mut self) -> DefResult<Declaration> {
        let (visibility, is_static) = self.visibility_static();
        let name = self.type_expr(false)?;
        Ok(Declaration {
            name,
            visibility,
            is_static,
            kind: DeclKind::Class,
        })
    }

    /// Fail unless only whitespace is left
    pub fn assert_end(&mut self) -> DefResult<()> {
        self.cursor.skip_ws();
        if self.cursor.is_eof() {
            Ok(())
        } else {
            let rest = self.cursor.rest().to_string();
            self.fail(DefinitionErrorKind::TrailingInput(rest))
        }
    }

    // ==================== Names ====================

    fn name(&mut self) -> DefResult<DefExpr> {
        let Some(ident) = self.cursor.match_re(identifier_re()) else {
            return self.fail(DefinitionErrorKind::ExpectedName);
        };
        // `operator` is a keyword, so it can never be a plain name
        if ident == "operator" {
            return self.operator();
        }
        Ok(DefExpr::name_of(ident))
    }

    fn operator(&mut self) -> DefResult<DefExpr> {
        self.cursor.skip_ws();
        if let Some(token) = self.cursor.match_re(operator_re()) {
            let token: String = token.chars().filter(|c| !c.is_whitespace()).collect();
            return Ok(DefExpr::name_of(format!("operator{token}")));
        }

        for alloc in ["new", "delete"] {
            if !self.cursor.skip_word(alloc) {
                continue;
            }
            let mark = self.cursor.mark();
            self.cursor.skip_ws();
            if !self.cursor.skip_str("[") {
                self.cursor.reset(mark);
                return Ok(DefExpr::name_of(format!("operator {alloc}")));
            }
            self.cursor.skip_ws();
            if !self.cursor.skip_str("]") {
                return self.fail(DefinitionErrorKind::ExpectedClosingBracket(alloc));
            }
            return Ok(DefExpr::name_of(format!("operator {alloc}[]")));
        }

        let target = self.type_expr(false)?;
        Ok(DefExpr::CastOperator(Box::new(target)))
    }

    // ==================== Types ====================

    fn type_expr(&mut self, in_template: bool) -> DefResult<DefExpr> {
        self.cursor.skip_ws();
        let mut modifiers: Vec<String> = Vec::new();

        // a leading `::` is ignored, and no modifiers can follow it
        if !self.cursor.skip_str("::") {
            loop {
                self.cursor.skip_ws();
                let mark = self.cursor.mark();
                let Some(word) = self.cursor.match_re(identifier_re()) else {
                    break;
                };
                match modifier_rule(word) {
                    Some(ModifierRule::Any) => modifiers.push(word.to_string()),
                    Some(ModifierRule::Builtin(following)) => {
                        return self.builtin(modifiers, word, following);
                    }
                    None => {
                        self.cursor.reset(mark);
                        break;
                    }
                }
            }
        }

        let mut components: Vec<DefExpr> = Vec::new();
        loop {
            self.cursor.skip_ws();
            if in_template && matches!(self.cursor.current_char(), Some(',' | '>')) {
                break;
            }
            if components.is_empty() {
                if self.cursor.is_eof() {
                    break;
                }
            } else if self.cursor.skip_str("::") {
                self.cursor.skip_ws();
            } else {
                break;
            }
            self.type_component(&mut components)?;
        }

        let base = match components.len() {
            0 => return self.fail(DefinitionErrorKind::ExpectedType),
            1 => components.remove(0),
            _ => DefExpr::Path(components),
        };
        let is_const = take_const(&mut modifiers);
        let base = if modifiers.is_empty() {
            base
        } else {
            DefExpr::modified(base, modifiers)
        };
        self.suffixes(base, is_const)
    }

    /// Parse one path component; template arguments wrap the path read so far
    fn type_component(&mut self, components: &mut Vec<DefExpr>) -> DefResult<()> {
        let name = self.name()?;
        let mark = self.cursor.mark();
        self.cursor.skip_ws();
        if !self.cursor.skip_str("<") {
            self.cursor.reset(mark);
            components.push(name);
            return Ok(());
        }

        let args = self.template_args()?;
        components.push(name);
        let typename = if components.len() == 1 {
            components.remove(0)
        } else {
            DefExpr::Path(std::mem::take(components))
        };
        components.push(DefExpr::template(typename, args));
        Ok(())
    }

    fn template_args(&mut self) -> DefResult<Vec<DefExpr>> {
        let mut args = Vec::new();
        loop {
            self.cursor.skip_ws();
            if self.cursor.skip_str(">") {
                return Ok(args);
            }
            if !args.is_empty() {
                if !self.cursor.skip_str(",") {
                    return self.fail(DefinitionErrorKind::ExpectedTemplateDelimiter);
                }
                self.cursor.skip_ws();
            }
            args.push(self.type_expr(true)?);
        }
    }

    /// Greedily read builtin keywords (`unsigned long int`) after a restricted modifier
    fn builtin(
        &mut self,
        mut words: Vec<String>,
        first: &str,
        mut following: &'static [&'static str],
    ) -> DefResult<DefExpr> {
        words.push(first.to_string());
        loop {
            self.cursor.skip_ws();
            let mark = self.cursor.mark();
            let Some(word) = self.cursor.match_re(identifier_re()) else {
                break;
            };
            if following.contains(&word) {
                words.push(word.to_string());
                following = builtin_followers(word);
            } else {
                self.cursor.reset(mark);
                break;
            }
        }

        let is_const = take_const(&mut words);
        let (modifiers, typename) = guess_typename(words);
        let base = DefExpr::name_of(typename);
        let base = if modifiers.is_empty() {
            base
        } else {
            DefExpr::modified(base, modifiers)
        };
        self.suffixes(base, is_const)
    }

    /// Attach `const`, `*`, `[n]` and `&` suffixes left to right
    fn suffixes(&mut self, expr: DefExpr, is_const: bool) -> DefResult<DefExpr> {
        let mut expr = if is_const {
            DefExpr::constant(expr, true)
        } else {
            expr
        };
        loop {
            self.cursor.skip_ws();
            if self.cursor.skip_word("const") {
                expr = DefExpr::constant(expr, false);
            } else if self.cursor.skip_str("*") {
                expr = DefExpr::pointer(expr);
            } else if let Some(caps) = self.cursor.captures(array_re()) {
                let size_hint = caps
                    .get(1)
                    .map(|m| m.as_str().trim())
                    .filter(|hint| !hint.is_empty())
                    .map(String::from);
                expr = DefExpr::array(expr, size_hint);
            } else if self.cursor.skip_str("&") {
                expr = DefExpr::reference(expr);
            } else {
                return Ok(expr);
            }
        }
    }

    // ==================== Functions ====================

    fn visibility_static(&mut self) -> (Visibility, bool) {
        self.cursor.skip_ws();
        let visibility = self
            .cursor
            .match_re(visibility_re())
            .and_then(Visibility::from_keyword)
            .unwrap_or_default();
        self.cursor.skip_ws();
        let is_static = self.cursor.skip_word("static");
        (visibility, is_static)
    }

    fn signature(&mut self, func: &mut FunctionDecl) -> DefResult<()> {
        self.cursor.skip_ws();
        if !self.cursor.skip_str("(") {
            return self.fail(DefinitionErrorKind::ExpectedParameterList);
        }

        loop {
            self.cursor.skip_ws();
            if self.cursor.is_eof() {
                return self.fail(DefinitionErrorKind::MissingClosingParen);
            }
            if self.cursor.skip_str(")") {
                break;
            }
            if !func.params.is_empty() {
                if !self.cursor.skip_str(",") {
                    return self.fail(DefinitionErrorKind::ExpectedComma);
                }
                self.cursor.skip_ws();
            }
            let arg = self.argument()?;
            func.params.push(arg);
        }

        self.cursor.skip_ws();
        func.is_const = self.cursor.skip_word("const");
        self.cursor.skip_ws();
        if self.cursor.skip_str("=") {
            self.cursor.skip_ws();
            if !(self.cursor.skip_word("0")
                || self.cursor.skip_word("NULL")
                || self.cursor.skip_word("nullptr"))
            {
                return self.fail(DefinitionErrorKind::InvalidPureVirtual);
            }
            func.pure_virtual = true;
        }
        Ok(())
    }

    fn argument(&mut self) -> DefResult<Argument> {
        if self.cursor.skip_str("...") {
            return Ok(Argument::new(None, Some(DefExpr::name_of("...")), None));
        }

        let ty = self.type_expr(false)?;
        self.cursor.skip_ws();
        let mut arg = Argument::new(Some(ty), None, None);
        if self.cursor.skip_str("=") {
            arg.default = Some(self.default_expr()?);
        } else if !matches!(self.cursor.current_char(), Some(',' | ')')) {
            arg.name = Some(self.name()?);
            self.cursor.skip_ws();
            if self.cursor.skip_str("=") {
                arg.default = Some(self.default_expr()?);
            }
        }
        Ok(arg)
    }

    /// Read a default value up to the next `,` or `)` at nesting depth zero
    fn default_expr(&mut self) -> DefResult<String> {
        self.cursor.skip_ws();
        if let Some(literal) = self.cursor.match_re(string_re()) {
            return Ok(literal.to_string());
        }

        let rest = self.cursor.rest();
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        let mut escaped = false;
        for (idx, c) in rest.char_indices() {
            if let Some(q) = quote {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '"' | '\'' => quote = Some(c),
                '(' | '[' | '{' => depth += 1,
                ',' | ')' if depth == 0 => {
                    let value = rest[..idx].trim_end().to_string();
                    self.cursor.advance(idx);
                    return Ok(value);
                }
                ')' | ']' | '}' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        self.fail(DefinitionErrorKind::UnterminatedDefault)
    }
}

/// Parse a complete type expression, rejecting trailing input
pub fn parse_type(definition: &str) -> DefResult<DefExpr> {
    let mut parser = DefinitionParser::new(definition);
    let expr = parser.parse_type()?;
    parser.assert_end()?;
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(source: &str) -> DefExpr {
        parse_type(source).unwrap()
    }

    fn func(source: &str) -> Declaration {
        let mut parser = DefinitionParser::new(source);
        let decl = parser.parse_function().unwrap();
        parser.assert_end().unwrap();
        decl
    }

    fn name(s: &str) -> DefExpr {
        DefExpr::name_of(s)
    }

    #[test]
    fn parse_plain_names_and_paths() {
        assert_eq!(ty("Widget"), name("Widget"));
        assert_eq!(ty("ns::Widget"), DefExpr::path_of(["ns", "Widget"]));
        assert_eq!(ty("::ns::Widget"), DefExpr::path_of(["ns", "Widget"]));
        assert_eq!(ty("a :: b"), DefExpr::path_of(["a", "b"]));
    }

    #[test]
    fn parse_templates() {
        assert_eq!(
            ty("std::vector<int>"),
            DefExpr::template(DefExpr::path_of(["std", "vector"]), vec![name("int")])
        );
        assert_eq!(
            ty("Foo<int>::bar"),
            DefExpr::Path(vec![DefExpr::template(name("Foo"), vec![name("int")]), name("bar")])
        );
        let nested = ty("std::map<std::string, std::vector<int>>");
        assert_eq!(nested.to_string(), "std::map<std::string, std::vector<int>>");
        assert_eq!(nested.identifier(), "m:ss.v:i::");
    }

    #[test]
    fn parse_suffixes_left_to_right() {
        assert_eq!(ty("int * const"), DefExpr::constant(DefExpr::pointer(name("int")), false));
        assert_eq!(ty("char const*"), DefExpr::pointer(DefExpr::constant(name("char"), false)));
        assert_eq!(ty("Foo&"), DefExpr::reference(name("Foo")));
        assert_eq!(
            ty("int[16]"),
            DefExpr::array(name("int"), Some("16".to_string()))
        );
        assert_eq!(ty("int[ ]"), DefExpr::array(name("int"), None));
    }

    #[test]
    fn parse_leading_const_wraps_before_suffixes() {
        assert_eq!(
            ty("const std::string &"),
            DefExpr::reference(DefExpr::constant(DefExpr::path_of(["std", "string"]), true))
        );
        assert_eq!(
            ty("volatile const Reg*"),
            DefExpr::pointer(DefExpr::constant(
                DefExpr::modified(name("Reg"), vec!["volatile".to_string()]),
                true
            ))
        );
    }

    #[test]
    fn parse_builtin_types() {
        assert_eq!(
            ty("unsigned int"),
            DefExpr::modified(name("int"), vec!["unsigned".to_string()])
        );
        assert_eq!(
            ty("long long int"),
            DefExpr::modified(name("long"), vec!["long".to_string()])
        );
        assert_eq!(
            ty("unsigned long int"),
            DefExpr::modified(name("long"), vec!["unsigned".to_string()])
        );
        assert_eq!(ty("long"), name("long"));
        assert_eq!(
            ty("short"),
            DefExpr::modified(name("int"), vec!["short".to_string()])
        );
        assert_eq!(
            ty("unsigned char"),
            DefExpr::modified(name("char"), vec!["unsigned".to_string()])
        );
        assert_eq!(
            ty("long double"),
            DefExpr::modified(name("double"), vec!["long".to_string()])
        );
    }

    #[test]
    fn parse_builtin_keeps_leading_const() {
        assert_eq!(
            ty("const unsigned int&"),
            DefExpr::reference(DefExpr::constant(
                DefExpr::modified(name("int"), vec!["unsigned".to_string()]),
                true
            ))
        );
    }

    #[test]
    fn builtin_stops_at_non_builtin_word() {
        let mut parser = DefinitionParser::new("unsigned count");
        let expr = parser.parse_type().unwrap();
        assert_eq!(expr, DefExpr::modified(name("int"), vec!["unsigned".to_string()]));
        parser.skip_ws();
        assert_eq!(parser.position(), 9);
    }

    #[test]
    fn parse_operators() {
        for (source, expected) in [
            ("operator==", "operator=="),
            ("operator []", "operator[]"),
            ("operator ( )", "operator()"),
            ("operator<<", "operator<<"),
            ("operator<<=", "operator<<="),
            ("operator->*", "operator->*"),
            ("operator->", "operator->"),
            ("operator&&", "operator&&"),
            ("operator,", "operator,"),
            ("operator new", "operator new"),
            ("operator delete [ ]", "operator delete[]"),
        ] {
            assert_eq!(ty(source), name(expected), "parsing {source}");
        }
    }

    #[test]
    fn parse_cast_operator() {
        assert_eq!(
            ty("operator const char*"),
            DefExpr::CastOperator(Box::new(DefExpr::pointer(DefExpr::constant(
                name("char"),
                true
            ))))
        );
    }

    #[test]
    fn unterminated_new_array_fails() {
        let err = parse_type("operator new[").unwrap_err();
        assert_eq!(err.kind, DefinitionErrorKind::ExpectedClosingBracket("new"));
    }

    #[test]
    fn parse_function_with_default() {
        let decl = func("void foo(int x=0)");
        assert_eq!(decl.name, name("foo"));
        let f = decl.as_function().unwrap();
        assert_eq!(f.return_type, Some(name("void")));
        assert_eq!(
            f.params,
            vec![Argument::new(Some(name("int")), Some(name("x")), Some("0".to_string()))]
        );
        assert!(!f.is_const);
        assert!(!f.pure_virtual);
        assert!(!f.explicit);
    }

    #[test]
    fn parse_explicit_constructor() {
        let decl = func("explicit Foo(const std::string &s)");
        let f = decl.as_function().unwrap();
        assert!(f.explicit);
        assert_eq!(f.return_type, None);
        assert_eq!(decl.name, name("Foo"));
        assert_eq!(
            f.params[0].ty,
            Some(DefExpr::reference(DefExpr::constant(
                DefExpr::path_of(["std", "string"]),
                true
            )))
        );
        assert_eq!(f.params[0].name, Some(name("s")));
    }

    #[test]
    fn parse_subscript_operator() {
        let decl = func("int operator[](int i) const");
        assert_eq!(decl.name, name("operator[]"));
        assert!(decl.as_function().unwrap().is_const);
        assert_eq!(decl.identifier(), "subscript-operator__iC");
    }

    #[test]
    fn parse_pure_virtual() {
        for source in ["virtual void f() = 0", "virtual void f() = NULL", "virtual void f() =nullptr"] {
            let decl = func(source);
            let f = decl.as_function().unwrap();
            assert!(f.pure_virtual, "{source}");
            assert!(f.is_virtual, "{source}");
        }
        assert_eq!(func("virtual void f() const = 0").to_string(), "virtual void f() const = 0");
    }

    #[test]
    fn other_pure_virtual_values_fail() {
        for source in ["void f() = 1", "void f() = PURE", "void f() = 0x0"] {
            let mut parser = DefinitionParser::new(source);
            let err = parser.parse_function().unwrap_err();
            assert_eq!(err.kind, DefinitionErrorKind::InvalidPureVirtual, "{source}");
        }
    }

    #[test]
    fn parse_destructor_and_cast_operator() {
        let dtor = func("virtual ~Widget()");
        assert_eq!(dtor.name, name("~Widget"));
        assert_eq!(dtor.as_function().unwrap().return_type, None);

        let cast = func("operator bool() const");
        assert_eq!(cast.name, DefExpr::CastOperator(Box::new(name("bool"))));
        assert_eq!(cast.identifier(), "castto-b-operatorC");
    }

    #[test]
    fn parse_defaults_with_nesting_and_strings() {
        let decl = func(r#"void log(const char* msg = "a, b)", int level = max(1, 2), Point p = Point{0, 0})"#);
        let params = &decl.as_function().unwrap().params;
        assert_eq!(params.len(), 3);
        assert_eq!(params[0].default.as_deref(), Some(r#""a, b)""#));
        assert_eq!(params[1].default.as_deref(), Some("max(1, 2)"));
        assert_eq!(params[2].default.as_deref(), Some("Point{0, 0}"));
    }

    #[test]
    fn parse_unnamed_and_variadic_arguments() {
        let decl = func("int printf(const char*, ...)");
        let params = &decl.as_function().unwrap().params;
        assert_eq!(params[0].name, None);
        assert_eq!(params[1].ty, None);
        assert_eq!(decl.to_string(), "int printf(const char*, ...)");
        assert_eq!(decl.identifier(), "printf__cCP.X");
    }

    #[test]
    fn parse_unnamed_argument_with_default() {
        let decl = func("void wait(int = 10)");
        let arg = &decl.as_function().unwrap().params[0];
        assert_eq!(arg.name, None);
        assert_eq!(arg.default.as_deref(), Some("10"));
    }

    #[test]
    fn parse_visibility_and_static() {
        let decl = func("protected static Widget* create()");
        assert_eq!(decl.visibility, Visibility::Protected);
        assert!(decl.is_static);
        assert_eq!(decl.to_string(), "protected static Widget* create()");
    }

    #[test]
    fn parse_member_objects() {
        let mut parser = DefinitionParser::new("std::vector<int> values");
        let decl = parser.parse_member_object().unwrap();
        match &decl.kind {
            DeclKind::Member { typename, value } => {
                assert_eq!(
                    typename,
                    &DefExpr::template(DefExpr::path_of(["std", "vector"]), vec![name("int")])
                );
                assert_eq!(value, &None);
            }
            other => panic!("expected member, got {other:?}"),
        }
        assert_eq!(decl.identifier(), "values__v:i:");

        let mut parser = DefinitionParser::new("private static const int limit = 4 * 1024");
        let decl = parser.parse_member_object().unwrap();
        assert_eq!(decl.to_string(), "private static const int limit = 4 * 1024");
    }

    #[test]
    fn parse_type_objects() {
        let mut parser = DefinitionParser::new("Handle");
        let decl = parser.parse_type_object().unwrap();
        assert_eq!(decl.kind, DeclKind::Type { typename: None });
        assert_eq!(decl.name, name("Handle"));

        let mut parser = DefinitionParser::new("std::vector<int> IntList");
        let decl = parser.parse_type_object().unwrap();
        assert_eq!(decl.identifier(), "IntList__v:i:");
    }

    #[test]
    fn parse_class_object() {
        let mut parser = DefinitionParser::new("private Impl");
        let decl = parser.parse_class().unwrap();
        assert_eq!(decl.kind, DeclKind::Class);
        assert_eq!(decl.visibility, Visibility::Private);
        assert_eq!(decl.to_string(), "private Impl");
    }

    #[test]
    fn errors_carry_offset_and_input() {
        let mut parser = DefinitionParser::new("  void foo(int x");
        let err = parser.parse_function().unwrap_err();
        assert_eq!(err.kind, DefinitionErrorKind::MissingClosingParen);
        assert_eq!(err.definition, "void foo(int x");
        assert_eq!(err.offset(), 14);
    }

    #[test]
    fn missing_parameter_list_fails() {
        let mut parser = DefinitionParser::new("int value");
        let err = parser.parse_function().unwrap_err();
        assert_eq!(err.kind, DefinitionErrorKind::ExpectedParameterList);
    }

    #[test]
    fn unterminated_default_fails() {
        let mut parser = DefinitionParser::new("void f(int x = g(1, 2");
        let err = parser.parse_function().unwrap_err();
        assert_eq!(err.kind, DefinitionErrorKind::UnterminatedDefault);
    }

    #[test]
    fn bad_template_fails() {
        let err = parse_type("Foo<int;>").unwrap_err();
        assert_eq!(err.kind, DefinitionErrorKind::ExpectedTemplateDelimiter);
        let err = parse_type("").unwrap_err();
        assert_eq!(err.kind, DefinitionErrorKind::ExpectedType);
    }

    #[test]
    fn trailing_input_fails() {
        let err = parse_type("int x y").unwrap_err();
        assert_eq!(err.kind, DefinitionErrorKind::TrailingInput("x y".to_string()));
        assert_eq!(err.offset(), 4);
    }

    #[test]
    fn rendered_types_reparse_to_equal_trees() {
        for source in [
            "Widget",
            "ns::Widget",
            "int * const",
            "const char *",
            "char[8]",
            "Node*&",
            "const std::string&",
            "std::map<std::string, std::vector<int>>",
            "Foo<int>::Bar<char*>",
            "unsigned long long",
            "long double",
            "volatile unsigned char* const",
        ] {
            let first = ty(source);
            let second = ty(&first.to_string());
            assert_eq!(first, second, "round trip of {source} via {first}");
        }
    }

    #[test]
    fn rendered_declarations_reparse_to_equal_trees() {
        for source in [
            "void foo(int x=0)",
            "explicit Foo(const std::string &s)",
            "int operator[](int i) const",
            "virtual void f() = 0",
            "static std::vector<int> make(size_t n, int fill = -1)",
            "operator bool() const",
        ] {
            let first = func(source);
            let second = func(&first.to_string());
            assert_eq!(first, second, "round trip of {source} via {first}");
        }
    }
}
