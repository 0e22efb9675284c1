//! SPARQL Token types.
//!
//! Tokens are the output of lexical analysis, ready for parsing.
//! Each token carries its source span for precise diagnostics.

use crate::span::SourceSpan;
use std::sync::Arc;

/// A token with its source span.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The token kind
    pub kind: TokenKind,
    /// Source location
    pub span: SourceSpan,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            span: SourceSpan::new(start, end),
        }
    }

    /// Check if this is an EOF token.
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

/// Token kinds for the SPARQL subset the query engine reads.
///
/// Bare words that are not keywords (function names such as `STRLEN`, or
/// clause words the engine never interprets such as `FILTER`) are lexed as
/// [`TokenKind::Name`].
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // =========================================================================
    // IRIs
    // =========================================================================
    /// Full IRI: `<http://example.org/>` (escapes decoded)
    Iri(Arc<str>),

    /// Prefixed name namespace: `prefix:`
    PrefixedNameNs(Arc<str>),

    /// Prefixed name with local: `prefix:local`
    PrefixedName {
        /// Namespace prefix (without colon)
        prefix: Arc<str>,
        /// Local name
        local: Arc<str>,
    },

    // =========================================================================
    // Variables
    // =========================================================================
    /// Variable: `?name` or `$name` (stored without the sigil)
    Var(Arc<str>),

    /// Inline expression placeholder: `${...}` (stored without the braces)
    Placeholder(Arc<str>),

    // =========================================================================
    // Literals
    // =========================================================================
    /// String literal (unescaped content)
    String(Arc<str>),

    /// Integer literal, lexical form
    Integer(Arc<str>),

    /// Decimal literal, lexical form
    Decimal(Arc<str>),

    /// Double literal, lexical form
    Double(Arc<str>),

    /// Language tag, without the `@`
    LangTag(Arc<str>),

    // =========================================================================
    // Blank Nodes
    // =========================================================================
    /// Labeled blank node: `_:name`
    BlankNodeLabel(Arc<str>),

    /// Anonymous blank node: `[]`
    Anon,

    /// Bare word that is not a keyword
    Name(Arc<str>),

    // =========================================================================
    // Keywords (case-insensitive in SPARQL)
    // =========================================================================
    KwSelect,
    KwAsk,
    KwWhere,
    KwBase,
    KwPrefix,
    KwAs,
    KwDistinct,
    KwReduced,
    KwLimit,
    KwOffset,
    KwValues,
    /// `BINDINGS`, the pre-1.1 spelling of a trailing `VALUES` block
    KwBindings,
    KwUndef,
    KwNot,
    KwIn,
    KwExists,
    /// `a` keyword (shorthand for rdf:type)
    KwA,
    KwTrue,
    KwFalse,

    // =========================================================================
    // Punctuation / Operators
    // =========================================================================
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `^^` (datatype marker)
    DoubleCaret,
    /// `||`
    Or,
    /// `&&`
    And,
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `!`
    Bang,
    /// `?` (in property paths)
    Question,
    /// `|` (in property paths)
    Pipe,
    /// `^` (inverse in property paths)
    Caret,

    /// End of input
    Eof,
}

impl TokenKind {
    /// Get the keyword string for error messages (if this is a keyword).
    pub fn keyword_str(&self) -> Option<&'static str> {
        match self {
            TokenKind::KwSelect => Some("SELECT"),
            TokenKind::KwAsk => Some("ASK"),
            TokenKind::KwWhere => Some("WHERE"),
            TokenKind::KwBase => Some("BASE"),
            TokenKind::KwPrefix => Some("PREFIX"),
            TokenKind::KwAs => Some("AS"),
            TokenKind::KwDistinct => Some("DISTINCT"),
            TokenKind::KwReduced => Some("REDUCED"),
            TokenKind::KwLimit => Some("LIMIT"),
            TokenKind::KwOffset => Some("OFFSET"),
            TokenKind::KwValues => Some("VALUES"),
            TokenKind::KwBindings => Some("BINDINGS"),
            TokenKind::KwUndef => Some("UNDEF"),
            TokenKind::KwNot => Some("NOT"),
            TokenKind::KwIn => Some("IN"),
            TokenKind::KwExists => Some("EXISTS"),
            TokenKind::KwA => Some("a"),
            TokenKind::KwTrue => Some("true"),
            TokenKind::KwFalse => Some("false"),
            _ => None,
        }
    }

    /// Check if this token is a keyword.
    pub fn is_keyword(&self) -> bool {
        self.keyword_str().is_some()
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(kw) = self.keyword_str() {
            return write!(f, "{}", kw);
        }
        match self {
            TokenKind::Iri(s) => write!(f, "<{}>", s),
            TokenKind::PrefixedNameNs(s) => write!(f, "{}:", s),
            TokenKind::PrefixedName { prefix, local } => write!(f, "{}:{}", prefix, local),
            TokenKind::Var(s) => write!(f, "?{}", s),
            TokenKind::Placeholder(s) => write!(f, "${{{}}}", s),
            TokenKind::String(s) => write!(f, "\"{}\"", s),
            TokenKind::Integer(s) | TokenKind::Decimal(s) | TokenKind::Double(s) => {
                write!(f, "{}", s)
            }
            TokenKind::LangTag(s) => write!(f, "@{}", s),
            TokenKind::BlankNodeLabel(s) => write!(f, "_:{}", s),
            TokenKind::Anon => write!(f, "[]"),
            TokenKind::Name(s) => write!(f, "{}", s),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::DoubleCaret => write!(f, "^^"),
            TokenKind::Or => write!(f, "||"),
            TokenKind::And => write!(f, "&&"),
            TokenKind::Eq => write!(f, "="),
            TokenKind::Ne => write!(f, "!="),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::Le => write!(f, "<="),
            TokenKind::Ge => write!(f, ">="),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Bang => write!(f, "!"),
            TokenKind::Question => write!(f, "?"),
            TokenKind::Pipe => write!(f, "|"),
            TokenKind::Caret => write!(f, "^"),
            TokenKind::Eof => write!(f, "end of input"),
            _ => write!(f, "?"),
        }
    }
}

/// Map a string to its keyword token kind (case-insensitive).
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    match s.to_ascii_uppercase().as_str() {
        "SELECT" => Some(TokenKind::KwSelect),
        "ASK" => Some(TokenKind::KwAsk),
        "WHERE" => Some(TokenKind::KwWhere),
        "BASE" => Some(TokenKind::KwBase),
        "PREFIX" => Some(TokenKind::KwPrefix),
        "AS" => Some(TokenKind::KwAs),
        "DISTINCT" => Some(TokenKind::KwDistinct),
        "REDUCED" => Some(TokenKind::KwReduced),
        "LIMIT" => Some(TokenKind::KwLimit),
        "OFFSET" => Some(TokenKind::KwOffset),
        "VALUES" => Some(TokenKind::KwValues),
        "BINDINGS" => Some(TokenKind::KwBindings),
        "UNDEF" => Some(TokenKind::KwUndef),
        "NOT" => Some(TokenKind::KwNot),
        "IN" => Some(TokenKind::KwIn),
        "EXISTS" => Some(TokenKind::KwExists),
        "TRUE" => Some(TokenKind::KwTrue),
        "FALSE" => Some(TokenKind::KwFalse),
        // 'a' is only a keyword when lowercase
        _ if s == "a" => Some(TokenKind::KwA),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(keyword_from_str("SELECT"), Some(TokenKind::KwSelect));
        assert_eq!(keyword_from_str("select"), Some(TokenKind::KwSelect));
        assert_eq!(keyword_from_str("Bindings"), Some(TokenKind::KwBindings));
        assert_eq!(keyword_from_str("a"), Some(TokenKind::KwA));
        assert_eq!(keyword_from_str("A"), None);
        assert_eq!(keyword_from_str("strlen"), None);
    }

    #[test]
    fn test_token_display() {
        assert_eq!(
            format!("{}", TokenKind::Iri(Arc::from("http://example.org/"))),
            "<http://example.org/>"
        );
        assert_eq!(format!("{}", TokenKind::Var(Arc::from("name"))), "?name");
        assert_eq!(format!("{}", TokenKind::Placeholder(Arc::from("1+1"))), "${1+1}");
        assert_eq!(format!("{}", TokenKind::KwSelect), "SELECT");
    }
}
