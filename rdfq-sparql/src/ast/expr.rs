//! SPARQL expression types.
//!
//! The AST for expressions that appear in `SELECT (expr AS ?var)`
//! projections.

use rdfq_graph_ir::{Datatype, Term};
use std::sync::Arc;

/// A SPARQL expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    /// A variable reference
    Var(Arc<str>),

    /// A constant IRI or literal
    Term(Term),

    /// Binary operation (arithmetic, comparison, boolean)
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// Unary operation (negation, logical NOT)
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },

    /// Built-in function call
    Call {
        function: FunctionName,
        args: Vec<Expression>,
    },

    /// XSD constructor function such as `xsd:integer("4")`
    Cast {
        datatype: Datatype,
        arg: Box<Expression>,
    },

    /// IN / NOT IN list
    In {
        expr: Box<Expression>,
        list: Vec<Expression>,
        negated: bool,
    },

    /// `EXISTS {}` / `NOT EXISTS {}` over an empty group
    Exists { negated: bool },
}

impl Expression {
    /// Create a variable expression.
    pub fn var(name: impl AsRef<str>) -> Self {
        Expression::Var(Arc::from(name.as_ref()))
    }

    /// Create a binary expression.
    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a unary expression.
    pub fn unary(op: UnaryOp, operand: Expression) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Create a function call expression.
    pub fn call(function: FunctionName, args: Vec<Expression>) -> Self {
        Expression::Call { function, args }
    }
}

/// Binary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    // Logical
    And, // &&
    Or,  // ||

    // Comparison
    Eq, // =
    Ne, // !=
    Lt, // <
    Le, // <=
    Gt, // >
    Ge, // >=

    // Arithmetic
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
}

impl BinaryOp {
    /// Get the operator symbol as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }

    /// Check if this is one of the comparison operators.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }
}

/// Unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical NOT (!)
    Not,
    /// Arithmetic negation (-)
    Neg,
    /// Unary plus (+)
    Pos,
}

/// Built-in function names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FunctionName {
    // Type checking functions
    Bound,
    IsIri,
    IsBlank,
    IsLiteral,
    IsNumeric,

    // Accessors
    Str,
    Lang,
    Datatype,

    // Constructor functions
    Iri,
    BNode,
    StrDt,
    StrLang,

    // String functions
    Strlen,
    Substr,
    Ucase,
    Lcase,
    StrStarts,
    StrEnds,
    Contains,
    StrBefore,
    StrAfter,
    EncodeForUri,
    Concat,
    LangMatches,
    Regex,
    Replace,

    // Numeric functions
    Abs,
    Round,
    Ceil,
    Floor,
    Rand,

    // Date/time functions
    Now,
    Year,
    Month,
    Day,
    Hours,
    Minutes,
    Seconds,
    Timezone,
    Tz,

    // Hash functions
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,

    // UUID functions
    Uuid,
    StrUuid,

    // Conditionals
    If,
    Coalesce,
    SameTerm,
}

impl FunctionName {
    /// Parse a function name (case-insensitive).
    ///
    /// `URI` and `isURI` map to their `IRI` spellings.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_uppercase().as_str() {
            "BOUND" => Some(FunctionName::Bound),
            "ISIRI" | "ISURI" => Some(FunctionName::IsIri),
            "ISBLANK" => Some(FunctionName::IsBlank),
            "ISLITERAL" => Some(FunctionName::IsLiteral),
            "ISNUMERIC" => Some(FunctionName::IsNumeric),
            "STR" => Some(FunctionName::Str),
            "LANG" => Some(FunctionName::Lang),
            "DATATYPE" => Some(FunctionName::Datatype),
            "IRI" | "URI" => Some(FunctionName::Iri),
            "BNODE" => Some(FunctionName::BNode),
            "STRDT" => Some(FunctionName::StrDt),
            "STRLANG" => Some(FunctionName::StrLang),
            "STRLEN" => Some(FunctionName::Strlen),
            "SUBSTR" => Some(FunctionName::Substr),
            "UCASE" => Some(FunctionName::Ucase),
            "LCASE" => Some(FunctionName::Lcase),
            "STRSTARTS" => Some(FunctionName::StrStarts),
            "STRENDS" => Some(FunctionName::StrEnds),
            "CONTAINS" => Some(FunctionName::Contains),
            "STRBEFORE" => Some(FunctionName::StrBefore),
            "STRAFTER" => Some(FunctionName::StrAfter),
            "ENCODE_FOR_URI" | "ENCODEFORURI" => Some(FunctionName::EncodeForUri),
            "CONCAT" => Some(FunctionName::Concat),
            "LANGMATCHES" => Some(FunctionName::LangMatches),
            "REGEX" => Some(FunctionName::Regex),
            "REPLACE" => Some(FunctionName::Replace),
            "ABS" => Some(FunctionName::Abs),
            "ROUND" => Some(FunctionName::Round),
            "CEIL" => Some(FunctionName::Ceil),
            "FLOOR" => Some(FunctionName::Floor),
            "RAND" => Some(FunctionName::Rand),
            "NOW" => Some(FunctionName::Now),
            "YEAR" => Some(FunctionName::Year),
            "MONTH" => Some(FunctionName::Month),
            "DAY" => Some(FunctionName::Day),
            "HOURS" => Some(FunctionName::Hours),
            "MINUTES" => Some(FunctionName::Minutes),
            "SECONDS" => Some(FunctionName::Seconds),
            "TIMEZONE" => Some(FunctionName::Timezone),
            "TZ" => Some(FunctionName::Tz),
            "MD5" => Some(FunctionName::Md5),
            "SHA1" => Some(FunctionName::Sha1),
            "SHA256" => Some(FunctionName::Sha256),
            "SHA384" => Some(FunctionName::Sha384),
            "SHA512" => Some(FunctionName::Sha512),
            "UUID" => Some(FunctionName::Uuid),
            "STRUUID" => Some(FunctionName::StrUuid),
            "IF" => Some(FunctionName::If),
            "COALESCE" => Some(FunctionName::Coalesce),
            "SAMETERM" => Some(FunctionName::SameTerm),
            _ => None,
        }
    }

    /// Name as written in error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionName::Bound => "BOUND",
            FunctionName::IsIri => "isIRI",
            FunctionName::IsBlank => "isBLANK",
            FunctionName::IsLiteral => "isLITERAL",
            FunctionName::IsNumeric => "isNUMERIC",
            FunctionName::Str => "STR",
            FunctionName::Lang => "LANG",
            FunctionName::Datatype => "DATATYPE",
            FunctionName::Iri => "IRI",
            FunctionName::BNode => "BNODE",
            FunctionName::StrDt => "STRDT",
            FunctionName::StrLang => "STRLANG",
            FunctionName::Strlen => "STRLEN",
            FunctionName::Substr => "SUBSTR",
            FunctionName::Ucase => "UCASE",
            FunctionName::Lcase => "LCASE",
            FunctionName::StrStarts => "STRSTARTS",
            FunctionName::StrEnds => "STRENDS",
            FunctionName::Contains => "CONTAINS",
            FunctionName::StrBefore => "STRBEFORE",
            FunctionName::StrAfter => "STRAFTER",
            FunctionName::EncodeForUri => "ENCODE_FOR_URI",
            FunctionName::Concat => "CONCAT",
            FunctionName::LangMatches => "LANGMATCHES",
            FunctionName::Regex => "REGEX",
            FunctionName::Replace => "REPLACE",
            FunctionName::Abs => "ABS",
            FunctionName::Round => "ROUND",
            FunctionName::Ceil => "CEIL",
            FunctionName::Floor => "FLOOR",
            FunctionName::Rand => "RAND",
            FunctionName::Now => "NOW",
            FunctionName::Year => "YEAR",
            FunctionName::Month => "MONTH",
            FunctionName::Day => "DAY",
            FunctionName::Hours => "HOURS",
            FunctionName::Minutes => "MINUTES",
            FunctionName::Seconds => "SECONDS",
            FunctionName::Timezone => "TIMEZONE",
            FunctionName::Tz => "TZ",
            FunctionName::Md5 => "MD5",
            FunctionName::Sha1 => "SHA1",
            FunctionName::Sha256 => "SHA256",
            FunctionName::Sha384 => "SHA384",
            FunctionName::Sha512 => "SHA512",
            FunctionName::Uuid => "UUID",
            FunctionName::StrUuid => "STRUUID",
            FunctionName::If => "IF",
            FunctionName::Coalesce => "COALESCE",
            FunctionName::SameTerm => "sameTerm",
        }
    }
}

impl std::fmt::Display for FunctionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_name_aliases() {
        assert_eq!(FunctionName::parse("uri"), Some(FunctionName::Iri));
        assert_eq!(FunctionName::parse("isURI"), Some(FunctionName::IsIri));
        assert_eq!(FunctionName::parse("encode_for_uri"), Some(FunctionName::EncodeForUri));
        assert_eq!(FunctionName::parse("FILTER"), None);
    }

    #[test]
    fn test_comparison_ops() {
        assert!(BinaryOp::Le.is_comparison());
        assert!(!BinaryOp::Add.is_comparison());
        assert_eq!(BinaryOp::Ne.as_str(), "!=");
    }
}
