//! ComparableValue type and conversions
//!
//! The intermediate value type used during expression evaluation. Literals
//! of the numeric, boolean and dateTime datatypes are decoded into native
//! values; anything else keeps its lexical form.

use super::datetime::XsdDateTime;
use crate::error::{EvalError, EvalResult};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use rdfq_graph_ir::datatype::iri;
use rdfq_graph_ir::{Datatype, LiteralTag, Term};
use std::str::FromStr;
use std::sync::Arc;

/// Value produced by expression evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum ComparableValue {
    Iri(Arc<str>),
    Blank(Arc<str>),
    /// Simple or language-tagged string
    String {
        value: Arc<str>,
        lang: Option<Arc<str>>,
    },
    Bool(bool),
    Integer(BigInt),
    Decimal(BigDecimal),
    Double(f64),
    DateTime(XsdDateTime),
    /// Literal of a datatype the evaluator does not interpret, or an
    /// ill-typed lexical form
    Typed {
        lexical: Arc<str>,
        datatype: Datatype,
    },
}

impl ComparableValue {
    /// Create a simple string value
    pub fn string(value: impl AsRef<str>) -> Self {
        ComparableValue::String {
            value: Arc::from(value.as_ref()),
            lang: None,
        }
    }

    /// Decode a constant term. Variables have no value.
    pub fn from_term(term: &Term) -> Option<Self> {
        match term {
            Term::Var(_) => None,
            Term::Iri(_) | Term::Curie { .. } | Term::Reference { .. } => {
                term.as_iri().map(|iri| ComparableValue::Iri(Arc::from(iri)))
            }
            Term::Blank(id) => Some(ComparableValue::Blank(Arc::from(id.as_str()))),
            Term::Literal { lexical, tag } => Some(match tag {
                LiteralTag::Simple => ComparableValue::String {
                    value: lexical.clone(),
                    lang: None,
                },
                LiteralTag::Lang(lang) => ComparableValue::String {
                    value: lexical.clone(),
                    lang: Some(lang.clone()),
                },
                LiteralTag::Typed(datatype) => Self::from_typed(lexical, datatype),
            }),
        }
    }

    fn from_typed(lexical: &Arc<str>, datatype: &Datatype) -> Self {
        let text = lexical.trim();
        let decoded = match datatype.as_iri() {
            iri::XSD_STRING => Some(ComparableValue::String {
                value: lexical.clone(),
                lang: None,
            }),
            iri::XSD_INTEGER => BigInt::from_str(text.strip_prefix('+').unwrap_or(text))
                .ok()
                .map(ComparableValue::Integer),
            iri::XSD_DECIMAL => BigDecimal::from_str(text).ok().map(ComparableValue::Decimal),
            iri::XSD_DOUBLE | iri::XSD_FLOAT => parse_double(text).map(ComparableValue::Double),
            iri::XSD_BOOLEAN => match text {
                "true" | "1" => Some(ComparableValue::Bool(true)),
                "false" | "0" => Some(ComparableValue::Bool(false)),
                _ => None,
            },
            iri::XSD_DATE_TIME => XsdDateTime::parse(text).map(ComparableValue::DateTime),
            _ => None,
        };
        decoded.unwrap_or_else(|| ComparableValue::Typed {
            lexical: lexical.clone(),
            datatype: datatype.clone(),
        })
    }

    /// Encode back into a literal or IRI term, using canonical lexical forms.
    pub fn into_term(self) -> Term {
        match self {
            ComparableValue::Iri(iri) => Term::Iri(iri),
            ComparableValue::Blank(label) => Term::blank(label.as_ref()),
            ComparableValue::String { value, lang: None } => Term::plain(value.as_ref()),
            ComparableValue::String {
                value,
                lang: Some(lang),
            } => Term::lang_string(value.as_ref(), lang.as_ref()),
            ComparableValue::Bool(b) => Term::boolean(b),
            ComparableValue::Integer(n) => Term::typed(n.to_string(), Datatype::xsd_integer()),
            ComparableValue::Decimal(d) => {
                Term::typed(canonical_decimal(&d), Datatype::xsd_decimal())
            }
            ComparableValue::Double(d) => Term::typed(canonical_double(d), Datatype::xsd_double()),
            ComparableValue::DateTime(dt) => {
                Term::typed(dt.to_string(), Datatype::xsd_date_time())
            }
            ComparableValue::Typed { lexical, datatype } => Term::typed(lexical.as_ref(), datatype),
        }
    }

    /// Datatype IRI as reported by `DATATYPE()`
    pub fn datatype_iri(&self) -> Option<&str> {
        match self {
            ComparableValue::Iri(_) | ComparableValue::Blank(_) => None,
            ComparableValue::String { lang: None, .. } => Some(iri::XSD_STRING),
            ComparableValue::String { lang: Some(_), .. } => Some(iri::RDF_LANG_STRING),
            ComparableValue::Bool(_) => Some(iri::XSD_BOOLEAN),
            ComparableValue::Integer(_) => Some(iri::XSD_INTEGER),
            ComparableValue::Decimal(_) => Some(iri::XSD_DECIMAL),
            ComparableValue::Double(_) => Some(iri::XSD_DOUBLE),
            ComparableValue::DateTime(_) => Some(iri::XSD_DATE_TIME),
            ComparableValue::Typed { datatype, .. } => Some(datatype.as_iri()),
        }
    }

    pub fn is_literal(&self) -> bool {
        !matches!(self, ComparableValue::Iri(_) | ComparableValue::Blank(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ComparableValue::Integer(_) | ComparableValue::Decimal(_) | ComparableValue::Double(_)
        )
    }

    /// Lexical form as returned by `STR()`; blank nodes have none.
    pub fn lexical(&self) -> Option<String> {
        match self {
            ComparableValue::Blank(_) => None,
            ComparableValue::Iri(iri) => Some(iri.to_string()),
            ComparableValue::String { value, .. } => Some(value.to_string()),
            ComparableValue::Typed { lexical, .. } => Some(lexical.to_string()),
            other => other
                .clone()
                .into_term()
                .as_literal()
                .map(|(lexical, _)| lexical.to_string()),
        }
    }

    /// Borrow the string of a simple, `xsd:string` or language-tagged literal.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ComparableValue::String { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Language tag of a string literal (empty when none)
    pub fn lang(&self) -> Option<&str> {
        match self {
            ComparableValue::String { lang, .. } => Some(lang.as_deref().unwrap_or("")),
            _ => None,
        }
    }

    /// Effective boolean value
    pub fn ebv(&self) -> EvalResult<bool> {
        match self {
            ComparableValue::Bool(b) => Ok(*b),
            ComparableValue::String { value, .. } => Ok(!value.is_empty()),
            ComparableValue::Integer(n) => Ok(!n.is_zero()),
            ComparableValue::Decimal(d) => Ok(!d.is_zero()),
            ComparableValue::Double(d) => Ok(*d != 0.0 && !d.is_nan()),
            ComparableValue::Typed { datatype, .. } if datatype.is_numeric() => Ok(false),
            ComparableValue::Typed { datatype, .. } if datatype.as_iri() == iri::XSD_BOOLEAN => {
                Ok(false)
            }
            other => Err(EvalError::type_error(format!(
                "no effective boolean value for {:?}",
                other
            ))),
        }
    }

    /// Numeric value as `f64`
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            ComparableValue::Integer(n) => n.to_f64(),
            ComparableValue::Decimal(d) => d.to_f64(),
            ComparableValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Numeric value as a decimal; doubles are not converted
    pub fn to_decimal(&self) -> Option<BigDecimal> {
        match self {
            ComparableValue::Integer(n) => Some(BigDecimal::new(n.clone(), 0)),
            ComparableValue::Decimal(d) => Some(d.clone()),
            _ => None,
        }
    }
}

/// Parse an `xsd:double` lexical form, including `INF`, `-INF` and `NaN`.
pub fn parse_double(text: &str) -> Option<f64> {
    match text {
        "INF" | "+INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        _ if text.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => None,
        _ => text.parse().ok(),
    }
}

/// Canonical `xsd:decimal` form: no exponent, always a fractional part.
pub fn canonical_decimal(d: &BigDecimal) -> String {
    let (digits, scale) = d.normalized().as_bigint_and_exponent();
    let negative = digits < BigInt::zero();
    let magnitude = digits.magnitude().to_string();

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if scale <= 0 {
        out.push_str(&magnitude);
        if magnitude != "0" {
            out.push_str(&"0".repeat((-scale) as usize));
        }
        out.push_str(".0");
    } else {
        let scale = scale as usize;
        let padded = if magnitude.len() <= scale {
            format!("{}{}", "0".repeat(scale + 1 - magnitude.len()), magnitude)
        } else {
            magnitude
        };
        let (whole, frac) = padded.split_at(padded.len() - scale);
        out.push_str(whole);
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Canonical `xsd:double` form: mantissa with a fractional part and an
/// exponent, as in `1.5E3`.
pub fn canonical_double(d: f64) -> String {
    if d.is_nan() {
        return "NaN".to_string();
    }
    if d.is_infinite() {
        return if d > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    with_fraction(format!("{:E}", d))
}

/// Canonical `xsd:float` form
pub fn canonical_float(f: f32) -> String {
    if f.is_finite() {
        with_fraction(format!("{:E}", f))
    } else {
        canonical_double(f as f64)
    }
}

fn with_fraction(text: String) -> String {
    match text.split_once('E') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            format!("{}.0E{}", mantissa, exponent)
        }
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(text: &str) -> BigDecimal {
        BigDecimal::from_str(text).unwrap()
    }

    #[test]
    fn test_canonical_decimal() {
        assert_eq!(canonical_decimal(&dec("1.50")), "1.5");
        assert_eq!(canonical_decimal(&dec("2")), "2.0");
        assert_eq!(canonical_decimal(&dec("0")), "0.0");
        assert_eq!(canonical_decimal(&dec("-0.05")), "-0.05");
        assert_eq!(canonical_decimal(&dec("1E3")), "1000.0");
    }

    #[test]
    fn test_canonical_double() {
        assert_eq!(canonical_double(2.0), "2.0E0");
        assert_eq!(canonical_double(1500.0), "1.5E3");
        assert_eq!(canonical_double(f64::NEG_INFINITY), "-INF");
        assert_eq!(canonical_double(f64::NAN), "NaN");
    }

    #[test]
    fn test_term_round_trip_canonicalizes() {
        let term = Term::typed("+007", Datatype::xsd_integer());
        let value = ComparableValue::from_term(&term).unwrap();
        assert_eq!(value, ComparableValue::Integer(BigInt::from(7)));
        assert_eq!(value.into_term(), Term::integer(7));

        let odd = Term::typed("seven", Datatype::xsd_integer());
        assert!(matches!(
            ComparableValue::from_term(&odd),
            Some(ComparableValue::Typed { .. })
        ));
    }

    #[test]
    fn test_ebv() {
        assert_eq!(ComparableValue::string("").ebv(), Ok(false));
        assert_eq!(ComparableValue::Integer(BigInt::from(3)).ebv(), Ok(true));
        assert_eq!(ComparableValue::Double(f64::NAN).ebv(), Ok(false));
        assert!(ComparableValue::Iri(Arc::from("http://x")).ebv().is_err());
    }
}
