//! Literal datatype IRIs
//!
//! A `Datatype` is only attached to a literal that carries an explicit
//! `^^<iri>` suffix. Plain and language-tagged literals have no datatype;
//! see [`LiteralTag`](crate::LiteralTag).

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Datatype IRIs used by the compiler and the expression evaluator
pub mod iri {
    pub use rdfq_vocab::rdf::LANG_STRING as RDF_LANG_STRING;
    pub use rdfq_vocab::xsd::{
        BOOLEAN as XSD_BOOLEAN, DATE_TIME as XSD_DATE_TIME, DAY_TIME_DURATION as XSD_DAY_TIME_DURATION,
        DECIMAL as XSD_DECIMAL, DOUBLE as XSD_DOUBLE, FLOAT as XSD_FLOAT, INTEGER as XSD_INTEGER,
        STRING as XSD_STRING,
    };
}

/// Expanded datatype IRI of a typed literal
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Datatype(Arc<str>);

impl Datatype {
    /// Create a datatype from an expanded IRI
    pub fn from_iri(iri: impl AsRef<str>) -> Self {
        Datatype(Arc::from(iri.as_ref()))
    }

    /// xsd:string
    pub fn xsd_string() -> Self {
        Self::from_iri(iri::XSD_STRING)
    }

    /// xsd:boolean
    pub fn xsd_boolean() -> Self {
        Self::from_iri(iri::XSD_BOOLEAN)
    }

    /// xsd:integer
    pub fn xsd_integer() -> Self {
        Self::from_iri(iri::XSD_INTEGER)
    }

    /// xsd:decimal
    pub fn xsd_decimal() -> Self {
        Self::from_iri(iri::XSD_DECIMAL)
    }

    /// xsd:double
    pub fn xsd_double() -> Self {
        Self::from_iri(iri::XSD_DOUBLE)
    }

    /// xsd:dateTime
    pub fn xsd_date_time() -> Self {
        Self::from_iri(iri::XSD_DATE_TIME)
    }

    /// xsd:dayTimeDuration
    pub fn xsd_day_time_duration() -> Self {
        Self::from_iri(iri::XSD_DAY_TIME_DURATION)
    }

    /// Get the IRI of this datatype
    pub fn as_iri(&self) -> &str {
        &self.0
    }

    /// Check if this is xsd:integer
    pub fn is_integer(&self) -> bool {
        self.as_iri() == iri::XSD_INTEGER
    }

    /// Check if this is xsd:string
    pub fn is_xsd_string(&self) -> bool {
        self.as_iri() == iri::XSD_STRING
    }

    /// Check if this is one of the numeric types (integer, decimal, float, double)
    pub fn is_numeric(&self) -> bool {
        rdfq_vocab::xsd::is_numeric(self.as_iri())
    }
}

impl std::fmt::Display for Datatype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
