//! XSD constructor functions: `xsd:string`, `xsd:integer`, `xsd:decimal`,
//! `xsd:double`, `xsd:float`, `xsd:boolean`

use crate::error::{EvalError, EvalResult};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{FromPrimitive, Zero};
use rdfq_graph_ir::datatype::iri;
use rdfq_graph_ir::Datatype;
use std::str::FromStr;
use std::sync::Arc;

use super::value::{canonical_float, parse_double, ComparableValue};

/// Cast a value to one of the XSD datatypes.
pub fn cast(datatype: &Datatype, value: ComparableValue) -> EvalResult<ComparableValue> {
    let fail = |value: &ComparableValue| {
        EvalError::type_error(format!("cannot cast {:?} to <{}>", value, datatype))
    };

    match datatype.as_iri() {
        iri::XSD_STRING => match value.lexical() {
            Some(text) => Ok(ComparableValue::string(text)),
            None => Err(fail(&value)),
        },

        iri::XSD_INTEGER => match &value {
            ComparableValue::Integer(_) => Ok(value),
            ComparableValue::Decimal(d) => Ok(ComparableValue::Integer(
                d.with_scale(0).as_bigint_and_exponent().0,
            )),
            ComparableValue::Double(d) if d.is_finite() => BigDecimal::from_f64(d.trunc())
                .map(|d| ComparableValue::Integer(d.with_scale(0).as_bigint_and_exponent().0))
                .ok_or_else(|| fail(&value)),
            ComparableValue::Bool(b) => Ok(ComparableValue::Integer(BigInt::from(*b as u8))),
            ComparableValue::String { value: text, lang: None } => {
                let text = text.trim();
                BigInt::from_str(text.strip_prefix('+').unwrap_or(text))
                    .map(ComparableValue::Integer)
                    .map_err(|_| fail(&value))
            }
            _ => Err(fail(&value)),
        },

        iri::XSD_DECIMAL => match &value {
            ComparableValue::Decimal(_) => Ok(value),
            ComparableValue::Integer(n) => Ok(ComparableValue::Decimal(BigDecimal::new(n.clone(), 0))),
            ComparableValue::Double(d) if d.is_finite() => BigDecimal::from_f64(*d)
                .map(ComparableValue::Decimal)
                .ok_or_else(|| fail(&value)),
            ComparableValue::Bool(b) => Ok(ComparableValue::Decimal(BigDecimal::from(*b as u8))),
            ComparableValue::String { value: text, lang: None }
                if !text.contains(['e', 'E']) =>
            {
                BigDecimal::from_str(text.trim())
                    .map(ComparableValue::Decimal)
                    .map_err(|_| fail(&value))
            }
            _ => Err(fail(&value)),
        },

        iri::XSD_DOUBLE | iri::XSD_FLOAT => {
            let number = match &value {
                ComparableValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
                ComparableValue::String { value: text, lang: None } => parse_double(text.trim()),
                other => other.to_f64(),
            };
            match number {
                Some(d) if datatype.as_iri() == iri::XSD_FLOAT => Ok(ComparableValue::Typed {
                    lexical: Arc::from(canonical_float(d as f32)),
                    datatype: datatype.clone(),
                }),
                Some(d) => Ok(ComparableValue::Double(d)),
                None => Err(fail(&value)),
            }
        }

        iri::XSD_BOOLEAN => match &value {
            ComparableValue::Bool(_) => Ok(value),
            ComparableValue::Integer(n) => Ok(ComparableValue::Bool(!n.is_zero())),
            ComparableValue::Decimal(d) => Ok(ComparableValue::Bool(!d.is_zero())),
            ComparableValue::Double(d) => Ok(ComparableValue::Bool(*d != 0.0 && !d.is_nan())),
            ComparableValue::String { value: text, lang: None } => match text.trim() {
                "true" | "1" => Ok(ComparableValue::Bool(true)),
                "false" | "0" => Ok(ComparableValue::Bool(false)),
                _ => Err(fail(&value)),
            },
            _ => Err(fail(&value)),
        },

        _ => Err(fail(&value)),
    }
}
