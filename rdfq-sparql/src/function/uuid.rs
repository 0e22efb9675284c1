//! UUID function implementations
//!
//! Implements SPARQL UUID functions: UUID, STRUUID

use crate::ast::{Expression, FunctionName};
use crate::error::EvalResult;
use std::sync::Arc;
use uuid::Uuid;

use super::helpers::check_arity;
use super::value::ComparableValue;

/// Evaluate a UUID function
pub fn eval_uuid_function(name: FunctionName, args: &[Expression]) -> EvalResult<ComparableValue> {
    check_arity(args, 0, name.as_str())?;
    match name {
        FunctionName::Uuid => Ok(ComparableValue::Iri(Arc::from(format!(
            "urn:uuid:{}",
            Uuid::new_v4()
        )))),

        FunctionName::StrUuid => Ok(ComparableValue::string(Uuid::new_v4().to_string())),

        _ => unreachable!("Non-UUID function routed to uuid module: {:?}", name),
    }
}

/// Fresh blank node label, unique across queries
pub(crate) fn fresh_label() -> String {
    format!("b{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_shapes() {
        match eval_uuid_function(FunctionName::Uuid, &[]).unwrap() {
            ComparableValue::Iri(iri) => {
                assert!(iri.starts_with("urn:uuid:"));
                assert_eq!(iri.len(), "urn:uuid:".len() + 36);
            }
            other => panic!("unexpected {other:?}"),
        }
        match eval_uuid_function(FunctionName::StrUuid, &[]).unwrap() {
            ComparableValue::String { value, lang } => {
                assert_eq!(value.len(), 36);
                assert!(lang.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_fresh_labels_differ() {
        assert_ne!(fresh_label(), fresh_label());
    }
}
