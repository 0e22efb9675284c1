//! Function dispatch - routes FunctionName to the category modules

use crate::ast::{Expression, FunctionName};
use crate::error::EvalResult;

use super::conditional::eval_conditional_function;
use super::datetime::eval_datetime_function;
use super::eval::EvalContext;
use super::hash::eval_hash_function;
use super::numeric::eval_numeric_function;
use super::rdf::eval_rdf_function;
use super::string::eval_string_function;
use super::types::eval_type_function;
use super::uuid::eval_uuid_function;
use super::value::ComparableValue;

impl FunctionName {
    /// Evaluate this function over unevaluated arguments.
    ///
    /// Arguments are passed unevaluated so that `BOUND`, `IF` and `COALESCE`
    /// can decide what to evaluate.
    pub fn eval(
        self,
        args: &[Expression],
        ctx: &EvalContext<'_>,
    ) -> EvalResult<ComparableValue> {
        match self {
            FunctionName::Bound
            | FunctionName::IsIri
            | FunctionName::IsBlank
            | FunctionName::IsLiteral
            | FunctionName::IsNumeric => eval_type_function(self, args, ctx),

            FunctionName::Str
            | FunctionName::Lang
            | FunctionName::Datatype
            | FunctionName::Iri
            | FunctionName::BNode
            | FunctionName::StrDt
            | FunctionName::StrLang
            | FunctionName::SameTerm
            | FunctionName::LangMatches => eval_rdf_function(self, args, ctx),

            FunctionName::Strlen
            | FunctionName::Substr
            | FunctionName::Ucase
            | FunctionName::Lcase
            | FunctionName::StrStarts
            | FunctionName::StrEnds
            | FunctionName::Contains
            | FunctionName::StrBefore
            | FunctionName::StrAfter
            | FunctionName::EncodeForUri
            | FunctionName::Concat
            | FunctionName::Regex
            | FunctionName::Replace => eval_string_function(self, args, ctx),

            FunctionName::Abs
            | FunctionName::Round
            | FunctionName::Ceil
            | FunctionName::Floor
            | FunctionName::Rand => eval_numeric_function(self, args, ctx),

            FunctionName::Now
            | FunctionName::Year
            | FunctionName::Month
            | FunctionName::Day
            | FunctionName::Hours
            | FunctionName::Minutes
            | FunctionName::Seconds
            | FunctionName::Timezone
            | FunctionName::Tz => eval_datetime_function(self, args, ctx),

            FunctionName::Md5
            | FunctionName::Sha1
            | FunctionName::Sha256
            | FunctionName::Sha384
            | FunctionName::Sha512 => eval_hash_function(self, args, ctx),

            FunctionName::Uuid | FunctionName::StrUuid => eval_uuid_function(self, args),

            FunctionName::If | FunctionName::Coalesce => {
                eval_conditional_function(self, args, ctx)
            }
        }
    }
}
