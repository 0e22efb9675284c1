//! Hash function implementations
//!
//! Implements SPARQL hash functions: MD5, SHA1, SHA256, SHA384, SHA512

use crate::ast::{Expression, FunctionName};
use crate::error::{EvalError, EvalResult};
use md5::{Digest, Md5};
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};

use super::eval::EvalContext;
use super::helpers::{check_arity, string_arg};
use super::value::ComparableValue;

/// Evaluate a hash function
pub fn eval_hash_function(
    name: FunctionName,
    args: &[Expression],
    ctx: &EvalContext<'_>,
) -> EvalResult<ComparableValue> {
    match name {
        FunctionName::Md5 => eval_hash::<Md5>(args, ctx, "MD5"),
        FunctionName::Sha1 => eval_hash::<Sha1>(args, ctx, "SHA1"),
        FunctionName::Sha256 => eval_hash::<Sha256>(args, ctx, "SHA256"),
        FunctionName::Sha384 => eval_hash::<Sha384>(args, ctx, "SHA384"),
        FunctionName::Sha512 => eval_hash::<Sha512>(args, ctx, "SHA512"),
        _ => unreachable!("Non-hash function routed to hash module: {:?}", name),
    }
}

/// Lowercase hex digest of a simple string
fn eval_hash<D: Digest>(
    args: &[Expression],
    ctx: &EvalContext<'_>,
    fn_name: &'static str,
) -> EvalResult<ComparableValue> {
    check_arity(args, 1, fn_name)?;
    let input = string_arg(&args[0], ctx, fn_name)?;
    if input.lang.is_some() {
        return Err(EvalError::type_error(format!(
            "{} of a language-tagged string",
            fn_name
        )));
    }
    let mut hasher = D::new();
    hasher.update(input.value.as_bytes());
    let digest = hasher.finalize();
    Ok(ComparableValue::string(
        digest.iter().map(|b| format!("{:02x}", b)).collect::<String>(),
    ))
}
