use std::io::Write;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            utils::check_arity,
        },
        value::core::Value,
    },
};

/// Writes the canonical text of a value followed by a newline.
///
/// Accepts exactly one argument of any kind. Output goes to the context's
/// sink, which is standard output unless the context was created with
/// another writer.
///
/// # Parameters
/// - `ctx`: The evaluation context that owns the output sink.
/// - `args`: Slice containing one argument.
/// - `line`: Line number for error reporting.
///
/// # Returns
/// `Value::Nil`, or `RuntimeError::Output` if the sink rejects the write.
pub fn println(ctx: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    check_arity(1, args.len(), line)?;

    writeln!(ctx.out, "{}", args[0]).map_err(|err| RuntimeError::Output { details: err.to_string(),
                                                                          line })?;
    Ok(Value::Nil)
}
