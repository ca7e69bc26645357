/// Call machinery and the table of native functions.
///
/// Evaluates call expressions, enforces arity and the call depth limit, and
/// runs user function bodies in their captured environment.
pub mod core;
/// The `clock` native.
///
/// Reports the seconds elapsed since the context was created.
pub mod clock;
/// The `println` native.
///
/// Writes a value's canonical text to the context's output.
pub mod println;
