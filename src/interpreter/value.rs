/// Runtime values.
///
/// Defines the `Value` enum, its canonical text form and the equality used by
/// `==` and `!=`.
pub mod core;
/// Function values.
///
/// Defines closures, which pair a shared declaration with the environment they
/// were created in, and the native functions bound at startup.
pub mod function;
/// Lexical scopes.
///
/// Defines the `Environment` chain used for variable lookup and assignment,
/// and the `EnvironmentRegistry` that breaks reference cycles between scopes
/// and the closures stored in them.
pub mod environment;
