/// Operator dispatch and arithmetic.
///
/// Routes strict binary operators to their handlers and implements `+`, `-`,
/// `*`, `/` and `++`.
pub mod core;

/// Ordering and equality.
///
/// Implements `<`, `<=`, `>`, `>=` on numbers and the total `==` and `!=`.
pub mod comparison;

/// Short-circuit logic.
///
/// Implements `&&` and `||`, which evaluate their right operand only when
/// needed.
pub mod logic;
