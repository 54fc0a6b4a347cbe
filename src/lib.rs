pub mod driver;
pub mod eval;
pub mod lexer;

pub use eval::{EvalError, EvalResult, Evaluator};
pub use lexer::OperatorMode;

/// evaluate a single whitespace-tokenized infix expression with fresh
/// stacks, truncating multi-character operators.
pub fn evaluate(line: &str) -> EvalResult<i64> {
    evaluate_with_mode(line, OperatorMode::Lenient)
}

/// evaluate a single line with the given operator classification mode.
pub fn evaluate_with_mode(line: &str, mode: OperatorMode) -> EvalResult<i64> {
    Evaluator::new().with_mode(mode).evaluate_line(line)
}
