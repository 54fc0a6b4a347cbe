use std::fmt;

/// EvalError represents every way a single line can fail to evaluate. All
/// errors are terminal for the line that produced them only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// An operator was applied with fewer than two operands available.
    MissingOperands(char),
    DivisionByZero,
    /// A token classified as an operator did not match `+`, `-`, `*` or `/`.
    UnknownOperator(String),
    /// A close paren had no matching open paren, or an open paren was never
    /// closed.
    MismatchedParen,
    UnresolvedOperators,
    NoResult,
    ExtraData,
    /// The result of applying the operator does not fit in an i64.
    Overflow(char),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOperands(op) => write!(
                f,
                "op {}: empty stack need two arguments: found none.",
                op
            ),
            Self::DivisionByZero => write!(f, "division by zero!"),
            Self::UnknownOperator(op) => write!(f, "unrecognized operator: {}!", op),
            Self::MismatchedParen => write!(f, "mismatched parenthesis!"),
            Self::UnresolvedOperators => write!(f, "not able to process all operations"),
            Self::NoResult => write!(f, "no result!"),
            Self::ExtraData => write!(f, "found data left over!"),
            Self::Overflow(op) => write!(f, "op {}: integer overflow!", op),
        }
    }
}

impl std::error::Error for EvalError {}
