//! A two-stack shunting-yard evaluator. Operands and pending operators are
//! kept on separate stacks and reduced as soon as precedence allows, so no
//! expression tree is ever built.

use log::trace;

use crate::lexer::{OperatorMode, Scanner, Token};

mod error;
pub mod stack;

pub use error::EvalError;
use stack::Stack;

pub type EvalResult<T> = Result<T, EvalError>;

/// An entry on the operator stack. Close parens are never stored, they only
/// trigger a reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    OpenParen,
    Operator(char),
}

impl core::fmt::Display for Pending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenParen => write!(f, "("),
            Self::Operator(op) => write!(f, "{}", op),
        }
    }
}

/// Returns the binding priority of an operator symbol. Unrecognized symbols
/// bind loosest and are rejected once applied.
fn priority(op: char) -> u8 {
    match op {
        '*' | '/' => 2,
        '+' | '-' => 1,
        _ => 0,
    }
}

/// Pops the right and then the left operand, applies `left op right` and
/// pushes the result back onto the operand stack.
///
/// Division truncates toward zero, matching the native behavior of Rust's
/// signed integer division.
fn apply_operator(op: char, operands: &mut Stack<i64>) -> EvalResult<()> {
    let rhs = operands.pop_mut().ok_or(EvalError::MissingOperands(op))?;
    let lhs = operands.pop_mut().ok_or(EvalError::MissingOperands(op))?;

    let result = match (op, lhs, rhs) {
        ('+', l, r) => l.checked_add(r).ok_or(EvalError::Overflow(op)),
        ('-', l, r) => l.checked_sub(r).ok_or(EvalError::Overflow(op)),
        ('*', l, r) => l.checked_mul(r).ok_or(EvalError::Overflow(op)),
        ('/', _, 0) => Err(EvalError::DivisionByZero),
        ('/', l, r) => l.checked_div(r).ok_or(EvalError::Overflow(op)),
        (other, _, _) => Err(EvalError::UnknownOperator(other.to_string())),
    }?;

    trace!("reduced {} {} {} = {}", lhs, op, rhs, result);
    operands.push_mut(result);
    Ok(())
}

/// Evaluator owns the operand and operator stacks for one line at a time.
/// It can be reused across lines; both stacks are emptied before
/// `evaluate_line` returns.
#[derive(Debug, Default)]
pub struct Evaluator {
    mode: OperatorMode,
    operands: Stack<i64>,
    operators: Stack<Pending>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: OperatorMode) -> Self {
        self.mode = mode;
        self
    }

    /// A view of the operand stack, bottom first.
    pub fn operands(&self) -> &[i64] {
        self.operands.as_ref()
    }

    /// A view of the operator stack, bottom first.
    pub fn operators(&self) -> &[Pending] {
        self.operators.as_ref()
    }

    /// Evaluates a single line, returning its integer result.
    pub fn evaluate_line(&mut self, line: &str) -> EvalResult<i64> {
        let res = self.process_mut(line).and_then(|_| self.finish_mut());
        self.reset_mut();
        res
    }

    /// Dispatches every token on the line, stopping at the first failure.
    fn process_mut(&mut self, line: &str) -> EvalResult<()> {
        for token in Scanner::new(line).with_mode(self.mode) {
            self.dispatch_mut(token?)?;
        }

        Ok(())
    }

    fn dispatch_mut(&mut self, token: Token) -> EvalResult<()> {
        trace!("dispatching {}", token);

        match token {
            Token::IntLiteral(val) => {
                self.operands.push_mut(val);
                Ok(())
            }
            Token::LParen => {
                self.operators.push_mut(Pending::OpenParen);
                Ok(())
            }
            Token::RParen => self.reduce_paren_mut(),
            Token::Operator(op) => self.resolve_precedence_mut(op),
        }
    }

    /// Reduces every stacked operator of equal or higher priority than
    /// `new_op`, stopping at an open paren, before pushing `new_op`.
    fn resolve_precedence_mut(&mut self, new_op: char) -> EvalResult<()> {
        while let Some(&Pending::Operator(prev_op)) = self.operators.peek() {
            if priority(prev_op) < priority(new_op) {
                break;
            }

            self.operators.pop_mut();
            apply_operator(prev_op, &mut self.operands)?;
        }

        self.operators.push_mut(Pending::Operator(new_op));
        Ok(())
    }

    /// Reduces the operators back to the most recent open paren, consuming it.
    fn reduce_paren_mut(&mut self) -> EvalResult<()> {
        loop {
            match self.operators.pop_mut() {
                Some(Pending::OpenParen) => return Ok(()),
                Some(Pending::Operator(op)) => apply_operator(op, &mut self.operands)?,
                None => return Err(EvalError::MismatchedParen),
            }
        }
    }

    /// Drains the remaining operators and extracts the single result.
    fn finish_mut(&mut self) -> EvalResult<i64> {
        trace!("operands: {}", self.operands);
        trace!("operators: {}", self.operators);

        while let Some(pending) = self.operators.pop_mut() {
            match pending {
                // an open paren that survives to the end of the line was never closed.
                Pending::OpenParen => return Err(EvalError::MismatchedParen),
                Pending::Operator(op) => apply_operator(op, &mut self.operands)?,
            }
        }

        if !self.operators.empty() {
            return Err(EvalError::UnresolvedOperators);
        }

        match self.operands.pop_mut() {
            None => Err(EvalError::NoResult),
            Some(_) if !self.operands.empty() => Err(EvalError::ExtraData),
            Some(result) => Ok(result),
        }
    }

    fn reset_mut(&mut self) {
        let operands = self.operands.drain_mut();
        let operators = self.operators.drain_mut();

        if operands + operators > 0 {
            trace!(
                "released {} operands and {} operators",
                operands,
                operators
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(input: &str) -> EvalResult<i64> {
        Evaluator::new().evaluate_line(input)
    }

    #[test]
    fn should_evaluate_single_operand() {
        assert_eq!(Ok(42), eval("42"));
        assert_eq!(Ok(-42), eval("-42"));
    }

    #[test]
    fn should_reduce_equal_priority_left_to_right() {
        let input_expected = [
            ("6 - 3 - 2", 1),
            ("2 * 3 / 4", 1),
            ("24 / 4 / 3", 2),
            ("1 - 2 + 3", 2),
        ];

        for (input, expected) in input_expected {
            assert_eq!(Ok(expected), eval(input), "{}", input);
        }
    }

    #[test]
    fn should_reduce_higher_priority_first() {
        let input_expected = [
            ("2 + 3 * 4", 14),
            ("2 * 3 + 4", 10),
            ("10 - 6 / 2", 7),
            ("1 + 2 * 3 - 4 / 2", 5),
        ];

        for (input, expected) in input_expected {
            assert_eq!(Ok(expected), eval(input), "{}", input);
        }
    }

    #[test]
    fn should_override_priority_with_parens() {
        let input_expected = [
            ("( 2 + 3 ) * 4", 20),
            ("2 * ( 3 + 4 )", 14),
            ("( ( 1 + 2 ) * ( 3 + 4 ) )", 21),
            ("6 - ( 3 - 2 )", 5),
            ("( 7 )", 7),
        ];

        for (input, expected) in input_expected {
            assert_eq!(Ok(expected), eval(input), "{}", input);
        }
    }

    #[test]
    fn should_truncate_division_toward_zero() {
        assert_eq!(Ok(3), eval("7 / 2"));
        assert_eq!(Ok(-3), eval("-7 / 2"));
        assert_eq!(Ok(-3), eval("7 / -2"));
        assert_eq!(Ok(3), eval("-7 / -2"));
    }

    #[test]
    fn should_fail_on_division_by_zero() {
        assert_eq!(Err(EvalError::DivisionByZero), eval("5 / 0"));
        assert_eq!(Err(EvalError::DivisionByZero), eval("5 / ( 2 - 2 )"));
    }

    #[test]
    fn should_fail_when_operands_are_missing() {
        assert_eq!(Err(EvalError::MissingOperands('+')), eval("+"));
        assert_eq!(Err(EvalError::MissingOperands('*')), eval("3 *"));
        assert_eq!(Err(EvalError::MissingOperands('-')), eval("( 1 - ) + 2"));
    }

    #[test]
    fn should_fail_on_unknown_operator_once_applied() {
        assert_eq!(
            Err(EvalError::UnknownOperator("%".to_string())),
            eval("7 % 2")
        );
        assert_eq!(Err(EvalError::MissingOperands('%')), eval("%"));
        assert_eq!(
            Err(EvalError::UnknownOperator("x".to_string())),
            eval("( 2 x 3 ) + 1")
        );
    }

    #[test]
    fn should_fail_on_mismatched_parens() {
        assert_eq!(Err(EvalError::MismatchedParen), eval("( 1 + 2"));
        assert_eq!(Err(EvalError::MismatchedParen), eval("1 + 2 )"));
        assert_eq!(Err(EvalError::MismatchedParen), eval(")"));
    }

    #[test]
    fn should_abort_at_the_first_failing_token() {
        // the division by zero after the stray paren is never reached.
        assert_eq!(Err(EvalError::MismatchedParen), eval("1 ) 5 / 0"));
        assert_eq!(Err(EvalError::MissingOperands('+')), eval("+ 1 ) ("));
    }

    #[test]
    fn should_validate_final_stack_state() {
        assert_eq!(Err(EvalError::NoResult), eval(""));
        assert_eq!(Err(EvalError::NoResult), eval("( )"));
        assert_eq!(Err(EvalError::ExtraData), eval("3 4"));
        assert_eq!(Err(EvalError::ExtraData), eval("1 ( 2 + 3 )"));
    }

    #[test]
    fn should_apply_trailing_operator_during_drain() {
        assert_eq!(Ok(7), eval("3 4 +"));
        assert_eq!(Err(EvalError::MissingOperands('+')), eval("3 + +"));
    }

    #[test]
    fn should_fail_on_overflow() {
        assert_eq!(
            Err(EvalError::Overflow('+')),
            eval("9223372036854775807 + 1")
        );
        assert_eq!(
            Err(EvalError::Overflow('*')),
            eval("4611686018427387904 * 2")
        );
        assert_eq!(
            Err(EvalError::Overflow('/')),
            eval("-9223372036854775808 / -1")
        );
    }

    #[test]
    fn should_honor_operator_mode() {
        assert_eq!(Ok(6), eval("2 ** 3"));
        assert_eq!(
            Err(EvalError::UnknownOperator("**".to_string())),
            Evaluator::new()
                .with_mode(OperatorMode::Strict)
                .evaluate_line("2 ** 3")
        );
    }

    #[test]
    fn should_leave_both_stacks_empty_on_every_outcome() {
        let inputs = [
            "( 2 + 3 ) * 4",
            "5 / 0",
            "( 1 + 2",
            "1 + 2 )",
            "+",
            "3 4",
            "",
            "1 ) 5 / 0",
            "( ( ( 1",
            "7 % 2",
        ];
        let mut evaluator = Evaluator::new();

        for input in inputs {
            let _ = evaluator.evaluate_line(input);

            assert!(evaluator.operands().is_empty(), "{}", input);
            assert!(evaluator.operators().is_empty(), "{}", input);
        }
    }

    #[test]
    fn should_not_leak_state_between_lines() {
        let mut evaluator = Evaluator::new();

        assert_eq!(Err(EvalError::MismatchedParen), evaluator.evaluate_line("( 1"));
        assert_eq!(Ok(7), evaluator.evaluate_line("3 + 4"));
        assert_eq!(Ok(7), evaluator.evaluate_line("3 + 4"));
    }
}
