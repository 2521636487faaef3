//! Operator dispatch: arithmetic, bitwise, comparison, concatenation and
//! length.
//!
//! Each arithmetic operator maps to a [`Kernel`] that decides which domain
//! it evaluates in:
//!
//! - bitwise operators narrow both operands to integers
//! - `/` and `^` always evaluate in floating point
//! - everything else stays in integers when both raw operands are integers
//!   and falls back to floating point otherwise

use std::rc::Rc;

use lunar_common::number;
use lunar_common::{RuntimeError, Value};
use tracing::trace;

use crate::state::State;

/// Arithmetic and bitwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Mod,
    Pow,
    Div,
    IDiv,
    BAnd,
    BOr,
    BXor,
    Shl,
    Shr,
    Unm,
    BNot,
}

/// All arithmetic operators, in operator-code order.
pub const ALL_ARITH_OPS: [ArithOp; 14] = [
    ArithOp::Add,
    ArithOp::Sub,
    ArithOp::Mul,
    ArithOp::Mod,
    ArithOp::Pow,
    ArithOp::Div,
    ArithOp::IDiv,
    ArithOp::BAnd,
    ArithOp::BOr,
    ArithOp::BXor,
    ArithOp::Shl,
    ArithOp::Shr,
    ArithOp::Unm,
    ArithOp::BNot,
];

/// Relational operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Lt,
    Le,
}

type IntFn = fn(i64, i64) -> Result<i64, RuntimeError>;
type FloatFn = fn(f64, f64) -> f64;

/// Evaluation strategy of an operator.
#[derive(Clone, Copy)]
enum Kernel {
    /// Integers only; operands are narrowed first.
    Bitwise(fn(i64, i64) -> i64),
    /// Floats only; operands are widened first.
    Float(FloatFn),
    /// Integer path for integer pairs, float path otherwise.
    Mixed(IntFn, FloatFn),
}

impl ArithOp {
    /// True for operators that take a single operand.
    pub fn is_unary(self) -> bool {
        matches!(self, ArithOp::Unm | ArithOp::BNot)
    }

    /// True for operators that only accept integer-representable operands.
    pub fn is_bitwise(self) -> bool {
        matches!(self.kernel(), Kernel::Bitwise(_))
    }

    /// Source-level symbol of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Mod => "%",
            ArithOp::Pow => "^",
            ArithOp::Div => "/",
            ArithOp::IDiv => "//",
            ArithOp::BAnd => "&",
            ArithOp::BOr => "|",
            ArithOp::BXor => "~",
            ArithOp::Shl => "<<",
            ArithOp::Shr => ">>",
            ArithOp::Unm => "-",
            ArithOp::BNot => "~",
        }
    }

    fn kernel(self) -> Kernel {
        match self {
            ArithOp::Add => Kernel::Mixed(|a, b| Ok(a.wrapping_add(b)), |a, b| a + b),
            ArithOp::Sub => Kernel::Mixed(|a, b| Ok(a.wrapping_sub(b)), |a, b| a - b),
            ArithOp::Mul => Kernel::Mixed(|a, b| Ok(a.wrapping_mul(b)), |a, b| a * b),
            ArithOp::Mod => Kernel::Mixed(
                |a, b| match b {
                    0 => Err(RuntimeError::DivideByZero { op: "n%%0" }),
                    _ => Ok(number::imod(a, b)),
                },
                number::fmod,
            ),
            ArithOp::Pow => Kernel::Float(f64::powf),
            ArithOp::Div => Kernel::Float(|a, b| a / b),
            ArithOp::IDiv => Kernel::Mixed(
                |a, b| match b {
                    0 => Err(RuntimeError::DivideByZero { op: "n//0" }),
                    _ => Ok(number::ifloor_div(a, b)),
                },
                number::ffloor_div,
            ),
            ArithOp::BAnd => Kernel::Bitwise(|a, b| a & b),
            ArithOp::BOr => Kernel::Bitwise(|a, b| a | b),
            ArithOp::BXor => Kernel::Bitwise(|a, b| a ^ b),
            ArithOp::Shl => Kernel::Bitwise(number::shift_left),
            ArithOp::Shr => Kernel::Bitwise(number::shift_right),
            ArithOp::Unm => Kernel::Mixed(|a, _| Ok(a.wrapping_neg()), |a, _| -a),
            ArithOp::BNot => Kernel::Bitwise(|a, _| !a),
        }
    }
}

/// Apply `op` to two values. Unary operators ignore `b`'s role and are
/// expected to receive the operand twice.
pub fn arith_values(op: ArithOp, a: &Value, b: &Value) -> Result<Value, RuntimeError> {
    match op.kernel() {
        Kernel::Bitwise(f) => match (a.to_integer(), b.to_integer()) {
            (Some(x), Some(y)) => Ok(Value::Integer(f(x, y))),
            _ => Err(bitwise_error(a, b)),
        },
        Kernel::Float(f) => float_arith(f, a, b),
        Kernel::Mixed(int, float) => match (a, b) {
            (Value::Integer(x), Value::Integer(y)) => int(*x, *y).map(Value::Integer),
            _ => float_arith(float, a, b),
        },
    }
}

fn float_arith(f: FloatFn, a: &Value, b: &Value) -> Result<Value, RuntimeError> {
    match (a.to_number(), b.to_number()) {
        (Some(x), Some(y)) => Ok(Value::Float(f(x, y))),
        (None, _) => Err(RuntimeError::arithmetic(a.type_name())),
        (Some(_), None) => Err(RuntimeError::arithmetic(b.type_name())),
    }
}

// Two numbers that failed to narrow are a representation problem; otherwise
// the non-numeric operand is named, the left one first.
fn bitwise_error(a: &Value, b: &Value) -> RuntimeError {
    match (a.is_number(), b.is_number()) {
        (true, true) => RuntimeError::NoIntegerRepresentation,
        (false, _) => RuntimeError::bitwise(a.type_name()),
        (true, false) => RuntimeError::bitwise(b.type_name()),
    }
}

/// Concatenate two values after coercing both to strings.
pub fn concat_values(a: &Value, b: &Value) -> Result<Value, RuntimeError> {
    match (a.to_text(), b.to_text()) {
        (Some(x), Some(y)) => {
            let mut bytes = Vec::with_capacity(x.len() + y.len());
            bytes.extend_from_slice(&x);
            bytes.extend_from_slice(&y);
            Ok(Value::String(Rc::from(bytes)))
        }
        (None, _) => Err(RuntimeError::concatenate(a.type_name())),
        (Some(_), None) => Err(RuntimeError::concatenate(b.type_name())),
    }
}

impl State {
    /// Pop the operand(s) of `op`, evaluate, and push the result.
    ///
    /// Operands are consumed even when evaluation fails.
    pub fn arith(&mut self, op: ArithOp) -> Result<(), RuntimeError> {
        let b = self.stack.pop();
        let a = if op.is_unary() {
            b.clone()
        } else {
            self.stack.pop()
        };
        let result = arith_values(op, &a, &b)?;
        trace!(op = op.symbol(), %a, %b, %result, "arith");
        self.stack.push(result);
        Ok(())
    }

    /// Compare the values at two indices without popping them.
    ///
    /// An index that does not name a live slot makes the comparison false.
    pub fn compare(&self, idx1: isize, idx2: isize, op: CompareOp) -> Result<bool, RuntimeError> {
        let (Some(a), Some(b)) = (self.stack.lookup(idx1), self.stack.lookup(idx2)) else {
            return Ok(false);
        };
        match op {
            CompareOp::Eq => Ok(a.equals(b)),
            CompareOp::Lt => a.less_than(b),
            CompareOp::Le => a.less_equal(b),
        }
    }

    /// Pop `n` values and push their concatenation.
    ///
    /// `n == 0` pushes an empty string; `n == 1` leaves the stack unchanged.
    pub fn concat(&mut self, n: usize) -> Result<(), RuntimeError> {
        match n {
            0 => self.stack.push(Value::string("")),
            1 => {}
            _ => {
                let mut acc = self.stack.pop();
                for _ in 1..n {
                    let left = self.stack.pop();
                    acc = concat_values(&left, &acc)?;
                }
                self.stack.push(acc);
            }
        }
        Ok(())
    }

    /// Push the byte length of the string at `idx`.
    pub fn len(&mut self, idx: isize) -> Result<(), RuntimeError> {
        let len = match self.stack.get(idx) {
            Some(Value::String(s)) => s.len() as i64,
            Some(other) => return Err(RuntimeError::length(other.type_name())),
            None => return Err(RuntimeError::length(lunar_common::TypeTag::None.name())),
        };
        self.stack.push(Value::Integer(len));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(op: ArithOp, a: Value, b: Value) -> Result<Value, RuntimeError> {
        arith_values(op, &a, &b)
    }

    #[test]
    fn integer_pairs_stay_integer() {
        assert_eq!(eval(ArithOp::Add, Value::Integer(1), Value::Integer(2)), Ok(Value::Integer(3)));
        assert_eq!(eval(ArithOp::Mul, Value::Integer(6), Value::Integer(7)), Ok(Value::Integer(42)));
        assert_eq!(eval(ArithOp::IDiv, Value::Integer(7), Value::Integer(2)), Ok(Value::Integer(3)));
        assert_eq!(eval(ArithOp::Mod, Value::Integer(-7), Value::Integer(3)), Ok(Value::Integer(2)));
    }

    #[test]
    fn mixed_pairs_promote_to_float() {
        assert_eq!(eval(ArithOp::Add, Value::Integer(1), Value::Float(2.5)), Ok(Value::Float(3.5)));
        assert_eq!(
            eval(ArithOp::Sub, Value::string("10"), Value::Integer(4)),
            Ok(Value::Float(6.0))
        );
        assert_eq!(eval(ArithOp::IDiv, Value::Float(7.0), Value::Integer(2)), Ok(Value::Float(3.0)));
    }

    #[test]
    fn divide_and_power_are_float_only() {
        assert_eq!(eval(ArithOp::Div, Value::Integer(7), Value::Integer(2)), Ok(Value::Float(3.5)));
        assert_eq!(eval(ArithOp::Pow, Value::Integer(2), Value::Integer(10)), Ok(Value::Float(1024.0)));
        assert_eq!(eval(ArithOp::Div, Value::Integer(1), Value::Integer(0)), Ok(Value::Float(f64::INFINITY)));
    }

    #[test]
    fn integer_division_by_zero() {
        assert_eq!(
            eval(ArithOp::IDiv, Value::Integer(1), Value::Integer(0)),
            Err(RuntimeError::DivideByZero { op: "n//0" })
        );
        assert_eq!(
            eval(ArithOp::Mod, Value::Integer(1), Value::Integer(0)),
            Err(RuntimeError::DivideByZero { op: "n%%0" })
        );
        // The float path has no such restriction.
        assert!(matches!(
            eval(ArithOp::Mod, Value::Float(1.0), Value::Integer(0)),
            Ok(Value::Float(f)) if f.is_nan()
        ));
    }

    #[test]
    fn integer_overflow_wraps() {
        assert_eq!(
            eval(ArithOp::Add, Value::Integer(i64::MAX), Value::Integer(1)),
            Ok(Value::Integer(i64::MIN))
        );
        assert_eq!(
            eval(ArithOp::Unm, Value::Integer(i64::MIN), Value::Integer(i64::MIN)),
            Ok(Value::Integer(i64::MIN))
        );
    }

    #[test]
    fn bitwise_narrows_operands() {
        assert_eq!(eval(ArithOp::BAnd, Value::Integer(6), Value::Float(3.0)), Ok(Value::Integer(2)));
        assert_eq!(
            eval(ArithOp::BOr, Value::string("4"), Value::Integer(1)),
            Ok(Value::Integer(5))
        );
        assert_eq!(eval(ArithOp::Shl, Value::Integer(1), Value::Integer(4)), Ok(Value::Integer(16)));
        assert_eq!(eval(ArithOp::Shr, Value::Integer(-1), Value::Integer(63)), Ok(Value::Integer(1)));
        assert_eq!(eval(ArithOp::BNot, Value::Float(2.0), Value::Float(2.0)), Ok(Value::Integer(!2)));
    }

    #[test]
    fn bitwise_errors() {
        assert_eq!(
            eval(ArithOp::BNot, Value::Float(2.5), Value::Float(2.5)),
            Err(RuntimeError::NoIntegerRepresentation)
        );
        assert_eq!(
            eval(ArithOp::BAnd, Value::Integer(1), Value::string("1.5")),
            Err(RuntimeError::NoIntegerRepresentation)
        );
        assert_eq!(
            eval(ArithOp::BXor, Value::Nil, Value::Float(1.5)),
            Err(RuntimeError::bitwise("nil"))
        );
        assert_eq!(
            eval(ArithOp::BXor, Value::Float(1.5), Value::Boolean(true)),
            Err(RuntimeError::bitwise("boolean"))
        );
        assert_eq!(
            eval(ArithOp::Shl, Value::Nil, Value::Boolean(true)),
            Err(RuntimeError::bitwise("nil"))
        );
    }

    #[test]
    fn arithmetic_errors_name_first_failing_operand() {
        assert_eq!(
            eval(ArithOp::Add, Value::string("x"), Value::Integer(1)),
            Err(RuntimeError::arithmetic("string"))
        );
        assert_eq!(
            eval(ArithOp::Add, Value::Integer(1), Value::Nil),
            Err(RuntimeError::arithmetic("nil"))
        );
        assert_eq!(
            eval(ArithOp::Div, Value::Boolean(true), Value::Nil),
            Err(RuntimeError::arithmetic("boolean"))
        );
    }

    #[test]
    fn concat_values_coerces_numbers() {
        assert_eq!(
            concat_values(&Value::string("a"), &Value::Integer(1)),
            Ok(Value::string("a1"))
        );
        assert_eq!(
            concat_values(&Value::Float(1.0), &Value::string("x")),
            Ok(Value::string("1.0x"))
        );
        assert_eq!(
            concat_values(&Value::Nil, &Value::Boolean(true)),
            Err(RuntimeError::concatenate("nil"))
        );
        assert_eq!(
            concat_values(&Value::string("a"), &Value::Boolean(true)),
            Err(RuntimeError::concatenate("boolean"))
        );
    }

    #[test]
    fn state_arith_consumes_operands() {
        let mut state = State::new();
        state.push_integer(10);
        state.push_integer(1);
        state.push_integer(2);
        state.arith(ArithOp::Add).unwrap();
        assert_eq!(state.get_top(), 2);
        assert_eq!(state.get(-1), Some(&Value::Integer(3)));

        state.push_nil();
        assert!(state.arith(ArithOp::Sub).is_err());
        assert_eq!(state.get_top(), 1);
    }

    #[test]
    fn unary_consumes_one_operand() {
        let mut state = State::new();
        state.push_integer(1);
        state.push_number(2.5);
        state.arith(ArithOp::Unm).unwrap();
        assert_eq!(state.get_top(), 2);
        assert_eq!(state.get(-1), Some(&Value::Float(-2.5)));
    }

    #[test]
    fn compare_out_of_range_is_false() {
        let mut state = State::new();
        state.push_integer(1);
        assert_eq!(state.compare(1, 2, CompareOp::Eq), Ok(false));
        assert_eq!(state.compare(1, 100, CompareOp::Lt), Ok(false));
        assert_eq!(state.compare(-5, 1, CompareOp::Le), Ok(false));
        assert_eq!(state.compare(1, 1, CompareOp::Le), Ok(true));
    }

    #[test]
    fn compare_orders() {
        let mut state = State::new();
        state.push_integer(1);
        state.push_number(2.0);
        state.push_boolean(true);
        assert_eq!(state.compare(1, 2, CompareOp::Lt), Ok(true));
        assert_eq!(state.compare(2, 1, CompareOp::Le), Ok(false));
        assert_eq!(
            state.compare(3, 3, CompareOp::Lt),
            Err(RuntimeError::Order {
                left: "boolean",
                right: "boolean"
            })
        );
        assert_eq!(state.compare(3, 3, CompareOp::Eq), Ok(true));
    }

    #[test]
    fn concat_counts() {
        let mut state = State::new();
        state.concat(0).unwrap();
        assert_eq!(state.get(-1), Some(&Value::string("")));

        state.push_string("x");
        state.concat(1).unwrap();
        assert_eq!(state.get_top(), 2);

        state.push_integer(1);
        state.push_number(2.0);
        state.concat(3).unwrap();
        assert_eq!(state.get_top(), 2);
        assert_eq!(state.get(-1), Some(&Value::string("x12.0")));
    }

    #[test]
    fn len_of_strings_only() {
        let mut state = State::new();
        state.push_string("hello");
        state.push_integer(5);
        state.len(1).unwrap();
        assert_eq!(state.get(-1), Some(&Value::Integer(5)));
        assert_eq!(state.len(2), Err(RuntimeError::length("number")));
        assert_eq!(state.len(10), Err(RuntimeError::length("no value")));
    }

    #[test]
    fn unary_and_bitwise_classification() {
        for op in ALL_ARITH_OPS {
            assert_eq!(op.is_unary(), matches!(op, ArithOp::Unm | ArithOp::BNot));
        }
        assert!(ArithOp::Shl.is_bitwise());
        assert!(!ArithOp::IDiv.is_bitwise());
    }
}
