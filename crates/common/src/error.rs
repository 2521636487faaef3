//! Runtime errors raised by value operations and operator dispatch.

use thiserror::Error;

/// Errors that occur while operating on runtime values.
///
/// These are data-dependent failures: the operands were well-formed stack
/// values, but their types or magnitudes do not support the operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// An operand's type cannot take part in the attempted action.
    #[error("attempt to {action} a {type_name} value")]
    Type {
        action: &'static str,
        type_name: &'static str,
    },

    /// Relational comparison between types that have no defined order.
    #[error("{}", order_message(.left, .right))]
    Order {
        left: &'static str,
        right: &'static str,
    },

    /// A numeric operand could not be narrowed to an integer.
    #[error("number has no integer representation")]
    NoIntegerRepresentation,

    /// Integer floor division or modulo with a zero divisor.
    #[error("attempt to perform '{op}'")]
    DivideByZero { op: &'static str },
}

impl RuntimeError {
    /// Arithmetic failure naming the offending operand's type.
    pub fn arithmetic(type_name: &'static str) -> Self {
        Self::Type {
            action: "perform arithmetic on",
            type_name,
        }
    }

    /// Bitwise failure naming the offending operand's type.
    pub fn bitwise(type_name: &'static str) -> Self {
        Self::Type {
            action: "perform bitwise operation on",
            type_name,
        }
    }

    /// Concatenation failure naming the offending operand's type.
    pub fn concatenate(type_name: &'static str) -> Self {
        Self::Type {
            action: "concatenate",
            type_name,
        }
    }

    /// Length failure naming the offending operand's type.
    pub fn length(type_name: &'static str) -> Self {
        Self::Type {
            action: "get length of",
            type_name,
        }
    }
}

fn order_message(left: &str, right: &str) -> String {
    if left == right {
        format!("attempt to compare two {left} values")
    } else {
        format!("attempt to compare {left} with {right}")
    }
}
