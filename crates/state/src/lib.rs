//! Lunar runtime state: an operand stack with an index-addressed API and
//! the operators that work on it.
//!
//! # Usage
//!
//! ```
//! use lunar_common::Value;
//! use lunar_state::{ArithOp, CompareOp, State};
//!
//! let mut state = State::new();
//! state.push_integer(1);
//! state.push_integer(2);
//! state.arith(ArithOp::Add).unwrap();
//! assert_eq!(state.get(-1), Some(&Value::Integer(3)));
//!
//! state.push_number(3.0);
//! assert!(state.compare(1, 2, CompareOp::Eq).unwrap());
//! ```
//!
//! Data-dependent failures (type errors, ordering errors, narrowing
//! failures) are returned as [`RuntimeError`]. Misuse of the stack itself
//! (bad indices, overflow, underflow) panics.

pub mod arith;
pub mod stack;
pub mod state;

pub use arith::{arith_values, concat_values, ArithOp, CompareOp, ALL_ARITH_OPS};
pub use lunar_common::RuntimeError;
pub use stack::{Stack, MAX_STACK, MIN_STACK};
pub use state::State;
