//! Lunar common types: values, numeric semantics and instruction words.
//!
//! This crate provides the leaf components shared by the runtime state and
//! the chunk loader:
//!
//! - [`Value`] — the five runtime value kinds and their coercions
//! - [`TypeTag`] — logical type codes and names
//! - [`number`] — floor division, modulo, shifts, narrowing and parsing
//! - [`Instruction`] — the 32-bit instruction word and its four layouts
//! - [`Opcode`] / [`OPCODE_TABLE`] — per-opcode metadata
//! - [`RuntimeError`] — type, order and integer-representation failures

pub mod error;
pub mod instruction;
pub mod number;
pub mod opcode;
pub mod type_tag;
pub mod value;

// Re-export commonly used types at the crate root.
pub use error::RuntimeError;
pub use instruction::Instruction;
pub use opcode::{OpArgMode, OpMode, Opcode, OpcodeInfo, OPCODE_TABLE};
pub use type_tag::TypeTag;
pub use value::Value;
