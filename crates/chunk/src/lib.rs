//! Lunar chunk loader: validates a precompiled chunk header and builds the
//! prototype tree it encodes.
//!
//! # Usage
//!
//! ```
//! use lunar_chunk::{dump, undump, ByteOrder, Prototype};
//!
//! let main = Prototype {
//!     is_vararg: true,
//!     max_stack_size: 2,
//!     ..Prototype::default()
//! };
//! let bytes = dump(&main, ByteOrder::Little).unwrap();
//! assert_eq!(undump(&bytes).unwrap(), main);
//! ```
//!
//! Every failure is returned as an [`UndumpError`]; loading never panics on
//! malformed input.

pub mod dump;
pub mod error;
pub mod header;
pub mod proto;
mod reader;
pub mod undump;

pub use dump::dump;
pub use error::{DumpError, UndumpError};
pub use header::ByteOrder;
pub use proto::{LocVar, Prototype, Upvalue};
pub use undump::{undump, undump_from};
