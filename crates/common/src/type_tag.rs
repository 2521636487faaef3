//! Basic type tags for runtime values.
//!
//! The numbering matches the Lua 5.3 type codes, including the types
//! this crate never produces (tables, functions, userdata, threads), so
//! tags stay comparable with data produced elsewhere.

/// Identifies the logical type of a value or stack slot.
///
/// Integer and float values share [`TypeTag::Number`]. [`TypeTag::None`]
/// marks an empty slot past the top of the stack.
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeTag {
    /// No value (lookup past the logical top of the stack).
    None = -1,
    Nil = 0,
    Boolean = 1,
    LightUserdata = 2,
    Number = 3,
    String = 4,
    Table = 5,
    Function = 6,
    Userdata = 7,
    Thread = 8,
}

/// All type tags, in numeric order.
pub const ALL_TYPE_TAGS: [TypeTag; 10] = [
    TypeTag::None,
    TypeTag::Nil,
    TypeTag::Boolean,
    TypeTag::LightUserdata,
    TypeTag::Number,
    TypeTag::String,
    TypeTag::Table,
    TypeTag::Function,
    TypeTag::Userdata,
    TypeTag::Thread,
];

impl TypeTag {
    /// Returns the user-facing type name.
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::None => "no value",
            TypeTag::Nil => "nil",
            TypeTag::Boolean => "boolean",
            TypeTag::LightUserdata | TypeTag::Userdata => "userdata",
            TypeTag::Number => "number",
            TypeTag::String => "string",
            TypeTag::Table => "table",
            TypeTag::Function => "function",
            TypeTag::Thread => "thread",
        }
    }

    /// True for `None` and `Nil`.
    pub fn is_none_or_nil(&self) -> bool {
        *self <= TypeTag::Nil
    }
}
