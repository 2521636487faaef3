//! The runtime state: stack manipulation, pushes, queries and conversions.
//!
//! Operator dispatch (arithmetic, comparison, concatenation, length) lives
//! in [`crate::arith`].

use std::rc::Rc;

use lunar_common::{TypeTag, Value};

use crate::stack::Stack;

/// An execution context owning one operand stack.
///
/// Each independent execution context needs its own `State`; a state is
/// never shared between callers.
#[derive(Debug, Clone, Default)]
pub struct State {
    pub(crate) stack: Stack,
}

impl State {
    /// Create a state with the default reserved stack capacity.
    pub fn new() -> Self {
        Self {
            stack: Stack::new(),
        }
    }

    /// Create a state with `capacity` reserved stack slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stack: Stack::with_capacity(capacity),
        }
    }

    /// Read-only access to the operand stack.
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    // ---- Basic stack manipulation ----

    /// Convert a relative index into an absolute one.
    pub fn abs_index(&self, idx: isize) -> isize {
        self.stack.abs_index(idx)
    }

    /// Index of the top slot (the number of live slots).
    pub fn get_top(&self) -> isize {
        self.stack.len() as isize
    }

    /// Set the top; see [`Stack::set_top`].
    pub fn set_top(&mut self, idx: isize) {
        self.stack.set_top(idx);
    }

    /// Push a copy of the value at `idx` (nil if absent).
    pub fn push_value(&mut self, idx: isize) {
        let value = self.stack.get(idx).cloned().unwrap_or(Value::Nil);
        self.stack.push(value);
    }

    /// Rotate the segment from `idx` to the top by `n` positions.
    pub fn rotate(&mut self, idx: isize, n: isize) {
        self.stack.rotate(idx, n);
    }

    /// Copy the value at `src` into the slot at `dst`.
    pub fn copy(&mut self, src: isize, dst: isize) {
        self.stack.copy(src, dst);
    }

    /// Ensure at least `n` free slots. Returns `false` if that would take
    /// the stack past [`MAX_STACK`](crate::stack::MAX_STACK).
    pub fn check_stack(&mut self, n: usize) -> bool {
        self.stack.try_check(n)
    }

    /// Pop `n` values.
    pub fn pop(&mut self, n: isize) {
        self.stack.set_top(-n - 1);
    }

    /// Move the top value into position `idx`, shifting values up.
    pub fn insert(&mut self, idx: isize) {
        self.stack.rotate(idx, 1);
    }

    /// Remove the value at `idx`, shifting values down.
    pub fn remove(&mut self, idx: isize) {
        self.stack.rotate(idx, -1);
        self.pop(1);
    }

    /// Move the top value into `idx`, replacing what was there.
    pub fn replace(&mut self, idx: isize) {
        self.stack.copy(-1, idx);
        self.pop(1);
    }

    // ---- Push functions ----

    pub fn push_nil(&mut self) {
        self.stack.push(Value::Nil);
    }

    pub fn push_boolean(&mut self, b: bool) {
        self.stack.push(Value::Boolean(b));
    }

    pub fn push_integer(&mut self, i: i64) {
        self.stack.push(Value::Integer(i));
    }

    pub fn push_number(&mut self, f: f64) {
        self.stack.push(Value::Float(f));
    }

    pub fn push_string(&mut self, s: impl AsRef<[u8]>) {
        self.stack.push(Value::string(s));
    }

    /// Push an arbitrary value.
    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    // ---- Access functions ----

    /// Value at `idx`, or `None` past the top.
    pub fn get(&self, idx: isize) -> Option<&Value> {
        self.stack.get(idx)
    }

    /// Type of the value at `idx`; [`TypeTag::None`] past the top.
    pub fn type_of(&self, idx: isize) -> TypeTag {
        self.stack.get(idx).map_or(TypeTag::None, Value::type_tag)
    }

    /// Name of a type tag.
    pub fn type_name(&self, tag: TypeTag) -> &'static str {
        tag.name()
    }

    pub fn is_none(&self, idx: isize) -> bool {
        self.type_of(idx) == TypeTag::None
    }

    pub fn is_nil(&self, idx: isize) -> bool {
        self.type_of(idx) == TypeTag::Nil
    }

    pub fn is_none_or_nil(&self, idx: isize) -> bool {
        self.type_of(idx).is_none_or_nil()
    }

    pub fn is_boolean(&self, idx: isize) -> bool {
        self.type_of(idx) == TypeTag::Boolean
    }

    /// True for numbers and strings convertible to numbers.
    pub fn is_number(&self, idx: isize) -> bool {
        self.to_numberx(idx).is_some()
    }

    /// True for strings and numbers.
    pub fn is_string(&self, idx: isize) -> bool {
        matches!(self.type_of(idx), TypeTag::String | TypeTag::Number)
    }

    /// True only for the integer number subtype.
    pub fn is_integer(&self, idx: isize) -> bool {
        self.stack.get(idx).is_some_and(Value::is_integer)
    }

    /// Truthiness of the value at `idx`; absent is false.
    pub fn to_boolean(&self, idx: isize) -> bool {
        self.stack.get(idx).is_some_and(Value::to_boolean)
    }

    pub fn to_numberx(&self, idx: isize) -> Option<f64> {
        self.stack.get(idx).and_then(Value::to_number)
    }

    /// Float value at `idx`, or 0.0 if not convertible.
    pub fn to_number(&self, idx: isize) -> f64 {
        self.to_numberx(idx).unwrap_or(0.0)
    }

    pub fn to_integerx(&self, idx: isize) -> Option<i64> {
        self.stack.get(idx).and_then(Value::to_integer)
    }

    /// Integer value at `idx`, or 0 if not convertible.
    pub fn to_integer(&self, idx: isize) -> i64 {
        self.to_integerx(idx).unwrap_or(0)
    }

    /// String form of the value at `idx`.
    ///
    /// A number is converted and the slot is overwritten with the
    /// resulting string.
    pub fn to_stringx(&mut self, idx: isize) -> Option<Rc<[u8]>> {
        match self.stack.get(idx)? {
            Value::String(s) => Some(Rc::clone(s)),
            value => {
                let s = value.to_text()?;
                self.stack.set(idx, Value::String(Rc::clone(&s)));
                Some(s)
            }
        }
    }

    /// String form of the value at `idx`, or an empty string.
    pub fn to_string(&mut self, idx: isize) -> Rc<[u8]> {
        self.to_stringx(idx).unwrap_or_else(|| Rc::from(&b""[..]))
    }
}
