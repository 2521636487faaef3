//! The operand stack: 1-based slots addressed by absolute or relative index.
//!
//! Positive indices count from the bottom (1 is the first slot). Zero and
//! negative indices count from the top (-1 is the topmost slot). Reserved
//! capacity is explicit: `push` never grows the stack on its own, callers
//! make room with [`Stack::check`] first.
//!
//! Contract violations (bad indices, overflow, underflow, bad rotation
//! arguments) are programming errors and panic.

use lunar_common::Value;
use tracing::trace;

/// Initial reserved capacity of a new stack.
pub const MIN_STACK: usize = 20;

/// Largest number of slots [`Stack::check`] will reserve.
pub const MAX_STACK: usize = 1_000_000;

/// A growable stack of runtime values.
#[derive(Debug, Clone)]
pub struct Stack {
    /// Live slots; `slots.len()` is the logical top.
    slots: Vec<Value>,
    /// Reserved capacity. Always `>= slots.len()`.
    capacity: usize,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Stack {
    /// Create an empty stack with [`MIN_STACK`] reserved slots.
    pub fn new() -> Self {
        Self::with_capacity(MIN_STACK)
    }

    /// Create an empty stack with `capacity` reserved slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Number of live slots (the logical top).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no slots are live.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Reserved capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The live slots, bottom first.
    pub fn as_slice(&self) -> &[Value] {
        &self.slots
    }

    /// Convert a relative index into an absolute one.
    pub fn abs_index(&self, idx: isize) -> isize {
        if idx > 0 {
            idx
        } else {
            idx + self.slots.len() as isize + 1
        }
    }

    /// Ensure at least `n` free slots above the top.
    ///
    /// Grows to `max(2 * capacity, len + n)`, capped at [`MAX_STACK`];
    /// never shrinks.
    ///
    /// # Panics
    ///
    /// Panics with "stack overflow" if `len + n` exceeds [`MAX_STACK`].
    pub fn check(&mut self, n: usize) {
        if !self.try_check(n) {
            panic!("stack overflow");
        }
    }

    /// Like [`Stack::check`], but returns `false` instead of panicking
    /// when the request cannot be met. The stack is unchanged on failure.
    pub fn try_check(&mut self, n: usize) -> bool {
        let len = self.slots.len();
        let needed = match len.checked_add(n) {
            Some(needed) => needed,
            None => return false,
        };
        if needed <= self.capacity {
            return true;
        }
        if needed > MAX_STACK {
            trace!(len, n, "stack limit reached");
            return false;
        }
        let new_capacity = self.capacity.saturating_mul(2).min(MAX_STACK).max(needed);
        self.slots.reserve_exact(new_capacity - len);
        trace!(from = self.capacity, to = new_capacity, "stack grown");
        self.capacity = new_capacity;
        true
    }

    /// Push a value onto the top.
    ///
    /// # Panics
    ///
    /// Panics with "stack overflow" if no reserved slot is free.
    pub fn push(&mut self, value: Value) {
        if self.slots.len() == self.capacity {
            panic!("stack overflow");
        }
        self.slots.push(value);
    }

    /// Remove and return the topmost value.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    pub fn pop(&mut self) -> Value {
        match self.slots.pop() {
            Some(value) => value,
            None => panic!("not enough elements in the stack"),
        }
    }

    /// Read a slot. Returns `None` for an index past the top but within
    /// capacity.
    ///
    /// # Panics
    ///
    /// Panics with "unacceptable index" outside `1..=capacity`.
    pub fn get(&self, idx: isize) -> Option<&Value> {
        let abs = self.abs_index(idx);
        if abs > 0 && abs as usize <= self.capacity {
            self.slots.get(abs as usize - 1)
        } else {
            panic!("unacceptable index");
        }
    }

    /// Read a slot without enforcing the capacity contract.
    pub(crate) fn lookup(&self, idx: isize) -> Option<&Value> {
        let abs = self.abs_index(idx);
        if abs > 0 {
            self.slots.get(abs as usize - 1)
        } else {
            None
        }
    }

    /// Overwrite a live slot.
    ///
    /// # Panics
    ///
    /// Panics with "invalid index" unless the slot is live.
    pub fn set(&mut self, idx: isize, value: Value) {
        let abs = self.abs_index(idx);
        if abs > 0 && abs as usize <= self.slots.len() {
            self.slots[abs as usize - 1] = value;
        } else {
            panic!("invalid index");
        }
    }

    /// Move the top to `idx`, filling new slots with nil or dropping
    /// removed ones.
    ///
    /// # Panics
    ///
    /// Panics if a non-negative `idx` exceeds capacity or a negative one
    /// reaches below the bottom.
    pub fn set_top(&mut self, idx: isize) {
        let top = self.slots.len();
        let new_top = if idx >= 0 {
            if idx as usize > self.capacity {
                panic!("new top too large");
            }
            idx as usize
        } else {
            if idx.unsigned_abs() > top {
                panic!("invalid new top");
            }
            (top as isize + idx + 1) as usize
        };
        self.slots.resize(new_top, Value::Nil);
    }

    /// Rotate the segment from `idx` to the top by `n` positions.
    ///
    /// Positive `n` moves the top `n` values to the start of the segment;
    /// negative `n` moves the first `-n` values to the end.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not a live slot, or if the split point falls
    /// outside the segment (`n` in `-len..len` is accepted).
    pub fn rotate(&mut self, idx: isize, n: isize) {
        let t = self.slots.len() as isize - 1;
        let p = self.abs_index(idx) - 1;
        if p < 0 || p > t {
            panic!("index not in the stack");
        }
        // End of the prefix that swaps places with the suffix.
        let m = if n >= 0 {
            t.checked_sub(n)
        } else {
            p.checked_sub(n).and_then(|m| m.checked_sub(1))
        };
        let m = match m {
            Some(m) if (p..=t).contains(&m) => m,
            _ => panic!("invalid 'n'"),
        };
        self.reverse(p, m);
        self.reverse(m + 1, t);
        self.reverse(p, t);
    }

    /// Copy the value at `src` over the slot at `dst`.
    pub fn copy(&mut self, src: isize, dst: isize) {
        let value = self.get(src).cloned().unwrap_or(Value::Nil);
        self.set(dst, value);
    }

    /// Reverse the 0-based inclusive range `from..=to`; empty if `from >= to`.
    fn reverse(&mut self, from: isize, to: isize) {
        if from < to {
            self.slots[from as usize..=to as usize].reverse();
        }
    }
}
