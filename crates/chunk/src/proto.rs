//! Function prototypes: the static description of a compiled function.

use std::borrow::Cow;
use std::rc::Rc;

use lunar_common::{Instruction, Value};

/// A compiled function body and its nested functions.
///
/// Each prototype exclusively owns its children in `protos`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Prototype {
    /// Chunk name. Nested functions inherit their parent's when the chunk
    /// stores an empty name.
    pub source: Rc<[u8]>,
    pub line_defined: u32,
    pub last_line_defined: u32,
    pub num_params: u8,
    pub is_vararg: bool,
    pub max_stack_size: u8,
    pub code: Vec<Instruction>,
    pub constants: Vec<Value>,
    pub upvalues: Vec<Upvalue>,
    pub protos: Vec<Prototype>,
    /// Source line per instruction; may be empty.
    pub line_info: Vec<u32>,
    pub loc_vars: Vec<LocVar>,
    pub upvalue_names: Vec<Rc<[u8]>>,
}

/// Where a closure finds one of its upvalues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Upvalue {
    /// Nonzero if the variable lives in the enclosing function's registers.
    pub in_stack: u8,
    /// Register or upvalue index in the enclosing function.
    pub idx: u8,
}

/// A local variable's name and live instruction range.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocVar {
    pub var_name: Rc<[u8]>,
    pub start_pc: u32,
    pub end_pc: u32,
}

impl Prototype {
    /// True for the chunk's top-level function.
    pub fn is_main(&self) -> bool {
        self.line_defined == 0
    }

    /// Source name as text, lossily decoded.
    pub fn source_name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.source)
    }

    /// Number of prototypes in this tree, including `self`.
    pub fn function_count(&self) -> usize {
        1 + self.protos.iter().map(Prototype::function_count).sum::<usize>()
    }

    /// Source line of the instruction at `pc`, if recorded.
    pub fn line_at(&self, pc: usize) -> Option<u32> {
        self.line_info.get(pc).copied()
    }

    /// Visit this prototype and all nested ones, depth first.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Prototype)) {
        f(self);
        for child in &self.protos {
            child.walk(f);
        }
    }
}

impl LocVar {
    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.var_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(line: u32) -> Prototype {
        Prototype {
            line_defined: line,
            last_line_defined: line + 1,
            ..Prototype::default()
        }
    }

    #[test]
    fn function_count_includes_nested() {
        let mut main = leaf(0);
        let mut inner = leaf(3);
        inner.protos.push(leaf(4));
        main.protos.push(inner);
        main.protos.push(leaf(10));
        assert_eq!(main.function_count(), 4);
    }

    #[test]
    fn walk_is_depth_first() {
        let mut main = leaf(0);
        let mut inner = leaf(3);
        inner.protos.push(leaf(4));
        main.protos.push(inner);
        main.protos.push(leaf(10));

        let mut lines = Vec::new();
        main.walk(&mut |p| lines.push(p.line_defined));
        assert_eq!(lines, vec![0, 3, 4, 10]);
    }

    #[test]
    fn main_detection() {
        assert!(leaf(0).is_main());
        assert!(!leaf(7).is_main());
    }

    #[test]
    fn line_lookup() {
        let p = Prototype {
            line_info: vec![1, 1, 2],
            ..Prototype::default()
        };
        assert_eq!(p.line_at(2), Some(2));
        assert_eq!(p.line_at(3), None);
    }

    #[test]
    fn source_name_is_lossy() {
        let p = Prototype {
            source: Rc::from(&b"@ok\xff"[..]),
            ..Prototype::default()
        };
        assert_eq!(p.source_name(), "@ok\u{fffd}");
    }
}
