//! Loading a prototype tree from chunk bytes.

use std::io::Read;
use std::rc::Rc;

use lunar_common::{Instruction, Value};
use tracing::{debug, trace};

use crate::error::UndumpError;
use crate::header::{
    self, MAX_NESTING, TAG_BOOLEAN, TAG_LNGSTR, TAG_NIL, TAG_NUMFLT, TAG_NUMINT, TAG_SHRSTR,
};
use crate::proto::{LocVar, Prototype, Upvalue};
use crate::reader::Reader;

/// Load the root prototype of a chunk held in memory.
///
/// Trailing bytes after the root prototype are ignored.
///
/// # Errors
///
/// Returns [`UndumpError`] if the header is invalid, a constant tag is
/// unknown, functions nest deeper than [`MAX_NESTING`], or the input ends
/// early. No partial prototype is returned.
pub fn undump(bytes: &[u8]) -> Result<Prototype, UndumpError> {
    let mut r = Reader::new(bytes);
    header::check_header(&mut r)?;
    let main_upvalues = r.read_byte()?;
    let proto = read_proto(&mut r, &Rc::from(&b""[..]), 0)?;
    debug!(
        main_upvalues,
        functions = proto.function_count(),
        trailing = r.remaining(),
        "chunk loaded"
    );
    Ok(proto)
}

/// Load the root prototype of a chunk from a reader.
///
/// # Errors
///
/// As [`undump`], plus [`UndumpError::Io`] if reading fails for a reason
/// other than end of input.
pub fn undump_from<R: Read>(mut reader: R) -> Result<Prototype, UndumpError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    undump(&bytes)
}

fn read_proto(
    r: &mut Reader<'_>,
    parent_source: &Rc<[u8]>,
    depth: usize,
) -> Result<Prototype, UndumpError> {
    if depth > MAX_NESTING {
        return Err(UndumpError::TooDeep);
    }
    let mut source = r.read_string()?;
    if source.is_empty() {
        source = Rc::clone(parent_source);
    }
    let line_defined = r.read_u32()?;
    let last_line_defined = r.read_u32()?;
    let num_params = r.read_byte()?;
    let is_vararg = r.read_byte()? != 0;
    let max_stack_size = r.read_byte()?;
    let code = r.read_vec(4, |r| r.read_u32().map(Instruction))?;
    let constants = r.read_vec(1, read_constant)?;
    let upvalues = r.read_vec(2, |r| {
        Ok(Upvalue {
            in_stack: r.read_byte()?,
            idx: r.read_byte()?,
        })
    })?;
    let protos = r.read_vec(1, |r| read_proto(r, &source, depth + 1))?;
    let line_info = r.read_vec(4, Reader::read_u32)?;
    let loc_vars = r.read_vec(9, |r| {
        Ok(LocVar {
            var_name: r.read_string()?,
            start_pc: r.read_u32()?,
            end_pc: r.read_u32()?,
        })
    })?;
    let upvalue_names = r.read_vec(1, Reader::read_string)?;

    trace!(
        source = %String::from_utf8_lossy(&source),
        line_defined,
        instructions = code.len(),
        constants = constants.len(),
        functions = protos.len(),
        "prototype loaded"
    );

    Ok(Prototype {
        source,
        line_defined,
        last_line_defined,
        num_params,
        is_vararg,
        max_stack_size,
        code,
        constants,
        upvalues,
        protos,
        line_info,
        loc_vars,
        upvalue_names,
    })
}

fn read_constant(r: &mut Reader<'_>) -> Result<Value, UndumpError> {
    match r.read_byte()? {
        TAG_NIL => Ok(Value::Nil),
        TAG_BOOLEAN => Ok(Value::Boolean(r.read_byte()? != 0)),
        TAG_NUMINT => Ok(Value::Integer(r.read_integer()?)),
        TAG_NUMFLT => Ok(Value::Float(r.read_number()?)),
        TAG_SHRSTR | TAG_LNGSTR => Ok(Value::String(r.read_string()?)),
        tag => Err(UndumpError::BadConstantTag(tag)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{write_header, ByteOrder};

    /// Minimal chunk: header, main upvalue count, and an empty main function
    /// followed by `body`.
    fn chunk_with(body: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        write_header(&mut out, ByteOrder::Little);
        out.push(1);
        out.extend_from_slice(body);
        out
    }

    fn empty_function(source: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        if source.is_empty() {
            out.push(0);
        } else {
            out.push(source.len() as u8 + 1);
            out.extend_from_slice(source);
        }
        out.extend_from_slice(&[0; 8]); // line range
        out.extend_from_slice(&[0, 1, 2]); // params, vararg, stack
        out.extend_from_slice(&[0; 4 * 7]); // seven empty sequences
        out
    }

    #[test]
    fn loads_empty_main() {
        let proto = undump(&chunk_with(&empty_function(b"@main.lua"))).unwrap();
        assert_eq!(&*proto.source, b"@main.lua");
        assert!(proto.is_vararg);
        assert_eq!(proto.max_stack_size, 2);
        assert!(proto.code.is_empty());
        assert_eq!(proto.function_count(), 1);
    }

    #[test]
    fn unknown_constant_tag() {
        let mut body = empty_function(b"=x");
        // Patch the constant count (after source, lines, 3 bytes, code count).
        let at = 3 + 8 + 3 + 4;
        body[at] = 1;
        body.insert(at + 4, 0x07);
        match undump(&chunk_with(&body)) {
            Err(UndumpError::BadConstantTag(7)) => {}
            other => panic!("expected bad tag, got {other:?}"),
        }
    }

    #[test]
    fn truncated_body() {
        let bytes = chunk_with(&empty_function(b"=x"));
        for cut in [34, 36, 40, bytes.len() - 1] {
            assert!(
                matches!(undump(&bytes[..cut]), Err(UndumpError::Truncated)),
                "cut at {cut}"
            );
        }
    }

    /// A chain of `levels` functions, each holding the next as its only child.
    fn nested_chain(levels: usize) -> Vec<u8> {
        let mut body = Vec::new();
        for _ in 0..levels {
            body.push(0); // inherited source
            body.extend_from_slice(&[0; 8]);
            body.extend_from_slice(&[0, 0, 2]);
            body.extend_from_slice(&[0; 4 * 3]); // code, constants, upvalues
            body.extend_from_slice(&1u32.to_le_bytes());
        }
        chunk_with(&body)
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let bytes = nested_chain(200_000);
        assert!(matches!(undump(&bytes), Err(UndumpError::TooDeep)));
    }

    #[test]
    fn nesting_just_past_limit_is_rejected() {
        // Levels 0..=MAX_NESTING are read before the next child trips the check.
        let bytes = nested_chain(MAX_NESTING + 1);
        assert!(matches!(undump(&bytes), Err(UndumpError::TooDeep)));
        let bytes = nested_chain(MAX_NESTING);
        assert!(matches!(undump(&bytes), Err(UndumpError::Truncated)));
    }

    #[test]
    fn reader_entry_point() {
        let bytes = chunk_with(&empty_function(b"=stdin"));
        let proto = undump_from(&bytes[..]).unwrap();
        assert_eq!(proto.source_name(), "=stdin");
    }

    #[test]
    fn reader_failure_is_io() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk on fire"))
            }
        }
        assert!(matches!(undump_from(Broken), Err(UndumpError::Io(_))));
    }
}
