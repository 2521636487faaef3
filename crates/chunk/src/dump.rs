//! Writing a prototype tree as chunk bytes.
//!
//! The output is accepted by [`crate::undump`] and reproduces the same
//! tree.

use lunar_common::Value;

use crate::error::DumpError;
use crate::header::{
    write_header, ByteOrder, MAX_NESTING, MAX_SHORT_LEN, TAG_BOOLEAN, TAG_LNGSTR, TAG_NIL,
    TAG_NUMFLT, TAG_NUMINT, TAG_SHRSTR,
};
use crate::proto::Prototype;

/// Serialize `proto` as a complete chunk in byte order `order`.
///
/// # Errors
///
/// Returns [`DumpError`] if the tree cannot be represented: the root has
/// more than 255 upvalues, a sequence is longer than `u32::MAX`, or
/// functions nest deeper than [`MAX_NESTING`]. Such a chunk would not
/// load back as the same tree.
pub fn dump(proto: &Prototype, order: ByteOrder) -> Result<Vec<u8>, DumpError> {
    let mut w = Writer {
        out: Vec::new(),
        order,
    };
    write_header(&mut w.out, order);
    let main_upvalues = u8::try_from(proto.upvalues.len()).map_err(|_| DumpError::TooMany {
        what: "main upvalues",
        len: proto.upvalues.len(),
    })?;
    w.byte(main_upvalues);
    w.proto(proto, b"", 0)?;
    Ok(w.out)
}

struct Writer {
    out: Vec<u8>,
    order: ByteOrder,
}

impl Writer {
    fn byte(&mut self, b: u8) {
        self.out.push(b);
    }

    fn u32(&mut self, n: u32) {
        self.out.extend_from_slice(&self.order.u32_bytes(n));
    }

    fn u64(&mut self, n: u64) {
        self.out.extend_from_slice(&self.order.u64_bytes(n));
    }

    fn count(&mut self, what: &'static str, len: usize) -> Result<(), DumpError> {
        let n = u32::try_from(len).map_err(|_| DumpError::TooMany { what, len })?;
        self.u32(n);
        Ok(())
    }

    fn string(&mut self, s: &[u8]) {
        if s.is_empty() {
            self.byte(0);
            return;
        }
        let size = s.len() + 1;
        if size < 0xFF {
            self.byte(size as u8);
        } else {
            self.byte(0xFF);
            self.u64(size as u64);
        }
        self.out.extend_from_slice(s);
    }

    fn proto(
        &mut self,
        p: &Prototype,
        parent_source: &[u8],
        depth: usize,
    ) -> Result<(), DumpError> {
        if depth > MAX_NESTING {
            return Err(DumpError::TooDeep);
        }
        if *p.source == *parent_source {
            self.byte(0);
        } else {
            self.string(&p.source);
        }
        self.u32(p.line_defined);
        self.u32(p.last_line_defined);
        self.byte(p.num_params);
        self.byte(u8::from(p.is_vararg));
        self.byte(p.max_stack_size);

        self.count("instructions", p.code.len())?;
        for i in &p.code {
            self.u32(i.0);
        }

        self.count("constants", p.constants.len())?;
        for k in &p.constants {
            self.constant(k);
        }

        self.count("upvalues", p.upvalues.len())?;
        for uv in &p.upvalues {
            self.byte(uv.in_stack);
            self.byte(uv.idx);
        }

        self.count("functions", p.protos.len())?;
        for child in &p.protos {
            self.proto(child, &p.source, depth + 1)?;
        }

        self.count("line entries", p.line_info.len())?;
        for &line in &p.line_info {
            self.u32(line);
        }

        self.count("locals", p.loc_vars.len())?;
        for var in &p.loc_vars {
            self.string(&var.var_name);
            self.u32(var.start_pc);
            self.u32(var.end_pc);
        }

        self.count("upvalue names", p.upvalue_names.len())?;
        for name in &p.upvalue_names {
            self.string(name);
        }
        Ok(())
    }

    fn constant(&mut self, k: &Value) {
        match k {
            Value::Nil => self.byte(TAG_NIL),
            Value::Boolean(b) => {
                self.byte(TAG_BOOLEAN);
                self.byte(u8::from(*b));
            }
            Value::Integer(i) => {
                self.byte(TAG_NUMINT);
                self.u64(*i as u64);
            }
            Value::Float(f) => {
                self.byte(TAG_NUMFLT);
                self.u64(f.to_bits());
            }
            Value::String(s) => {
                let tag = if s.len() <= MAX_SHORT_LEN {
                    TAG_SHRSTR
                } else {
                    TAG_LNGSTR
                };
                self.byte(tag);
                self.string(s);
            }
        }
    }
}
