//! Listing: prototype tree → human-readable disassembly text.
//!
//! Each prototype prints a header, its instructions, then its constants,
//! locals and upvalues. Nested prototypes follow depth first.

use std::fmt::Write;

use lunar_chunk::header::SIGNATURE;
use lunar_chunk::Prototype;
use lunar_common::instruction::{constant_index, is_constant};
use lunar_common::{Instruction, OpArgMode, OpMode, Value};

/// Render a prototype and all nested prototypes.
pub fn list(p: &Prototype) -> String {
    let mut out = String::new();
    p.walk(&mut |p| {
        header(&mut out, p);
        code(&mut out, p);
        debug_tables(&mut out, p);
    });
    out
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Short display form of a chunk name.
fn display_source(source: &[u8]) -> String {
    match source.first() {
        None => "?".to_string(),
        Some(b'@' | b'=') => String::from_utf8_lossy(&source[1..]).into_owned(),
        Some(&c) if c == SIGNATURE[0] => "(bstring)".to_string(),
        Some(_) => "(string)".to_string(),
    }
}

fn header(out: &mut String, p: &Prototype) {
    let kind = if p.is_main() { "main" } else { "function" };
    let n = p.code.len();
    let _ = writeln!(
        out,
        "\n{kind} <{}:{},{}> ({n} instruction{})",
        display_source(&p.source),
        p.line_defined,
        p.last_line_defined,
        plural(n)
    );

    let params = usize::from(p.num_params);
    let slots = usize::from(p.max_stack_size);
    let _ = writeln!(
        out,
        "{params}{} param{}, {slots} slot{}, {} upvalue{}, {} local{}, {} constant{}, {} function{}",
        if p.is_vararg { "+" } else { "" },
        plural(params),
        plural(slots),
        p.upvalues.len(),
        plural(p.upvalues.len()),
        p.loc_vars.len(),
        plural(p.loc_vars.len()),
        p.constants.len(),
        plural(p.constants.len()),
        p.protos.len(),
        plural(p.protos.len()),
    );
}

fn code(out: &mut String, p: &Prototype) {
    for (pc, &i) in p.code.iter().enumerate() {
        let line = p
            .line_at(pc)
            .map_or_else(|| "-".to_string(), |l| l.to_string());
        let _ = write!(out, "\t{}\t[{line}]\t{i}\t{:<9}", pc + 1, i.op_name());
        if let Some(operands) = operands(i) {
            let _ = write!(out, "\t{operands}");
        }
        out.push('\n');
    }
}

/// Constant operands print as `-1 - index`.
fn rk(arg: u32) -> i64 {
    if is_constant(arg) {
        -1 - i64::from(constant_index(arg))
    } else {
        i64::from(arg)
    }
}

/// Decoded operands for an instruction, or `None` for unknown opcodes.
fn operands(i: Instruction) -> Option<String> {
    let info = i.info()?;
    let text = match info.mode {
        OpMode::IABC => {
            let (a, b, c) = i.abc();
            let mut s = a.to_string();
            if info.b_mode != OpArgMode::N {
                let b = if info.b_mode == OpArgMode::K { rk(b) } else { i64::from(b) };
                let _ = write!(s, " {b}");
            }
            if info.c_mode != OpArgMode::N {
                let c = if info.c_mode == OpArgMode::K { rk(c) } else { i64::from(c) };
                let _ = write!(s, " {c}");
            }
            s
        }
        OpMode::IABx => {
            let (a, bx) = i.abx();
            match info.b_mode {
                OpArgMode::K => format!("{a} {}", -1 - i64::from(bx)),
                OpArgMode::U => format!("{a} {bx}"),
                _ => a.to_string(),
            }
        }
        OpMode::IAsBx => {
            let (a, sbx) = i.asbx();
            format!("{a} {sbx}")
        }
        OpMode::IAx => format!("{}", -1 - i64::from(i.ax())),
    };
    Some(text)
}

fn constant(k: &Value) -> String {
    match k {
        Value::String(s) => format!("{:?}", String::from_utf8_lossy(s)),
        other => other.to_string(),
    }
}

fn debug_tables(out: &mut String, p: &Prototype) {
    let _ = writeln!(out, "constants ({}):", p.constants.len());
    for (i, k) in p.constants.iter().enumerate() {
        let _ = writeln!(out, "\t{}\t{}", i + 1, constant(k));
    }

    let _ = writeln!(out, "locals ({}):", p.loc_vars.len());
    for (i, var) in p.loc_vars.iter().enumerate() {
        let _ = writeln!(
            out,
            "\t{i}\t{}\t{}\t{}",
            var.name(),
            var.start_pc + 1,
            var.end_pc + 1
        );
    }

    let _ = writeln!(out, "upvalues ({}):", p.upvalues.len());
    for (i, uv) in p.upvalues.iter().enumerate() {
        let name = p
            .upvalue_names
            .get(i)
            .map_or_else(|| "-".into(), |n| String::from_utf8_lossy(n));
        let _ = writeln!(out, "\t{i}\t{name}\t{}\t{}", uv.in_stack, uv.idx);
    }
}
