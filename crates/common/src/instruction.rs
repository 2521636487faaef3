//! Instruction word decoding.
//!
//! Every instruction is one 32-bit word. The opcode sits in the low 6 bits;
//! the remaining 26 bits are read through one of four layouts:
//! ```text
//!  iABC:   | B: 9 | C: 9 | A: 8 | op: 6 |
//!  iABx:   |    Bx: 18   | A: 8 | op: 6 |
//!  iAsBx:  |   sBx: 18   | A: 8 | op: 6 |
//!  iAx:    |        Ax: 26      | op: 6 |
//! ```
//! Decoding never fails: every bit pattern has a value under every layout.
//! Which layout applies is a property of the opcode (see [`OpcodeInfo::mode`]).

use std::fmt;

use crate::opcode::{Opcode, OpcodeInfo, OPCODE_TABLE};

const SIZE_OP: u32 = 6;
const SIZE_A: u32 = 8;
const SIZE_B: u32 = 9;
const SIZE_C: u32 = 9;
const SIZE_BX: u32 = SIZE_B + SIZE_C;

const POS_A: u32 = SIZE_OP;
const POS_C: u32 = POS_A + SIZE_A;
const POS_B: u32 = POS_C + SIZE_C;
const POS_BX: u32 = POS_C;
const POS_AX: u32 = POS_A;

/// Largest Bx operand.
pub const MAXARG_BX: i32 = (1 << SIZE_BX) - 1;
/// Bias subtracted from Bx to produce sBx.
pub const MAXARG_SBX: i32 = MAXARG_BX >> 1;

/// RK operands with this bit set index the constant table.
pub const BIT_RK: u32 = 1 << (SIZE_B - 1);

/// A single 32-bit instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction(pub u32);

impl Instruction {
    /// The raw opcode number (low 6 bits).
    pub fn opcode(self) -> u8 {
        (self.0 & mask(SIZE_OP)) as u8
    }

    /// Register-triple view: `(A, B, C)`.
    pub fn abc(self) -> (u32, u32, u32) {
        let a = (self.0 >> POS_A) & mask(SIZE_A);
        let c = (self.0 >> POS_C) & mask(SIZE_C);
        let b = (self.0 >> POS_B) & mask(SIZE_B);
        (a, b, c)
    }

    /// Register plus unsigned operand: `(A, Bx)`.
    pub fn abx(self) -> (u32, u32) {
        let a = (self.0 >> POS_A) & mask(SIZE_A);
        (a, self.0 >> POS_BX)
    }

    /// Register plus signed operand: `(A, sBx)`.
    pub fn asbx(self) -> (u32, i32) {
        let (a, bx) = self.abx();
        (a, bx as i32 - MAXARG_SBX)
    }

    /// Single large operand `Ax`.
    pub fn ax(self) -> u32 {
        self.0 >> POS_AX
    }

    /// Metadata for this instruction's opcode, or `None` if the opcode
    /// number has no table entry.
    pub fn info(self) -> Option<&'static OpcodeInfo> {
        OPCODE_TABLE.get(usize::from(self.opcode()))
    }

    /// Look up the opcode metadata in a caller-supplied table.
    pub fn info_in(self, table: &[OpcodeInfo]) -> Option<&OpcodeInfo> {
        table.get(usize::from(self.opcode()))
    }

    /// The decoded opcode, if it is defined.
    pub fn op(self) -> Option<Opcode> {
        Opcode::try_from(self.opcode()).ok()
    }

    /// Opcode mnemonic, or `"UNKNOWN"` for undefined opcode numbers.
    pub fn op_name(self) -> &'static str {
        self.info().map_or("UNKNOWN", |info| info.name)
    }
}

impl From<u32> for Instruction {
    fn from(word: u32) -> Self {
        Instruction(word)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// True if an RK operand refers to a constant.
pub fn is_constant(arg: u32) -> bool {
    arg & BIT_RK != 0
}

/// Constant-table index encoded in an RK operand.
pub fn constant_index(arg: u32) -> u32 {
    arg & !BIT_RK
}

const fn mask(bits: u32) -> u32 {
    (1 << bits) - 1
}
