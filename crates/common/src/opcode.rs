//! Opcode metadata for the register-based instruction set.
//!
//! The metadata lives in [`OPCODE_TABLE`], indexed by opcode number. The
//! decoder in [`crate::instruction`] only extracts bit fields; naming and
//! operand interpretation come from this table.

use thiserror::Error;

/// An opcode number with no entry in [`OPCODE_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown opcode: {0}")]
pub struct UnknownOpcode(pub u8);

/// Identifies the operation of an instruction (low 6 bits).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Move = 0,
    LoadK,
    LoadKx,
    LoadBool,
    LoadNil,
    GetUpval,
    GetTabUp,
    GetTable,
    SetTabUp,
    SetUpval,
    SetTable,
    NewTable,
    SelfOp,
    Add,
    Sub,
    Mul,
    Mod,
    Pow,
    Div,
    IDiv,
    BAnd,
    BOr,
    BXor,
    Shl,
    Shr,
    Unm,
    BNot,
    Not,
    Len,
    Concat,
    Jmp,
    Eq,
    Lt,
    Le,
    Test,
    TestSet,
    Call,
    TailCall,
    Return,
    ForLoop,
    ForPrep,
    TForCall,
    TForLoop,
    SetList,
    Closure,
    VarArg,
    ExtraArg,
}

/// Number of defined opcodes.
pub const NUM_OPCODES: usize = 47;

/// All opcodes, in numeric order.
pub const ALL_OPCODES: [Opcode; NUM_OPCODES] = [
    Opcode::Move,
    Opcode::LoadK,
    Opcode::LoadKx,
    Opcode::LoadBool,
    Opcode::LoadNil,
    Opcode::GetUpval,
    Opcode::GetTabUp,
    Opcode::GetTable,
    Opcode::SetTabUp,
    Opcode::SetUpval,
    Opcode::SetTable,
    Opcode::NewTable,
    Opcode::SelfOp,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Mod,
    Opcode::Pow,
    Opcode::Div,
    Opcode::IDiv,
    Opcode::BAnd,
    Opcode::BOr,
    Opcode::BXor,
    Opcode::Shl,
    Opcode::Shr,
    Opcode::Unm,
    Opcode::BNot,
    Opcode::Not,
    Opcode::Len,
    Opcode::Concat,
    Opcode::Jmp,
    Opcode::Eq,
    Opcode::Lt,
    Opcode::Le,
    Opcode::Test,
    Opcode::TestSet,
    Opcode::Call,
    Opcode::TailCall,
    Opcode::Return,
    Opcode::ForLoop,
    Opcode::ForPrep,
    Opcode::TForCall,
    Opcode::TForLoop,
    Opcode::SetList,
    Opcode::Closure,
    Opcode::VarArg,
    Opcode::ExtraArg,
];

/// Bit-field layout of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpMode {
    /// A, B, C register triple.
    IABC,
    /// A plus an 18-bit unsigned operand.
    IABx,
    /// A plus an 18-bit signed (biased) operand.
    IAsBx,
    /// A single 26-bit unsigned operand.
    IAx,
}

/// How an operand field is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpArgMode {
    /// Not used.
    N,
    /// Used, raw value.
    U,
    /// A register or jump offset.
    R,
    /// A constant or register/constant (RK).
    K,
}

/// Static description of one opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    /// Mnemonic as printed by listings.
    pub name: &'static str,
    /// Instruction is a test; the next instruction must be a jump.
    pub test_flag: bool,
    /// Instruction writes register A.
    pub set_a_flag: bool,
    pub b_mode: OpArgMode,
    pub c_mode: OpArgMode,
    pub mode: OpMode,
}

const fn info(
    name: &'static str,
    test_flag: bool,
    set_a_flag: bool,
    b_mode: OpArgMode,
    c_mode: OpArgMode,
    mode: OpMode,
) -> OpcodeInfo {
    OpcodeInfo {
        name,
        test_flag,
        set_a_flag,
        b_mode,
        c_mode,
        mode,
    }
}

use OpArgMode::{K, N, R, U};
use OpMode::{IABC, IABx, IAsBx, IAx};

/// Metadata for every opcode, indexed by opcode number.
#[rustfmt::skip]
pub const OPCODE_TABLE: [OpcodeInfo; NUM_OPCODES] = [
    info("MOVE",     false, true,  R, N, IABC),
    info("LOADK",    false, true,  K, N, IABx),
    info("LOADKX",   false, true,  N, N, IABx),
    info("LOADBOOL", false, true,  U, U, IABC),
    info("LOADNIL",  false, true,  U, N, IABC),
    info("GETUPVAL", false, true,  U, N, IABC),
    info("GETTABUP", false, true,  U, K, IABC),
    info("GETTABLE", false, true,  R, K, IABC),
    info("SETTABUP", false, false, K, K, IABC),
    info("SETUPVAL", false, false, U, N, IABC),
    info("SETTABLE", false, false, K, K, IABC),
    info("NEWTABLE", false, true,  U, U, IABC),
    info("SELF",     false, true,  R, K, IABC),
    info("ADD",      false, true,  K, K, IABC),
    info("SUB",      false, true,  K, K, IABC),
    info("MUL",      false, true,  K, K, IABC),
    info("MOD",      false, true,  K, K, IABC),
    info("POW",      false, true,  K, K, IABC),
    info("DIV",      false, true,  K, K, IABC),
    info("IDIV",     false, true,  K, K, IABC),
    info("BAND",     false, true,  K, K, IABC),
    info("BOR",      false, true,  K, K, IABC),
    info("BXOR",     false, true,  K, K, IABC),
    info("SHL",      false, true,  K, K, IABC),
    info("SHR",      false, true,  K, K, IABC),
    info("UNM",      false, true,  R, N, IABC),
    info("BNOT",     false, true,  R, N, IABC),
    info("NOT",      false, true,  R, N, IABC),
    info("LEN",      false, true,  R, N, IABC),
    info("CONCAT",   false, true,  R, R, IABC),
    info("JMP",      false, false, R, N, IAsBx),
    info("EQ",       true,  false, K, K, IABC),
    info("LT",       true,  false, K, K, IABC),
    info("LE",       true,  false, K, K, IABC),
    info("TEST",     true,  false, N, U, IABC),
    info("TESTSET",  true,  true,  R, U, IABC),
    info("CALL",     false, true,  U, U, IABC),
    info("TAILCALL", false, true,  U, U, IABC),
    info("RETURN",   false, false, U, N, IABC),
    info("FORLOOP",  false, true,  R, N, IAsBx),
    info("FORPREP",  false, true,  R, N, IAsBx),
    info("TFORCALL", false, false, N, U, IABC),
    info("TFORLOOP", false, true,  R, N, IAsBx),
    info("SETLIST",  false, false, U, U, IABC),
    info("CLOSURE",  false, true,  U, N, IABx),
    info("VARARG",   false, true,  U, N, IABC),
    info("EXTRAARG", false, false, U, U, IAx),
];

impl TryFrom<u8> for Opcode {
    type Error = UnknownOpcode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ALL_OPCODES
            .get(usize::from(value))
            .copied()
            .ok_or(UnknownOpcode(value))
    }
}

impl Opcode {
    /// Returns this opcode's metadata row.
    pub fn info(&self) -> &'static OpcodeInfo {
        &OPCODE_TABLE[*self as usize]
    }

    /// Returns the listing mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        self.info().name
    }
}
