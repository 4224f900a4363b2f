//! Load and store instructions, plus ADR.
//!
//! STR/LDR/STRB/LDRB each have a register offset form and an immediate
//! offset form; word accesses additionally have SP and PC relative forms.

use super::{InstructionTable, IMM, IMM_OR_LABEL, LABEL, REG};
use crate::operands::Converter;

/// rD, base register, offset register.
const RD_RB_RO: [Converter; 3] = [
    Converter::Reg { off: 0 },
    Converter::Reg { off: 3 },
    Converter::Reg { off: 6 },
];

/// rD, base register, word-scaled 5-bit offset.
const RD_RB_IMM5W: [Converter; 3] = [
    Converter::Reg { off: 0 },
    Converter::Reg { off: 3 },
    Converter::Uint {
        off: 6,
        bits: 5,
        shift: 2,
    },
];

/// rD, base register, unscaled 5-bit offset.
const RD_RB_IMM5B: [Converter; 3] = [
    Converter::Reg { off: 0 },
    Converter::Reg { off: 3 },
    Converter::Uint {
        off: 6,
        bits: 5,
        shift: 0,
    },
];

/// rD and a word-scaled 8-bit displacement.
const RD_OFF8: [Converter; 2] = [
    Converter::Reg { off: 8 },
    Converter::Uint {
        off: 0,
        bits: 8,
        shift: 2,
    },
];

pub fn register(table: &mut InstructionTable) {
    let reg_offset = format!(r"{REG},\[{REG},{REG}\]");
    let imm_offset = format!(r"{REG},\[{REG},{IMM}\]");
    let sp_offset = format!(r"{REG},\[sp,{IMM}\]");

    table.insert("str", &reg_offset, "0101000_________", &RD_RB_RO);
    table.insert("str", &imm_offset, "01100-----______", &RD_RB_IMM5W);
    table.insert("str", &sp_offset, "10010___--------", &RD_OFF8);

    table.insert("strb", &reg_offset, "0101010_________", &RD_RB_RO);
    table.insert("strb", &imm_offset, "01110-----______", &RD_RB_IMM5B);

    table.insert("ldr", &reg_offset, "0101100_________", &RD_RB_RO);
    table.insert("ldr", &imm_offset, "01101-----______", &RD_RB_IMM5W);
    table.insert("ldr", &sp_offset, "10011___--------", &RD_OFF8);
    table.insert(
        "ldr",
        &format!(r"{REG},\[pc,{IMM_OR_LABEL}\]"),
        "01001___--------",
        &RD_OFF8,
    );
    table.insert("ldr", &format!("{REG},{LABEL}"), "01001___--------", &RD_OFF8);

    table.insert("ldrb", &reg_offset, "0101110_________", &RD_RB_RO);
    // Known quirk, kept for output compatibility: this expression collides
    // with the LDR word encoding instead of using the architectural 01111
    // LDRB prefix. Pinned by a test in the assembler module so any
    // correction is deliberate.
    table.insert("ldrb", &imm_offset, "0110100---___---", &RD_RB_IMM5B);

    table.insert("adr", &format!("{REG},{LABEL}"), "10100___--------", &RD_OFF8);
}
