//! ADD and SUB instructions, plus the 32-bit ADD.W and ADC.W encodings.
//!
//! ADD is the most overloaded mnemonic of the table. Variant order matters:
//! the 8-bit immediate form and the PC/SP relative forms must be tried
//! before the generic three operand form.

use super::{InstructionTable, IMM, IMM_OR_LABEL, REG, REG4, REG_OR_IMM};
use crate::operands::Converter;

/// rD, rS and a third operand which is either a low register or a 3-bit
/// immediate selected by bit 10 of the encoding.
const THREE_OP: [Converter; 3] = [
    Converter::Reg { off: 0 },
    Converter::Reg { off: 3 },
    Converter::RegOrImm { off: 6, imm_bit: 10 },
];

/// rD and an 8-bit immediate.
const RD_IMM8: [Converter; 2] = [
    Converter::Reg { off: 8 },
    Converter::Uint {
        off: 0,
        bits: 8,
        shift: 0,
    },
];

/// rD and a word-aligned 8-bit offset from PC or SP.
const RD_OFF8: [Converter; 2] = [
    Converter::Reg { off: 8 },
    Converter::Uint {
        off: 0,
        bits: 8,
        shift: 2,
    },
];

/// Word-aligned 7-bit SP adjustment.
const SP_OFF7: [Converter; 1] = [Converter::Uint {
    off: 0,
    bits: 7,
    shift: 2,
}];

/// Three 4-bit register fields of the wide encodings: rD at bit 8, rS at
/// bit 16, rT at bit 0.
const THREE_OP_WIDE: [Converter; 3] = [
    Converter::Reg4 { off: 8 },
    Converter::Reg4 { off: 16 },
    Converter::Reg4 { off: 0 },
];

pub fn register(table: &mut InstructionTable) {
    let three_op_args = format!("{REG},{REG},{REG_OR_IMM}");

    table.insert("add", &format!("{REG},{IMM}"), "00110___--------", &RD_IMM8);
    table.insert(
        "add",
        &format!("{REG},pc,{IMM_OR_LABEL}"),
        "10100___--------",
        &RD_OFF8,
    );
    table.insert("add", &format!("{REG},sp,{IMM}"), "10101___--------", &RD_OFF8);
    table.insert("add", &format!("sp,{IMM}"), "101100000-------", &SP_OFF7);
    table.insert("add", &three_op_args, "00011-0---______", &THREE_OP);

    table.insert("adds", &three_op_args, "00011-0---______", &THREE_OP);

    table.insert("sub", &format!("{REG},{IMM}"), "00111___--------", &RD_IMM8);
    table.insert("sub", &format!("sp,{IMM}"), "101100001-------", &SP_OFF7);
    table.insert("sub", &three_op_args, "00011-1---______", &THREE_OP);

    // Wide three operand forms, zero shift on the last operand.
    let wide_args = format!("{REG4},{REG4},{REG4}");
    table.insert(
        "add.w",
        &wide_args,
        "111010110000____0000____0000____",
        &THREE_OP_WIDE,
    );
    table.insert(
        "adc.w",
        &wide_args,
        "111010110100____0000____0000____",
        &THREE_OP_WIDE,
    );
}
