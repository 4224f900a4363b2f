//! Shift instructions: LSL, LSR and ASR.
//!
//! Each has an immediate shift amount form and a register form from the
//! data-processing group.

use super::{InstructionTable, IMM, REG};
use crate::operands::Converter;

const RD_RS: [Converter; 2] = [Converter::Reg { off: 0 }, Converter::Reg { off: 3 }];
const RD_RS_IMM5: [Converter; 3] = [
    Converter::Reg { off: 0 },
    Converter::Reg { off: 3 },
    Converter::Uint {
        off: 6,
        bits: 5,
        shift: 0,
    },
];

pub fn register(table: &mut InstructionTable) {
    let imm_args = format!("{REG},{REG},{IMM}");
    let reg_args = format!("{REG},{REG}");

    table.insert("lsl", &imm_args, "00000-----______", &RD_RS_IMM5);
    table.insert("lsl", &reg_args, "0100000010______", &RD_RS);
    table.insert("lsr", &imm_args, "00001-----______", &RD_RS_IMM5);
    table.insert("lsr", &reg_args, "0100000011______", &RD_RS);
    table.insert("asr", &imm_args, "00010-----______", &RD_RS_IMM5);
    table.insert("asr", &reg_args, "0100000100______", &RD_RS);
}
