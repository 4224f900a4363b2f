//! MOV, MOVS and MOVW instructions.

use super::{InstructionTable, IMM, IMM16, REG, REG4};
use crate::operands::Converter;

const RD_IMM8: [Converter; 2] = [
    Converter::Reg { off: 8 },
    Converter::Uint {
        off: 0,
        bits: 8,
        shift: 0,
    },
];

pub fn register(table: &mut InstructionTable) {
    let rd_imm_args = format!("{REG},{IMM}");

    table.insert("mov", &rd_imm_args, "00100___--------", &RD_IMM8);
    // Low register copy through the hi-register MOV encoding with a 4-bit
    // source field.
    table.insert(
        "mov",
        &format!("{REG},{REG}"),
        "010001100_______",
        &[Converter::Reg { off: 0 }, Converter::Reg4 { off: 3 }],
    );
    table.insert(
        "mov",
        &format!("sp,{REG4}"),
        "010001101____101",
        &[Converter::Reg4 { off: 3 }],
    );

    table.insert("movs", &rd_imm_args, "00100___--------", &RD_IMM8);

    // Thumb-2 T3 16-bit immediate load.
    table.insert(
        "movw",
        &format!("{REG4},{IMM16}"),
        "11110-100100----0---____--------",
        &[Converter::Reg4 { off: 8 }, Converter::T3Imm],
    );
}
