//! Miscellaneous system instructions.

use super::{InstructionTable, IMM};
use crate::operands::Converter;

pub fn register(table: &mut InstructionTable) {
    // The canonical Thumb-1 idiom: nop is MOV r8, r8.
    table.insert("nop", "", "0100011011000000", &[]);

    // Only the PRIMASK ("i") form is supported.
    table.insert("cpsie", "i", "1011011001100010", &[]);
    table.insert("cpsid", "i", "1011011001110010", &[]);

    table.insert("wfe", "", "1011111100100000", &[]);
    table.insert("wfi", "", "1011111100110000", &[]);

    table.insert(
        "bkpt",
        IMM,
        "10111110--------",
        &[Converter::Uint {
            off: 0,
            bits: 8,
            shift: 0,
        }],
    );
}
