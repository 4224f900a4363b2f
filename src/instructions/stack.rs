//! PUSH and POP instructions.

use super::InstructionTable;
use crate::operands::Converter;

pub fn register(table: &mut InstructionTable) {
    // Bit 8 is the LR bit for PUSH and the PC bit for POP; the register
    // list converter sets it when "lr" appears in the list.
    table.insert("push", r"\{(.+)\}", "1011010---------", &[Converter::RegList]);
    table.insert("pop", r"\{(.+)\}", "1011110---------", &[Converter::RegList]);
}
