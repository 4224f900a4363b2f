//! Assembler directives.
//!
//! Only `.word` is supported: a raw 32-bit literal. The whole 32-bit
//! "encoding" is placeholder bits; the converter swaps the half-words so
//! that the high-first emission order lays the word out little-endian in
//! memory.

use super::InstructionTable;
use crate::operands::Converter;

pub fn register(table: &mut InstructionTable) {
    table.insert(
        ".word",
        r"(0x[0-9a-fA-F]+|-?\d+)",
        "--------------------------------",
        &[Converter::WordLit],
    );
}
